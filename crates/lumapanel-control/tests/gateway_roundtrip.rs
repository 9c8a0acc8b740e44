//! End-to-end gateway tests over loopback UDP

use crossbeam_channel::unbounded;
use lumapanel_control::{OscListener, OscSender};
use lumapanel_core::{ControlMode, FixtureRecord, FrameFixture, InboundEvent};
use rosc::{OscPacket, OscType};
use std::net::UdpSocket;
use std::time::Duration;

fn recv_event(rx: &crossbeam_channel::Receiver<InboundEvent>) -> InboundEvent {
    rx.recv_timeout(Duration::from_secs(2)).unwrap()
}

#[test]
fn frame_travels_sender_to_listener() {
    let (tx, rx) = unbounded();
    let mut listener = OscListener::bind("127.0.0.1:0", tx).unwrap();
    listener.spawn().unwrap();

    let mut sender = OscSender::new(listener.local_addr(), 60).unwrap();
    let fixtures = vec![FrameFixture {
        id: 3,
        red: 1.0,
        green: 0.0,
        blue: 0.0,
        amber: 0.0,
        white: 0.0,
        dimmer: 1.0,
        strobe: 0.2,
    }];
    assert!(sender.send_frame(7.5, &fixtures, false).unwrap());

    match recv_event(&rx) {
        InboundEvent::Frame {
            timestamp,
            fixtures: decoded,
        } => {
            assert!((timestamp - 7.5).abs() < 1e-5);
            assert_eq!(decoded, fixtures);
        }
        other => panic!("unexpected event: {:?}", other),
    }
    listener.shutdown();
}

#[test]
fn discrete_fixture_messages_travel_in_order() {
    let (tx, rx) = unbounded();
    let mut listener = OscListener::bind("127.0.0.1:0", tx).unwrap();
    listener.spawn().unwrap();

    let sender = OscSender::new(listener.local_addr(), 60).unwrap();
    let mut record = FixtureRecord::default();
    record.set_color(0.5, 0.25, 0.0, 0.0, 1.0);
    record.set_dimmer(0.8);
    record.set_strobe(0.3);
    sender.send_fixture(9, &record).unwrap();

    assert_eq!(
        recv_event(&rx),
        InboundEvent::FixtureColor {
            id: 9,
            red: 0.5,
            green: 0.25,
            blue: 0.0,
            amber: 0.0,
            white: 1.0,
        }
    );
    assert_eq!(
        recv_event(&rx),
        InboundEvent::FixtureDimmer { id: 9, value: 0.8 }
    );
    assert_eq!(
        recv_event(&rx),
        InboundEvent::FixtureStrobe { id: 9, rate: 0.3 }
    );
    listener.shutdown();
}

#[test]
fn mode_and_select_wire_format() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();

    let sender = OscSender::new(receiver.local_addr().unwrap(), 60).unwrap();
    sender.send_mode(ControlMode::Write).unwrap();
    sender.send_select(Some(4)).unwrap();
    sender.send_select(None).unwrap();
    sender.send_ready().unwrap();

    let mut buf = [0u8; 1024];
    let mut receive = || {
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        match rosc::decoder::decode_udp(&buf[..len]).unwrap().1 {
            OscPacket::Message(message) => message,
            OscPacket::Bundle(_) => panic!("unexpected bundle"),
        }
    };

    let mode = receive();
    assert_eq!(mode.addr, "/ui/mode");
    assert_eq!(mode.args, vec![OscType::String("write".to_string())]);

    let select = receive();
    assert_eq!(select.addr, "/ui/select");
    assert_eq!(select.args, vec![OscType::Int(4)]);

    let deselect = receive();
    assert_eq!(deselect.args, vec![OscType::Int(-1)]);

    let ready = receive();
    assert_eq!(ready.addr, "/app/ready");
    assert!(ready.args.is_empty());
}
