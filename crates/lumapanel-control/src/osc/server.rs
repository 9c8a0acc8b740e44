//! OSC listener thread
//!
//! Binds the listening endpoint and decodes inbound datagrams into typed
//! events on the inbound queue. The listener thread never touches
//! application state; malformed input becomes an error event and the loop
//! keeps running. Shutdown sets a stop flag and joins within the read
//! timeout.

use crate::{error::ControlError, Result};
use crossbeam_channel::Sender;
use lumapanel_core::InboundEvent;
use rosc::OscPacket;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

const RECV_BUFFER_LEN: usize = 4096;
const READ_TIMEOUT: Duration = Duration::from_millis(200);

/// UDP listener decoding OSC messages into inbound events
pub struct OscListener {
    socket: UdpSocket,
    local_addr: SocketAddr,
    events: Sender<InboundEvent>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl OscListener {
    /// Bind the listening endpoint.
    ///
    /// Bind failure is the one fatal startup path and is returned to the
    /// caller instead of being converted to an event.
    pub fn bind(addr: impl ToSocketAddrs, events: Sender<InboundEvent>) -> Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_read_timeout(Some(READ_TIMEOUT))?;
        let local_addr = socket.local_addr()?;
        tracing::info!("OSC listener bound on {}", local_addr);
        Ok(Self {
            socket,
            local_addr,
            events,
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
        })
    }

    /// The bound local address (useful when binding port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start the listener thread
    pub fn spawn(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }
        let socket = self.socket.try_clone()?;
        let events = self.events.clone();
        let stop = Arc::clone(&self.stop);
        let handle = std::thread::Builder::new()
            .name("osc-listener".to_string())
            .spawn(move || listen_loop(socket, events, stop))
            .map_err(ControlError::IoError)?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Stop the listener and join its thread.
    ///
    /// The thread wakes from the blocking read within the read timeout, so
    /// the join is bounded.
    pub fn shutdown(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("OSC listener thread panicked during shutdown");
            }
        }
        tracing::info!("OSC listener stopped");
    }
}

fn listen_loop(socket: UdpSocket, events: Sender<InboundEvent>, stop: Arc<AtomicBool>) {
    let mut buf = [0u8; RECV_BUFFER_LEN];
    while !stop.load(Ordering::Relaxed) {
        let len = match socket.recv_from(&mut buf) {
            Ok((len, _peer)) => len,
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                continue;
            }
            Err(e) => {
                // Transient socket errors are surfaced and the loop goes on
                if push_error(&events, format!("OSC receive error: {}", e)).is_err() {
                    break;
                }
                continue;
            }
        };

        let packet = match rosc::decoder::decode_udp(&buf[..len]) {
            Ok((_rest, packet)) => packet,
            Err(e) => {
                if push_error(&events, format!("OSC decode error: {}", e)).is_err() {
                    break;
                }
                continue;
            }
        };

        if push_packet(&events, packet).is_err() {
            break;
        }
    }
}

/// Decode one packet (flattening bundles) into events.
///
/// Returns Err only when the receiving side is gone and the loop should
/// exit; decode failures are pushed as error events.
fn push_packet(
    events: &Sender<InboundEvent>,
    packet: OscPacket,
) -> std::result::Result<(), crossbeam_channel::SendError<InboundEvent>> {
    match packet {
        OscPacket::Message(message) => match super::types::decode_message(&message) {
            Ok(event) => events.send(event),
            Err(e) => push_error(events, format!("{} ({})", e, message.addr)),
        },
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                push_packet(events, inner)?;
            }
            Ok(())
        }
    }
}

fn push_error(
    events: &Sender<InboundEvent>,
    message: String,
) -> std::result::Result<(), crossbeam_channel::SendError<InboundEvent>> {
    tracing::warn!("{}", message);
    events.send(InboundEvent::Error { message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use rosc::{encoder, OscMessage, OscType};

    fn send_datagram(target: SocketAddr, packet: &OscPacket) {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        let buf = encoder::encode(packet).unwrap();
        socket.send_to(&buf, target).unwrap();
    }

    fn recv_event(rx: &crossbeam_channel::Receiver<InboundEvent>) -> InboundEvent {
        rx.recv_timeout(Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_datagram_to_event() {
        let (tx, rx) = unbounded();
        let mut listener = OscListener::bind("127.0.0.1:0", tx).unwrap();
        listener.spawn().unwrap();
        let target = listener.local_addr();

        send_datagram(
            target,
            &OscPacket::Message(OscMessage {
                addr: "/fixture/2/dimmer".to_string(),
                args: vec![OscType::Float(0.5)],
            }),
        );

        assert_eq!(
            recv_event(&rx),
            InboundEvent::FixtureDimmer { id: 2, value: 0.5 }
        );
        listener.shutdown();
    }

    #[test]
    fn test_malformed_message_becomes_single_error_event() {
        let (tx, rx) = unbounded();
        let mut listener = OscListener::bind("127.0.0.1:0", tx).unwrap();
        listener.spawn().unwrap();
        let target = listener.local_addr();

        // Frame whose block region is not a multiple of 8
        send_datagram(
            target,
            &OscPacket::Message(OscMessage {
                addr: "/frame".to_string(),
                args: vec![
                    OscType::Float(1.0),
                    OscType::Int(1),
                    OscType::Float(0.5),
                ],
            }),
        );

        assert!(matches!(recv_event(&rx), InboundEvent::Error { .. }));
        // Exactly one event came out of the malformed datagram
        assert!(rx.is_empty());

        // The loop is still alive afterwards
        send_datagram(
            target,
            &OscPacket::Message(OscMessage {
                addr: "/app/hello".to_string(),
                args: vec![],
            }),
        );
        assert_eq!(recv_event(&rx), InboundEvent::Hello);
        listener.shutdown();
    }

    #[test]
    fn test_unknown_address_becomes_error_event() {
        let (tx, rx) = unbounded();
        let mut listener = OscListener::bind("127.0.0.1:0", tx).unwrap();
        listener.spawn().unwrap();

        send_datagram(
            listener.local_addr(),
            &OscPacket::Message(OscMessage {
                addr: "/fixture/3/pan".to_string(),
                args: vec![OscType::Float(0.5)],
            }),
        );

        assert!(matches!(recv_event(&rx), InboundEvent::Error { .. }));
        listener.shutdown();
    }

    #[test]
    fn test_shutdown_joins_quickly() {
        let (tx, _rx) = unbounded();
        let mut listener = OscListener::bind("127.0.0.1:0", tx).unwrap();
        listener.spawn().unwrap();

        let started = std::time::Instant::now();
        listener.shutdown();
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
