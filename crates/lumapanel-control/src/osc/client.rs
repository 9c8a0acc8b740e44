//! OSC sender
//!
//! Serializes mode, selection and fixture state into outbound messages.
//! Frame messages are throttled to a configurable maximum rate: a frame
//! requested before the minimum inter-send interval has elapsed is silently
//! dropped and the next tick sends fresher data instead. Non-frame messages
//! are never throttled.

use crate::{error::ControlError, Result};
use lumapanel_core::{ControlMode, FixtureId, FixtureRecord, FrameFixture};
use rosc::{OscMessage, OscPacket, OscType};
use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use super::address::{
    fixture_address, FixtureParam, FRAME_ADDRESS, MODE_ADDRESS, READY_ADDRESS, SELECT_ADDRESS,
};
use super::types::encode_frame_args;

/// Wire value for "nothing selected"
pub const SELECT_NONE: i32 = -1;

/// Minimum-interval gate for outbound frames, latest-state-wins
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    min_interval: Duration,
    last_sent: Option<Instant>,
}

impl FrameThrottle {
    /// Create a throttle for the given maximum rate. Rates below 1 Hz clamp
    /// to 1 Hz.
    pub fn new(max_rate_hz: u32) -> Self {
        Self {
            min_interval: Self::interval(max_rate_hz),
            last_sent: None,
        }
    }

    fn interval(max_rate_hz: u32) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(max_rate_hz.max(1)))
    }

    /// Change the maximum rate
    pub fn set_max_rate(&mut self, max_rate_hz: u32) {
        self.min_interval = Self::interval(max_rate_hz);
    }

    /// Whether a send at `now` is allowed; marks the send time if so
    pub fn allow(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_sent {
            if now.duration_since(last) < self.min_interval {
                return false;
            }
        }
        self.last_sent = Some(now);
        true
    }
}

/// UDP sender for outbound OSC messages
pub struct OscSender {
    socket: UdpSocket,
    target: SocketAddr,
    throttle: FrameThrottle,
}

impl OscSender {
    /// Create a sender targeting the remote engine
    pub fn new(target: SocketAddr, max_frame_rate_hz: u32) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        tracing::info!(
            "OSC sender created for {} (max frame rate {} Hz)",
            target,
            max_frame_rate_hz
        );
        Ok(Self {
            socket,
            target,
            throttle: FrameThrottle::new(max_frame_rate_hz),
        })
    }

    /// The remote endpoint
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Change the maximum outbound frame rate
    pub fn set_max_frame_rate(&mut self, max_rate_hz: u32) {
        self.throttle.set_max_rate(max_rate_hz);
    }

    fn send_message(&self, addr: &str, args: Vec<OscType>) -> Result<()> {
        let packet = OscPacket::Message(OscMessage {
            addr: addr.to_string(),
            args,
        });
        let buf =
            rosc::encoder::encode(&packet).map_err(|e| ControlError::OscError(e.to_string()))?;
        self.socket.send_to(&buf, self.target)?;
        Ok(())
    }

    /// Announce startup
    pub fn send_ready(&self) -> Result<()> {
        self.send_message(READY_ADDRESS, vec![])
    }

    /// Announce the current mode
    pub fn send_mode(&self, mode: ControlMode) -> Result<()> {
        self.send_message(MODE_ADDRESS, vec![OscType::String(mode.to_string())])
    }

    /// Announce the current selection (`None` sends the -1 sentinel)
    pub fn send_select(&self, id: Option<FixtureId>) -> Result<()> {
        let wire = id.map_or(SELECT_NONE, |id| id as i32);
        self.send_message(SELECT_ADDRESS, vec![OscType::Int(wire)])
    }

    /// Send the discrete per-fixture messages for one record
    pub fn send_fixture(&self, id: FixtureId, record: &FixtureRecord) -> Result<()> {
        self.send_message(
            &fixture_address(id, FixtureParam::Color),
            vec![
                OscType::Float(record.red),
                OscType::Float(record.green),
                OscType::Float(record.blue),
                OscType::Float(record.amber),
                OscType::Float(record.white),
            ],
        )?;
        self.send_message(
            &fixture_address(id, FixtureParam::Dimmer),
            vec![OscType::Float(record.dimmer)],
        )?;
        self.send_message(
            &fixture_address(id, FixtureParam::Strobe),
            vec![OscType::Float(record.strobe)],
        )
    }

    /// Send a batched frame, subject to the throttle.
    ///
    /// Returns `Ok(true)` when the frame went out and `Ok(false)` when it
    /// was dropped by the throttle. Pass `throttle = false` for one-off
    /// sends such as the operator test frame.
    pub fn send_frame(
        &mut self,
        timestamp: f64,
        fixtures: &[FrameFixture],
        throttle: bool,
    ) -> Result<bool> {
        if throttle && !self.throttle.allow(Instant::now()) {
            return Ok(false);
        }
        self.send_message(FRAME_ADDRESS, encode_frame_args(timestamp, fixtures))?;
        Ok(true)
    }
}
