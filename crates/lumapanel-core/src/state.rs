//! Application state
//!
//! One explicitly constructed state record owned by the top-level
//! orchestrator. All mutation happens on the UI/tick thread; the network
//! listener only ever contributes through the inbound event queue.

use crate::event::{FrameFixture, InboundEvent};
use crate::fixture::{FixtureId, FixtureTable};
use crate::mode::ControlMode;
use crate::{CoreError, Result};
use std::time::{Duration, Instant};

/// How long after the last hello the engine is considered disconnected
pub const HELLO_TIMEOUT: Duration = Duration::from_secs(5);

/// Which view the operator is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Color preview grid with a per-selection slider panel
    #[default]
    Color,
    /// Slider list covering every fixture
    Sliders,
}

/// Process-lifetime application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current control mode
    pub mode: ControlMode,
    /// Whether the remote engine has been heard from recently
    pub connected: bool,
    /// When the last hello arrived
    pub last_hello: Option<Instant>,
    /// Ticks per second over the last closed window
    pub fps: f32,
    /// Inbound messages per second over the last closed window
    pub msgs_per_sec: f32,
    /// Most recent swallowed error, surfaced in the status area
    pub last_error: Option<String>,
    /// Currently selected fixture, if any
    pub selected: Option<FixtureId>,
    /// Active view
    pub view_mode: ViewMode,
    /// The fixture table
    pub fixtures: FixtureTable,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: ControlMode::Read,
            connected: false,
            last_hello: None,
            fps: 0.0,
            msgs_per_sec: 0.0,
            last_error: None,
            selected: None,
            view_mode: ViewMode::Color,
            fixtures: FixtureTable::new(),
        }
    }
}

impl AppState {
    /// Create the initial state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one inbound event to the state.
    ///
    /// Events arrive in network order and are applied in that order;
    /// the last write per field wins. A `Frame` overwrites every value of
    /// the fixtures it names and leaves all other fixtures untouched.
    pub fn apply_event(&mut self, event: InboundEvent, now: Instant) {
        match event {
            InboundEvent::Hello => {
                self.connected = true;
                self.last_hello = Some(now);
            }
            InboundEvent::Error { message } => {
                tracing::warn!("inbound error event: {}", message);
                self.last_error = Some(message);
            }
            InboundEvent::FixtureColor {
                id,
                red,
                green,
                blue,
                amber,
                white,
            } => {
                self.fixtures
                    .ensure(id)
                    .set_color(red, green, blue, amber, white);
            }
            InboundEvent::FixtureDimmer { id, value } => {
                self.fixtures.ensure(id).set_dimmer(value);
            }
            InboundEvent::FixtureStrobe { id, rate } => {
                self.fixtures.ensure(id).set_strobe(rate);
            }
            InboundEvent::Frame { fixtures, .. } => {
                for block in fixtures {
                    let record = self.fixtures.ensure(block.id);
                    record.set_color(block.red, block.green, block.blue, block.amber, block.white);
                    record.set_dimmer(block.dimmer);
                    record.set_strobe(block.strobe);
                }
            }
        }
    }

    /// Mark the engine disconnected when no hello arrived within the timeout
    pub fn update_connectivity(&mut self, now: Instant) {
        if let Some(last) = self.last_hello {
            if now.duration_since(last) > HELLO_TIMEOUT {
                if self.connected {
                    tracing::info!("engine silent for {:?}, marking disconnected", HELLO_TIMEOUT);
                }
                self.connected = false;
            }
        }
    }

    /// Snapshot all fixtures sorted by id, for an outbound frame
    pub fn build_frame(&self) -> Vec<FrameFixture> {
        self.fixtures
            .ids_sorted()
            .into_iter()
            .filter_map(|id| {
                self.fixtures.get(id).map(|record| FrameFixture {
                    id,
                    red: record.red,
                    green: record.green,
                    blue: record.blue,
                    amber: record.amber,
                    white: record.white,
                    dimmer: record.dimmer,
                    strobe: record.strobe,
                })
            })
            .collect()
    }

    /// Select a fixture (creating it if missing) or clear the selection.
    ///
    /// Deselecting never deletes the record. Id 0 is rejected.
    pub fn select(&mut self, id: Option<FixtureId>) -> Result<()> {
        match id {
            Some(0) => Err(CoreError::InvalidFixtureId(0)),
            Some(id) => {
                self.fixtures.ensure(id);
                self.selected = Some(id);
                Ok(())
            }
            None => {
                self.selected = None;
                Ok(())
            }
        }
    }
}
