//! Inbound network events
//!
//! The network gateway decodes datagrams into these typed events and pushes
//! them onto the inbound queue. The tick loop consumes each event exactly
//! once, applies it to the application state, and drops it.

use crate::fixture::FixtureId;

/// One per-fixture block of a `frame` message: id plus all seven values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameFixture {
    /// Fixture id
    pub id: FixtureId,
    /// Red channel
    pub red: f32,
    /// Green channel
    pub green: f32,
    /// Blue channel
    pub blue: f32,
    /// Amber channel
    pub amber: f32,
    /// White channel
    pub white: f32,
    /// Master dimmer
    pub dimmer: f32,
    /// Strobe rate
    pub strobe: f32,
}

/// A decoded inbound event
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// The remote engine announced itself
    Hello,
    /// A decode or transport error, surfaced instead of raised
    Error {
        /// Human-readable description
        message: String,
    },
    /// Per-fixture color update
    FixtureColor {
        /// Fixture id
        id: FixtureId,
        /// Red channel
        red: f32,
        /// Green channel
        green: f32,
        /// Blue channel
        blue: f32,
        /// Amber channel
        amber: f32,
        /// White channel
        white: f32,
    },
    /// Per-fixture dimmer update
    FixtureDimmer {
        /// Fixture id
        id: FixtureId,
        /// New dimmer value
        value: f32,
    },
    /// Per-fixture strobe update
    FixtureStrobe {
        /// Fixture id
        id: FixtureId,
        /// New strobe rate
        rate: f32,
    },
    /// Batched full-state update for many fixtures
    Frame {
        /// Sender timestamp, seconds
        timestamp: f64,
        /// Per-fixture blocks
        fixtures: Vec<FrameFixture>,
    },
}
