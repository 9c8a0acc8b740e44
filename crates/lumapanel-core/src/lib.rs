//! Lumapanel Core - Domain Model and State
//!
//! This crate contains the core domain model for Lumapanel, including:
//! - Fixture records and the fixture table
//! - READ/WRITE control modes
//! - Inbound network events
//! - Application state and the event-application logic
//! - Rate metrics (FPS, messages per second)
//! - The repeating tick timer

#![warn(missing_docs)]

use thiserror::Error;

pub mod event;
pub mod fixture;
pub mod metrics;
pub mod mode;
pub mod state;
pub mod timer;

pub use event::{FrameFixture, InboundEvent};
pub use fixture::{FixtureChannel, FixtureId, FixtureRecord, FixtureShape, FixtureTable};
pub use metrics::RateCounter;
pub use mode::ControlMode;
pub use state::{AppState, ViewMode, HELLO_TIMEOUT};
pub use timer::TickTimer;

/// Core error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Fixture ids are 1-based; 0 is never a valid id
    #[error("Invalid fixture id: {0}")]
    InvalidFixtureId(u32),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
