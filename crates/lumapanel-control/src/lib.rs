//! Lumapanel Control - Network Gateway
//!
//! OSC-over-UDP gateway between the control panel and the external lighting
//! engine:
//! - **Listener**: a background thread decoding inbound messages into typed
//!   events pushed onto the inbound queue
//! - **Sender**: serializes mode, selection and fixture state into outbound
//!   messages, with throttled frame publication
//!
//! ## Modules
//!
//! - [`osc`] - address space, type coercion, listener and sender
//! - [`error`] - error types

#![warn(missing_docs)]

/// Error types
pub mod error;
/// OSC listener, sender and codec
pub mod osc;

pub use error::{ControlError, Result};
pub use osc::{FrameThrottle, MessageAddress, OscListener, OscSender};
