//! OSC gateway: address space, type coercion, listener and sender

pub mod address;
pub mod client;
pub mod server;
pub mod types;

pub use address::{FixtureParam, MessageAddress};
pub use client::{FrameThrottle, OscSender};
pub use server::OscListener;
