//! View renderer boundary
//!
//! The tick loop hands the current state to whichever view is active. The
//! widget toolkit behind a view is not this crate's concern; a view only
//! needs a read-only snapshot of the state.

use lumapanel_core::{AppState, ViewMode};

/// A renderer for the current frame
pub trait FixtureView {
    /// Draw the current state
    fn render(&mut self, state: &AppState);
}

/// Status-line view logging the status-bar fields.
///
/// Emits only when the line changes, so an idle panel stays quiet.
#[derive(Debug, Default)]
pub struct LogView {
    last_status: String,
}

impl FixtureView for LogView {
    fn render(&mut self, state: &AppState) {
        let connected = if state.connected {
            "Connected"
        } else {
            "Not connected"
        };
        let view = match state.view_mode {
            ViewMode::Color => "color",
            ViewMode::Sliders => "sliders",
        };
        let status = format!(
            "Mode: {} | {} | View: {} | FPS: {:.0} | Msg/s: {:.0} | Fixtures: {}",
            state.mode.to_string().to_uppercase(),
            connected,
            view,
            state.fps,
            state.msgs_per_sec,
            state.fixtures.len(),
        );
        if status != self.last_status {
            tracing::debug!("{}", status);
            self.last_status = status;
        }
    }
}
