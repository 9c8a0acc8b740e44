//! Application orchestrator
//!
//! Owns the state, the inbound event queue receiver, the outbound sender
//! and the tick timer. One tick drains the queue, applies every pending
//! event, refreshes the rate metrics, redraws the active view and, in WRITE
//! mode, publishes a frame. Nothing a tick does is allowed to stop the tick
//! loop: transport and decode failures end up in `last_error` and the next
//! tick runs as scheduled.

use crate::view::FixtureView;
use crossbeam_channel::Receiver;
use lumapanel_control::OscSender;
use lumapanel_core::{
    AppState, ControlMode, FixtureChannel, FixtureId, FrameFixture, InboundEvent, RateCounter,
    TickTimer, ViewMode,
};
use lumapanel_io::AppConfig;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// The control panel application
pub struct App {
    config: AppConfig,
    state: AppState,
    events: Receiver<InboundEvent>,
    sender: OscSender,
    timer: TickTimer,
    fps: RateCounter,
    msg_rate: RateCounter,
    view: Box<dyn FixtureView>,
    started: Instant,
}

impl App {
    /// Construct the application and preallocate the configured fixtures
    pub fn new(
        config: AppConfig,
        events: Receiver<InboundEvent>,
        sender: OscSender,
        view: Box<dyn FixtureView>,
    ) -> Self {
        let now = Instant::now();
        let mut state = AppState::new();
        state
            .fixtures
            .set_count(config.fixture_count, config.min_fixtures, config.max_fixtures);
        let interval = Duration::from_millis(config.tick_interval_ms.max(1));
        Self {
            config,
            state,
            events,
            sender,
            timer: TickTimer::new(interval, now),
            fps: RateCounter::new(now),
            msg_rate: RateCounter::new(now),
            view,
            started: now,
        }
    }

    /// Read-only view of the state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Announce startup and the initial mode to the engine
    pub fn announce(&mut self) {
        if let Err(e) = self.sender.send_ready() {
            self.report_error(format!("ready announcement failed: {}", e));
        }
        let mode = self.state.mode;
        if let Err(e) = self.sender.send_mode(mode) {
            self.report_error(format!("mode announcement failed: {}", e));
        }
    }

    /// Run one tick at `now`
    pub fn tick(&mut self, now: Instant) {
        for event in self.events.try_iter() {
            self.msg_rate.record();
            self.state.apply_event(event, now);
        }

        self.fps.record();
        self.fps.roll(now);
        self.msg_rate.roll(now);
        self.state.fps = self.fps.rate();
        self.state.msgs_per_sec = self.msg_rate.rate();
        self.state.update_connectivity(now);

        self.view.render(&self.state);

        if self.state.mode.is_write() && !self.state.fixtures.is_empty() {
            let frame = self.state.build_frame();
            let timestamp = now.duration_since(self.started).as_secs_f64();
            if let Err(e) = self.sender.send_frame(timestamp, &frame, true) {
                self.report_error(format!("frame send failed: {}", e));
            }
        }
    }

    /// Drive the tick loop until the timer stops or `stop` is set.
    ///
    /// A tick in progress always runs to completion; the stop flag is
    /// consulted between ticks only.
    pub fn run(&mut self, stop: &AtomicBool) {
        self.timer.start(Instant::now());
        while self.timer.is_running() && !stop.load(Ordering::Relaxed) {
            let now = Instant::now();
            if self.timer.due(now) {
                self.tick(now);
            }
            let wait = self
                .timer
                .next_deadline()
                .saturating_duration_since(Instant::now());
            std::thread::sleep(wait.min(self.timer.interval()));
        }
        self.timer.stop();
        tracing::info!("tick loop stopped");
    }

    /// Switch the control mode, announcing a change to the engine
    pub fn set_mode(&mut self, mode: ControlMode) {
        if self.state.mode == mode {
            return;
        }
        self.state.mode = mode;
        tracing::info!("mode changed to {}", mode);
        if let Err(e) = self.sender.send_mode(mode) {
            self.report_error(format!("mode notification failed: {}", e));
        }
    }

    /// Normalize and apply a mode string from an untrusted source
    pub fn set_mode_str(&mut self, mode: &str) {
        self.set_mode(ControlMode::normalize(mode));
    }

    /// Select a fixture (created on demand) or clear the selection
    pub fn select(&mut self, id: Option<FixtureId>) {
        match self.state.select(id) {
            Ok(()) => {
                if let Err(e) = self.sender.send_select(self.state.selected) {
                    self.report_error(format!("selection notification failed: {}", e));
                }
            }
            Err(e) => self.report_error(e.to_string()),
        }
    }

    /// Resize the fixture table to the clamped count; returns the applied
    /// count. A selection pointing at a removed fixture is cleared.
    pub fn apply_fixture_count(&mut self, count: u32) -> u32 {
        let applied = self.state.fixtures.set_count(
            count,
            self.config.min_fixtures,
            self.config.max_fixtures,
        );
        if let Some(selected) = self.state.selected {
            if !self.state.fixtures.contains(selected) {
                self.select(None);
            }
        }
        applied
    }

    /// Operator slider edit: set one channel of one fixture
    pub fn apply_slider(&mut self, id: FixtureId, channel: FixtureChannel, value: f32) {
        if id == 0 {
            self.report_error("slider edit for fixture id 0 ignored".to_string());
            return;
        }
        self.state.fixtures.ensure(id).set_channel(channel, value);
    }

    /// Switch between the color grid and the all-fixtures slider list
    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.state.view_mode = view_mode;
    }

    /// Send the fixed four-fixture test pattern, bypassing the throttle
    pub fn send_test_frame(&mut self) {
        let pattern = [
            (1, 1.0, 0.0, 0.0, 1.0, 0.2),
            (2, 0.0, 1.0, 0.0, 0.8, 0.0),
            (3, 0.0, 0.0, 1.0, 0.6, 0.1),
            (4, 1.0, 1.0, 0.0, 1.0, 0.0),
        ];
        let fixtures: Vec<FrameFixture> = pattern
            .iter()
            .map(|&(id, red, green, blue, dimmer, strobe)| FrameFixture {
                id,
                red,
                green,
                blue,
                amber: 0.0,
                white: 0.0,
                dimmer,
                strobe,
            })
            .collect();
        let timestamp = self.started.elapsed().as_secs_f64();
        match self.sender.send_frame(timestamp, &fixtures, false) {
            Ok(_) => tracing::info!("test frame sent"),
            Err(e) => self.report_error(format!("test frame failed: {}", e)),
        }
    }

    /// Save the fixture table to a project file.
    ///
    /// A failed save is logged and surfaced in the status area; the panel
    /// keeps running.
    pub fn save_project(&mut self, path: &Path) {
        if let Err(e) = lumapanel_io::save_project(&self.state.fixtures, path) {
            self.report_error(format!("project save failed: {}", e));
        }
    }

    /// Replace the fixture table from a project file.
    ///
    /// On failure the in-memory table is left unchanged. A selection
    /// pointing at a fixture the file does not contain is cleared.
    pub fn load_project(&mut self, path: &Path) {
        match lumapanel_io::load_project(path) {
            Ok(fixtures) => {
                self.state.fixtures = fixtures;
                if let Some(selected) = self.state.selected {
                    if !self.state.fixtures.contains(selected) {
                        self.select(None);
                    }
                }
            }
            Err(e) => self.report_error(format!("project load failed: {}", e)),
        }
    }

    fn report_error(&mut self, message: String) {
        tracing::error!("{}", message);
        self.state.last_error = Some(message);
    }
}
