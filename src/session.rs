//! The start/stop state machine coordinating the two session timers.

use crate::cursor::{self, GlyphStack};
use crate::settings::Settings;
use crate::timer::{TimerFired, TimerKind, TimerService};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
}

/// Owns the session state, the timer service and the cursor glyph.
///
/// All methods mutate state synchronously on the caller's thread; timer
/// fires are fed back in through [`SessionController::handle_timer`] by the
/// dispatch loop, so the menu label and the state can never disagree at an
/// observable point.
pub struct SessionController {
    timers: TimerService,
    state: SessionState,
    generation: u64,
    glyph: GlyphStack,
}

impl SessionController {
    pub fn new(timers: TimerService) -> Self {
        Self {
            timers,
            state: SessionState::Idle,
            generation: 0,
            glyph: GlyphStack::new(),
        }
    }

    /// Begin a session with the given settings, read at this moment. If a
    /// session is already running its timers are cancelled and replaced, so
    /// the session clock restarts rather than resuming.
    pub fn start(&mut self, settings: &Settings) {
        self.start_with(settings.move_interval(), settings.run_duration());
        tracing::info!(
            interval_s = settings.move_interval,
            duration_s = settings.run_duration,
            "session started"
        );
    }

    pub fn start_with(&mut self, interval: Duration, duration: Duration) {
        if self.state == SessionState::Running {
            self.stop();
        }
        self.generation = self.timers.begin_session(interval, duration);
        self.state = SessionState::Running;
        self.glyph.activate();
    }

    /// End the session. A no-op when already idle; safe to call any number
    /// of times.
    pub fn stop(&mut self) {
        if self.state == SessionState::Running {
            tracing::info!("session stopped");
        }
        self.timers.cancel();
        self.state = SessionState::Idle;
        self.glyph.deactivate();
    }

    /// The menu's single entry point.
    pub fn toggle(&mut self, settings: &Settings) {
        match self.state {
            SessionState::Running => self.stop(),
            SessionState::Idle => self.start(settings),
        }
    }

    /// Apply one timer fire. Fires from a stopped or replaced session carry
    /// a stale generation and are discarded.
    pub fn handle_timer(&mut self, fired: TimerFired) {
        if self.state != SessionState::Running || fired.generation != self.generation {
            return;
        }
        match fired.kind {
            TimerKind::Move => {
                if let Err(err) = cursor::nudge() {
                    tracing::warn!("cursor nudge failed: {err}");
                }
            }
            TimerKind::Expiry => self.stop(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Generation of the live session's timers; meaningful while running.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn menu_label(&self) -> &'static str {
        match self.state {
            SessionState::Running => "Stop",
            SessionState::Idle => "Start",
        }
    }

    pub fn glyph_active(&self) -> bool {
        self.glyph.is_active()
    }
}
