//! Countdown state machine.
//!
//! [`CountdownEngine`] owns the timer state and every transition of the
//! countdown: configuring the duration, starting, pausing, stopping,
//! restarting after completion and acknowledging completion. It is driven by
//! [`TickMsg`]s that it schedules itself through a [`TickHandle`].
//!
//! All operations are total. Calls that make no sense in the current state
//! (starting a finished countdown, reconfiguring while running) leave the
//! state untouched.
//!
//! # States
//!
//! ```text
//!            start                 tick reaches 0:00
//!   Idle ───────────▶ Running ─────────────────────▶ Finished
//!    ▲   Paused ◀──────┘ │ ▲                           │  │
//!    │     │   pause     │ └───────── restart ─────────┘  │
//!    │     └─ start ─────┘                                │
//!    └──────────────── stop (from any) / acknowledge ─────┘
//! ```
//!
//! # bubbletea-rs integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use ringtimer::engine::{self, CountdownEngine, FinishedMsg};
//!
//! struct App {
//!     engine: CountdownEngine,
//!     done: bool,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut engine = engine::new(25);
//!         let cmd = engine.start();
//!         (Self { engine, done: false }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(finished) = msg.downcast_ref::<FinishedMsg>() {
//!             if finished.id == self.engine.id() {
//!                 self.done = true;
//!             }
//!         }
//!         self.engine.update(&msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         let s = self.engine.state();
//!         format!("{:02}:{:02}", s.remaining_minutes, s.remaining_seconds)
//!     }
//! }
//! ```

use crate::schedule::{TickHandle, TickMsg};
use bubbletea_rs::{Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Duration configured when none is given.
pub const DEFAULT_MINUTES: u32 = 25;

/// Largest accepted duration, keeping the label at three minute digits.
pub const MAX_MINUTES: u32 = 999;

/// Period between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Emitted once when a countdown reaches zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedMsg {
    /// Id of the engine that finished.
    pub id: i64,
}

/// Snapshot of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    /// Committed duration in minutes.
    pub configured_minutes: u32,
    /// Whole minutes left.
    pub remaining_minutes: u32,
    /// Seconds left within the current minute, `0..=59`.
    pub remaining_seconds: u32,
    /// The countdown is ticking.
    pub is_running: bool,
    /// The countdown reached zero and waits for restart or acknowledgement.
    pub is_finished: bool,
}

impl TimerState {
    fn reset_to(minutes: u32) -> Self {
        Self {
            configured_minutes: minutes,
            remaining_minutes: minutes,
            remaining_seconds: 0,
            is_running: false,
            is_finished: false,
        }
    }

    /// Remaining time in seconds, saturating at `u32::MAX`.
    pub fn remaining_total_seconds(&self) -> u32 {
        self.remaining_minutes
            .saturating_mul(60)
            .saturating_add(self.remaining_seconds)
    }

    /// Configured duration in seconds, saturating at `u32::MAX`.
    pub fn configured_total_seconds(&self) -> u32 {
        self.configured_minutes.saturating_mul(60)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::reset_to(DEFAULT_MINUTES)
    }
}

/// Coarse state of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Reset to the configured duration and never started since.
    Idle,
    /// Ticking.
    Running,
    /// Started at least once, currently not ticking.
    Paused,
    /// Reached zero.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    Inert,
    Counted,
    Finished,
}

/// The countdown state machine.
///
/// Dropping the engine cancels its tick registration.
#[derive(Debug)]
pub struct CountdownEngine {
    id: i64,
    state: TimerState,
    period: Duration,
    tag: u64,
    handle: Option<TickHandle>,
    started: bool,
}

/// Creates an idle engine configured for `minutes`.
///
/// Zero falls back to [`DEFAULT_MINUTES`]; values above [`MAX_MINUTES`] are
/// clamped.
pub fn new(minutes: u32) -> CountdownEngine {
    new_with_period(minutes, TICK_PERIOD)
}

/// Like [`new`] with a custom tick period. Each tick still counts one second.
pub fn new_with_period(minutes: u32, period: Duration) -> CountdownEngine {
    let minutes = match minutes {
        0 => DEFAULT_MINUTES,
        m => m.min(MAX_MINUTES),
    };
    CountdownEngine {
        id: next_id(),
        state: TimerState::reset_to(minutes),
        period,
        tag: 0,
        handle: None,
        started: false,
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        new(DEFAULT_MINUTES)
    }
}

impl CountdownEngine {
    /// Unique id carried by this engine's messages.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current snapshot.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        if self.state.is_finished {
            Phase::Finished
        } else if self.state.is_running {
            Phase::Running
        } else if self.started {
            Phase::Paused
        } else {
            Phase::Idle
        }
    }

    /// Whether a tick registration is live.
    pub fn is_scheduled(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_cancelled())
    }

    /// Commits a new duration and resets the remaining time to it.
    ///
    /// Ignored while running, for zero, and for values above [`MAX_MINUTES`].
    pub fn set_configured_duration(&mut self, minutes: u32) {
        if self.state.is_running || minutes == 0 || minutes > MAX_MINUTES {
            tracing::debug!(id = self.id, minutes, "duration change ignored");
            return;
        }
        self.cancel_schedule();
        self.state = TimerState::reset_to(minutes);
        self.started = false;
        tracing::debug!(id = self.id, minutes, "duration configured");
    }

    /// Starts or resumes ticking and returns the command for the first tick.
    ///
    /// The returned command must be handed to the bubbletea-rs runtime; it
    /// resolves to a [`TickMsg`] one period later, which is then fed back
    /// through [`update`](Self::update). A paused countdown resumes from the
    /// remaining time it was paused at.
    ///
    /// Returns `None` when finished or already running, so calling it twice
    /// never schedules a second tick chain.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ringtimer::engine::{self, Phase};
    ///
    /// let mut timer = engine::new(5);
    /// assert!(timer.start().is_some());
    /// assert_eq!(timer.phase(), Phase::Running);
    ///
    /// // Already running: nothing new is scheduled.
    /// assert!(timer.start().is_none());
    ///
    /// timer.pause();
    /// assert_eq!(timer.phase(), Phase::Paused);
    /// assert!(timer.start().is_some());
    /// ```
    pub fn start(&mut self) -> Option<Cmd> {
        if self.state.is_finished || self.state.is_running {
            return None;
        }
        self.state.is_running = true;
        self.started = true;
        tracing::debug!(id = self.id, "countdown started");
        Some(self.schedule())
    }

    /// Stops ticking and keeps the remaining time. Any partial second is lost.
    pub fn pause(&mut self) {
        if !self.state.is_running {
            return;
        }
        self.cancel_schedule();
        self.state.is_running = false;
        tracing::debug!(id = self.id, "countdown paused");
    }

    /// Pauses when running, starts otherwise. Ignored when finished.
    pub fn toggle(&mut self) -> Option<Cmd> {
        if self.state.is_running {
            self.pause();
            None
        } else {
            self.start()
        }
    }

    /// Resets to the configured duration from any state, not ticking.
    pub fn stop(&mut self) {
        self.cancel_schedule();
        self.state = TimerState::reset_to(self.state.configured_minutes);
        self.started = false;
        tracing::debug!(id = self.id, "countdown stopped");
    }

    /// From the finished state, resets to the configured duration and starts
    /// ticking again.
    pub fn restart(&mut self) -> Option<Cmd> {
        if !self.state.is_finished {
            return None;
        }
        self.state = TimerState::reset_to(self.state.configured_minutes);
        self.state.is_running = true;
        self.started = true;
        tracing::debug!(id = self.id, "countdown restarted");
        Some(self.schedule())
    }

    /// From the finished state, resets to the configured duration without
    /// starting.
    pub fn acknowledge_finish(&mut self) {
        if !self.state.is_finished {
            return;
        }
        self.state = TimerState::reset_to(self.state.configured_minutes);
        self.started = false;
        tracing::debug!(id = self.id, "finish acknowledged");
    }

    /// Cancels any tick registration. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.cancel_schedule();
        self.state.is_running = false;
    }

    /// Handles a [`TickMsg`] addressed to this engine.
    ///
    /// Each accepted tick removes one second and returns the command for the
    /// next tick. The tick that reaches `0:00` instead returns a command
    /// emitting [`FinishedMsg`] and schedules nothing further.
    ///
    /// Ticks are accepted only when they carry this engine's id and the tag
    /// of the live registration. Ticks from another engine, from a
    /// registration cancelled by pause or stop, or any other message type
    /// are ignored and yield `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_rs::Msg;
    /// use ringtimer::engine;
    ///
    /// let mut timer = engine::new(1);
    /// let _first_tick = timer.start();
    ///
    /// let unrelated: Msg = Box::new("not a tick");
    /// assert!(timer.update(&unrelated).is_none());
    /// assert_eq!(timer.state().remaining_total_seconds(), 60);
    /// ```
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        let tick = msg.downcast_ref::<TickMsg>()?;
        if tick.id != self.id {
            return None;
        }
        match &self.handle {
            Some(handle) if handle.tag() == tick.tag => {}
            _ => {
                tracing::trace!(id = self.id, tag = tick.tag, "stale tick ignored");
                return None;
            }
        }

        match self.tick() {
            TickOutcome::Counted => self.handle.as_ref().map(|h| h.next_tick(self.id)),
            TickOutcome::Finished => Some(self.finished_cmd()),
            TickOutcome::Inert => None,
        }
    }

    /// Decrements the remaining time by one second.
    ///
    /// Reaching `0:00` finishes the countdown on the same tick. Does nothing
    /// unless running.
    fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running {
            return TickOutcome::Inert;
        }
        let s = &mut self.state;
        match (s.remaining_minutes, s.remaining_seconds) {
            (0, 0) => {}
            (m, 0) => {
                s.remaining_minutes = m - 1;
                s.remaining_seconds = 59;
            }
            (_, sec) => s.remaining_seconds = sec - 1,
        }

        if s.remaining_minutes == 0 && s.remaining_seconds == 0 {
            self.finish();
            return TickOutcome::Finished;
        }
        TickOutcome::Counted
    }

    fn finish(&mut self) {
        self.cancel_schedule();
        self.state.is_running = false;
        self.state.is_finished = true;
        self.state.remaining_minutes = 0;
        self.state.remaining_seconds = 0;
        tracing::debug!(id = self.id, "countdown finished");
    }

    fn schedule(&mut self) -> Cmd {
        self.tag += 1;
        let handle = TickHandle::new(self.tag, self.period);
        let cmd = handle.next_tick(self.id);
        // Replacing the previous handle drops and thereby cancels it.
        self.handle = Some(handle);
        cmd
    }

    fn cancel_schedule(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }

    fn finished_cmd(&self) -> Cmd {
        let id = self.id;
        Box::pin(async move { Some(Box::new(FinishedMsg { id }) as Msg) })
    }

    #[cfg(test)]
    pub(crate) fn current_tick(&self) -> Option<TickMsg> {
        self.handle.as_ref().map(|h| TickMsg {
            id: self.id,
            tag: h.tag(),
        })
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}
