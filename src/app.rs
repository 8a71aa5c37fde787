//! The timer screen.
//!
//! [`Model`] wires the components together: the duration field and key
//! bindings drive a [`CountdownEngine`], the engine's state is drawn as a
//! progress ring, and a finished countdown switches the screen to the
//! celebration with restart and reset controls.
//!
//! Controls depend on the countdown's phase:
//!
//! | Phase | Available |
//! |---|---|
//! | idle / paused | edit minutes, `enter` set, `space` start, `x` stop |
//! | running | `space` pause, `x` stop |
//! | finished | `r` restart, `a` reset |
//!
//! `q` quits from anywhere and `?` expands the help.
//!
//! ```rust
//! use ringtimer::app;
//! use ringtimer::options;
//!
//! let screen = app::new(&[options::with_default_minutes(10), options::with_seed(1)]);
//! assert_eq!(screen.engine().state().remaining_minutes, 10);
//! assert!(screen.view().contains("10:00"));
//! ```

use crate::celebration;
use crate::engine::{self, CountdownEngine, FinishedMsg, Phase};
use crate::help;
use crate::input;
use crate::key;
use crate::options::{AppOption, Settings};
use crate::ring::{self, RingGeometry};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg, WindowSizeMsg};
use crossterm::event::KeyCode;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Rows below the ring: spacer, status, notice, spacer, full help and banner.
const CHROME_ROWS: usize = 8;

/// Key bindings of the timer screen.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Start or pause.
    pub toggle: key::Binding,
    /// Reset to the configured duration.
    pub stop: key::Binding,
    /// Commit the duration field.
    pub set: key::Binding,
    /// Run again after finishing.
    pub restart: key::Binding,
    /// Leave the finished state without running.
    pub reset: key::Binding,
    /// Expand or collapse the help.
    pub help: key::Binding,
    /// Quit.
    pub quit: key::Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            toggle: key::Binding::new(vec![KeyCode::Char(' '), KeyCode::Char('s')])
                .with_help("space", "start"),
            stop: key::Binding::new(vec![KeyCode::Char('x')]).with_help("x", "stop"),
            set: key::Binding::new(vec![KeyCode::Enter]).with_help("enter", "set minutes"),
            restart: key::new_binding(vec![
                key::with_keys_str(&["r"]),
                key::with_help("r", "restart"),
                key::with_disabled(),
            ]),
            reset: key::new_binding(vec![
                key::with_keys_str(&["a", "esc"]),
                key::with_help("a", "reset"),
                key::with_disabled(),
            ]),
            help: key::Binding::new(vec![KeyCode::Char('?')]).with_help("?", "more"),
            quit: key::new_binding(vec![
                key::with_keys_str(&["q", "ctrl+c"]),
                key::with_help("q", "quit"),
            ]),
        }
    }
}

impl key::KeyMap for KeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![
            &self.set,
            &self.toggle,
            &self.stop,
            &self.restart,
            &self.reset,
            &self.quit,
            &self.help,
        ]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![&self.set, &self.toggle, &self.stop],
            vec![&self.restart, &self.reset],
            vec![&self.help, &self.quit],
        ]
    }
}

/// The timer screen.
#[derive(Debug)]
pub struct Model {
    engine: CountdownEngine,
    input: input::Model,
    ring: ring::Model,
    celebration: celebration::Model,
    help: help::Model,
    notice: Option<String>,
    confetti_height: usize,
    /// Key bindings.
    pub keymap: KeyMap,
    /// Style of the phase line.
    pub status_style: Style,
    /// Style of rejected-input notices.
    pub notice_style: Style,
}

/// Creates the screen.
pub fn new(opts: &[AppOption]) -> Model {
    let settings = Settings::from_options(opts);

    let mut input = input::new(settings.default_minutes);
    let _ = input.focus();

    let mut celebration = match settings.seed {
        Some(seed) => celebration::with_seed(seed),
        None => celebration::new(),
    };
    celebration.count = settings.confetti_count;
    celebration.height = settings.confetti_height;

    let mut m = Model {
        engine: engine::new_with_period(settings.default_minutes, settings.tick_period),
        input,
        ring: ring::new(&[ring::with_radius(settings.ring_radius)]),
        celebration,
        help: help::Model::new(),
        notice: None,
        confetti_height: settings.confetti_height,
        keymap: KeyMap::default(),
        status_style: Style::new().foreground(lipgloss::Color::from("#4c8c2b")),
        notice_style: Style::new().foreground(lipgloss::Color::from("#d75f5f")),
    };
    m.sync_controls();
    m
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}

impl Model {
    /// The countdown engine.
    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    /// The duration field.
    pub fn input(&self) -> &input::Model {
        &self.input
    }

    /// The celebration.
    pub fn celebration(&self) -> &celebration::Model {
        &self.celebration
    }

    /// The last rejected-input notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Current ring geometry.
    pub fn geometry(&self) -> RingGeometry {
        let s = self.engine.state();
        RingGeometry::compute(
            s.remaining_minutes,
            s.remaining_seconds,
            s.configured_total_seconds(),
        )
    }

    /// Enables the controls that make sense in the current phase.
    fn sync_controls(&mut self) {
        let state = self.engine.state();
        let finished = state.is_finished;
        let running = state.is_running;
        let has_value = !self.input.is_empty();

        self.input.set_disabled(running || finished);
        self.keymap.set.set_enabled(!finished && !running && has_value);
        self.keymap.toggle.set_enabled(!finished && has_value);
        self.keymap
            .toggle
            .set_desc(if running { "pause" } else { "start" });
        self.keymap.stop.set_enabled(!finished);
        self.keymap.restart.set_enabled(finished);
        self.keymap.reset.set_enabled(finished);
    }

    /// Fits the confetti field into the rows the ring and controls leave
    /// free, up to the configured height.
    fn resize(&mut self, width: usize, height: usize) {
        let spare = height.saturating_sub(self.ring.height() + CHROME_ROWS);
        self.celebration
            .set_size(width, self.confetti_height.min(spare).max(1));
        self.help.width = width;
    }

    fn submit_duration(&mut self) {
        match self.input.minutes() {
            Ok(minutes) => {
                self.engine.set_configured_duration(minutes);
                self.notice = None;
            }
            Err(err) => {
                tracing::debug!(%err, value = self.input.value(), "duration input rejected");
                self.notice = Some(err.to_string());
            }
        }
    }

    fn handle_key(&mut self, msg: &Msg, key_msg: &KeyMsg) -> Option<Cmd> {
        let keys = &self.keymap;
        if keys.quit.matches(key_msg) {
            self.engine.dispose();
            self.celebration.stop();
            return Some(bubbletea_rs::quit());
        }
        if keys.help.matches(key_msg) {
            self.help.show_all = !self.help.show_all;
            return None;
        }
        if keys.toggle.matches(key_msg) {
            return self.engine.toggle();
        }
        if keys.stop.matches(key_msg) {
            self.engine.stop();
            return None;
        }
        if keys.set.matches(key_msg) {
            self.submit_duration();
            return None;
        }
        if key::matches(key_msg, &[&keys.restart, &keys.reset]) {
            self.celebration.stop();
            if self.keymap.restart.matches(key_msg) {
                return self.engine.restart();
            }
            self.engine.acknowledge_finish();
            return None;
        }
        if self.input.update(msg) {
            self.notice = None;
        }
        None
    }

    /// Routes a message to the engine, the field, and the celebration.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let cmd = if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            self.handle_key(&msg, key_msg)
        } else if let Some(finished) = msg.downcast_ref::<FinishedMsg>() {
            // A restart may already have been handled before the signal
            // arrived.
            if finished.id == self.engine.id() && self.engine.state().is_finished {
                Some(self.celebration.start())
            } else {
                None
            }
        } else if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.resize(size.width as usize, size.height as usize);
            None
        } else if let Some(cmd) = self.engine.update(&msg) {
            Some(cmd)
        } else {
            self.celebration.update(&msg)
        };
        self.sync_controls();
        cmd
    }

    fn status_line(&self) -> String {
        let text = match self.engine.phase() {
            Phase::Idle => "ready",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Finished => "finished",
        };
        self.status_style.render(text)
    }

    /// Renders the screen.
    pub fn view(&self) -> String {
        let mut sections = Vec::new();

        if self.engine.state().is_finished {
            let party = self.celebration.view();
            if !party.is_empty() {
                sections.push(party);
            }
        }
        sections.push(self.ring.view(&self.geometry()));
        sections.push(String::new());

        if !self.engine.state().is_finished {
            sections.push(self.input.view());
        }
        sections.push(self.status_line());
        if let Some(notice) = &self.notice {
            sections.push(self.notice_style.render(notice));
        }
        sections.push(String::new());
        sections.push(self.help.view(&self.keymap));

        sections.join("\n")
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (new(&[]), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
