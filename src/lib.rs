#![warn(missing_docs)]

//! # ringtimer
//!
//! A countdown timer for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! terminal applications: a circular progress ring that empties as time runs
//! out, a duration field, start/pause/stop controls, and a confetti
//! celebration when the countdown completes.
//!
//! ## Components
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`engine`] | Countdown state machine driven by one-second ticks |
//! | [`schedule`] | Cancellable tick registration used by the engine |
//! | [`ring`] | Ring geometry and its terminal rendering |
//! | [`input`] | Digit-only duration field |
//! | [`celebration`] | Seedable falling-confetti animation |
//! | [`help`] | One-line and multi-column key help |
//! | [`app`] | The complete timer screen |
//!
//! Every component follows the Elm architecture: state is changed in
//! `update()` in response to messages, and `view()` renders it as a string.
//!
//! ## Quick start
//!
//! ```rust
//! use ringtimer::prelude::*;
//!
//! let mut engine = engine_new(1);
//! let _first_tick = engine.start();
//! assert!(engine.state().is_running);
//!
//! engine.stop();
//! let s = engine.state();
//! let geometry = RingGeometry::compute(s.remaining_minutes, s.remaining_seconds, s.configured_total_seconds());
//! assert_eq!(geometry.label, "01:00");
//! assert_eq!(geometry.fraction, 1.0);
//! ```
//!
//! Running the full screen needs a bubbletea-rs program:
//!
//! ```rust,no_run
//! use bubbletea_rs::Program;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let program = Program::<ringtimer::TimerScreen>::builder()
//!         .alt_screen(true)
//!         .build()?;
//!     program.run().await?;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod celebration;
pub mod engine;
pub mod help;
pub mod input;
pub mod key;
pub mod options;
pub mod ring;
pub mod schedule;

use bubbletea_rs::Cmd;

/// Components that can take keyboard focus.
///
/// A focused component reacts to key messages; a blurred one ignores them.
///
/// ```rust
/// use ringtimer::prelude::*;
///
/// let mut field = input_new(25);
/// assert!(!field.focused());
/// let _ = field.focus();
/// assert!(field.focused());
/// field.blur();
/// assert!(!field.focused());
/// ```
pub trait Component {
    /// Focuses the component. May return a command, e.g. to start a blink.
    fn focus(&mut self) -> Option<Cmd>;

    /// Removes focus.
    fn blur(&mut self);

    /// Whether the component is focused.
    fn focused(&self) -> bool;
}

pub use app::{KeyMap as TimerKeyMap, Model as TimerScreen};
pub use celebration::{ConfettiPiece, FrameMsg as CelebrationFrameMsg, Model as Celebration};
pub use engine::{CountdownEngine, FinishedMsg, Phase, TimerState};
pub use help::Model as HelpModel;
pub use input::{InputError, Model as DurationInput};
pub use key::{Binding, KeyMap, KeyPress};
pub use options::{AppOption, Settings};
pub use ring::{Model as Ring, RingGeometry};
pub use schedule::{CancelToken, TickHandle, TickMsg};

/// Commonly used types and constructors.
pub mod prelude {
    pub use crate::app::{new as timer_screen_new, Model as TimerScreen};
    pub use crate::celebration::{new as celebration_new, with_seed as celebration_with_seed};
    pub use crate::engine::{
        new as engine_new, new_with_period as engine_new_with_period, CountdownEngine,
        FinishedMsg, Phase, TimerState,
    };
    pub use crate::input::{new as input_new, parse_minutes, InputError, Model as DurationInput};
    pub use crate::key::{Binding, KeyMap};
    pub use crate::ring::{new as ring_new, Model as Ring, RingGeometry};
    pub use crate::schedule::TickMsg;
    pub use crate::Component;
}
