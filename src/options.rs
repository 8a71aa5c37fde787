//! Options for the timer screen.
//!
//! The screen is configured the same way as the individual components: a
//! slice of options passed to the constructor, each one adjusting a field of
//! [`Settings`].
//!
//! ```rust
//! use ringtimer::options::{self, Settings};
//!
//! let settings = Settings::from_options(&[
//!     options::with_default_minutes(50),
//!     options::with_confetti_count(20),
//!     options::with_seed(42),
//! ]);
//! assert_eq!(settings.default_minutes, 50);
//! assert_eq!(settings.confetti_count, 20);
//! assert_eq!(settings.seed, Some(42));
//! ```

use crate::celebration::DEFAULT_PIECES;
use crate::engine::{DEFAULT_MINUTES, MAX_MINUTES, TICK_PERIOD};
use std::time::Duration;

const DEFAULT_RING_RADIUS: usize = 6;
const DEFAULT_CONFETTI_HEIGHT: usize = 6;

/// Resolved settings of the timer screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Duration configured at start-up, in minutes.
    pub default_minutes: u32,
    /// Period between ticks.
    pub tick_period: Duration,
    /// Ring radius in rows.
    pub ring_radius: usize,
    /// Number of confetti pieces.
    pub confetti_count: usize,
    /// Rows of the confetti field.
    pub confetti_height: usize,
    /// Seed for the confetti; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_minutes: DEFAULT_MINUTES,
            tick_period: TICK_PERIOD,
            ring_radius: DEFAULT_RING_RADIUS,
            confetti_count: DEFAULT_PIECES,
            confetti_height: DEFAULT_CONFETTI_HEIGHT,
            seed: None,
        }
    }
}

impl Settings {
    /// Applies `opts` in order on top of the defaults.
    pub fn from_options(opts: &[AppOption]) -> Self {
        let mut s = Self::default();
        for opt in opts {
            opt.apply(&mut s);
        }
        s
    }
}

/// A single setting override.
#[derive(Debug, Clone)]
pub enum AppOption {
    /// Start-up duration; clamped to `1..=999`.
    WithDefaultMinutes(u32),
    /// Tick period. Each tick still removes one second.
    WithTickPeriod(Duration),
    /// Ring radius in rows.
    WithRingRadius(usize),
    /// Number of confetti pieces.
    WithConfettiCount(usize),
    /// Rows of the confetti field.
    WithConfettiHeight(usize),
    /// Fixed confetti seed.
    WithSeed(u64),
}

impl AppOption {
    fn apply(&self, s: &mut Settings) {
        match self {
            AppOption::WithDefaultMinutes(m) => s.default_minutes = (*m).clamp(1, MAX_MINUTES),
            AppOption::WithTickPeriod(p) => s.tick_period = *p,
            AppOption::WithRingRadius(r) => s.ring_radius = *r,
            AppOption::WithConfettiCount(n) => s.confetti_count = *n,
            AppOption::WithConfettiHeight(h) => s.confetti_height = *h,
            AppOption::WithSeed(seed) => s.seed = Some(*seed),
        }
    }
}

/// Sets the start-up duration.
pub fn with_default_minutes(minutes: u32) -> AppOption {
    AppOption::WithDefaultMinutes(minutes)
}

/// Sets the tick period.
pub fn with_tick_period(period: Duration) -> AppOption {
    AppOption::WithTickPeriod(period)
}

/// Sets the ring radius in rows.
pub fn with_ring_radius(rows: usize) -> AppOption {
    AppOption::WithRingRadius(rows)
}

/// Sets the number of confetti pieces.
pub fn with_confetti_count(count: usize) -> AppOption {
    AppOption::WithConfettiCount(count)
}

/// Sets the confetti field height.
pub fn with_confetti_height(rows: usize) -> AppOption {
    AppOption::WithConfettiHeight(rows)
}

/// Fixes the confetti seed.
pub fn with_seed(seed: u64) -> AppOption {
    AppOption::WithSeed(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::from_options(&[]);
        assert_eq!(s, Settings::default());
        assert_eq!(s.default_minutes, 25);
        assert_eq!(s.tick_period, Duration::from_secs(1));
        assert_eq!(s.confetti_count, 10);
        assert_eq!(s.seed, None);
    }

    #[test]
    fn test_default_minutes_clamped() {
        assert_eq!(
            Settings::from_options(&[with_default_minutes(0)]).default_minutes,
            1
        );
        assert_eq!(
            Settings::from_options(&[with_default_minutes(5000)]).default_minutes,
            999
        );
    }

    #[test]
    fn test_later_options_win() {
        let s = Settings::from_options(&[
            with_ring_radius(4),
            with_ring_radius(9),
            with_tick_period(Duration::from_millis(10)),
            with_confetti_height(3),
        ]);
        assert_eq!(s.ring_radius, 9);
        assert_eq!(s.tick_period, Duration::from_millis(10));
        assert_eq!(s.confetti_height, 3);
    }
}
