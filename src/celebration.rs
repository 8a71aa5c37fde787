//! Completion celebration.
//!
//! When a countdown finishes, a banner is shown above a field of falling
//! confetti. Each piece gets a random horizontal position, size, hue, fall
//! duration and start delay. The random source is seedable so the layout can
//! be reproduced.
//!
//! The animation advances on its own frame messages, tagged like the other
//! animated components so that frames from a previous run are ignored.
//!
//! ```rust
//! use ringtimer::celebration;
//!
//! let mut party = celebration::with_seed(7);
//! let _frame = party.start();
//! assert_eq!(party.pieces().len(), celebration::DEFAULT_PIECES);
//! assert!(party.view().contains("Time is up!"));
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Number of confetti pieces.
pub const DEFAULT_PIECES: usize = 10;

const FPS: u64 = 20;
const DEFAULT_WIDTH: usize = 60;
const DEFAULT_HEIGHT: usize = 6;
const BANNER: &str = "🎉 Time is up! 🎉";

/// Frame message driving the confetti.
#[derive(Debug, Clone)]
pub struct FrameMsg {
    id: i64,
    tag: u64,
}

/// One falling piece of confetti.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    /// Horizontal position as a percentage of the field width, `0..100`.
    pub left_percent: f64,
    /// Edge length, `8..12`.
    pub size: f64,
    /// Hue in degrees, `0..360`. Saturation 80 %, lightness 60 %.
    pub hue: f64,
    /// Seconds to fall through the field, `1..2.5`.
    pub fall_secs: f64,
    /// Seconds before the first fall starts, `0..3`.
    pub delay_secs: f64,
}

impl ConfettiPiece {
    /// Draws a piece from `rng`.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            left_percent: rng.gen_range(0.0..100.0),
            size: rng.gen_range(8.0..12.0),
            hue: rng.gen_range(0.0..360.0),
            fall_secs: rng.gen_range(1.0..2.5),
            delay_secs: rng.gen_range(0.0..3.0),
        }
    }

    /// Hex color of the piece.
    pub fn color(&self) -> String {
        hsl_to_hex(self.hue, 0.8, 0.6)
    }

    /// Glyph for the piece's size.
    pub fn glyph(&self) -> char {
        if self.size < 9.5 {
            '▪'
        } else if self.size < 11.0 {
            '■'
        } else {
            '█'
        }
    }

    /// Cell of the piece after `elapsed`, or `None` before its delay ran out.
    ///
    /// Pieces loop: once at the bottom they restart at the top.
    pub fn position(&self, elapsed: Duration, width: usize, height: usize) -> Option<(usize, usize)> {
        if width == 0 || height == 0 {
            return None;
        }
        let t = elapsed.as_secs_f64() - self.delay_secs;
        if t < 0.0 {
            return None;
        }
        let phase = (t % self.fall_secs) / self.fall_secs;
        let row = ((phase * height as f64) as usize).min(height - 1);
        let col = ((self.left_percent / 100.0 * width as f64) as usize).min(width - 1);
        Some((col, row))
    }
}

/// Draws `count` pieces from `rng`.
pub fn scatter<R: Rng>(rng: &mut R, count: usize) -> Vec<ConfettiPiece> {
    (0..count).map(|_| ConfettiPiece::random(rng)).collect()
}

/// Converts HSL (hue in degrees, saturation and lightness in `0..=1`) to
/// `#rrggbb`.
pub fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

/// The celebration component.
#[derive(Debug, Clone)]
pub struct Model {
    id: i64,
    tag: u64,
    active: bool,
    elapsed: Duration,
    pieces: Vec<ConfettiPiece>,
    rng: StdRng,
    /// Number of pieces drawn by [`start`](Self::start).
    pub count: usize,
    /// Confetti field width in columns.
    pub width: usize,
    /// Confetti field height in rows.
    pub height: usize,
    /// Banner text.
    pub banner: String,
    /// Banner style.
    pub banner_style: Style,
}

fn with_rng(rng: StdRng) -> Model {
    Model {
        id: next_id(),
        tag: 0,
        active: false,
        elapsed: Duration::ZERO,
        pieces: Vec::new(),
        rng,
        count: DEFAULT_PIECES,
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        banner: BANNER.to_string(),
        banner_style: Style::new()
            .foreground(lipgloss::Color::from("#395929"))
            .bold(true),
    }
}

/// Creates a celebration seeded from the OS.
pub fn new() -> Model {
    with_rng(StdRng::from_entropy())
}

/// Creates a celebration with a reproducible random source.
pub fn with_seed(seed: u64) -> Model {
    with_rng(StdRng::seed_from_u64(seed))
}

impl Default for Model {
    fn default() -> Self {
        new()
    }
}

impl Model {
    /// Whether the animation is running.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Current pieces.
    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }

    /// Time since [`start`](Self::start), advanced per frame.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Resizes the confetti field.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Draws fresh pieces and starts animating.
    ///
    /// Returns the command for the first frame. Every later frame is returned
    /// by [`update`](Self::update) until [`stop`](Self::stop). Starting again
    /// re-scatters the pieces and invalidates frames of the previous run.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ringtimer::celebration;
    ///
    /// let mut a = celebration::with_seed(3);
    /// let mut b = celebration::with_seed(3);
    /// let _ = a.start();
    /// let _ = b.start();
    /// assert!(a.active());
    /// assert_eq!(a.pieces(), b.pieces());
    ///
    /// a.stop();
    /// assert!(!a.active());
    /// assert!(a.view().is_empty());
    /// ```
    pub fn start(&mut self) -> Cmd {
        self.pieces = scatter(&mut self.rng, self.count);
        self.elapsed = Duration::ZERO;
        self.active = true;
        self.tag += 1;
        tracing::debug!(id = self.id, pieces = self.pieces.len(), "celebration started");
        self.next_frame()
    }

    /// Stops animating and clears the pieces. Pending frames are ignored.
    pub fn stop(&mut self) {
        self.active = false;
        self.tag += 1;
        self.pieces.clear();
    }

    /// Advances one frame on a matching [`FrameMsg`].
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        let frame = msg.downcast_ref::<FrameMsg>()?;
        if !self.active || frame.id != self.id || frame.tag != self.tag {
            return None;
        }
        self.elapsed += frame_duration();
        Some(self.next_frame())
    }

    fn next_frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(frame_duration(), move |_| Box::new(FrameMsg { id, tag }) as Msg)
    }

    /// Renders the confetti field followed by the banner. Empty when inactive.
    pub fn view(&self) -> String {
        if !self.active {
            return String::new();
        }
        let mut grid: Vec<Vec<Option<&ConfettiPiece>>> = vec![vec![None; self.width]; self.height];
        for piece in &self.pieces {
            if let Some((col, row)) = piece.position(self.elapsed, self.width, self.height) {
                grid[row][col] = Some(piece);
            }
        }

        let mut lines: Vec<String> = grid
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Some(piece) => Style::new()
                            .foreground(lipgloss::Color::from(piece.color().as_str()))
                            .render(&piece.glyph().to_string()),
                        None => " ".to_string(),
                    })
                    .collect::<String>()
            })
            .collect();
        lines.push(self.banner_style.render(&self.banner));
        lines.join("\n")
    }
}

fn frame_duration() -> Duration {
    Duration::from_millis(1000 / FPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(m: &Model) -> Msg {
        Box::new(FrameMsg {
            id: m.id,
            tag: m.tag,
        }) as Msg
    }

    #[test]
    fn test_pieces_within_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for piece in scatter(&mut rng, 500) {
            assert!((0.0..100.0).contains(&piece.left_percent));
            assert!((8.0..12.0).contains(&piece.size));
            assert!((0.0..360.0).contains(&piece.hue));
            assert!((1.0..2.5).contains(&piece.fall_secs));
            assert!((0.0..3.0).contains(&piece.delay_secs));
        }
    }

    #[test]
    fn test_same_seed_same_confetti() {
        let mut a = with_seed(99);
        let mut b = with_seed(99);
        let _ = a.start();
        let _ = b.start();
        assert_eq!(a.pieces(), b.pieces());
    }

    #[test]
    fn test_count() {
        let mut m = with_seed(3);
        let _ = m.start();
        assert_eq!(m.pieces().len(), DEFAULT_PIECES);

        m.count = 25;
        let _ = m.start();
        assert_eq!(m.pieces().len(), 25);
    }

    #[test]
    fn test_hsl_to_hex() {
        assert_eq!(hsl_to_hex(0.0, 1.0, 0.5), "#ff0000");
        assert_eq!(hsl_to_hex(120.0, 1.0, 0.5), "#00ff00");
        assert_eq!(hsl_to_hex(240.0, 1.0, 0.5), "#0000ff");
        assert_eq!(hsl_to_hex(360.0, 1.0, 0.5), "#ff0000");
        assert_eq!(hsl_to_hex(0.0, 0.0, 1.0), "#ffffff");
    }

    #[test]
    fn test_position_respects_delay_and_loops() {
        let piece = ConfettiPiece {
            left_percent: 50.0,
            size: 10.0,
            hue: 10.0,
            fall_secs: 2.0,
            delay_secs: 1.0,
        };
        assert_eq!(piece.position(Duration::from_millis(500), 10, 4), None);
        assert_eq!(piece.position(Duration::from_secs(1), 10, 4), Some((5, 0)));
        assert_eq!(piece.position(Duration::from_secs(2), 10, 4), Some((5, 2)));
        assert_eq!(piece.position(Duration::from_secs(3), 10, 4), Some((5, 0)));
        assert_eq!(piece.position(Duration::from_secs(3), 0, 4), None);
    }

    #[test]
    fn test_frames_advance_only_when_matching() {
        let mut m = with_seed(5);
        let _ = m.start();
        let msg = frame(&m);
        assert!(m.update(&msg).is_some());
        assert_eq!(m.elapsed(), frame_duration());

        m.stop();
        assert!(m.update(&msg).is_none());
        assert!(!m.active());
        assert!(m.pieces().is_empty());
    }

    #[test]
    fn test_stale_frames_after_restart_are_ignored() {
        let mut m = with_seed(5);
        let _ = m.start();
        let old = frame(&m);
        let _ = m.start();
        assert!(m.update(&old).is_none());
        assert_eq!(m.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_view() {
        let mut m = with_seed(11);
        assert!(m.view().is_empty());

        m.set_size(20, 3);
        let _ = m.start();
        let view = lipgloss::strip_ansi(&m.view());
        let lines: Vec<&str> = view.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[..3].iter().all(|l| l.chars().count() == 20));
        assert!(lines[3].contains("Time is up!"));
    }

    #[test]
    fn test_pieces_become_visible() {
        let mut m = with_seed(21);
        m.set_size(40, 5);
        let _ = m.start();
        for _ in 0..(FPS * 3) {
            let msg = frame(&m);
            let _ = m.update(&msg);
        }
        let view = lipgloss::strip_ansi(&m.view());
        assert!(view.lines().take(5).any(|l| l.trim() != ""));
    }
}
