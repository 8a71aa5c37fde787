//! Circular progress ring.
//!
//! The ring has two halves. [`RingGeometry::compute`] is a pure mapping from
//! remaining and configured time to the label and arc parameters of an
//! SVG-style stroke ring (radius 75, stroke width 60). [`Model`] draws that
//! geometry into terminal cells: the filled arc starts at 12 o'clock and
//! sweeps clockwise, the rest of the ring is drawn as a track, and the label
//! sits in the centre.
//!
//! ```rust
//! use ringtimer::ring::{self, RingGeometry};
//!
//! let geometry = RingGeometry::compute(12, 30, 25 * 60);
//! assert_eq!(geometry.label, "12:30");
//! assert!((geometry.fraction - 0.5).abs() < 1e-9);
//!
//! let ring = ring::new(&[ring::with_radius(5)]);
//! let view = ring.view(&geometry);
//! assert_eq!(view.lines().count(), 11);
//! ```

use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use std::f64::consts::{PI, TAU};
use unicode_width::UnicodeWidthStr;

/// Radius of the ring's stroke centre line.
pub const RADIUS: f64 = 75.0;

/// Width of the ring's stroke.
pub const STROKE_WIDTH: f64 = 60.0;

/// Radius of the inner disc that holds the label.
pub const INNER_RADIUS: f64 = 45.0;

const DEFAULT_CELL_RADIUS: usize = 6;
const MIN_CELL_RADIUS: usize = 4;

/// Length of the ring's stroke centre line.
pub fn circumference() -> f64 {
    2.0 * PI * RADIUS
}

/// Formats remaining time as `MM:SS`.
///
/// Minutes are padded to two digits but never truncated, so `125` minutes
/// render as `125:00`.
pub fn format_label(minutes: u32, seconds: u32) -> String {
    format!("{:02}:{:02}", minutes, seconds)
}

/// Remaining over configured time, clamped to `[0, 1]`.
///
/// A configured total of zero yields `0.0`.
pub fn progress_fraction(remaining_total_seconds: u32, configured_total_seconds: u32) -> f64 {
    if configured_total_seconds == 0 {
        return 0.0;
    }
    (remaining_total_seconds as f64 / configured_total_seconds as f64).clamp(0.0, 1.0)
}

/// Everything needed to draw the ring for one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct RingGeometry {
    /// `MM:SS` label.
    pub label: String,
    /// Share of the ring that is filled, `0.0..=1.0`.
    pub fraction: f64,
    /// Stroke length of the full ring.
    pub circumference: f64,
    /// Dash offset hiding the unfilled part: `circumference * (1 - fraction)`.
    pub offset: f64,
}

impl RingGeometry {
    /// Computes the geometry. Pure; identical inputs give identical output.
    ///
    /// The fraction is remaining over configured time, clamped to `[0, 1]`,
    /// and is `0.0` when nothing is configured. Totals saturate instead of
    /// overflowing, so any input is accepted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ringtimer::ring::{circumference, RingGeometry};
    ///
    /// let full = RingGeometry::compute(25, 0, 25 * 60);
    /// assert_eq!(full.label, "25:00");
    /// assert_eq!(full.fraction, 1.0);
    /// assert_eq!(full.offset, 0.0);
    ///
    /// let empty = RingGeometry::compute(0, 0, 25 * 60);
    /// assert_eq!(empty.label, "00:00");
    /// assert_eq!(empty.offset, circumference());
    ///
    /// // Nothing configured: an empty ring rather than a division by zero.
    /// assert_eq!(RingGeometry::compute(0, 30, 0).fraction, 0.0);
    /// ```
    pub fn compute(
        remaining_minutes: u32,
        remaining_seconds: u32,
        configured_total_seconds: u32,
    ) -> Self {
        let remaining = remaining_minutes
            .saturating_mul(60)
            .saturating_add(remaining_seconds);
        let fraction = progress_fraction(remaining, configured_total_seconds);
        let circumference = circumference();
        Self {
            label: format_label(remaining_minutes, remaining_seconds),
            fraction,
            circumference,
            offset: circumference * (1.0 - fraction),
        }
    }
}

/// Options for [`new`].
pub enum RingOption {
    /// Outer radius in terminal rows.
    WithRadius(usize),
    /// Color of the filled arc.
    WithFillColor(String),
    /// Color of the unfilled track.
    WithTrackColor(String),
    /// Color of the label.
    WithLabelColor(String),
    /// Characters for filled and unfilled cells.
    WithFillCharacters(char, char),
    /// Hides the label.
    WithoutLabel,
}

impl RingOption {
    fn apply(&self, m: &mut Model) {
        match self {
            RingOption::WithRadius(r) => m.radius = (*r).max(MIN_CELL_RADIUS),
            RingOption::WithFillColor(c) => m.fill_color = c.clone(),
            RingOption::WithTrackColor(c) => m.track_color = c.clone(),
            RingOption::WithLabelColor(c) => m.label_color = c.clone(),
            RingOption::WithFillCharacters(full, empty) => {
                m.full = *full;
                m.empty = *empty;
            }
            RingOption::WithoutLabel => m.show_label = false,
        }
    }
}

/// Sets the outer radius in rows. Values below 4 are raised to 4 so the
/// label fits inside the ring.
pub fn with_radius(rows: usize) -> RingOption {
    RingOption::WithRadius(rows)
}

/// Sets the fill color.
pub fn with_fill_color(color: impl Into<String>) -> RingOption {
    RingOption::WithFillColor(color.into())
}

/// Sets the track color.
pub fn with_track_color(color: impl Into<String>) -> RingOption {
    RingOption::WithTrackColor(color.into())
}

/// Sets the label color.
pub fn with_label_color(color: impl Into<String>) -> RingOption {
    RingOption::WithLabelColor(color.into())
}

/// Sets the filled and unfilled characters.
pub fn with_fill_characters(full: char, empty: char) -> RingOption {
    RingOption::WithFillCharacters(full, empty)
}

/// Hides the centre label.
pub fn without_label() -> RingOption {
    RingOption::WithoutLabel
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Blank,
    Fill,
    Track,
}

/// Terminal renderer for [`RingGeometry`].
#[derive(Debug, Clone)]
pub struct Model {
    /// Outer radius in rows. The ring is twice as many columns wide to
    /// compensate for tall terminal cells.
    pub radius: usize,
    /// Filled cell character.
    pub full: char,
    /// Track cell character.
    pub empty: char,
    /// Filled arc color.
    pub fill_color: String,
    /// Track color.
    pub track_color: String,
    /// Label color.
    pub label_color: String,
    /// Whether the label is drawn.
    pub show_label: bool,
}

/// Creates a ring renderer.
pub fn new(opts: &[RingOption]) -> Model {
    let mut m = Model {
        radius: DEFAULT_CELL_RADIUS,
        full: '█',
        empty: '░',
        fill_color: "#4c8c2b".to_string(),
        track_color: "#eeeeee".to_string(),
        label_color: "#395929".to_string(),
        show_label: true,
    };
    for opt in opts {
        opt.apply(&mut m);
    }
    m
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}

impl Model {
    /// Number of rows produced by [`view`](Self::view).
    pub fn height(&self) -> usize {
        2 * self.radius + 1
    }

    /// Number of columns produced by [`view`](Self::view).
    pub fn width(&self) -> usize {
        4 * self.radius + 1
    }

    fn classify(&self, row: usize, col: usize, fraction: f64) -> Cell {
        let outer = self.radius as f64;
        let inner = outer * INNER_RADIUS / (RADIUS + STROKE_WIDTH / 2.0);
        let dy = row as f64 - outer;
        let dx = (col as f64 - 2.0 * outer) / 2.0;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > outer + 0.3 || dist < inner {
            return Cell::Blank;
        }

        // Angle measured clockwise from 12 o'clock; rows grow downwards.
        let mut angle = dx.atan2(-dy);
        if angle < 0.0 {
            angle += TAU;
        }
        if angle / TAU < fraction {
            Cell::Fill
        } else {
            Cell::Track
        }
    }

    /// Renders the ring. Every line has the same visible width.
    ///
    /// The output has [`height`](Self::height) lines of
    /// [`width`](Self::width) cells. Filled cells sweep clockwise from
    /// 12 o'clock over `geometry.fraction` of the ring, the remainder is drawn
    /// as track, and the label is centred on the middle row unless hidden
    /// with [`without_label`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lipgloss_extras::lipgloss;
    /// use ringtimer::ring::{self, RingGeometry};
    ///
    /// let ring = ring::new(&[ring::with_radius(4), ring::with_fill_characters('#', '.')]);
    /// let view = lipgloss::strip_ansi(&ring.view(&RingGeometry::compute(0, 30, 60)));
    ///
    /// assert_eq!(view.lines().count(), ring.height());
    /// assert!(view.lines().nth(4).unwrap_or_default().contains("00:30"));
    /// assert!(view.contains('#') && view.contains('.'));
    /// ```
    pub fn view(&self, geometry: &RingGeometry) -> String {
        let fill_style = Style::new().foreground(lipgloss::Color::from(self.fill_color.as_str()));
        let track_style =
            Style::new().foreground(lipgloss::Color::from(self.track_color.as_str()));
        let label_style = Style::new()
            .foreground(lipgloss::Color::from(self.label_color.as_str()))
            .bold(true);

        let width = self.width();
        let label_width = geometry.label.width();
        let label_start = (width.saturating_sub(label_width)) / 2;

        let mut lines = Vec::with_capacity(self.height());
        for row in 0..self.height() {
            let mut line = String::new();
            let mut col = 0;
            while col < width {
                if self.show_label && row == self.radius && col == label_start {
                    line.push_str(&label_style.render(&geometry.label));
                    col += label_width;
                    continue;
                }

                // Group runs of identical cells into one styled segment.
                let kind = self.classify(row, col, geometry.fraction);
                let mut run = 1;
                while col + run < width
                    && self.classify(row, col + run, geometry.fraction) == kind
                    && !(self.show_label && row == self.radius && col + run == label_start)
                {
                    run += 1;
                }
                match kind {
                    Cell::Blank => line.push_str(&" ".repeat(run)),
                    Cell::Fill => {
                        line.push_str(&fill_style.render(&self.full.to_string().repeat(run)))
                    }
                    Cell::Track => {
                        line.push_str(&track_style.render(&self.empty.to_string().repeat(run)))
                    }
                }
                col += run;
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> String {
        lipgloss::strip_ansi(s)
    }

    #[test]
    fn test_label_formatting() {
        assert_eq!(format_label(0, 0), "00:00");
        assert_eq!(format_label(5, 7), "05:07");
        assert_eq!(format_label(25, 0), "25:00");
        assert_eq!(format_label(125, 59), "125:59");
        assert_eq!(format_label(999, 0), "999:00");
    }

    #[test]
    fn test_fraction() {
        assert_eq!(progress_fraction(1500, 1500), 1.0);
        assert_eq!(progress_fraction(0, 1500), 0.0);
        assert!((progress_fraction(750, 1500) - 0.5).abs() < 1e-12);
        // Remaining above configured is clamped.
        assert_eq!(progress_fraction(3000, 1500), 1.0);
    }

    #[test]
    fn test_zero_configured_total() {
        let g = RingGeometry::compute(3, 0, 0);
        assert_eq!(g.fraction, 0.0);
        assert!((g.offset - g.circumference).abs() < 1e-9);
        assert_eq!(g.label, "03:00");
    }

    #[test]
    fn test_offset() {
        let full = RingGeometry::compute(25, 0, 1500);
        assert_eq!(full.offset, 0.0);

        let half = RingGeometry::compute(12, 30, 1500);
        assert!((half.offset - circumference() / 2.0).abs() < 1e-9);

        let empty = RingGeometry::compute(0, 0, 1500);
        assert!((empty.offset - circumference()).abs() < 1e-9);
    }

    #[test]
    fn test_geometry_is_pure() {
        let a = RingGeometry::compute(7, 13, 600);
        let b = RingGeometry::compute(7, 13, 600);
        assert_eq!(a, b);
        assert_eq!(a.fraction.to_bits(), b.fraction.to_bits());
    }

    #[test]
    fn test_options() {
        let ring = new(&[
            with_radius(8),
            with_fill_color("#ff0000"),
            with_track_color("#00ff00"),
            with_label_color("#0000ff"),
            with_fill_characters('#', '.'),
            without_label(),
        ]);
        assert_eq!(ring.radius, 8);
        assert_eq!(ring.fill_color, "#ff0000");
        assert_eq!(ring.track_color, "#00ff00");
        assert_eq!(ring.label_color, "#0000ff");
        assert_eq!((ring.full, ring.empty), ('#', '.'));
        assert!(!ring.show_label);

        assert_eq!(new(&[with_radius(1)]).radius, MIN_CELL_RADIUS);
    }

    #[test]
    fn test_view_dimensions_and_label() {
        let ring = new(&[]);
        let view = plain(&ring.view(&RingGeometry::compute(25, 0, 1500)));
        let lines: Vec<&str> = view.lines().collect();
        assert_eq!(lines.len(), ring.height());
        for line in &lines {
            assert_eq!(line.chars().count(), ring.width());
        }
        assert!(lines[ring.radius].contains("25:00"));
    }

    #[test]
    fn test_view_full_and_empty() {
        let ring = new(&[with_fill_characters('#', '.')]);

        let full = plain(&ring.view(&RingGeometry::compute(10, 0, 600)));
        assert!(full.contains('#'));
        assert!(!full.contains('.'));

        let empty = plain(&ring.view(&RingGeometry::compute(0, 0, 600)));
        assert!(!empty.contains('#'));
        assert!(empty.contains('.'));
    }

    #[test]
    fn test_half_ring_fills_right_side() {
        let ring = new(&[with_fill_characters('#', '.'), without_label()]);
        let view = plain(&ring.view(&RingGeometry::compute(5, 0, 600)));
        let middle: Vec<char> = view
            .lines()
            .nth(ring.radius)
            .expect("middle row")
            .chars()
            .collect();
        let centre = ring.width() / 2;
        assert!(middle[centre + 1..].contains(&'#'));
        assert!(!middle[..centre].contains(&'#'));
        assert!(middle[..centre].contains(&'.'));
    }

    #[test]
    fn test_view_is_deterministic() {
        let ring = new(&[]);
        let g = RingGeometry::compute(3, 21, 300);
        assert_eq!(ring.view(&g), ring.view(&g));
    }

    #[test]
    fn test_compute_saturates_huge_minutes() {
        let g = RingGeometry::compute(80_000_000, 0, 60);
        assert_eq!(g.label, "80000000:00");
        assert_eq!(g.fraction, 1.0);
        assert_eq!(g.offset, 0.0);
    }

    #[test]
    fn test_wide_label_is_centred() {
        let ring = new(&[]);
        let view = plain(&ring.view(&RingGeometry::compute(125, 0, 999 * 60)));
        let middle = view.lines().nth(ring.radius).expect("middle row");
        assert!(middle.contains("125:00"));
        assert_eq!(middle.chars().count(), ring.width());
    }
}
