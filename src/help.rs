//! Key help line.
//!
//! Renders the bindings of a [`KeyMap`] either as a single line
//! (`space start • x stop • q quit`) or as aligned columns. Disabled bindings
//! are skipped, so the help always reflects what the user can press right
//! now. When a width is set, output that would overflow is cut off with an
//! ellipsis.
//!
//! ```rust
//! use ringtimer::help;
//! use ringtimer::key::{Binding, KeyMap};
//! use crossterm::event::KeyCode;
//!
//! struct Keys {
//!     start: Binding,
//!     quit: Binding,
//! }
//!
//! impl KeyMap for Keys {
//!     fn short_help(&self) -> Vec<&Binding> {
//!         vec![&self.start, &self.quit]
//!     }
//!     fn full_help(&self) -> Vec<Vec<&Binding>> {
//!         vec![vec![&self.start], vec![&self.quit]]
//!     }
//! }
//!
//! let keys = Keys {
//!     start: Binding::new(vec![KeyCode::Char(' ')]).with_help("space", "start"),
//!     quit: Binding::new(vec![KeyCode::Char('q')]).with_help("q", "quit"),
//! };
//! let line = help::Model::new().view(&keys);
//! assert!(line.contains("start"));
//! ```

pub use crate::key::KeyMap;

use crate::key;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Styles of the help view.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Ellipsis shown when output is cut.
    pub ellipsis: Style,
    /// Key labels in the short view.
    pub short_key: Style,
    /// Descriptions in the short view.
    pub short_desc: Style,
    /// Separator in the short view.
    pub short_separator: Style,
    /// Key labels in the full view.
    pub full_key: Style,
    /// Descriptions in the full view.
    pub full_desc: Style,
    /// Separator between columns of the full view.
    pub full_separator: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        let key_style = Style::new().foreground(AdaptiveColor {
            Light: "#909090",
            Dark: "#626262",
        });
        let desc_style = Style::new().foreground(AdaptiveColor {
            Light: "#B2B2B2",
            Dark: "#4A4A4A",
        });
        let sep_style = Style::new().foreground(AdaptiveColor {
            Light: "#DDDADA",
            Dark: "#3C3C3C",
        });

        Self {
            ellipsis: sep_style.clone(),
            short_key: key_style.clone(),
            short_desc: desc_style.clone(),
            short_separator: sep_style.clone(),
            full_key: key_style,
            full_desc: desc_style,
            full_separator: sep_style,
        }
    }
}

/// The help view.
#[derive(Debug, Clone)]
pub struct Model {
    /// Render the full, multi-column help instead of one line.
    pub show_all: bool,
    /// Maximum width; zero means unlimited.
    pub width: usize,
    /// Separator between short help items.
    pub short_separator: String,
    /// Separator between full help columns.
    pub full_separator: String,
    /// Marker appended when output is cut.
    pub ellipsis: String,
    /// Styles.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            show_all: false,
            width: 0,
            short_separator: " • ".to_string(),
            full_separator: "    ".to_string(),
            ellipsis: "…".to_string(),
            styles: Styles::default(),
        }
    }
}

impl Model {
    /// Creates a help view with default styles and no width limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `keymap` in the current mode.
    pub fn view<K: KeyMap>(&self, keymap: &K) -> String {
        if self.show_all {
            self.full_help_view(keymap.full_help())
        } else {
            self.short_help_view(keymap.short_help())
        }
    }

    /// Renders bindings on one line.
    pub fn short_help_view(&self, bindings: Vec<&key::Binding>) -> String {
        let separator = self
            .styles
            .short_separator
            .clone()
            .inline(true)
            .render(&self.short_separator);

        let mut out = String::new();
        let mut total_width = 0;
        for kb in bindings.into_iter().filter(|b| b.enabled()) {
            let sep = if total_width > 0 { separator.as_str() } else { "" };
            let help = kb.help();
            let item = format!(
                "{}{} {}",
                sep,
                self.styles.short_key.clone().inline(true).render(&help.key),
                self.styles.short_desc.clone().inline(true).render(&help.desc)
            );
            let item_width = lipgloss::width_visible(&item);

            if let Some(tail) = self.overflow_tail(total_width, item_width) {
                out.push_str(&tail);
                break;
            }
            total_width += item_width;
            out.push_str(&item);
        }
        out
    }

    /// Renders groups of bindings as columns.
    pub fn full_help_view(&self, groups: Vec<Vec<&key::Binding>>) -> String {
        let separator = self
            .styles
            .full_separator
            .clone()
            .inline(true)
            .render(&self.full_separator);

        let mut columns: Vec<String> = Vec::new();
        let mut total_width = 0;
        for group in groups.iter().filter(|g| should_render_column(g)) {
            let column = group
                .iter()
                .filter(|b| b.enabled())
                .map(|b| {
                    let help = b.help();
                    format!(
                        "{} {}",
                        self.styles.full_key.clone().inline(true).render(&help.key),
                        self.styles.full_desc.clone().inline(true).render(&help.desc)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            let column_width = lipgloss::width_visible(&column);

            if let Some(tail) = self.overflow_tail(total_width, column_width) {
                if !tail.is_empty() {
                    columns.push(tail);
                }
                break;
            }
            total_width += column_width;
            columns.push(column);
        }

        let mut parts: Vec<&str> = Vec::new();
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                parts.push(separator.as_str());
            }
            parts.push(column.as_str());
        }
        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }

    /// `None` if an item of `item_width` still fits, otherwise the tail to
    /// append (an ellipsis, or nothing if even that does not fit).
    fn overflow_tail(&self, total_width: usize, item_width: usize) -> Option<String> {
        if self.width == 0 || total_width + item_width <= self.width {
            return None;
        }
        let tail = format!(
            " {}",
            self.styles
                .ellipsis
                .clone()
                .inline(true)
                .render(&self.ellipsis)
        );
        if total_width + lipgloss::width_visible(&tail) < self.width {
            Some(tail)
        } else {
            Some(String::new())
        }
    }
}

/// Whether any binding of a column is enabled.
pub fn should_render_column(bindings: &[&key::Binding]) -> bool {
    bindings.iter().any(|b| b.enabled())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    struct Keys {
        start: key::Binding,
        stop: key::Binding,
        quit: key::Binding,
    }

    impl KeyMap for Keys {
        fn short_help(&self) -> Vec<&key::Binding> {
            vec![&self.start, &self.stop, &self.quit]
        }

        fn full_help(&self) -> Vec<Vec<&key::Binding>> {
            vec![vec![&self.start, &self.stop], vec![&self.quit]]
        }
    }

    fn keys() -> Keys {
        Keys {
            start: key::Binding::new(vec![KeyCode::Char(' ')]).with_help("space", "start"),
            stop: key::Binding::new(vec![KeyCode::Char('x')]).with_help("x", "stop"),
            quit: key::Binding::new(vec![KeyCode::Char('q')]).with_help("q", "quit"),
        }
    }

    fn plain(s: &str) -> String {
        lipgloss::strip_ansi(s)
    }

    #[test]
    fn test_short_view() {
        let view = plain(&Model::new().view(&keys()));
        assert_eq!(view, "space start • x stop • q quit");
    }

    #[test]
    fn test_disabled_bindings_are_hidden() {
        let mut k = keys();
        k.stop.set_enabled(false);
        let view = plain(&Model::new().view(&k));
        assert_eq!(view, "space start • q quit");
    }

    #[test]
    fn test_width_truncates_with_ellipsis() {
        let mut help = Model::new();
        help.width = 18;
        let view = plain(&help.view(&keys()));
        assert!(view.starts_with("space start"));
        assert!(view.ends_with('…'));
        assert!(!view.contains("quit"));
    }

    #[test]
    fn test_full_view_has_columns() {
        let mut help = Model::new();
        help.show_all = true;
        let view = plain(&help.view(&keys()));
        let lines: Vec<&str> = view.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("space start"));
        assert!(lines[0].contains("q quit"));
        assert!(lines[1].contains("x stop"));
    }

    #[test]
    fn test_empty_column_is_skipped() {
        let mut k = keys();
        k.quit.set_enabled(false);
        assert!(!should_render_column(&[&k.quit]));
        assert!(should_render_column(&[&k.start, &k.quit]));
    }
}
