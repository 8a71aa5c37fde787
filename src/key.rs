//! Type-safe key bindings.
//!
//! A [`Binding`] groups one or more key presses under a single action and
//! carries the help text shown by the [`help`](crate::help) component.
//! Bindings can be disabled, in which case they never match and are left out
//! of help output.
//!
//! ```rust
//! use ringtimer::key::{self, Binding, KeyPress};
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let toggle = Binding::new(vec![KeyCode::Char(' '), KeyCode::Char('s')])
//!     .with_help("space/s", "start/pause");
//! assert!(toggle.enabled());
//!
//! let quit = key::new_binding(vec![key::with_keys_str(&["q", "ctrl+c"])])
//!     .with_help("q", "quit");
//! assert!(quit.keys().contains(&KeyPress::from((KeyCode::Char('c'), KeyModifiers::CONTROL))));
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key together with the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key code.
    pub code: KeyCode,
    /// Required modifiers. `NONE` means no modifier other than shift.
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

impl KeyPress {
    /// Parses a key description such as `"q"`, `"enter"` or `"ctrl+c"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let mut rest = s;
        loop {
            if let Some(r) = rest.strip_prefix("ctrl+") {
                modifiers |= KeyModifiers::CONTROL;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("alt+") {
                modifiers |= KeyModifiers::ALT;
                rest = r;
            } else {
                break;
            }
        }

        let code = match rest {
            "enter" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(Self { code, modifiers })
    }

    fn matches(&self, msg: &KeyMsg) -> bool {
        if self.code != msg.key {
            return false;
        }
        // Shift is implied by the character itself for printable keys.
        let relevant = msg.modifiers & !KeyModifiers::SHIFT;
        relevant == self.modifiers
    }
}

/// Help text attached to a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Short key label, e.g. `"space"`.
    pub key: String,
    /// What the key does, e.g. `"start"`.
    pub desc: String,
}

/// A set of key presses bound to one action.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates an enabled binding without help text.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Returns the bound key presses.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// Returns the help text.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Replaces the help description, keeping the key label.
    pub fn set_desc(&mut self, desc: impl Into<String>) {
        self.help.desc = desc.into();
    }

    /// Whether the binding can currently match.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Reports whether `msg` triggers this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled() && self.keys.iter().any(|k| k.matches(msg))
    }
}

/// Builder option accepted by [`new_binding`].
pub enum BindingOpt {
    /// Key presses to bind.
    Keys(Vec<KeyPress>),
    /// Help label and description.
    Help(String, String),
    /// Starts the binding disabled.
    Disabled,
}

/// Builds a binding from a list of options.
pub fn new_binding(opts: Vec<BindingOpt>) -> Binding {
    let mut b = Binding::new(Vec::<KeyPress>::new());
    for opt in opts {
        match opt {
            BindingOpt::Keys(keys) => b.keys = keys,
            BindingOpt::Help(key, desc) => b.help = Help { key, desc },
            BindingOpt::Disabled => b.disabled = true,
        }
    }
    b
}

/// Binds keys given as strings. Unknown descriptions are skipped.
pub fn with_keys_str(keys: &[&str]) -> BindingOpt {
    BindingOpt::Keys(keys.iter().filter_map(|k| KeyPress::parse(k)).collect())
}

/// Attaches help text.
pub fn with_help(key: &str, desc: &str) -> BindingOpt {
    BindingOpt::Help(key.to_string(), desc.to_string())
}

/// Starts the binding disabled.
pub fn with_disabled() -> BindingOpt {
    BindingOpt::Disabled
}

/// Reports whether `msg` triggers any of `bindings`.
pub fn matches(msg: &KeyMsg, bindings: &[&Binding]) -> bool {
    bindings.iter().any(|b| b.matches(msg))
}

/// Key bindings that can describe themselves for the help view.
pub trait KeyMap {
    /// Bindings for the one-line help.
    fn short_help(&self) -> Vec<&Binding>;
    /// Bindings grouped into columns for the expanded help.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers,
        }
    }

    #[test]
    fn test_binding_matches_plain_key() {
        let b = Binding::new(vec![KeyCode::Char('s')]).with_help("s", "start");
        assert!(b.matches(&key(KeyCode::Char('s'), KeyModifiers::NONE)));
        assert!(!b.matches(&key(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert_eq!(b.help().key, "s");
        assert_eq!(b.help().desc, "start");
    }

    #[test]
    fn test_shift_is_ignored_for_printable_keys() {
        let b = Binding::new(vec![KeyCode::Char('R')]);
        assert!(b.matches(&key(KeyCode::Char('R'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn test_modifiers_must_match() {
        let b = new_binding(vec![with_keys_str(&["ctrl+c"])]);
        assert!(b.matches(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!b.matches(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut b = Binding::new(vec![KeyCode::Enter]);
        b.set_enabled(false);
        assert!(!b.enabled());
        assert!(!b.matches(&key(KeyCode::Enter, KeyModifiers::NONE)));

        let b = new_binding(vec![with_keys_str(&["enter"]), with_disabled()]);
        assert!(!b.enabled());
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(KeyPress::parse("enter"), Some(KeyPress::from(KeyCode::Enter)));
        assert_eq!(
            KeyPress::parse("space"),
            Some(KeyPress::from(KeyCode::Char(' ')))
        );
        assert_eq!(KeyPress::parse("nonsense"), None);
    }

    #[test]
    fn test_matches_any() {
        let a = Binding::new(vec![KeyCode::Char('a')]);
        let b = Binding::new(vec![KeyCode::Char('b')]);
        assert!(matches(&key(KeyCode::Char('b'), KeyModifiers::NONE), &[&a, &b]));
        assert!(!matches(&key(KeyCode::Char('c'), KeyModifiers::NONE), &[&a, &b]));
    }
}
