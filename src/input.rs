//! Duration entry field.
//!
//! A single-line field that only ever holds a whole number of minutes. Non
//! digits are dropped as they are typed, values above the maximum are
//! clamped, and the field may be empty while the user edits it. Turning the
//! text into a duration goes through [`parse_minutes`], which reports why a
//! value cannot be used.
//!
//! ```rust
//! use ringtimer::input::{self, InputError};
//!
//! let mut field = input::new(25);
//! assert_eq!(field.minutes(), Ok(25));
//!
//! field.set_text("");
//! assert_eq!(field.minutes(), Err(InputError::Empty));
//!
//! field.set_text("1234");
//! assert_eq!(field.value(), "999");
//! ```

use crate::engine::MAX_MINUTES;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use thiserror::Error;

/// Why a field value cannot be used as a duration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Nothing was entered.
    #[error("no duration entered")]
    Empty,
    /// The text is not a whole number.
    #[error("`{0}` is not a whole number of minutes")]
    NotNumeric(String),
    /// The number is zero.
    #[error("duration must be at least one minute")]
    NonPositive,
}

/// Parses a number of minutes, clamping values above [`MAX_MINUTES`].
pub fn parse_minutes(text: &str) -> Result<u32, InputError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InputError::Empty);
    }
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(InputError::NotNumeric(text.to_string()));
    }
    let digits = text.trim_start_matches('0');
    if digits.is_empty() {
        return Err(InputError::NonPositive);
    }
    // Anything longer than the maximum's digit count is over the maximum.
    let minutes = if digits.len() > 3 {
        MAX_MINUTES
    } else {
        digits.parse::<u32>().map_or(MAX_MINUTES, |m| m.min(MAX_MINUTES))
    };
    Ok(minutes)
}

/// Canonical field text for a digit string: leading zeros dropped, clamped.
fn normalize(digits: &str) -> String {
    if digits.is_empty() {
        return String::new();
    }
    match parse_minutes(digits) {
        Ok(m) => m.to_string(),
        Err(_) => "0".to_string(),
    }
}

/// Styles of the field.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Prompt in front of the value.
    pub prompt: Style,
    /// Entered text.
    pub text: Style,
    /// Placeholder shown when empty.
    pub placeholder: Style,
    /// Cursor block.
    pub cursor: Style,
    /// Everything when the field is disabled.
    pub disabled: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            prompt: Style::new().foreground(lipgloss::Color::from("#4c8c2b")),
            text: Style::new(),
            placeholder: Style::new().foreground(lipgloss::Color::from("240")),
            cursor: Style::new().reverse(true),
            disabled: Style::new().foreground(lipgloss::Color::from("240")),
        }
    }
}

/// The entry field.
#[derive(Debug, Clone)]
pub struct Model {
    value: String,
    focus: bool,
    disabled: bool,
    /// Text shown before the value.
    pub prompt: String,
    /// Text shown when the value is empty.
    pub placeholder: String,
    /// Styles.
    pub styles: Styles,
}

/// Creates a field holding `minutes`.
pub fn new(minutes: u32) -> Model {
    Model {
        value: normalize(&minutes.to_string()),
        focus: false,
        disabled: false,
        prompt: "minutes › ".to_string(),
        placeholder: "min".to_string(),
        styles: Styles::default(),
    }
}

impl Default for Model {
    fn default() -> Self {
        new(crate::engine::DEFAULT_MINUTES)
    }
}

impl Model {
    /// Raw field text. Always empty or a canonical number.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the field is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Parses the field.
    pub fn minutes(&self) -> Result<u32, InputError> {
        parse_minutes(&self.value)
    }

    /// Replaces the text. Non-digit characters are discarded.
    pub fn set_text(&mut self, text: &str) {
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        self.value = normalize(&digits);
    }

    /// Whether edits are refused.
    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Refuses or accepts edits.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn push(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        let mut candidate = self.value.clone();
        candidate.push(c);
        self.value = normalize(&candidate);
    }

    fn pop(&mut self) {
        let mut candidate = self.value.clone();
        candidate.pop();
        self.value = normalize(&candidate);
    }

    /// Applies digit and backspace keys. Returns whether the value changed.
    ///
    /// Keys are ignored unless the field is focused and enabled.
    pub fn update(&mut self, msg: &Msg) -> bool {
        if !self.focus || self.disabled {
            return false;
        }
        let Some(key_msg) = msg.downcast_ref::<KeyMsg>() else {
            return false;
        };
        if key_msg
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        let before = self.value.clone();
        match key_msg.key {
            KeyCode::Char(c) => self.push(c),
            KeyCode::Backspace => self.pop(),
            KeyCode::Delete => self.value.clear(),
            _ => {}
        }
        before != self.value
    }

    /// Renders prompt, value and cursor.
    pub fn view(&self) -> String {
        if self.disabled {
            let shown = if self.value.is_empty() {
                &self.placeholder
            } else {
                &self.value
            };
            return self
                .styles
                .disabled
                .render(&format!("{}{}", self.prompt, shown));
        }

        let mut v = self.styles.prompt.render(&self.prompt);
        if self.value.is_empty() {
            v.push_str(&self.styles.placeholder.render(&self.placeholder));
        } else {
            v.push_str(&self.styles.text.render(&self.value));
        }
        if self.focus {
            v.push_str(&self.styles.cursor.render(" "));
        }
        v
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(field: &mut Model, code: KeyCode) -> bool {
        field.update(&(Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }) as Msg))
    }

    fn typed(field: &mut Model, text: &str) {
        for c in text.chars() {
            press(field, KeyCode::Char(c));
        }
    }

    fn focused(minutes: u32) -> Model {
        let mut f = new(minutes);
        let _ = f.focus();
        f
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("25"), Ok(25));
        assert_eq!(parse_minutes(" 7 "), Ok(7));
        assert_eq!(parse_minutes("007"), Ok(7));
        assert_eq!(parse_minutes("999"), Ok(999));
        assert_eq!(parse_minutes("1000"), Ok(999));
        assert_eq!(parse_minutes("99999999999999999999"), Ok(999));
    }

    #[test]
    fn test_parse_minutes_errors() {
        assert_eq!(parse_minutes(""), Err(InputError::Empty));
        assert_eq!(parse_minutes("   "), Err(InputError::Empty));
        assert_eq!(parse_minutes("0"), Err(InputError::NonPositive));
        assert_eq!(parse_minutes("000"), Err(InputError::NonPositive));
        assert_eq!(
            parse_minutes("1.5"),
            Err(InputError::NotNumeric("1.5".to_string()))
        );
        assert_eq!(
            parse_minutes("-3"),
            Err(InputError::NotNumeric("-3".to_string()))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(InputError::Empty.to_string(), "no duration entered");
        assert_eq!(
            InputError::NotNumeric("x".into()).to_string(),
            "`x` is not a whole number of minutes"
        );
    }

    #[test]
    fn test_typing_digits() {
        let mut f = focused(25);
        assert!(press(&mut f, KeyCode::Backspace));
        assert!(press(&mut f, KeyCode::Backspace));
        assert!(f.is_empty());
        typed(&mut f, "45");
        assert_eq!(f.value(), "45");
        assert_eq!(f.minutes(), Ok(45));
    }

    #[test]
    fn test_non_digits_are_dropped() {
        let mut f = focused(5);
        assert!(!press(&mut f, KeyCode::Char('a')));
        assert!(!press(&mut f, KeyCode::Char('-')));
        assert_eq!(f.value(), "5");
    }

    #[test]
    fn test_clamps_while_typing() {
        let mut f = focused(99);
        typed(&mut f, "99");
        assert_eq!(f.value(), "999");
        press(&mut f, KeyCode::Backspace);
        assert_eq!(f.value(), "99");
    }

    #[test]
    fn test_leading_zero_collapses() {
        let mut f = focused(1);
        f.set_text("");
        typed(&mut f, "0");
        assert_eq!(f.value(), "0");
        assert_eq!(f.minutes(), Err(InputError::NonPositive));
        typed(&mut f, "5");
        assert_eq!(f.value(), "5");
    }

    #[test]
    fn test_ignored_when_blurred_or_disabled() {
        let mut f = new(10);
        assert!(!press(&mut f, KeyCode::Char('1')));

        let _ = f.focus();
        f.set_disabled(true);
        assert!(!press(&mut f, KeyCode::Char('1')));
        assert_eq!(f.value(), "10");
    }

    #[test]
    fn test_control_chords_ignored() {
        let mut f = focused(10);
        let msg = Box::new(KeyMsg {
            key: KeyCode::Char('1'),
            modifiers: KeyModifiers::CONTROL,
        }) as Msg;
        assert!(!f.update(&msg));
    }

    #[test]
    fn test_delete_clears() {
        let mut f = focused(10);
        assert!(press(&mut f, KeyCode::Delete));
        assert!(f.is_empty());
        assert_eq!(f.minutes(), Err(InputError::Empty));
    }

    #[test]
    fn test_focus_management() {
        let mut f = new(3);
        assert!(!f.focused());
        assert!(f.focus().is_none());
        assert!(f.focused());
        f.blur();
        assert!(!f.focused());
    }

    #[test]
    fn test_view_shows_value_or_placeholder() {
        let mut f = focused(42);
        assert!(lipgloss::strip_ansi(&f.view()).contains("42"));
        f.set_text("");
        assert!(lipgloss::strip_ansi(&f.view()).contains("min"));
        f.set_text("7");
        f.set_disabled(true);
        assert!(lipgloss::strip_ansi(&f.view()).contains('7'));
    }
}
