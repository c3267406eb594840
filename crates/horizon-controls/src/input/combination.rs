//! Key combinations: one key plus the exact set of modifiers held with it.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::KeyParseError;
use crate::event::KeyEvent;
use crate::input::key::{Key, KeyboardModifiers};

/// A single key combination (one key with modifiers).
///
/// This represents a chord like "Ctrl+A" or "Shift+Down". Matching is exact:
/// "Down" does not match a key event for Shift+Down.
///
/// In configuration files a combination is written as a string:
///
/// ```
/// use horizon_controls::input::{Key, KeyCombination};
///
/// let combination: KeyCombination = "Ctrl+Shift+Home".parse().unwrap();
/// assert_eq!(combination, KeyCombination::ctrl_shift(Key::Home));
/// assert_eq!(combination.to_string(), "Ctrl+Shift+Home");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyCombination {
    /// The primary key.
    pub key: Key,
    /// The modifier keys that must be held.
    pub modifiers: KeyboardModifiers,
}

impl KeyCombination {
    /// Create a new key combination from a key and modifiers.
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self { key, modifiers }
    }

    /// Create a key combination with no modifiers.
    pub fn key_only(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::NONE)
    }

    /// Create a Ctrl+key combination.
    pub fn ctrl(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::CTRL)
    }

    /// Create an Alt+key combination.
    pub fn alt(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::ALT)
    }

    /// Create a Shift+key combination.
    pub fn shift(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::SHIFT)
    }

    /// Create a Ctrl+Shift+key combination.
    pub fn ctrl_shift(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::CTRL_SHIFT)
    }

    /// Check if this key combination matches the given key and modifiers.
    pub fn matches(&self, key: Key, modifiers: KeyboardModifiers) -> bool {
        self.key == key && self.modifiers == modifiers
    }

    /// Check if this key combination matches a key event.
    pub fn matches_event(&self, event: &KeyEvent) -> bool {
        self.matches(event.key, event.modifiers)
    }
}

impl From<Key> for KeyCombination {
    fn from(key: Key) -> Self {
        Self::key_only(key)
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if self.modifiers.control {
            parts.push("Ctrl");
        }
        if self.modifiers.alt {
            parts.push("Alt");
        }
        if self.modifiers.shift {
            parts.push("Shift");
        }
        if self.modifiers.meta {
            parts.push("Meta");
        }

        parts.push(self.key.name());

        write!(f, "{}", parts.join("+"))
    }
}

impl FromStr for KeyCombination {
    type Err = KeyParseError;

    /// Parse a combination from a string like `"Ctrl+S"`.
    ///
    /// # Format
    ///
    /// - Modifiers: `Ctrl`, `Alt`, `Shift`, `Meta` (or `Cmd`/`Super`)
    /// - Keys: letters, digits, function keys and named keys, see [`Key`]
    /// - Parts are joined with `+`; the literal plus key is not supported
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyParseError::Empty);
        }

        let mut modifiers = KeyboardModifiers::NONE;
        let mut key: Option<Key> = None;

        for part in s.split('+') {
            let part = part.trim();
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers.control = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "meta" | "cmd" | "command" | "win" | "super" => modifiers.meta = true,
                _ => {
                    if key.is_some() {
                        return Err(KeyParseError::MultipleKeys(s.to_string()));
                    }
                    key = Some(part.parse()?);
                }
            }
        }

        key.map(|key| KeyCombination::new(key, modifiers))
            .ok_or(KeyParseError::NoKey)
    }
}

impl Serialize for KeyCombination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyCombination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
