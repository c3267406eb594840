//! Named key bindings loaded from configuration.
//!
//! A [`KeyMap`] maps action names (such as `"select-next"`) to the key
//! combinations that trigger them. Behaviors ship a default map and merge
//! user overrides over it, so an application can rebind keys without
//! touching behavior code.
//!
//! # File Format
//!
//! ```toml
//! [bindings]
//! select-next = ["Down", "Ctrl+N"]
//! select-all = ["Ctrl+A"]
//! clear-selection = []   # unbind
//! ```
//!
//! # Example
//!
//! ```
//! use horizon_controls::input::{Key, KeyCombination, KeyMap};
//!
//! let map = KeyMap::from_toml_str(r#"
//!     [bindings]
//!     select-next = ["Down", "Ctrl+N"]
//! "#).unwrap();
//!
//! assert_eq!(
//!     map.bindings("select-next"),
//!     &[KeyCombination::key_only(Key::ArrowDown), KeyCombination::ctrl(Key::N)]
//! );
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use horizon_controls_core::logging::targets;

use crate::error::KeyMapError;
use crate::input::combination::KeyCombination;

/// Action name to key combination table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMap {
    #[serde(default)]
    bindings: BTreeMap<String, Vec<KeyCombination>>,
}

impl KeyMap {
    /// Create an empty key map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`bind`](Self::bind).
    pub fn with_binding(mut self, action: impl Into<String>, combination: KeyCombination) -> Self {
        self.bind(action, combination);
        self
    }

    /// Add a combination to an action, keeping existing ones.
    ///
    /// Binding the same combination twice has no effect.
    pub fn bind(&mut self, action: impl Into<String>, combination: KeyCombination) {
        let combinations = self.bindings.entry(action.into()).or_default();
        if !combinations.contains(&combination) {
            combinations.push(combination);
        }
    }

    /// Replace every combination of an action. An empty list unbinds it.
    pub fn set_bindings(&mut self, action: impl Into<String>, combinations: Vec<KeyCombination>) {
        self.bindings.insert(action.into(), combinations);
    }

    /// The combinations bound to an action, in binding order.
    pub fn bindings(&self, action: &str) -> &[KeyCombination] {
        self.bindings.get(action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of all actions that appear in this map, sorted.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Check if the map has no actions.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The first action bound to `combination`, if any.
    pub fn action_for(&self, combination: &KeyCombination) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(_, combinations)| combinations.contains(combination))
            .map(|(action, _)| action.as_str())
    }

    /// Overlay `overrides` on this map.
    ///
    /// Every action present in `overrides` replaces this map's combinations
    /// for that action; other actions are kept.
    pub fn merge(&mut self, overrides: &KeyMap) {
        for (action, combinations) in &overrides.bindings {
            self.bindings.insert(action.clone(), combinations.clone());
        }
    }

    /// Parse a key map from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, KeyMapError> {
        let map: KeyMap = toml::from_str(text)?;
        tracing::debug!(target: targets::KEYMAP, actions = map.bindings.len(), "parsed key map");
        Ok(map)
    }

    /// Serialize the key map as TOML.
    pub fn to_toml_string(&self) -> Result<String, KeyMapError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a key map from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KeyMapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| KeyMapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(target: targets::KEYMAP, path = %path.display(), "loading key map");
        Self::from_toml_str(&text)
    }

    /// Write the key map to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), KeyMapError> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;
        std::fs::write(path, text).map_err(|source| KeyMapError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
