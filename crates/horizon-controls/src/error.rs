//! Error types for Horizon Controls.

use std::path::PathBuf;

use thiserror::Error;

use crate::toggle::ToggleId;

/// Result type for fallible control operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Any error produced by this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A behavior configuration could not be built.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A toggle group operation was rejected.
    #[error(transparent)]
    Toggle(#[from] ToggleError),

    /// A key map could not be loaded or saved.
    #[error(transparent)]
    KeyMap(#[from] KeyMapError),

    /// A key or key combination could not be parsed.
    #[error(transparent)]
    KeyParse(#[from] KeyParseError),
}

/// Errors detected while building a behavior configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Two or more registered controller kinds derive from `kind` without
    /// one of them deriving from the others, so no single controller can
    /// serve every aspect that asks for `kind`.
    #[error(
        "controller kind `{kind}` has divergent registered descendants: {}",
        .descendants.join(", ")
    )]
    DivergentControllers {
        /// The shared ancestor kind.
        kind: &'static str,
        /// Every registered descendant of `kind`, sorted by name.
        descendants: Vec<&'static str>,
    },

    /// A controller kind lists itself among its own ancestors.
    #[error("controller kind `{kind}` is its own ancestor")]
    CyclicControllerKind {
        /// The kind whose parent chain loops.
        kind: &'static str,
    },
}

/// Errors from toggle group membership changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToggleError {
    /// The toggle id does not refer to a live toggle.
    #[error("unknown toggle {0:?}")]
    UnknownToggle(ToggleId),

    /// The group id does not refer to a live group.
    #[error("unknown toggle group")]
    UnknownGroup,

    /// The toggle is already a member of the group, or appears twice in
    /// one batch.
    #[error("toggle {0:?} is already a member of the group")]
    Duplicate(ToggleId),
}

/// Errors from parsing keys and key combinations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    /// The string was empty.
    #[error("empty key string")]
    Empty,

    /// A key name was not recognized.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// A combination had modifiers but no key.
    #[error("no key specified (only modifiers)")]
    NoKey,

    /// A combination named more than one non-modifier key.
    #[error("more than one key in combination: {0}")]
    MultipleKeys(String),
}

/// Errors from loading or saving key maps.
#[derive(Error, Debug)]
pub enum KeyMapError {
    /// The TOML text is malformed or names an unknown key.
    #[error("invalid key map: {0}")]
    Parse(#[from] toml::de::Error),

    /// The key map could not be serialized.
    #[error("failed to serialize key map: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading or writing the key map file failed.
    #[error("key map file {}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
