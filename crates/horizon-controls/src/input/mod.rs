//! Keyboard input: key codes, key combinations and configurable key maps.
//!
//! # Key Types
//!
//! - [`Key`] and [`KeyboardModifiers`] - what was pressed and what was held
//! - [`KeyCombination`] - a key plus an exact modifier set, parsed from
//!   strings like `"Shift+Down"`
//! - [`KeyMap`] - action names bound to combinations, loaded from TOML
//!
//! With the `winit` feature enabled, the [`winit`](self::winit) module
//! converts platform keyboard input into control key events.

mod combination;
mod key;
mod keymap;

#[cfg(feature = "winit")]
pub mod winit;

pub use combination::KeyCombination;
pub use key::{Key, KeyboardModifiers};
pub use keymap::KeyMap;
