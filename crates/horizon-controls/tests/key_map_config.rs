//! Integration tests for key maps loaded from configuration files.

use std::sync::Arc;

use horizon_controls::behavior::StandardBehaviorInstaller;
use horizon_controls::control::{Control, ListBehavior, ListView, list_actions};
use horizon_controls::error::KeyMapError;
use horizon_controls::event::ControlEvent;
use horizon_controls::input::{Key, KeyCombination, KeyMap, KeyboardModifiers};
use horizon_controls::model::SelectionMode;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_key_map_file_round_trip() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.toml");

    let defaults = ListBehavior::default_key_map();
    defaults.save(&path).unwrap();
    let loaded = KeyMap::load(&path).unwrap();
    assert_eq!(loaded, defaults);
    assert_eq!(
        loaded.bindings(list_actions::EXTEND_NEXT),
        &[KeyCombination::shift(Key::ArrowDown)]
    );
}

#[test]
fn test_list_uses_bindings_from_file() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vi.toml");
    std::fs::write(
        &path,
        r#"
[bindings]
select-next = ["J"]
select-previous = ["K"]
select-all = ["Ctrl+Shift+A"]
"#,
    )
    .unwrap();

    let overrides = KeyMap::load(&path).unwrap();
    let list = Arc::new(ListView::new(vec!["red", "green", "blue"]));
    list.install_behavior(&StandardBehaviorInstaller::new(ListBehavior::with_key_map(&overrides)));
    list.selection_model().set_selection_mode(SelectionMode::Multiple);

    let press = |key, modifiers| list.dispatch_event(&mut ControlEvent::key_pressed(key, modifiers));
    for _ in 0..3 {
        assert!(press(Key::J, KeyboardModifiers::NONE));
    }
    assert_eq!(list.selection_model().selected_item(), Some("blue"));
    assert!(press(Key::K, KeyboardModifiers::NONE));
    assert_eq!(list.selection_model().selected_item(), Some("green"));

    assert!(!press(Key::A, KeyboardModifiers::CTRL));
    assert!(press(Key::A, KeyboardModifiers::CTRL_SHIFT));
    assert_eq!(list.selection_model().selected_count(), 3);

    // Actions not named in the file keep their defaults.
    assert!(press(Key::Home, KeyboardModifiers::NONE));
    assert_eq!(list.selection_model().selected_indices(), vec![0]);
}

#[test]
fn test_bad_key_map_files_are_reported() {
    let dir = tempfile::tempdir().unwrap();

    let missing = KeyMap::load(dir.path().join("missing.toml"));
    assert!(matches!(missing, Err(KeyMapError::Io { .. })));

    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[bindings]\nselect-next = [\"Hyper+Q\"]\n").unwrap();
    let error: horizon_controls::Error = KeyMap::load(&path).unwrap_err().into();
    assert!(matches!(error, horizon_controls::Error::KeyMap(_)));
}
