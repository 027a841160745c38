use super::*;

#[test]
fn settings_default_values() {
    let settings = Settings::default();
    assert_eq!(settings.groups, vec!["main".to_string()]);
    assert_eq!(settings.editor.tab_size, 4);
    assert!(settings.editor.insert_spaces);
    assert_eq!(settings.snippet.undo_stops(), UndoStopOptions::default());
    assert!(settings.log.filter.is_none());
}

#[test]
fn settings_partial_json_fills_defaults() {
    let settings: Settings = serde_json::from_str(
        r#"{ "editor": { "tab_size": 2, "cursor_style": "block" }, "snippet": { "undo_stop_after": false } }"#,
    )
    .expect("deserialize Settings");

    assert_eq!(settings.editor.tab_size, 2);
    assert_eq!(settings.editor.indent_size, 4);
    assert_eq!(settings.editor.cursor_style, CursorStyle::Block);
    assert!(settings.snippet.undo_stop_before);
    assert!(!settings.snippet.undo_stop_after);
    assert_eq!(settings.groups, vec!["main".to_string()]);
}

#[test]
fn editor_settings_never_produce_zero_tab_size() {
    let editor = EditorSettings {
        tab_size: 0,
        indent_size: 0,
        ..EditorSettings::default()
    };
    let options = editor.model_options();
    assert_eq!(options.tab_size, 1);
    assert_eq!(options.indent_size, 1);
}

#[test]
fn valid_groups_drops_separator_and_duplicates() {
    let settings = Settings {
        groups: vec![
            "main".to_string(),
            "side.left".to_string(),
            String::new(),
            "aux".to_string(),
            "main".to_string(),
        ],
        ..Settings::default()
    };
    assert_eq!(settings.valid_groups(), vec!["main".to_string(), "aux".to_string()]);
}

#[test]
fn valid_groups_falls_back_to_default() {
    let settings = Settings {
        groups: vec!["a.b".to_string()],
        ..Settings::default()
    };
    assert_eq!(settings.valid_groups(), vec!["main".to_string()]);
}
