use super::*;
use tempfile::tempdir;

#[test]
fn test_load_settings_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("exthost.json");
    std::fs::write(&path, r#"{ "groups": ["left", "right"], "log": { "filter": "debug" } }"#).unwrap();

    let settings = load_settings_from(&path).unwrap();

    assert_eq!(settings.groups, vec!["left".to_string(), "right".to_string()]);
    assert_eq!(settings.log.filter.as_deref(), Some("debug"));
    assert_eq!(settings.editor.tab_size, 4);
}

#[test]
fn test_missing_or_invalid_settings_fall_back() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(load_settings_from(&missing).is_none());

    let invalid = dir.path().join("invalid.json");
    std::fs::write(&invalid, "{ groups: ").unwrap();
    assert!(load_settings_from(&invalid).is_none());

    let settings = load_settings(Some(invalid.as_path()));
    assert_eq!(settings.groups, vec!["main".to_string()]);
}

#[test]
fn test_ensure_log_dir_uses_configured_dir() {
    let dir = tempdir().unwrap();
    let mut settings = Settings::default();
    settings.log.dir = Some(dir.path().join("nested").join("logs"));

    let log_dir = ensure_log_dir(&settings).unwrap();

    assert_eq!(log_dir, dir.path().join("nested").join("logs"));
    assert!(log_dir.is_dir());
}

#[test]
fn test_settings_path_lives_under_cache_dir() {
    if let Some(path) = get_settings_path() {
        assert!(path.ends_with(Path::new(SETTINGS_DIR).join(SETTINGS_FILE)));
    }
}
