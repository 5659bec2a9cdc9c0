// crates/load_snippet_config/tests/integration_env_file.rs

use std::fs;
use load_snippet_config::{fields, load_config, ConfigError, DEFAULT_CONFIG_FILE};
use tempfile::tempdir;

#[test]
fn test_missing_file_is_config_missing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_CONFIG_FILE);
    let err = load_config(&path).unwrap_err();
    match err {
        ConfigError::ConfigMissing { path: reported } => assert_eq!(reported, path),
        other => panic!("expected ConfigMissing, got {:?}", other),
    }
}

#[test]
fn test_load_numbered_sources_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_CONFIG_FILE);
    fs::write(
        &path,
        "\
# Second source is declared first on purpose.
SOURCE_2_PATH=themes/things/theme.css
SOURCE_2_NAME=things
SOURCE_1_PATH=themes/minimal/theme.css
SOURCE_1_OUTPUT_PATH=snippets/minimal.css
SOURCE_1_START_MARKER='/* snip */'
SOURCE_1_END_MARKER='/* pins */'
",
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.origin, path);
    assert_eq!(config.base_dir, dir.path());
    assert_eq!(config.groups.len(), 2);

    let first = &config.groups[0];
    assert_eq!(first.identifier(), "source_1");
    assert_eq!(first.get(fields::PATH), Some("themes/minimal/theme.css"));
    assert_eq!(first.get(fields::START_MARKER), Some("/* snip */"));
    assert_eq!(first.get(fields::END_MARKER), Some("/* pins */"));
    // Declaration order is kept inside a group.
    let keys: Vec<&str> = first.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["PATH", "OUTPUT_PATH", "START_MARKER", "END_MARKER"]);

    let second = &config.groups[1];
    assert_eq!(second.identifier(), "source_2");
    assert_eq!(second.get(fields::NAME), Some("things"));
    assert_eq!(second.get(fields::OUTPUT_PATH), None);
}
