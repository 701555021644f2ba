use pretty_assertions::assert_eq;
use pylens::config::{find_config_from, load_config_from_path, CONFIG_FILE_NAME};
use pylens::{analyze_source, ConfigError, Pipeline, TokenCategory};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_configured_tables_and_theme_drive_highlighting() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(
        &path,
        r#"
[tables]
keywords = ["unless"]

[theme]
preset = "plain"

[theme.keyword]
begin = "<K>"
end = "</K>"
"#,
    )
    .unwrap();

    let config = load_config_from_path(&path).unwrap();
    let pipeline = Pipeline::new(&config);
    assert_eq!(pipeline.highlight("unless if"), "<K>unless</K> if");
}

#[test]
fn test_greedy_mode_from_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[tokenizer]\nmode = \"greedy\"\n").unwrap();

    let config = load_config_from_path(&path).unwrap();
    let report = analyze_source("a >= b", &Pipeline::new(&config));
    let operators: Vec<&str> = report
        .tokens
        .iter()
        .filter(|t| t.category == TokenCategory::Operator)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(operators, vec![">="]);
}

#[test]
fn test_discovery_skips_invalid_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "[formatter\n").unwrap();

    assert!(find_config_from(dir.path().to_path_buf()).is_none());
}

#[test]
fn test_explicit_invalid_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[syntax]\nwalk_order = \"sideways\"\n").unwrap();

    let err = load_config_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("custom.toml"));
}
