mod core;
mod loader;

pub use self::core::{
    default_dump_indent, PylensConfig, SyntaxConfig, TablesConfig, ThemeConfig, TokenizerConfig,
};

pub use loader::{
    directory_ancestors, find_config_from, load_config, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};

/// Contents written by `pylens init`. Parses to the default configuration.
pub const DEFAULT_CONFIG: &str = r#"# pylens configuration

[tokenizer]
# "single" splits every non-word character, "greedy" keeps operators like `==` whole
mode = "single"

[theme]
# "ansi", "plain" or "html"
preset = "ansi"

# Per-category overrides:
# [theme.keyword]
# begin = "<K>"
# end = "</K>"

[formatter]
indent_width = 4
max_blank_lines = 2
max_nested_blank_lines = 1
verify_idempotence = true

[syntax]
# "breadth-first" or "pre-order"
walk_order = "breadth-first"
dump_indent = 4

# Each list replaces the built-in table when present:
# [tables]
# keywords = ["if", "else", "for", "while", "return", "def", "class"]
# operators = ["+", "-", "==", "and", "or", "not"]
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigError;
    use crate::formatter::FormatOptions;
    use crate::highlight::{HighlightTheme, MarkerPair};
    use crate::lexer::{TokenCategory, TokenizeMode};
    use crate::syntax::WalkOrder;
    use std::path::{Path, PathBuf};

    fn parse(contents: &str) -> Result<PylensConfig, ConfigError> {
        parse_and_validate_config(contents, Path::new(".pylens.toml"))
    }

    #[test]
    fn test_default_config_template_matches_defaults() {
        let config = parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.tokenize_mode(), TokenizeMode::Single);
        assert_eq!(config.theme(), HighlightTheme::ansi());
        assert_eq!(config.format_options(), FormatOptions::default());
        assert_eq!(config.walk_order(), WalkOrder::BreadthFirst);
        assert_eq!(config.dump_indent(), 4);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, PylensConfig::default());
        assert_eq!(config.theme(), HighlightTheme::ansi());
        assert!(config
            .category_tables()
            .contains(TokenCategory::Keyword, "def"));
    }

    #[test]
    fn test_tables_replace_defaults_per_category() {
        let config = parse(
            r#"
[tables]
keywords = ["fn", "let"]
"#,
        )
        .unwrap();
        let tables = config.category_tables();
        assert!(tables.contains(TokenCategory::Keyword, "fn"));
        assert!(!tables.contains(TokenCategory::Keyword, "def"));
        // untouched categories keep their defaults
        assert!(tables.contains(TokenCategory::DataType, "int"));
    }

    #[test]
    fn test_theme_overrides_apply_on_top_of_preset() {
        let config = parse(
            r#"
[theme]
preset = "plain"

[theme.keyword]
begin = "<K>"
end = "</K>"
"#,
        )
        .unwrap();
        let theme = config.theme();
        assert_eq!(
            theme.markers(TokenCategory::Keyword),
            Some(&MarkerPair::new("<K>", "</K>"))
        );
        assert_eq!(theme.begin(TokenCategory::Operator), "");
    }

    #[test]
    fn test_partial_formatter_section() {
        let config = parse("[formatter]\nindent_width = 2\n").unwrap();
        let options = config.format_options();
        assert_eq!(options.indent_width, 2);
        assert_eq!(options.max_blank_lines, 2);
        assert!(options.verify_idempotence);
    }

    #[test]
    fn test_greedy_mode_and_pre_order() {
        let config = parse(
            r#"
[tokenizer]
mode = "greedy"

[syntax]
walk_order = "pre-order"
"#,
        )
        .unwrap();
        assert_eq!(config.tokenize_mode(), TokenizeMode::Greedy);
        assert_eq!(config.walk_order(), WalkOrder::PreOrder);
        assert_eq!(config.dump_indent(), 4);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = parse("invalid toml [[ content").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(".pylens.toml"));
    }

    #[test]
    fn test_unknown_enum_value_is_parse_error() {
        let err = parse("[tokenizer]\nmode = \"fancy\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_zero_indent_width_is_invalid() {
        let err = parse("[formatter]\nindent_width = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_empty_table_entry_is_invalid() {
        let err = parse("[tables]\noperators = [\"+\", \"\"]\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: tables.operators contains an empty entry"
        );
    }

    #[test]
    fn test_half_marker_pair_is_invalid() {
        let err = parse("[theme.bracket]\nbegin = \"[\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_directory_ancestors_generates_correct_sequence() {
        let start = PathBuf::from("/a/b/c/d");
        let ancestors: Vec<PathBuf> = directory_ancestors(start, 3).collect();

        assert_eq!(ancestors.len(), 3);
        assert_eq!(ancestors[0], PathBuf::from("/a/b/c/d"));
        assert_eq!(ancestors[1], PathBuf::from("/a/b/c"));
        assert_eq!(ancestors[2], PathBuf::from("/a/b"));
    }

    #[test]
    fn test_directory_ancestors_handles_root() {
        let ancestors: Vec<PathBuf> = directory_ancestors(PathBuf::from("/"), 5).collect();

        // Root directory has no parent, so we only get the root itself
        assert_eq!(ancestors, vec![PathBuf::from("/")]);
    }

    #[test]
    fn test_directory_ancestors_zero_depth() {
        assert_eq!(directory_ancestors(PathBuf::from("/a"), 0).count(), 0);
    }

    #[test]
    fn test_read_config_file() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");
        fs::write(&config_path, "[syntax]\ndump_indent = 2\n").unwrap();

        let contents = loader::read_config_file(&config_path).unwrap();
        assert_eq!(contents, "[syntax]\ndump_indent = 2\n");

        let non_existent = temp_dir.path().join("non_existent.toml");
        assert!(loader::read_config_file(&non_existent).is_err());
    }

    #[test]
    fn test_load_config_from_path_reports_missing_file() {
        let err = load_config_from_path(Path::new("/nonexistent/path/.pylens.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_try_load_config_from_path_with_invalid_config() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "invalid toml content").unwrap();

        assert!(loader::try_load_config_from_path(&config_path).is_none());
    }

    #[test]
    fn test_find_config_from_walks_up() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[syntax]\ndump_indent = 2\n",
        )
        .unwrap();
        let nested = temp_dir.path().join("pkg").join("sub");
        fs::create_dir_all(&nested).unwrap();

        let config = find_config_from(nested).unwrap();
        assert_eq!(config.dump_indent(), 2);
    }

    #[test]
    fn test_handle_read_error() {
        use std::io;

        let path = PathBuf::from("/test/path.toml");
        let not_found = io::Error::new(io::ErrorKind::NotFound, "File not found");
        loader::handle_read_error(&path, &not_found);

        let permission = io::Error::new(io::ErrorKind::PermissionDenied, "Access denied");
        loader::handle_read_error(&path, &permission);
    }
}
