use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::core::PylensConfig;
use crate::core::ConfigError;

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".pylens.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Read a config file into a string
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str, path: &Path) -> Result<PylensConfig, ConfigError> {
    let config = toml::from_str::<PylensConfig>(contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string().trim_end().to_string(),
    })?;

    config.validate()?;

    let overlaps = config.category_tables().overlaps();
    for (text, categories) in &overlaps {
        debug!(
            entry = %text,
            ?categories,
            "entry listed in several category tables; highest priority wins"
        );
    }

    Ok(config)
}

/// Load an explicitly named config file. Unlike discovery, every failure is
/// an error.
pub fn load_config_from_path(path: &Path) -> Result<PylensConfig, ConfigError> {
    let contents = read_config_file(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_and_validate_config(&contents, path)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Try loading a discovered config file, falling back on any problem
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<PylensConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents, config_path) {
        Ok(config) => {
            debug!(path = %config_path.display(), "loaded config");
            Some(config)
        }
        Err(e) => {
            warn!("{e}. Using defaults.");
            None
        }
    }
}

/// Only log actual errors, not "file not found"
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        warn!(
            path = %config_path.display(),
            %error,
            "failed to read config file"
        );
    }
}

/// `start` and its parents, nearest first, at most `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Discover the nearest `.pylens.toml` above `start`.
pub fn find_config_from(start: PathBuf) -> Option<PylensConfig> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
}

/// Discover configuration from the current directory, or use defaults.
pub fn load_config() -> PylensConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            warn!("Failed to get current directory: {e}. Using default config.");
            return PylensConfig::default();
        }
    };

    find_config_from(current).unwrap_or_else(|| {
        debug!(
            "No config found after checking {} directories. Using default config.",
            MAX_TRAVERSAL_DEPTH
        );
        PylensConfig::default()
    })
}
