use crate::config::{CONFIG_FILE_NAME, DEFAULT_CONFIG};
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub fn init_config(force: bool) -> Result<PathBuf> {
    init_config_in(Path::new("."), force)
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_path;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let path = init_config_in(dir.path(), false).unwrap();
        assert!(load_config_from_path(&path).is_ok());
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "# mine\n").unwrap();

        assert!(init_config_in(dir.path(), false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

        init_config_in(dir.path(), true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
