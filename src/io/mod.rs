use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Path argument that stands for standard input.
pub const STDIN_MARKER: &str = "-";

pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_MARKER
}

/// Read a source file, or standard input for `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .context("Failed to read standard input")?;
        return Ok(contents);
    }
    read_file(path)
}

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
