//! CLI command implementations for pylens.
//!
//! Available commands:
//! - **tokens / highlight / signatures / ast**: single-stage views of a file
//! - **format**: rewrite or check files in canonical layout
//! - **analyze**: every stage at once, as text or JSON
//! - **interactive**: analyze snippets typed at a prompt
//! - **init**: write a default `.pylens.toml`
//!
//! Commands render into a writer so their output can be tested without a
//! terminal.

pub mod analyze;
pub mod format;
pub mod init;
pub mod inspect;
pub mod interactive;

pub use analyze::{analyze_file, render_report};
pub use format::{format_inputs, FormatOutcome};
pub use init::init_config;
pub use interactive::run_interactive;

use std::path::Path;
use tracing::debug;

use crate::analysis::Pipeline;
use crate::config::{self, PylensConfig};
use crate::core::Result;
use crate::formatting::{ColoredFormatter, FormattingConfig};

/// Settings shared by every command.
pub struct CommandContext {
    pub config: PylensConfig,
    pub formatting: FormattingConfig,
}

impl CommandContext {
    /// Load configuration from `path`, or discover it when `None`.
    pub fn load(path: Option<&Path>, formatting: FormattingConfig) -> Result<Self> {
        let config = match path {
            Some(path) => config::load_config_from_path(path)?,
            None => config::load_config(),
        };
        debug!(?config, "resolved configuration");
        Ok(Self { config, formatting })
    }

    pub fn new(config: PylensConfig, formatting: FormattingConfig) -> Self {
        Self { config, formatting }
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(&self.config)
    }

    pub fn printer(&self) -> ColoredFormatter {
        ColoredFormatter::new(self.formatting)
    }
}
