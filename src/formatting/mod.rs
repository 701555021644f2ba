//! Terminal styling for command output.

use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorMode {
    /// Detect based on terminal
    #[default]
    Auto,
    /// Force colors on
    Always,
    /// Force colors off
    Never,
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl FormattingConfig {
    /// Honour `NO_COLOR`, `CLICOLOR` and `CLICOLOR_FORCE`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // no-color.org
        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }

        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        config
    }

    /// An explicit command-line choice wins over the environment.
    pub fn with_override(self, color: Option<ColorMode>) -> Self {
        match color {
            Some(color) => Self { color },
            None => self,
        }
    }

    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
        }
    }
}

pub trait OutputFormatter {
    fn success(&self, text: &str) -> String;
    fn error(&self, text: &str) -> String;
    fn warning(&self, text: &str) -> String;
    fn header(&self, text: &str) -> String;
    fn dim(&self, text: &str) -> String;
}

pub struct ColoredFormatter {
    enabled: bool,
}

impl ColoredFormatter {
    pub fn new(config: FormattingConfig) -> Self {
        let enabled = config.color.should_use_color();
        colored::control::set_override(enabled);
        Self { enabled }
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.enabled {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn success(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    fn error(&self, text: &str) -> String {
        self.paint(text, |t| t.red())
    }

    fn warning(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow())
    }

    fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().bold())
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }
}

pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn success(&self, text: &str) -> String {
        text.to_string()
    }

    fn error(&self, text: &str) -> String {
        text.to_string()
    }

    fn warning(&self, text: &str) -> String {
        text.to_string()
    }

    fn header(&self, text: &str) -> String {
        text.to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}
