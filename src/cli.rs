use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::formatting::ColorMode;
use crate::highlight::ThemePreset;
use crate::syntax::WalkOrder;

#[derive(Parser, Debug)]
#[command(name = "pylens")]
#[command(about = "Tokenize, highlight, inspect and format Python source", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to the nearest .pylens.toml)
    #[arg(long, global = true, env = "PYLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// When to use colors in command output
    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorMode>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List lexemes with their category and byte offsets
    Tokens {
        /// Python file, or - for stdin
        input: PathBuf,

        /// Keep multi-character operators such as == together
        #[arg(long)]
        greedy: bool,
    },

    /// Print source with category markers
    Highlight {
        /// Python file, or - for stdin
        input: PathBuf,

        /// Marker preset (defaults to the configured theme)
        #[arg(short, long, value_enum)]
        theme: Option<ThemePreset>,

        /// Keep multi-character operators such as == together
        #[arg(long)]
        greedy: bool,
    },

    /// List function signatures
    Signatures {
        /// Python file, or - for stdin
        input: PathBuf,

        /// Traversal order (defaults to the configured order)
        #[arg(long, value_enum)]
        order: Option<WalkOrder>,
    },

    /// Rewrite files in canonical layout
    Format {
        /// Python files, or - for stdin
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Report files that would change instead of rewriting them
        #[arg(long)]
        check: bool,
    },

    /// Print the syntax tree
    Ast {
        /// Python file, or - for stdin
        input: PathBuf,

        /// Spaces per nesting level (defaults to the configured indent)
        #[arg(long)]
        indent: Option<usize>,
    },

    /// Run every stage and print the combined report
    Analyze {
        /// Python file, or - for stdin
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },

    /// Analyze snippets typed at a prompt; enter 0 to quit
    Interactive,

    /// Initialize a pylens configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}
