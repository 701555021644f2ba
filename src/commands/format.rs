use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use super::CommandContext;
use crate::formatting::OutputFormatter;
use crate::io;

/// Result of a `format` run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FormatOutcome {
    /// Files whose layout changed, or would change under `--check`.
    pub changed: Vec<PathBuf>,
    pub unchanged: usize,
}

impl FormatOutcome {
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// Format every input. Files are rewritten in place unless `check` is set;
/// standard input is always written back to `out`.
pub fn format_inputs(
    ctx: &CommandContext,
    inputs: &[PathBuf],
    check: bool,
    out: &mut impl Write,
) -> Result<FormatOutcome> {
    let pipeline = ctx.pipeline();
    let printer = ctx.printer();
    let mut outcome = FormatOutcome::default();

    for input in inputs {
        let source = io::read_input(input)?;
        let reformatted = pipeline
            .reformat(&source)
            .with_context(|| format!("Failed to format {}", display_name(input)))?;

        let Some(formatted) = reformatted else {
            outcome.unchanged += 1;
            if io::is_stdin(input) && !check {
                write!(out, "{source}")?;
            }
            continue;
        };

        outcome.changed.push(input.clone());
        if check {
            writeln!(
                out,
                "{}",
                printer.warning(&format!("would reformat {}", display_name(input)))
            )?;
        } else if io::is_stdin(input) {
            write!(out, "{formatted}")?;
        } else {
            io::write_file(input, &formatted)?;
            info!(path = %input.display(), "reformatted");
            writeln!(
                out,
                "{}",
                printer.success(&format!("reformatted {}", input.display()))
            )?;
        }
    }

    Ok(outcome)
}

fn display_name(input: &Path) -> String {
    if io::is_stdin(input) {
        "<stdin>".to_string()
    } else {
        input.display().to_string()
    }
}
