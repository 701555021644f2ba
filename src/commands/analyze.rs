use anyhow::Result;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use super::CommandContext;
use crate::analysis::{analyze_source, AnalysisReport};
use crate::cli::OutputFormat;
use crate::formatting::OutputFormatter;
use crate::io;

pub fn analyze_file(
    ctx: &CommandContext,
    input: &Path,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let source = io::read_input(input)?;
    let report = analyze_source(&source, &ctx.pipeline());
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", report.to_json()?)?;
        }
        OutputFormat::Terminal => {
            write!(out, "{}", render_report(&report, &ctx.printer()))?;
        }
    }
    Ok(())
}

/// Human-readable report: highlighted source, then the tree-based sections.
pub fn render_report(report: &AnalysisReport, printer: &dyn OutputFormatter) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", printer.header("Highlighted"));
    out.push_str(&report.highlighted);
    if !report.highlighted.ends_with('\n') {
        out.push('\n');
    }

    if let Some(error) = &report.parse_error {
        let _ = writeln!(out, "{}", printer.error(&error.to_string()));
        return out;
    }

    let _ = writeln!(out, "\n{}", printer.header("Function signatures"));
    if report.signatures.is_empty() {
        let _ = writeln!(out, "{}", printer.dim("(none)"));
    }
    for signature in &report.signatures {
        let _ = writeln!(out, "{}", signature.describe());
    }

    let _ = writeln!(out, "\n{}", printer.header("Formatted"));
    match (&report.formatted, &report.format_error) {
        (Some(formatted), _) => out.push_str(formatted),
        (None, Some(error)) => {
            let _ = writeln!(out, "{}", printer.warning(&error.to_string()));
        }
        (None, None) => {}
    }

    if let Some(tree) = &report.tree {
        let _ = writeln!(out, "\n{}", printer.header("Syntax tree"));
        out.push_str(tree);
    }

    out
}
