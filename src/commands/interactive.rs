use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

use super::analyze::render_report;
use crate::analysis::{analyze_source, Pipeline};
use crate::formatting::OutputFormatter;

pub const PROMPT: &str = "Enter Python code (0 to quit): ";

/// Sentinel line that ends the session.
pub const QUIT: &str = "0";

/// Prompt for snippets until `0` or end of input, printing a report for
/// each. Invalid snippets are reported and the session continues.
///
/// Returns the number of snippets analyzed.
pub fn run_interactive<R: BufRead, W: Write>(
    pipeline: &Pipeline,
    printer: &dyn OutputFormatter,
    input: R,
    out: &mut W,
) -> Result<usize> {
    let mut lines = input.lines();
    let mut analyzed = 0;

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next().transpose()? else {
            writeln!(out)?;
            break;
        };
        let snippet = line.trim_end();
        if snippet.trim() == QUIT {
            break;
        }
        if snippet.trim().is_empty() {
            continue;
        }

        let report = analyze_source(snippet, pipeline);
        analyzed += 1;
        debug!(analyzed, valid = report.is_valid(), "analyzed snippet");
        writeln!(out, "{}", render_report(&report, printer))?;
    }

    Ok(analyzed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::PlainFormatter;
    use crate::highlight::HighlightTheme;
    use std::io::Cursor;

    fn session(input: &str) -> (usize, String) {
        let pipeline = Pipeline::default().with_theme(HighlightTheme::plain());
        let mut out = Vec::new();
        let count =
            run_interactive(&pipeline, &PlainFormatter, Cursor::new(input), &mut out).unwrap();
        (count, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_quit_sentinel_stops_session() {
        let (count, out) = session("x = 1\n0\ny = 2\n");
        assert_eq!(count, 1);
        assert!(out.contains("x = 1"));
        assert!(!out.contains("y = 2"));
    }

    #[test]
    fn test_invalid_snippet_does_not_end_session() {
        let (count, out) = session("function (\ndef f(a): return a\n");
        assert_eq!(count, 2);
        assert!(out.contains("syntax error"));
        assert!(out.contains("Function 'f(a)'"));
    }

    #[test]
    fn test_end_of_input_stops_session() {
        let (count, out) = session("");
        assert_eq!(count, 0);
        assert_eq!(out, format!("{PROMPT}\n"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let (count, _) = session("\n   \n0\n");
        assert_eq!(count, 0);
    }
}
