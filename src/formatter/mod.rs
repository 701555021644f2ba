//! Canonical source layout.
//!
//! The style transform itself lives behind [`SourceFormatter`]; this module
//! owns the contract around it. [`Formatter::format`] rejects invalid input
//! up front, checks that the collaborator's output still parses and, when
//! enabled, that a second pass leaves the output unchanged.

pub mod canonical;

pub use canonical::CanonicalFormatter;

use crate::core::FormatError;
use crate::syntax;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A style transform over source text.
///
/// Output must depend on the input text alone.
pub trait SourceFormatter {
    fn name(&self) -> &str;

    fn format_source(&self, source: &str) -> Result<String, FormatError>;
}

impl<F: SourceFormatter + ?Sized> SourceFormatter for Box<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn format_source(&self, source: &str) -> Result<String, FormatError> {
        (**self).format_source(source)
    }
}

impl<F: SourceFormatter + ?Sized> SourceFormatter for &F {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn format_source(&self, source: &str) -> Result<String, FormatError> {
        (**self).format_source(source)
    }
}

/// Layout options for the built-in formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Longest run of blank lines kept before top-level code.
    pub max_blank_lines: usize,
    /// Longest run of blank lines kept inside indented blocks.
    pub max_nested_blank_lines: usize,
    /// Format the output a second time and fail if it changes.
    pub verify_idempotence: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            max_blank_lines: 2,
            max_nested_blank_lines: 1,
            verify_idempotence: true,
        }
    }
}

/// Runs a [`SourceFormatter`] under the formatting contract.
#[derive(Debug, Clone)]
pub struct Formatter<F = CanonicalFormatter> {
    collaborator: F,
    verify_idempotence: bool,
}

impl Formatter<CanonicalFormatter> {
    pub fn new(options: FormatOptions) -> Self {
        Self {
            collaborator: CanonicalFormatter::new(options),
            verify_idempotence: options.verify_idempotence,
        }
    }
}

impl Default for Formatter<CanonicalFormatter> {
    fn default() -> Self {
        Self::new(FormatOptions::default())
    }
}

impl<F: SourceFormatter> Formatter<F> {
    pub fn with_collaborator(collaborator: F, verify_idempotence: bool) -> Self {
        Self {
            collaborator,
            verify_idempotence,
        }
    }

    pub fn format(&self, source: &str) -> Result<String, FormatError> {
        let tree = syntax::parse(source).map_err(FormatError::Syntax)?;
        let formatted = self.collaborator.format_source(tree.source())?;

        syntax::parse(&formatted).map_err(|e| {
            debug!(
                formatter = self.collaborator.name(),
                error = %e,
                "formatted output does not parse"
            );
            FormatError::Unparseable(e)
        })?;

        if self.verify_idempotence {
            let again = self.collaborator.format_source(&formatted)?;
            if again != formatted {
                return Err(FormatError::NotIdempotent {
                    name: self.collaborator.name().to_string(),
                    line: first_difference(&formatted, &again),
                });
            }
        }

        debug!(
            formatter = self.collaborator.name(),
            input_bytes = source.len(),
            output_bytes = formatted.len(),
            "formatted source"
        );
        Ok(formatted)
    }

    /// Whether `source` is already in canonical form.
    pub fn is_formatted(&self, source: &str) -> Result<bool, FormatError> {
        let formatted = self.format(source)?;
        Ok(formatted == source)
    }
}

/// Format with the built-in formatter and default options.
pub fn format(source: &str) -> Result<String, FormatError> {
    Formatter::default().format(source)
}

/// 1-based number of the first line that differs between `a` and `b`.
fn first_difference(a: &str, b: &str) -> usize {
    let mut a_lines = a.lines();
    let mut b_lines = b.lines();
    let mut line = 1;
    loop {
        match (a_lines.next(), b_lines.next()) {
            (Some(x), Some(y)) if x == y => line += 1,
            (None, None) => return line,
            _ => return line,
        }
    }
}
