//! Built-in whitespace-canonicalizing formatter.
//!
//! Only whitespace changes. Tokens, strings and comments are kept as they
//! are, so the output always tokenizes to the same non-space sequence as the
//! input. Layout rules:
//!
//! - block indentation is recomputed as `level * indent_width`
//! - continuation lines (inside brackets or after `\`) keep their offset
//!   relative to the line that opened them
//! - comment-only lines take the level of the next code line
//! - runs of spaces collapse to one; no space inside brackets or before `,`;
//!   one space after `,`; two spaces before an inline comment
//! - trailing whitespace is removed and blank-line runs are capped
//! - lines inside multi-line strings are never touched

use super::{FormatOptions, SourceFormatter};
use crate::core::FormatError;
use crate::syntax::{self, SyntaxTree};
use std::ops::Range;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct CanonicalFormatter {
    options: FormatOptions,
}

impl CanonicalFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }
}

impl SourceFormatter for CanonicalFormatter {
    fn name(&self) -> &str {
        "canonical"
    }

    fn format_source(&self, source: &str) -> Result<String, FormatError> {
        let tree = syntax::parse(source).map_err(FormatError::Syntax)?;
        if tree.source().is_empty() {
            return Ok(String::new());
        }
        Ok(Layout::new(&tree).render(&self.options))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProtectedKind {
    Str,
    Comment,
}

/// Byte range whose content must survive verbatim.
#[derive(Debug, Clone)]
struct Protected {
    range: Range<usize>,
    kind: ProtectedKind,
}

/// Strings and comments in source order. String nodes are not entered, so
/// interpolations inside f-strings stay part of the string.
fn protected_ranges(tree: &SyntaxTree) -> Vec<Protected> {
    let mut out = Vec::new();
    let mut cursor = tree.root().walk();
    let mut descend = true;
    loop {
        let node = cursor.node();
        if descend {
            let kind = match node.kind() {
                "string" => Some(ProtectedKind::Str),
                "comment" => Some(ProtectedKind::Comment),
                _ => None,
            };
            if let Some(kind) = kind {
                out.push(Protected {
                    range: node.byte_range(),
                    kind,
                });
            } else if cursor.goto_first_child() {
                continue;
            }
        }
        if cursor.goto_next_sibling() {
            descend = true;
        } else if cursor.goto_parent() {
            descend = false;
        } else {
            break;
        }
    }
    out
}

#[derive(Debug, Clone, Copy)]
enum Segment {
    Code,
    Str,
    Comment,
}

/// Split `range` into code, string and comment pieces.
fn segments(range: Range<usize>, protected: &[Protected]) -> Vec<(Segment, Range<usize>)> {
    let mut out = Vec::new();
    let mut pos = range.start;
    for p in protected
        .iter()
        .filter(|p| p.range.start < range.end && p.range.end > range.start)
    {
        let start = p.range.start.max(range.start);
        let end = p.range.end.min(range.end);
        if start > pos {
            out.push((Segment::Code, pos..start));
        }
        let kind = match p.kind {
            ProtectedKind::Str => Segment::Str,
            ProtectedKind::Comment => Segment::Comment,
        };
        out.push((kind, start..end));
        pos = end;
    }
    if pos < range.end {
        out.push((Segment::Code, pos..range.end));
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    /// Starts inside a multi-line string; emitted verbatim.
    InString,
    /// Starts a logical line.
    Code,
    /// Logical line holding only a comment.
    Comment,
    /// Continues the logical line at the given index.
    Continuation(usize),
}

#[derive(Debug, Clone)]
struct Line {
    range: Range<usize>,
    kind: LineKind,
    /// Width of the original leading whitespace, tabs expanded to 8.
    width: usize,
}

struct Layout<'t> {
    text: &'t str,
    protected: Vec<Protected>,
    lines: Vec<Line>,
}

impl<'t> Layout<'t> {
    fn new(tree: &'t SyntaxTree) -> Self {
        let text = tree.source();
        let protected = protected_ranges(tree);
        let lines = classify_lines(text, &protected);
        Self {
            text,
            protected,
            lines,
        }
    }

    fn render(&self, options: &FormatOptions) -> String {
        let widths = self.target_widths(options.indent_width);

        let mut out = String::with_capacity(self.text.len());
        let mut blank_run = 0;
        for (i, line) in self.lines.iter().enumerate() {
            if line.kind == LineKind::Blank {
                blank_run += 1;
                continue;
            }
            if blank_run > 0 {
                let cap = if widths[i] == 0 {
                    options.max_blank_lines
                } else {
                    options.max_nested_blank_lines
                };
                for _ in 0..blank_run.min(cap) {
                    out.push('\n');
                }
                blank_run = 0;
            }
            match line.kind {
                LineKind::InString => out.push_str(&self.text[line.range.clone()]),
                _ => {
                    out.push_str(&" ".repeat(widths[i]));
                    out.push_str(&self.normalize_line(line.range.clone()));
                }
            }
            out.push('\n');
        }
        trace!(lines = self.lines.len(), "rendered canonical layout");
        out
    }

    /// New indentation width of every line.
    fn target_widths(&self, indent_width: usize) -> Vec<usize> {
        let mut widths = vec![0; self.lines.len()];

        // Block levels from the stack of open indentation widths. The base
        // entry 0 is never popped.
        let mut stack: Vec<usize> = vec![0];
        for (i, line) in self.lines.iter().enumerate() {
            if line.kind != LineKind::Code {
                continue;
            }
            while stack.len() > 1 && line.width < stack[stack.len() - 1] {
                stack.pop();
            }
            if line.width > stack[stack.len() - 1] {
                stack.push(line.width);
            }
            widths[i] = (stack.len() - 1) * indent_width;
        }

        let code_lines: Vec<usize> = (0..self.lines.len())
            .filter(|&i| self.lines[i].kind == LineKind::Code)
            .collect();

        for (i, line) in self.lines.iter().enumerate() {
            match line.kind {
                LineKind::Comment => {
                    let next = code_lines.iter().find(|&&c| c > i);
                    let prev = code_lines.iter().rev().find(|&&c| c < i);
                    widths[i] = next.or(prev).map_or(0, |&c| widths[c]);
                }
                LineKind::Continuation(owner) => {
                    let shifted = (line.width + widths[owner]) as isize
                        - self.lines[owner].width as isize;
                    widths[i] = shifted.max(0) as usize;
                }
                _ => {}
            }
        }

        widths
    }

    fn normalize_line(&self, range: Range<usize>) -> String {
        let atoms = atoms(self.text, segments(range, &self.protected));
        render_atoms(&atoms)
    }
}

/// Split the normalized text into lines and decide how each one is laid out.
fn classify_lines(text: &str, protected: &[Protected]) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut depth: usize = 0;
    let mut backslash = false;
    let mut owner = 0;
    let mut start = 0;

    for raw in text.split('\n') {
        let range = start..start + raw.len();
        start = range.end + 1;

        let in_string = protected.iter().any(|p| {
            p.kind == ProtectedKind::Str && p.range.start < range.start && range.start < p.range.end
        });
        let continues = depth > 0 || backslash;
        let index = lines.len();

        let kind = if in_string {
            LineKind::InString
        } else if raw.trim().is_empty() {
            LineKind::Blank
        } else if continues {
            LineKind::Continuation(owner)
        } else {
            owner = index;
            let body_start = range.start + (raw.len() - raw.trim_start().len());
            let comment_only = protected
                .iter()
                .any(|p| p.kind == ProtectedKind::Comment && p.range.start == body_start);
            if comment_only {
                LineKind::Comment
            } else {
                LineKind::Code
            }
        };

        // Last non-space code character decides backslash continuation.
        let mut last_code_char = None;
        for (segment, piece) in segments(range.clone(), protected) {
            let slice = &text[piece];
            match segment {
                Segment::Code => {
                    for b in slice.bytes() {
                        match b {
                            b'(' | b'[' | b'{' => depth += 1,
                            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                            _ => {}
                        }
                    }
                    if let Some(c) = slice.trim_end().chars().last() {
                        last_code_char = Some(c);
                    }
                }
                Segment::Str | Segment::Comment => last_code_char = None,
            }
        }
        if kind != LineKind::Blank {
            backslash = last_code_char == Some('\\');
        }

        lines.push(Line {
            width: indent_width(raw),
            range,
            kind,
        });
    }
    lines
}

fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width = (width / 8 + 1) * 8,
            '\x0c' => width = 0,
            _ => break,
        }
    }
    width
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Atom<'s> {
    Space,
    Open(&'s str),
    Close(&'s str),
    Comma,
    Text(&'s str),
    Comment(&'s str),
}

fn atoms<'s>(text: &'s str, pieces: Vec<(Segment, Range<usize>)>) -> Vec<Atom<'s>> {
    let mut out = Vec::new();
    for (segment, piece) in pieces {
        let slice = &text[piece];
        match segment {
            Segment::Str => out.push(Atom::Text(slice)),
            Segment::Comment => out.push(Atom::Comment(slice.trim_end())),
            Segment::Code => {
                let mut run_start = None;
                for (i, c) in slice.char_indices() {
                    let atom = match c {
                        ' ' | '\t' | '\x0c' => Some(Atom::Space),
                        '(' | '[' | '{' => Some(Atom::Open(&slice[i..i + 1])),
                        ')' | ']' | '}' => Some(Atom::Close(&slice[i..i + 1])),
                        ',' => Some(Atom::Comma),
                        _ => None,
                    };
                    match atom {
                        Some(atom) => {
                            if let Some(s) = run_start.take() {
                                out.push(Atom::Text(&slice[s..i]));
                            }
                            if !(atom == Atom::Space && out.last() == Some(&Atom::Space)) {
                                out.push(atom);
                            }
                        }
                        None => {
                            run_start.get_or_insert(i);
                        }
                    }
                }
                if let Some(s) = run_start {
                    out.push(Atom::Text(&slice[s..]));
                }
            }
        }
    }
    out
}

fn render_atoms(atoms: &[Atom<'_>]) -> String {
    let mut out = String::new();
    let mut pending_space = false;
    let mut after_comma = false;
    let mut after_open = false;

    for atom in atoms {
        match *atom {
            Atom::Space => pending_space = true,
            Atom::Comment(comment) => {
                if !out.is_empty() {
                    out.push_str("  ");
                }
                out.push_str(comment);
                after_open = false;
                after_comma = false;
                pending_space = false;
            }
            Atom::Close(s) => {
                out.push_str(s);
                after_open = false;
                after_comma = false;
                pending_space = false;
            }
            Atom::Comma => {
                out.push(',');
                after_open = false;
                after_comma = true;
                pending_space = false;
            }
            Atom::Open(s) | Atom::Text(s) => {
                if !out.is_empty() && !after_open && (pending_space || after_comma) {
                    out.push(' ');
                }
                out.push_str(s);
                after_open = matches!(atom, Atom::Open(_));
                after_comma = false;
                pending_space = false;
            }
        }
    }
    out
}
