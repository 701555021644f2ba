//! Single-stage views: tokens, highlighting, signatures and the tree dump.

use anyhow::Result;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use super::CommandContext;
use crate::highlight::{HighlightTheme, ThemePreset};
use crate::io;
use crate::lexer::{ClassifiedToken, TokenizeMode, Tokenizer};
use crate::syntax::WalkOrder;

fn tokenizer_for(ctx: &CommandContext, greedy: bool) -> Tokenizer {
    if greedy {
        Tokenizer::new(TokenizeMode::Greedy, &ctx.config.category_tables())
    } else {
        ctx.config.tokenizer()
    }
}

/// One line per lexeme: byte span, category and the quoted text.
pub fn render_tokens(tokens: &[ClassifiedToken<'_>]) -> String {
    let mut out = String::new();
    for token in tokens {
        let span = format!("{}..{}", token.lexeme.start, token.lexeme.end);
        let _ = writeln!(
            out,
            "{span:<10} {:<9} {:?}",
            token.category.as_str(),
            token.lexeme.text
        );
    }
    out
}

pub fn tokens(ctx: &CommandContext, input: &Path, greedy: bool, out: &mut impl Write) -> Result<()> {
    let source = io::read_input(input)?;
    let pipeline = ctx.pipeline().with_tokenizer(tokenizer_for(ctx, greedy));
    write!(out, "{}", render_tokens(&pipeline.tokens(&source)))?;
    Ok(())
}

/// Theme for highlighting. ANSI markers are dropped when colors are off,
/// unless the preset was asked for explicitly.
fn theme_for(ctx: &CommandContext, preset: Option<ThemePreset>) -> HighlightTheme {
    match preset {
        Some(preset) => HighlightTheme::from_preset(preset),
        None => {
            let theme = ctx.config.theme();
            if theme == HighlightTheme::ansi() && !ctx.formatting.color.should_use_color() {
                HighlightTheme::plain()
            } else {
                theme
            }
        }
    }
}

pub fn highlight(
    ctx: &CommandContext,
    input: &Path,
    preset: Option<ThemePreset>,
    greedy: bool,
    out: &mut impl Write,
) -> Result<()> {
    let source = io::read_input(input)?;
    let pipeline = ctx
        .pipeline()
        .with_tokenizer(tokenizer_for(ctx, greedy))
        .with_theme(theme_for(ctx, preset));
    let highlighted = pipeline.highlight(&source);
    write!(out, "{highlighted}")?;
    if !highlighted.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

pub fn signatures(
    ctx: &CommandContext,
    input: &Path,
    order: Option<WalkOrder>,
    out: &mut impl Write,
) -> Result<()> {
    let source = io::read_input(input)?;
    let pipeline = ctx
        .pipeline()
        .with_walk_order(order.unwrap_or_else(|| ctx.config.walk_order()));
    for signature in pipeline.signatures_of(&source)? {
        writeln!(out, "{}", signature.describe())?;
    }
    Ok(())
}

pub fn ast(ctx: &CommandContext, input: &Path, indent: Option<usize>, out: &mut impl Write) -> Result<()> {
    let source = io::read_input(input)?;
    let pipeline = ctx
        .pipeline()
        .with_dump_indent(indent.unwrap_or_else(|| ctx.config.dump_indent()));
    write!(out, "{}", pipeline.dump_of(&source)?)?;
    Ok(())
}
