use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use pylens::cli::{Cli, Commands};
use pylens::commands::{self, inspect, CommandContext};
use pylens::formatting::FormattingConfig;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}

/// Logs go to stderr. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pylens={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let formatting = FormattingConfig::from_env().with_override(cli.color);
    let context = || CommandContext::load(cli.config.as_deref(), formatting);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    debug!(command = ?cli.command, "dispatching");
    match cli.command {
        Commands::Tokens { input, greedy } => {
            inspect::tokens(&context()?, &input, greedy, &mut out)?
        }
        Commands::Highlight {
            input,
            theme,
            greedy,
        } => inspect::highlight(&context()?, &input, theme, greedy, &mut out)?,
        Commands::Signatures { input, order } => {
            inspect::signatures(&context()?, &input, order, &mut out)?
        }
        Commands::Ast { input, indent } => inspect::ast(&context()?, &input, indent, &mut out)?,
        Commands::Format { inputs, check } => {
            let outcome = commands::format_inputs(&context()?, &inputs, check, &mut out)?;
            out.flush()?;
            if check && outcome.has_changes() {
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Analyze { input, format } => {
            commands::analyze_file(&context()?, &input, format, &mut out)?
        }
        Commands::Interactive => {
            let ctx = context()?;
            let stdin = io::stdin();
            commands::run_interactive(&ctx.pipeline(), &ctx.printer(), stdin.lock(), &mut out)?;
        }
        Commands::Init { force } => {
            let path = commands::init_config(force)?;
            writeln!(out, "Created {} configuration file", path.display())?;
        }
    }

    out.flush()?;
    Ok(ExitCode::SUCCESS)
}
