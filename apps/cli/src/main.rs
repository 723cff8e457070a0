//! Units calculator CLI
//!
//! Evaluates length expressions such as `1in + 2cm - (3mm - 1px)` and prints
//! the result in one unit.

mod commands;
mod config;
mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use unitscalc::{Calculator, Unit};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "unitscalc")]
#[command(version, about = "Calculator for lengths in mm, cm, in, px and pt", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (default: ./unitscalc.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression into a single unit
    Eval {
        /// Expression, e.g. "1in + 2cm - (3mm - 1px)"
        #[arg(allow_hyphen_values = true)]
        expression: String,

        /// Target unit (mm, cm, in, px, pt); defaults to the configured unit
        #[arg(short, long)]
        to: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the canonical form of an expression
    Pretty {
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },
    /// Print the tokens of an expression, one per line
    Tokens {
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },
    /// Print the base constants and the conversion ratio table
    Units,
    /// Evaluate expressions read line by line from stdin
    Repl {
        /// Initial target unit; change it in the session with `:to <unit>`
        #[arg(short, long)]
        to: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;
    tracing::debug!(
        default_unit = %config.default_unit,
        history_limit = config.history_limit,
        "Configuration loaded"
    );

    let calculator = Calculator::with_options(config.format_options());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Eval {
            expression,
            to,
            json,
        } => {
            let target = to.unwrap_or_else(|| config.default_unit.clone());
            commands::eval(&calculator, &expression, &target, json, &mut out)?;
        }
        Commands::Pretty { expression } => commands::pretty(&calculator, &expression, &mut out)?,
        Commands::Tokens { expression } => commands::tokens(&expression, &mut out)?,
        Commands::Units => commands::units(&calculator, &mut out)?,
        Commands::Repl { to } => {
            let target = match to {
                Some(code) => code.parse::<Unit>().context("Invalid target unit")?,
                None => config.target_unit()?,
            };
            let stdin = io::stdin();
            commands::repl(
                &calculator,
                target,
                config.history_limit,
                stdin.lock(),
                &mut out,
            )?;
        }
    }

    out.flush().context("Failed to flush output")?;
    Ok(())
}
