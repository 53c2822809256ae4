//! Tallyt CLI - the notebook calculator at the command line.
//!
//! `tallyt eval` runs a document and prints each line's result;
//! `tallyt check` runs the language pipeline without evaluating and
//! reports lexer/parser diagnostics.

mod config;
mod error;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use error::{Result, TallytError};
use tally_data::RatesInput;
use tally_drv::{Calculator, LineResultKind};
use tally_util::Settings;

/// Tallyt - a notebook calculator
///
/// Each line of the document is independently interpreted as
/// arithmetic, a unit/currency/temporal expression, a conversion, a
/// variable definition, or plain text.
#[derive(Parser, Debug)]
#[command(name = "tallyt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A notebook calculator", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "TALLYT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TALLYT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a document and print per-line results
    Eval(EvalArgs),
    /// Parse a document and report diagnostics without evaluating
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
struct EvalArgs {
    /// Document file, or `-` for stdin
    input: PathBuf,

    /// Exchange-rates JSON file
    #[arg(long, env = "TALLYT_RATES")]
    rates: Option<PathBuf>,

    /// User locale region (US, GB, …)
    #[arg(long, env = "TALLYT_LOCALE")]
    locale: Option<String>,

    /// Presentation settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Print line numbers
    #[arg(short = 'n', long)]
    numbered: bool,
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// Document file, or `-` for stdin
    input: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = run(&cli);
    if let Err(e) = outcome {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    match &cli.command {
        Commands::Eval(args) => run_eval(args, &config),
        Commands::Check(args) => run_check(args),
    }
}

fn read_document(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| TallytError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).map_err(|source| TallytError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn build_calculator(args: &EvalArgs, config: &Config) -> Result<Calculator> {
    let mut calculator = Calculator::new();

    let settings: Settings = match &args.settings {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| {
                TallytError::ReadFailed {
                    path: path.clone(),
                    source,
                }
            })?;
            serde_json::from_str(&text).map_err(|source| TallytError::InvalidSettings {
                path: path.clone(),
                source,
            })?
        }
        None => config.settings.clone(),
    };
    calculator.set_settings(settings);

    if let Some(locale) = args.locale.as_ref().or(config.locale.as_ref()) {
        calculator.set_user_locale(locale.clone());
    }

    if let Some(path) = args.rates.as_ref().or(config.rates.as_ref()) {
        let text = std::fs::read_to_string(path).map_err(|source| TallytError::ReadFailed {
            path: path.clone(),
            source,
        })?;
        let input: RatesInput =
            serde_json::from_str(&text).map_err(|source| TallytError::InvalidRates {
                path: path.clone(),
                source,
            })?;
        calculator.load_exchange_rates(input);
    }

    Ok(calculator)
}

fn run_eval(args: &EvalArgs, config: &Config) -> Result<()> {
    let document = read_document(&args.input)?;
    let calculator = build_calculator(args, config)?;
    let output = calculator.calculate(&document);
    tracing::debug!(lines = output.results.len(), "evaluated document");

    for result in &output.results {
        let rendered = match (&result.kind, &result.rendered) {
            (LineResultKind::Heading, Some(text)) => format!("# {text}"),
            (_, Some(text)) => text.clone(),
            (_, None) => String::new(),
        };
        if args.numbered {
            println!("{:>4} │ {rendered}", result.line);
        } else {
            println!("{rendered}");
        }
    }

    let total = output.errors.lexer.len() + output.errors.parser.len() + output.errors.runtime.len();
    if total > 0 {
        eprintln!(
            "{total} problem(s): {} lexer, {} parser, {} runtime",
            output.errors.lexer.len(),
            output.errors.parser.len(),
            output.errors.runtime.len()
        );
    }
    Ok(())
}

fn run_check(args: &CheckArgs) -> Result<()> {
    let document = read_document(&args.input)?;
    let calculator = Calculator::new();
    let output = calculator.parse(&document);

    let mut count = 0;
    for diag in output.errors.lexer.iter().chain(output.errors.parser.iter()) {
        eprintln!(
            "{}:{}: {}",
            diag.span.line, diag.span.column, diag.message
        );
        count += 1;
    }
    if count > 0 {
        return Err(TallytError::CheckFailed { count });
    }
    println!("ok");
    Ok(())
}
