//! Quanta - unit-aware formula calculators on the command line

use clap::{Parser, Subcommand};
use quanta_calc::{Category, Dimension};
use quanta_cli::output::render_error;
use quanta_cli::{OutputFormat, Session};
use quanta_common::{logging, QuantaConfig};
use quanta_errors::QuantaResult;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(name = "quanta")]
#[command(about = "Quanta - unit-aware finance, physics and geometry calculators")]
#[command(long_about = "Quanta - unit-aware finance, physics and geometry calculators

Every formula can be solved for any one of its variables. Inputs are given as
NAME=VALUE[:UNIT]; a missing unit means the variable's default unit.

Examples:
  quanta list --category physics
  quanta show ohms-law
  quanta eval capacitor --solve Q C=10:µF V=5
  quanta eval cpm --solve cpm spend=3500 impressions=250000 --output json
  quanta convert 12000 BTU/h TR
  quanta units pressure
  quanta format 0.000123456 1234567")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (toml, yaml or json), merged over ./quanta.*
    #[arg(short, long, global = true, env = "QUANTA_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available formulas
    List {
        /// Only this category (finance, physics, math, custom)
        #[arg(long)]
        category: Option<Category>,
    },

    /// Show a formula's variables and solve expressions
    Show {
        /// Formula name, e.g. ohms-law
        formula: String,
    },

    /// Solve a formula for one variable
    Eval {
        /// Formula name, e.g. cpm
        formula: String,

        /// Variable to solve for (symbol or name)
        #[arg(short, long)]
        solve: String,

        /// Unit of the result (default: the variable's default unit)
        #[arg(short, long)]
        unit: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,

        /// Known values as NAME=VALUE[:UNIT]
        knowns: Vec<String>,
    },

    /// Convert a value between units of one dimension
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        from: String,
        to: String,
    },

    /// List unit tables
    Units {
        /// Only this dimension (length, pressure, ...)
        dimension: Option<Dimension>,
    },

    /// Format numbers the way results are displayed
    Format {
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<String>,
    },

    /// Print the effective configuration
    Config {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        output: OutputFormat,
    },
}

impl Commands {
    fn output(&self) -> OutputFormat {
        match self {
            Self::Eval { output, .. } | Self::Config { output } => *output,
            _ => OutputFormat::Text,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let output = cli.command.output();
    match run(cli) {
        Ok(text) => {
            print!("{}", text);
            ExitCode::SUCCESS
        },
        Err(e) => {
            debug!(code = e.error_code(), "command failed: {}", e);
            let rendered = render_error(&e, output);
            match output {
                OutputFormat::Text => eprint!("{}", rendered),
                OutputFormat::Json | OutputFormat::Yaml => print!("{}", rendered),
            }
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        },
    }
}

fn run(cli: Cli) -> QuantaResult<String> {
    let config = QuantaConfig::load(None, cli.config.as_deref())?;

    let mut settings = config.logging.clone();
    if cli.verbose {
        settings = settings.with_level("debug");
    }
    if cli.no_color {
        settings.ansi = false;
    }
    logging::init(&settings)?;
    debug!(config = ?cli.config, "quanta starting");

    let session = Session::new(config)?;

    match cli.command {
        Commands::List { category } => Ok(session.list(category)),
        Commands::Show { formula } => session.show(&formula),
        Commands::Eval {
            formula,
            solve,
            unit,
            output,
            knowns,
        } => session.eval(&formula, &solve, unit.as_deref(), &knowns, output),
        Commands::Convert { value, from, to } => session.convert(value, &from, &to),
        Commands::Units { dimension } => Ok(session.units(dimension)),
        Commands::Format { values } => Ok(session.format(&values)),
        Commands::Config { output } => session.dump_config(output),
    }
}
