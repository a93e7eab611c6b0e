use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tip_time::{AppConfig, CurrencyFormat, EmptyTipPolicy, TipCalculator, TipInput, SUPPORTED_FORMATS};

#[derive(Parser)]
#[command(name = "tip-time", version, about = "Calculate a tip from a bill amount and a service percentage")]
struct Cli {
    /// JSON config file (defaults to $TIP_TIME_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging to stderr (also enables logging in the form)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive form (default)
    Form,

    /// Compute a single tip
    Calc {
        /// Bill amount as typed; unparseable text counts as 0
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        amount: String,

        /// Tip percentage; omit to use the default percentage
        #[arg(long, allow_hyphen_values = true)]
        tip: Option<String>,

        /// Locale for currency formatting, e.g. de_DE
        #[arg(long)]
        locale: Option<String>,

        /// What an empty --tip "" means
        #[arg(long, value_enum)]
        empty_tip: Option<EmptyTipPolicy>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported locales
    Locales,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Form);

    // stderr output would corrupt the form's alternate screen
    let interactive = matches!(command, Command::Form);
    if !interactive || cli.verbose {
        init_logging(cli.verbose);
    }

    let mut config = AppConfig::load_unvalidated(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match command {
        Command::Form => {
            config.validate().context("Invalid configuration")?;
            run_ui_mode(&config)
        }
        Command::Calc { amount, tip, locale, empty_tip, json } => {
            config.apply_cli_overrides(locale, empty_tip);
            config.validate().context("Invalid configuration")?;
            run_calc(&config, &amount, tip.as_deref(), json)
        }
        Command::Locales => {
            run_locales();
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_calc(config: &AppConfig, amount: &str, tip: Option<&str>, json: bool) -> Result<()> {
    let calculator = TipCalculator::from_config(config).context("Invalid locale")?;

    let result = match tip {
        Some(tip) => calculator.calculate(&TipInput::new(amount, tip)),
        None => calculator.calculate_default(amount),
    };
    info!(locale = result.locale, tip = %result.tip, "Calculated tip");

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.formatted);
    }

    Ok(())
}

fn run_locales() {
    let current = CurrencyFormat::current();
    let sample = Decimal::new(123456789, 2);

    for format in SUPPORTED_FORMATS {
        let marker = if format.locale == current.locale { "*" } else { " " };
        println!(
            "{} {:<6} {}  {}",
            marker,
            format.locale,
            format.currency_code,
            format.format(sample)
        );
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig) -> Result<()> {
    let calculator = TipCalculator::from_config(config).context("Invalid locale")?;

    let mut app = tip_time::ui::App::new(calculator);
    tip_time::ui::run_ui(&mut app)?;

    let tip = app.tip();
    println!("Tip Amount: {}", tip.formatted);

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig) -> Result<()> {
    anyhow::bail!("Form mode not available; rebuild with --features tui or use `tip-time calc`")
}
