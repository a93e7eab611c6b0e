// Tip Time - Core Library
// Exposes the tip pipeline for the CLI, the terminal form, the API server and tests

pub mod normalize;
pub mod calculator;
pub mod currency;
pub mod config;
pub mod error;

#[cfg(feature = "tui")]
pub mod ui;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use normalize::{normalize_number, parse_decimal};
pub use calculator::{
    compute_tip, compute_default_tip, compute_formatted_tip,
    EmptyTipPolicy, Tip, TipCalculator, TipInput, DEFAULT_TIP_PERCENT,
};
pub use currency::{
    format_currency, process_locale_name,
    CurrencyFormat, SymbolPosition, DEFAULT_LOCALE, SUPPORTED_FORMATS,
};
pub use config::{AppConfig, ServerSettings};
pub use error::{Result, TipTimeError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
