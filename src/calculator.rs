// 🧮 Tip Calculator - raw inputs → formatted tip
// normalize → compute → format, invoked afresh on every input change

use crate::config::AppConfig;
use crate::currency::{format_currency, CurrencyFormat};
use crate::error::Result;
use crate::normalize::normalize_number;
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Tip percentage used when the caller supplies none at all
pub const DEFAULT_TIP_PERCENT: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

// ============================================================================
// CORE ARITHMETIC
// ============================================================================

/// `tip_percent / 100 * amount`
///
/// No bounds checking: negative and huge inputs scale the result accordingly.
/// Saturates at the Decimal range instead of overflowing. The result carries
/// no trailing fractional zeros.
pub fn compute_tip(amount: Decimal, tip_percent: Decimal) -> Decimal {
    (tip_percent / Decimal::ONE_HUNDRED)
        .saturating_mul(amount)
        .normalize()
}

/// Tip at `DEFAULT_TIP_PERCENT`, for callers that have no percentage to pass
pub fn compute_default_tip(amount: Decimal) -> Decimal {
    compute_tip(amount, DEFAULT_TIP_PERCENT)
}

/// End-to-end pipeline in the process locale
///
/// `format_currency(compute_tip(normalize_number(amount), normalize_number(tip)))`
pub fn compute_formatted_tip(raw_amount: &str, raw_tip_percent: &str) -> String {
    format_currency(compute_tip(
        normalize_number(raw_amount),
        normalize_number(raw_tip_percent),
    ))
}

// ============================================================================
// INPUT / OUTPUT TYPES
// ============================================================================

/// What an empty tip field means
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmptyTipPolicy {
    /// Blank tip field is a 0% tip
    #[default]
    Zero,
    /// Blank tip field falls back to the default percentage
    Default,
}

impl EmptyTipPolicy {
    pub fn name(&self) -> &str {
        match self {
            EmptyTipPolicy::Zero => "zero",
            EmptyTipPolicy::Default => "default",
        }
    }
}

/// TipInput - snapshot of the two text fields
///
/// The presentation layer owns the mutable text; the core only ever sees
/// one of these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipInput {
    /// Bill amount as typed
    #[serde(default)]
    pub amount: String,

    /// Tip percentage as typed
    #[serde(default)]
    pub tip_percent: String,
}

impl TipInput {
    pub fn new(amount: impl Into<String>, tip_percent: impl Into<String>) -> Self {
        TipInput {
            amount: amount.into(),
            tip_percent: tip_percent.into(),
        }
    }
}

/// Tip - result of one computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tip {
    /// Normalized bill amount
    pub amount: Decimal,

    /// Normalized tip percentage
    pub tip_percent: Decimal,

    /// Unrounded tip
    pub tip: Decimal,

    /// Tip in the calculator's currency format
    pub formatted: String,

    /// Locale the tip was formatted for
    pub locale: &'static str,
}

// ============================================================================
// CALCULATOR
// ============================================================================

/// TipCalculator - the pipeline with an explicit currency format and policy
///
/// `Copy` and immutable; share it freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipCalculator {
    format: &'static CurrencyFormat,
    empty_tip: EmptyTipPolicy,
    default_tip_percent: Decimal,
}

impl TipCalculator {
    pub fn new(format: &'static CurrencyFormat) -> Self {
        TipCalculator {
            format,
            empty_tip: EmptyTipPolicy::Zero,
            default_tip_percent: DEFAULT_TIP_PERCENT,
        }
    }

    /// Calculator bound to the process locale
    pub fn for_process_locale() -> Self {
        Self::new(CurrencyFormat::current())
    }

    /// Build from a loaded config; an explicit locale must be supported
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let format = match &config.locale {
            Some(name) => CurrencyFormat::resolve(name)?,
            None => CurrencyFormat::current(),
        };

        Ok(Self::new(format)
            .with_empty_tip_policy(config.empty_tip)
            .with_default_tip_percent(config.default_tip_percent))
    }

    /// Builder pattern: set empty-tip policy
    pub fn with_empty_tip_policy(mut self, policy: EmptyTipPolicy) -> Self {
        self.empty_tip = policy;
        self
    }

    /// Builder pattern: set the fallback percentage
    pub fn with_default_tip_percent(mut self, percent: Decimal) -> Self {
        self.default_tip_percent = percent;
        self
    }

    pub fn currency_format(&self) -> &'static CurrencyFormat {
        self.format
    }

    pub fn empty_tip_policy(&self) -> EmptyTipPolicy {
        self.empty_tip
    }

    pub fn default_tip_percent(&self) -> Decimal {
        self.default_tip_percent
    }

    /// Normalize the tip field, honoring the empty-tip policy
    ///
    /// Only a blank field is affected; non-numeric text is still 0.
    pub fn tip_percent(&self, raw: &str) -> Decimal {
        if self.empty_tip == EmptyTipPolicy::Default && raw.trim().is_empty() {
            return self.default_tip_percent;
        }
        normalize_number(raw)
    }

    /// Run the full pipeline for one input snapshot
    pub fn calculate(&self, input: &TipInput) -> Tip {
        let amount = normalize_number(&input.amount);
        let tip_percent = self.tip_percent(&input.tip_percent);
        self.build(amount, tip_percent)
    }

    /// Pipeline for a caller that omits the percentage entirely
    pub fn calculate_default(&self, raw_amount: &str) -> Tip {
        self.build(normalize_number(raw_amount), self.default_tip_percent)
    }

    /// Formatted tip only
    pub fn formatted(&self, input: &TipInput) -> String {
        self.calculate(input).formatted
    }

    fn build(&self, amount: Decimal, tip_percent: Decimal) -> Tip {
        let tip = compute_tip(amount, tip_percent);
        trace!(%amount, %tip_percent, %tip, "Computed tip");

        Tip {
            amount,
            tip_percent,
            tip,
            formatted: self.format.format(tip),
            locale: self.format.locale,
        }
    }
}

impl Default for TipCalculator {
    fn default() -> Self {
        Self::for_process_locale()
    }
}

// ============================================================================
// TESTS
// ============================================================================
