// 💱 Currency Formatting - locale-default money rendering
// Symbol placement, grouping and minor-unit rounding per locale

use crate::error::{Result, TipTimeError};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::env;
use std::sync::OnceLock;
use tracing::{debug, warn};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Where the currency symbol sits relative to the number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// CurrencyFormat - the default currency pattern of one locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyFormat {
    /// Canonical locale name, e.g. "en_US"
    pub locale: &'static str,

    /// ISO 4217 code of the locale's currency
    pub currency_code: &'static str,

    pub symbol: &'static str,
    pub symbol_position: SymbolPosition,

    /// Text between symbol and number ("" or a no-break space)
    pub symbol_spacing: &'static str,

    pub decimal_separator: char,
    pub grouping_separator: &'static str,

    /// Size of the group closest to the decimal point
    pub primary_group: usize,

    /// Size of every further group (2 for Indian lakh/crore grouping)
    pub secondary_group: usize,

    /// Grouping only kicks in once the integer part has this many digits
    /// beyond the primary group
    pub min_grouping: usize,

    /// Digits in the currency's minor unit
    pub fraction_digits: u32,
}

const NBSP: &str = "\u{a0}";
const NARROW_NBSP: &str = "\u{202f}";

/// Locale used when the process locale is unset, "C"/"POSIX" or unknown
pub const DEFAULT_LOCALE: &str = "en_US";

/// Supported locales, first entry of each language is its primary territory
pub static SUPPORTED_FORMATS: &[CurrencyFormat] = &[
    CurrencyFormat {
        locale: "en_US",
        currency_code: "USD",
        symbol: "$",
        symbol_position: SymbolPosition::Prefix,
        symbol_spacing: "",
        decimal_separator: '.',
        grouping_separator: ",",
        primary_group: 3,
        secondary_group: 3,
        min_grouping: 1,
        fraction_digits: 2,
    },
    CurrencyFormat {
        locale: "en_GB",
        currency_code: "GBP",
        symbol: "£",
        symbol_position: SymbolPosition::Prefix,
        symbol_spacing: "",
        decimal_separator: '.',
        grouping_separator: ",",
        primary_group: 3,
        secondary_group: 3,
        min_grouping: 1,
        fraction_digits: 2,
    },
    CurrencyFormat {
        locale: "en_IN",
        currency_code: "INR",
        symbol: "₹",
        symbol_position: SymbolPosition::Prefix,
        symbol_spacing: "",
        decimal_separator: '.',
        grouping_separator: ",",
        primary_group: 3,
        secondary_group: 2,
        min_grouping: 1,
        fraction_digits: 2,
    },
    CurrencyFormat {
        locale: "de_DE",
        currency_code: "EUR",
        symbol: "€",
        symbol_position: SymbolPosition::Suffix,
        symbol_spacing: NBSP,
        decimal_separator: ',',
        grouping_separator: ".",
        primary_group: 3,
        secondary_group: 3,
        min_grouping: 1,
        fraction_digits: 2,
    },
    CurrencyFormat {
        locale: "fr_FR",
        currency_code: "EUR",
        symbol: "€",
        symbol_position: SymbolPosition::Suffix,
        symbol_spacing: NBSP,
        decimal_separator: ',',
        grouping_separator: NARROW_NBSP,
        primary_group: 3,
        secondary_group: 3,
        min_grouping: 1,
        fraction_digits: 2,
    },
    CurrencyFormat {
        locale: "es_ES",
        currency_code: "EUR",
        symbol: "€",
        symbol_position: SymbolPosition::Suffix,
        symbol_spacing: NBSP,
        decimal_separator: ',',
        grouping_separator: ".",
        primary_group: 3,
        secondary_group: 3,
        min_grouping: 2,
        fraction_digits: 2,
    },
    CurrencyFormat {
        locale: "it_IT",
        currency_code: "EUR",
        symbol: "€",
        symbol_position: SymbolPosition::Suffix,
        symbol_spacing: NBSP,
        decimal_separator: ',',
        grouping_separator: ".",
        primary_group: 3,
        secondary_group: 3,
        min_grouping: 1,
        fraction_digits: 2,
    },
    CurrencyFormat {
        locale: "pt_BR",
        currency_code: "BRL",
        symbol: "R$",
        symbol_position: SymbolPosition::Prefix,
        symbol_spacing: NBSP,
        decimal_separator: ',',
        grouping_separator: ".",
        primary_group: 3,
        secondary_group: 3,
        min_grouping: 1,
        fraction_digits: 2,
    },
    CurrencyFormat {
        locale: "ja_JP",
        currency_code: "JPY",
        symbol: "￥",
        symbol_position: SymbolPosition::Prefix,
        symbol_spacing: "",
        decimal_separator: '.',
        grouping_separator: ",",
        primary_group: 3,
        secondary_group: 3,
        min_grouping: 1,
        fraction_digits: 0,
    },
    CurrencyFormat {
        locale: "id_ID",
        currency_code: "IDR",
        symbol: "Rp",
        symbol_position: SymbolPosition::Prefix,
        symbol_spacing: "",
        decimal_separator: ',',
        grouping_separator: ".",
        primary_group: 3,
        secondary_group: 3,
        min_grouping: 1,
        fraction_digits: 2,
    },
];

impl CurrencyFormat {
    /// Look up a supported locale by name
    ///
    /// Accepts POSIX-style names ("de_DE.UTF-8", "fr_FR@euro"), BCP 47 style
    /// ("pt-BR") and bare languages ("ja" → "ja_JP"). "C" and "POSIX" map to
    /// the default locale.
    pub fn lookup(name: &str) -> Option<&'static CurrencyFormat> {
        let (language, territory) = canonicalize(name)?;

        if language == "c" || language == "posix" {
            return Self::lookup(DEFAULT_LOCALE);
        }

        match territory {
            Some(territory) => {
                let wanted = format!("{}_{}", language, territory);
                SUPPORTED_FORMATS.iter().find(|f| f.locale == wanted)
            }
            None => SUPPORTED_FORMATS
                .iter()
                .find(|f| f.locale.split('_').next() == Some(language.as_str())),
        }
    }

    /// Like `lookup`, but an unknown name is an error
    pub fn resolve(name: &str) -> Result<&'static CurrencyFormat> {
        Self::lookup(name).ok_or_else(|| TipTimeError::UnsupportedLocale(name.to_string()))
    }

    /// The fallback format (en_US)
    pub fn default_format() -> &'static CurrencyFormat {
        &SUPPORTED_FORMATS[0]
    }

    /// Format of the process locale, detected once
    pub fn current() -> &'static CurrencyFormat {
        static CURRENT: OnceLock<&'static CurrencyFormat> = OnceLock::new();
        CURRENT.get_or_init(detect_process_format)
    }

    /// Render a value as money in this format
    ///
    /// Rounds to the minor unit with banker's rounding (half-even) and always
    /// prints exactly `fraction_digits` decimals. Negative amounts get a
    /// leading '-'; a value that rounds to zero is printed unsigned.
    pub fn format(&self, value: Decimal) -> String {
        let rounded = value.round_dp_with_strategy(
            self.fraction_digits,
            RoundingStrategy::MidpointNearestEven,
        );
        let negative = rounded.is_sign_negative() && !rounded.is_zero();

        let digits = rounded.abs().to_string();
        let (int_digits, frac_digits) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        let mut number = self.group_integer(int_digits);
        if self.fraction_digits > 0 {
            number.push(self.decimal_separator);
            number.push_str(frac_digits);
            for _ in frac_digits.len()..self.fraction_digits as usize {
                number.push('0');
            }
        }

        let sign = if negative { "-" } else { "" };
        match self.symbol_position {
            SymbolPosition::Prefix => format!("{}{}{}{}", sign, self.symbol, self.symbol_spacing, number),
            SymbolPosition::Suffix => format!("{}{}{}{}", sign, number, self.symbol_spacing, self.symbol),
        }
    }

    fn group_integer(&self, digits: &str) -> String {
        if digits.len() < self.primary_group + self.min_grouping {
            return digits.to_string();
        }

        let mut groups = Vec::new();
        let (mut rest, last) = digits.split_at(digits.len() - self.primary_group);
        groups.push(last);

        while rest.len() > self.secondary_group {
            let (head, tail) = rest.split_at(rest.len() - self.secondary_group);
            groups.push(tail);
            rest = head;
        }
        if !rest.is_empty() {
            groups.push(rest);
        }

        groups.reverse();
        groups.join(self.grouping_separator)
    }
}

/// Format a value in the process locale's default currency
///
/// The only operation in the crate that consults locale state.
pub fn format_currency(value: Decimal) -> String {
    CurrencyFormat::current().format(value)
}

// ============================================================================
// LOCALE DETECTION
// ============================================================================

/// Locale name from the environment, POSIX precedence for monetary formatting
pub fn process_locale_name() -> Option<String> {
    locale_name_from(|var| env::var(var).ok())
}

fn locale_name_from<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    ["LC_ALL", "LC_MONETARY", "LANG"]
        .iter()
        .find_map(|var| lookup(var).filter(|value| !value.trim().is_empty()))
}

fn detect_process_format() -> &'static CurrencyFormat {
    match process_locale_name() {
        Some(name) => match CurrencyFormat::lookup(&name) {
            Some(format) => {
                debug!(locale = %name, resolved = format.locale, "Detected process locale");
                format
            }
            None => {
                warn!(locale = %name, fallback = DEFAULT_LOCALE, "Unsupported process locale, using fallback");
                CurrencyFormat::default_format()
            }
        },
        None => {
            debug!(fallback = DEFAULT_LOCALE, "No locale in environment");
            CurrencyFormat::default_format()
        }
    }
}

/// Split "de_DE.UTF-8@euro" into ("de", Some("DE"))
fn canonicalize(name: &str) -> Option<(String, Option<String>)> {
    let base = name
        .trim()
        .split(['.', '@'])
        .next()
        .unwrap_or("");
    if base.is_empty() {
        return None;
    }

    let mut parts = base.split(['_', '-']);
    let language = parts.next()?.to_ascii_lowercase();
    if language.is_empty() {
        return None;
    }
    let territory = parts
        .next()
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_uppercase());

    Some((language, territory))
}

// ============================================================================
// TESTS
// ============================================================================
