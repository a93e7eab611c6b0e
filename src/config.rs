// ⚙️ Configuration - defaults → JSON file → environment
// Everything is optional; an absent config is a valid config.

use crate::calculator::{EmptyTipPolicy, DEFAULT_TIP_PERCENT};
use crate::currency::CurrencyFormat;
use crate::error::{Result, TipTimeError};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "TIP_TIME_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Locale override; `None` means detect from the process environment
    pub locale: Option<String>,

    pub empty_tip: EmptyTipPolicy,

    pub default_tip_percent: Decimal,

    pub server: ServerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            locale: None,
            empty_tip: EmptyTipPolicy::Zero,
            default_tip_percent: DEFAULT_TIP_PERCENT,
            server: ServerSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerSettings {
    /// "host:port" for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| TipTimeError::ConfigRead {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        let config: AppConfig = serde_json::from_str(&content)?;
        debug!(path = ?path.as_ref(), "Loaded config file");
        Ok(config)
    }

    /// Full load: explicit path (or `TIP_TIME_CONFIG`), then env overrides, then validation
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Self::load_unvalidated(path)?;
        config.validate()?;
        Ok(config)
    }

    /// File and env layers only; callers layering CLI flags on top validate afterwards
    pub fn load_unvalidated(path: Option<&Path>) -> Result<Self> {
        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Command-line flags, the last layer
    pub fn apply_cli_overrides(&mut self, locale: Option<String>, empty_tip: Option<EmptyTipPolicy>) {
        if locale.is_some() {
            self.locale = locale;
        }
        if let Some(policy) = empty_tip {
            self.empty_tip = policy;
        }
    }

    /// Apply `TIP_TIME_*` overrides from a key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(locale) = lookup("TIP_TIME_LOCALE").filter(|v| !v.trim().is_empty()) {
            self.locale = Some(locale);
        }

        if let Some(policy) = lookup("TIP_TIME_EMPTY_TIP") {
            self.empty_tip = <EmptyTipPolicy as ValueEnum>::from_str(policy.trim(), true)
                .map_err(|_| {
                    TipTimeError::ConfigError(format!(
                        "TIP_TIME_EMPTY_TIP must be 'zero' or 'default', got '{}'",
                        policy
                    ))
                })?;
        }

        if let Some(host) = lookup("TIP_TIME_HOST").filter(|v| !v.trim().is_empty()) {
            self.server.host = host;
        }

        if let Some(port) = lookup("TIP_TIME_PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                TipTimeError::ConfigError(format!("TIP_TIME_PORT is not a valid port: '{}'", port))
            })?;
        }

        Ok(())
    }

    /// Reject settings no component could honor
    pub fn validate(&self) -> Result<()> {
        if let Some(locale) = &self.locale {
            CurrencyFormat::resolve(locale)?;
        }

        if self.server.port == 0 {
            return Err(TipTimeError::ConfigError("server.port must be non-zero".to_string()));
        }

        if self.server.host.trim().is_empty() {
            return Err(TipTimeError::ConfigError("server.host must not be empty".to_string()));
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.locale, None);
        assert_eq!(config.empty_tip, EmptyTipPolicy::Zero);
        assert_eq!(config.default_tip_percent, Decimal::from(15));
        assert_eq!(config.server.bind_address(), "127.0.0.1:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"locale": "de_DE", "empty_tip": "default", "server": {{"port": 8080}}}}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.locale.as_deref(), Some("de_DE"));
        assert_eq!(config.empty_tip, EmptyTipPolicy::Default);
        assert_eq!(config.default_tip_percent, Decimal::from(15));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_from_file_default_percent() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_tip_percent": "18.5"}}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_tip_percent, Decimal::new(185, 1));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, TipTimeError::ConfigRead { .. }));
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, TipTimeError::ConfigParse { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("TIP_TIME_LOCALE", "fr_FR.UTF-8"),
                ("TIP_TIME_EMPTY_TIP", "DEFAULT"),
                ("TIP_TIME_HOST", "0.0.0.0"),
                ("TIP_TIME_PORT", "9000"),
            ]))
            .unwrap();

        assert_eq!(config.locale.as_deref(), Some("fr_FR.UTF-8"));
        assert_eq!(config.empty_tip, EmptyTipPolicy::Default);
        assert_eq!(config.server.bind_address(), "0.0.0.0:9000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_override_errors() {
        let mut config = AppConfig::default();
        assert!(config.apply_overrides(lookup_from(&[("TIP_TIME_PORT", "http")])).is_err());
        assert!(config.apply_overrides(lookup_from(&[("TIP_TIME_EMPTY_TIP", "fifteen")])).is_err());
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup_from(&[("TIP_TIME_LOCALE", "  "), ("TIP_TIME_HOST", "")]))
            .unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_cli_locale_replaces_bad_env_locale() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup_from(&[("TIP_TIME_LOCALE", "xx_XX")]))
            .unwrap();
        assert!(config.validate().is_err());

        config.apply_cli_overrides(Some("de_DE".to_string()), Some(EmptyTipPolicy::Default));
        assert_eq!(config.locale.as_deref(), Some("de_DE"));
        assert_eq!(config.empty_tip, EmptyTipPolicy::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_absent_keep_config() {
        let mut config = AppConfig {
            locale: Some("ja_JP".to_string()),
            ..AppConfig::default()
        };
        config.apply_cli_overrides(None, None);
        assert_eq!(config.locale.as_deref(), Some("ja_JP"));
        assert_eq!(config.empty_tip, EmptyTipPolicy::Zero);
    }

    #[test]
    fn test_load_unvalidated_defers_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"locale": "xx_XX"}}"#).unwrap();

        let mut config = AppConfig::load_unvalidated(Some(file.path())).unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());

        config.apply_cli_overrides(Some("en_GB".to_string()), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let config = AppConfig {
            locale: Some("xx_XX".to_string()),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(TipTimeError::UnsupportedLocale(_))));

        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(matches!(config.validate(), Err(TipTimeError::ConfigError(_))));
    }
}
