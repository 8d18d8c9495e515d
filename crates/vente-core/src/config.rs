//! # Core Configuration
//!
//! Locale-dependent constants the formatters and the sales engine need.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. TOML text handed in by the host application (highest priority)     │
//! │     The core never reads files or the environment itself.              │
//! │                                                                         │
//! │  2. Default Values (lowest priority)                                   │
//! │     FCFA, space grouping, +228, 18% TVA                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration Format
//! ```toml
//! [currency]
//! suffix = "FCFA"
//! group_separator = " "
//!
//! [phone]
//! country_prefix = "228"
//!
//! [sales]
//! tax_rate_bps = 1800
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::types::TaxRate;
use crate::{DEFAULT_COUNTRY_PREFIX, DEFAULT_CURRENCY_SUFFIX};

// =============================================================================
// Currency Format
// =============================================================================

/// How amounts are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// Appended after the number, separated by a space.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Inserted between groups of three digits.
    #[serde(default = "default_group_separator")]
    pub group_separator: String,
}

fn default_suffix() -> String {
    DEFAULT_CURRENCY_SUFFIX.to_string()
}

fn default_group_separator() -> String {
    " ".to_string()
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            suffix: default_suffix(),
            group_separator: default_group_separator(),
        }
    }
}

// =============================================================================
// Phone Settings
// =============================================================================

/// Phone number conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneSettings {
    /// International dialing prefix, digits only.
    #[serde(default = "default_country_prefix")]
    pub country_prefix: String,
}

fn default_country_prefix() -> String {
    DEFAULT_COUNTRY_PREFIX.to_string()
}

impl Default for PhoneSettings {
    fn default() -> Self {
        PhoneSettings {
            country_prefix: default_country_prefix(),
        }
    }
}

// =============================================================================
// Sales Settings
// =============================================================================

/// Sales form settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSettings {
    /// TVA rate in basis points (1800 = 18%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,
}

fn default_tax_rate_bps() -> u32 {
    TaxRate::DEFAULT.bps()
}

impl Default for SalesSettings {
    fn default() -> Self {
        SalesSettings {
            tax_rate_bps: default_tax_rate_bps(),
        }
    }
}

impl SalesSettings {
    /// Returns the configured rate.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

// =============================================================================
// Core Config
// =============================================================================

/// Complete configuration of the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub currency: CurrencyFormat,

    #[serde(default)]
    pub phone: PhoneSettings,

    #[serde(default)]
    pub sales: SalesSettings,
}

impl CoreConfig {
    /// Parses and validates configuration text; missing keys keep defaults.
    pub fn from_toml_str(contents: &str) -> CoreResult<Self> {
        let config: CoreConfig = toml::from_str(contents)?;
        config.validate()?;
        debug!(
            suffix = %config.currency.suffix,
            country_prefix = %config.phone.country_prefix,
            tax_rate_bps = config.sales.tax_rate_bps,
            "Loaded core config"
        );
        Ok(config)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> CoreResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CoreResult<()> {
        if self.currency.suffix.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "currency.suffix must not be empty".into(),
            ));
        }

        // Formatted amounts must parse back to the same value
        if self
            .currency
            .suffix
            .chars()
            .any(|c| c.is_ascii_digit() || matches!(c, '.' | ','))
        {
            return Err(CoreError::InvalidConfig(
                "currency.suffix must not contain digits, '.' or ','".into(),
            ));
        }
        if self
            .currency
            .group_separator
            .chars()
            .any(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        {
            return Err(CoreError::InvalidConfig(
                "currency.group_separator must not contain digits, '.', ',' or '-'".into(),
            ));
        }

        let prefix = &self.phone.country_prefix;
        if prefix.len() != 3 || !prefix.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::InvalidConfig(format!(
                "phone.country_prefix must be 3 digits, got '{}'",
                prefix
            )));
        }

        if self.sales.tax_rate_bps > 10000 {
            return Err(CoreError::InvalidConfig(format!(
                "sales.tax_rate_bps must be at most 10000, got {}",
                self.sales.tax_rate_bps
            )));
        }

        Ok(())
    }
}
