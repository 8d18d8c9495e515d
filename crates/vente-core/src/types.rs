//! # Domain Types
//!
//! Small closed-set types shared by the formatters, validators and the
//! sales engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   SaleStatus    │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Pending        │   │  BankTransfer   │       │
//! │  │  1800 = 18%     │   │  Paid           │   │  Cash           │       │
//! │  └─────────────────┘   │  Overdue        │   │  Check          │       │
//! │                        │  Cancelled      │   │  MobileMoney    │       │
//! │  ┌─────────────────┐   └─────────────────┘   │  Card           │       │
//! │  │   DateValue     │   ┌─────────────────┐   └─────────────────┘       │
//! │  │  Native | Text  │   │   DateFormat    │                             │
//! │  └─────────────────┘   │ Short|Medium|   │                             │
//! │                        │ Long|Time       │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (the TVA rate applied by the vente form)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// The rate used when a form does not specify one (18%).
    pub const DEFAULT: TaxRate = TaxRate(1800);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round().max(0.0) as u32)
    }

    /// Creates a tax rate from a fraction (`0.18` → 18%).
    pub fn from_fraction(rate: f64) -> Self {
        TaxRate::from_percentage(rate * 100.0)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::DEFAULT
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The settlement status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Issued, waiting for payment.
    #[default]
    Pending,
    /// Fully paid.
    Paid,
    /// Past its due date and unpaid.
    Overdue,
    /// Cancelled; kept for history only.
    Cancelled,
}

impl SaleStatus {
    /// Label shown on the screens.
    pub fn label(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "En attente",
            SaleStatus::Paid => "Payée",
            SaleStatus::Overdue => "En retard",
            SaleStatus::Cancelled => "Annulée",
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SaleStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(SaleStatus::Pending),
            "paid" => Ok(SaleStatus::Paid),
            "overdue" => Ok(SaleStatus::Overdue),
            "cancelled" | "canceled" => Ok(SaleStatus::Cancelled),
            other => Err(ValidationError::InvalidFormat {
                field: "Statut".to_string(),
                reason: format!("'{}' n'est pas un statut connu", other),
            }),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the client settles the sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Bank transfer.
    #[default]
    BankTransfer,
    /// Physical cash payment.
    Cash,
    /// Cheque.
    Check,
    /// Mobile money wallet (Flooz, T-Money, ...).
    MobileMoney,
    /// Bank card.
    Card,
}

impl PaymentMethod {
    /// Every accepted method, in the order the picker lists them.
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::BankTransfer,
        PaymentMethod::Cash,
        PaymentMethod::Check,
        PaymentMethod::MobileMoney,
        PaymentMethod::Card,
    ];

    /// Label shown on the screens.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "Virement bancaire",
            PaymentMethod::Cash => "Espèces",
            PaymentMethod::Check => "Chèque",
            PaymentMethod::MobileMoney => "Mobile Money",
            PaymentMethod::Card => "Carte bancaire",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bank_transfer" | "transfer" => Ok(PaymentMethod::BankTransfer),
            "cash" => Ok(PaymentMethod::Cash),
            "check" | "cheque" => Ok(PaymentMethod::Check),
            "mobile_money" => Ok(PaymentMethod::MobileMoney),
            "card" => Ok(PaymentMethod::Card),
            other => Err(ValidationError::InvalidFormat {
                field: "Mode de paiement".to_string(),
                reason: format!("'{}' n'est pas un mode de paiement accepté", other),
            }),
        }
    }
}

// =============================================================================
// Date Format
// =============================================================================

/// The four date presentations used across the screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `15/01/2024`
    #[default]
    Short,
    /// `15 janv. 2024`
    Medium,
    /// `lundi 15 janvier 2024`
    Long,
    /// `14:30`
    Time,
}

impl FromStr for DateFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(DateFormat::Short),
            "medium" => Ok(DateFormat::Medium),
            "long" => Ok(DateFormat::Long),
            "time" => Ok(DateFormat::Time),
            other => Err(ValidationError::InvalidFormat {
                field: "format".to_string(),
                reason: format!("'{}' (attendu : short, medium, long, time)", other),
            }),
        }
    }
}

// =============================================================================
// Date Value
// =============================================================================

/// A date as received from a screen: a native value or text.
///
/// Dates are wall-clock values; no time zone conversion happens in the core.
#[derive(Debug, Clone, PartialEq)]
pub enum DateValue {
    /// Already a date-time.
    Native(NaiveDateTime),
    /// Raw text, ISO-like or `DD/MM/YYYY`.
    Text(String),
}

/// Text layouts accepted for a date-time, tried in order.
const DATETIME_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Text layouts accepted for a date without time (midnight is assumed).
const DATE_LAYOUTS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

impl DateValue {
    /// Interprets the value, or `None` when the text is not a date.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            DateValue::Native(value) => Some(*value),
            DateValue::Text(raw) => parse_date_text(raw.trim()),
        }
    }

    /// True when there is nothing to interpret (blank text).
    pub fn is_blank(&self) -> bool {
        matches!(self, DateValue::Text(raw) if raw.trim().is_empty())
    }
}

fn parse_date_text(raw: &str) -> Option<NaiveDateTime> {
    if raw.is_empty() {
        return None;
    }

    // Offsets are dropped: the screen shows the time it was given
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.naive_local());
    }

    DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .or_else(|| {
            DATE_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDate::parse_from_str(raw, layout).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

impl Default for DateValue {
    fn default() -> Self {
        DateValue::Text(String::new())
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(value: NaiveDateTime) -> Self {
        DateValue::Native(value)
    }
}

impl From<NaiveDate> for DateValue {
    fn from(value: NaiveDate) -> Self {
        DateValue::Native(value.and_time(chrono::NaiveTime::MIN))
    }
}

impl From<&str> for DateValue {
    fn from(value: &str) -> Self {
        DateValue::Text(value.to_string())
    }
}

impl From<String> for DateValue {
    fn from(value: String) -> Self {
        DateValue::Text(value)
    }
}

impl From<&DateValue> for DateValue {
    fn from(value: &DateValue) -> Self {
        value.clone()
    }
}

/// A missing value reads as blank text.
impl<T: Into<DateValue>> From<Option<T>> for DateValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
