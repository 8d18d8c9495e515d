//! # Validation Module
//!
//! Field-level validators used by every data-entry screen.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Field validators (THIS MODULE)                               │
//! │  ├── bool predicates: email, phone, url                                │
//! │  ├── first-violation checks: amount, number, date, length              │
//! │  └── all-violations check: password                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Record validation (rules::validate_form)                     │
//! │  └── declarative rule table, one message per field                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Save gate (sales::validate_for_save)                         │
//! │  └── blocks persistence of a record that cannot be invoiced            │
//! │                                                                         │
//! │  Nothing here panics: malformed input is a validation failure.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vente_core::validation::{validate_email, validate_amount, AmountOptions};
//!
//! assert!(validate_email("awa@example.tg"));
//! assert!(validate_amount(&"12 000 FCFA".into(), &AmountOptions::default()).is_ok());
//! assert!(validate_amount(&"".into(), &AmountOptions::default()).is_err());
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Amount;
use crate::types::{DateFormat, DateValue};
use crate::DEFAULT_COUNTRY_PREFIX;

/// Result type for validation operations.
///
/// `Ok` means the field is valid; the `Err` message is what the screen shows.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Characters accepted as "special" by [`validate_password`].
const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

// =============================================================================
// Predicates
// =============================================================================

/// Checks the shape `local@domain.tld`.
///
/// ## Rules
/// - Exactly one `@`, no whitespace
/// - Non-empty local part
/// - Domain contains a `.` with at least one character on each side
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Checks a phone number against the default country prefix.
///
/// Only the digits count: 8 local digits, or 11 digits starting with `228`.
pub fn validate_phone(phone: &str) -> bool {
    validate_phone_with(phone, DEFAULT_COUNTRY_PREFIX)
}

/// Checks a phone number against the given country prefix.
pub fn validate_phone_with(phone: &str, country_prefix: &str) -> bool {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    digits.len() == 8
        || (digits.len() == country_prefix.len() + 8 && digits.starts_with(country_prefix))
}

/// Checks for an absolute `http`/`https` URL with a host.
pub fn validate_url(value: &str) -> bool {
    match url::Url::parse(value.trim()) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}

/// Checks that a field is not blank.
pub fn validate_required(value: &str, field: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Password
// =============================================================================

/// Password policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordOptions {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_number: bool,
    pub require_special: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        PasswordOptions {
            min_length: 6,
            require_uppercase: false,
            require_lowercase: false,
            require_number: false,
            require_special: false,
        }
    }
}

/// Outcome of [`validate_password`]: every violated rule, in policy order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PasswordValidation {
    is_valid: bool,
    errors: Vec<String>,
}

impl PasswordValidation {
    fn from_errors(errors: Vec<String>) -> Self {
        PasswordValidation {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Checks a password against a policy.
///
/// An empty password yields only the "required" message. Otherwise every
/// violated rule is reported, not just the first.
///
/// ```rust
/// use vente_core::validation::{validate_password, PasswordOptions};
///
/// let result = validate_password("abc", &PasswordOptions::default());
/// assert!(!result.is_valid());
/// assert_eq!(result.errors().len(), 1);
/// ```
pub fn validate_password(password: &str, options: &PasswordOptions) -> PasswordValidation {
    if password.is_empty() {
        return PasswordValidation::from_errors(vec![ValidationError::Required {
            field: "Le mot de passe".to_string(),
        }
        .to_string()]);
    }

    let mut errors = Vec::new();

    if password.chars().count() < options.min_length {
        errors.push(
            ValidationError::TooShort {
                field: "Le mot de passe".to_string(),
                min: options.min_length,
            }
            .to_string(),
        );
    }
    if options.require_uppercase && !password.chars().any(char::is_uppercase) {
        errors.push("Le mot de passe doit contenir au moins une majuscule".to_string());
    }
    if options.require_lowercase && !password.chars().any(char::is_lowercase) {
        errors.push("Le mot de passe doit contenir au moins une minuscule".to_string());
    }
    if options.require_number && !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Le mot de passe doit contenir au moins un chiffre".to_string());
    }
    if options.require_special && !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        errors.push("Le mot de passe doit contenir au moins un caractère spécial".to_string());
    }

    PasswordValidation::from_errors(errors)
}

// =============================================================================
// Amounts and Numbers
// =============================================================================

/// Constraints for [`validate_amount`].
#[derive(Debug, Clone, PartialEq)]
pub struct AmountOptions {
    pub field: String,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Default for AmountOptions {
    fn default() -> Self {
        AmountOptions {
            field: "Le montant".to_string(),
            required: true,
            min: Some(0.0),
            max: None,
        }
    }
}

/// Checks an amount: required → parseable → min → max, first violation only.
///
/// Returns the parsed value on success (`None` for an optional blank amount).
pub fn validate_amount(value: &Amount, options: &AmountOptions) -> ValidationResult<Option<f64>> {
    let field = label_or(&options.field, "Le montant");

    if value.is_blank() {
        if options.required {
            return Err(ValidationError::Required { field });
        }
        return Ok(None);
    }

    let amount = value.to_f64().ok_or_else(|| ValidationError::InvalidFormat {
        field: field.clone(),
        reason: "montant non numérique".to_string(),
    })?;

    check_bounds(amount, &field, options.min, options.max)?;
    Ok(Some(amount))
}

/// Constraints for [`validate_number`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumberOptions {
    pub field: String,
    pub required: bool,
    pub integer: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Checks a number: required → parseable → integer → min → max.
pub fn validate_number(value: &Amount, options: &NumberOptions) -> ValidationResult<Option<f64>> {
    let field = label_or(&options.field, "La valeur");

    if value.is_blank() {
        if options.required {
            return Err(ValidationError::Required { field });
        }
        return Ok(None);
    }

    let number = value.to_f64().ok_or_else(|| ValidationError::InvalidFormat {
        field: field.clone(),
        reason: "nombre attendu".to_string(),
    })?;

    if options.integer && number.fract() != 0.0 {
        return Err(ValidationError::NotAnInteger { field });
    }

    check_bounds(number, &field, options.min, options.max)?;
    Ok(Some(number))
}

fn check_bounds(value: f64, field: &str, min: Option<f64>, max: Option<f64>) -> ValidationResult<()> {
    if let Some(min) = min {
        if value < min {
            return Err(ValidationError::BelowMinimum {
                field: field.to_string(),
                min,
            });
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(ValidationError::AboveMaximum {
                field: field.to_string(),
                max,
            });
        }
    }
    Ok(())
}

// =============================================================================
// Dates
// =============================================================================

/// Constraints for [`validate_date`].
#[derive(Debug, Clone, PartialEq)]
pub struct DateOptions {
    pub field: String,
    pub required: bool,
    pub min_date: Option<NaiveDateTime>,
    pub max_date: Option<NaiveDateTime>,
}

impl Default for DateOptions {
    fn default() -> Self {
        DateOptions {
            field: "La date".to_string(),
            required: true,
            min_date: None,
            max_date: None,
        }
    }
}

/// Checks a date: required → parseable → min_date → max_date.
pub fn validate_date(
    value: &DateValue,
    options: &DateOptions,
) -> ValidationResult<Option<NaiveDateTime>> {
    let field = label_or(&options.field, "La date");

    if value.is_blank() {
        if options.required {
            return Err(ValidationError::Required { field });
        }
        return Ok(None);
    }

    let date = value.to_datetime().ok_or_else(|| ValidationError::InvalidFormat {
        field: field.clone(),
        reason: "date non reconnue".to_string(),
    })?;

    if let Some(min) = options.min_date {
        if date < min {
            return Err(ValidationError::DateTooEarly {
                field: field.clone(),
                min: crate::format::format_date(min, DateFormat::Short),
            });
        }
    }
    if let Some(max) = options.max_date {
        if date > max {
            return Err(ValidationError::DateTooLate {
                field: field,
                max: crate::format::format_date(max, DateFormat::Short),
            });
        }
    }

    Ok(Some(date))
}

// =============================================================================
// Length
// =============================================================================

/// Constraints for [`validate_length`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LengthOptions {
    pub field: String,
    pub required: bool,
    pub min: Option<usize>,
    pub max: Option<usize>,
}

/// Checks a text length (in characters, after trimming): required → min → max.
pub fn validate_length(value: &str, options: &LengthOptions) -> ValidationResult<()> {
    let field = label_or(&options.field, "Ce champ");
    let value = value.trim();

    if value.is_empty() {
        if options.required {
            return Err(ValidationError::Required { field });
        }
        return Ok(());
    }

    check_length(value, &field, options.min, options.max)
}

/// Shared by [`validate_length`] and the record-level rule engine.
pub(crate) fn check_length(
    value: &str,
    field: &str,
    min: Option<usize>,
    max: Option<usize>,
) -> ValidationResult<()> {
    let len = value.chars().count();

    if let Some(min) = min {
        if len < min {
            return Err(ValidationError::TooShort {
                field: field.to_string(),
                min,
            });
        }
    }
    if let Some(max) = max {
        if len > max {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max,
            });
        }
    }
    Ok(())
}

fn label_or(label: &str, fallback: &str) -> String {
    if label.trim().is_empty() {
        fallback.to_string()
    } else {
        label.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
