//! # Record Validation
//!
//! Runs a declarative rule table against a whole record in one call.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For EACH field declared in the RuleSet (fields are independent):       │
//! │                                                                         │
//! │   required ──► email ──► phone ──► minLength ──► maxLength ──► custom   │
//! │       │          │         │           │             │           │      │
//! │       └──────────┴─────────┴─────┬─────┴─────────────┴───────────┘      │
//! │                                  ▼                                      │
//! │                    first failure = the field's message,                 │
//! │                    remaining checks for that field are skipped          │
//! │                                                                         │
//! │  email / phone / length only look at non-blank values;                  │
//! │  custom always runs and sees the whole record.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use serde_json::json;
//! use vente_core::rules::{validate_form, FieldRules, RuleSet};
//!
//! let rules = RuleSet::new()
//!     .field("client", FieldRules::new().required().label("Client"))
//!     .field("email", FieldRules::new().email());
//!
//! let result = validate_form(&json!({ "client": "", "email": "awa@mail.tg" }), &rules);
//! assert!(!result.is_valid());
//! assert_eq!(result.error("client"), Some("Client est requis"));
//! assert_eq!(result.error("email"), None);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{check_length, validate_email, validate_phone, validate_required, ValidationResult};

// =============================================================================
// Custom Rule
// =============================================================================

type CustomCheck = dyn Fn(&str, &Value) -> Option<String> + Send + Sync;

/// A check written in code: receives the field value and the whole record,
/// returns an error message when the value is rejected.
#[derive(Clone)]
pub struct CustomRule(Arc<CustomCheck>);

impl CustomRule {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&str, &Value) -> Option<String> + Send + Sync + 'static,
    {
        CustomRule(Arc::new(check))
    }

    fn check(&self, value: &str, record: &Value) -> Option<String> {
        (self.0)(value, record)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomRule(..)")
    }
}

// =============================================================================
// Field Rules
// =============================================================================

/// The checks declared for one field.
///
/// Everything but `custom` can be loaded from JSON/TOML:
/// `{ "required": true, "minLength": 2, "label": "Nom" }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldRules {
    pub required: bool,
    pub email: bool,
    pub phone: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,

    /// Name used in messages; defaults to the field key.
    pub label: Option<String>,

    /// Replaces the message of any failing built-in check.
    pub message: Option<String>,

    #[serde(skip)]
    #[ts(skip)]
    pub custom: Option<CustomRule>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    pub fn phone(mut self) -> Self {
        self.phone = true;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn custom<F>(mut self, check: F) -> Self
    where
        F: Fn(&str, &Value) -> Option<String> + Send + Sync + 'static,
    {
        self.custom = Some(CustomRule::new(check));
        self
    }

    /// Runs the checks in priority order and stops at the first failure.
    fn check(&self, field: &str, value: &str, record: &Value) -> ValidationResult<()> {
        let label = self.label.as_deref().unwrap_or(field);
        let trimmed = value.trim();

        if self.required {
            validate_required(value, label)?;
        }

        if !trimmed.is_empty() {
            if self.email && !validate_email(trimmed) {
                return Err(ValidationError::InvalidEmail {
                    field: label.to_string(),
                });
            }
            if self.phone && !validate_phone(trimmed) {
                return Err(ValidationError::InvalidPhone {
                    field: label.to_string(),
                });
            }
            check_length(trimmed, label, self.min_length, self.max_length)?;
        }

        if let Some(custom) = &self.custom {
            if let Some(message) = custom.check(value, record) {
                return Err(ValidationError::Custom {
                    field: label.to_string(),
                    message,
                });
            }
        }

        Ok(())
    }
}

// =============================================================================
// Rule Set
// =============================================================================

/// Field name → rules. Deserializes from a plain map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    fields: BTreeMap<String, FieldRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares (or replaces) the rules of one field.
    pub fn field(mut self, name: impl Into<String>, rules: FieldRules) -> Self {
        self.fields.insert(name.into(), rules);
        self
    }

    /// Rules of one field, if declared.
    pub fn get(&self, name: &str) -> Option<&FieldRules> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldRules)> {
        self.fields.iter()
    }
}

// =============================================================================
// Form Validation Result
// =============================================================================

/// Record-level outcome: one message per failing field.
///
/// Built only from the error map, so `is_valid` can never disagree with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FormValidation {
    is_valid: bool,
    errors: BTreeMap<String, String>,
}

impl FormValidation {
    fn from_errors(errors: BTreeMap<String, String>) -> Self {
        FormValidation {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Message for one field, if it failed.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

// =============================================================================
// validate_form
// =============================================================================

/// Validates every field declared in `rules` against `data`.
///
/// Missing keys and `null` read as empty text; numbers and booleans read as
/// their JSON text. A `data` value that is not an object counts as an empty
/// record.
pub fn validate_form(data: &Value, rules: &RuleSet) -> FormValidation {
    let empty = Map::new();
    let record = data.as_object().unwrap_or(&empty);
    let mut errors = BTreeMap::new();

    for (field, field_rules) in rules.iter() {
        let value = field_text(record.get(field));

        if let Err(err) = field_rules.check(field, &value, data) {
            let message = match (&err, &field_rules.message) {
                (ValidationError::Custom { .. }, _) | (_, None) => err.to_string(),
                (_, Some(message)) => message.clone(),
            };
            errors.insert(field.clone(), message);
        }
    }

    debug!(fields = rules.len(), failed = errors.len(), "Validated form");
    FormValidation::from_errors(errors)
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
