//! # Error Types
//!
//! Domain-specific error types for vente-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vente-core errors (this file)                                         │
//! │  ├── CoreError        - Configuration and wrapped validation errors    │
//! │  └── ValidationError  - Field and record validation failures           │
//! │                                                                         │
//! │  Screens (out of scope)                                                │
//! │  └── display `ValidationError::to_string()` next to the field          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → host application                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. The `Display` output IS the message shown to the user (French UI)
//! 3. Errors are enum variants, never String
//! 4. Formatters never return errors; only validators and config loading do

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core errors outside of plain field validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration values are inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text is not valid TOML or has the wrong shape.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be rendered back to TOML.
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// `field` is the human-readable label of the field ("Client", "Email"),
/// not necessarily the record key.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} est requis")]
    Required { field: String },

    /// Value is shorter than the minimum length.
    #[error("{field} doit contenir au moins {min} caractères")]
    TooShort { field: String, min: usize },

    /// Value is longer than the maximum length.
    #[error("{field} ne doit pas dépasser {max} caractères")]
    TooLong { field: String, max: usize },

    /// Not a well-formed email address.
    #[error("Adresse email invalide")]
    InvalidEmail { field: String },

    /// Not a recognized phone number.
    #[error("Numéro de téléphone invalide")]
    InvalidPhone { field: String },

    /// Value cannot be interpreted (not a number, not a date, ...).
    #[error("{field} invalide : {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value is under the lower bound.
    #[error("{field} doit être supérieur ou égal à {min}")]
    BelowMinimum { field: String, min: f64 },

    /// Numeric value is over the upper bound.
    #[error("{field} doit être inférieur ou égal à {max}")]
    AboveMaximum { field: String, max: f64 },

    /// Value must be a whole number.
    #[error("{field} doit être un nombre entier")]
    NotAnInteger { field: String },

    /// Date is before the allowed range.
    #[error("{field} doit être postérieure au {min}")]
    DateTooEarly { field: String, min: String },

    /// Date is after the allowed range.
    #[error("{field} doit être antérieure au {max}")]
    DateTooLate { field: String, max: String },

    /// A sales record has no line that can be invoiced.
    #[error("Ajoutez au moins un article avec une quantité valide")]
    NoValidLine,

    /// Message produced by a custom rule or overridden by a rule set.
    #[error("{message}")]
    Custom { field: String, message: String },
}

impl ValidationError {
    /// Returns the field label this error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidEmail { field }
            | ValidationError::InvalidPhone { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::BelowMinimum { field, .. }
            | ValidationError::AboveMaximum { field, .. }
            | ValidationError::NotAnInteger { field }
            | ValidationError::DateTooEarly { field, .. }
            | ValidationError::DateTooLate { field, .. }
            | ValidationError::Custom { field, .. } => Some(field),
            ValidationError::NoValidLine => None,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "Client".to_string(),
        };
        assert_eq!(err.to_string(), "Client est requis");

        let err = ValidationError::TooShort {
            field: "Nom".to_string(),
            min: 3,
        };
        assert_eq!(err.to_string(), "Nom doit contenir au moins 3 caractères");

        let err = ValidationError::BelowMinimum {
            field: "Montant".to_string(),
            min: 0.0,
        };
        assert_eq!(err.to_string(), "Montant doit être supérieur ou égal à 0");
    }

    #[test]
    fn test_custom_message_is_verbatim() {
        let err = ValidationError::Custom {
            field: "confirm".to_string(),
            message: "Les mots de passe ne correspondent pas".to_string(),
        };
        assert_eq!(err.to_string(), "Les mots de passe ne correspondent pas");
        assert_eq!(err.field(), Some("confirm"));
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::NoValidLine.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert!(ValidationError::NoValidLine.field().is_none());
    }
}
