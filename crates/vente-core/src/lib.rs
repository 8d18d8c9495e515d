//! # vente-core: Form Logic for the Sales Screens
//!
//! This crate holds the logic every data-entry screen shares: display
//! formatting, field validation, record-level rule checking and the line
//! item math of the sales form. Everything here is a pure function of its
//! inputs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vente Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Screens (forms, lists, detail views)         │   │
//! │  │    Client form ──► Sales form ──► Invoice list ──► Settings    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON records / ts-rs bindings          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vente-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  format   │  │validation │  │   rules   │  │   sales   │  │   │
//! │  │   │ currency  │  │  fields   │  │ RuleSet   │  │ LineItem  │  │   │
//! │  │   │ dates     │  │  options  │  │ validate_ │  │ totals    │  │   │
//! │  │   │ phones    │  │           │  │   form    │  │ save gate │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │        money • types • config • error                          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO PERSISTENCE • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`format`] - Amounts, dates, phones and text for display (French)
//! - [`validation`] - Single-field checks with their messages
//! - [`rules`] - Declarative per-field rules checked over a whole record
//! - [`sales`] - Line items, subtotal/TVA/TTC and the save gate
//! - [`money`] - Lenient amount input and whole-unit [`Money`]
//! - [`types`] - Tax rate, statuses, payment methods, date inputs
//! - [`config`] - Currency, phone and tax settings read from TOML
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use vente_core::format::format_currency;
//! use vente_core::money::parse_amount;
//! use vente_core::validation::validate_email;
//!
//! let shown = format_currency(1_234_567, true);
//! assert_eq!(shown, "1 234 567 FCFA");
//! assert_eq!(parse_amount(&shown.as_str().into()), 1_234_567.0);
//!
//! assert!(validate_email("awa@exemple.tg"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod format;
pub mod money;
pub mod rules;
pub mod sales;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vente_core::Money` instead of
// `use vente_core::money::Money`

pub use config::{CoreConfig, CurrencyFormat};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Amount, Money};
pub use rules::{validate_form, FieldRules, FormValidation, RuleSet};
pub use sales::{LineField, LineItem, SalesRecord, SalesTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency suffix appended to formatted amounts.
pub const DEFAULT_CURRENCY_SUFFIX: &str = "FCFA";

/// International prefix of local phone numbers (Togo).
pub const DEFAULT_COUNTRY_PREFIX: &str = "228";
