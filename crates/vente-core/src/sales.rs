//! # Sales Computation
//!
//! Line items, per-line totals and the subtotal → TVA → TTC chain of the
//! vente form.
//!
//! ## Line Item Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sales Record Operations                              │
//! │                                                                         │
//! │  Screen Action            Core Call                 Effect              │
//! │  ─────────────            ─────────                 ──────              │
//! │                                                                         │
//! │  "+ Article" ───────────► add_line() ─────────────► push {qty: "1"}    │
//! │                                                                         │
//! │  Type quantity/price ───► edit_line(i, field, v) ─► lineTotal = q × p   │
//! │                                                                         │
//! │  Type name ─────────────► edit_line(i, Name, v) ──► lineTotal untouched │
//! │                                                                         │
//! │  Trash icon ────────────► remove_line(i) ─────────► no-op on last line  │
//! │                                                                         │
//! │  Render totals ─────────► SalesTotals::compute() ─► subtotal/TVA/TTC    │
//! │                                                                         │
//! │  "Enregistrer" ─────────► validate_for_save() ────► Ok | field message  │
//! │                                                                         │
//! │  Every operation takes the record by value and returns the new one:    │
//! │  the screen owns the only copy.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use vente_core::sales::{LineField, SalesRecord, SalesTotals};
//! use vente_core::types::TaxRate;
//!
//! let record = SalesRecord::new()
//!     .edit_line(0, LineField::Quantity, "2")
//!     .edit_line(0, LineField::UnitPrice, "1500")
//!     .add_line()
//!     .edit_line(1, LineField::UnitPrice, "500");
//!
//! let totals = SalesTotals::compute(record.lines(), TaxRate::DEFAULT).formatted_default();
//! assert_eq!(totals.subtotal, "3 500");
//! assert_eq!(totals.tax, "630");
//! assert_eq!(totals.grand_total, "4 130");
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use tracing::debug;
use ts_rs::TS;

use crate::config::CurrencyFormat;
use crate::error::ValidationError;
use crate::format::format_currency_with;
use crate::money::{parse_amount, try_parse_amount, Amount, Money};
use crate::types::{PaymentMethod, SaleStatus, TaxRate};
use crate::validation::{validate_required, ValidationResult};

// =============================================================================
// Line Item
// =============================================================================

/// One row of a sales record.
///
/// `line_total` is derived: only the engine writes it, when the quantity or
/// the unit price changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit_price: String,
    #[serde(default)]
    line_total: String,
}

impl LineItem {
    /// A blank line: quantity `1`, no price, no total yet.
    pub fn new() -> Self {
        LineItem {
            name: String::new(),
            quantity: "1".to_string(),
            unit_price: String::new(),
            line_total: String::new(),
        }
    }

    /// The formatted total as last computed (`""` until first priced).
    pub fn line_total(&self) -> &str {
        &self.line_total
    }

    /// Numeric quantity (unparseable → 0).
    pub fn quantity_value(&self) -> f64 {
        parse_amount(&Amount::from(&self.quantity))
    }

    /// Numeric unit price (unparseable → 0).
    pub fn unit_price_value(&self) -> f64 {
        parse_amount(&Amount::from(&self.unit_price))
    }

    /// A line that can be invoiced: it has a name and a positive quantity.
    pub fn is_billable(&self) -> bool {
        !self.name.trim().is_empty() && self.quantity_value() > 0.0
    }

    fn recompute_total(&mut self, format: &CurrencyFormat) {
        let total = self.quantity_value() * self.unit_price_value();
        self.line_total = format_currency_with(total, true, format);
    }

    /// Keeps an incoming total that already shows quantity × price, in
    /// whatever currency format it was rendered; anything else is re-derived.
    /// A never-priced line keeps its empty total.
    fn reconcile_total(&mut self, format: &CurrencyFormat) {
        if self.line_total.trim().is_empty() && self.unit_price.trim().is_empty() {
            return;
        }

        let expected = Money::from_f64_rounded(self.quantity_value() * self.unit_price_value());
        let shown = try_parse_amount(&self.line_total).map(Money::from_f64_rounded);
        if shown != Some(expected) {
            self.recompute_total(format);
        }
    }
}

impl Default for LineItem {
    fn default() -> Self {
        LineItem::new()
    }
}

/// The editable fields of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum LineField {
    Name,
    Quantity,
    UnitPrice,
}

impl LineField {
    /// True for the fields `line_total` is derived from.
    pub fn affects_total(&self) -> bool {
        matches!(self, LineField::Quantity | LineField::UnitPrice)
    }
}

impl FromStr for LineField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(LineField::Name),
            "quantity" => Ok(LineField::Quantity),
            "unitPrice" | "unit_price" => Ok(LineField::UnitPrice),
            other => Err(ValidationError::InvalidFormat {
                field: "champ".to_string(),
                reason: format!("'{}' n'est pas un champ de ligne", other),
            }),
        }
    }
}

// =============================================================================
// Sales Record
// =============================================================================

/// A sale being edited: header fields plus at least one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    #[serde(default)]
    pub client: String,

    /// Issue date, as typed or picked on the screen.
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub due_date: String,

    #[serde(default)]
    pub reference: String,

    #[serde(default)]
    pub payment_method: PaymentMethod,

    #[serde(default)]
    pub status: SaleStatus,

    #[serde(default)]
    pub notes: String,

    #[serde(default = "default_lines", deserialize_with = "deserialize_lines")]
    lines: Vec<LineItem>,
}

fn default_lines() -> Vec<LineItem> {
    vec![LineItem::new()]
}

/// Incoming totals are checked against their lines and an empty list gets a
/// blank line.
fn deserialize_lines<'de, D>(deserializer: D) -> Result<Vec<LineItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut lines = Vec::<LineItem>::deserialize(deserializer)?;
    if lines.is_empty() {
        return Ok(default_lines());
    }

    let format = CurrencyFormat::default();
    for line in lines.iter_mut() {
        line.reconcile_total(&format);
    }
    Ok(lines)
}

impl Default for SalesRecord {
    fn default() -> Self {
        SalesRecord::new()
    }
}

impl SalesRecord {
    /// An empty record with a single blank line ready for editing.
    pub fn new() -> Self {
        SalesRecord {
            client: String::new(),
            date: String::new(),
            due_date: String::new(),
            reference: String::new(),
            payment_method: PaymentMethod::default(),
            status: SaleStatus::default(),
            notes: String::new(),
            lines: default_lines(),
        }
    }

    /// The lines, in display order.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Appends a blank line; existing lines are left as they are.
    pub fn add_line(mut self) -> Self {
        self.lines.push(LineItem::new());
        debug!(count = self.lines.len(), "Added line");
        self
    }

    /// Removes one line. Removing the last remaining line, or an index out of
    /// range, does nothing.
    pub fn remove_line(mut self, index: usize) -> Self {
        if self.lines.len() <= 1 {
            debug!(index = %index, "Refusing to remove the last line");
            return self;
        }
        if index >= self.lines.len() {
            debug!(index = %index, count = self.lines.len(), "Line index out of range");
            return self;
        }

        self.lines.remove(index);
        debug!(index = %index, count = self.lines.len(), "Removed line");
        self
    }

    /// Sets one field of a line with the default currency format.
    pub fn edit_line(self, index: usize, field: LineField, value: impl Into<String>) -> Self {
        self.edit_line_with(index, field, value, &CurrencyFormat::default())
    }

    /// Sets one field of a line; quantity and unit price edits re-derive the
    /// line total with `format`.
    pub fn edit_line_with(
        mut self,
        index: usize,
        field: LineField,
        value: impl Into<String>,
        format: &CurrencyFormat,
    ) -> Self {
        let Some(line) = self.lines.get_mut(index) else {
            debug!(index = %index, "Line index out of range");
            return self;
        };

        let value = value.into();
        match field {
            LineField::Name => line.name = value,
            LineField::Quantity => line.quantity = value,
            LineField::UnitPrice => line.unit_price = value,
        }

        if field.affects_total() {
            line.recompute_total(format);
            debug!(index = %index, line_total = %line.line_total, "Recomputed line total");
        }
        self
    }

    /// Subtotal, TVA and TTC of the current lines.
    pub fn totals(&self, rate: TaxRate) -> SalesTotals {
        SalesTotals::compute(&self.lines, rate)
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Sum of the line totals, read back from their formatted text.
///
/// A malformed total counts as zero.
pub fn compute_subtotal(lines: &[LineItem]) -> Money {
    lines
        .iter()
        .map(|line| Money::from_amount(&Amount::from(line.line_total())))
        .sum()
}

/// TVA on a subtotal at a fixed rate.
pub fn compute_tax(subtotal: Money, rate: TaxRate) -> Money {
    subtotal.calculate_tax(rate)
}

/// Subtotal plus TVA (TTC).
pub fn compute_grand_total(subtotal: Money, rate: TaxRate) -> Money {
    subtotal + compute_tax(subtotal, rate)
}

/// The three amounts shown under the line list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub grand_total: Money,
    pub rate: TaxRate,
}

/// [`SalesTotals`] rendered for display, without currency suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FormattedTotals {
    pub subtotal: String,
    pub tax: String,
    pub grand_total: String,
}

impl SalesTotals {
    pub fn compute(lines: &[LineItem], rate: TaxRate) -> Self {
        let subtotal = compute_subtotal(lines);
        SalesTotals {
            subtotal,
            tax: compute_tax(subtotal, rate),
            grand_total: compute_grand_total(subtotal, rate),
            rate,
        }
    }

    pub fn formatted(&self, format: &CurrencyFormat) -> FormattedTotals {
        FormattedTotals {
            subtotal: format_currency_with(self.subtotal, false, format),
            tax: format_currency_with(self.tax, false, format),
            grand_total: format_currency_with(self.grand_total, false, format),
        }
    }

    pub fn formatted_default(&self) -> FormattedTotals {
        self.formatted(&CurrencyFormat::default())
    }
}

// =============================================================================
// Save Gate
// =============================================================================

/// Decides whether a record may be handed to persistence.
///
/// ## Rules
/// - The client is not blank
/// - At least one line has a name and a quantity above zero
///
/// The record is only borrowed: a rejected save changes nothing.
pub fn validate_for_save(record: &SalesRecord) -> ValidationResult<()> {
    if let Err(err) = validate_required(&record.client, "Client") {
        debug!("Save rejected: no client");
        return Err(err);
    }

    if !record.lines.iter().any(LineItem::is_billable) {
        debug!(lines = record.lines.len(), "Save rejected: no billable line");
        return Err(ValidationError::NoValidLine);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn two_line_record() -> SalesRecord {
        SalesRecord::new()
            .edit_line(0, LineField::Name, "Ciment 50kg")
            .edit_line(0, LineField::Quantity, "2")
            .edit_line(0, LineField::UnitPrice, "1500")
            .add_line()
            .edit_line(1, LineField::Name, "Livraison")
            .edit_line(1, LineField::Quantity, "1")
            .edit_line(1, LineField::UnitPrice, "500")
    }

    #[test]
    fn test_new_record_has_one_blank_line() {
        let record = SalesRecord::new();
        assert_eq!(record.lines().len(), 1);
        assert_eq!(record.lines()[0].quantity, "1");
        assert_eq!(record.lines()[0].line_total(), "");
    }

    #[test]
    fn test_totals_example() {
        let record = two_line_record();
        assert_eq!(record.lines()[0].line_total(), "3 000 FCFA");
        assert_eq!(record.lines()[1].line_total(), "500 FCFA");

        let totals = record.totals(TaxRate::DEFAULT);
        assert_eq!(totals.subtotal.units(), 3500);
        assert_eq!(totals.tax.units(), 630);
        assert_eq!(totals.grand_total.units(), 4130);

        let shown = totals.formatted_default();
        assert_eq!(shown.subtotal, "3 500");
        assert_eq!(shown.tax, "630");
        assert_eq!(shown.grand_total, "4 130");
    }

    #[test]
    fn test_add_line_leaves_existing_lines() {
        let record = two_line_record();
        let before = record.lines().to_vec();
        let record = record.add_line();

        assert_eq!(record.lines().len(), 3);
        assert_eq!(&record.lines()[..2], before.as_slice());
        assert_eq!(record.lines()[2], LineItem::new());
    }

    #[test]
    fn test_remove_last_line_is_noop() {
        let record = SalesRecord::new().edit_line(0, LineField::Name, "Sable");
        let after = record.clone().remove_line(0);
        assert_eq!(after, record);
        assert_eq!(after.lines().len(), 1);
    }

    #[test]
    fn test_remove_line() {
        let record = two_line_record().remove_line(0);
        assert_eq!(record.lines().len(), 1);
        assert_eq!(record.lines()[0].name, "Livraison");

        let untouched = two_line_record().remove_line(7);
        assert_eq!(untouched.lines().len(), 2);
    }

    #[test]
    fn test_edit_name_never_touches_total() {
        let record = two_line_record();
        let total = record.lines()[0].line_total().to_string();
        let record = record.edit_line(0, LineField::Name, "Ciment 25kg");
        assert_eq!(record.lines()[0].line_total(), total);

        let fresh = SalesRecord::new().edit_line(0, LineField::Name, "Gravier");
        assert_eq!(fresh.lines()[0].line_total(), "");
    }

    #[test]
    fn test_edit_quantity_or_price_recomputes() {
        let record = two_line_record().edit_line(0, LineField::Quantity, "3");
        assert_eq!(record.lines()[0].line_total(), "4 500 FCFA");

        let record = record.edit_line(0, LineField::UnitPrice, "1 000 FCFA");
        assert_eq!(record.lines()[0].line_total(), "3 000 FCFA");

        let record = record.edit_line(0, LineField::UnitPrice, "abc");
        assert_eq!(record.lines()[0].line_total(), "0 FCFA");

        let record = record
            .edit_line(0, LineField::Quantity, "2,5")
            .edit_line(0, LineField::UnitPrice, "1001");
        assert_eq!(record.lines()[0].line_total(), "2 503 FCFA");
    }

    #[test]
    fn test_edit_out_of_range_is_noop() {
        let record = two_line_record();
        let after = record.clone().edit_line(9, LineField::Quantity, "5");
        assert_eq!(after, record);
    }

    #[test]
    fn test_edit_with_configured_format() {
        let config = crate::config::CoreConfig::from_toml_str(
            "[currency]\nsuffix = \"F CFA\"\ngroup_separator = \"'\"\n",
        )
        .unwrap();
        let format = &config.currency;

        let record = SalesRecord::new()
            .edit_line_with(0, LineField::UnitPrice, "2500", format)
            .add_line()
            .edit_line_with(1, LineField::Quantity, "2", format)
            .edit_line_with(1, LineField::UnitPrice, "1250000", format);
        assert_eq!(record.lines()[0].line_total(), "2'500 F CFA");
        assert_eq!(record.lines()[1].line_total(), "2'500'000 F CFA");

        let subtotal = compute_subtotal(record.lines());
        assert_eq!(subtotal.units(), 2_502_500);
        assert_eq!(
            format_currency_with(record.lines()[1].line_total(), true, format),
            "2'500'000 F CFA"
        );

        let json = serde_json::to_string(&record).unwrap();
        let back: SalesRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_huge_lines_saturate_instead_of_overflowing() {
        let record = SalesRecord::new()
            .edit_line(0, LineField::Quantity, "99999999999")
            .edit_line(0, LineField::UnitPrice, "99999999999")
            .add_line()
            .edit_line(1, LineField::Quantity, "99999999999")
            .edit_line(1, LineField::UnitPrice, "99999999999");

        let subtotal = compute_subtotal(record.lines());
        assert_eq!(subtotal.units(), i64::MAX);

        let totals = record.totals(TaxRate::DEFAULT);
        assert_eq!(totals.grand_total.units(), i64::MAX);
        assert!(totals.tax.is_positive());

        let single = SalesRecord::new()
            .edit_line(0, LineField::Quantity, "99999999999")
            .edit_line(0, LineField::UnitPrice, "99999999999");
        assert_eq!(single.totals(TaxRate::DEFAULT).grand_total.units(), i64::MAX);
    }

    #[test]
    fn test_subtotal_ignores_malformed_totals() {
        let mut lines = two_line_record().lines().to_vec();
        lines[1].line_total = "n/a".to_string();
        assert_eq!(compute_subtotal(&lines).units(), 3000);
        assert_eq!(compute_subtotal(&[]).units(), 0);
    }

    #[test]
    fn test_tax_and_grand_total() {
        let subtotal = Money::from_units(10_000);
        assert_eq!(compute_tax(subtotal, TaxRate::DEFAULT).units(), 1800);
        assert_eq!(compute_grand_total(subtotal, TaxRate::DEFAULT).units(), 11_800);
        assert_eq!(compute_grand_total(subtotal, TaxRate::zero()).units(), 10_000);
    }

    #[test]
    fn test_save_gate() {
        let record = two_line_record();
        assert_eq!(
            validate_for_save(&record),
            Err(ValidationError::Required {
                field: "Client".to_string()
            })
        );

        let mut record = record;
        record.client = "Quincaillerie du Golfe".to_string();
        assert!(validate_for_save(&record).is_ok());

        let unnamed = SalesRecord {
            client: "Quincaillerie du Golfe".to_string(),
            ..SalesRecord::new()
        }
        .edit_line(0, LineField::UnitPrice, "1500");
        assert_eq!(validate_for_save(&unnamed), Err(ValidationError::NoValidLine));

        let zero_quantity = unnamed
            .edit_line(0, LineField::Name, "Tôle")
            .edit_line(0, LineField::Quantity, "0");
        assert_eq!(
            validate_for_save(&zero_quantity),
            Err(ValidationError::NoValidLine)
        );
    }

    #[test]
    fn test_line_field_parsing() {
        assert_eq!("unitPrice".parse::<LineField>().unwrap(), LineField::UnitPrice);
        assert_eq!("quantity".parse::<LineField>().unwrap(), LineField::Quantity);
        assert!("lineTotal".parse::<LineField>().is_err());
    }

    #[test]
    fn test_unpriced_lines_survive_json() {
        let record = SalesRecord::new()
            .add_line()
            .edit_line(1, LineField::Name, "Transport");
        assert_eq!(record.lines()[1].line_total(), "");

        let json = serde_json::to_string(&record).unwrap();
        let back: SalesRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);

        let quantity_only = SalesRecord::new().edit_line(0, LineField::Quantity, "3");
        let json = serde_json::to_string(&quantity_only).unwrap();
        let back: SalesRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.lines()[0].line_total(), "0 FCFA");
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let json = serde_json::json!({
            "client": "Kara SARL",
            "paymentMethod": "mobile_money",
            "status": "paid",
            "lines": [
                { "name": "Riz", "quantity": "4", "unitPrice": "12 500", "lineTotal": "tampered" }
            ]
        });
        let record: SalesRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.payment_method, PaymentMethod::MobileMoney);
        assert_eq!(record.status, SaleStatus::Paid);
        assert_eq!(record.lines()[0].line_total(), "50 000 FCFA");

        let empty: SalesRecord = serde_json::from_value(serde_json::json!({ "lines": [] })).unwrap();
        assert_eq!(empty.lines().len(), 1);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["lines"][0]["lineTotal"], "50 000 FCFA");
        assert_eq!(value["dueDate"], "");
    }
}
