use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LeaseQuoteError;
use crate::LeaseQuoteResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Whether an entered price includes VAT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    #[default]
    Net,
    Gross,
}

/// Down payment or buyout as entered at the boundary.
///
/// Percent values are percentage points (`10` means 10% of the vehicle value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum UnitInput {
    Percent(Decimal),
    Amount(Money),
}

/// Canonical down payment or buyout: a fraction of the vehicle value, or a
/// fixed net amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum UnitValue {
    Percent(Rate),
    Amount(Money),
}

impl UnitValue {
    /// Resolve to currency against a known vehicle value.
    pub fn resolve(&self, reference_value: Money) -> Money {
        match self {
            UnitValue::Percent(fraction) => reference_value * fraction,
            UnitValue::Amount(amount) => *amount,
        }
    }

    pub fn is_percent(&self) -> bool {
        matches!(self, UnitValue::Percent(_))
    }
}

/// Convert a percentage-point input into a fraction, rejecting negatives.
pub(crate) fn percent_to_rate(field: &str, pct: Decimal) -> LeaseQuoteResult<Rate> {
    if pct < Decimal::ZERO {
        return Err(LeaseQuoteError::invalid(field, "Rate cannot be negative"));
    }
    Ok(pct / dec!(100))
}

/// Round a money value for presentation.
pub fn round_money(value: Money, dp: u32) -> Money {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
