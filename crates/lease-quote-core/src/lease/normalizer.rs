//! Parameter normalization.
//!
//! Converts raw request fields (gross or net prices, percentage points,
//! percent-or-amount unions) into canonical [`LeaseParameters`] or
//! [`InverseParameters`]. Percent unions stay unresolved: in inverse mode the
//! vehicle value they refer to is the unknown being solved for.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::LeaseQuoteError;
use crate::types::{percent_to_rate, Money, PriceType, Rate, UnitInput, UnitValue};
use crate::LeaseQuoteResult;

/// Longest accepted lease term (50 years).
pub const MAX_TERM_MONTHS: u32 = 600;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Financing terms shared by both solve directions, as entered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseTermsInput {
    /// Down payment, percent of vehicle value or fixed net amount
    pub down_payment: UnitInput,
    /// Lease term in months
    pub term_months: u32,
    /// Buyout (balloon) due at maturity
    pub buyout: UnitInput,
    /// Lender margin in percentage points (3 = 3%)
    pub margin_pct: Decimal,
    /// Reference market rate (e.g. WIBOR) in percentage points
    pub reference_rate_pct: Decimal,
}

/// Forward request: vehicle value known, instalment wanted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRequest {
    /// Vehicle price, net or gross per `price_type`
    pub vehicle_value: Money,
    #[serde(default)]
    pub price_type: PriceType,
    #[serde(flatten)]
    pub terms: LeaseTermsInput,
    /// Income tax rate in percentage points; absent means no tax shield
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate_pct: Option<Decimal>,
    /// Attach a month-by-month schedule to the response
    #[serde(default)]
    pub include_schedule: bool,
}

/// Inverse request: instalment known, maximum vehicle value wanted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueRequest {
    /// Target monthly instalment, net or gross per `price_type`
    pub target_instalment: Money,
    #[serde(default)]
    pub price_type: PriceType,
    #[serde(flatten)]
    pub terms: LeaseTermsInput,
}

// ---------------------------------------------------------------------------
// Canonical types
// ---------------------------------------------------------------------------

/// Canonical financing terms. All rates are fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingTerms {
    pub down_payment: UnitValue,
    pub term_months: u32,
    pub buyout: UnitValue,
    pub margin_rate: Rate,
    pub reference_rate: Rate,
}

impl FinancingTerms {
    /// Flat periodic rate: (reference + margin) / 12.
    pub fn monthly_rate(&self) -> Rate {
        (self.reference_rate + self.margin_rate) / dec!(12)
    }
}

/// Canonical forward-mode parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaseParameters {
    pub vehicle_value_net: Money,
    pub terms: FinancingTerms,
    pub tax_rate: Rate,
}

/// Canonical inverse-mode parameters. The vehicle value is the unknown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InverseParameters {
    pub target_instalment_net: Money,
    pub terms: FinancingTerms,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalize a forward request.
pub fn normalize_rate_request(
    request: &RateRequest,
    config: &EngineConfig,
) -> LeaseQuoteResult<LeaseParameters> {
    config.validate()?;
    if request.vehicle_value <= Decimal::ZERO {
        return Err(LeaseQuoteError::invalid(
            "vehicle_value",
            "Vehicle value must be positive",
        ));
    }
    let terms = normalize_terms(&request.terms)?;

    let tax_rate = match request.tax_rate_pct {
        Some(pct) => percent_to_rate("tax_rate_pct", pct)?,
        None => Decimal::ZERO,
    };
    if tax_rate > Decimal::ONE {
        return Err(LeaseQuoteError::invalid(
            "tax_rate_pct",
            "Tax rate cannot exceed 100%",
        ));
    }

    Ok(LeaseParameters {
        vehicle_value_net: to_net(request.vehicle_value, request.price_type, config),
        terms,
        tax_rate,
    })
}

/// Normalize an inverse request.
pub fn normalize_value_request(
    request: &ValueRequest,
    config: &EngineConfig,
) -> LeaseQuoteResult<InverseParameters> {
    config.validate()?;
    if request.target_instalment <= Decimal::ZERO {
        return Err(LeaseQuoteError::invalid(
            "target_instalment",
            "Target instalment must be positive",
        ));
    }
    let terms = normalize_terms(&request.terms)?;

    Ok(InverseParameters {
        target_instalment_net: to_net(request.target_instalment, request.price_type, config),
        terms,
    })
}

/// Strip VAT from a gross price. Net prices pass through unchanged.
pub fn to_net(value: Money, price_type: PriceType, config: &EngineConfig) -> Money {
    match price_type {
        PriceType::Net => value,
        PriceType::Gross => value / config.vat_multiplier(),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_terms(input: &LeaseTermsInput) -> LeaseQuoteResult<FinancingTerms> {
    if input.term_months == 0 {
        return Err(LeaseQuoteError::invalid(
            "term_months",
            "Lease term must be greater than zero",
        ));
    }
    if input.term_months > MAX_TERM_MONTHS {
        return Err(LeaseQuoteError::invalid(
            "term_months",
            format!("Lease term cannot exceed {MAX_TERM_MONTHS} months"),
        ));
    }
    Ok(FinancingTerms {
        down_payment: normalize_unit("down_payment", input.down_payment)?,
        term_months: input.term_months,
        buyout: normalize_unit("buyout", input.buyout)?,
        margin_rate: percent_to_rate("margin_pct", input.margin_pct)?,
        reference_rate: percent_to_rate("reference_rate_pct", input.reference_rate_pct)?,
    })
}

fn normalize_unit(field: &str, input: UnitInput) -> LeaseQuoteResult<UnitValue> {
    match input {
        UnitInput::Percent(pct) => {
            if pct < Decimal::ZERO || pct >= dec!(100) {
                return Err(LeaseQuoteError::invalid(
                    field,
                    "Percentage must be at least 0 and below 100",
                ));
            }
            Ok(UnitValue::Percent(pct / dec!(100)))
        }
        UnitInput::Amount(amount) => {
            if amount < Decimal::ZERO {
                return Err(LeaseQuoteError::invalid(field, "Amount cannot be negative"));
            }
            Ok(UnitValue::Amount(amount))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
