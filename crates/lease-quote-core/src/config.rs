//! Engine configuration.
//!
//! Tax-regime constants (VAT rate, tax shield model) and presentation
//! choices (currency label, rounding, chart ordering) are passed into the
//! engine explicitly so the solver never embeds them.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LeaseQuoteError;
use crate::types::Rate;
use crate::LeaseQuoteResult;

/// Which part of the lease cash flow is treated as tax deductible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxShieldBasis {
    /// Only the interest portion of the instalments.
    #[default]
    InterestOnly,
    /// Down payment plus all instalments (operating-lease style expensing).
    LeaseCost,
}

/// A bucket of the total nominal outlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostComponent {
    DownPayment,
    Instalments,
    Buyout,
}

impl CostComponent {
    pub fn label(&self) -> &'static str {
        match self {
            CostComponent::DownPayment => "Down payment",
            CostComponent::Instalments => "Sum of instalments",
            CostComponent::Buyout => "Buyout",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// VAT rate as a fraction (0.23 = 23%); gross = net * (1 + vat_rate)
    pub vat_rate: Rate,
    /// Currency label used in human-readable offer summaries
    pub currency: String,
    /// Decimal places applied to response values
    pub rounding_dp: u32,
    pub tax_shield_basis: TaxShieldBasis,
    /// Presentation order of the cost breakdown chart
    pub breakdown_order: Vec<CostComponent>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vat_rate: dec!(0.23),
            currency: "PLN".to_string(),
            rounding_dp: 2,
            tax_shield_basis: TaxShieldBasis::InterestOnly,
            breakdown_order: vec![
                CostComponent::DownPayment,
                CostComponent::Instalments,
                CostComponent::Buyout,
            ],
        }
    }
}

impl EngineConfig {
    /// Multiplier turning a net price into a gross one.
    pub fn vat_multiplier(&self) -> Decimal {
        Decimal::ONE + self.vat_rate
    }

    pub fn validate(&self) -> LeaseQuoteResult<()> {
        if self.vat_rate < Decimal::ZERO {
            return Err(LeaseQuoteError::invalid(
                "vat_rate",
                "VAT rate cannot be negative",
            ));
        }
        if self.rounding_dp > 10 {
            return Err(LeaseQuoteError::invalid(
                "rounding_dp",
                "At most 10 decimal places are supported",
            ));
        }
        let mut seen = Vec::with_capacity(self.breakdown_order.len());
        for c in &self.breakdown_order {
            if seen.contains(c) {
                return Err(LeaseQuoteError::invalid(
                    "breakdown_order",
                    format!("Component {:?} listed more than once", c),
                ));
            }
            seen.push(*c);
        }
        Ok(())
    }
}
