//! Offer document payloads.
//!
//! The engine does not render or deliver documents. It builds the summary a
//! remote document service turns into an offer, and decodes what comes back.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::LeaseQuoteError;
use crate::lease::solver::SolvedLease;
use crate::time_value::overflow;
use crate::types::{round_money, Money, UnitValue};
use crate::LeaseQuoteResult;

/// Human-readable summary of a quoted lease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferSummary {
    pub vehicle_value_net: Money,
    pub vehicle_value_gross: Money,
    /// e.g. "10% (12195.12 PLN)" or "5000.00 PLN"
    pub down_payment_description: String,
    pub term_months: u32,
    pub buyout_description: String,
    pub monthly_instalment_net: Money,
    pub monthly_instalment_gross: Money,
    pub currency: String,
    pub prepared_on: NaiveDate,
}

/// Optional e-mail delivery of the rendered document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryDirective {
    pub send: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

/// Payload sent to the document service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRequest {
    pub params: OfferSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryDirective>,
}

/// What the document service returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferDocument {
    /// Base64-encoded PDF
    pub pdf_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_status: Option<String>,
}

impl OfferRequest {
    pub fn validate(&self) -> LeaseQuoteResult<()> {
        if self.params.term_months == 0 {
            return Err(LeaseQuoteError::invalid(
                "params.term_months",
                "Lease term must be greater than zero",
            ));
        }
        if self.params.monthly_instalment_net <= Money::ZERO {
            return Err(LeaseQuoteError::invalid(
                "params.monthly_instalment_net",
                "Instalment must be positive",
            ));
        }
        if let Some(delivery) = &self.delivery {
            if delivery.send {
                match delivery.recipient.as_deref().map(str::trim) {
                    Some(r) if looks_like_email(r) => {}
                    Some(_) => {
                        return Err(LeaseQuoteError::invalid(
                            "delivery.recipient",
                            "Recipient is not a valid e-mail address",
                        ))
                    }
                    None => {
                        return Err(LeaseQuoteError::invalid(
                            "delivery.recipient",
                            "Recipient e-mail is required when send is true",
                        ))
                    }
                }
            }
        }
        Ok(())
    }
}

impl OfferDocument {
    /// Decode the returned document.
    pub fn pdf_bytes(&self) -> LeaseQuoteResult<Vec<u8>> {
        STANDARD
            .decode(self.pdf_data.as_bytes())
            .map_err(|e| LeaseQuoteError::Upstream(format!("Document is not valid base64: {e}")))
    }
}

/// Build an offer summary from a solved lease in either direction.
pub fn build_offer_summary(
    lease: &SolvedLease,
    config: &EngineConfig,
    prepared_on: NaiveDate,
) -> LeaseQuoteResult<OfferSummary> {
    let dp = config.rounding_dp;
    let vat = config.vat_multiplier();
    let gross = |net: Money| {
        net.checked_mul(vat)
            .map(|g| round_money(g, dp))
            .ok_or_else(|| overflow("Gross amount"))
    };
    Ok(OfferSummary {
        vehicle_value_net: round_money(lease.vehicle_value_net, dp),
        vehicle_value_gross: gross(lease.vehicle_value_net)?,
        down_payment_description: describe_unit(
            lease.down_payment_unit,
            lease.down_payment,
            &config.currency,
            dp,
        ),
        term_months: lease.term_months,
        buyout_description: describe_unit(lease.buyout_unit, lease.buyout, &config.currency, dp),
        monthly_instalment_net: round_money(lease.monthly_instalment_net, dp),
        monthly_instalment_gross: gross(lease.monthly_instalment_net)?,
        currency: config.currency.clone(),
        prepared_on,
    })
}

fn describe_unit(unit: UnitValue, resolved: Money, currency: &str, dp: u32) -> String {
    let amount = round_money(resolved, dp);
    match unit {
        UnitValue::Percent(fraction) => {
            let pct = (fraction * dec!(100)).normalize();
            format!("{pct}% ({amount:.prec$} {currency})", prec = dp as usize)
        }
        UnitValue::Amount(_) => format!("{amount:.prec$} {currency}", prec = dp as usize),
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !s.contains(char::is_whitespace)
        }
        None => false,
    }
}
