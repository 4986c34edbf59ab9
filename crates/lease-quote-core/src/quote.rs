//! Request-level quoting API.
//!
//! Composes the normalizer, the solver and the forward-mode decompositions,
//! and rounds the outcome for presentation. [`forward`] and [`inverse`] work
//! on canonical parameters and stay unrounded.

use std::time::Instant;

#[cfg(feature = "offer")]
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::lease::breakdown::{CostBreakdown, CostSlice};
use crate::lease::normalizer::{
    normalize_rate_request, normalize_value_request, InverseParameters, LeaseParameters,
    RateRequest, ValueRequest,
};
#[cfg(feature = "offer")]
use crate::lease::offer::{build_offer_summary, OfferSummary};
use crate::lease::schedule::{build_schedule, ScheduleRow};
use crate::lease::solver::{solve_forward, solve_inverse, SolvedLease};
use crate::lease::tax_shield::{tax_shield, total_interest};
use crate::time_value::overflow;
use crate::types::{round_money, with_metadata, ComputationOutput, Money};
use crate::LeaseQuoteResult;

// ---------------------------------------------------------------------------
// Engine results
// ---------------------------------------------------------------------------

/// Forward-mode result, unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardResult {
    pub monthly_instalment_net: Money,
    pub monthly_instalment_gross: Money,
    pub cost_breakdown: CostBreakdown,
    pub tax_shield: Money,
    pub total_interest: Money,
    pub lease: SolvedLease,
}

/// Inverse-mode result, unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverseResult {
    pub vehicle_value_net: Money,
    pub vehicle_value_gross: Money,
    pub lease: SolvedLease,
}

pub fn forward(params: &LeaseParameters, config: &EngineConfig) -> LeaseQuoteResult<ForwardResult> {
    let lease = solve_forward(params)?;
    Ok(ForwardResult {
        monthly_instalment_net: lease.monthly_instalment_net,
        monthly_instalment_gross: with_vat(lease.monthly_instalment_net, config)?,
        cost_breakdown: CostBreakdown::from_lease(&lease),
        tax_shield: tax_shield(&lease, params.tax_rate, config.tax_shield_basis),
        total_interest: total_interest(&lease),
        lease,
    })
}

pub fn inverse(
    params: &InverseParameters,
    config: &EngineConfig,
) -> LeaseQuoteResult<InverseResult> {
    let lease = solve_inverse(params)?;
    Ok(InverseResult {
        vehicle_value_net: lease.vehicle_value_net,
        vehicle_value_gross: with_vat(lease.vehicle_value_net, config)?,
        lease,
    })
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownView {
    pub down_payment: Money,
    pub sum_of_instalments: Money,
    pub buyout: Money,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateResponse {
    pub monthly_instalment_net: Money,
    pub monthly_instalment_gross: Money,
    pub breakdown: BreakdownView,
    /// Breakdown slices in configured chart order
    pub chart: Vec<CostSlice>,
    pub tax_shield: Money,
    pub total_interest: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduleRow>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueResponse {
    pub vehicle_value_net: Money,
    pub vehicle_value_gross: Money,
}

/// Quote the monthly instalment for a vehicle value.
#[tracing::instrument(level = "debug", skip_all, fields(term = request.terms.term_months))]
pub fn calculate_rate(request: &RateRequest, config: &EngineConfig) -> LeaseQuoteResult<RateResponse> {
    let params = normalize_rate_request(request, config)?;
    let result = forward(&params, config)?;
    debug!(
        instalment = %result.monthly_instalment_net,
        principal = %result.lease.principal,
        "forward solve complete"
    );
    Ok(present_rate(&result, config, request.include_schedule))
}

/// Quote the maximum vehicle value for a target instalment.
#[tracing::instrument(level = "debug", skip_all, fields(term = request.terms.term_months))]
pub fn calculate_value(
    request: &ValueRequest,
    config: &EngineConfig,
) -> LeaseQuoteResult<ValueResponse> {
    let params = normalize_value_request(request, config)?;
    let result = inverse(&params, config)?;
    debug!(value = %result.vehicle_value_net, "inverse solve complete");
    let dp = config.rounding_dp;
    Ok(ValueResponse {
        vehicle_value_net: round_money(result.vehicle_value_net, dp),
        vehicle_value_gross: round_money(result.vehicle_value_gross, dp),
    })
}

/// Quote a vehicle value and summarise it for the offer document.
#[cfg(feature = "offer")]
#[tracing::instrument(level = "debug", skip_all, fields(term = request.terms.term_months))]
pub fn prepare_offer(
    request: &RateRequest,
    config: &EngineConfig,
    prepared_on: NaiveDate,
) -> LeaseQuoteResult<OfferSummary> {
    let params = normalize_rate_request(request, config)?;
    let result = forward(&params, config)?;
    debug!(instalment = %result.monthly_instalment_net, "offer quote complete");
    build_offer_summary(&result.lease, config, prepared_on)
}

/// Forward quote wrapped in the standard computation envelope.
pub fn calculate_rate_with_metadata(
    request: &RateRequest,
    config: &EngineConfig,
) -> LeaseQuoteResult<ComputationOutput<RateResponse>> {
    let start = Instant::now();
    let response = calculate_rate(request, config)?;
    let warnings = rate_warnings(request, &response);
    Ok(with_metadata(
        "Annuity with balloon payment, flat monthly rate (reference + margin) / 12",
        request,
        warnings,
        start.elapsed().as_micros() as u64,
        response,
    ))
}

/// Inverse quote wrapped in the standard computation envelope.
pub fn calculate_value_with_metadata(
    request: &ValueRequest,
    config: &EngineConfig,
) -> LeaseQuoteResult<ComputationOutput<ValueResponse>> {
    let start = Instant::now();
    let response = calculate_value(request, config)?;
    Ok(with_metadata(
        "Inverse annuity with balloon payment solved as a linear equation in vehicle value",
        request,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        response,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn with_vat(net: Money, config: &EngineConfig) -> LeaseQuoteResult<Money> {
    net.checked_mul(config.vat_multiplier())
        .ok_or_else(|| overflow("Gross amount"))
}

fn present_rate(result: &ForwardResult, config: &EngineConfig, include_schedule: bool) -> RateResponse {
    let dp = config.rounding_dp;
    let breakdown = result.cost_breakdown.rounded(dp);
    let chart = breakdown.components(&config.breakdown_order);
    let schedule = include_schedule.then(|| {
        build_schedule(&result.lease)
            .iter()
            .map(|row| row.rounded(dp))
            .collect()
    });

    RateResponse {
        monthly_instalment_net: round_money(result.monthly_instalment_net, dp),
        monthly_instalment_gross: round_money(result.monthly_instalment_gross, dp),
        breakdown: BreakdownView {
            down_payment: breakdown.down_payment,
            sum_of_instalments: breakdown.sum_of_instalments,
            buyout: breakdown.buyout,
            total: breakdown.total(),
        },
        chart,
        tax_shield: round_money(result.tax_shield, dp),
        total_interest: round_money(result.total_interest, dp),
        schedule,
    }
}

fn rate_warnings(request: &RateRequest, response: &RateResponse) -> Vec<String> {
    let mut warnings = Vec::new();
    if request.tax_rate_pct.is_none() {
        warnings.push("No tax rate supplied; tax shield reported as zero".to_string());
    }
    if response.breakdown.buyout > response.breakdown.sum_of_instalments {
        warnings.push(format!(
            "Buyout {} exceeds the sum of instalments {}",
            response.breakdown.buyout, response.breakdown.sum_of_instalments
        ));
    }
    if request.terms.term_months > 120 {
        warnings.push(format!(
            "Term of {} months is unusually long for a vehicle lease",
            request.terms.term_months
        ));
    }
    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
