use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lease_quote_core::lease::normalizer::{LeaseTermsInput, RateRequest, ValueRequest};
use lease_quote_core::quote;
use lease_quote_core::{EngineConfig, PriceType, UnitInput};

use crate::input;

/// Financing terms shared by every quote command
#[derive(Args, Debug, Default)]
pub struct TermsArgs {
    /// Down payment as a percentage of vehicle value (e.g. 10 for 10%)
    #[arg(long, conflicts_with = "down_payment_amount")]
    pub down_payment_pct: Option<Decimal>,

    /// Down payment as a fixed net amount
    #[arg(long)]
    pub down_payment_amount: Option<Decimal>,

    /// Lease term in months
    #[arg(long, alias = "months")]
    pub term: Option<u32>,

    /// Buyout as a percentage of vehicle value (e.g. 25 for 25%)
    #[arg(long, conflicts_with = "buyout_amount")]
    pub buyout_pct: Option<Decimal>,

    /// Buyout as a fixed net amount
    #[arg(long)]
    pub buyout_amount: Option<Decimal>,

    /// Lender margin in percent (e.g. 3 for 3%)
    #[arg(long)]
    pub margin: Option<Decimal>,

    /// Reference market rate in percent (e.g. 5.8 for WIBOR 5.8%)
    #[arg(long, alias = "wibor")]
    pub reference_rate: Option<Decimal>,

    /// Treat the entered price as gross (VAT-inclusive)
    #[arg(long)]
    pub gross: bool,
}

/// Arguments for the forward quote
#[derive(Args)]
pub struct RateArgs {
    /// Vehicle value (net unless --gross)
    #[arg(long)]
    pub vehicle_value: Option<Decimal>,

    /// Income tax rate in percent for the tax shield (e.g. 19)
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    #[command(flatten)]
    pub terms: TermsArgs,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the inverse quote
#[derive(Args)]
pub struct ValueArgs {
    /// Target monthly instalment (net unless --gross)
    #[arg(long)]
    pub instalment: Option<Decimal>,

    #[command(flatten)]
    pub terms: TermsArgs,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_rate(args: RateArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let request = rate_request(args, false)?;
    let result = quote::calculate_rate_with_metadata(&request, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_value(args: ValueArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ValueRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(request) = input::stdin::read_stdin()? {
        request
    } else {
        ValueRequest {
            target_instalment: args
                .instalment
                .ok_or("--instalment is required (or provide --input)")?,
            price_type: price_type(args.terms.gross),
            terms: terms_from_args(&args.terms)?,
        }
    };
    let result = quote::calculate_value_with_metadata(&request, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: RateArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let request = rate_request(args, true)?;
    let response = quote::calculate_rate(&request, config)?;
    let schedule = response.schedule.unwrap_or_default();
    Ok(serde_json::to_value(schedule)?)
}

fn rate_request(args: RateArgs, include_schedule: bool) -> Result<RateRequest, Box<dyn std::error::Error>> {
    let mut request: RateRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(request) = input::stdin::read_stdin()? {
        request
    } else {
        RateRequest {
            vehicle_value: args
                .vehicle_value
                .ok_or("--vehicle-value is required (or provide --input)")?,
            price_type: price_type(args.terms.gross),
            terms: terms_from_args(&args.terms)?,
            tax_rate_pct: args.tax_rate,
            include_schedule: false,
        }
    };
    request.include_schedule |= include_schedule;
    Ok(request)
}

fn terms_from_args(args: &TermsArgs) -> Result<LeaseTermsInput, Box<dyn std::error::Error>> {
    Ok(LeaseTermsInput {
        down_payment: unit_from_args(
            args.down_payment_pct,
            args.down_payment_amount,
            "--down-payment-pct or --down-payment-amount is required",
        )?,
        term_months: args.term.ok_or("--term is required (or provide --input)")?,
        buyout: unit_from_args(
            args.buyout_pct,
            args.buyout_amount,
            "--buyout-pct or --buyout-amount is required",
        )?,
        margin_pct: args.margin.unwrap_or(Decimal::ZERO),
        reference_rate_pct: args
            .reference_rate
            .ok_or("--reference-rate is required (or provide --input)")?,
    })
}

fn unit_from_args(
    pct: Option<Decimal>,
    amount: Option<Decimal>,
    missing: &'static str,
) -> Result<UnitInput, Box<dyn std::error::Error>> {
    match (pct, amount) {
        (Some(p), None) => Ok(UnitInput::Percent(p)),
        (None, Some(a)) => Ok(UnitInput::Amount(a)),
        (Some(_), Some(_)) => Err("Give either a percentage or an amount, not both".into()),
        (None, None) => Err(missing.into()),
    }
}

fn price_type(gross: bool) -> PriceType {
    if gross {
        PriceType::Gross
    } else {
        PriceType::Net
    }
}
