use lease_quote_core::lease::normalizer::{RateRequest, ValueRequest};
use lease_quote_core::{quote, EngineConfig};
use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse an optional engine configuration; absent or empty means defaults.
fn engine_config(config_json: Option<String>) -> NapiResult<EngineConfig> {
    let config: EngineConfig = match config_json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => serde_json::from_str(json).map_err(to_napi_error)?,
        _ => EngineConfig::default(),
    };
    config.validate().map_err(to_napi_error)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_rate(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let config = engine_config(config_json)?;
    let input: RateRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = quote::calculate_rate(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_value(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let config = engine_config(config_json)?;
    let input: ValueRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = quote::calculate_value(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(
    input_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let config = engine_config(config_json)?;
    let mut input: RateRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    input.include_schedule = true;
    let output = quote::calculate_rate(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output.schedule.unwrap_or_default()).map_err(to_napi_error)
}
