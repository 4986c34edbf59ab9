use rust_decimal::Decimal;
use std::fs;

use lease_quote_core::EngineConfig;

/// Load the engine configuration, falling back to defaults when no file is
/// given. YAML is chosen by extension, everything else is parsed as JSON.
pub fn load_engine_config(
    path: Option<&str>,
    vat_rate: Option<Decimal>,
) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(p) => {
            let contents =
                fs::read_to_string(p).map_err(|e| format!("Failed to read '{}': {}", p, e))?;
            parse_engine_config(p, &contents)?
        }
        None => EngineConfig::default(),
    };
    if let Some(vat) = vat_rate {
        config.vat_rate = vat;
    }
    config.validate()?;
    Ok(config)
}

fn parse_engine_config(
    path: &str,
    contents: &str,
) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let config = if path.ends_with(".yaml") || path.ends_with(".yml") {
        serde_yaml::from_str(contents).map_err(|e| format!("Failed to parse '{}': {}", path, e))?
    } else {
        serde_json::from_str(contents).map_err(|e| format!("Failed to parse '{}': {}", path, e))?
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lease_quote_core::config::{CostComponent, TaxShieldBasis};
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_without_file() {
        let cfg = load_engine_config(None, None).unwrap();
        assert_eq!(cfg.vat_rate, dec!(0.23));
    }

    #[test]
    fn test_vat_override() {
        let cfg = load_engine_config(None, Some(dec!(0.08))).unwrap();
        assert_eq!(cfg.vat_rate, dec!(0.08));
        assert!(load_engine_config(None, Some(dec!(-0.1))).is_err());
    }

    #[test]
    fn test_yaml_config() {
        let yaml = "currency: EUR\ntax_shield_basis: lease_cost\nbreakdown_order: [buyout, instalments]\n";
        let cfg = parse_engine_config("engine.yaml", yaml).unwrap();
        assert_eq!(cfg.currency, "EUR");
        assert_eq!(cfg.tax_shield_basis, TaxShieldBasis::LeaseCost);
        assert_eq!(
            cfg.breakdown_order,
            vec![CostComponent::Buyout, CostComponent::Instalments]
        );
    }

    #[test]
    fn test_json_config() {
        let cfg = parse_engine_config("engine.json", r#"{"rounding_dp": 4}"#).unwrap();
        assert_eq!(cfg.rounding_dp, 4);
    }
}
