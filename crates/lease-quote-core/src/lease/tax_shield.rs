//! Tax shield from deductible lease costs.

use rust_decimal::Decimal;

use crate::config::TaxShieldBasis;
use crate::lease::solver::SolvedLease;
use crate::types::{Money, Rate};

/// Interest paid over the schedule: instalments minus the principal they
/// actually repay (principal down to the balloon).
pub fn total_interest(lease: &SolvedLease) -> Money {
    let instalments = lease.monthly_instalment_net * Decimal::from(lease.term_months);
    let repaid = lease.principal - lease.buyout;
    // Sub-cent negatives only arise from decimal division at a zero rate.
    (instalments - repaid).max(Decimal::ZERO)
}

/// Income tax saved by deducting the lease costs selected by `basis`.
pub fn tax_shield(lease: &SolvedLease, tax_rate: Rate, basis: TaxShieldBasis) -> Money {
    if tax_rate.is_zero() {
        return Decimal::ZERO;
    }
    let deductible = match basis {
        TaxShieldBasis::InterestOnly => total_interest(lease),
        TaxShieldBasis::LeaseCost => {
            lease.down_payment + lease.monthly_instalment_net * Decimal::from(lease.term_months)
        }
    };
    deductible * tax_rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lease::normalizer::{FinancingTerms, LeaseParameters};
    use crate::lease::solver::solve_forward;
    use crate::types::UnitValue;
    use rust_decimal_macros::dec;

    fn solved(reference_rate: Rate) -> SolvedLease {
        solve_forward(&LeaseParameters {
            vehicle_value_net: dec!(100000),
            terms: FinancingTerms {
                down_payment: UnitValue::Percent(dec!(0.1)),
                term_months: 36,
                buyout: UnitValue::Percent(dec!(0.25)),
                margin_rate: Decimal::ZERO,
                reference_rate,
            },
            tax_rate: dec!(0.19),
        })
        .unwrap()
    }

    #[test]
    fn test_interest_is_instalments_minus_repaid_principal() {
        let lease = solved(dec!(0.088));
        let expected = lease.monthly_instalment_net * dec!(36) - (dec!(90000) - dec!(25000));
        assert_eq!(total_interest(&lease), expected);
        assert!(expected > Decimal::ZERO);
    }

    #[test]
    fn test_shield_scales_with_tax_rate() {
        let lease = solved(dec!(0.088));
        let shield = tax_shield(&lease, dec!(0.19), TaxShieldBasis::InterestOnly);
        assert_eq!(shield, total_interest(&lease) * dec!(0.19));
    }

    #[test]
    fn test_zero_tax_rate_gives_zero_shield() {
        let lease = solved(dec!(0.088));
        assert_eq!(
            tax_shield(&lease, Decimal::ZERO, TaxShieldBasis::LeaseCost),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_zero_interest_rate_gives_no_interest() {
        let lease = solved(Decimal::ZERO);
        assert!(total_interest(&lease) < dec!(0.0000001));
    }

    #[test]
    fn test_lease_cost_basis_includes_down_payment() {
        let lease = solved(dec!(0.088));
        let shield = tax_shield(&lease, dec!(0.19), TaxShieldBasis::LeaseCost);
        let expected = (dec!(10000) + lease.monthly_instalment_net * dec!(36)) * dec!(0.19);
        assert_eq!(shield, expected);
    }
}
