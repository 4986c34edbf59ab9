//! Annuity-with-balloon solver.
//!
//! A principal `P` (vehicle value less down payment) is repaid by `n` level
//! net instalments `A` at the flat monthly rate `i`, with a balloon `R`
//! (the buyout) due at maturity:
//!
//! ```text
//! A = (P - R·v) / F        forward
//! P =  A·F + R·v           inverse
//! v = (1+i)^-n,  F = (1 - v) / i   (F = n when i = 0)
//! ```
//!
//! In inverse mode a percent down payment or buyout refers to the unknown
//! vehicle value, so each of the four unit combinations collapses to its own
//! linear equation `coefficient · V = constant`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LeaseQuoteError;
use crate::lease::normalizer::{FinancingTerms, InverseParameters, LeaseParameters};
use crate::time_value::{
    annuity_factor, compound_factor, discount_factor, overflow, pmt_with_balloon,
};
use crate::types::{Money, Rate, UnitValue};
use crate::LeaseQuoteResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A fully resolved lease: every quantity in net currency.
///
/// Both solve directions produce this shape, so a forward quote and the
/// inverse solve of its instalment can be compared field by field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolvedLease {
    pub vehicle_value_net: Money,
    /// Down payment as entered (canonical form)
    pub down_payment_unit: UnitValue,
    /// Down payment resolved to currency
    pub down_payment: Money,
    pub buyout_unit: UnitValue,
    pub buyout: Money,
    /// Financed amount: vehicle value less down payment
    pub principal: Money,
    pub monthly_rate: Rate,
    pub term_months: u32,
    pub monthly_instalment_net: Money,
}

/// Linear equation in the unknown vehicle value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTerms {
    pub coefficient: Decimal,
    pub constant: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Solve for the net monthly instalment given the vehicle value.
pub fn solve_forward(params: &LeaseParameters) -> LeaseQuoteResult<SolvedLease> {
    let terms = &params.terms;
    let value = params.vehicle_value_net;
    let rate = terms.monthly_rate();
    let n = terms.term_months;

    let down_payment = terms.down_payment.resolve(value);
    let buyout = terms.buyout.resolve(value);
    check_resolved(value, down_payment, buyout)?;

    let principal = value - down_payment;
    if principal <= Decimal::ZERO {
        return Err(LeaseQuoteError::Computation(format!(
            "Financed principal {principal} is not positive"
        )));
    }

    // The balloon must be smaller than the principal grown over the term,
    // otherwise the instalment would be zero or negative.
    let grown_principal = principal
        .checked_mul(compound_factor(rate, n)?)
        .ok_or_else(|| overflow("Accrued principal"))?;
    if buyout >= grown_principal {
        return Err(LeaseQuoteError::Computation(format!(
            "Buyout {buyout} is not below the principal accrued over {n} months ({grown_principal})"
        )));
    }

    let instalment = pmt_with_balloon(rate, n, principal, buyout)?;

    Ok(SolvedLease {
        vehicle_value_net: value,
        down_payment_unit: terms.down_payment,
        down_payment,
        buyout_unit: terms.buyout,
        buyout,
        principal,
        monthly_rate: rate,
        term_months: n,
        monthly_instalment_net: instalment,
    })
}

/// Solve for the maximum net vehicle value given the target instalment.
pub fn solve_inverse(params: &InverseParameters) -> LeaseQuoteResult<SolvedLease> {
    let terms = &params.terms;
    let instalment = params.target_instalment_net;
    if instalment <= Decimal::ZERO {
        return Err(LeaseQuoteError::invalid(
            "target_instalment",
            "Target instalment must be positive",
        ));
    }

    let linear = linear_terms(terms, instalment)?;
    if linear.coefficient <= Decimal::ZERO {
        return Err(LeaseQuoteError::Computation(format!(
            "Down payment and discounted buyout absorb the whole vehicle value \
             (coefficient {}); no finite positive value solves this instalment",
            linear.coefficient
        )));
    }

    // A positive but vanishing coefficient sends the value past Decimal::MAX.
    let value = linear
        .constant
        .checked_div(linear.coefficient)
        .ok_or_else(|| overflow("Vehicle value"))?;
    let down_payment = terms.down_payment.resolve(value);
    let buyout = terms.buyout.resolve(value);
    check_resolved(value, down_payment, buyout)?;

    Ok(SolvedLease {
        vehicle_value_net: value,
        down_payment_unit: terms.down_payment,
        down_payment,
        buyout_unit: terms.buyout,
        buyout,
        principal: value - down_payment,
        monthly_rate: terms.monthly_rate(),
        term_months: terms.term_months,
        monthly_instalment_net: instalment,
    })
}

/// Collect `V` terms of `P = A·F + R·v` for the given unit combination.
pub fn linear_terms(terms: &FinancingTerms, instalment: Money) -> LeaseQuoteResult<LinearTerms> {
    let rate = terms.monthly_rate();
    let n = terms.term_months;
    let pv_instalments = instalment
        .checked_mul(annuity_factor(rate, n)?)
        .ok_or_else(|| overflow("Present value of instalments"))?;
    let v = discount_factor(rate, n)?;

    let checked = |fixed: Money, extra: Money| {
        fixed
            .checked_mul(v)
            .and_then(|pv| pv.checked_add(pv_instalments))
            .and_then(|sum| sum.checked_add(extra))
            .ok_or_else(|| overflow("Inverse constant"))
    };

    let (coefficient, constant) = match (terms.down_payment, terms.buyout) {
        // V(1 - d) = A·F + b·V·v
        (UnitValue::Percent(d), UnitValue::Percent(b)) => {
            (Decimal::ONE - d - b * v, pv_instalments)
        }
        // V(1 - d) = A·F + R·v
        (UnitValue::Percent(d), UnitValue::Amount(r)) => {
            (Decimal::ONE - d, checked(r, Decimal::ZERO)?)
        }
        // V - D = A·F + b·V·v
        (UnitValue::Amount(dp), UnitValue::Percent(b)) => {
            (Decimal::ONE - b * v, checked(Decimal::ZERO, dp)?)
        }
        // V - D = A·F + R·v
        (UnitValue::Amount(dp), UnitValue::Amount(r)) => (Decimal::ONE, checked(r, dp)?),
    };

    Ok(LinearTerms {
        coefficient,
        constant,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn check_resolved(value: Money, down_payment: Money, buyout: Money) -> LeaseQuoteResult<()> {
    if value <= Decimal::ZERO {
        return Err(LeaseQuoteError::Computation(format!(
            "Vehicle value {value} is not positive"
        )));
    }
    if down_payment >= value {
        return Err(LeaseQuoteError::Computation(format!(
            "Down payment {down_payment} is not below the vehicle value {value}"
        )));
    }
    if buyout >= value {
        return Err(LeaseQuoteError::Computation(format!(
            "Buyout {buyout} is not below the vehicle value {value}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn terms(down_payment: UnitValue, buyout: UnitValue) -> FinancingTerms {
        FinancingTerms {
            down_payment,
            term_months: 36,
            buyout,
            margin_rate: dec!(0.03),
            reference_rate: dec!(0.058),
        }
    }

    fn forward(value: Money, terms: FinancingTerms) -> LeaseParameters {
        LeaseParameters {
            vehicle_value_net: value,
            terms,
            tax_rate: dec!(0.19),
        }
    }

    fn inverse_of(solved: &SolvedLease, terms: FinancingTerms) -> InverseParameters {
        InverseParameters {
            target_instalment_net: solved.monthly_instalment_net,
            terms,
        }
    }

    fn assert_relative_close(actual: Decimal, expected: Decimal) {
        let rel = ((actual - expected) / expected).abs();
        assert!(
            rel < dec!(0.000001),
            "expected {expected}, got {actual} (relative error {rel})"
        );
    }

    // -----------------------------------------------------------------------
    // Forward mode
    // -----------------------------------------------------------------------

    #[test]
    fn test_forward_scenario_percent_percent() {
        let t = terms(UnitValue::Percent(dec!(0.10)), UnitValue::Percent(dec!(0.25)));
        let solved = solve_forward(&forward(dec!(121951.22), t)).unwrap();

        assert_eq!(solved.down_payment, dec!(12195.122));
        assert_eq!(solved.buyout, dec!(30487.805));
        assert_eq!(solved.principal, dec!(109756.098));
        // Principal 109,756.10, balloon 30,487.81 at 8.8%/12 over 36 months
        // gives roughly 2,700 per month.
        assert!(solved.monthly_instalment_net > dec!(2600));
        assert!(solved.monthly_instalment_net < dec!(2800));
    }

    #[test]
    fn test_forward_zero_rate_is_straight_line() {
        let mut t = terms(UnitValue::Amount(dec!(10000)), UnitValue::Amount(dec!(20000)));
        t.margin_rate = Decimal::ZERO;
        t.reference_rate = Decimal::ZERO;
        let solved = solve_forward(&forward(dec!(100000), t)).unwrap();
        // (P - R) / n = (90000 - 20000) / 36
        assert_eq!(solved.monthly_instalment_net, dec!(70000) / dec!(36));
    }

    #[test]
    fn test_forward_down_payment_amount_exceeding_value_rejected() {
        let t = terms(UnitValue::Amount(dec!(150000)), UnitValue::Percent(dec!(0.1)));
        let err = solve_forward(&forward(dec!(100000), t)).unwrap_err();
        assert!(err.is_computation());
    }

    #[test]
    fn test_forward_buyout_amount_exceeding_value_rejected() {
        let t = terms(UnitValue::Percent(dec!(0.1)), UnitValue::Amount(dec!(100000)));
        assert!(solve_forward(&forward(dec!(100000), t))
            .unwrap_err()
            .is_computation());
    }

    #[test]
    fn test_forward_balloon_above_grown_principal_rejected() {
        // 90% down leaves 10,000 financed; a 60,000 balloon can never be
        // reached by positive instalments.
        let t = terms(UnitValue::Percent(dec!(0.90)), UnitValue::Amount(dec!(60000)));
        assert!(solve_forward(&forward(dec!(100000), t))
            .unwrap_err()
            .is_computation());
    }

    #[test]
    fn test_forward_higher_down_payment_lowers_instalment() {
        let low = terms(UnitValue::Amount(dec!(5000)), UnitValue::Percent(dec!(0.2)));
        let high = terms(UnitValue::Amount(dec!(15000)), UnitValue::Percent(dec!(0.2)));
        let a_low = solve_forward(&forward(dec!(100000), low)).unwrap();
        let a_high = solve_forward(&forward(dec!(100000), high)).unwrap();
        assert!(a_high.monthly_instalment_net < a_low.monthly_instalment_net);
    }

    #[test]
    fn test_forward_longer_term_lowers_instalment() {
        let short = terms(UnitValue::Percent(dec!(0.1)), UnitValue::Percent(dec!(0.2)));
        let mut long = short;
        long.term_months = 48;
        let a_short = solve_forward(&forward(dec!(100000), short)).unwrap();
        let a_long = solve_forward(&forward(dec!(100000), long)).unwrap();
        assert!(a_long.monthly_instalment_net < a_short.monthly_instalment_net);
    }

    #[test]
    fn test_zero_rate_instalment_is_linear_in_term() {
        // With no interest A(n) = (P - R) / n: 90,000 financed, 20,000 balloon.
        for n in [12u32, 24, 36, 48, 60, 84] {
            let mut t = terms(UnitValue::Percent(dec!(0.10)), UnitValue::Percent(dec!(0.20)));
            t.margin_rate = Decimal::ZERO;
            t.reference_rate = Decimal::ZERO;
            t.term_months = n;
            let solved = solve_forward(&forward(dec!(100000), t)).unwrap();
            assert_eq!(solved.monthly_instalment_net, dec!(70000) / Decimal::from(n));
        }
    }

    // -----------------------------------------------------------------------
    // Inverse mode
    // -----------------------------------------------------------------------

    #[test]
    fn test_round_trip_all_unit_combinations() {
        let combos = [
            (UnitValue::Percent(dec!(0.10)), UnitValue::Percent(dec!(0.25))),
            (UnitValue::Percent(dec!(0.10)), UnitValue::Amount(dec!(30000))),
            (UnitValue::Amount(dec!(12000)), UnitValue::Percent(dec!(0.25))),
            (UnitValue::Amount(dec!(12000)), UnitValue::Amount(dec!(30000))),
        ];
        for (dp, bo) in combos {
            let t = terms(dp, bo);
            let solved = solve_forward(&forward(dec!(121951.22), t)).unwrap();
            let back = solve_inverse(&inverse_of(&solved, t)).unwrap();
            assert_relative_close(back.vehicle_value_net, dec!(121951.22));
            assert_relative_close(back.principal, solved.principal);
        }
    }

    #[test]
    fn test_round_trip_zero_rate() {
        let mut t = terms(UnitValue::Percent(dec!(0.2)), UnitValue::Percent(dec!(0.3)));
        t.margin_rate = Decimal::ZERO;
        t.reference_rate = Decimal::ZERO;
        let solved = solve_forward(&forward(dec!(80000), t)).unwrap();
        let back = solve_inverse(&inverse_of(&solved, t)).unwrap();
        assert_relative_close(back.vehicle_value_net, dec!(80000));
    }

    #[test]
    fn test_inverse_percent_sum_at_or_above_hundred_rejected() {
        // Zero rate means no discounting: 60% + 40% = 100%.
        let mut t = terms(UnitValue::Percent(dec!(0.60)), UnitValue::Percent(dec!(0.40)));
        t.margin_rate = Decimal::ZERO;
        t.reference_rate = Decimal::ZERO;
        let err = solve_inverse(&InverseParameters {
            target_instalment_net: dec!(1000),
            terms: t,
        })
        .unwrap_err();
        assert!(err.is_computation());
    }

    #[test]
    fn test_inverse_discounted_buyout_counts_against_coefficient() {
        // 30% + 99%·v with v ≈ 0.77 at 8.8% over 36 months exceeds 100%.
        let t = terms(UnitValue::Percent(dec!(0.30)), UnitValue::Percent(dec!(0.99)));
        let linear = linear_terms(&t, dec!(1000)).unwrap();
        assert!(linear.coefficient < Decimal::ZERO);
        assert!(solve_inverse(&InverseParameters {
            target_instalment_net: dec!(1000),
            terms: t,
        })
        .unwrap_err()
        .is_computation());
    }

    #[test]
    fn test_inverse_amount_amount_has_unit_coefficient() {
        let t = terms(UnitValue::Amount(dec!(5000)), UnitValue::Amount(dec!(10000)));
        let linear = linear_terms(&t, dec!(1500)).unwrap();
        assert_eq!(linear.coefficient, Decimal::ONE);
        let solved = solve_inverse(&InverseParameters {
            target_instalment_net: dec!(1500),
            terms: t,
        })
        .unwrap();
        assert_eq!(solved.vehicle_value_net, linear.constant);
        assert_eq!(solved.down_payment, dec!(5000));
    }

    #[test]
    fn test_inverse_buyout_amount_above_solved_value_rejected() {
        // Tiny instalment with a huge fixed balloon: the solved vehicle value
        // falls below the balloon itself.
        let t = terms(UnitValue::Amount(Decimal::ZERO), UnitValue::Amount(dec!(500000)));
        let linear = linear_terms(&t, dec!(10)).unwrap();
        assert!(linear.constant < dec!(500000));
        assert!(solve_inverse(&InverseParameters {
            target_instalment_net: dec!(10),
            terms: t,
        })
        .unwrap_err()
        .is_computation());
    }

    #[test]
    fn test_vanishing_coefficient_overflow_is_computation_error() {
        let mut t = terms(
            UnitValue::Percent(dec!(0.5)),
            UnitValue::Percent(dec!(0.4999999999999999999999999)),
        );
        t.margin_rate = Decimal::ZERO;
        t.reference_rate = Decimal::ZERO;
        let linear = linear_terms(&t, dec!(1000)).unwrap();
        assert!(linear.coefficient > Decimal::ZERO);
        assert!(solve_inverse(&InverseParameters {
            target_instalment_net: dec!(1000),
            terms: t,
        })
        .unwrap_err()
        .is_computation());
    }

    #[test]
    fn test_forward_compound_overflow_is_computation_error() {
        let mut t = terms(UnitValue::Percent(dec!(0.1)), UnitValue::Percent(dec!(0.25)));
        t.term_months = 10_000;
        assert!(solve_forward(&forward(dec!(121951.22), t))
            .unwrap_err()
            .is_computation());
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    fn unit_strategy(max_pct: u32, max_amount: u32) -> impl Strategy<Value = UnitValue> {
        prop_oneof![
            (0..max_pct).prop_map(|p| UnitValue::Percent(Decimal::from(p) / dec!(100))),
            (0..max_amount).prop_map(|a| UnitValue::Amount(Decimal::from(a))),
        ]
    }

    proptest! {
        #[test]
        fn prop_forward_inverse_round_trip(
            value in 50_000u32..500_000,
            dp in unit_strategy(40, 20_000),
            bo in unit_strategy(40, 20_000),
            term in 12u32..84,
            rate_bp in 0u32..1500,
        ) {
            let t = FinancingTerms {
                down_payment: dp,
                term_months: term,
                buyout: bo,
                margin_rate: Decimal::ZERO,
                reference_rate: Decimal::from(rate_bp) / dec!(10000),
            };
            let value = Decimal::from(value);
            let solved = solve_forward(&forward(value, t)).unwrap();
            let back = solve_inverse(&inverse_of(&solved, t)).unwrap();
            let rel = ((back.vehicle_value_net - value) / value).abs();
            prop_assert!(rel < dec!(0.000001), "relative error {}", rel);
        }

        #[test]
        fn prop_higher_down_payment_percent_strictly_lowers_instalment(
            value in 20_000u32..400_000,
            pct in 0u32..40,
            extra in 1u32..30,
            rate_bp in 0u32..1500,
        ) {
            let base = FinancingTerms {
                down_payment: UnitValue::Percent(Decimal::from(pct) / dec!(100)),
                term_months: 48,
                buyout: UnitValue::Percent(dec!(0.2)),
                margin_rate: Decimal::ZERO,
                reference_rate: Decimal::from(rate_bp) / dec!(10000),
            };
            let mut more = base;
            more.down_payment = UnitValue::Percent(Decimal::from(pct + extra) / dec!(100));
            let value = Decimal::from(value);
            let a = solve_forward(&forward(value, base)).unwrap();
            let b = solve_forward(&forward(value, more)).unwrap();
            prop_assert!(b.monthly_instalment_net < a.monthly_instalment_net);
        }

        #[test]
        fn prop_zero_rate_instalment_decreases_with_term(
            short in 1u32..300,
            extra in 1u32..300,
        ) {
            let base = FinancingTerms {
                down_payment: UnitValue::Amount(dec!(10000)),
                term_months: short,
                buyout: UnitValue::Amount(dec!(20000)),
                margin_rate: Decimal::ZERO,
                reference_rate: Decimal::ZERO,
            };
            let mut longer = base;
            longer.term_months = short + extra;
            let a = solve_forward(&forward(dec!(100000), base)).unwrap();
            let b = solve_forward(&forward(dec!(100000), longer)).unwrap();
            prop_assert_eq!(a.monthly_instalment_net, dec!(70000) / Decimal::from(short));
            prop_assert!(b.monthly_instalment_net < a.monthly_instalment_net);
        }

        #[test]
        fn prop_more_down_payment_strictly_lowers_instalment(
            dp in 0u32..30_000,
            extra in 1u32..10_000,
            rate_bp in 0u32..1500,
        ) {
            let base = FinancingTerms {
                down_payment: UnitValue::Amount(Decimal::from(dp)),
                term_months: 48,
                buyout: UnitValue::Percent(dec!(0.2)),
                margin_rate: Decimal::ZERO,
                reference_rate: Decimal::from(rate_bp) / dec!(10000),
            };
            let mut more = base;
            more.down_payment = UnitValue::Amount(Decimal::from(dp + extra));
            let a = solve_forward(&forward(dec!(100000), base)).unwrap();
            let b = solve_forward(&forward(dec!(100000), more)).unwrap();
            prop_assert!(b.monthly_instalment_net < a.monthly_instalment_net);
        }
    }
}
