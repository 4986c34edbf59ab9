use rust_decimal::Decimal;

use crate::error::LeaseQuoteError;
use crate::types::{Money, Rate};
use crate::LeaseQuoteResult;

/// Error for a product or quotient outside the representable Decimal range.
pub(crate) fn overflow(context: &str) -> LeaseQuoteError {
    LeaseQuoteError::Computation(format!("{context} overflowed the decimal range"))
}

/// (1 + rate)^nper by repeated multiplication, exact for Decimal.
pub fn compound_factor(rate: Rate, nper: u32) -> LeaseQuoteResult<Decimal> {
    let one_plus_r = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    for _ in 0..nper {
        factor = factor
            .checked_mul(one_plus_r)
            .ok_or_else(|| overflow("Compound factor"))?;
    }
    Ok(factor)
}

/// Present value of one currency unit due after `nper` periods.
pub fn discount_factor(rate: Rate, nper: u32) -> LeaseQuoteResult<Decimal> {
    let factor = compound_factor(rate, nper)?;
    if factor.is_zero() {
        return Err(LeaseQuoteError::Computation(
            "Discount factor underflowed to zero".into(),
        ));
    }
    Ok(Decimal::ONE / factor)
}

/// Present value of a level payment of 1 per period.
///
/// Degenerates to `nper` at a zero rate.
pub fn annuity_factor(rate: Rate, nper: u32) -> LeaseQuoteResult<Decimal> {
    if nper == 0 {
        return Err(LeaseQuoteError::invalid(
            "nper",
            "Number of periods must be > 0",
        ));
    }
    if rate.is_zero() {
        return Ok(Decimal::from(nper));
    }
    let v = discount_factor(rate, nper)?;
    (Decimal::ONE - v)
        .checked_div(rate)
        .ok_or_else(|| overflow("Annuity factor"))
}

/// Present value of `nper` level payments plus a balloon paid with the last one.
pub fn pv_with_balloon(rate: Rate, nper: u32, pmt: Money, balloon: Money) -> LeaseQuoteResult<Money> {
    let af = annuity_factor(rate, nper)?;
    let v = discount_factor(rate, nper)?;
    let pv_payments = pmt.checked_mul(af).ok_or_else(|| overflow("Present value of payments"))?;
    let pv_balloon = balloon.checked_mul(v).ok_or_else(|| overflow("Present value of balloon"))?;
    pv_payments
        .checked_add(pv_balloon)
        .ok_or_else(|| overflow("Present value"))
}

/// Level payment that amortizes `principal` down to `balloon` over `nper` periods.
pub fn pmt_with_balloon(
    rate: Rate,
    nper: u32,
    principal: Money,
    balloon: Money,
) -> LeaseQuoteResult<Money> {
    let af = annuity_factor(rate, nper)?;
    if af.is_zero() {
        return Err(LeaseQuoteError::Computation(
            "Annuity factor is zero".into(),
        ));
    }
    let v = discount_factor(rate, nper)?;
    let pv_balloon = balloon.checked_mul(v).ok_or_else(|| overflow("Present value of balloon"))?;
    principal
        .checked_sub(pv_balloon)
        .and_then(|amortized| amortized.checked_div(af))
        .ok_or_else(|| overflow("Instalment"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_annuity_factor_basic() {
        // 100 * (1 - 1/1.08^10) / 0.08 ≈ 671.0
        let af = annuity_factor(dec!(0.08), 10).unwrap();
        assert!((af * dec!(100) - dec!(671.0)).abs() < dec!(0.1));
    }

    #[test]
    fn test_annuity_factor_zero_rate() {
        assert_eq!(annuity_factor(Decimal::ZERO, 36).unwrap(), dec!(36));
    }

    #[test]
    fn test_annuity_factor_rejects_zero_periods() {
        assert!(annuity_factor(dec!(0.01), 0).unwrap_err().is_validation());
    }

    #[test]
    fn test_pmt_pv_are_inverse() {
        let rate = dec!(0.0073);
        let pmt = pmt_with_balloon(rate, 48, dec!(80000), dec!(20000)).unwrap();
        let pv = pv_with_balloon(rate, 48, pmt, dec!(20000)).unwrap();
        assert!((pv - dec!(80000)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_compound_factor_overflow_is_computation_error() {
        // 1.0073^10000 is around 5e31, beyond Decimal::MAX (~7.9e28).
        let err = compound_factor(dec!(0.0073), 10_000).unwrap_err();
        assert!(err.is_computation());
        assert!(pmt_with_balloon(dec!(0.0073), 10_000, dec!(100000), dec!(0)).is_err());
    }

    #[test]
    fn test_compound_factor_exact_for_short_horizon() {
        assert_eq!(compound_factor(dec!(0.1), 2).unwrap(), dec!(1.21));
        assert_eq!(compound_factor(dec!(0.05), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_pmt_zero_rate_is_straight_line() {
        let pmt = pmt_with_balloon(Decimal::ZERO, 10, dec!(1000), dec!(200)).unwrap();
        assert_eq!(pmt, dec!(80));
    }
}
