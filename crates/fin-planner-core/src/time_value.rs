use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;

use crate::types::{percent_to_monthly_rate, Money, Percent, Years};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub(crate) fn compound(rate: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

/// Planning horizon in whole months, rounded to the nearest month.
fn months(years: Years) -> u32 {
    (years * MONTHS_PER_YEAR)
        .round()
        .to_u32()
        .unwrap_or(0)
}

/// Monthly contribution required to accumulate `target_corpus` over `years`
/// at `annual_rate_pct` (monthly compounding, ordinary annuity):
/// pmt = FV * r / ((1+r)^n - 1), rounded to the nearest whole currency unit.
///
/// Non-positive corpus, horizon, or rate is a degenerate form state, not an
/// error: the result is 0.
pub fn required_monthly_payment(target_corpus: Money, years: Years, annual_rate_pct: Percent) -> Money {
    if target_corpus <= Decimal::ZERO || years <= Decimal::ZERO || annual_rate_pct <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let rate = percent_to_monthly_rate(annual_rate_pct);
    let n = months(years);
    if n == 0 {
        return Decimal::ZERO;
    }

    let annuity_factor = compound(rate, n) - Decimal::ONE;
    if annuity_factor <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    (target_corpus * rate / annuity_factor).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Corpus reachable from a fixed monthly contribution over `years` at
/// `annual_rate_pct`: FV = pmt * ((1+r)^n - 1) / r.
///
/// A zero or negative rate degrades to the plain sum of contributions.
pub fn future_value_of_annuity(monthly_payment: Money, years: Years, annual_rate_pct: Percent) -> Money {
    if monthly_payment <= Decimal::ZERO || years <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let n = months(years);
    if n == 0 {
        return Decimal::ZERO;
    }

    let rate = percent_to_monthly_rate(annual_rate_pct);
    if rate <= Decimal::ZERO {
        return monthly_payment * Decimal::from(n);
    }

    monthly_payment * (compound(rate, n) - Decimal::ONE) / rate
}

/// Years needed for a fixed monthly contribution to reach `target_corpus`.
/// Inverts the annuity FV equation: n = ln(1 + FV*r/pmt) / ln(1+r).
///
/// Returns None when the corpus can never be reached (no contribution);
/// callers must render that as "N/A", never as zero years.
pub fn years_to_reach_corpus(
    monthly_payment: Money,
    target_corpus: Money,
    annual_rate_pct: Percent,
) -> Option<Years> {
    if target_corpus <= Decimal::ZERO {
        return Some(Decimal::ZERO);
    }
    if monthly_payment <= Decimal::ZERO {
        return None;
    }

    let rate = percent_to_monthly_rate(annual_rate_pct);
    if rate <= Decimal::ZERO {
        return Some(target_corpus / monthly_payment / MONTHS_PER_YEAR);
    }

    let growth = Decimal::ONE + target_corpus * rate / monthly_payment;
    let n = growth.ln() / (Decimal::ONE + rate).ln();
    Some(n / MONTHS_PER_YEAR)
}

/// Compound annual growth rate between two values, as a percentage:
/// ((end/start)^(1/years) - 1) * 100.
///
/// None when either value or the span is non-positive.
pub fn compound_annual_growth_rate(
    start_value: Decimal,
    end_value: Decimal,
    years: Years,
) -> Option<Percent> {
    if start_value <= Decimal::ZERO || end_value <= Decimal::ZERO || years <= Decimal::ZERO {
        return None;
    }

    let ratio = end_value / start_value;
    let annualised = ratio.powd(Decimal::ONE / years) - Decimal::ONE;
    Some(annualised * dec!(100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_required_payment_known_answer() {
        // 2M over 10 years at 10%: r = 0.1/12, n = 120
        // pmt = 2_000_000 * r / ((1+r)^120 - 1) ≈ 9764
        let pmt = required_monthly_payment(dec!(2_000_000), dec!(10), dec!(10));
        assert!(pmt > dec!(9_700) && pmt < dec!(9_800), "pmt={}", pmt);
    }

    #[test]
    fn test_required_payment_degenerate_inputs() {
        assert_eq!(required_monthly_payment(dec!(0), dec!(10), dec!(12)), Decimal::ZERO);
        assert_eq!(required_monthly_payment(dec!(1_000_000), dec!(0), dec!(12)), Decimal::ZERO);
        assert_eq!(required_monthly_payment(dec!(1_000_000), dec!(10), dec!(0)), Decimal::ZERO);
        assert_eq!(required_monthly_payment(dec!(-5), dec!(10), dec!(12)), Decimal::ZERO);
    }

    #[test]
    fn test_fv_round_trip() {
        let corpus = dec!(2_000_000);
        let pmt = required_monthly_payment(corpus, dec!(10), dec!(10));
        let fv = future_value_of_annuity(pmt, dec!(10), dec!(10));
        // Payment is rounded to a whole unit, so allow rounding drift of
        // up to one unit per month compounded.
        let diff = (fv - corpus).abs();
        assert!(diff < dec!(200), "fv={} diff={}", fv, diff);
    }

    #[test]
    fn test_fv_zero_rate_is_contribution_sum() {
        let fv = future_value_of_annuity(dec!(1_000), dec!(2), dec!(0));
        assert_eq!(fv, dec!(24_000));
    }

    #[test]
    fn test_years_to_reach_corpus_inverts_fv() {
        // 9764/month at 10% reaches 2M in ~10 years
        let years = years_to_reach_corpus(dec!(9_764), dec!(2_000_000), dec!(10)).unwrap();
        assert!((years - dec!(10)).abs() < dec!(0.05), "years={}", years);
    }

    #[test]
    fn test_years_to_reach_corpus_unreachable() {
        assert_eq!(years_to_reach_corpus(dec!(0), dec!(1_000_000), dec!(10)), None);
        assert_eq!(years_to_reach_corpus(dec!(-10), dec!(1_000_000), dec!(10)), None);
    }

    #[test]
    fn test_cagr_doubling_over_ten_years() {
        let cagr = compound_annual_growth_rate(dec!(100), dec!(200), dec!(10)).unwrap();
        assert!((cagr - dec!(7.18)).abs() < dec!(0.01), "cagr={}", cagr);
    }

    #[test]
    fn test_cagr_non_positive_inputs() {
        assert_eq!(compound_annual_growth_rate(dec!(0), dec!(200), dec!(10)), None);
        assert_eq!(compound_annual_growth_rate(dec!(100), dec!(0), dec!(10)), None);
        assert_eq!(compound_annual_growth_rate(dec!(100), dec!(200), dec!(0)), None);
        assert_eq!(compound_annual_growth_rate(dec!(-100), dec!(200), dec!(5)), None);
    }
}
