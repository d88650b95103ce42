use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlannerError;
use crate::time_value::{self, compound};
use crate::types::{percent_to_monthly_rate, percent_to_rate, with_metadata, ComputationOutput, Money, Percent};
use crate::PlannerResult;

/// Input parameters for retirement planning, as entered on the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementProfile {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub current_monthly_expense: Money,
    pub pre_retirement_return_pct: Percent,
    pub post_retirement_return_pct: Percent,
    /// Annual step-up applied to the incremental SIP variant.
    pub incremental_annual_rate_pct: Percent,
    /// Overrides the derived inflation assumption when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_override_pct: Option<Percent>,
}

/// Top-level output from `plan_retirement`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementPlan {
    pub years_to_retirement: u32,
    pub years_in_retirement: u32,
    pub inflation_rate_pct: Percent,
    pub real_rate_of_return_pct: Percent,
    pub projected_monthly_expense_at_retirement: Money,
    pub projected_annual_expense_at_retirement: Money,
    pub required_corpus: Money,
    /// Flat monthly SIP to accumulate the corpus.
    pub monthly_investment_needed: Money,
    /// First-year monthly SIP when contributions step up annually.
    pub incremental_monthly_investment: Money,
}

/// Expected long-run inflation derived from the pre/post-retirement return
/// spread, floored at zero. The spread proxy is the planner's documented
/// assumption; callers can override it via the profile.
pub fn implied_inflation_rate(pre_retirement_pct: Percent, post_retirement_pct: Percent) -> Percent {
    (pre_retirement_pct - post_retirement_pct).max(Decimal::ZERO)
}

/// Real (inflation-adjusted) return via the Fisher relation, in percent.
pub fn real_rate_of_return(post_retirement_pct: Percent, inflation_pct: Percent) -> Percent {
    let nominal = Decimal::ONE + percent_to_rate(post_retirement_pct);
    let inflation = Decimal::ONE + percent_to_rate(inflation_pct);
    (nominal / inflation - Decimal::ONE) * dec!(100)
}

/// Future-value inflation projection of today's monthly expense.
pub fn projected_monthly_expense_at_retirement(
    current_monthly_expense: Money,
    years_to_retirement: u32,
    inflation_pct: Percent,
) -> Money {
    current_monthly_expense * compound(percent_to_rate(inflation_pct), years_to_retirement)
}

/// Present value of a depleting level annuity covering `years_in_retirement`
/// years of `projected_annual_expense`, discounted at the real rate.
pub fn required_retirement_corpus(
    projected_annual_expense: Money,
    years_in_retirement: u32,
    real_rate_pct: Percent,
) -> Money {
    let rate = percent_to_rate(real_rate_pct);
    if rate.is_zero() || years_in_retirement == 0 {
        return projected_annual_expense * Decimal::from(years_in_retirement);
    }
    let compound_factor = compound(rate, years_in_retirement);
    projected_annual_expense * (Decimal::ONE - Decimal::ONE / compound_factor) / rate
}

/// Flat monthly SIP toward the retirement corpus.
pub fn monthly_investment_needed(
    required_corpus: Money,
    years_to_retirement: u32,
    pre_retirement_pct: Percent,
) -> Money {
    time_value::required_monthly_payment(
        required_corpus,
        Decimal::from(years_to_retirement),
        pre_retirement_pct,
    )
}

/// First-year monthly SIP when the contribution steps up once a year by
/// `step_up_pct`. Solves the growing-annuity FV equation, which is a
/// distinct closed form from the flat case:
///
///   FV = pmt * A * (C^Y - G^Y) / (C - G)
///
/// where A = ((1+r)^12 - 1)/r is the year-end value of twelve monthly
/// units, C = (1+r)^12 the annual growth of invested money, and G = 1+g
/// the annual growth of the contribution itself. C == G degenerates to
/// FV = pmt * A * Y * C^(Y-1).
pub fn incremental_monthly_investment(
    required_corpus: Money,
    years_to_retirement: u32,
    pre_retirement_pct: Percent,
    step_up_pct: Percent,
) -> Money {
    if required_corpus <= Decimal::ZERO || years_to_retirement == 0 || pre_retirement_pct <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let monthly_rate = percent_to_monthly_rate(pre_retirement_pct);
    let growth = Decimal::ONE + percent_to_rate(step_up_pct.max(Decimal::ZERO));

    let year_factor = compound(monthly_rate, 12);
    let year_annuity = (year_factor - Decimal::ONE) / monthly_rate;

    let denominator = if year_factor == growth {
        year_annuity
            * Decimal::from(years_to_retirement)
            * compound(monthly_rate, 12 * (years_to_retirement - 1))
    } else {
        let compounded_money = compound(monthly_rate, 12 * years_to_retirement);
        let compounded_payment = compound(growth - Decimal::ONE, years_to_retirement);
        year_annuity * (compounded_money - compounded_payment) / (year_factor - growth)
    };

    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    (required_corpus / denominator).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Full retirement projection: inflation assumption, expense projection,
/// corpus sizing, and both SIP variants.
///
/// Age-ordering violations are logically impossible scenarios, not
/// incomplete ones, and are reported as validation errors.
pub fn plan_retirement(profile: &RetirementProfile) -> PlannerResult<ComputationOutput<RetirementPlan>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if profile.retirement_age <= profile.current_age {
        return Err(PlannerError::InvalidInput {
            field: "retirement_age".into(),
            reason: "retirement_age must be > current_age".into(),
        });
    }
    if profile.life_expectancy <= profile.retirement_age {
        return Err(PlannerError::InvalidInput {
            field: "life_expectancy".into(),
            reason: "life_expectancy must be > retirement_age".into(),
        });
    }

    let years_to_retirement = profile.retirement_age - profile.current_age;
    let years_in_retirement = profile.life_expectancy - profile.retirement_age;

    if profile.current_monthly_expense <= Decimal::ZERO {
        warnings.push("Non-positive monthly expense; the projection is all zeros".into());
    }

    let (inflation_rate_pct, inflation_source) = match profile.inflation_override_pct {
        Some(pct) => (pct.max(Decimal::ZERO), "override"),
        None => (
            implied_inflation_rate(
                profile.pre_retirement_return_pct,
                profile.post_retirement_return_pct,
            ),
            "pre/post return spread",
        ),
    };

    let real_rate_pct = real_rate_of_return(profile.post_retirement_return_pct, inflation_rate_pct);
    if real_rate_pct <= Decimal::ZERO {
        warnings.push(format!(
            "Real rate of return is {:.2}%; the corpus must carry expenses with no real growth",
            real_rate_pct
        ));
    }

    let expense = profile.current_monthly_expense.max(Decimal::ZERO);
    let projected_monthly =
        projected_monthly_expense_at_retirement(expense, years_to_retirement, inflation_rate_pct);
    let projected_annual = projected_monthly * dec!(12);

    let required_corpus =
        required_retirement_corpus(projected_annual, years_in_retirement, real_rate_pct)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    let flat_sip = monthly_investment_needed(
        required_corpus,
        years_to_retirement,
        profile.pre_retirement_return_pct,
    );
    let incremental_sip = incremental_monthly_investment(
        required_corpus,
        years_to_retirement,
        profile.pre_retirement_return_pct,
        profile.incremental_annual_rate_pct,
    );

    let output = RetirementPlan {
        years_to_retirement,
        years_in_retirement,
        inflation_rate_pct,
        real_rate_of_return_pct: real_rate_pct.round_dp(4),
        projected_monthly_expense_at_retirement: projected_monthly
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        projected_annual_expense_at_retirement: projected_annual
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        required_corpus,
        monthly_investment_needed: flat_sip,
        incremental_monthly_investment: incremental_sip,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Retirement Corpus (inflation-adjusted expense annuity with flat and step-up SIP)",
        &serde_json::json!({
            "current_age": profile.current_age,
            "retirement_age": profile.retirement_age,
            "life_expectancy": profile.life_expectancy,
            "inflation_source": inflation_source,
            "inflation_rate_pct": inflation_rate_pct.to_string(),
            "incremental_annual_rate_pct": profile.incremental_annual_rate_pct.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
