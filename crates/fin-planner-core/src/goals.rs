use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Years};

/// A named financial target. Identifiers are caller-supplied; the resolver
/// never generates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_corpus: Money,
    pub years: Years,
    pub expected_return_pct: Percent,
}

impl Goal {
    /// Required monthly contribution for this goal in isolation.
    pub fn required_monthly_payment(&self) -> Money {
        time_value::required_monthly_payment(self.target_corpus, self.years, self.expected_return_pct)
    }
}

/// Three monthly-contribution scenarios for the same goal. All non-negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentStatus {
    /// What the user says they are investing today.
    pub current_investment: Money,
    /// What the annuity formula demands for the stated horizon.
    pub required_investment: Money,
    /// This goal's share of the investible surplus.
    pub allocated_investment: Money,
}

/// Time to reach the goal's corpus under each contribution scenario.
/// None means the corpus is unreachable at that contribution level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalTimeline {
    pub current: Option<Years>,
    pub required: Option<Years>,
    pub potential: Option<Years>,
}

/// Input for the funding resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalFundingInput {
    pub goals: Vec<Goal>,
    /// Monthly investible surplus shared by every goal.
    pub monthly_surplus: Money,
    /// User-entered contribution per goal, aligned by index with `goals`.
    /// Missing entries count as zero.
    #[serde(default)]
    pub current_investments: Vec<Money>,
}

/// Per-goal funding row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalFunding {
    pub id: String,
    pub name: String,
    pub target_corpus: Money,
    pub years: Years,
    pub status: InvestmentStatus,
    pub timeline: GoalTimeline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalFundingOutput {
    pub goals: Vec<GoalFunding>,
    pub aggregate_required: Money,
    pub total_allocated: Money,
    /// True when the surplus covers every goal's full requirement.
    pub surplus_sufficient: bool,
}

/// Clamp user-entered figures: the planner forms feed partially-typed
/// values through here on every keystroke, so negatives and blanks (which
/// deserialize as zero) are coerced, never rejected.
fn non_negative(value: Money) -> Money {
    value.max(Decimal::ZERO)
}

/// Resolve the three investment-status views and timelines for every goal
/// against a single shared monthly surplus.
///
/// Allocation policy: when the surplus falls short of the aggregate
/// requirement, each goal receives its pro-rata share of the surplus by
/// required-investment weight; otherwise every goal is funded at its full
/// requirement. The sum of allocations never exceeds the surplus.
///
/// Infallible by contract: degenerate goals resolve to zero requirements,
/// and timelines for unreachable corpora are None. O(goals).
pub fn resolve_goal_funding(input: &GoalFundingInput) -> ComputationOutput<GoalFundingOutput> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let surplus = non_negative(input.monthly_surplus);

    let required: Vec<Money> = input.goals.iter().map(Goal::required_monthly_payment).collect();
    let aggregate_required: Money = required.iter().sum();

    let surplus_sufficient = aggregate_required > Decimal::ZERO && surplus >= aggregate_required;
    if aggregate_required > Decimal::ZERO && surplus < aggregate_required {
        warnings.push(format!(
            "Surplus {} covers {:.0}% of the aggregate required investment",
            surplus,
            (surplus / aggregate_required * Decimal::ONE_HUNDRED)
        ));
    }

    // Pro-rata split, tracked against a running remainder so decimal
    // rounding can never over-allocate the surplus.
    let mut remaining = surplus;
    let mut rows = Vec::with_capacity(input.goals.len());

    for (i, goal) in input.goals.iter().enumerate() {
        let required_investment = required[i];

        let allocated = if aggregate_required.is_zero() {
            Decimal::ZERO
        } else if surplus_sufficient {
            required_investment
        } else {
            let share = required_investment * surplus / aggregate_required;
            share.min(remaining)
        };
        remaining -= allocated;

        let current = non_negative(
            input
                .current_investments
                .get(i)
                .copied()
                .unwrap_or(Decimal::ZERO),
        );

        let timeline = GoalTimeline {
            current: years_rounded(current, goal),
            required: years_rounded(required_investment, goal),
            potential: years_rounded(allocated, goal),
        };

        rows.push(GoalFunding {
            id: goal.id.clone(),
            name: goal.name.clone(),
            target_corpus: goal.target_corpus,
            years: goal.years,
            status: InvestmentStatus {
                current_investment: current,
                required_investment,
                allocated_investment: allocated,
            },
            timeline,
        });
    }

    let total_allocated: Money = rows.iter().map(|r| r.status.allocated_investment).sum();

    let output = GoalFundingOutput {
        goals: rows,
        aggregate_required,
        total_allocated,
        surplus_sufficient,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Goal Funding Resolution (pro-rata surplus allocation by required-investment weight)",
        &serde_json::json!({
            "goal_count": input.goals.len(),
            "monthly_surplus": surplus.to_string(),
        }),
        warnings,
        elapsed,
        output,
    )
}

fn years_rounded(monthly_payment: Money, goal: &Goal) -> Option<Years> {
    time_value::years_to_reach_corpus(monthly_payment, goal.target_corpus, goal.expected_return_pct)
        .map(|y| y.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn goal(id: &str, corpus: Decimal, years: Decimal, rate: Decimal) -> Goal {
        Goal {
            id: id.to_string(),
            name: format!("goal-{id}"),
            target_corpus: corpus,
            years,
            expected_return_pct: rate,
        }
    }

    #[test]
    fn test_sufficient_surplus_funds_every_goal_fully() {
        let input = GoalFundingInput {
            goals: vec![
                goal("1", dec!(1_000_000), dec!(10), dec!(10)),
                goal("2", dec!(500_000), dec!(5), dec!(8)),
            ],
            monthly_surplus: dec!(100_000),
            current_investments: vec![dec!(2_000), dec!(1_000)],
        };
        let out = resolve_goal_funding(&input).result;

        assert!(out.surplus_sufficient);
        for row in &out.goals {
            assert_eq!(row.status.allocated_investment, row.status.required_investment);
        }
        assert_eq!(out.total_allocated, out.aggregate_required);
    }

    #[test]
    fn test_short_surplus_allocates_pro_rata() {
        let input = GoalFundingInput {
            goals: vec![
                goal("1", dec!(2_000_000), dec!(10), dec!(10)),
                goal("2", dec!(2_000_000), dec!(10), dec!(10)),
            ],
            monthly_surplus: dec!(10_000),
            current_investments: vec![],
        };
        let out = resolve_goal_funding(&input).result;

        assert!(!out.surplus_sufficient);
        // Identical goals split the surplus evenly
        let a = out.goals[0].status.allocated_investment;
        let b = out.goals[1].status.allocated_investment;
        assert!((a - b).abs() <= dec!(0.01), "a={} b={}", a, b);
        assert!(out.total_allocated <= dec!(10_000));
    }

    #[test]
    fn test_zero_aggregate_requirement_allocates_nothing() {
        let input = GoalFundingInput {
            goals: vec![goal("1", dec!(0), dec!(10), dec!(10)), goal("2", dec!(500_000), dec!(0), dec!(8))],
            monthly_surplus: dec!(50_000),
            current_investments: vec![],
        };
        let out = resolve_goal_funding(&input).result;

        assert_eq!(out.aggregate_required, Decimal::ZERO);
        assert_eq!(out.total_allocated, Decimal::ZERO);
        assert!(!out.surplus_sufficient);
    }

    #[test]
    fn test_no_goals() {
        let input = GoalFundingInput {
            goals: vec![],
            monthly_surplus: dec!(50_000),
            current_investments: vec![],
        };
        let out = resolve_goal_funding(&input).result;
        assert!(out.goals.is_empty());
        assert_eq!(out.total_allocated, Decimal::ZERO);
    }

    #[test]
    fn test_negative_inputs_coerced_to_zero() {
        let input = GoalFundingInput {
            goals: vec![goal("1", dec!(1_000_000), dec!(10), dec!(10))],
            monthly_surplus: dec!(-500),
            current_investments: vec![dec!(-100)],
        };
        let out = resolve_goal_funding(&input).result;
        let row = &out.goals[0];

        assert_eq!(row.status.current_investment, Decimal::ZERO);
        assert_eq!(row.status.allocated_investment, Decimal::ZERO);
        assert_eq!(row.timeline.current, None);
    }

    #[test]
    fn test_timeline_required_matches_goal_horizon() {
        let input = GoalFundingInput {
            goals: vec![goal("1", dec!(2_000_000), dec!(10), dec!(10))],
            monthly_surplus: dec!(100_000),
            current_investments: vec![],
        };
        let out = resolve_goal_funding(&input).result;
        let required_years = out.goals[0].timeline.required.unwrap();
        assert!((required_years - dec!(10)).abs() < dec!(0.05), "{}", required_years);
    }
}
