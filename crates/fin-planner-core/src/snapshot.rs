//! Planner snapshot: the aggregate figures handed to the presentation
//! layer and to the external narrative service. The service itself is an
//! outside collaborator; this module fixes the shapes it consumes and
//! produces, and the deterministic fallback used when it fails.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::goals::GoalFundingOutput;
use crate::retirement::RetirementPlan;
use crate::types::{Money, Percent, Years};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetItem {
    pub name: String,
    pub value: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiabilityItem {
    pub name: String,
    pub value: Money,
}

/// Assets minus liabilities. May be negative.
pub fn net_worth(assets: &[AssetItem], liabilities: &[LiabilityItem]) -> Money {
    let assets: Money = assets.iter().map(|a| a.value).sum();
    let liabilities: Money = liabilities.iter().map(|l| l.value).sum();
    assets - liabilities
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCashflow {
    pub income: Money,
    pub expense: Money,
}

impl MonthlyCashflow {
    /// Raw monthly net; negative when spending exceeds income.
    pub fn net(&self) -> Money {
        self.income - self.expense
    }

    /// Investible surplus for goal allocation, floored at zero.
    pub fn surplus(&self) -> Money {
        self.net().max(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsuranceCover {
    pub life_cover: Money,
    pub health_cover: Money,
}

/// Per-goal line included in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSip {
    pub name: String,
    pub target_corpus: Money,
    pub years: Years,
    pub required_sip: Money,
    pub allocated_sip: Money,
}

/// Retirement figures included in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementSummary {
    pub required_corpus: Money,
    pub monthly_investment_needed: Money,
    pub incremental_monthly_investment: Money,
}

/// The structured financial snapshot consumed by the narrative service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub name: String,
    pub net_worth: Money,
    pub cashflow: MonthlyCashflow,
    pub insurance: InsuranceCover,
    pub goals: Vec<GoalSip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retirement: Option<RetirementSummary>,
}

impl FinancialSnapshot {
    /// Assemble the snapshot from computed parts. Goal targets and corpus
    /// figures come from the resolver/planner outputs untouched.
    pub fn assemble(
        name: impl Into<String>,
        assets: &[AssetItem],
        liabilities: &[LiabilityItem],
        cashflow: MonthlyCashflow,
        insurance: InsuranceCover,
        funding: &GoalFundingOutput,
        retirement: Option<&RetirementPlan>,
    ) -> Self {
        let goals = funding
            .goals
            .iter()
            .map(|row| GoalSip {
                name: row.name.clone(),
                target_corpus: row.target_corpus,
                years: row.years,
                required_sip: row.status.required_investment,
                allocated_sip: row.status.allocated_investment,
            })
            .collect();

        FinancialSnapshot {
            name: name.into(),
            net_worth: net_worth(assets, liabilities),
            cashflow,
            insurance,
            goals,
            retirement: retirement.map(|plan| RetirementSummary {
                required_corpus: plan.required_corpus,
                monthly_investment_needed: plan.monthly_investment_needed,
                incremental_monthly_investment: plan.incremental_monthly_investment,
            }),
        }
    }
}

/// Structured data extracted from a fund factsheet by the external service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactsheetData {
    pub allocations: Vec<AllocationSlice>,
    pub holdings: Vec<Holding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub label: String,
    pub percent: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub name: String,
    pub weight_pct: Percent,
}

/// External narrative/extraction service. Failures must be absorbed by the
/// caller with `fallback_summary`, never left as a hole in the report.
#[cfg(feature = "providers")]
#[async_trait::async_trait]
pub trait NarrativeService {
    async fn summarize(&self, snapshot: &FinancialSnapshot) -> crate::PlannerResult<String>;
    async fn extract_factsheet(&self, document_ref: &str) -> crate::PlannerResult<FactsheetData>;
}

/// Deterministic substitute summary used when the narrative service is
/// unavailable. Same inputs, same text.
pub fn fallback_summary(snapshot: &FinancialSnapshot) -> String {
    let surplus = snapshot.cashflow.surplus();
    let goal_count = snapshot.goals.len();
    let total_required: Money = snapshot.goals.iter().map(|g| g.required_sip).sum();

    let mut summary = format!(
        "{} has a net worth of {} and a monthly investible surplus of {}. \
         The plan tracks {} goal(s) requiring a combined monthly investment of {}.",
        snapshot.name, snapshot.net_worth, surplus, goal_count, total_required
    );

    if let Some(retirement) = &snapshot.retirement {
        summary.push_str(&format!(
            " Retirement needs a corpus of {}, reachable with a monthly investment of {} \
             (or {} growing annually).",
            retirement.required_corpus,
            retirement.monthly_investment_needed,
            retirement.incremental_monthly_investment
        ));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_net_worth() {
        let assets = vec![
            AssetItem { name: "equity".into(), value: dec!(1_500_000) },
            AssetItem { name: "property".into(), value: dec!(5_000_000) },
        ];
        let liabilities = vec![LiabilityItem { name: "home loan".into(), value: dec!(2_000_000) }];
        assert_eq!(net_worth(&assets, &liabilities), dec!(4_500_000));
    }

    #[test]
    fn test_surplus_floors_at_zero() {
        let cashflow = MonthlyCashflow { income: dec!(50_000), expense: dec!(70_000) };
        assert_eq!(cashflow.net(), dec!(-20_000));
        assert_eq!(cashflow.surplus(), Decimal::ZERO);
    }

    #[test]
    fn test_fallback_summary_is_deterministic() {
        let snapshot = FinancialSnapshot {
            name: "A. Planner".into(),
            net_worth: dec!(4_500_000),
            cashflow: MonthlyCashflow { income: dec!(100_000), expense: dec!(60_000) },
            insurance: InsuranceCover::default(),
            goals: vec![],
            retirement: None,
        };
        assert_eq!(fallback_summary(&snapshot), fallback_summary(&snapshot));
        assert!(fallback_summary(&snapshot).contains("4500000"));
    }
}
