use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use fin_planner_core::goals::{self, GoalFundingInput};
use fin_planner_core::retirement::{self, RetirementProfile};
use fin_planner_core::snapshot::{
    fallback_summary, AssetItem, FinancialSnapshot, InsuranceCover, LiabilityItem, MonthlyCashflow,
};

use crate::input;

/// Arguments for snapshot assembly
#[derive(Args)]
pub struct SnapshotArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Full planner input, as persisted per user by the application shell.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotInput {
    name: String,
    #[serde(default)]
    assets: Vec<AssetItem>,
    #[serde(default)]
    liabilities: Vec<LiabilityItem>,
    cashflow: MonthlyCashflow,
    #[serde(default)]
    insurance: InsuranceCover,
    goal_funding: GoalFundingInput,
    #[serde(default)]
    retirement: Option<RetirementProfile>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotOutput {
    snapshot: FinancialSnapshot,
    /// Deterministic summary for when the narrative service is down
    fallback_summary: String,
}

pub fn run_snapshot(args: SnapshotArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut snapshot_input: SnapshotInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for snapshot assembly".into());
    };

    // The shared surplus always comes from the cashflow section; a stale
    // figure inside goal_funding is overwritten.
    snapshot_input.goal_funding.monthly_surplus = snapshot_input.cashflow.surplus();

    let funding = goals::resolve_goal_funding(&snapshot_input.goal_funding);

    // An impossible retirement configuration is a validation failure for
    // the whole snapshot, not a silently dropped section.
    let retirement_plan = snapshot_input
        .retirement
        .as_ref()
        .map(retirement::plan_retirement)
        .transpose()?;

    let snapshot = FinancialSnapshot::assemble(
        snapshot_input.name,
        &snapshot_input.assets,
        &snapshot_input.liabilities,
        snapshot_input.cashflow,
        snapshot_input.insurance,
        &funding.result,
        retirement_plan.as_ref().map(|p| &p.result),
    );

    let output = SnapshotOutput {
        fallback_summary: fallback_summary(&snapshot),
        snapshot,
    };
    Ok(serde_json::to_value(output)?)
}
