use clap::Args;
use serde_json::Value;

use fin_planner_core::goals::{self, GoalFundingInput};

use crate::input;

/// Arguments for goal-funding resolution
#[derive(Args)]
pub struct GoalFundingArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_goal_funding(args: GoalFundingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let funding_input: GoalFundingInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for goal funding".into());
    };
    let result = goals::resolve_goal_funding(&funding_input);
    Ok(serde_json::to_value(result)?)
}
