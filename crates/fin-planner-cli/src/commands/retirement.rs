use clap::Args;
use serde_json::Value;

use fin_planner_core::retirement::{self, RetirementProfile};

use crate::input;

/// Arguments for retirement planning
#[derive(Args)]
pub struct RetirementArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_retirement(args: RetirementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile: RetirementProfile = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for retirement planning".into());
    };
    let result = retirement::plan_retirement(&profile)?;
    Ok(serde_json::to_value(result)?)
}
