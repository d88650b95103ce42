use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use fin_planner_core::nav::providers::{FundHistoryProvider, MfApiClient};
use fin_planner_core::nav::{rebase_to_100, trailing_return, AssetSeries, NavPoint};
use fin_planner_core::PlannerError;

use crate::input;

/// Arguments for the trailing-return calculation
#[derive(Args)]
pub struct TrailingReturnArgs {
    /// Path to a JSON file with the NAV series: [{"date": "...", "nav": ...}]
    #[arg(long)]
    pub input: Option<String>,

    /// Lookback window in years
    #[arg(long, default_value = "3")]
    pub window: u32,

    /// Anchor date (defaults to the latest point in the series)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

/// Arguments for comparative rebasing
#[derive(Args)]
pub struct RebaseArgs {
    /// Path to a JSON file with named series: [{"name": "...", "points": [...]}]
    #[arg(long)]
    pub input: Option<String>,

    /// Base value assigned on the first common date
    #[arg(long, default_value = "100")]
    pub base: Decimal,
}

/// Arguments for live fund-return lookup
#[derive(Args)]
pub struct FundReturnArgs {
    /// Mutual-fund scheme code
    #[arg(long)]
    pub scheme_code: u32,

    /// Comma-separated lookback windows in years
    #[arg(long, value_delimiter = ',', default_value = "3,5,10")]
    pub windows: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TrailingReturnOutput {
    trailing_return_pct: Option<Decimal>,
    window_years: u32,
    observations: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct WindowReturn {
    window_years: u32,
    trailing_return_pct: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FundReturnOutput {
    scheme_code: u32,
    available: bool,
    observations: usize,
    returns: Vec<WindowReturn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unavailable_reason: Option<String>,
}

pub fn run_trailing_return(args: TrailingReturnArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let series: Vec<NavPoint> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for trailing returns".into());
    };

    let output = TrailingReturnOutput {
        trailing_return_pct: trailing_return(&series, args.window, args.as_of)
            .map(|r| r.round_dp(4)),
        window_years: args.window,
        observations: series.len(),
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_rebase(args: RebaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assets: Vec<AssetSeries> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for rebasing".into());
    };

    let rebased = rebase_to_100(&assets, args.base)?;
    Ok(serde_json::to_value(rebased)?)
}

/// Live lookup through the fund-history provider. A failed fetch degrades
/// to an unavailable marker instead of aborting, so report pipelines keep
/// their other figures.
pub fn run_fund_return(args: FundReturnArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let client = MfApiClient::new();

    let output = match runtime.block_on(client.nav_history(args.scheme_code)) {
        Ok(series) => FundReturnOutput {
            scheme_code: args.scheme_code,
            available: true,
            observations: series.len(),
            returns: args
                .windows
                .iter()
                .map(|&window| WindowReturn {
                    window_years: window,
                    trailing_return_pct: trailing_return(&series, window, None)
                        .map(|r| r.round_dp(4)),
                })
                .collect(),
            unavailable_reason: None,
        },
        Err(e @ PlannerError::MarketData { .. }) => FundReturnOutput {
            scheme_code: args.scheme_code,
            available: false,
            observations: 0,
            returns: vec![],
            unavailable_reason: Some(e.to_string()),
        },
        Err(e) => return Err(e.into()),
    };

    Ok(serde_json::to_value(output)?)
}
