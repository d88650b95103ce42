use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use fin_planner_core::time_value;

/// Arguments for the required-SIP calculation
#[derive(Args)]
pub struct SipArgs {
    /// Target corpus to accumulate
    #[arg(long)]
    pub corpus: Decimal,

    /// Horizon in years
    #[arg(long)]
    pub years: Decimal,

    /// Expected annual return in percent (e.g. 12 for 12%)
    #[arg(long)]
    pub rate: Decimal,
}

/// Arguments for projecting a corpus from a contribution
#[derive(Args)]
pub struct ProjectCorpusArgs {
    /// Monthly contribution
    #[arg(long)]
    pub monthly: Decimal,

    /// Horizon in years
    #[arg(long)]
    pub years: Decimal,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Decimal,
}

/// Arguments for the years-to-corpus inversion
#[derive(Args)]
pub struct TimelineArgs {
    /// Monthly contribution
    #[arg(long)]
    pub monthly: Decimal,

    /// Target corpus
    #[arg(long)]
    pub corpus: Decimal,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Decimal,
}

/// Arguments for CAGR between two values
#[derive(Args)]
pub struct CagrArgs {
    /// Starting value
    #[arg(long)]
    pub start: Decimal,

    /// Ending value
    #[arg(long)]
    pub end: Decimal,

    /// Span in years
    #[arg(long, allow_hyphen_values = true)]
    pub years: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
struct SipOutput {
    required_sip: Decimal,
    target_corpus: Decimal,
    years: Decimal,
    annual_rate_pct: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProjectCorpusOutput {
    projected_corpus: Decimal,
    monthly_payment: Decimal,
    years: Decimal,
    annual_rate_pct: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
struct TimelineOutput {
    /// None when the corpus is unreachable; rendered as null / "n/a"
    years_to_reach: Option<Decimal>,
    monthly_payment: Decimal,
    target_corpus: Decimal,
    annual_rate_pct: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
struct CagrOutput {
    cagr_pct: Option<Decimal>,
    start_value: Decimal,
    end_value: Decimal,
    years: Decimal,
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = SipOutput {
        required_sip: time_value::required_monthly_payment(args.corpus, args.years, args.rate),
        target_corpus: args.corpus,
        years: args.years,
        annual_rate_pct: args.rate,
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_project_corpus(args: ProjectCorpusArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = ProjectCorpusOutput {
        projected_corpus: time_value::future_value_of_annuity(args.monthly, args.years, args.rate)
            .round_dp(0),
        monthly_payment: args.monthly,
        years: args.years,
        annual_rate_pct: args.rate,
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_timeline(args: TimelineArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = TimelineOutput {
        years_to_reach: time_value::years_to_reach_corpus(args.monthly, args.corpus, args.rate)
            .map(|y| y.round_dp(2)),
        monthly_payment: args.monthly,
        target_corpus: args.corpus,
        annual_rate_pct: args.rate,
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_cagr(args: CagrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = CagrOutput {
        cagr_pct: time_value::compound_annual_growth_rate(args.start, args.end, args.years)
            .map(|r| r.round_dp(4)),
        start_value: args.start,
        end_value: args.end,
        years: args.years,
    };
    Ok(serde_json::to_value(output)?)
}
