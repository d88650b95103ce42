use napi::Result as NapiResult;
use napi_derive::napi;

use serde::Deserialize;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Time-value primitives
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SipInput {
    target_corpus: rust_decimal::Decimal,
    years: rust_decimal::Decimal,
    annual_rate_pct: rust_decimal::Decimal,
}

#[napi]
pub fn required_sip(input_json: String) -> NapiResult<String> {
    let input: SipInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let payment = fin_planner_core::time_value::required_monthly_payment(
        input.target_corpus,
        input.years,
        input.annual_rate_pct,
    );
    serde_json::to_string(&serde_json::json!({ "required_sip": payment.to_string() }))
        .map_err(to_napi_error)
}

#[derive(Deserialize)]
struct CagrInput {
    start_value: rust_decimal::Decimal,
    end_value: rust_decimal::Decimal,
    years: rust_decimal::Decimal,
}

#[napi]
pub fn compound_annual_growth_rate(input_json: String) -> NapiResult<String> {
    let input: CagrInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let cagr = fin_planner_core::time_value::compound_annual_growth_rate(
        input.start_value,
        input.end_value,
        input.years,
    );
    serde_json::to_string(&serde_json::json!({
        "cagr_pct": cagr.map(|r| r.to_string()),
    }))
    .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Goal funding
// ---------------------------------------------------------------------------

#[napi]
pub fn resolve_goal_funding(input_json: String) -> NapiResult<String> {
    let input: fin_planner_core::goals::GoalFundingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fin_planner_core::goals::resolve_goal_funding(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Retirement
// ---------------------------------------------------------------------------

#[napi]
pub fn plan_retirement(input_json: String) -> NapiResult<String> {
    let input: fin_planner_core::retirement::RetirementProfile =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fin_planner_core::retirement::plan_retirement(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// NAV series
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TrailingReturnInput {
    series: Vec<fin_planner_core::nav::NavPoint>,
    window_years: u32,
    #[serde(default)]
    as_of: Option<chrono::NaiveDate>,
}

#[napi]
pub fn trailing_return(input_json: String) -> NapiResult<String> {
    let input: TrailingReturnInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let ret =
        fin_planner_core::nav::trailing_return(&input.series, input.window_years, input.as_of);
    serde_json::to_string(&serde_json::json!({
        "trailing_return_pct": ret.map(|r| r.to_string()),
    }))
    .map_err(to_napi_error)
}

#[derive(Deserialize)]
struct RebaseInput {
    assets: Vec<fin_planner_core::nav::AssetSeries>,
    base: rust_decimal::Decimal,
}

#[napi]
pub fn rebase_series(input_json: String) -> NapiResult<String> {
    let input: RebaseInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fin_planner_core::nav::rebase_to_100(&input.assets, input.base).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[napi]
pub fn fallback_summary(input_json: String) -> NapiResult<String> {
    let snapshot: fin_planner_core::snapshot::FinancialSnapshot =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    Ok(fin_planner_core::snapshot::fallback_summary(&snapshot))
}
