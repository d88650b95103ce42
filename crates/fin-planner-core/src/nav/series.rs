use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::time_value::compound_annual_growth_rate;
use crate::types::Percent;
use crate::PlannerResult;

const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// One point in a fund's published price history. Series carry no ordering
/// or completeness guarantee: gaps and duplicate dates are possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavPoint {
    pub date: NaiveDate,
    pub nav: Decimal,
}

/// The point with minimum absolute date distance to `target`. Ties break to
/// the first-encountered point, preserving input order.
pub fn find_nearest_point(series: &[NavPoint], target: NaiveDate) -> Option<&NavPoint> {
    let mut nearest: Option<(&NavPoint, i64)> = None;
    for point in series {
        let distance = (point.date - target).num_days().abs();
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((point, distance)),
        }
    }
    nearest.map(|(point, _)| point)
}

/// Most recent point by max date, regardless of series order. Duplicate
/// max dates resolve to the first-encountered point.
pub fn latest_point(series: &[NavPoint]) -> Option<&NavPoint> {
    let mut latest: Option<&NavPoint> = None;
    for point in series {
        match latest {
            Some(best) if point.date <= best.date => {}
            _ => latest = Some(point),
        }
    }
    latest
}

/// Annualised trailing return over `window_years`, anchored at `as_of` (or
/// the series' latest date). Looks up the nearest published NAV to the
/// window start and computes CAGR to the latest point over the actual
/// elapsed span, not the nominal window.
///
/// None when fewer than two points exist, either endpoint NAV is
/// non-positive, or no time elapses between the endpoints. Callers render
/// None as "not available".
pub fn trailing_return(
    series: &[NavPoint],
    window_years: u32,
    as_of: Option<NaiveDate>,
) -> Option<Percent> {
    if series.len() < 2 {
        return None;
    }

    let latest = latest_point(series)?;
    let anchor = as_of.unwrap_or(latest.date);
    let window_start = anchor.checked_sub_months(Months::new(window_years.checked_mul(12)?))?;

    let start = find_nearest_point(series, window_start)?;
    if start.nav <= Decimal::ZERO || latest.nav <= Decimal::ZERO {
        return None;
    }

    let elapsed_days = (latest.date - start.date).num_days();
    if elapsed_days <= 0 {
        return None;
    }

    let elapsed_years = Decimal::from(elapsed_days) / DAYS_PER_YEAR;
    compound_annual_growth_rate(start.nav, latest.nav, elapsed_years)
}

/// A named value series, as delivered by a fund or index provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSeries {
    pub name: String,
    pub points: Vec<NavPoint>,
}

/// One aligned row of a rebased multi-asset series. `values` follows the
/// asset order of the owning `RebasedSeries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebasedRow {
    pub date: NaiveDate,
    pub values: Vec<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebasedSeries {
    pub assets: Vec<String>,
    pub rows: Vec<RebasedRow>,
}

/// Align multiple series on their common date range and rebase each to
/// `base` (conventionally 100) on the first common date, for comparative
/// charting of a model portfolio against a benchmark.
///
/// Missing values are forward-filled per asset; only dates on or after
/// every asset's first observation are retained, so every retained row has
/// a (possibly carried-forward) value for every asset.
pub fn rebase_to_100(assets: &[AssetSeries], base: Decimal) -> PlannerResult<RebasedSeries> {
    if base <= Decimal::ZERO {
        return Err(PlannerError::InvalidInput {
            field: "base".into(),
            reason: "Rebase base value must be > 0".into(),
        });
    }
    if assets.is_empty() {
        return Err(PlannerError::InsufficientData(
            "Rebasing requires at least one series".into(),
        ));
    }

    let mut sorted: Vec<Vec<NavPoint>> = Vec::with_capacity(assets.len());
    let mut first_common = NaiveDate::MIN;
    for asset in assets {
        if asset.points.is_empty() {
            return Err(PlannerError::InsufficientData(format!(
                "Series '{}' has no observations",
                asset.name
            )));
        }
        let mut points = asset.points.clone();
        // Stable by date: a duplicate date keeps its later-entered value
        // in the fill walk below.
        points.sort_by_key(|p| p.date);
        first_common = first_common.max(points[0].date);
        sorted.push(points);
    }

    let mut dates: Vec<NaiveDate> = sorted
        .iter()
        .flat_map(|points| points.iter().map(|p| p.date))
        .filter(|d| *d >= first_common)
        .collect();
    dates.sort();
    dates.dedup();
    if dates.is_empty() {
        return Err(PlannerError::InsufficientData(
            "Series share no common date range".into(),
        ));
    }

    // Forward-fill each asset across the aligned dates.
    let mut filled: Vec<Vec<Decimal>> = Vec::with_capacity(sorted.len());
    for points in &sorted {
        let mut cursor = 0usize;
        let mut last = points[0].nav;
        let mut column = Vec::with_capacity(dates.len());
        for date in &dates {
            while cursor < points.len() && points[cursor].date <= *date {
                last = points[cursor].nav;
                cursor += 1;
            }
            column.push(last);
        }
        filled.push(column);
    }

    let mut references = Vec::with_capacity(filled.len());
    for (asset, column) in assets.iter().zip(&filled) {
        let reference = column[0];
        if reference <= Decimal::ZERO {
            return Err(PlannerError::InvalidInput {
                field: "points".into(),
                reason: format!("Series '{}' starts at a non-positive value", asset.name),
            });
        }
        references.push(reference);
    }

    let rows = dates
        .iter()
        .enumerate()
        .map(|(i, date)| RebasedRow {
            date: *date,
            values: filled
                .iter()
                .zip(&references)
                .map(|(column, reference)| (column[i] / reference * base).round_dp(4))
                .collect(),
        })
        .collect();

    Ok(RebasedSeries {
        assets: assets.iter().map(|a| a.name.clone()).collect(),
        rows,
    })
}
