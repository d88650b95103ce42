//! Async market-data boundary: fund NAV history and benchmark index
//! closes. Each lookup is one independent request with no shared mutable
//! state, so concurrent fund fetches cannot interfere; dropping the
//! returned future cancels the request. Callers own debouncing and
//! stale-result discard, and a failed fetch degrades to "no data" for that
//! fund only.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::series::NavPoint;
use crate::error::PlannerError;
use crate::PlannerResult;

const MFAPI_BASE_URL: &str = "https://api.mfapi.in/mf";

/// Published NAV history for one mutual-fund scheme.
#[async_trait]
pub trait FundHistoryProvider {
    async fn nav_history(&self, scheme_code: u32) -> PlannerResult<Vec<NavPoint>>;
}

/// Daily closing values for a market index over a date range.
#[async_trait]
pub trait BenchmarkIndexProvider {
    async fn closing_series(&self, from: NaiveDate, to: NaiveDate) -> PlannerResult<Vec<NavPoint>>;
}

/// Client for the public mutual-fund NAV API.
///
/// The API serves history most-recent-first, but nothing downstream relies
/// on that ordering; consumers select the latest point by date.
pub struct MfApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl MfApiClient {
    pub fn new() -> Self {
        Self::with_base_url(MFAPI_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for MfApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct MfApiResponse {
    #[serde(default)]
    data: Vec<MfApiNavRecord>,
}

/// The API publishes dates as DD-MM-YYYY and NAVs as strings.
#[derive(Debug, Deserialize)]
struct MfApiNavRecord {
    date: String,
    nav: String,
}

impl MfApiNavRecord {
    fn parse(&self) -> Option<NavPoint> {
        let date = NaiveDate::parse_from_str(&self.date, "%d-%m-%Y").ok()?;
        let nav: Decimal = self.nav.trim().parse().ok()?;
        Some(NavPoint { date, nav })
    }
}

#[async_trait]
impl FundHistoryProvider for MfApiClient {
    async fn nav_history(&self, scheme_code: u32) -> PlannerResult<Vec<NavPoint>> {
        let url = format!("{}/{}", self.base_url, scheme_code);
        let symbol = scheme_code.to_string();

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PlannerError::MarketData {
                symbol: symbol.clone(),
                reason: e.to_string(),
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PlannerError::MarketData {
                symbol,
                reason: "Scheme not found".into(),
            });
        }

        let response = response
            .error_for_status()
            .map_err(|e| PlannerError::MarketData {
                symbol: symbol.clone(),
                reason: e.to_string(),
            })?;

        let body: MfApiResponse =
            response
                .json()
                .await
                .map_err(|e| PlannerError::MarketData {
                    symbol: symbol.clone(),
                    reason: format!("Malformed response: {e}"),
                })?;

        // Unparseable rows are skipped; only a fully-empty history is an
        // error, matching the insufficient-history degradation contract.
        let points: Vec<NavPoint> = body.data.iter().filter_map(MfApiNavRecord::parse).collect();
        if points.is_empty() {
            return Err(PlannerError::MarketData {
                symbol,
                reason: "No NAV history published".into(),
            });
        }

        Ok(points)
    }
}

/// In-memory provider for tests and offline runs: serves a preloaded
/// series, filtered by range for the benchmark role.
#[derive(Debug, Clone, Default)]
pub struct StaticSeriesProvider {
    pub points: Vec<NavPoint>,
}

impl StaticSeriesProvider {
    pub fn new(points: Vec<NavPoint>) -> Self {
        Self { points }
    }
}

#[async_trait]
impl FundHistoryProvider for StaticSeriesProvider {
    async fn nav_history(&self, scheme_code: u32) -> PlannerResult<Vec<NavPoint>> {
        if self.points.is_empty() {
            return Err(PlannerError::MarketData {
                symbol: scheme_code.to_string(),
                reason: "No NAV history published".into(),
            });
        }
        Ok(self.points.clone())
    }
}

#[async_trait]
impl BenchmarkIndexProvider for StaticSeriesProvider {
    async fn closing_series(&self, from: NaiveDate, to: NaiveDate) -> PlannerResult<Vec<NavPoint>> {
        let points: Vec<NavPoint> = self
            .points
            .iter()
            .filter(|p| p.date >= from && p.date <= to)
            .cloned()
            .collect();
        if points.is_empty() {
            return Err(PlannerError::InsufficientData(format!(
                "No index closes between {from} and {to}"
            )));
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_nav_record_parsing() {
        let record = MfApiNavRecord {
            date: "28-02-2024".into(),
            nav: "104.3160".into(),
        };
        let point = record.parse().unwrap();
        assert_eq!(point.date, NaiveDate::from_ymd_opt(2024, 2, 28).unwrap());
        assert_eq!(point.nav, dec!(104.3160));
    }

    #[test]
    fn test_nav_record_rejects_malformed_rows() {
        let bad_date = MfApiNavRecord { date: "2024-02-28".into(), nav: "104.0".into() };
        let bad_nav = MfApiNavRecord { date: "28-02-2024".into(), nav: "n/a".into() };
        assert!(bad_date.parse().is_none());
        assert!(bad_nav.parse().is_none());
    }

    #[tokio::test]
    async fn test_static_provider_serves_range() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%d-%m-%Y").unwrap();
        let provider = StaticSeriesProvider::new(vec![
            NavPoint { date: d("01-01-2024"), nav: dec!(100) },
            NavPoint { date: d("01-06-2024"), nav: dec!(110) },
            NavPoint { date: d("01-01-2025"), nav: dec!(120) },
        ]);

        let closes = provider
            .closing_series(d("01-03-2024"), d("31-12-2024"))
            .await
            .unwrap();
        assert_eq!(closes.len(), 1);
        assert_eq!(closes[0].nav, dec!(110));
    }
}
