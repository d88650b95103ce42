use chrono::NaiveDate;
use fin_planner_core::nav::{
    find_nearest_point, latest_point, rebase_to_100, trailing_return, AssetSeries, NavPoint,
};
use fin_planner_core::time_value::compound_annual_growth_rate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%d-%m-%Y").unwrap()
}

fn p(date: &str, nav: Decimal) -> NavPoint {
    NavPoint { date: d(date), nav }
}

// ===========================================================================
// Nearest-point lookup
// ===========================================================================

#[test]
fn test_nearest_point_spec_scenario() {
    // Target 01-01-2022 sits 2 years after the first point and 1 year
    // before the second; the second must win.
    let series = vec![p("01-01-2020", dec!(10)), p("01-01-2023", dec!(20))];
    let nearest = find_nearest_point(&series, d("01-01-2022")).unwrap();
    assert_eq!(*nearest, p("01-01-2023", dec!(20)));
}

#[test]
fn test_nearest_point_unsorted_series() {
    let series = vec![
        p("01-01-2025", dec!(30)),
        p("01-01-2019", dec!(8)),
        p("01-06-2021", dec!(14)),
    ];
    let nearest = find_nearest_point(&series, d("01-05-2021")).unwrap();
    assert_eq!(nearest.date, d("01-06-2021"));
}

// ===========================================================================
// Trailing returns
// ===========================================================================

#[test]
fn test_trailing_return_matches_cagr_of_endpoints() {
    let series = vec![
        p("01-07-2025", dec!(240)),
        p("03-07-2020", dec!(120)),
        p("05-01-2023", dec!(171)),
    ];

    let ret = trailing_return(&series, 5, None).unwrap();
    // 120 -> 240 over ~5 years, so ~14.8%/year
    let elapsed_years = Decimal::from((d("01-07-2025") - d("03-07-2020")).num_days()) / dec!(365.25);
    let expected = compound_annual_growth_rate(dec!(120), dec!(240), elapsed_years).unwrap();
    assert_eq!(ret, expected);
    assert!((ret - dec!(14.9)).abs() < dec!(0.2), "ret={}", ret);
}

#[test]
fn test_trailing_return_latest_is_max_date_not_position() {
    // Oldest-first and newest-first orderings of the same data agree.
    let oldest_first = vec![p("01-07-2022", dec!(10)), p("01-07-2025", dec!(20))];
    let newest_first = vec![p("01-07-2025", dec!(20)), p("01-07-2022", dec!(10))];

    assert_eq!(
        trailing_return(&oldest_first, 3, None),
        trailing_return(&newest_first, 3, None)
    );
    assert_eq!(latest_point(&oldest_first), latest_point(&newest_first));
}

#[test]
fn test_trailing_return_windows_with_short_history() {
    // Only ~2 years of history: the 10-year window resolves its nearest
    // point to the oldest observation, still a defined return.
    let series = vec![p("01-07-2023", dec!(100)), p("01-07-2025", dec!(121))];
    let ten_year = trailing_return(&series, 10, None).unwrap();
    // 100 -> 121 over 2 years is ~10%/year
    assert!((ten_year - dec!(10)).abs() < dec!(0.1), "ret={}", ten_year);
}

#[test]
fn test_trailing_return_undefined_cases() {
    assert_eq!(trailing_return(&[], 3, None), None);
    assert_eq!(trailing_return(&[p("01-07-2025", dec!(20))], 3, None), None);

    // Nearest point has a non-positive NAV
    let bad = vec![p("01-07-2022", dec!(-1)), p("01-07-2025", dec!(20))];
    assert_eq!(trailing_return(&bad, 3, None), None);

    // All observations on one date: zero elapsed time
    let flat = vec![p("01-07-2025", dec!(20)), p("01-07-2025", dec!(21))];
    assert_eq!(trailing_return(&flat, 3, None), None);
}

#[test]
fn test_trailing_return_with_explicit_anchor() {
    let series = vec![
        p("01-07-2019", dec!(100)),
        p("01-07-2022", dec!(150)),
        p("01-07-2025", dec!(200)),
    ];
    // Anchored at the latest date, the 3-year window starts near
    // 01-07-2022 regardless of the as_of default.
    let explicit = trailing_return(&series, 3, Some(d("01-07-2025")));
    let defaulted = trailing_return(&series, 3, None);
    assert_eq!(explicit, defaulted);
}

// ===========================================================================
// Comparative rebasing
// ===========================================================================

#[test]
fn test_rebase_both_assets_start_at_100() {
    let assets = vec![
        AssetSeries {
            name: "model".into(),
            points: vec![p("01-01-2024", dec!(42.5)), p("01-02-2024", dec!(46.75))],
        },
        AssetSeries {
            name: "nifty".into(),
            points: vec![p("01-01-2024", dec!(21_000)), p("01-02-2024", dec!(22_050))],
        },
    ];

    let rebased = rebase_to_100(&assets, dec!(100)).unwrap();
    assert_eq!(rebased.assets, vec!["model".to_string(), "nifty".to_string()]);
    assert_eq!(rebased.rows[0].values, vec![dec!(100), dec!(100)]);
    assert_eq!(rebased.rows[1].values, vec![dec!(110), dec!(105)]);
}

#[test]
fn test_rebase_drops_dates_before_common_range() {
    let assets = vec![
        AssetSeries {
            name: "late-starter".into(),
            points: vec![p("01-06-2024", dec!(10)), p("01-07-2024", dec!(11))],
        },
        AssetSeries {
            name: "long-history".into(),
            points: vec![
                p("01-01-2024", dec!(100)),
                p("01-06-2024", dec!(120)),
                p("01-07-2024", dec!(126)),
            ],
        },
    ];

    let rebased = rebase_to_100(&assets, dec!(100)).unwrap();
    // Nothing before 01-06-2024 survives
    assert_eq!(rebased.rows.first().unwrap().date, d("01-06-2024"));
    assert_eq!(rebased.rows.len(), 2);
    assert_eq!(rebased.rows[1].values, vec![dec!(110), dec!(105)]);
}

#[test]
fn test_rebase_forward_fills_gaps() {
    let assets = vec![
        AssetSeries {
            name: "sparse".into(),
            points: vec![p("01-01-2024", dec!(50)), p("04-01-2024", dec!(60))],
        },
        AssetSeries {
            name: "daily".into(),
            points: vec![
                p("01-01-2024", dec!(10)),
                p("02-01-2024", dec!(12)),
                p("03-01-2024", dec!(11)),
                p("04-01-2024", dec!(13)),
            ],
        },
    ];

    let rebased = rebase_to_100(&assets, dec!(100)).unwrap();
    assert_eq!(rebased.rows.len(), 4);
    // The sparse asset carries 100 through the gap days
    assert_eq!(rebased.rows[1].values[0], dec!(100));
    assert_eq!(rebased.rows[2].values[0], dec!(100));
    assert_eq!(rebased.rows[3].values[0], dec!(120));
}

#[test]
fn test_rebase_error_cases() {
    assert!(rebase_to_100(&[], dec!(100)).is_err());

    let zero_start = vec![AssetSeries {
        name: "broken".into(),
        points: vec![p("01-01-2024", dec!(0)), p("02-01-2024", dec!(10))],
    }];
    assert!(rebase_to_100(&zero_start, dec!(100)).is_err());

    let ok = vec![AssetSeries {
        name: "fine".into(),
        points: vec![p("01-01-2024", dec!(10))],
    }];
    assert!(rebase_to_100(&ok, dec!(0)).is_err());
}
