pub mod series;

#[cfg(feature = "providers")]
pub mod providers;

pub use series::{
    find_nearest_point, latest_point, rebase_to_100, trailing_return, AssetSeries, NavPoint,
    RebasedRow, RebasedSeries,
};
