pub mod error;
pub mod goals;
pub mod nav;
pub mod retirement;
pub mod snapshot;
pub mod time_value;
pub mod types;

pub use error::PlannerError;
pub use types::*;

/// Standard result type for all planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
