pub mod goals;
pub mod nav;
pub mod retirement;
pub mod snapshot;
pub mod time_value;
