pub mod data_source;
pub mod error;
pub mod province;
pub mod query;
pub mod span;
pub mod station;
