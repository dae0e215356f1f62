pub mod data_loader;
pub mod error;
pub mod pipeline;
pub mod rate_limit;
pub mod slice;
