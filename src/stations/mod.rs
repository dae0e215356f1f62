pub mod catalog_query;
pub mod coverage;
pub mod distance;
pub mod error;
pub mod inventory;
pub mod recode;
