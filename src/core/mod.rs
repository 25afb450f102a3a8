//! Core business logic: series acquisition, statistics and the result cache

pub mod cache;
pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod query;
pub mod rate;
pub mod series;
pub mod stats;

// Re-export main types for cleaner imports
pub use currency::Currency;
pub use error::RatesError;
pub use query::{Action, Outcome, QueryKind, QueryParams, QueryResult, RatesService};
pub use rate::RateSource;
pub use series::{Observation, Series, SeriesBuilder};
pub use stats::{RollingPoint, Statistics};
