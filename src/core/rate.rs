//! Rate source abstraction

use crate::core::currency::Currency;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// A service publishing one official UAH rate per currency per calendar day.
///
/// Implementations return:
/// - `Ok(Some(rate))` when a rate is published for `date`,
/// - `Ok(None)` when nothing is published for `date` (weekend, holiday, not yet out),
/// - `Err(_)` when the service itself failed. Callers do not retry these.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rate(&self, currency: Currency, date: NaiveDate) -> Result<Option<f64>>;
}
