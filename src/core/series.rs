//! Daily rate series and the backward walk that assembles them.

use crate::core::currency::Currency;
use crate::core::error::{RatesError, Result};
use crate::core::rate::RateSource;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, instrument};

/// One published rate: UAH per unit of the foreign currency on `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub rate: f64,
}

/// Observations for one currency, strictly ascending by date and never empty.
///
/// Days without a published rate are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    currency: Currency,
    observations: Vec<Observation>,
}

impl Series {
    pub fn new(currency: Currency, observations: Vec<Observation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(RatesError::InvalidParameter(format!(
                "{currency} series must contain at least one observation"
            )));
        }
        if let Some(bad) = observations
            .iter()
            .find(|o| !(o.rate.is_finite() && o.rate > 0.0))
        {
            return Err(RatesError::InvalidParameter(format!(
                "{currency} rate on {} must be positive, got {}",
                bad.date, bad.rate
            )));
        }
        if let Some(pair) = observations.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(RatesError::InvalidParameter(format!(
                "{currency} observations out of order: {} is followed by {}",
                pair[0].date, pair[1].date
            )));
        }
        Ok(Self {
            currency,
            observations,
        })
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first(&self) -> &Observation {
        &self.observations[0]
    }

    pub fn last(&self) -> &Observation {
        &self.observations[self.observations.len() - 1]
    }
}

/// Walks backward from a reference date collecting published rates.
pub struct SeriesBuilder<'a> {
    source: &'a dyn RateSource,
    window_days: u32,
    lookback_days: u32,
}

impl<'a> SeriesBuilder<'a> {
    /// `window_days` is the number of published rates wanted; `lookback_days`
    /// bounds how many calendar days are probed to find them.
    pub fn new(source: &'a dyn RateSource, window_days: u32, lookback_days: u32) -> Result<Self> {
        if window_days == 0 {
            return Err(RatesError::InvalidParameter(
                "window_days must be positive".to_string(),
            ));
        }
        if lookback_days < window_days {
            return Err(RatesError::InvalidParameter(format!(
                "lookback_days ({lookback_days}) must be at least window_days ({window_days})"
            )));
        }
        Ok(Self {
            source,
            window_days,
            lookback_days,
        })
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    /// Builds the series of the `window_days` most recent published rates on
    /// or before `as_of`.
    ///
    /// Terminates after `window_days` rates are found or `lookback_days`
    /// calendar days have been probed, whichever comes first. `on_fetch` is
    /// called once per probed day.
    #[instrument(name = "BuildSeries", skip(self, on_fetch))]
    pub async fn build(
        &self,
        currency: Currency,
        as_of: NaiveDate,
        on_fetch: &(dyn Fn() + Sync),
    ) -> Result<Series> {
        let window = self.window_days as usize;
        let mut newest_first = Vec::with_capacity(window);

        for offset in 0..self.lookback_days {
            let Some(date) = as_of.checked_sub_days(Days::new(u64::from(offset))) else {
                break;
            };

            let fetched = self.source.fetch_rate(currency, date).await;
            on_fetch();

            match fetched {
                Ok(Some(rate)) => {
                    newest_first.push(Observation { date, rate });
                    if newest_first.len() == window {
                        break;
                    }
                }
                Ok(None) => debug!("No {} rate published on {}, skipping", currency, date),
                Err(e) => {
                    return Err(RatesError::SourceUnavailable {
                        currency,
                        date,
                        reason: format!("{e:#}"),
                    });
                }
            }
        }

        if newest_first.is_empty() {
            return Err(RatesError::NoDataAvailable {
                currency,
                lookback_days: self.lookback_days,
                as_of,
            });
        }

        debug!(
            "Collected {} of {} {} rates",
            newest_first.len(),
            window,
            currency
        );
        newest_first.reverse();
        Series::new(currency, newest_first)
    }
}
