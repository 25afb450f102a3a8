//! Descriptive statistics over a rate series.
use crate::core::currency::Currency;
use crate::core::error::{RatesError, Result};
use crate::core::series::Series;
use chrono::NaiveDate;
use serde::Serialize;

/// Trailing average ending at `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Statistics derived from one [`Series`].
///
/// `std` is the *population* standard deviation (divides by N). Deployments
/// comparing against sample-based figures will see slightly smaller values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub currency: Currency,
    pub observations: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub current: f64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub rolling_window: usize,
    pub rolling_average: Vec<RollingPoint>,
    /// Last rate minus first rate.
    pub change: f64,
    /// `change` relative to the first rate, as a ratio (0.01 is 1%).
    pub change_pct: f64,
}

impl Statistics {
    pub fn diff_from_mean(&self) -> f64 {
        self.current - self.mean
    }

    /// Distance of the current rate from the mean, as a ratio of the mean.
    pub fn pct_from_mean(&self) -> f64 {
        self.diff_from_mean() / self.mean
    }

    pub fn rolling_average_on(&self, date: NaiveDate) -> Option<f64> {
        self.rolling_average
            .iter()
            .find(|p| p.date == date)
            .map(|p| p.value)
    }
}

/// Computes [`Statistics`] for `series`, averaging over trailing windows of
/// `rolling_window` observations.
pub fn compute(series: &Series, rolling_window: usize) -> Result<Statistics> {
    if rolling_window == 0 {
        return Err(RatesError::InvalidParameter(
            "rolling_window must be positive".to_string(),
        ));
    }

    let rates: Vec<f64> = series.observations().iter().map(|o| o.rate).collect();
    let first = series.first();
    let last = series.last();

    if first.rate == 0.0 {
        return Err(RatesError::DivisionByZero {
            currency: series.currency(),
        });
    }

    let mean = mean(&rates);
    let variance = rates.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / rates.len() as f64;
    let min = rates.iter().copied().fold(f64::INFINITY, f64::min);
    let max = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let change = last.rate - first.rate;

    Ok(Statistics {
        currency: series.currency(),
        observations: rates.len(),
        start: first.date,
        end: last.date,
        current: last.rate,
        mean,
        std: variance.sqrt(),
        min,
        max,
        rolling_window,
        rolling_average: rolling_average(series, rolling_window),
        change,
        change_pct: change / first.rate,
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// One point per full window; empty when the series is shorter than the window.
fn rolling_average(series: &Series, window: usize) -> Vec<RollingPoint> {
    let observations = series.observations();
    if observations.len() < window {
        return Vec::new();
    }

    observations
        .windows(window)
        .map(|w| {
            let rates: Vec<f64> = w.iter().map(|o| o.rate).collect();
            RollingPoint {
                date: w[window - 1].date,
                value: mean(&rates),
            }
        })
        .collect()
}
