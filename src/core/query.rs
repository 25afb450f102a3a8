//! Query results and the service that produces them.

use crate::core::cache::ResultCache;
use crate::core::currency::Currency;
use crate::core::error::{RatesError, Result};
use crate::core::rate::RateSource;
use crate::core::series::{Series, SeriesBuilder};
use crate::core::stats::{self, Statistics};
use chrono::NaiveDate;
use std::fmt::Display;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Summary,
    Detail,
}

impl Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKind::Summary => write!(f, "summary"),
            QueryKind::Detail => write!(f, "detail"),
        }
    }
}

/// Outcome of a successful query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Statistics for every configured currency, in configuration order.
    Summary {
        as_of: NaiveDate,
        statistics: Vec<Statistics>,
    },
    /// Full series for one currency together with its statistics.
    Detail {
        series: Series,
        statistics: Statistics,
    },
}

impl QueryResult {
    pub fn kind(&self) -> QueryKind {
        match self {
            QueryResult::Summary { .. } => QueryKind::Summary,
            QueryResult::Detail { .. } => QueryKind::Detail,
        }
    }
}

/// Parameters every query runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub currencies: Vec<Currency>,
    pub window_days: u32,
    pub lookback_days: u32,
    pub rolling_window: usize,
}

impl QueryParams {
    /// Rejects values that would make any query meaningless. Runs before any
    /// rate is fetched.
    pub fn validate(&self) -> Result<()> {
        if self.currencies.is_empty() {
            return Err(RatesError::InvalidParameter(
                "at least one currency must be configured".to_string(),
            ));
        }
        if self.rolling_window == 0 {
            return Err(RatesError::InvalidParameter(
                "rolling_window must be positive".to_string(),
            ));
        }
        if self.window_days == 0 {
            return Err(RatesError::InvalidParameter(
                "window_days must be positive".to_string(),
            ));
        }
        if self.lookback_days < self.window_days {
            return Err(RatesError::InvalidParameter(format!(
                "lookback_days ({}) must be at least window_days ({})",
                self.lookback_days, self.window_days
            )));
        }
        Ok(())
    }
}

/// What the menu asks the core to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RunSummary,
    RunDetail(Currency),
    SaveLast,
    Quit,
}

/// What the core hands back for an [`Action`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A fresh result, already stored as the last result.
    Ready(QueryResult),
    /// The last result, to be handed to an exporter.
    Export(QueryResult),
    /// `SaveLast` was requested before any query succeeded.
    NothingToExport,
    Quit,
}

/// Runs queries against a [`RateSource`] and remembers the last result.
pub struct RatesService<'a> {
    source: &'a dyn RateSource,
    params: QueryParams,
    cache: ResultCache,
}

impl<'a> RatesService<'a> {
    pub fn new(source: &'a dyn RateSource, params: QueryParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            source,
            params,
            cache: ResultCache::new(),
        })
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn last_result(&self) -> Option<&QueryResult> {
        self.cache.retrieve()
    }

    /// Upper bound of rate-source calls one query can make.
    pub fn max_fetches(&self, kind: QueryKind) -> u64 {
        let per_currency = u64::from(self.params.lookback_days);
        match kind {
            QueryKind::Summary => per_currency * self.params.currencies.len() as u64,
            QueryKind::Detail => per_currency,
        }
    }

    pub async fn handle(
        &mut self,
        action: Action,
        as_of: NaiveDate,
        on_fetch: &(dyn Fn() + Sync),
    ) -> Result<Outcome> {
        match action {
            Action::RunSummary => self.run_summary(as_of, on_fetch).await.map(Outcome::Ready),
            Action::RunDetail(currency) => self
                .run_detail(currency, as_of, on_fetch)
                .await
                .map(Outcome::Ready),
            Action::SaveLast => Ok(match self.cache.retrieve() {
                Some(result) => Outcome::Export(result.clone()),
                None => Outcome::NothingToExport,
            }),
            Action::Quit => Ok(Outcome::Quit),
        }
    }

    /// Statistics for every configured currency. Any currency failing fails
    /// the whole query and leaves the last result untouched.
    pub async fn run_summary(
        &mut self,
        as_of: NaiveDate,
        on_fetch: &(dyn Fn() + Sync),
    ) -> Result<QueryResult> {
        let builder = self.builder()?;
        let mut statistics = Vec::with_capacity(self.params.currencies.len());
        for &currency in &self.params.currencies {
            let series = builder.build(currency, as_of, on_fetch).await?;
            statistics.push(stats::compute(&series, self.params.rolling_window)?);
        }

        let result = QueryResult::Summary { as_of, statistics };
        info!("Summary query for {} completed", as_of);
        self.cache.store(result.clone());
        Ok(result)
    }

    pub async fn run_detail(
        &mut self,
        currency: Currency,
        as_of: NaiveDate,
        on_fetch: &(dyn Fn() + Sync),
    ) -> Result<QueryResult> {
        let builder = self.builder()?;
        let series = builder.build(currency, as_of, on_fetch).await?;
        let statistics = stats::compute(&series, self.params.rolling_window)?;
        debug!(
            "{} series spans {} to {}",
            currency, statistics.start, statistics.end
        );

        let result = QueryResult::Detail { series, statistics };
        info!("Detail query for {} on {} completed", currency, as_of);
        self.cache.store(result.clone());
        Ok(result)
    }

    fn builder(&self) -> Result<SeriesBuilder<'a>> {
        SeriesBuilder::new(
            self.source,
            self.params.window_days,
            self.params.lookback_days,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::series::tests::{MockRateSource, date};

    fn params() -> QueryParams {
        QueryParams {
            currencies: Currency::ALL.to_vec(),
            window_days: 30,
            lookback_days: 60,
            rolling_window: 7,
        }
    }

    fn source_with_both(as_of: NaiveDate) -> MockRateSource {
        let mut source = MockRateSource::new();
        source.publish_daily(Currency::Usd, as_of, 45, true, |i| 41.0 + i as f64 * 0.01);
        source.publish_daily(Currency::Eur, as_of, 45, true, |i| 45.0 + i as f64 * 0.02);
        source
    }

    #[tokio::test]
    async fn test_summary_covers_configured_currencies() {
        let as_of = date(2025, 3, 31);
        let source = source_with_both(as_of);
        let mut service = RatesService::new(&source, params()).unwrap();

        let result = service.run_summary(as_of, &|| ()).await.unwrap();

        match &result {
            QueryResult::Summary {
                as_of: got,
                statistics,
            } => {
                assert_eq!(*got, as_of);
                let currencies: Vec<_> = statistics.iter().map(|s| s.currency).collect();
                assert_eq!(currencies, vec![Currency::Usd, Currency::Eur]);
                assert!(statistics.iter().all(|s| s.end == as_of));
            }
            other => panic!("Expected a summary, got {other:?}"),
        }
        assert_eq!(service.last_result(), Some(&result));
    }

    #[tokio::test]
    async fn test_detail_replaces_previous_result() {
        let as_of = date(2025, 3, 31);
        let source = source_with_both(as_of);
        let mut service = RatesService::new(&source, params()).unwrap();

        service.run_summary(as_of, &|| ()).await.unwrap();
        let detail = service
            .run_detail(Currency::Eur, as_of, &|| ())
            .await
            .unwrap();

        assert_eq!(detail.kind(), QueryKind::Detail);
        assert_eq!(service.last_result(), Some(&detail));
        if let QueryResult::Detail { series, statistics } = detail {
            assert_eq!(series.currency(), Currency::Eur);
            assert_eq!(statistics.observations, series.len());
            assert_eq!(statistics.current, series.last().rate);
        }
    }

    #[tokio::test]
    async fn test_failed_query_keeps_cache_empty() {
        let as_of = date(2025, 3, 31);
        let mut source = MockRateSource::new();
        source.add_failure(Currency::Usd, as_of, "HTTP error: 503");
        let mut service = RatesService::new(&source, params()).unwrap();

        let err = service.run_summary(as_of, &|| ()).await.unwrap_err();

        assert!(matches!(err, RatesError::SourceUnavailable { .. }));
        assert!(service.last_result().is_none());
    }

    #[tokio::test]
    async fn test_failed_query_keeps_previous_result() {
        let as_of = date(2025, 3, 31);
        let source = source_with_both(as_of);
        let mut service = RatesService::new(&source, params()).unwrap();
        let summary = service.run_summary(as_of, &|| ()).await.unwrap();

        // Nothing is published a year earlier.
        let err = service
            .run_detail(Currency::Usd, date(2024, 3, 31), &|| ())
            .await
            .unwrap_err();

        assert!(matches!(err, RatesError::NoDataAvailable { .. }));
        assert_eq!(service.last_result(), Some(&summary));
    }

    #[tokio::test]
    async fn test_save_last_reads_cache() {
        let as_of = date(2025, 3, 31);
        let source = source_with_both(as_of);
        let mut service = RatesService::new(&source, params()).unwrap();

        let outcome = service
            .handle(Action::SaveLast, as_of, &|| ())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::NothingToExport);

        let Outcome::Ready(result) = service
            .handle(Action::RunDetail(Currency::Usd), as_of, &|| ())
            .await
            .unwrap()
        else {
            panic!("Expected a fresh result");
        };
        let calls = source.call_count();

        let outcome = service
            .handle(Action::SaveLast, as_of, &|| ())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Export(result));
        assert_eq!(source.call_count(), calls);

        let outcome = service.handle(Action::Quit, as_of, &|| ()).await.unwrap();
        assert_eq!(outcome, Outcome::Quit);
    }

    #[tokio::test]
    async fn test_repeated_queries_are_identical() {
        let as_of = date(2025, 3, 31);
        let source = source_with_both(as_of);
        let mut service = RatesService::new(&source, params()).unwrap();

        let first = service.run_summary(as_of, &|| ()).await.unwrap();
        let second = service.run_summary(as_of, &|| ()).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_params_rejected_before_fetching() {
        let source = MockRateSource::new();
        for bad in [
            QueryParams {
                rolling_window: 0,
                ..params()
            },
            QueryParams {
                window_days: 0,
                ..params()
            },
            QueryParams {
                lookback_days: 10,
                ..params()
            },
            QueryParams {
                currencies: vec![],
                ..params()
            },
        ] {
            assert!(matches!(
                RatesService::new(&source, bad),
                Err(RatesError::InvalidParameter(_))
            ));
        }
        assert_eq!(source.call_count(), 0);
    }

    #[test]
    fn test_max_fetches() {
        let source = MockRateSource::new();
        let service = RatesService::new(&source, params()).unwrap();
        assert_eq!(service.max_fetches(QueryKind::Summary), 120);
        assert_eq!(service.max_fetches(QueryKind::Detail), 60);
    }
}
