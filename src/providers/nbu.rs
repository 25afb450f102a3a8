use super::util::with_retry;
use crate::core::{Currency, RateSource};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument};

const EXCHANGE_PATH: &str = "/NBUStatService/v1/statdirectory/exchange";

/// Official hryvnia rates from the National Bank of Ukraine statistics API.
pub struct NbuRateSource {
    base_url: String,
    client: reqwest::Client,
}

impl NbuRateSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("hryvnia/1.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(NbuRateSource {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NbuRate {
    cc: String,
    rate: f64,
    /// `dd.mm.yyyy`
    exchangedate: String,
}

#[async_trait]
impl RateSource for NbuRateSource {
    #[instrument(name = "NbuRateFetch", skip(self), fields(currency = %currency, date = %date))]
    async fn fetch_rate(&self, currency: Currency, date: NaiveDate) -> Result<Option<f64>> {
        let url = format!(
            "{}{}?valcode={}&date={}&json",
            self.base_url,
            EXCHANGE_PATH,
            currency.code(),
            date.format("%Y%m%d")
        );
        debug!("Requesting rate from {}", url);

        let response = with_retry(|| async { self.client.get(&url).send().await }, 3, 500)
            .await
            .with_context(|| format!("Request failed for {currency} on {date}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for {} on {}",
                response.status(),
                currency,
                date
            ));
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for {currency} on {date}"))?;

        let rates: Vec<NbuRate> = serde_json::from_str(&text).with_context(|| {
            format!("Failed to parse NBU response for {currency} on {date}. Response: '{text}'")
        })?;

        let Some(entry) = rates.into_iter().next() else {
            debug!("No rate published");
            return Ok(None);
        };

        if entry.cc != currency.code() {
            return Err(anyhow!(
                "Expected a {} rate, got {} for {}",
                currency,
                entry.cc,
                date
            ));
        }

        let published_on = NaiveDate::parse_from_str(&entry.exchangedate, "%d.%m.%Y")
            .with_context(|| format!("Invalid exchangedate: {}", entry.exchangedate))?;
        if published_on != date {
            debug!("Rate belongs to {}, not {}", published_on, date);
            return Ok(None);
        }

        if !(entry.rate.is_finite() && entry.rate > 0.0) {
            return Err(anyhow!(
                "Invalid {} rate {} for {}",
                currency,
                entry.rate,
                date
            ));
        }

        debug!("{} rate on {}: {}", currency, date, entry.rate);
        Ok(Some(entry.rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(valcode: &str, date: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(EXCHANGE_PATH))
            .and(query_param("valcode", valcode))
            .and(query_param("date", date))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    const USD_JSON: &str = r#"[
        {"r030": 840, "txt": "Долар США", "rate": 41.4918, "cc": "USD", "exchangedate": "14.03.2025"}
    ]"#;

    #[tokio::test]
    async fn test_published_rate() {
        let mock_server = create_mock_server("USD", "20250314", 200, USD_JSON).await;
        let source = NbuRateSource::new(&mock_server.uri()).unwrap();

        let rate = source.fetch_rate(Currency::Usd, day()).await.unwrap();
        assert_eq!(rate, Some(41.4918));
    }

    #[tokio::test]
    async fn test_empty_response_is_not_published() {
        let mock_server = create_mock_server("EUR", "20250314", 200, "[]").await;
        let source = NbuRateSource::new(&mock_server.uri()).unwrap();

        let rate = source.fetch_rate(Currency::Eur, day()).await.unwrap();
        assert_eq!(rate, None);
    }

    #[tokio::test]
    async fn test_rate_for_other_date_is_not_published() {
        let body = r#"[{"r030": 840, "txt": "Долар США", "rate": 41.1, "cc": "USD", "exchangedate": "13.03.2025"}]"#;
        let mock_server = create_mock_server("USD", "20250314", 200, body).await;
        let source = NbuRateSource::new(&mock_server.uri()).unwrap();

        let rate = source.fetch_rate(Currency::Usd, day()).await.unwrap();
        assert_eq!(rate, None);
    }

    #[tokio::test]
    async fn test_server_error() {
        let mock_server = create_mock_server("USD", "20250314", 500, "").await;
        let source = NbuRateSource::new(&mock_server.uri()).unwrap();

        let result = source.fetch_rate(Currency::Usd, day()).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for USD on 2025-03-14"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server =
            create_mock_server("USD", "20250314", 200, r#"{"error": "maintenance"}"#).await;
        let source = NbuRateSource::new(&mock_server.uri()).unwrap();

        let result = source.fetch_rate(Currency::Usd, day()).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse NBU response for USD on 2025-03-14")
        );
    }

    #[tokio::test]
    async fn test_non_positive_rate_is_rejected() {
        let body = r#"[{"r030": 978, "txt": "Євро", "rate": 0.0, "cc": "EUR", "exchangedate": "14.03.2025"}]"#;
        let mock_server = create_mock_server("EUR", "20250314", 200, body).await;
        let source = NbuRateSource::new(&mock_server.uri()).unwrap();

        let result = source.fetch_rate(Currency::Eur, day()).await;
        assert!(result.unwrap_err().to_string().contains("Invalid EUR rate"));
    }

    #[tokio::test]
    async fn test_currency_mismatch_is_rejected() {
        let mock_server = create_mock_server("EUR", "20250314", 200, USD_JSON).await;
        let source = NbuRateSource::new(&mock_server.uri()).unwrap();

        let result = source.fetch_rate(Currency::Eur, day()).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Expected a EUR rate, got USD for 2025-03-14"
        );
    }
}
