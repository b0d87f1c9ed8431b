use crate::core::currency::{LatestRates, RateService, TimeSeries};
use crate::core::error::RateError;
use crate::core::model::SymbolEntry;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://api.apilayer.com/exchangerates_data";

/// Client for the apilayer "exchangerates_data" API.
pub struct ExchangeRatesProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ExchangeRatesProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        ExchangeRatesProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Sends one GET and validates the `success` envelope. Anything other
    /// than HTTP 200 with `success: true` is a rejection.
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, RateError> {
        let raw = format!("{}/{}", self.base_url, endpoint);
        let url = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        }
        .map_err(|e| RateError::NetworkUnavailable(format!("Invalid URL {raw}: {e}")))?;
        debug!("Requesting {}", endpoint);

        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RateError::RemoteRejected(format!(
                "HTTP error: {status} for {endpoint}"
            )));
        }

        let text = response.text().await?;
        let envelope: Envelope = serde_json::from_str(&text).map_err(|e| {
            RateError::RemoteRejected(format!("Failed to parse {endpoint} response: {e}"))
        })?;
        envelope.check(endpoint)?;

        serde_json::from_str(&text).map_err(|e| {
            RateError::RemoteRejected(format!("Failed to parse {endpoint} response: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiFailure {
    code: Option<serde_json::Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
    info: Option<String>,
}

/// Business-level status every response carries next to its payload.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    error: Option<ApiFailure>,
}

impl Envelope {
    fn check(self, endpoint: &str) -> Result<(), RateError> {
        if self.success {
            return Ok(());
        }
        let reason = match self.error {
            Some(ApiFailure { code, kind, info }) => format!(
                "{} ({})",
                info.or(kind).unwrap_or_else(|| "unknown error".to_string()),
                code.map(|c| c.to_string()).unwrap_or_default()
            ),
            None => "success flag not set".to_string(),
        };
        Err(RateError::RemoteRejected(format!("{endpoint}: {reason}")))
    }
}

#[derive(Debug, Deserialize)]
struct SymbolsPayload {
    symbols: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct LatestPayload {
    base: Option<String>,
    date: Option<String>,
    rates: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct TimeSeriesPayload {
    rates: TimeSeries,
}

#[async_trait]
impl RateService for ExchangeRatesProvider {
    #[instrument(name = "SymbolsFetch", skip(self))]
    async fn fetch_symbols(&self) -> Result<Vec<SymbolEntry>, RateError> {
        let payload: SymbolsPayload = self.get("symbols", &[]).await?;
        Ok(payload
            .symbols
            .into_iter()
            .map(|(code, label)| SymbolEntry { code, label })
            .collect())
    }

    #[instrument(name = "LatestFetch", skip(self, symbols), fields(count = symbols.len()))]
    async fn fetch_latest(&self, base: &str, symbols: &[String]) -> Result<LatestRates, RateError> {
        let joined = symbols.join(",");
        let payload: LatestPayload = self
            .get("latest", &[("symbols", joined.as_str()), ("base", base)])
            .await?;
        Ok(LatestRates {
            base: payload.base.unwrap_or_else(|| base.to_string()),
            date: payload.date,
            rates: payload.rates,
        })
    }

    #[instrument(name = "TimeSeriesFetch", skip(self))]
    async fn fetch_timeseries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: &str,
        symbols: &[String],
    ) -> Result<TimeSeries, RateError> {
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();
        let joined = symbols.join(",");
        let payload: TimeSeriesPayload = self
            .get(
                "timeseries",
                &[
                    ("start_date", start.as_str()),
                    ("end_date", end.as_str()),
                    ("base", base),
                    ("symbols", joined.as_str()),
                ],
            )
            .await?;
        Ok(payload.rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_KEY: &str = "test-key";

    async fn mount(server: &MockServer, endpoint: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{endpoint}")))
            .and(header("apikey", API_KEY))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_symbols() {
        let server = MockServer::start().await;
        mount(
            &server,
            "symbols",
            200,
            r#"{"success": true, "symbols": {"USD": "United States Dollar", "INR": "Indian Rupee"}}"#,
        )
        .await;

        let provider = ExchangeRatesProvider::new(&server.uri(), API_KEY);
        let symbols = provider.fetch_symbols().await.unwrap();

        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].code, "INR");
        assert_eq!(symbols[0].label, "Indian Rupee");
        assert_eq!(symbols[1].code, "USD");
    }

    #[tokio::test]
    async fn test_fetch_latest_sends_symbols_and_base() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("symbols", "INR,USD"))
            .and(query_param("base", "USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"success": true, "base": "USD", "date": "2026-10-18", "rates": {"INR": 83.0, "USD": 1.0}}"#,
            ))
            .mount(&server)
            .await;

        let provider = ExchangeRatesProvider::new(&server.uri(), API_KEY);
        let latest = provider
            .fetch_latest("USD", &["INR".to_string(), "USD".to_string()])
            .await
            .unwrap();

        assert_eq!(latest.base, "USD");
        assert_eq!(latest.date.as_deref(), Some("2026-10-18"));
        assert_eq!(latest.rates.get("INR"), Some(&83.0));
    }

    #[tokio::test]
    async fn test_fetch_timeseries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/timeseries"))
            .and(query_param("start_date", "2026-09-28"))
            .and(query_param("end_date", "2026-10-12"))
            .and(query_param("base", "INR"))
            .and(query_param("symbols", "USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"success": true, "timeseries": true, "rates": {
                    "2026-09-29": {"USD": 0.0121},
                    "2026-09-28": {"USD": 0.0120}
                }}"#,
            ))
            .mount(&server)
            .await;

        let provider = ExchangeRatesProvider::new(&server.uri(), API_KEY);
        let series = provider
            .fetch_timeseries(
                NaiveDate::from_ymd_opt(2026, 9, 28).unwrap(),
                NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
                "INR",
                &["USD".to_string()],
            )
            .await
            .unwrap();

        let dates: Vec<&String> = series.keys().collect();
        assert_eq!(dates, vec!["2026-09-28", "2026-09-29"]);
    }

    #[tokio::test]
    async fn test_non_200_is_rejected() {
        let server = MockServer::start().await;
        mount(&server, "symbols", 429, r#"{"message": "rate limited"}"#).await;

        let provider = ExchangeRatesProvider::new(&server.uri(), API_KEY);
        let result = provider.fetch_symbols().await;

        assert_eq!(
            result,
            Err(RateError::RemoteRejected(
                "HTTP error: 429 Too Many Requests for symbols".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_success_false_is_rejected() {
        let server = MockServer::start().await;
        mount(
            &server,
            "symbols",
            200,
            r#"{"success": false, "error": {"code": 101, "type": "invalid_access_key"}}"#,
        )
        .await;

        let provider = ExchangeRatesProvider::new(&server.uri(), API_KEY);
        let err = provider.fetch_symbols().await.unwrap_err();

        assert_eq!(
            err,
            RateError::RemoteRejected("symbols: invalid_access_key (101)".to_string())
        );
    }

    #[tokio::test]
    async fn test_rejection_prefers_info_over_type() {
        let server = MockServer::start().await;
        mount(
            &server,
            "latest",
            200,
            r#"{"success": false, "error": {"code": 104, "type": "usage_limit_reached", "info": "Monthly request volume reached."}}"#,
        )
        .await;

        let provider = ExchangeRatesProvider::new(&server.uri(), API_KEY);
        let err = provider
            .fetch_latest("USD", &["INR".to_string()])
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RateError::RemoteRejected("latest: Monthly request volume reached. (104)".to_string())
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let server = MockServer::start().await;
        mount(&server, "symbols", 200, r#"{"success": true, "symbols": 42}"#).await;

        let provider = ExchangeRatesProvider::new(&server.uri(), API_KEY);
        let err = provider.fetch_symbols().await.unwrap_err();

        assert!(matches!(err, RateError::RemoteRejected(msg) if msg.contains("Failed to parse symbols response")));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Nothing listens on the discard port.
        let provider = ExchangeRatesProvider::new("http://127.0.0.1:9", API_KEY);
        let err = provider.fetch_symbols().await.unwrap_err();
        assert!(matches!(err, RateError::NetworkUnavailable(_)));
    }
}
