use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{FetchFuture, Fetched, ProviderFailure, QuoteSource, SourceResult};
use crate::domain::{Quote, Symbol};
use crate::http_client::{HttpClient, HttpRequest};
use crate::source::ProviderId;

const AGGS_BASE_URL: &str = "https://api.polygon.io/v2/aggs/ticker";

/// Environment variable holding the polygon.io API key.
pub const API_KEY_ENV: &str = "QUOTEFALL_POLYGON_API_KEY";

/// Previous-close aggregate adapter for polygon.io.
///
/// Credential-gated: without an API key the source reports no data
/// instead of failing, and the chain moves on. The upstream signals
/// empty data, rate limits, and unknown symbols alike through status
/// codes and empty result bodies, so those are all NoData too; only
/// transport-level problems raise a failure.
pub struct PolygonAdapter {
    http: Arc<dyn HttpClient>,
    api_key: Option<String>,
}

impl PolygonAdapter {
    pub fn new(http: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        // an empty or blank key counts as absent
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        Self { http, api_key }
    }

    pub fn from_env(http: Arc<dyn HttpClient>) -> Self {
        Self::new(http, std::env::var(API_KEY_ENV).ok())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_prev_close(&self, symbol: &Symbol, api_key: &str) -> SourceResult<Quote> {
        let url = format!(
            "{AGGS_BASE_URL}/{}/prev",
            urlencoding::encode(symbol.as_str())
        );
        let request = HttpRequest::get(url).with_query("apiKey", api_key);

        let response = self.http.execute(request).await.map_err(|error| {
            ProviderFailure::new(ProviderId::Polygon, "prev-close", error.to_string())
        })?;

        if !response.is_success() {
            tracing::debug!(
                status = response.status,
                symbol = %symbol,
                "polygon returned non-success status"
            );
            return Ok(Fetched::NoData);
        }

        let Ok(payload) = serde_json::from_str::<PrevCloseResponse>(&response.body) else {
            tracing::debug!(symbol = %symbol, "malformed polygon response body");
            return Ok(Fetched::NoData);
        };

        if payload.status != "OK" {
            return Ok(Fetched::NoData);
        }

        let Some(bar) = payload.results.into_iter().next() else {
            return Ok(Fetched::NoData);
        };

        let mut quote = Quote::new(symbol.clone(), bar.close, ProviderId::Polygon)
            .and_then(|quote| quote.with_ohlc(bar.open, bar.high, bar.low))
            .map_err(|error| {
                ProviderFailure::new(ProviderId::Polygon, "normalize quote", error.to_string())
            })?
            .with_volume(bar.volume as u64);

        if let Some(timestamp) = bar.timestamp {
            quote = quote.with_timestamp(timestamp);
        }

        Ok(Fetched::Data(quote))
    }
}

impl QuoteSource for PolygonAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Polygon
    }

    fn fetch_quote<'a>(&'a self, symbol: &'a Symbol) -> FetchFuture<'a, Quote> {
        Box::pin(async move {
            let Some(api_key) = self.api_key.as_deref() else {
                tracing::debug!("polygon adapter has no API key provisioned; skipping");
                return Ok(Fetched::NoData);
            };
            self.fetch_prev_close(symbol, api_key).await
        })
    }
}

/// `GET /v2/aggs/ticker/{symbol}/prev`: one aggregate bar per result,
/// single-letter field names.
#[derive(Debug, Deserialize)]
struct PrevCloseResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<PrevCloseBar>,
}

#[derive(Debug, Deserialize)]
struct PrevCloseBar {
    #[serde(rename = "c")]
    close: f64,
    #[serde(rename = "o")]
    open: f64,
    #[serde(rename = "h")]
    high: f64,
    #[serde(rename = "l")]
    low: f64,
    #[serde(rename = "v")]
    volume: f64,
    #[serde(rename = "t")]
    timestamp: Option<i64>,
}
