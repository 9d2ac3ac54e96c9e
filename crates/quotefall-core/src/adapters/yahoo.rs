use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{
    FetchFuture, Fetched, InfoSource, ProviderFailure, QuoteSource, SourceResult,
};
use crate::domain::{InfoRecord, Quote, Symbol};
use crate::http_client::{HttpClient, HttpRequest};
use crate::source::ProviderId;

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_BASE_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

// Yahoo rejects non-browser user agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Historical-quote fallback adapter backed by Yahoo Finance's public
/// chart API.
///
/// Universal catch-all: last in every chain, no symbol restriction. Also
/// the descriptive-metadata source for the enrichment step, via the
/// quoteSummary endpoint; that path is independent of price fetching.
pub struct YahooAdapter {
    http: Arc<dyn HttpClient>,
}

impl YahooAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch_daily_bar(&self, symbol: &Symbol) -> SourceResult<Quote> {
        let url = format!(
            "{CHART_BASE_URL}/{}",
            urlencoding::encode(symbol.as_str())
        );
        let request = HttpRequest::get(url)
            .with_query("range", "1d")
            .with_query("interval", "1d")
            .with_header("user-agent", BROWSER_USER_AGENT);

        let response = self.http.execute(request).await.map_err(|error| {
            ProviderFailure::new(ProviderId::Yahoo, "chart", error.to_string())
        })?;

        if !response.is_success() {
            tracing::debug!(
                status = response.status,
                symbol = %symbol,
                "yahoo chart returned non-success status"
            );
            return Ok(Fetched::NoData);
        }

        let payload: ChartResponse = serde_json::from_str(&response.body).map_err(|error| {
            ProviderFailure::new(ProviderId::Yahoo, "parse chart", error.to_string())
        })?;

        let Some(result) = payload.chart.result.unwrap_or_default().into_iter().next() else {
            return Ok(Fetched::NoData);
        };
        let Some(bars) = result.indicators.quote.into_iter().next() else {
            return Ok(Fetched::NoData);
        };

        // most recent bar with a close; intraday gaps come through as nulls
        let Some(index) = bars.close.iter().rposition(Option::is_some) else {
            return Ok(Fetched::NoData);
        };
        let Some(close) = bars.close.get(index).copied().flatten() else {
            return Ok(Fetched::NoData);
        };

        let mut quote = Quote::new(symbol.clone(), close, ProviderId::Yahoo).map_err(|error| {
            ProviderFailure::new(ProviderId::Yahoo, "normalize quote", error.to_string())
        })?;

        let open = bars.open.get(index).copied().flatten();
        let high = bars.high.get(index).copied().flatten();
        let low = bars.low.get(index).copied().flatten();
        if let (Some(open), Some(high), Some(low)) = (open, high, low) {
            quote = quote.with_ohlc(open, high, low).map_err(|error| {
                ProviderFailure::new(ProviderId::Yahoo, "normalize quote", error.to_string())
            })?;
        }

        if let Some(volume) = bars.volume.get(index).copied().flatten() {
            quote = quote.with_volume(volume);
        }
        if let Some(timestamp) = result.timestamp.get(index).copied() {
            quote = quote.with_timestamp(timestamp);
        }

        Ok(Fetched::Data(quote))
    }

    async fn fetch_profile(&self, symbol: &Symbol) -> SourceResult<InfoRecord> {
        let url = format!(
            "{QUOTE_SUMMARY_BASE_URL}/{}",
            urlencoding::encode(symbol.as_str())
        );
        let request = HttpRequest::get(url)
            .with_query("modules", "assetProfile,price")
            .with_header("user-agent", BROWSER_USER_AGENT);

        let response = self.http.execute(request).await.map_err(|error| {
            ProviderFailure::new(ProviderId::Yahoo, "quote-summary", error.to_string())
        })?;

        if !response.is_success() {
            tracing::debug!(
                status = response.status,
                symbol = %symbol,
                "yahoo quote-summary returned non-success status"
            );
            return Ok(Fetched::NoData);
        }

        let payload: QuoteSummaryResponse =
            serde_json::from_str(&response.body).map_err(|error| {
                ProviderFailure::new(ProviderId::Yahoo, "parse quote-summary", error.to_string())
            })?;

        let Some(result) = payload
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
        else {
            return Ok(Fetched::NoData);
        };

        if result.asset_profile.is_none() && result.price.is_none() {
            return Ok(Fetched::NoData);
        }

        let profile = result.asset_profile.unwrap_or_default();
        let price = result.price.unwrap_or_default();

        Ok(Fetched::Data(InfoRecord {
            long_name: price.long_name,
            industry: profile.industry,
            sector: profile.sector,
            market_cap: price.market_cap.and_then(|cap| cap.raw).map(|raw| raw as u64),
            employees: profile.full_time_employees,
            city: profile.city,
            state: profile.state,
            country: profile.country,
            website: profile.website,
            commodity: None,
            currency_pair: None,
        }))
    }
}

impl QuoteSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn fetch_quote<'a>(&'a self, symbol: &'a Symbol) -> FetchFuture<'a, Quote> {
        Box::pin(self.fetch_daily_bar(symbol))
    }
}

impl InfoSource for YahooAdapter {
    fn fetch_info<'a>(&'a self, symbol: &'a Symbol) -> FetchFuture<'a, InfoRecord> {
        Box::pin(self.fetch_profile(symbol))
    }
}

/// `GET /v8/finance/chart/{symbol}?range=1d&interval=1d`: parallel
/// per-field arrays under indicators.quote, nullable per slot.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<IndicatorQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct IndicatorQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// `GET /v10/finance/quoteSummary/{symbol}?modules=assetProfile,price`.
#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<SummaryResult>>,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    #[serde(rename = "assetProfile")]
    asset_profile: Option<AssetProfile>,
    price: Option<PriceModule>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfile {
    industry: Option<String>,
    sector: Option<String>,
    #[serde(rename = "fullTimeEmployees")]
    full_time_employees: Option<u64>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    website: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceModule {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "marketCap")]
    market_cap: Option<RawNumber>,
}

/// Yahoo wraps numeric values as `{"raw": 123, "fmt": "123"}`.
#[derive(Debug, Deserialize)]
struct RawNumber {
    raw: Option<f64>,
}
