use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{FetchFuture, Fetched, ProviderFailure, QuoteSource, SourceResult};
use crate::domain::{Quote, Symbol};
use crate::http_client::{HttpClient, HttpRequest};
use crate::source::ProviderId;

const EXCHANGE_RATES_URL: &str = "https://api.coinbase.com/v2/exchange-rates";

/// Spot-price adapter for the gold instrument.
///
/// Coinbase publishes XAU/USD as an exchange rate; the feed has no OHLC
/// or volume, so successful quotes carry the spot convention. Any other
/// symbol is rejected before the network is touched.
pub struct CoinbaseAdapter {
    http: Arc<dyn HttpClient>,
}

impl CoinbaseAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch_spot(&self, symbol: &Symbol) -> SourceResult<Quote> {
        let request =
            HttpRequest::get(EXCHANGE_RATES_URL).with_query("currency", symbol.as_str());

        let response = self.http.execute(request).await.map_err(|error| {
            ProviderFailure::new(ProviderId::Coinbase, "exchange-rates", error.to_string())
        })?;

        if !response.is_success() {
            tracing::debug!(status = response.status, "coinbase returned non-success status");
            return Ok(Fetched::NoData);
        }

        let payload: ExchangeRatesResponse =
            serde_json::from_str(&response.body).map_err(|error| {
                ProviderFailure::new(
                    ProviderId::Coinbase,
                    "parse exchange-rates",
                    error.to_string(),
                )
            })?;

        let Some(rate) = payload.data.rates.get("USD") else {
            tracing::debug!(symbol = %symbol, "no USD rate in coinbase response");
            return Ok(Fetched::NoData);
        };

        let price: f64 = rate.parse().map_err(|_| {
            ProviderFailure::new(
                ProviderId::Coinbase,
                "parse exchange-rates",
                format!("USD rate '{rate}' is not a number"),
            )
        })?;

        let quote = Quote::spot(symbol.clone(), price, ProviderId::Coinbase).map_err(|error| {
            ProviderFailure::new(ProviderId::Coinbase, "normalize quote", error.to_string())
        })?;

        Ok(Fetched::Data(quote))
    }
}

impl QuoteSource for CoinbaseAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Coinbase
    }

    fn supports(&self, symbol: &Symbol) -> bool {
        symbol.is_gold_spot()
    }

    fn fetch_quote<'a>(&'a self, symbol: &'a Symbol) -> FetchFuture<'a, Quote> {
        Box::pin(async move {
            if !self.supports(symbol) {
                return Ok(Fetched::NoData);
            }
            self.fetch_spot(symbol).await
        })
    }
}

/// `GET /v2/exchange-rates?currency=XAU`: rates come back as a map of
/// currency code to decimal string.
#[derive(Debug, Deserialize)]
struct ExchangeRatesResponse {
    data: ExchangeRatesData,
}

#[derive(Debug, Deserialize)]
struct ExchangeRatesData {
    #[serde(default)]
    rates: HashMap<String, String>,
}
