//! The quote resolution pipeline: resolve symbol, probe the cache, walk
//! the provider chain in priority order, cache the first success, and
//! (for full-info requests) merge in descriptive metadata.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{CacheError, TtlCache};
use crate::data_source::{Fetched, InfoSource, QuoteSource};
use crate::domain::{InfoRecord, Quote, Symbol, TickerInfo};
use crate::error::ValidationError;
use crate::resolver::SymbolResolver;

/// Pipeline-fatal errors. Adapter-local problems (no data, one broken
/// source) never surface here; only chain exhaustion, structural
/// invalidity of the ticker, and cache faults do.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("ticker '{ticker}' is not a valid symbol: {cause}")]
    TickerNotFound {
        ticker: String,
        #[source]
        cause: ValidationError,
    },
    #[error("unable to fetch price data for symbol '{symbol}': all data sources unavailable")]
    DataSourceUnavailable { symbol: Symbol },
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Orchestrates symbol resolution, caching, the ordered provider chain,
/// and info enrichment.
///
/// All collaborators are injected at construction; the pipeline owns the
/// cache exclusively. `sources` is the chain in priority order: the
/// spot source first, the aggregator next, the universal fallback last.
/// A cache hit bypasses every provider; two concurrent misses for the
/// same symbol may both reach upstream, which is acceptable duplicate
/// work since sources are idempotent within the TTL window.
pub struct TickerPipeline {
    resolver: SymbolResolver,
    cache: TtlCache,
    sources: Vec<Arc<dyn QuoteSource>>,
    info_source: Arc<dyn InfoSource>,
}

impl TickerPipeline {
    pub fn new(
        resolver: SymbolResolver,
        cache: TtlCache,
        sources: Vec<Arc<dyn QuoteSource>>,
        info_source: Arc<dyn InfoSource>,
    ) -> Self {
        Self {
            resolver,
            cache,
            sources,
            info_source,
        }
    }

    /// Resolve a ticker to its current price quote.
    pub async fn get_price(&self, ticker: &str) -> Result<Quote, PipelineError> {
        let symbol = self.resolve(ticker)?;
        self.price_for_symbol(&symbol).await
    }

    /// Resolve a ticker to the merged quote-plus-profile record.
    ///
    /// Price resolution failures propagate; enrichment failures never
    /// do. A quote alone is a valid, if sparse, response.
    pub async fn get_full_info(&self, ticker: &str) -> Result<TickerInfo, PipelineError> {
        let symbol = self.resolve(ticker)?;
        let key = info_key(&symbol);

        if let Some(cached) = self.cache.get::<TickerInfo>(&key).await? {
            debug!(symbol = %symbol, "serving info from cache");
            return Ok(cached);
        }

        let quote = self.price_for_symbol(&symbol).await?;
        let record = self.info_record_for(&symbol).await;
        let merged = TickerInfo::merge(quote, record);

        self.cache.set(&key, &merged).await?;
        Ok(merged)
    }

    /// Drop every cached quote and info record.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        info!("ticker cache cleared");
    }

    /// Number of cache entries currently held.
    pub async fn cache_len(&self) -> usize {
        self.cache.len().await
    }

    fn resolve(&self, ticker: &str) -> Result<Symbol, PipelineError> {
        let symbol =
            self.resolver
                .resolve(ticker)
                .map_err(|cause| PipelineError::TickerNotFound {
                    ticker: ticker.to_owned(),
                    cause,
                })?;
        if symbol.as_str() != ticker {
            debug!(ticker, symbol = %symbol, "resolved ticker alias");
        }
        Ok(symbol)
    }

    async fn price_for_symbol(&self, symbol: &Symbol) -> Result<Quote, PipelineError> {
        let key = price_key(symbol);

        if let Some(cached) = self.cache.get::<Quote>(&key).await? {
            debug!(symbol = %symbol, "serving price from cache");
            return Ok(cached);
        }

        for source in &self.sources {
            if !source.supports(symbol) {
                debug!(source = %source.id(), symbol = %symbol, "source does not cover symbol; skipping");
                continue;
            }

            match source.fetch_quote(symbol).await {
                Ok(Fetched::Data(quote)) => {
                    info!(source = %source.id(), symbol = %symbol, price = quote.price, "price resolved");
                    self.cache.set(&key, &quote).await?;
                    return Ok(quote);
                }
                Ok(Fetched::NoData) => {
                    debug!(source = %source.id(), symbol = %symbol, "source has no data; trying next");
                }
                Err(failure) => {
                    // one broken source is never fatal; only exhaustion is
                    warn!(
                        source = %failure.provider,
                        symbol = %symbol,
                        operation = failure.operation,
                        cause = %failure.cause,
                        "source failed; trying next"
                    );
                }
            }
        }

        Err(PipelineError::DataSourceUnavailable {
            symbol: symbol.clone(),
        })
    }

    async fn info_record_for(&self, symbol: &Symbol) -> InfoRecord {
        if symbol.is_gold_spot() {
            return InfoRecord::gold_spot();
        }

        match self.info_source.fetch_info(symbol).await {
            Ok(Fetched::Data(record)) => record,
            Ok(Fetched::NoData) => {
                debug!(symbol = %symbol, "no descriptive data; using minimal record");
                InfoRecord::minimal(symbol)
            }
            Err(failure) => {
                warn!(
                    source = %failure.provider,
                    symbol = %symbol,
                    cause = %failure.cause,
                    "info enrichment failed; using minimal record"
                );
                InfoRecord::minimal(symbol)
            }
        }
    }
}

fn price_key(symbol: &Symbol) -> String {
    format!("price:{symbol}")
}

fn info_key(symbol: &Symbol) -> String {
    format!("info:{symbol}")
}
