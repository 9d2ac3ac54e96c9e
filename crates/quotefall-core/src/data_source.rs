//! Adapter contracts for external market-data sources.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::domain::{InfoRecord, Quote, Symbol};
use crate::source::ProviderId;

/// Successful adapter outcome: either a payload, or an explicit "this
/// source currently has nothing for this symbol".
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Data(T),
    NoData,
}

impl<T> Fetched<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Data(value) => Some(value),
            Self::NoData => None,
        }
    }
}

/// Transport or parsing failure inside one adapter.
///
/// Distinct from [`Fetched::NoData`]: both advance the fallback chain,
/// but a failure names the provider, the operation, and the cause so it
/// can be logged; "source had nothing" and "source broke" must never be
/// conflated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{provider} {operation} failed: {cause}")]
pub struct ProviderFailure {
    pub provider: ProviderId,
    pub operation: &'static str,
    pub cause: String,
}

impl ProviderFailure {
    pub fn new(provider: ProviderId, operation: &'static str, cause: impl Into<String>) -> Self {
        Self {
            provider,
            operation,
            cause: cause.into(),
        }
    }
}

/// Three-way outcome of every provider call: data, no data, or failure.
pub type SourceResult<T> = Result<Fetched<T>, ProviderFailure>;

pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = SourceResult<T>> + Send + 'a>>;

/// A price source in the fallback chain.
///
/// Sources are stateless with respect to quotes and idempotent for a
/// given symbol within the cache TTL window; each is invoked at most
/// once per pipeline pass.
pub trait QuoteSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Whether this source covers the symbol at all. Single-instrument
    /// sources short-circuit here instead of burning a network call.
    fn supports(&self, symbol: &Symbol) -> bool {
        let _ = symbol;
        true
    }

    fn fetch_quote<'a>(&'a self, symbol: &'a Symbol) -> FetchFuture<'a, Quote>;
}

/// Secondary capability of the fallback source: descriptive metadata for
/// the enrichment step, independent of the price-fetch path.
pub trait InfoSource: Send + Sync {
    fn fetch_info<'a>(&'a self, symbol: &'a Symbol) -> FetchFuture<'a, InfoRecord>;
}
