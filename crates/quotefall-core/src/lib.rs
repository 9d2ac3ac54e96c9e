//! Core contracts for quotefall.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The symbol resolver and alias table
//! - The TTL cache that fronts the provider chain
//! - Provider adapters over a pluggable HTTP transport
//! - The quote resolution pipeline and info enrichment

pub mod adapters;
pub mod cache;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod pipeline;
pub mod resolver;
pub mod source;

pub use adapters::{CoinbaseAdapter, PolygonAdapter, YahooAdapter};
pub use cache::{CacheError, TtlCache};
pub use data_source::{Fetched, InfoSource, ProviderFailure, QuoteSource, SourceResult};
pub use domain::{InfoRecord, Quote, Symbol, TickerInfo};
pub use error::ValidationError;
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};
pub use pipeline::{PipelineError, TickerPipeline};
pub use resolver::SymbolResolver;
pub use source::ProviderId;
