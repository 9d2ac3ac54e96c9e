mod cache;
mod info;
mod price;

use std::sync::Arc;

use quotefall_core::{
    CoinbaseAdapter, HttpClient, PolygonAdapter, QuoteSource, ReqwestHttpClient, SymbolResolver,
    TickerPipeline, TtlCache, YahooAdapter,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let pipeline = build_pipeline();

    match &cli.command {
        Command::Price(args) => price::run(args, &pipeline, cli.pretty).await,
        Command::Info(args) => info::run(args, &pipeline, cli.pretty).await,
        Command::Cache(args) => cache::run(args, &pipeline, cli.pretty).await,
    }
}

/// Composition root: concrete transport and adapters are chosen here;
/// the pipeline itself only sees the traits. Chain priority order is
/// spot, aggregator, universal fallback.
fn build_pipeline() -> TickerPipeline {
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

    let yahoo = Arc::new(YahooAdapter::new(Arc::clone(&http)));
    let sources: Vec<Arc<dyn QuoteSource>> = vec![
        Arc::new(CoinbaseAdapter::new(Arc::clone(&http))),
        Arc::new(PolygonAdapter::from_env(Arc::clone(&http))),
        Arc::clone(&yahoo) as Arc<dyn QuoteSource>,
    ];

    TickerPipeline::new(
        SymbolResolver::with_default_aliases(),
        TtlCache::with_default_ttl(),
        sources,
        yahoo,
    )
}
