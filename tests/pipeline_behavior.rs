//! Behavior-driven tests for the quote resolution pipeline.
//!
//! These verify the fallback chain ordering, the cache in front of it,
//! and the info enrichment step, all with scripted in-process sources.

use quotefall_tests::{quote, symbol, Arc, ScriptedInfoSource, ScriptedSource};

use quotefall_core::{
    Fetched, InfoRecord, PipelineError, ProviderFailure, ProviderId, QuoteSource, Symbol,
    SymbolResolver, TickerPipeline, TtlCache,
};

fn pipeline(
    sources: Vec<Arc<dyn QuoteSource>>,
    info_source: Arc<ScriptedInfoSource>,
) -> TickerPipeline {
    TickerPipeline::new(
        SymbolResolver::with_default_aliases(),
        TtlCache::with_default_ttl(),
        sources,
        info_source,
    )
}

fn spot_quote(price: f64) -> quotefall_core::Quote {
    quotefall_core::Quote::spot(symbol("XAU"), price, ProviderId::Coinbase)
        .expect("valid spot quote")
}

// =============================================================================
// Ordering and short-circuit
// =============================================================================

#[tokio::test]
async fn gold_is_served_by_the_spot_source_without_consulting_the_rest() {
    // Given: a full chain where the spot source succeeds
    let spot = Arc::new(ScriptedSource::gold_only(
        ProviderId::Coinbase,
        Ok(Fetched::Data(spot_quote(2031.50))),
    ));
    let aggregator = Arc::new(ScriptedSource::new(
        ProviderId::Polygon,
        Ok(Fetched::Data(quote("XAU", 1.0, ProviderId::Polygon))),
    ));
    let fallback = Arc::new(ScriptedSource::new(
        ProviderId::Yahoo,
        Ok(Fetched::Data(quote("XAU", 2.0, ProviderId::Yahoo))),
    ));
    let pipeline = pipeline(
        vec![
            Arc::clone(&spot) as Arc<dyn QuoteSource>,
            Arc::clone(&aggregator) as Arc<dyn QuoteSource>,
            Arc::clone(&fallback) as Arc<dyn QuoteSource>,
        ],
        Arc::new(ScriptedInfoSource::no_data()),
    );

    // When: the "gold" alias is requested
    let resolved = pipeline.get_price("gold").await.expect("price resolves");

    // Then: the alias resolved to the canonical symbol, the spot source
    // won, and the later sources were never invoked
    assert_eq!(resolved.symbol.as_str(), "XAU");
    assert_eq!(resolved.price, 2031.50);
    assert_eq!(resolved.source, ProviderId::Coinbase);
    assert_eq!(spot.call_count(), 1);
    assert_eq!(aggregator.call_count(), 0);
    assert_eq!(fallback.call_count(), 0);
}

#[tokio::test]
async fn spot_quote_carries_the_spot_convention() {
    let spot = Arc::new(ScriptedSource::gold_only(
        ProviderId::Coinbase,
        Ok(Fetched::Data(spot_quote(2031.50))),
    ));
    let pipeline = pipeline(
        vec![Arc::clone(&spot) as Arc<dyn QuoteSource>],
        Arc::new(ScriptedInfoSource::no_data()),
    );

    let resolved = pipeline.get_price("gold").await.expect("price resolves");

    assert_eq!(resolved.open, Some(2031.50));
    assert_eq!(resolved.high, Some(2031.50));
    assert_eq!(resolved.low, Some(2031.50));
    assert_eq!(resolved.volume, Some(0));
}

#[tokio::test]
async fn equity_request_skips_the_gold_only_source_entirely() {
    let spot = Arc::new(ScriptedSource::gold_only(
        ProviderId::Coinbase,
        Ok(Fetched::Data(spot_quote(2031.50))),
    ));
    let fallback = Arc::new(ScriptedSource::new(
        ProviderId::Yahoo,
        Ok(Fetched::Data(quote("AAPL", 190.12, ProviderId::Yahoo))),
    ));
    let pipeline = pipeline(
        vec![
            Arc::clone(&spot) as Arc<dyn QuoteSource>,
            Arc::clone(&fallback) as Arc<dyn QuoteSource>,
        ],
        Arc::new(ScriptedInfoSource::no_data()),
    );

    let resolved = pipeline.get_price("AAPL").await.expect("price resolves");

    assert_eq!(resolved.source, ProviderId::Yahoo);
    assert_eq!(spot.call_count(), 0, "gold-only source must not be invoked");
}

// =============================================================================
// Fallback semantics
// =============================================================================

#[tokio::test]
async fn unconfigured_aggregator_falls_through_to_the_fallback_source() {
    // Given: no aggregator credential (NoData) and a fallback with data
    let aggregator = Arc::new(ScriptedSource::new(ProviderId::Polygon, Ok(Fetched::NoData)));
    let fallback = Arc::new(ScriptedSource::new(
        ProviderId::Yahoo,
        Ok(Fetched::Data(
            quote("AAPL", 190.12, ProviderId::Yahoo).with_volume(52_000_000),
        )),
    ));
    let pipeline = pipeline(
        vec![
            Arc::clone(&aggregator) as Arc<dyn QuoteSource>,
            Arc::clone(&fallback) as Arc<dyn QuoteSource>,
        ],
        Arc::new(ScriptedInfoSource::no_data()),
    );

    let resolved = pipeline.get_price("AAPL").await.expect("price resolves");

    assert_eq!(resolved.price, 190.12);
    assert_eq!(resolved.volume, Some(52_000_000));
    assert_eq!(resolved.source, ProviderId::Yahoo);
}

#[tokio::test]
async fn a_broken_source_is_logged_and_skipped_not_fatal() {
    let aggregator = Arc::new(ScriptedSource::new(
        ProviderId::Polygon,
        Err(ProviderFailure::new(
            ProviderId::Polygon,
            "prev-close",
            "request timeout",
        )),
    ));
    let fallback = Arc::new(ScriptedSource::new(
        ProviderId::Yahoo,
        Ok(Fetched::Data(quote("AAPL", 190.12, ProviderId::Yahoo))),
    ));
    let pipeline = pipeline(
        vec![
            Arc::clone(&aggregator) as Arc<dyn QuoteSource>,
            Arc::clone(&fallback) as Arc<dyn QuoteSource>,
        ],
        Arc::new(ScriptedInfoSource::no_data()),
    );

    let resolved = pipeline.get_price("AAPL").await.expect("price resolves");
    assert_eq!(resolved.source, ProviderId::Yahoo);
}

#[tokio::test]
async fn exhausted_chain_fails_and_writes_nothing_to_the_cache() {
    let aggregator = Arc::new(ScriptedSource::new(ProviderId::Polygon, Ok(Fetched::NoData)));
    let fallback = Arc::new(ScriptedSource::new(
        ProviderId::Yahoo,
        Err(ProviderFailure::new(
            ProviderId::Yahoo,
            "chart",
            "connection failed",
        )),
    ));
    let pipeline = pipeline(
        vec![
            Arc::clone(&aggregator) as Arc<dyn QuoteSource>,
            Arc::clone(&fallback) as Arc<dyn QuoteSource>,
        ],
        Arc::new(ScriptedInfoSource::no_data()),
    );

    let error = pipeline.get_price("AAPL").await.expect_err("must fail");

    assert!(matches!(
        error,
        PipelineError::DataSourceUnavailable { ref symbol } if symbol.as_str() == "AAPL"
    ));
    assert_eq!(pipeline.cache_len().await, 0, "failure must not be cached");
}

#[tokio::test]
async fn the_failure_message_names_the_symbol() {
    let pipeline = pipeline(
        vec![Arc::new(ScriptedSource::new(
            ProviderId::Yahoo,
            Ok(Fetched::NoData),
        ))],
        Arc::new(ScriptedInfoSource::no_data()),
    );

    let error = pipeline.get_price("MSFT").await.expect_err("must fail");
    assert!(error.to_string().contains("MSFT"));
}

#[tokio::test]
async fn structurally_invalid_ticker_fails_before_any_source_call() {
    let fallback = Arc::new(ScriptedSource::new(
        ProviderId::Yahoo,
        Ok(Fetched::Data(quote("AAPL", 190.12, ProviderId::Yahoo))),
    ));
    let pipeline = pipeline(
        vec![Arc::clone(&fallback) as Arc<dyn QuoteSource>],
        Arc::new(ScriptedInfoSource::no_data()),
    );

    let error = pipeline.get_price("!!!").await.expect_err("must fail");

    assert!(matches!(error, PipelineError::TickerNotFound { .. }));
    assert_eq!(fallback.call_count(), 0);
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn repeated_request_is_served_from_cache_with_identical_content() {
    let fallback = Arc::new(ScriptedSource::new(
        ProviderId::Yahoo,
        Ok(Fetched::Data(quote("AAPL", 190.12, ProviderId::Yahoo))),
    ));
    let pipeline = pipeline(
        vec![Arc::clone(&fallback) as Arc<dyn QuoteSource>],
        Arc::new(ScriptedInfoSource::no_data()),
    );

    let first = pipeline.get_price("AAPL").await.expect("price resolves");
    let second = pipeline.get_price("AAPL").await.expect("price resolves");

    assert_eq!(first, second);
    assert_eq!(fallback.call_count(), 1, "second call must hit the cache");
}

#[tokio::test]
async fn clear_cache_forces_a_fresh_source_round() {
    let fallback = Arc::new(ScriptedSource::new(
        ProviderId::Yahoo,
        Ok(Fetched::Data(quote("AAPL", 190.12, ProviderId::Yahoo))),
    ));
    let pipeline = pipeline(
        vec![Arc::clone(&fallback) as Arc<dyn QuoteSource>],
        Arc::new(ScriptedInfoSource::no_data()),
    );

    pipeline.get_price("AAPL").await.expect("price resolves");
    pipeline.clear_cache().await;
    assert_eq!(pipeline.cache_len().await, 0);

    pipeline.get_price("AAPL").await.expect("price resolves");
    assert_eq!(fallback.call_count(), 2, "cleared cache must not serve hits");
}

// =============================================================================
// Info enrichment
// =============================================================================

#[tokio::test]
async fn merged_record_always_carries_current_price_equal_to_price() {
    let fallback = Arc::new(ScriptedSource::new(
        ProviderId::Yahoo,
        Ok(Fetched::Data(quote("AAPL", 190.12, ProviderId::Yahoo))),
    ));
    let info_source = Arc::new(ScriptedInfoSource::new(Ok(Fetched::Data(InfoRecord {
        long_name: Some(String::from("Apple Inc.")),
        industry: Some(String::from("Consumer Electronics")),
        sector: Some(String::from("Technology")),
        ..InfoRecord::default()
    }))));
    let pipeline = pipeline(
        vec![Arc::clone(&fallback) as Arc<dyn QuoteSource>],
        Arc::clone(&info_source),
    );

    let record = pipeline.get_full_info("AAPL").await.expect("info resolves");

    assert_eq!(record.current_price, record.price);
    assert_eq!(record.price, 190.12);
    assert_eq!(record.info.long_name.as_deref(), Some("Apple Inc."));
    assert_eq!(record.source, ProviderId::Yahoo);
}

#[tokio::test]
async fn info_request_reuses_the_cached_quote() {
    let fallback = Arc::new(ScriptedSource::new(
        ProviderId::Yahoo,
        Ok(Fetched::Data(quote("AAPL", 190.12, ProviderId::Yahoo))),
    ));
    let info_source = Arc::new(ScriptedInfoSource::no_data());
    let pipeline = pipeline(
        vec![Arc::clone(&fallback) as Arc<dyn QuoteSource>],
        Arc::clone(&info_source),
    );

    pipeline.get_price("AAPL").await.expect("price resolves");
    pipeline.get_full_info("AAPL").await.expect("info resolves");

    assert_eq!(
        fallback.call_count(),
        1,
        "info must reuse the quote cached by the price request"
    );
}

#[tokio::test]
async fn repeated_info_request_is_served_from_cache() {
    let fallback = Arc::new(ScriptedSource::new(
        ProviderId::Yahoo,
        Ok(Fetched::Data(quote("AAPL", 190.12, ProviderId::Yahoo))),
    ));
    let info_source = Arc::new(ScriptedInfoSource::no_data());
    let pipeline = pipeline(
        vec![Arc::clone(&fallback) as Arc<dyn QuoteSource>],
        Arc::clone(&info_source),
    );

    let first = pipeline.get_full_info("AAPL").await.expect("info resolves");
    let second = pipeline.get_full_info("AAPL").await.expect("info resolves");

    assert_eq!(first, second);
    assert_eq!(info_source.call_count(), 1);
}

#[tokio::test]
async fn gold_info_is_built_locally_without_an_info_fetch() {
    let spot = Arc::new(ScriptedSource::gold_only(
        ProviderId::Coinbase,
        Ok(Fetched::Data(spot_quote(2031.50))),
    ));
    let info_source = Arc::new(ScriptedInfoSource::no_data());
    let pipeline = pipeline(
        vec![Arc::clone(&spot) as Arc<dyn QuoteSource>],
        Arc::clone(&info_source),
    );

    let record = pipeline.get_full_info("gold").await.expect("info resolves");

    assert_eq!(record.info.commodity.as_deref(), Some("gold"));
    assert_eq!(record.info.currency_pair.as_deref(), Some("XAU/USD"));
    assert_eq!(record.info.sector.as_deref(), Some("Commodities"));
    assert_eq!(info_source.call_count(), 0);
}

#[tokio::test]
async fn enrichment_failure_degrades_to_the_minimal_record() {
    let fallback = Arc::new(ScriptedSource::new(
        ProviderId::Yahoo,
        Ok(Fetched::Data(quote("AAPL", 190.12, ProviderId::Yahoo))),
    ));
    let info_source = Arc::new(ScriptedInfoSource::new(Err(ProviderFailure::new(
        ProviderId::Yahoo,
        "quote-summary",
        "request timeout",
    ))));
    let pipeline = pipeline(
        vec![Arc::clone(&fallback) as Arc<dyn QuoteSource>],
        Arc::clone(&info_source),
    );

    let record = pipeline.get_full_info("AAPL").await.expect("info resolves");

    assert_eq!(record.info.long_name.as_deref(), Some("AAPL Stock"));
    assert_eq!(record.info.industry, None);
    assert_eq!(record.current_price, 190.12);
}

#[tokio::test]
async fn info_fails_when_price_resolution_fails() {
    let pipeline = pipeline(
        vec![Arc::new(ScriptedSource::new(
            ProviderId::Yahoo,
            Ok(Fetched::NoData),
        ))],
        Arc::new(ScriptedInfoSource::no_data()),
    );

    let error = pipeline.get_full_info("AAPL").await.expect_err("must fail");
    assert!(matches!(error, PipelineError::DataSourceUnavailable { .. }));
}

// =============================================================================
// Symbol resolution
// =============================================================================

#[tokio::test]
async fn resolver_identity_holds_for_unmapped_symbols() {
    let resolver = SymbolResolver::with_default_aliases();

    for raw in ["AAPL", "MSFT", "BRK.B", "GC=F"] {
        let resolved: Symbol = resolver.resolve(raw).expect("ticker should parse");
        assert_eq!(resolved.as_str(), raw);
    }
}
