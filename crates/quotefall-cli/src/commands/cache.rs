use quotefall_core::TickerPipeline;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::cli::{CacheArgs, CacheCommand};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct CacheClearResponse {
    message: &'static str,
    cleared: bool,
    timestamp: String,
}

pub async fn run(args: &CacheArgs, pipeline: &TickerPipeline, pretty: bool) -> Result<(), CliError> {
    match args.command {
        CacheCommand::Clear => {
            pipeline.clear_cache().await;

            let response = CacheClearResponse {
                message: "cache cleared",
                cleared: true,
                timestamp: OffsetDateTime::now_utc()
                    .format(&Rfc3339)
                    .unwrap_or_else(|_| String::from("<unformattable>")),
            };
            output::render(&response, pretty)
        }
    }
}
