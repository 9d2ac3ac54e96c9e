use quotefall_core::TickerPipeline;

use crate::cli::InfoArgs;
use crate::error::CliError;
use crate::output;

pub async fn run(args: &InfoArgs, pipeline: &TickerPipeline, pretty: bool) -> Result<(), CliError> {
    let record = pipeline.get_full_info(&args.ticker).await?;
    output::render(&record, pretty)
}
