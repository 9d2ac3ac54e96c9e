use quotefall_core::TickerPipeline;

use crate::cli::PriceArgs;
use crate::error::CliError;
use crate::output;

pub async fn run(args: &PriceArgs, pipeline: &TickerPipeline, pretty: bool) -> Result<(), CliError> {
    let quote = pipeline.get_price(&args.ticker).await?;

    if args.plain {
        println!("{}", quote.price);
        return Ok(());
    }

    output::render(&quote, pretty)
}
