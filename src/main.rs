use std::path::PathBuf;

use clap::Parser;
use mojo_scraping::crawler;

#[derive(Parser)]
struct Opts {
    /// Years whose worldwide box office charts are crawled.
    #[arg(required = true)]
    years: Vec<u16>,
    /// Where the extracted records are written as CSV.
    #[arg(short, long)]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let path = crawler::run_extraction(&opts.years, &opts.output).await?;
    println!("Successfully saved extracted records to {:?}.", path);

    Ok(())
}
