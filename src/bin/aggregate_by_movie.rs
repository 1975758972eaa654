use std::path::PathBuf;

use clap::Parser;
use mojo_scraping::mojo::analysis;

#[derive(Parser)]
struct Opts {
    /// CSV produced by the extraction run.
    input: PathBuf,
    /// Where the ranked report is written.
    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let path = analysis::run_aggregation_by_movie(&opts.input, &opts.output)?;
    println!("Successfully saved the report to {:?}.", path);

    Ok(())
}
