use std::path::PathBuf;

use clap::Parser;
use mojo_scraping::mojo::analysis::{self, Category};

#[derive(Parser)]
struct Opts {
    /// CSV produced by the extraction run.
    input: PathBuf,
    /// Which column the records are grouped by.
    #[arg(value_enum)]
    category: Category,
    /// Where the ranked report is written.
    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let path = analysis::run_aggregation_by_category(&opts.input, opts.category, &opts.output)?;
    println!("Successfully saved the report to {:?}.", path);

    Ok(())
}
