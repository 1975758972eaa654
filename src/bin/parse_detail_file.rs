use std::path::PathBuf;

use clap::Parser;
use mojo_scraping::mojo::{parser::movie_detail, schema::MovieRecord};
use scraper::Html;

#[derive(Parser)]
struct Opts {
    html_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let html = Html::parse_document(&fs_err::read_to_string(&opts.html_file)?);

    let record = movie_detail::parse(&html)?;
    let serialized = serde_json::to_string_pretty(&record)?;
    println!("{serialized}");
    let deserialized: MovieRecord = serde_json::from_str(&serialized)?;
    assert_eq!(record, deserialized);

    Ok(())
}
