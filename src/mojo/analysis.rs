use std::{
    cmp::Reverse,
    path::{Path, PathBuf},
};

use anyhow::Context;
use indexmap::IndexMap;
use itertools::Itertools;
use log::info;
use ordered_float::OrderedFloat;
use thiserror::Error;

use crate::{
    fs_csv_util,
    mojo::{
        normalize,
        schema::{MovieRecord, RawMoney},
    },
};

const TOP_N: usize = 10;
const SECTION_DIVIDER: &str = "--------------------";

/// Grouping dimension of the categorical reports.
#[derive(Clone, Copy, PartialEq, Eq, Debug, clap::ValueEnum)]
pub enum Category {
    Rating,
    Distributor,
}

/// A record's gross column failed currency normalization. Rankings need
/// consistent numbers, so this aborts the whole aggregation run.
#[derive(Debug, Error)]
#[error("record #{row} ({title}): {column} value {value:?} is not numeric")]
pub struct DataError {
    row: usize,
    title: String,
    column: &'static str,
    value: String,
}

/// Gross figures of one record after currency normalization.
#[derive(Clone, Copy, Debug)]
struct MoneyFigures {
    domestic: f64,
    international: f64,
    worldwide: f64,
}

/// One bucket of the categorical aggregation.
#[derive(Clone, PartialEq, Debug)]
pub struct AggregateBucket {
    pub key: String,
    pub mean_earnings: f64,
    pub total_earnings: f64,
    pub movie_count: usize,
}

/// Reads the extraction CSV at `input` and writes the three ranked bucket
/// sections for `category` as a text report at `output`.
pub fn run_aggregation_by_category(
    input: &Path,
    category: Category,
    output: &Path,
) -> anyhow::Result<PathBuf> {
    let records = fs_csv_util::read_records(input)?;
    let figures = normalize_money(&records)?;
    let buckets = bucketize(&records, &figures, category);
    info!(
        "grouped {} records into {} {category:?} buckets",
        records.len(),
        buckets.len()
    );
    let sections = category_sections(category, &buckets)?;
    write_report(output, &sections)
}

/// Reads the extraction CSV at `input` and writes the three ungrouped
/// top-10 record sections (one per gross column) at `output`.
pub fn run_aggregation_by_movie(input: &Path, output: &Path) -> anyhow::Result<PathBuf> {
    let records = fs_csv_util::read_records(input)?;
    let figures = normalize_money(&records)?;
    let sections = movie_sections(&records, &figures)?;
    write_report(output, &sections)
}

fn normalize_money(records: &[MovieRecord]) -> Result<Vec<MoneyFigures>, DataError> {
    records
        .iter()
        .enumerate()
        .map(|(row, record)| {
            let column = |name: &'static str, raw: &RawMoney| {
                normalize::normalize_currency(raw.as_str()).map_err(|_| DataError {
                    row,
                    title: record.title().to_string(),
                    column: name,
                    value: raw.as_str().to_owned(),
                })
            };
            Ok(MoneyFigures {
                domestic: column("Domestic_BO", record.domestic_bo())?,
                international: column("International_BO", record.international_bo())?,
                worldwide: column("Worldwide_BO", record.worldwide_bo())?,
            })
        })
        .collect()
}

fn bucketize(
    records: &[MovieRecord],
    figures: &[MoneyFigures],
    category: Category,
) -> Vec<AggregateBucket> {
    let mut groups = IndexMap::<String, Vec<f64>>::new();
    let mut skipped = 0usize;
    for (record, figures) in records.iter().zip_eq(figures) {
        let key = match category {
            Category::Rating => {
                normalize::default_rating(record.mpaa_rating().as_deref()).to_owned()
            }
            Category::Distributor => match record.distributor() {
                Some(distributor) => distributor.clone(),
                None => {
                    skipped += 1;
                    continue;
                }
            },
        };
        groups.entry(key).or_default().push(figures.worldwide);
    }
    if skipped > 0 {
        info!("{skipped} records without a distributor were left out of the grouping");
    }
    groups
        .into_iter()
        .map(|(key, worldwide)| {
            let total: f64 = worldwide.iter().sum();
            AggregateBucket {
                key,
                mean_earnings: round1(total / worldwide.len() as f64),
                total_earnings: total,
                movie_count: worldwide.len(),
            }
        })
        .collect()
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Buckets ranked descending by `key`, truncated to the top ten. The sort is
/// stable, so ties keep their first-seen order.
fn top_by<K: Ord>(
    buckets: &[AggregateBucket],
    key: impl Fn(&AggregateBucket) -> K,
) -> Vec<&AggregateBucket> {
    let mut ranked = buckets.iter().collect_vec();
    ranked.sort_by_key(|&bucket| Reverse(key(bucket)));
    ranked.truncate(TOP_N);
    ranked
}

struct ReportSection {
    title: String,
    table: String,
}

fn category_sections(
    category: Category,
    buckets: &[AggregateBucket],
) -> anyhow::Result<Vec<ReportSection>> {
    let section = |title: &str,
                   key_column: &'static str,
                   ranked: Vec<&AggregateBucket>|
     -> anyhow::Result<ReportSection> {
        Ok(ReportSection {
            title: title.to_owned(),
            table: bucket_table(key_column, &ranked)?,
        })
    };
    match category {
        Category::Rating => Ok(vec![
            section(
                "Top 10 MPAA Ratings by Mean Earnings",
                "Mpaa_rating",
                top_by(buckets, |b| OrderedFloat(b.mean_earnings)),
            )?,
            section(
                "Top 10 MPAA Ratings by Movie Count",
                "Mpaa_rating",
                top_by(buckets, |b| b.movie_count),
            )?,
            section(
                "Top 10 MPAA Ratings by Total Earnings",
                "Mpaa_rating",
                top_by(buckets, |b| OrderedFloat(b.total_earnings)),
            )?,
        ]),
        Category::Distributor => Ok(vec![
            section(
                "Top 10 Distributors by Count",
                "Distributor",
                top_by(buckets, |b| b.movie_count),
            )?,
            section(
                "Top 10 Distributors by Average Earnings",
                "Distributor",
                top_by(buckets, |b| OrderedFloat(b.mean_earnings)),
            )?,
            section(
                "Top 10 Distributors by Total Earnings",
                "Distributor",
                top_by(buckets, |b| OrderedFloat(b.total_earnings)),
            )?,
        ]),
    }
}

fn movie_sections(
    records: &[MovieRecord],
    figures: &[MoneyFigures],
) -> anyhow::Result<Vec<ReportSection>> {
    let rows = records.iter().zip_eq(figures).collect_vec();
    let section = |title: &str, metric: fn(&MoneyFigures) -> f64| -> anyhow::Result<ReportSection> {
        let mut ranked = rows.clone();
        ranked.sort_by_key(|&(_, figures)| Reverse(OrderedFloat(metric(figures))));
        ranked.truncate(TOP_N);
        Ok(ReportSection {
            title: title.to_owned(),
            table: record_table(&ranked)?,
        })
    };
    Ok(vec![
        section("Top 10 Domestic_BO", |figures| figures.domestic)?,
        section("Top 10 International_BO", |figures| figures.international)?,
        section("Top 10 Worldwide_BO", |figures| figures.worldwide)?,
    ])
}

fn bucket_table(key_column: &str, buckets: &[&AggregateBucket]) -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record([key_column, "Mean_Earnings", "Total_Earnings", "Movie_Count"])?;
        for bucket in buckets {
            writer.write_record([
                bucket.key.as_str(),
                float_cell(bucket.mean_earnings).as_str(),
                float_cell(bucket.total_earnings).as_str(),
                bucket.movie_count.to_string().as_str(),
            ])?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8(buffer)?)
}

fn record_table(rows: &[(&MovieRecord, &MoneyFigures)]) -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        for (record, figures) in rows {
            writer.serialize(record.with_money_cells(
                RawMoney::from(float_cell(figures.domestic)),
                RawMoney::from(float_cell(figures.international)),
                RawMoney::from(float_cell(figures.worldwide)),
            ))?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8(buffer)?)
}

/// Numeric cells keep a decimal point even when integral (`400.0`).
fn float_cell(x: f64) -> String {
    format!("{x:?}")
}

fn render_report(sections: &[ReportSection]) -> String {
    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(SECTION_DIVIDER);
            out.push_str("\n\n");
        }
        out.push_str(&section.title);
        out.push_str("\n\n");
        out.push_str(&section.table);
    }
    out
}

fn write_report(output: &Path, sections: &[ReportSection]) -> anyhow::Result<PathBuf> {
    fs_err::write(output, render_report(sections))
        .with_context(|| format!("while writing the report to {output:?}"))?;
    Ok(output.to_owned())
}
