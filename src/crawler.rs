use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use log::{debug, info, warn};
use scraper::Html;
use tokio::sync::{mpsc, Semaphore};

use crate::{
    api::MojoClient,
    fs_csv_util,
    mojo::{
        parser::{movie_detail, release_group, year_index},
        schema::MovieRecord,
        year_index_url,
    },
};

/// Upper bound on in-flight page fetches across all movie branches.
const MAX_IN_FLIGHT: usize = 8;

/// Crawls the worldwide index of every given year, follows each movie's
/// two-hop link chain, and streams the extracted records into a CSV file at
/// `output`.
///
/// Branch failures (network errors, empty bodies, unrecognized intermediate
/// pages, unparseable detail pages) are logged and skipped; they never abort
/// the crawl. Surviving records arrive in no particular order.
pub async fn run_extraction(years: &[u16], output: &Path) -> anyhow::Result<PathBuf> {
    let client = MojoClient::new()?;
    let mut writer = fs_csv_util::records_writer(output)?;
    let semaphore = Arc::new(Semaphore::new(MAX_IN_FLIGHT));
    let (tx, mut rx) = mpsc::channel::<MovieRecord>(MAX_IN_FLIGHT);

    let mut branches = 0usize;
    for &year in years {
        let hrefs = match fetch_year_index(&client, year).await {
            Ok(hrefs) => hrefs,
            Err(e) => {
                warn!("skipping year {year}: {e:#}");
                continue;
            }
        };
        info!("found {} movie links for {year}", hrefs.len());
        for href in hrefs {
            branches += 1;
            let client = client.clone();
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();
            tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                match follow_movie(&client, &href).await {
                    Ok(Some(record)) => {
                        let _ = tx.send(record).await;
                    }
                    Ok(None) => debug!("no domestic release table behind {href}"),
                    Err(e) => warn!("abandoning {href}: {e:#}"),
                }
            });
        }
    }
    drop(tx);

    let mut emitted = 0usize;
    while let Some(record) = rx.recv().await {
        writer
            .serialize(&record)
            .with_context(|| format!("while writing a record row to {output:?}"))?;
        emitted += 1;
    }
    writer.flush()?;
    info!("extracted {emitted} records out of {branches} movie links into {output:?}");
    Ok(output.to_owned())
}

async fn fetch_year_index(client: &MojoClient, year: u16) -> anyhow::Result<Vec<String>> {
    let body = client.fetch_text(&year_index_url(year)).await?;
    let html = Html::parse_document(&body);
    Ok(year_index::parse(&html))
}

/// One movie branch: index href → release-group page → detail page. `None`
/// means the intermediate page carried no recognized release table and the
/// movie yields no record.
async fn follow_movie(client: &MojoClient, href: &str) -> anyhow::Result<Option<MovieRecord>> {
    let body = client.fetch_text(href).await?;
    let detail_href = {
        let html = Html::parse_document(&body);
        release_group::parse(&html)
    };
    let Some(detail_href) = detail_href else {
        return Ok(None);
    };
    let body = client.fetch_text(&detail_href).await?;
    let record = {
        let html = Html::parse_document(&body);
        movie_detail::parse(&html)
    }
    .with_context(|| format!("while parsing detail page {detail_href}"))?;
    Ok(Some(record))
}
