//! Reads bid exports (comma separated, one header row) into a catalog.

use anyhow::Context;
use bidtree::{Bid, Catalog};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Zero-based column positions of the fields we keep.
///
/// Defaults match the monthly eBid sales export:
/// `ArticleTitle, ArticleID, Department, CloseDate, WinningBid, ..., Fund`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BidColumns {
    pub title: usize,
    pub id: usize,
    pub amount: usize,
    pub fund: usize,
}

impl Default for BidColumns {
    fn default() -> Self {
        Self {
            title: 0,
            id: 1,
            amount: 4,
            fund: 8,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LoaderOptions {
    pub columns: BidColumns,
    /// Stripped from amounts before parsing, e.g. `$`
    pub currency: char,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            columns: BidColumns::default(),
            currency: '$',
        }
    }
}

/// Why a single row was skipped.
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("row has {found} columns, need at least {needed}")]
    TooShort { found: usize, needed: usize },
    #[error("unparsable amount {0:?}")]
    BadAmount(String),
}

/// Rows that made it through parsing plus a count of those that did not.
#[derive(Debug, Default)]
pub struct ParsedBids {
    pub bids: Vec<Bid>,
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct LoadSummary {
    pub read: usize,
    pub loaded: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

/// Strips the currency marker and thousands separators, then parses.
pub fn parse_amount(raw: &str, currency: char) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|&c| c != currency && c != ',')
        .collect();
    cleaned.trim().parse().ok()
}

fn bid_from_record(record: &csv::StringRecord, opts: &LoaderOptions) -> Result<Bid, RowError> {
    let cols = opts.columns;
    let needed = 1 + cols.title.max(cols.id).max(cols.amount).max(cols.fund);
    if record.len() < needed {
        return Err(RowError::TooShort {
            found: record.len(),
            needed,
        });
    }

    let raw_amount = &record[cols.amount];
    let amount = parse_amount(raw_amount, opts.currency)
        .ok_or_else(|| RowError::BadAmount(raw_amount.to_string()))?;

    Ok(Bid::new(
        record[cols.id].trim(),
        &record[cols.title],
        &record[cols.fund],
        amount,
    ))
}

/// Parses every data row, skipping (and logging) rows that don't fit.
pub fn parse_bids<R: Read>(reader: R, opts: &LoaderOptions) -> anyhow::Result<ParsedBids> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header = rdr.headers().context("reading header row")?;
    debug!(columns = ?header.iter().collect::<Vec<_>>(), "bid file header");

    let mut parsed = ParsedBids::default();
    for (idx, record) in rdr.records().enumerate() {
        // header is line 1
        let line = idx + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable row");
                parsed.skipped += 1;
                continue;
            }
        };
        match bid_from_record(&record, opts) {
            Ok(bid) => parsed.bids.push(bid),
            Err(e) => {
                warn!(line, error = %e, "skipping row");
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}

/// Parses `reader` and inserts the rows into `catalog`.
///
/// Rows the catalog refuses (duplicate ids, negative amounts) are logged
/// and counted as skipped.
pub fn load_into<R: Read>(
    reader: R,
    opts: &LoaderOptions,
    catalog: &mut Catalog,
) -> anyhow::Result<LoadSummary> {
    let start = Instant::now();
    let parsed = parse_bids(reader, opts)?;
    let read = parsed.bids.len() + parsed.skipped;

    let report = catalog.insert_all(parsed.bids);
    for err in &report.rejected {
        warn!(error = %err, "bid rejected");
    }

    Ok(LoadSummary {
        read,
        loaded: report.accepted,
        skipped: parsed.skipped + report.rejected.len(),
        elapsed: start.elapsed(),
    })
}

pub fn load_file(path: &Path, opts: &LoaderOptions, catalog: &mut Catalog) -> anyhow::Result<LoadSummary> {
    info!(path = %path.display(), "loading bids");
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let summary = load_into(file, opts, catalog)?;
    info!(
        loaded = summary.loaded,
        skipped = summary.skipped,
        elapsed_us = summary.elapsed.as_micros() as u64,
        "bids loaded"
    );
    Ok(summary)
}
