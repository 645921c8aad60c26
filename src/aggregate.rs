//! Emoji count reduction: read many per-run `lang\temoji\tcount` files in
//! parallel, tag every row with the date encoded in its file name, and sum
//! counts per `(lang, emoji, date)`.

use crate::concurrency::map_bounded;
use crate::config::AggregateOptions;
use crate::progress::make_count_progress;
use crate::util::{create_with_backoff, init_tracing_once, open_with_backoff};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One reduced (or pre-reduction) count row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    pub lang: String,
    pub emoji: String,
    pub date: String,
    pub count: u64,
}

#[derive(Debug)]
pub enum AggregateError {
    NoInputs,
    FilenameFormat { path: PathBuf },
    Row { path: PathBuf, line: u64, reason: String },
}

impl std::fmt::Display for AggregateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoInputs => write!(f, "no input files given"),
            Self::FilenameFormat { path } => write!(
                f,
                "cannot derive a date from {}: expected <prefix>_<YYYY>_<MM>_<DD>[_...]",
                path.display()
            ),
            Self::Row { path, line, reason } => write!(f, "{}:{}: {}", path.display(), line, reason),
        }
    }
}

impl std::error::Error for AggregateError {}

/// Date for every row of a count file: segments 2..=4 of the underscore-split
/// base name, joined with `-`. An extension glued to the day segment is
/// dropped, so `emoji_2020_01_05.tsv` and `tweets.en_2020_01_05_part1.tsv`
/// both give `2020-01-05`.
pub fn date_from_filename(path: &Path) -> Result<String, AggregateError> {
    let bad = || AggregateError::FilenameFormat { path: path.to_path_buf() };
    let name = path.file_name().and_then(|s| s.to_str()).ok_or_else(bad)?;
    let chunks: Vec<&str> = name.split('_').collect();
    if chunks.len() < 4 {
        return Err(bad());
    }
    let day = chunks[3].split('.').next().unwrap_or_default();
    let parts = [chunks[1], chunks[2], day];
    if parts.iter().any(|c| c.is_empty()) {
        return Err(bad());
    }
    Ok(parts.join("-"))
}

/// Read one count file and tag its rows with `date`.
pub fn read_count_file(path: &Path, date: &str) -> Result<Vec<CountRow>> {
    let f = open_with_backoff(path, 16, 50).with_context(|| format!("open {}", path.display()))?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .from_reader(f);

    let mut rows = Vec::new();
    for (i, rec) in rdr.deserialize::<(String, String, u64)>().enumerate() {
        let (lang, emoji, count) = rec.map_err(|e| AggregateError::Row {
            path: path.to_path_buf(),
            line: e.position().map(|p| p.line()).unwrap_or(i as u64 + 1),
            reason: e.to_string(),
        })?;
        rows.push(CountRow { lang, emoji, date: date.to_string(), count });
    }
    Ok(rows)
}

/// Sum counts per `(lang, emoji, date)`. Output is sorted by that key.
pub fn reduce_rows<I: IntoIterator<Item = CountRow>>(rows: I) -> Vec<CountRow> {
    let mut total = BTreeMap::<(String, String, String), u64>::new();
    for r in rows {
        *total.entry((r.lang, r.emoji, r.date)).or_insert(0) += r.count;
    }
    total
        .into_iter()
        .map(|((lang, emoji, date), count)| CountRow { lang, emoji, date, count })
        .collect()
}

/// Read `paths` with a bounded worker pool, then reduce single-threaded.
///
/// Fails before reading anything if `paths` is empty or any file name does
/// not encode a date.
pub fn aggregate_count_files(paths: &[PathBuf], opts: &AggregateOptions) -> Result<Vec<CountRow>> {
    init_tracing_once();
    if paths.is_empty() {
        return Err(AggregateError::NoInputs.into());
    }
    let jobs: Vec<(PathBuf, String)> = paths
        .iter()
        .map(|p| date_from_filename(p).map(|d| (p.clone(), d)))
        .collect::<Result<_, _>>()?;

    tracing::info!("Doing {} files with {} workers", jobs.len(), opts.workers);
    let pb = if opts.progress { Some(make_count_progress(jobs.len() as u64, "Emoji count files")) } else { None };

    let per_file = map_bounded(&jobs, opts.workers, |(path, date)| {
        let rows = read_count_file(path, date)?;
        if let Some(pb) = &pb { pb.inc(1); }
        tracing::debug!("{}: {} rows", path.display(), rows.len());
        Ok(rows)
    })?;
    if let Some(pb) = &pb { pb.finish_with_message("read done"); }

    let reduced = reduce_rows(per_file.into_iter().flatten());
    tracing::info!("Reduced to {} (lang, emoji, date) rows", reduced.len());
    Ok(reduced)
}

/// CSV with header `lang,emoji,date,count`.
pub fn write_counts_csv(path: &Path, rows: &[CountRow]) -> Result<()> {
    let f = create_with_backoff(path, 16, 50).with_context(|| format!("create {}", path.display()))?;
    let mut w = csv::Writer::from_writer(f);
    for r in rows {
        w.serialize(r)?;
    }
    if rows.is_empty() {
        w.write_record(["lang", "emoji", "date", "count"])?;
    }
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
