//! Output routing for the filter stage: gzip corpus and deletion-id streams
//! during the run, plain tab-delimited side files at the end of it.

use crate::accumulator::{EmojiCounts, LanguageCounts, RunAccumulator, RunStats};
use crate::classify::Disposition;
use crate::config::FilterOptions;
use crate::record::NormalizedRecord;
use crate::util::create_with_backoff;
use anyhow::{anyhow, Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

type GzWriter = GzEncoder<BufWriter<File>>;

fn create_gz(path: &Path, buf_bytes: usize) -> Result<GzWriter> {
    let f = create_with_backoff(path, 16, 50).with_context(|| format!("create {}", path.display()))?;
    Ok(GzEncoder::new(BufWriter::with_capacity(buf_bytes, f), Compression::default()))
}

fn finish_gz(w: GzWriter, path: &Path) -> Result<()> {
    let mut inner = w.finish().with_context(|| format!("finish gzip {}", path.display()))?;
    inner.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

fn create_plain(path: &Path) -> Result<BufWriter<File>> {
    let f = create_with_backoff(path, 16, 50).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(f))
}

/// Routes dispositions to the corpus / deletion streams and writes the
/// accumulated side files once the run is over.
pub struct OutputMux {
    corpus_path: PathBuf,
    corpus: GzWriter,
    deletions: Option<(PathBuf, GzWriter)>,
    stats_path: PathBuf,
    language_path: Option<PathBuf>,
    emoji_path: Option<PathBuf>,
}

impl OutputMux {
    /// Opens the streaming outputs. Corpus and stats paths are mandatory.
    pub fn create(opts: &FilterOptions) -> Result<Self> {
        let corpus_path = opts.output_file.clone().ok_or_else(|| anyhow!("output file is required"))?;
        let stats_path = opts.stats_file.clone().ok_or_else(|| anyhow!("stats file is required"))?;
        let corpus = create_gz(&corpus_path, opts.write_buffer_bytes)?;
        let deletions = match &opts.delete_ids_file {
            Some(p) => Some((p.clone(), create_gz(p, opts.write_buffer_bytes)?)),
            None => None,
        };
        Ok(Self {
            corpus_path,
            corpus,
            deletions,
            stats_path,
            language_path: opts.language_file.clone(),
            emoji_path: opts.emoji_file.clone(),
        })
    }

    /// Write whatever a disposition produces; filter outcomes produce nothing.
    pub fn route(&mut self, d: &Disposition) -> Result<()> {
        match d {
            Disposition::Keep(rec) => self.write_record(rec),
            Disposition::DeletionEvent { id: Some(id) } => self.write_deleted_id(id),
            _ => Ok(()),
        }
    }

    pub fn write_record(&mut self, rec: &NormalizedRecord) -> Result<()> {
        rec.write_tsv(&mut self.corpus)
            .with_context(|| format!("write {}", self.corpus_path.display()))
    }

    pub fn write_deleted_id(&mut self, id: &str) -> Result<()> {
        if let Some((path, w)) = &mut self.deletions {
            writeln!(w, "{id}").with_context(|| format!("write {}", path.display()))?;
        }
        Ok(())
    }

    /// Close the gzip streams and write the requested side files.
    pub fn finish(self, acc: &RunAccumulator) -> Result<()> {
        finish_gz(self.corpus, &self.corpus_path)?;
        if let Some((path, w)) = self.deletions {
            finish_gz(w, &path)?;
        }
        if let (Some(path), Some(langs)) = (&self.language_path, acc.languages()) {
            write_language_counts(path, langs)?;
        }
        if let (Some(path), Some(emoji)) = (&self.emoji_path, acc.emoji()) {
            write_emoji_counts(path, emoji)?;
        }
        write_stats(&self.stats_path, acc.stats())
    }
}

/// `name\tvalue` per stat.
pub fn write_stats(path: &Path, stats: &RunStats) -> Result<()> {
    let mut w = create_plain(path)?;
    for (name, value) in stats.entries() {
        writeln!(w, "{name}\t{value}")?;
    }
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// `lang\tcount`, most common first.
pub fn write_language_counts(path: &Path, langs: &LanguageCounts) -> Result<()> {
    let mut w = create_plain(path)?;
    for (lang, count) in langs.most_common() {
        writeln!(w, "{lang}\t{count}")?;
    }
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// `lang\temoji\tcount`
pub fn write_emoji_counts(path: &Path, emoji: &EmojiCounts) -> Result<()> {
    let mut w = create_plain(path)?;
    for (lang, e, count) in emoji.rows() {
        writeln!(w, "{lang}\t{e}\t{count}")?;
    }
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
