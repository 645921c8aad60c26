use crate::accumulator::{RunAccumulator, RunStats};
use crate::classify::{classify_line, ClassifyError, ClassifyOptions};
use crate::config::FilterOptions;
use crate::emoji::{EmojiExtractor, UnicodeEmoji};
use crate::gzip_jsonl::{for_each_line_with_progress, LineError};
use crate::output::OutputMux;
use crate::progress::{make_progress_bar_labeled, total_compressed_size};
use crate::util::init_tracing_once;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Clone, Default)]
pub struct TweetETL {
    pub(crate) opts: FilterOptions,
}

/// Result of streaming one input file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileOutcome {
    /// File read to the end; `delta` is what it added to the run counters.
    Ok { path: PathBuf, lines: u64, delta: RunStats },
    /// File could not be opened or decoded. Lines handled before the failure
    /// stay in the outputs and counters.
    Failed { path: PathBuf, error: String },
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
    pub fn path(&self) -> &Path {
        match self {
            Self::Ok { path, .. } | Self::Failed { path, .. } => path,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunSummary {
    pub stats: RunStats,
    pub files: Vec<FileOutcome>,
}

impl RunSummary {
    pub fn failed_files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| !f.is_ok())
    }
}

/// Per-file error split: `Read` isolates to the file, `Fatal` aborts the run.
enum FileError {
    Read(anyhow::Error),
    Fatal(anyhow::Error),
}

impl TweetETL {
    pub fn new() -> Self {
        Self { opts: FilterOptions::default() }
    }

    pub fn from_options(opts: FilterOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn output_file(mut self, p: impl AsRef<Path>) -> Self { self.opts = self.opts.with_output_file(p); self }
    pub fn stats_file(mut self, p: impl AsRef<Path>) -> Self { self.opts = self.opts.with_stats_file(p); self }
    pub fn no_retweets(mut self, yes: bool) -> Self { self.opts = self.opts.with_no_retweets(yes); self }
    pub fn delete_ids_file(mut self, p: impl AsRef<Path>) -> Self { self.opts = self.opts.with_delete_ids_file(p); self }
    pub fn language_file(mut self, p: impl AsRef<Path>) -> Self { self.opts = self.opts.with_language_file(p); self }
    pub fn emoji_file(mut self, p: impl AsRef<Path>) -> Self { self.opts = self.opts.with_emoji_file(p); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }

    pub fn options(&self) -> &FilterOptions {
        &self.opts
    }

    /// Filter `inputs` with the default Unicode emoji table.
    pub fn run(&self, inputs: &[PathBuf]) -> Result<RunSummary> {
        self.run_with(inputs, &UnicodeEmoji)
    }

    /// Stream every input file, in order, through classification and output.
    ///
    /// A file that cannot be opened or decompressed is logged and skipped;
    /// the run continues with the next file. A structurally broken kept tweet
    /// (bad `created_at`, missing ids) aborts the run.
    pub fn run_with<E: EmojiExtractor + ?Sized>(&self, inputs: &[PathBuf], emoji: &E) -> Result<RunSummary> {
        init_tracing_once();
        tracing::info!("Filtering {} input files", inputs.len());

        let mut mux = OutputMux::create(&self.opts)?;
        let mut acc = RunAccumulator::new(self.opts.language_file.is_some(), self.opts.emoji_file.is_some());
        let copts = ClassifyOptions { no_retweets: self.opts.no_retweets };

        let pb = if self.opts.progress {
            let label = self.opts.progress_label.as_deref().unwrap_or("Tweets");
            Some(make_progress_bar_labeled(total_compressed_size(inputs), Some(label)))
        } else {
            None
        };

        let mut files = Vec::with_capacity(inputs.len());
        for path in inputs {
            let before = *acc.stats();
            let outcome = match self.process_file(path, &copts, emoji, &mut acc, &mut mux, pb.as_ref()) {
                Ok(lines) => FileOutcome::Ok { path: path.clone(), lines, delta: acc.stats().delta_since(&before) },
                Err(FileError::Read(e)) => {
                    tracing::error!("Encountered error on {}: {:#}", path.display(), e);
                    FileOutcome::Failed { path: path.clone(), error: format!("{e:#}") }
                }
                Err(FileError::Fatal(e)) => {
                    if let Some(pb) = &pb { pb.abandon_with_message("aborted"); }
                    return Err(e);
                }
            };
            files.push(outcome);
        }

        if let Some(pb) = &pb { pb.finish_with_message("done"); }
        mux.finish(&acc)?;

        let summary = RunSummary { stats: *acc.stats(), files };
        let failed = summary.failed_files().count();
        tracing::info!(
            "Run complete: {} files ok, {} failed; tweets={} retweets={} deleted={} tokens={}",
            summary.files.len() - failed,
            failed,
            summary.stats.tweets,
            summary.stats.retweets,
            summary.stats.deleted_tweets,
            summary.stats.total_tokens,
        );
        Ok(summary)
    }

    fn process_file<E: EmojiExtractor + ?Sized>(
        &self,
        path: &Path,
        copts: &ClassifyOptions,
        emoji: &E,
        acc: &mut RunAccumulator,
        mux: &mut OutputMux,
        pb: Option<&indicatif::ProgressBar>,
    ) -> std::result::Result<u64, FileError> {
        let mut line_no = 0u64;
        let res = for_each_line_with_progress(
            path,
            self.opts.read_buffer_bytes,
            |delta| {
                if let Some(pb) = pb { pb.inc(delta); }
            },
            |line| -> std::result::Result<(), LineFault> {
                line_no += 1;
                let d = classify_line(line, copts, emoji, acc).map_err(LineFault::Classify)?;
                mux.route(&d).map_err(LineFault::Write)
            },
        );
        match res {
            Ok(n) => Ok(n),
            Err(LineError::Read(e)) => {
                Err(FileError::Read(anyhow::Error::new(e).context(format!("reading {}", path.display()))))
            }
            Err(LineError::Handler(LineFault::Classify(e))) => Err(FileError::Fatal(
                anyhow::Error::new(e).context(format!("{}:{}", path.display(), line_no)),
            )),
            Err(LineError::Handler(LineFault::Write(e))) => {
                Err(FileError::Fatal(e.context(format!("while processing {}", path.display()))))
            }
        }
    }
}

/// Why a line handler stopped. Both abort the run.
#[derive(Debug)]
enum LineFault {
    Classify(ClassifyError),
    Write(anyhow::Error),
}

impl std::fmt::Display for LineFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classify(e) => write!(f, "{e}"),
            Self::Write(e) => write!(f, "{e:#}"),
        }
    }
}

/// Convenience wrapper used by the CLI.
pub fn filter_files(opts: FilterOptions, inputs: &[PathBuf]) -> Result<RunSummary> {
    TweetETL::from_options(opts)
        .run(inputs)
        .context("tweet filter run failed")
}
