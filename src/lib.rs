mod config;
mod util;
mod progress;
mod concurrency;
mod gzip_jsonl;

mod tokenize;
mod emoji;
mod record;
mod timestamp;
mod classify;
mod accumulator;
mod output;
mod pipeline;

mod aggregate;

pub use crate::config::{AggregateOptions, FilterOptions};
pub use crate::pipeline::{filter_files, FileOutcome, RunSummary, TweetETL};

// Stage-1 building blocks.
pub use crate::tokenize::{content_tokens, normalize, URL_PLACEHOLDER, USER_PLACEHOLDER};
pub use crate::emoji::{demojize, EmojiExtractor, UnicodeEmoji};
pub use crate::record::{NormalizedRecord, RawRecord, UNKNOWN_LANG};
pub use crate::timestamp::parse_created_at;
pub use crate::classify::{classify_line, classify_record, ClassifyError, ClassifyOptions, Disposition, MIN_TOKENS};
pub use crate::accumulator::{Counter, EmojiCounts, LanguageCounts, RunAccumulator, RunStats};
pub use crate::output::{write_emoji_counts, write_language_counts, write_stats, OutputMux};
pub use crate::gzip_jsonl::{for_each_line_with_progress, LineError};

// Stage-2 reduction.
pub use crate::aggregate::{
    aggregate_count_files, date_from_filename, read_count_file, reduce_rows, write_counts_csv, AggregateError, CountRow,
};

pub use crate::util::init_tracing_once;
