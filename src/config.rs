use std::path::{Path, PathBuf};

/// Stage-1 (filter) options with builder chaining.
///
/// `output_file` and `stats_file` are mandatory at run time; every other
/// output is produced iff its path is set.
#[derive(Clone, Debug)]
pub struct FilterOptions {
    pub output_file: Option<PathBuf>,  // gzip TSV corpus
    pub stats_file: Option<PathBuf>,   // plain `name\tvalue`
    pub no_retweets: bool,
    pub delete_ids_file: Option<PathBuf>, // gzip, one id per line
    pub language_file: Option<PathBuf>,
    pub emoji_file: Option<PathBuf>,
    pub progress: bool,
    pub progress_label: Option<String>,

    // IO tuning
    pub read_buffer_bytes: usize,
    pub write_buffer_bytes: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            output_file: None,
            stats_file: None,
            no_retweets: false,
            delete_ids_file: None,
            language_file: None,
            emoji_file: None,
            progress: true,
            progress_label: None,
            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl FilterOptions {
    pub fn with_output_file(mut self, p: impl AsRef<Path>) -> Self {
        self.output_file = Some(p.as_ref().to_path_buf());
        self
    }
    pub fn with_stats_file(mut self, p: impl AsRef<Path>) -> Self {
        self.stats_file = Some(p.as_ref().to_path_buf());
        self
    }
    pub fn with_no_retweets(mut self, yes: bool) -> Self {
        self.no_retweets = yes;
        self
    }
    pub fn with_delete_ids_file(mut self, p: impl AsRef<Path>) -> Self {
        self.delete_ids_file = Some(p.as_ref().to_path_buf());
        self
    }
    pub fn with_language_file(mut self, p: impl AsRef<Path>) -> Self {
        self.language_file = Some(p.as_ref().to_path_buf());
        self
    }
    pub fn with_emoji_file(mut self, p: impl AsRef<Path>) -> Self {
        self.emoji_file = Some(p.as_ref().to_path_buf());
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }
}

/// Stage-2 (emoji count reduction) options.
#[derive(Clone, Debug)]
pub struct AggregateOptions {
    pub workers: usize, // bounded reader pool size
    pub progress: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self { workers: 8, progress: true }
    }
}

impl AggregateOptions {
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = n.max(1);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
}
