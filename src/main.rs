use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tetl::{aggregate_count_files, filter_files, init_tracing_once, write_counts_csv, AggregateOptions, FilterOptions};

#[derive(Parser)]
#[command(author, version, about = "Tweet JSONL normalizer and emoji count reducer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dump gzip'd tweet JSONL files to a gzip'd tab-delimited corpus and collect stats.
    Filter {
        /// Input files to dump (gzip JSONL)
        #[arg(long, num_args = 1.., required = true)]
        input_files: Vec<PathBuf>,
        /// The text file (gzip)
        #[arg(long)]
        output_file: PathBuf,
        /// Save tweet stats to this file
        #[arg(long)]
        stats_file: PathBuf,
        /// Skip retweets
        #[arg(long, default_value_t = false)]
        no_retweets: bool,
        /// Save language counts to this file
        #[arg(long)]
        language_file: Option<PathBuf>,
        /// Save deleted tweet ids to this file (gzip)
        #[arg(long)]
        delete_ids_file: Option<PathBuf>,
        /// Save per-language emoji counts to this file
        #[arg(long)]
        emoji_file: Option<PathBuf>,
        /// Disable the progress bar
        #[arg(long, default_value_t = false)]
        no_progress: bool,
    },
    /// Reduce many per-run emoji count files into one dated CSV.
    EmojiCounts {
        /// The csv file
        #[arg(long)]
        output_file: PathBuf,
        /// Input files to read (`<prefix>_<YYYY>_<MM>_<DD>...`)
        #[arg(long, num_args = 1.., required = true)]
        input_files: Vec<PathBuf>,
        /// Reader worker count
        #[arg(long, default_value_t = 8)]
        workers: usize,
        /// Disable the progress bar
        #[arg(long, default_value_t = false)]
        no_progress: bool,
    },
}

fn main() -> Result<()> {
    init_tracing_once();
    let cli = Cli::parse();

    match cli.command {
        Command::Filter {
            input_files,
            output_file,
            stats_file,
            no_retweets,
            language_file,
            delete_ids_file,
            emoji_file,
            no_progress,
        } => {
            let mut opts = FilterOptions::default()
                .with_output_file(&output_file)
                .with_stats_file(&stats_file)
                .with_no_retweets(no_retweets)
                .with_progress(!no_progress);
            if let Some(p) = language_file { opts = opts.with_language_file(p); }
            if let Some(p) = delete_ids_file { opts = opts.with_delete_ids_file(p); }
            if let Some(p) = emoji_file { opts = opts.with_emoji_file(p); }

            let summary = filter_files(opts, &input_files)?;
            for f in summary.failed_files() {
                eprintln!("skipped unreadable input: {}", f.path().display());
            }
        }
        Command::EmojiCounts { output_file, input_files, workers, no_progress } => {
            let opts = AggregateOptions::default().with_workers(workers).with_progress(!no_progress);
            let rows = aggregate_count_files(&input_files, &opts)?;
            write_counts_csv(&output_file, &rows)?;
            tracing::info!("Wrote {} rows to {}", rows.len(), output_file.display());
        }
    }
    Ok(())
}
