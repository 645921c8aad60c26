#![allow(dead_code)]

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::json;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Write a gzip'd JSONL file containing the provided lines.
pub fn write_gz_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = GzEncoder::new(f, Compression::default());
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Decompress a gzip file and collect non-empty lines.
pub fn read_gz_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    let r = BufReader::new(MultiGzDecoder::new(f));
    r.lines().map(|l| l.unwrap()).filter(|s| !s.is_empty()).collect()
}

/// Read a plain text file line-by-line into strings (skips empty lines).
pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    let r = BufReader::new(f);
    r.lines().map(|l| l.unwrap()).filter(|s| !s.is_empty()).collect()
}

/// Parse a `name\tvalue` stats file.
pub fn read_stats(path: &Path) -> Vec<(String, u64)> {
    read_lines(path)
        .into_iter()
        .map(|l| {
            let (k, v) = l.split_once('\t').unwrap();
            (k.to_string(), v.parse().unwrap())
        })
        .collect()
}

pub fn stat(stats: &[(String, u64)], name: &str) -> u64 {
    stats.iter().find(|(k, _)| k == name).map(|(_, v)| *v).unwrap()
}

/// A streaming-API style tweet.
pub fn tweet(id: &str, user: &str, lang: &str, text: &str) -> serde_json::Value {
    json!({
        "created_at": "Wed Oct 10 20:19:24 +0000 2018",
        "id": id.parse::<u64>().unwrap_or(0),
        "id_str": id,
        "text": text,
        "truncated": false,
        "lang": lang,
        "user": {"id": 1, "id_str": user, "screen_name": format!("user{user}")},
        "entities": {"hashtags": [], "urls": [], "user_mentions": []}
    })
}

pub fn retweet(id: &str, user: &str, lang: &str, text: &str) -> serde_json::Value {
    let mut v = tweet(id, user, lang, text);
    v["retweeted_status"] = tweet("1", "2", lang, text);
    v
}

pub fn deletion(id: &str) -> serde_json::Value {
    json!({"delete": {"status": {"id": id.parse::<u64>().unwrap_or(0), "id_str": id, "user_id": 5, "user_id_str": "5"}, "timestamp_ms": "1539202764000"}})
}

/// Build a tiny corpus of three hourly files:
/// - `2018_10_10_20.json.gz`: 2 kept (en 🔥, es 😂), 1 retweet, 1 deletion, 1 too short
/// - `2018_10_10_21.json.gz`: 1 kept (en 🔥 via full_text), 1 ambiguous (two emoji),
///   1 without emoji, 1 garbage line, 1 blank line
/// - `2018_10_10_22.json.gz`: not gzip at all (plain text with a gz name)
///
/// Returns the base dir and the input paths in order.
pub fn make_corpus_basic() -> (PathBuf, Vec<PathBuf>) {
    let base = tempfile::tempdir().unwrap().into_path();

    let f1 = base.join("in").join("2018_10_10_20.json.gz");
    write_gz_lines(
        &f1,
        &[
            tweet("10", "100", "en", "@bob this is lit 🔥 http://t.co/a").to_string(),
            tweet("11", "101", "es", "esto es muy gracioso 😂").to_string(),
            retweet("12", "102", "en", "RT copied words here 🔥").to_string(),
            deletion("13").to_string(),
            tweet("14", "104", "en", "@x short 🔥").to_string(),
        ],
    );

    let f2 = base.join("in").join("2018_10_10_21.json.gz");
    let mut long = tweet("20", "200", "en", "truncated text…");
    long["extended_tweet"] = json!({"full_text": "the\tfull\ntext is here 🔥"});
    write_gz_lines(
        &f2,
        &[
            long.to_string(),
            tweet("21", "201", "en", "two different symbols here 😂 🔥").to_string(),
            tweet("22", "202", "fr", "aucun symbole dans ce texte").to_string(),
            "{this is not json".to_string(),
            String::new(),
        ],
    );

    let f3 = base.join("in").join("2018_10_10_22.json.gz");
    fs::write(&f3, tweet("30", "300", "en", "never read 🔥").to_string()).unwrap();

    (base, vec![f1, f2, f3])
}

/// Write a `lang\temoji\tcount` file.
pub fn write_count_file(path: &Path, rows: &[(&str, &str, u64)]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for (lang, emoji, count) in rows {
        writeln!(f, "{}\t{}\t{}", lang, emoji, count).unwrap();
    }
}
