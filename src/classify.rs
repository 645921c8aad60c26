//! Per-line disposition: decides whether a raw tweet line is skipped, counted
//! as a retweet or deletion, dropped by a content filter, or kept.

use crate::accumulator::{Counter, RunAccumulator};
use crate::emoji::EmojiExtractor;
use crate::record::{NormalizedRecord, RawRecord, UNKNOWN_LANG};
use crate::timestamp::parse_created_at;
use crate::tokenize::normalize;

/// Minimum number of non-placeholder tokens a kept tweet must have.
pub const MIN_TOKENS: usize = 3;

/// Outcome of classifying one input line. Exactly one per line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Empty or undecodable line.
    Skip,
    Retweet,
    /// Deletion notice; carries the deleted status id when present.
    DeletionEvent { id: Option<String> },
    NoText,
    TooShort,
    /// Zero, or more than one distinct, emoji.
    AmbiguousEmoji,
    Keep(NormalizedRecord),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ClassifyOptions {
    pub no_retweets: bool,
}

/// Structural problems with an otherwise keepable tweet. These abort the run.
#[derive(Debug)]
pub enum ClassifyError {
    TimestampParse { raw: String, reason: String },
    MissingField(&'static str),
}

impl std::fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TimestampParse { raw, reason } => {
                write!(f, "malformed created_at {raw:?}: {reason}")
            }
            Self::MissingField(name) => write!(f, "kept tweet is missing required field `{name}`"),
        }
    }
}

impl std::error::Error for ClassifyError {}

/// Classify one raw line, updating `acc` for the counted dispositions.
///
/// Checks run in a fixed, short-circuiting order: empty line, retweet,
/// deletion, text presence, token count, distinct emoji, then record assembly.
/// `Retweet` and `DeletionEvent` bump their counters; `Keep` bumps tweets,
/// tokens, the language count and the language's emoji count. The filter
/// dispositions leave `acc` untouched.
pub fn classify_line<E: EmojiExtractor + ?Sized>(
    line: &str,
    opts: &ClassifyOptions,
    emoji: &E,
    acc: &mut RunAccumulator,
) -> Result<Disposition, ClassifyError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Disposition::Skip);
    }
    let raw = match RawRecord::parse(line) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("skipping undecodable line: {e}");
            return Ok(Disposition::Skip);
        }
    };
    classify_record(&raw, opts, emoji, acc)
}

/// Same as `classify_line`, for an already decoded record.
pub fn classify_record<E: EmojiExtractor + ?Sized>(
    raw: &RawRecord,
    opts: &ClassifyOptions,
    emoji: &E,
    acc: &mut RunAccumulator,
) -> Result<Disposition, ClassifyError> {
    if opts.no_retweets && raw.is_retweet() {
        acc.incr(Counter::Retweets);
        return Ok(Disposition::Retweet);
    }

    if raw.is_deletion() {
        acc.incr(Counter::DeletedTweets);
        return Ok(Disposition::DeletionEvent { id: raw.deleted_status_id().map(str::to_string) });
    }

    let Some(text) = raw.best_text() else {
        return Ok(Disposition::NoText);
    };

    let (text, tokens) = normalize(text);
    if tokens < MIN_TOKENS {
        return Ok(Disposition::TooShort);
    }

    let found = emoji.distinct_emoji(&text);
    if found.len() != 1 {
        return Ok(Disposition::AmbiguousEmoji);
    }

    let created_at = raw.created_at.as_deref().ok_or(ClassifyError::MissingField("created_at"))?;
    let timestamp = parse_created_at(created_at).map_err(|e| ClassifyError::TimestampParse {
        raw: created_at.to_string(),
        reason: e.to_string(),
    })?;
    let id = raw.id_str.as_deref().ok_or(ClassifyError::MissingField("id_str"))?;
    let user_id = raw.user_id().ok_or(ClassifyError::MissingField("user.id_str"))?;
    let lang = raw.lang.as_deref().unwrap_or(UNKNOWN_LANG);

    acc.incr(Counter::Tweets);
    acc.add(Counter::TotalTokens, tokens as u64);
    acc.bump_language(lang);
    acc.bump_emoji(lang, &found[0]);

    Ok(Disposition::Keep(NormalizedRecord {
        id: id.to_string(),
        user_id: user_id.to_string(),
        timestamp,
        lang: lang.to_string(),
        text,
    }))
}
