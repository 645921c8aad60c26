//! Per-run counters: tweet/retweet/deletion stats, per-language counts and
//! per-language emoji counts. Strictly additive for the lifetime of a run.

use ahash::AHashMap;
use std::collections::BTreeMap;

/// Named scalar counters in `RunStats`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Counter {
    TotalTokens,
    Tweets,
    DeletedTweets,
    Retweets,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total_tokens: u64,
    pub tweets: u64,
    pub deleted_tweets: u64,
    pub retweets: u64,
}

impl RunStats {
    fn slot(&mut self, c: Counter) -> &mut u64 {
        match c {
            Counter::TotalTokens => &mut self.total_tokens,
            Counter::Tweets => &mut self.tweets,
            Counter::DeletedTweets => &mut self.deleted_tweets,
            Counter::Retweets => &mut self.retweets,
        }
    }

    /// Stats in output order.
    pub fn entries(&self) -> [(&'static str, u64); 4] {
        [
            ("total_tokens", self.total_tokens),
            ("tweets", self.tweets),
            ("deleted_tweets", self.deleted_tweets),
            ("retweets", self.retweets),
        ]
    }

    /// Counter growth since `earlier`.
    pub fn delta_since(&self, earlier: &RunStats) -> RunStats {
        RunStats {
            total_tokens: self.total_tokens - earlier.total_tokens,
            tweets: self.tweets - earlier.tweets,
            deleted_tweets: self.deleted_tweets - earlier.deleted_tweets,
            retweets: self.retweets - earlier.retweets,
        }
    }
}

/// Language frequencies that remember first-seen order, so a stable sort by
/// descending count breaks ties by first appearance.
#[derive(Clone, Debug, Default)]
pub struct LanguageCounts {
    order: Vec<(String, u64)>,
    index: AHashMap<String, usize>,
}

impl LanguageCounts {
    pub fn bump(&mut self, lang: &str) {
        if let Some(&i) = self.index.get(lang) {
            self.order[i].1 += 1;
        } else {
            self.index.insert(lang.to_string(), self.order.len());
            self.order.push((lang.to_string(), 1));
        }
    }

    pub fn get(&self, lang: &str) -> u64 {
        self.index.get(lang).map(|&i| self.order[i].1).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Most common first; ties keep first-seen order.
    pub fn most_common(&self) -> Vec<(&str, u64)> {
        let mut v: Vec<(&str, u64)> = self.order.iter().map(|(l, c)| (l.as_str(), *c)).collect();
        v.sort_by(|a, b| b.1.cmp(&a.1));
        v
    }
}

/// language -> demojized emoji -> count
#[derive(Clone, Debug, Default)]
pub struct EmojiCounts {
    by_lang: BTreeMap<String, BTreeMap<String, u64>>,
}

impl EmojiCounts {
    pub fn bump(&mut self, lang: &str, emoji: &str) {
        *self
            .by_lang
            .entry(lang.to_string())
            .or_default()
            .entry(emoji.to_string())
            .or_insert(0) += 1;
    }

    pub fn get(&self, lang: &str, emoji: &str) -> u64 {
        self.by_lang.get(lang).and_then(|m| m.get(emoji)).copied().unwrap_or(0)
    }

    /// `(lang, emoji, count)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.by_lang
            .iter()
            .flat_map(|(lang, m)| m.iter().map(move |(e, c)| (lang.as_str(), e.as_str(), *c)))
    }

    pub fn is_empty(&self) -> bool {
        self.by_lang.is_empty()
    }
}

/// Mutable state threaded through classification for one run.
/// Language and emoji maps only exist when their output was requested.
#[derive(Clone, Debug, Default)]
pub struct RunAccumulator {
    stats: RunStats,
    languages: Option<LanguageCounts>,
    emoji: Option<EmojiCounts>,
}

impl RunAccumulator {
    pub fn new(track_languages: bool, track_emoji: bool) -> Self {
        Self {
            stats: RunStats::default(),
            languages: track_languages.then(LanguageCounts::default),
            emoji: track_emoji.then(EmojiCounts::default),
        }
    }

    /// Accumulator that tracks everything.
    pub fn tracking_all() -> Self {
        Self::new(true, true)
    }

    #[inline]
    pub fn incr(&mut self, c: Counter) {
        self.add(c, 1);
    }

    #[inline]
    pub fn add(&mut self, c: Counter, n: u64) {
        *self.stats.slot(c) += n;
    }

    pub fn bump_language(&mut self, lang: &str) {
        if let Some(l) = &mut self.languages {
            l.bump(lang);
        }
    }

    pub fn bump_emoji(&mut self, lang: &str, emoji: &str) {
        if let Some(e) = &mut self.emoji {
            e.bump(lang, emoji);
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn languages(&self) -> Option<&LanguageCounts> {
        self.languages.as_ref()
    }

    pub fn emoji(&self) -> Option<&EmojiCounts> {
        self.emoji.as_ref()
    }
}
