//! Tweet record shapes: the raw line schema (every field optional) and the
//! normalized record written to the corpus.

use serde::Deserialize;
use serde_json::Value;
use std::io::{self, Write};

/// Minimal line-level schema for classification.
/// Extra fields are ignored by serde; absent fields stay `None` so each
/// access site decides its own missing-field policy.
#[derive(Debug, Default, Deserialize)]
pub struct RawRecord {
    pub retweeted_status: Option<Value>,
    pub delete: Option<DeleteNotice>,
    pub extended_tweet: Option<ExtendedTweet>,
    pub text: Option<String>,
    pub lang: Option<String>,
    pub id_str: Option<String>,
    pub created_at: Option<String>,
    pub user: Option<UserRef>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteNotice {
    pub status: Option<StatusRef>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusRef {
    pub id_str: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExtendedTweet {
    pub full_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserRef {
    pub id_str: Option<String>,
}

impl RawRecord {
    /// Parse one JSON line.
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// A retweet marker counts only when it is "truthy":
    /// not `null`, `false`, an empty object, or an empty string.
    pub fn is_retweet(&self) -> bool {
        match &self.retweeted_status {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::Object(m)) => !m.is_empty(),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    pub fn is_deletion(&self) -> bool {
        self.delete.is_some()
    }

    pub fn deleted_status_id(&self) -> Option<&str> {
        self.delete.as_ref()?.status.as_ref()?.id_str.as_deref()
    }

    /// Preferred text: `extended_tweet.full_text`, falling back to `text`.
    /// Empty strings are treated as absent.
    pub fn best_text(&self) -> Option<&str> {
        let full = self
            .extended_tweet
            .as_ref()
            .and_then(|e| e.full_text.as_deref())
            .filter(|s| !s.is_empty());
        full.or_else(|| self.text.as_deref().filter(|s| !s.is_empty()))
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref()?.id_str.as_deref()
    }
}

/// Language code used when a kept tweet carries no `lang`.
pub const UNKNOWN_LANG: &str = "und";

/// A cleaned tweet ready for the corpus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub id: String,
    pub user_id: String,
    pub timestamp: i64,
    pub lang: String,
    pub text: String,
}

impl NormalizedRecord {
    /// `id\tuser_id\ttimestamp\tlang\ttext\n`
    pub fn write_tsv<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "{}\t{}\t{}\t{}\t{}", self.id, self.user_id, self.timestamp, self.lang, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retweet_truthiness() {
        for (json, expect) in [
            (r#"{"retweeted_status":{"id":1}}"#, true),
            (r#"{"retweeted_status":{}}"#, false),
            (r#"{"retweeted_status":null}"#, false),
            (r#"{"retweeted_status":false}"#, false),
            (r#"{"text":"hi"}"#, false),
        ] {
            assert_eq!(RawRecord::parse(json).unwrap().is_retweet(), expect, "{json}");
        }
    }

    #[test]
    fn text_prefers_full_text() {
        let r = RawRecord::parse(r#"{"text":"short","extended_tweet":{"full_text":"the long one"}}"#).unwrap();
        assert_eq!(r.best_text(), Some("the long one"));

        let r = RawRecord::parse(r#"{"text":"short","extended_tweet":{"full_text":""}}"#).unwrap();
        assert_eq!(r.best_text(), Some("short"));

        let r = RawRecord::parse(r#"{"lang":"en"}"#).unwrap();
        assert_eq!(r.best_text(), None);
    }

    #[test]
    fn deletion_notice() {
        let r = RawRecord::parse(r#"{"delete":{"status":{"id":5,"id_str":"5"}}}"#).unwrap();
        assert!(r.is_deletion());
        assert_eq!(r.deleted_status_id(), Some("5"));
    }

    #[test]
    fn tsv_layout() {
        let rec = NormalizedRecord {
            id: "1".into(),
            user_id: "2".into(),
            timestamp: 3,
            lang: "en".into(),
            text: "hello there world".into(),
        };
        let mut buf = Vec::new();
        rec.write_tsv(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1\t2\t3\ten\thello there world\n");
    }
}
