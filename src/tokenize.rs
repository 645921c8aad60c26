//! Tweet text normalization: placeholder substitution for mentions and URLs,
//! whitespace collapsing, and a "substantive token" count.

use regex::Regex;
use std::sync::OnceLock;

/// Literal that replaces every `@handle` mention.
pub const USER_PLACEHOLDER: &str = "@USER";
/// Literal that replaces every `http(s)://...` URL.
pub const URL_PLACEHOLDER: &str = "HTTPURL";

struct Patterns {
    handle: Regex,
    url: Regex,
    whitespace: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        handle: Regex::new(r"@\w+").expect("static handle regex"),
        url: Regex::new(r"https?://[\w./?=&#%:-]+").expect("static url regex"),
        whitespace: Regex::new(r"\s+").expect("static whitespace regex"),
    })
}

/// Normalize raw tweet text and count its content tokens.
///
/// Mentions become `@USER`, URLs become `HTTPURL`, and every whitespace run
/// (tabs and newlines included) collapses to a single space. The returned
/// count excludes both placeholders, so a post made only of mentions and links
/// counts as zero.
pub fn normalize(text: &str) -> (String, usize) {
    let p = patterns();
    let text = p.handle.replace_all(text, USER_PLACEHOLDER);
    let text = p.url.replace_all(&text, URL_PLACEHOLDER);
    let text = p.whitespace.replace_all(&text, " ").into_owned();
    let count = content_tokens(&text);
    (text, count)
}

/// Whitespace-delimited tokens that are not placeholders.
pub fn content_tokens(text: &str) -> usize {
    text.split_whitespace()
        .filter(|t| *t != USER_PLACEHOLDER && *t != URL_PLACEHOLDER)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_mentions_and_urls() {
        let (text, n) = normalize("@alice check http://x.co now");
        assert_eq!(text, "@USER check HTTPURL now");
        assert_eq!(n, 2);
    }

    #[test]
    fn collapses_tabs_and_newlines() {
        let (text, n) = normalize("one\ttwo\n\nthree   four");
        assert_eq!(text, "one two three four");
        assert_eq!(n, 4);
        assert!(!text.contains('\t') && !text.contains('\n'));
    }

    #[test]
    fn https_and_query_strings() {
        let (text, n) = normalize("see https://example.com/a?b=1&c=%20#frag ok");
        assert_eq!(text, "see HTTPURL ok");
        assert_eq!(n, 2);
    }

    #[test]
    fn placeholders_only_count_zero() {
        let (_, n) = normalize("@a @b http://c.d https://e.f");
        assert_eq!(n, 0);
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize(""), (String::new(), 0));
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "@bob said\t\thttps://t.co/xyz is great!",
            "  leading and trailing  ",
            "plain words only here",
            "@USER HTTPURL text",
        ];
        for raw in inputs {
            let once = normalize(raw);
            let twice = normalize(&once.0);
            assert_eq!(once, twice, "input: {raw:?}");
        }
    }
}
