//! Emoji detection seam. The classifier only asks "which distinct emoji does
//! this text contain?"; the lookup table lives behind `EmojiExtractor`.

use unicode_segmentation::UnicodeSegmentation;

/// Capability injected into the classifier.
///
/// Implementations return each distinct emoji in `text` as its canonical
/// demojized token (e.g. `:fire:`), in order of first appearance.
pub trait EmojiExtractor {
    fn distinct_emoji(&self, text: &str) -> Vec<String>;
}

/// Default extractor backed by the Unicode emoji table in the `emojis` crate.
/// Text is walked grapheme by grapheme so ZWJ sequences and skin-tone
/// modified emoji resolve as one symbol.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnicodeEmoji;

impl EmojiExtractor for UnicodeEmoji {
    fn distinct_emoji(&self, text: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for g in text.graphemes(true) {
            if g.is_ascii() {
                continue;
            }
            if let Some(e) = lookup(g) {
                let token = demojize(e.name());
                if !out.contains(&token) {
                    out.push(token);
                }
            }
        }
        out
    }
}

fn lookup(g: &str) -> Option<&'static emojis::Emoji> {
    if let Some(e) = emojis::get(g) {
        return Some(e);
    }
    // Tweets frequently drop or add the emoji presentation selector.
    if g.contains('\u{fe0f}') {
        emojis::get(&g.replace('\u{fe0f}', ""))
    } else {
        emojis::get(&format!("{g}\u{fe0f}"))
    }
}

/// Render a CLDR short name as a `:snake_case:` token.
/// `"thumbs up: medium skin tone"` becomes `:thumbs_up_medium_skin_tone:`.
pub fn demojize(name: &str) -> String {
    let mut token = String::with_capacity(name.len() + 2);
    token.push(':');
    for c in name.chars() {
        match c {
            ' ' => token.push('_'),
            ':' | ',' | '“' | '”' => {}
            _ => token.push(c),
        }
    }
    token.push(':');
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_emoji() {
        let got = UnicodeEmoji.distinct_emoji("this is lit 🔥");
        assert_eq!(got, vec![":fire:".to_string()]);
    }

    #[test]
    fn repeated_emoji_is_distinct_once() {
        let got = UnicodeEmoji.distinct_emoji("🔥🔥 so hot 🔥");
        assert_eq!(got.len(), 1);
    }

    #[test]
    fn two_distinct_emoji() {
        let got = UnicodeEmoji.distinct_emoji("😂 and 🔥");
        assert_eq!(got, vec![":face_with_tears_of_joy:".to_string(), ":fire:".to_string()]);
    }

    #[test]
    fn plain_text_has_none() {
        assert!(UnicodeEmoji.distinct_emoji("no symbols here 123 # *").is_empty());
        assert!(UnicodeEmoji.distinct_emoji("naïve café").is_empty());
    }

    #[test]
    fn demojize_strips_punctuation() {
        assert_eq!(demojize("thumbs up: medium skin tone"), ":thumbs_up_medium_skin_tone:");
        assert_eq!(demojize("fire"), ":fire:");
    }
}
