//! Phrase-boundary classifiers
//!
//! A classifier cuts one line (no line breaks) into chunks that are good wrap
//! points. Chunks must concatenate back to the line, and classification never
//! fails: anything a classifier cannot handle comes back as a single chunk.

use std::sync::Arc;
use unicode_linebreak::{linebreaks, BreakOpportunity};

pub trait PhraseClassifier: Send + Sync {
    fn segment_phrase(&self, line: &str) -> Vec<String>;
}

/// Returns the whole line as one chunk.
#[derive(Debug, Default, Clone, Copy)]
pub struct WholeLineClassifier;

impl PhraseClassifier for WholeLineClassifier {
    fn segment_phrase(&self, line: &str) -> Vec<String> {
        vec![line.to_string()]
    }
}

/// Cuts at Unicode line break opportunities (UAX #14).
///
/// Works well for space-delimited scripts; for Japanese and Chinese it would
/// allow a break between every ideograph.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineBreakClassifier;

impl PhraseClassifier for LineBreakClassifier {
    fn segment_phrase(&self, line: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut start = 0;
        for (at, opportunity) in linebreaks(line) {
            if at <= start || at > line.len() {
                continue;
            }
            match opportunity {
                BreakOpportunity::Allowed | BreakOpportunity::Mandatory => {
                    chunks.push(line[start..at].to_string());
                    start = at;
                }
            }
        }
        if start < line.len() {
            chunks.push(line[start..].to_string());
        }
        chunks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Hiragana,
    Katakana,
    Kanji,
    Latin,
    Space,
    Open,
    Close,
    Other,
}

fn classify(c: char) -> CharClass {
    match c {
        c if c.is_whitespace() => CharClass::Space,
        '(' | '[' | '{' | '（' | '「' | '『' | '【' | '〔' | '〈' | '《' | '｛' | '［' | '“' => {
            CharClass::Open
        }
        '、' | '。' | '，' | '．' | '・' | '：' | '；' | '？' | '！' | '）' | '」' | '』' | '】'
        | '〕' | '〉' | '》' | '｝' | '］' | '”' => CharClass::Close,
        '\u{3041}'..='\u{309F}' => CharClass::Hiragana,
        '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
            CharClass::Katakana
        }
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{3005}'..='\u{3007}' => CharClass::Kanji,
        c if c.is_ascii() || c.is_alphanumeric() => CharClass::Latin,
        _ => CharClass::Other,
    }
}

fn is_japanese(class: CharClass) -> bool {
    matches!(
        class,
        CharClass::Hiragana | CharClass::Katakana | CharClass::Kanji
    )
}

/// Phrase classifier for Japanese text.
///
/// Approximates bunsetsu boundaries from character classes: a run of
/// hiragana (particles, okurigana) closes the phrase opened by the kanji or
/// katakana before it, closing punctuation ends a phrase, opening brackets
/// start one. Lines without kana or kanji are handed to
/// [`LineBreakClassifier`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JapanesePhraseClassifier;

impl JapanesePhraseClassifier {
    fn boundary_between(prev: CharClass, next: CharClass) -> bool {
        use CharClass::*;
        match (prev, next) {
            (Space, Space) => false,
            (Space, _) => true,
            (_, Open) => prev != Open,
            (Close, Close) => false,
            (Close, _) => true,
            (Hiragana, Kanji | Katakana | Latin | Other) => true,
            (Kanji | Katakana, Latin) => true,
            (Latin, Kanji | Katakana) => true,
            _ => false,
        }
    }
}

impl PhraseClassifier for JapanesePhraseClassifier {
    fn segment_phrase(&self, line: &str) -> Vec<String> {
        if !line.chars().map(classify).any(is_japanese) {
            return LineBreakClassifier.segment_phrase(line);
        }

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut prev: Option<CharClass> = None;
        for (at, c) in line.char_indices() {
            let class = classify(c);
            if let Some(p) = prev {
                if Self::boundary_between(p, class) && at > start {
                    chunks.push(line[start..at].to_string());
                    start = at;
                }
            }
            prev = Some(class);
        }
        if start < line.len() {
            chunks.push(line[start..].to_string());
        }
        chunks
    }
}

/// Classifier used when the caller does not supply one
pub fn default_classifier() -> Arc<dyn PhraseClassifier> {
    Arc::new(JapanesePhraseClassifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_break_classifier_keeps_trailing_spaces_with_words() {
        let chunks = LineBreakClassifier.segment_phrase("Hello big world");
        assert_eq!(chunks, vec!["Hello ", "big ", "world"]);
    }

    #[test]
    fn japanese_particles_attach_to_their_head() {
        let chunks = JapanesePhraseClassifier.segment_phrase("今日は良い天気です。");
        assert_eq!(chunks, vec!["今日は", "良い", "天気です。"]);
    }

    #[test]
    fn japanese_mixed_with_latin() {
        let chunks = JapanesePhraseClassifier.segment_phrase("Rustで画像を作る");
        assert_eq!(chunks, vec!["Rustで", "画像を", "作る"]);
    }

    #[test]
    fn brackets_open_a_phrase() {
        let chunks = JapanesePhraseClassifier.segment_phrase("新しい「OGP画像」を作った");
        assert_eq!(chunks.concat(), "新しい「OGP画像」を作った");
        assert!(chunks.iter().any(|c| c.starts_with('「')));
    }

    #[test]
    fn latin_only_lines_use_uax14() {
        let chunks = JapanesePhraseClassifier.segment_phrase("plain ascii text");
        assert_eq!(chunks, vec!["plain ", "ascii ", "text"]);
    }

    #[test]
    fn unbroken_runs_stay_whole() {
        let run = "a".repeat(200);
        let chunks = JapanesePhraseClassifier.segment_phrase(&run);
        assert_eq!(chunks, vec![run]);
    }
}
