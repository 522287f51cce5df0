//! Title segmentation
//!
//! The title is split on explicit line breaks first; each line is then cut into
//! phrase chunks by a [`PhraseClassifier`]. Every chunk becomes a [`Segment`]
//! marked as a soft wrap opportunity. Explicit breaks are kept as their own
//! segments so that joining all segment texts gives back the input unchanged.

pub mod metrics;
pub mod phrase;

pub use metrics::{FixedAdvance, TextMeasure};
pub use phrase::{
    default_classifier, JapanesePhraseClassifier, LineBreakClassifier, PhraseClassifier,
    WholeLineClassifier,
};

/// One unit of title text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    /// The renderer may wrap after this segment
    pub breakable_after: bool,
}

impl Segment {
    pub fn new(text: impl Into<String>, breakable_after: bool) -> Self {
        Self {
            text: text.into(),
            breakable_after,
        }
    }

    /// Whether this segment is an explicit line break from the input
    pub fn is_hard_break(&self) -> bool {
        matches!(self.text.as_str(), "\n" | "\r\n" | "\r")
    }
}

/// Segment a title for wrapping.
///
/// Never returns an empty vector: an empty title yields one empty segment.
pub fn segment_title(text: &str, classifier: &dyn PhraseClassifier) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;
    loop {
        match find_line_break(rest) {
            Some((at, len)) => {
                segment_line(&rest[..at], classifier, &mut segments);
                segments.push(Segment::new(&rest[at..at + len], true));
                rest = &rest[at + len..];
            }
            None => {
                segment_line(rest, classifier, &mut segments);
                break;
            }
        }
    }
    log::debug!("segmented title into {} segments", segments.len());
    segments
}

/// Join segment texts back into the original string
pub fn join_segments(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

fn find_line_break(s: &str) -> Option<(usize, usize)> {
    let (at, c) = s.char_indices().find(|(_, c)| *c == '\n' || *c == '\r')?;
    if c == '\r' && s[at + 1..].starts_with('\n') {
        Some((at, 2))
    } else {
        Some((at, 1))
    }
}

fn segment_line(line: &str, classifier: &dyn PhraseClassifier, out: &mut Vec<Segment>) {
    if line.is_empty() {
        out.push(Segment::new("", true));
        return;
    }

    let chunks: Vec<String> = classifier
        .segment_phrase(line)
        .into_iter()
        .filter(|c| !c.is_empty())
        .collect();

    // A classifier that loses or invents text is treated as unable to classify.
    if chunks.is_empty() || chunks.concat() != line {
        log::warn!("phrase classifier did not cover the line; keeping it whole");
        out.push(Segment::new(line, true));
        return;
    }

    out.extend(chunks.into_iter().map(|c| Segment::new(c, true)));
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Lossy;

    impl PhraseClassifier for Lossy {
        fn segment_phrase(&self, line: &str) -> Vec<String> {
            vec![line.chars().skip(1).collect()]
        }
    }

    #[test]
    fn empty_title_yields_one_empty_segment() {
        let segs = segment_title("", &WholeLineClassifier);
        assert_eq!(segs, vec![Segment::new("", true)]);
    }

    #[test]
    fn explicit_breaks_are_separate_segments() {
        let segs = segment_title("Hello\nWorld", &WholeLineClassifier);
        let texts: Vec<&str> = segs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "\n", "World"]);
        assert!(segs[1].is_hard_break());
        assert!(segs.iter().all(|s| s.breakable_after));
    }

    #[test]
    fn blank_lines_keep_an_empty_segment() {
        let segs = segment_title("a\r\n\r\nb\n", &WholeLineClassifier);
        let texts: Vec<&str> = segs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "\r\n", "", "\r\n", "b", "\n", ""]);
        assert_eq!(join_segments(&segs), "a\r\n\r\nb\n");
    }

    #[test]
    fn lone_carriage_return_is_a_break() {
        let segs = segment_title("x\ry", &WholeLineClassifier);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[1].text, "\r");
    }

    #[test]
    fn lossy_classifier_degrades_to_whole_line() {
        let segs = segment_title("abc", &Lossy);
        assert_eq!(segs, vec![Segment::new("abc", true)]);
    }
}
