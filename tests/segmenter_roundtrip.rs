use ogpcard::text::{
    join_segments, segment_title, JapanesePhraseClassifier, LineBreakClassifier,
    PhraseClassifier, WholeLineClassifier,
};

const SAMPLES: &[&str] = &[
    "",
    "Hello",
    "Hello\nWorld",
    "Hello\r\nWorld\rAgain",
    "\n\nleading breaks",
    "trailing break\n",
    "  spaces   between   words  ",
    "今日は良い天気です。",
    "Rustで画像を作る方法【2024年版】",
    "混在 mixed テキスト with English",
    "Supercalifragilisticexpialidocious-and-then-some",
    "emoji 👩‍👩‍👧 family and flags 🇯🇵",
    "e\u{301} combining marks",
];

fn classifiers() -> Vec<Box<dyn PhraseClassifier>> {
    vec![
        Box::new(WholeLineClassifier),
        Box::new(LineBreakClassifier),
        Box::new(JapanesePhraseClassifier),
    ]
}

#[test]
fn concatenation_reconstructs_input() {
    for classifier in classifiers() {
        for sample in SAMPLES {
            let segments = segment_title(sample, classifier.as_ref());
            assert_eq!(&join_segments(&segments), sample, "round trip of {:?}", sample);
        }
    }
}

#[test]
fn empty_title_yields_one_empty_segment() {
    for classifier in classifiers() {
        let segments = segment_title("", classifier.as_ref());
        assert_eq!(segments.len(), 1);
        assert!(segments[0].text.is_empty());
    }
}

#[test]
fn explicit_breaks_stay_in_place() {
    let segments = segment_title("a\r\nb\nc", &WholeLineClassifier);
    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "\r\n", "b", "\n", "c"]);
    assert_eq!(segments.iter().filter(|s| s.is_hard_break()).count(), 2);
}

#[test]
fn japanese_phrases_keep_particles_attached() {
    let segments = segment_title("今日は良い天気です。", &JapanesePhraseClassifier);
    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["今日は", "良い", "天気です。"]);
    assert!(segments.iter().all(|s| s.breakable_after));
}

#[test]
fn unbroken_runs_are_emitted_whole() {
    let word = "Supercalifragilisticexpialidocious";
    let segments = segment_title(word, &LineBreakClassifier);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text, word);
}
