/// Text measurement used by the layout composer

pub trait TextMeasure: Send + Sync {
    /// Horizontal advance of `text` at `px` font size
    fn advance(&self, text: &str, px: f32) -> f32;

    /// Distance from the top of the line box to the baseline
    fn ascent(&self, px: f32) -> f32;

    /// Distance from the baseline to the bottom of the glyphs
    fn descent(&self, px: f32) -> f32;
}

/// Font-less estimate: fixed advances for narrow and wide characters.
///
/// Used when no font file is available, and by tests that need layout
/// results independent of installed fonts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance {
    pub narrow_em: f32,
    pub wide_em: f32,
    pub space_em: f32,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self {
            narrow_em: 0.6,
            wide_em: 1.0,
            space_em: 0.3,
        }
    }
}

impl TextMeasure for FixedAdvance {
    fn advance(&self, text: &str, px: f32) -> f32 {
        text.chars()
            .map(|c| {
                if c == ' ' {
                    self.space_em
                } else if is_wide(c) {
                    self.wide_em
                } else {
                    self.narrow_em
                }
            })
            .sum::<f32>()
            * px
    }

    fn ascent(&self, px: f32) -> f32 {
        px * 0.8
    }

    fn descent(&self, px: f32) -> f32 {
        px * 0.2
    }
}

/// East Asian wide and fullwidth ranges (approximate)
pub fn is_wide(c: char) -> bool {
    matches!(c,
        '\u{1100}'..='\u{115F}'
        | '\u{2E80}'..='\u{303E}'
        | '\u{3041}'..='\u{33FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{A000}'..='\u{A4CF}'
        | '\u{AC00}'..='\u{D7A3}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FE30}'..='\u{FE4F}'
        | '\u{FF00}'..='\u{FF60}'
        | '\u{FFE0}'..='\u{FFE6}'
        | '\u{1F300}'..='\u{1F64F}'
        | '\u{1F900}'..='\u{1F9FF}'
    )
}
