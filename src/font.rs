//! TrueType font loading and measurement using fontdue (pure Rust)

use crate::text::TextMeasure;
use crate::{Error, Result};
use fontdue::{Font, FontSettings, Metrics};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a font file to use before the built-in search list
pub const FONT_ENV: &str = "OGPCARD_FONT";

// CJK-capable fonts first so Japanese titles render.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Bold.ttc",
    "/System/Library/Fonts/ヒラギノ角ゴシック W6.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
];

/// A parsed font face
pub struct Typeface {
    font: Font,
    source: String,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface").field("source", &self.source).finish()
    }
}

impl Typeface {
    /// Parse a font from memory; `source` is only used for diagnostics
    pub fn from_bytes(data: Vec<u8>, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| Error::FontError(format!("failed to parse {}: {}", source, e)))?;
        Ok(Self { font, source })
    }

    /// Load a TrueType/OpenType font from a file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read(path)
            .map_err(|e| Error::FontError(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_bytes(data, path.display().to_string())
    }

    /// Find a usable system font: `OGPCARD_FONT` first, then well-known paths
    pub fn from_system() -> Result<Self> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(p) = std::env::var_os(FONT_ENV) {
            candidates.push(PathBuf::from(p));
        }
        candidates.extend(SYSTEM_FONT_PATHS.iter().map(PathBuf::from));

        for path in &candidates {
            if !path.exists() {
                continue;
            }
            match Self::from_path(path) {
                Ok(face) => {
                    log::debug!("using font {}", path.display());
                    return Ok(face);
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        Err(Error::FontError(format!(
            "no usable font found; set {} or pass a font path (tried {:?})",
            FONT_ENV, candidates
        )))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Coverage bitmap for one glyph at `px`
    pub fn rasterize(&self, c: char, px: f32) -> (Metrics, Vec<u8>) {
        self.font.rasterize(c, px)
    }

    pub fn has_glyph(&self, c: char) -> bool {
        self.font.lookup_glyph_index(c) != 0
    }
}

impl TextMeasure for Typeface {
    fn advance(&self, text: &str, px: f32) -> f32 {
        text.chars().map(|c| self.font.metrics(c, px).advance_width).sum()
    }

    fn ascent(&self, px: f32) -> f32 {
        self.font
            .horizontal_line_metrics(px)
            .map(|m| m.ascent)
            .unwrap_or(px * 0.8)
    }

    fn descent(&self, px: f32) -> f32 {
        // fontdue reports descent as a negative offset
        self.font
            .horizontal_line_metrics(px)
            .map(|m| -m.descent)
            .unwrap_or(px * 0.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_font_error() {
        let err = Typeface::from_bytes(vec![0u8; 16], "junk").unwrap_err();
        assert!(matches!(err, Error::FontError(_)));
    }

    #[test]
    fn missing_file_is_a_font_error() {
        let err = Typeface::from_path(Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/font.ttf"));
    }
}
