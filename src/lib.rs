//! ogpcard
//!
//! Composes Open Graph preview cards (site name, article title, author name
//! and icon over a themed gradient) and exports them as PNG images at a fixed
//! preset resolution.
//!
//! # Pipeline
//!
//! - [`presets`]: size and theme catalogs
//! - [`text`]: phrase-aware title segmentation
//! - [`rendering`]: layout composition, display list, rasterization
//! - [`export`]: single-flight export with artifact delivery
//! - [`preview`]: shrink-to-fit preview rendering, never used for export
//!
//! # Example
//!
//! ```no_run
//! use ogpcard::{CardConfig, CardRenderer, RenderOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let renderer = CardRenderer::new(&RenderOptions::default())?;
//! let config = CardConfig {
//!     article_title: "Hello\nWorld".to_string(),
//!     author_name: "A".to_string(),
//!     ..Default::default()
//! };
//! let shot = renderer.render(&config, 1.0)?;
//! assert_eq!((shot.width, shot.height), (1200, 630));
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod export;
pub mod font;
pub mod icon;
pub mod presets;
pub mod preview;
pub mod rendering;
pub mod text;

pub use export::{ArtifactSink, DirectorySink, ExportArtifact, ExportController, ExportState, MemorySink};
pub use icon::IconSource;
pub use presets::{SizeKey, ThemeKey};
pub use rendering::{CardRenderer, Screenshot};

/// User-editable card fields.
///
/// Every field has a default, so partial JSON documents deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardConfig {
    pub site_name: String,
    pub article_title: String,
    pub author_name: String,
    /// URL, `data:` URI or local path; empty selects the bundled icon
    pub author_icon_url: String,
    #[serde(rename = "sizeKey", alias = "size")]
    pub size: SizeKey,
    #[serde(rename = "themeKey", alias = "theme")]
    pub theme: ThemeKey,
}

impl CardConfig {
    /// Substitute placeholders for empty text fields and classify the icon
    pub fn resolve(&self, locale: Locale) -> ResolvedCard {
        let pick = |value: &str, placeholder: &str| {
            if value.trim().is_empty() {
                placeholder.to_string()
            } else {
                value.to_string()
            }
        };
        ResolvedCard {
            site_name: pick(&self.site_name, locale.site_placeholder()),
            article_title: pick(&self.article_title, locale.title_placeholder()),
            author_name: pick(&self.author_name, locale.author_placeholder()),
            icon: IconSource::parse(&self.author_icon_url),
            size: self.size,
            theme: self.theme,
        }
    }
}

/// Language used for placeholder text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

impl Locale {
    pub fn site_placeholder(self) -> &'static str {
        match self {
            Locale::En => "Site name",
            Locale::Ja => "サイト名",
        }
    }

    pub fn title_placeholder(self) -> &'static str {
        match self {
            Locale::En => "Article title",
            Locale::Ja => "記事のタイトル",
        }
    }

    pub fn author_placeholder(self) -> &'static str {
        match self {
            Locale::En => "Author",
            Locale::Ja => "著者名",
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ja" => Ok(Locale::Ja),
            other => Err(Error::ConfigError(format!("unknown locale '{}'", other))),
        }
    }
}

/// A configuration with every text field populated
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCard {
    pub site_name: String,
    pub article_title: String,
    pub author_name: String,
    pub icon: IconSource,
    pub size: SizeKey,
    pub theme: ThemeKey,
}

/// Rendering options
///
/// The defaults render at density 1.0 with English placeholders, discover a
/// system font and give remote icons 10 seconds.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Pixel density multiplier, in (0, 4]
    pub density: f32,
    pub locale: Locale,
    /// Font file; `None` searches the system
    pub font_path: Option<PathBuf>,
    /// Timeout for remote icon fetches in milliseconds
    pub icon_timeout_ms: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            density: 1.0,
            locale: Locale::En,
            font_path: None,
            icon_timeout_ms: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = RenderOptions::default();
        assert_eq!(opts.density, 1.0);
        assert_eq!(opts.locale, Locale::En);
        assert!(opts.font_path.is_none());
    }

    #[test]
    fn resolve_fills_placeholders() {
        let cfg = CardConfig {
            article_title: "Hello".into(),
            author_name: "  ".into(),
            ..Default::default()
        };
        let card = cfg.resolve(Locale::Ja);
        assert_eq!(card.article_title, "Hello");
        assert_eq!(card.author_name, "著者名");
        assert_eq!(card.site_name, "サイト名");
        assert!(card.icon.is_default());
    }

    #[test]
    fn config_from_partial_json() {
        let cfg: CardConfig =
            serde_json::from_str(r#"{"articleTitle":"Hi","sizeKey":"wide","themeKey":"green"}"#).unwrap();
        assert_eq!(cfg.article_title, "Hi");
        assert_eq!(cfg.size, SizeKey::Wide);
        assert_eq!(cfg.theme, ThemeKey::Green);
        assert!(cfg.site_name.is_empty());
    }

    #[test]
    fn unknown_theme_in_json_is_rejected() {
        let res: std::result::Result<CardConfig, _> = serde_json::from_str(r#"{"themeKey":"plaid"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn locale_parsing() {
        assert_eq!("JA".parse::<Locale>().unwrap(), Locale::Ja);
        assert!(matches!("fr".parse::<Locale>(), Err(Error::ConfigError(_))));
    }
}
