//! Card rendering: layout composition, display list, rasterization

pub mod layout;
pub mod paint;
pub mod raster;

use crate::font::Typeface;
use crate::icon::{default_fetcher, IconResolver};
use crate::presets::{resolve_size, resolve_theme};
use crate::text::{default_classifier, segment_title, FixedAdvance, PhraseClassifier, TextMeasure};
use crate::{CardConfig, Locale, RenderOptions, Result};
use layout::ComposedLayout;
use raster::Rasterizer;
use std::sync::Arc;
use std::time::Duration;

/// An encoded PNG raster
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

/// Runs the whole pipeline for one card: placeholders, segmentation,
/// composition and rasterization.
pub struct CardRenderer {
    rasterizer: Rasterizer,
    classifier: Arc<dyn PhraseClassifier>,
    locale: Locale,
}

impl CardRenderer {
    /// Build a renderer from options.
    ///
    /// An explicit `font_path` that cannot be loaded is a `FontError`. When no
    /// path is given, system discovery is attempted and a miss only disables
    /// text drawing.
    pub fn new(options: &RenderOptions) -> Result<Self> {
        let typeface = match &options.font_path {
            Some(path) => Some(Arc::new(Typeface::from_path(path)?)),
            None => match Typeface::from_system() {
                Ok(face) => Some(Arc::new(face)),
                Err(e) => {
                    log::warn!("{}", e);
                    None
                }
            },
        };
        let icons = IconResolver::new(default_fetcher(Duration::from_millis(
            options.icon_timeout_ms,
        )));
        Ok(Self::from_parts(
            typeface,
            icons,
            default_classifier(),
            options.locale,
        ))
    }

    pub fn from_parts(
        typeface: Option<Arc<Typeface>>,
        icons: IconResolver,
        classifier: Arc<dyn PhraseClassifier>,
        locale: Locale,
    ) -> Self {
        Self {
            rasterizer: Rasterizer::new(typeface, icons),
            classifier,
            locale,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn has_font(&self) -> bool {
        self.rasterizer.typeface().is_some()
    }

    /// Compose the layout for `config` at its preset size
    pub fn compose(&self, config: &CardConfig) -> ComposedLayout {
        let card = config.resolve(self.locale);
        let segments = segment_title(&card.article_title, self.classifier.as_ref());
        let fallback = FixedAdvance::default();
        let measure: &dyn TextMeasure = match self.rasterizer.typeface() {
            Some(face) => &**face,
            None => &fallback,
        };
        layout::compose(
            &card,
            resolve_size(card.size),
            resolve_theme(card.theme),
            &segments,
            measure,
        )
    }

    /// Render at the full preset size times `density`
    pub fn render(&self, config: &CardConfig, density: f32) -> Result<Screenshot> {
        let layout = self.compose(config);
        self.rasterizer
            .rasterize(&layout, layout.width, layout.height, density)
    }

    /// Render onto an arbitrary logical target
    pub fn render_to(
        &self,
        config: &CardConfig,
        target_width: u32,
        target_height: u32,
        density: f32,
    ) -> Result<Screenshot> {
        let layout = self.compose(config);
        self.rasterizer
            .rasterize(&layout, target_width, target_height, density)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::SizeKey;
    use crate::text::WholeLineClassifier;

    fn renderer(locale: Locale) -> CardRenderer {
        CardRenderer::from_parts(None, IconResolver::offline(), Arc::new(WholeLineClassifier), locale)
    }

    #[test]
    fn render_uses_preset_dimensions() {
        let r = renderer(Locale::En);
        let cfg = CardConfig {
            size: SizeKey::Wide,
            ..Default::default()
        };
        let shot = r.render(&cfg, 1.0).unwrap();
        assert_eq!((shot.width, shot.height), (1200, 675));
        assert!(!r.has_font());
    }

    #[test]
    fn placeholders_follow_the_locale() {
        let cfg = CardConfig::default();
        let en = renderer(Locale::En).compose(&cfg);
        let ja = renderer(Locale::Ja).compose(&cfg);
        let title = |l: &ComposedLayout| {
            l.text_block(layout::TextRole::Title)
                .map(|b| b.text())
                .unwrap_or_default()
        };
        assert_ne!(title(&en), title(&ja));
    }

    #[test]
    fn explicit_missing_font_is_an_error() {
        let options = RenderOptions {
            font_path: Some("/nonexistent/font.ttf".into()),
            ..RenderOptions::default()
        };
        assert!(matches!(
            CardRenderer::new(&options),
            Err(crate::Error::FontError(_))
        ));
    }
}
