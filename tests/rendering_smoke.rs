use std::sync::Arc;

use ogpcard::icon::IconResolver;
use ogpcard::rendering::raster::output_size;
use ogpcard::text::WholeLineClassifier;
use ogpcard::{CardConfig, CardRenderer, Error, Locale, SizeKey, ThemeKey};

fn renderer() -> CardRenderer {
    CardRenderer::from_parts(None, IconResolver::offline(), Arc::new(WholeLineClassifier), Locale::En)
}

fn png_size(data: &[u8]) -> (u32, u32) {
    let decoder = png::Decoder::new(data);
    let reader = decoder.read_info().expect("decode");
    let info = reader.info();
    (info.width, info.height)
}

#[test]
fn raster_dimensions_follow_preset_and_density() {
    let r = renderer();
    for size in SizeKey::ALL {
        for density in [1.0f32, 2.0] {
            let config = CardConfig {
                size,
                article_title: "Dimensions".into(),
                ..Default::default()
            };
            let shot = r.render(&config, density).unwrap();
            let preset = ogpcard::presets::resolve_size(size);
            let expected = (
                (preset.width_px as f32 * density).round() as u32,
                (preset.height_px as f32 * density).round() as u32,
            );
            assert_eq!((shot.width, shot.height), expected);
            assert_eq!(png_size(&shot.png_data), expected);
        }
    }
}

#[test]
fn every_theme_renders() {
    let r = renderer();
    for theme in ThemeKey::ALL {
        let config = CardConfig {
            theme,
            ..Default::default()
        };
        let shot = r.render(&config, 1.0).unwrap();
        assert_eq!(&shot.png_data[0..8], b"\x89PNG\r\n\x1a\n");
    }
}

#[test]
fn invalid_density_is_a_configuration_error() {
    let r = renderer();
    for density in [0.0f32, -2.0, f32::NAN, 8.0] {
        assert!(matches!(
            r.render(&CardConfig::default(), density),
            Err(Error::ConfigError(_))
        ));
    }
    assert!(output_size(1200, 630, 4.0).is_ok());
}

#[test]
fn fractional_density_rounds() {
    assert_eq!(output_size(1200, 675, 1.25).unwrap(), (1500, 844));
}

#[test]
fn text_is_drawn_when_a_font_is_available() {
    let face = match ogpcard::font::Typeface::from_system() {
        Ok(face) => Arc::new(face),
        Err(e) => {
            println!("{}; skipping", e);
            return;
        }
    };
    let with_font = CardRenderer::from_parts(
        Some(face),
        IconResolver::offline(),
        Arc::new(WholeLineClassifier),
        Locale::En,
    );
    let config = CardConfig {
        article_title: "Hello".into(),
        ..Default::default()
    };
    let drawn = with_font.render(&config, 1.0).unwrap();
    let blank = renderer().render(&config, 1.0).unwrap();
    assert_eq!((drawn.width, drawn.height), (blank.width, blank.height));
    assert_ne!(drawn.png_data, blank.png_data);
}
