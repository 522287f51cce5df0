//! Size and theme presets
//!
//! Both tables are static data. Lookups by key are total over the closed key
//! enums; only string parsing can fail, and it fails with `ConfigError`.
//!
//! Gradients and decorations are declarative values interpreted by the
//! rasterizer. A theme paints its base gradient first, then each decoration in
//! slice order.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output size selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeKey {
    /// 1200×630, the common OGP size
    #[default]
    Standard,
    /// 1200×675, the 16:9 variant
    Wide,
}

impl SizeKey {
    pub const ALL: [SizeKey; 2] = [SizeKey::Standard, SizeKey::Wide];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeKey::Standard => "standard",
            SizeKey::Wide => "wide",
        }
    }
}

impl fmt::Display for SizeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SizeKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::ConfigError(format!("unknown size preset '{}'", s)))
    }
}

/// Background theme selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKey {
    #[default]
    Purple,
    Blue,
    Green,
    Orange,
    Pink,
    Midnight,
}

impl ThemeKey {
    pub const ALL: [ThemeKey; 6] = [
        ThemeKey::Purple,
        ThemeKey::Blue,
        ThemeKey::Green,
        ThemeKey::Orange,
        ThemeKey::Pink,
        ThemeKey::Midnight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeKey::Purple => "purple",
            ThemeKey::Blue => "blue",
            ThemeKey::Green => "green",
            ThemeKey::Orange => "orange",
            ThemeKey::Pink => "pink",
            ThemeKey::Midnight => "midnight",
        }
    }
}

impl fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ThemeKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::ConfigError(format!("unknown theme preset '{}'", s)))
    }
}

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with a new alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }
}

/// One gradient stop; `offset` is in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

const fn stop(offset: f32, color: Rgba) -> ColorStop {
    ColorStop { offset, color }
}

/// A linear gradient following CSS angle conventions (0° points up, 90° right).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradientSpec {
    pub angle_deg: f32,
    pub stops: &'static [ColorStop],
}

/// A circular radial gradient.
///
/// `center` is expressed as fractions of the canvas width/height and `radius`
/// as a fraction of the canvas width, so the same spec fits every size preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradientSpec {
    pub center: (f32, f32),
    pub radius: f32,
    pub stops: &'static [ColorStop],
}

/// Overlay painted above the base gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoration {
    Radial(RadialGradientSpec),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizePreset {
    pub key: SizeKey,
    pub width_px: u32,
    pub height_px: u32,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemePreset {
    pub key: ThemeKey,
    pub label: &'static str,
    pub base: LinearGradientSpec,
    /// Paint order: later entries paint on top
    pub decorations: &'static [Decoration],
}

static STANDARD: SizePreset = SizePreset {
    key: SizeKey::Standard,
    width_px: 1200,
    height_px: 630,
    label: "1200 × 630 (standard)",
};

static WIDE: SizePreset = SizePreset {
    key: SizeKey::Wide,
    width_px: 1200,
    height_px: 675,
    label: "1200 × 675 (wide)",
};

const fn radial(center: (f32, f32), radius: f32, stops: &'static [ColorStop]) -> Decoration {
    Decoration::Radial(RadialGradientSpec { center, radius, stops })
}

const fn fade(color: Rgba, alpha: u8) -> [ColorStop; 2] {
    [stop(0.0, color.with_alpha(alpha)), stop(1.0, color.with_alpha(0))]
}

static PURPLE_BASE: [ColorStop; 2] = [stop(0.0, Rgba::opaque(0x66, 0x7e, 0xea)), stop(1.0, Rgba::opaque(0x76, 0x4b, 0xa2))];
static PURPLE_HIGHLIGHT: [ColorStop; 2] = fade(Rgba::WHITE, 64);
static PURPLE_ORCHID: [ColorStop; 2] = fade(Rgba::opaque(0xf0, 0x93, 0xfb), 77);

static BLUE_BASE: [ColorStop; 2] = [stop(0.0, Rgba::opaque(0x21, 0x93, 0xb0)), stop(1.0, Rgba::opaque(0x6d, 0xd5, 0xed))];
static BLUE_HIGHLIGHT: [ColorStop; 2] = fade(Rgba::WHITE, 77);

static GREEN_BASE: [ColorStop; 2] = [stop(0.0, Rgba::opaque(0x11, 0x99, 0x8e)), stop(1.0, Rgba::opaque(0x38, 0xef, 0x7d))];
static GREEN_HIGHLIGHT: [ColorStop; 2] = fade(Rgba::WHITE, 51);
static GREEN_LIME: [ColorStop; 2] = fade(Rgba::opaque(0xd4, 0xfc, 0x79), 77);

static ORANGE_BASE: [ColorStop; 2] = [stop(0.0, Rgba::opaque(0xf1, 0x27, 0x11)), stop(1.0, Rgba::opaque(0xf5, 0xaf, 0x19))];
static ORANGE_HALO: [ColorStop; 3] = [
    stop(0.0, Rgba::WHITE.with_alpha(64)),
    stop(0.6, Rgba::WHITE.with_alpha(16)),
    stop(1.0, Rgba::WHITE.with_alpha(0)),
];

static PINK_BASE: [ColorStop; 2] = [stop(0.0, Rgba::opaque(0xee, 0x9c, 0xa7)), stop(1.0, Rgba::opaque(0xff, 0xdd, 0xe1))];

static MIDNIGHT_BASE: [ColorStop; 3] = [
    stop(0.0, Rgba::opaque(0x0f, 0x20, 0x27)),
    stop(0.5, Rgba::opaque(0x20, 0x3a, 0x43)),
    stop(1.0, Rgba::opaque(0x2c, 0x53, 0x64)),
];
static MIDNIGHT_CYAN: [ColorStop; 2] = fade(Rgba::opaque(0x00, 0xd2, 0xff), 64);
static MIDNIGHT_VIOLET: [ColorStop; 2] = fade(Rgba::opaque(0x92, 0x54, 0xff), 64);
static MIDNIGHT_HORIZON: [ColorStop; 2] = fade(Rgba::WHITE, 26);

static PURPLE_DECORATIONS: [Decoration; 2] = [
    radial((0.15, 0.2), 0.35, &PURPLE_HIGHLIGHT),
    radial((0.85, 0.85), 0.4, &PURPLE_ORCHID),
];
static BLUE_DECORATIONS: [Decoration; 1] = [radial((0.8, 0.15), 0.3, &BLUE_HIGHLIGHT)];
static GREEN_DECORATIONS: [Decoration; 2] = [
    radial((0.1, 0.9), 0.35, &GREEN_HIGHLIGHT),
    radial((0.9, 0.1), 0.25, &GREEN_LIME),
];
static ORANGE_DECORATIONS: [Decoration; 1] = [radial((0.75, 0.25), 0.4, &ORANGE_HALO)];
static MIDNIGHT_DECORATIONS: [Decoration; 3] = [
    radial((0.2, 0.25), 0.3, &MIDNIGHT_CYAN),
    radial((0.8, 0.7), 0.35, &MIDNIGHT_VIOLET),
    radial((0.5, 1.0), 0.5, &MIDNIGHT_HORIZON),
];

static PURPLE: ThemePreset = ThemePreset {
    key: ThemeKey::Purple,
    label: "Purple",
    base: LinearGradientSpec { angle_deg: 135.0, stops: &PURPLE_BASE },
    decorations: &PURPLE_DECORATIONS,
};

static BLUE: ThemePreset = ThemePreset {
    key: ThemeKey::Blue,
    label: "Blue",
    base: LinearGradientSpec { angle_deg: 135.0, stops: &BLUE_BASE },
    decorations: &BLUE_DECORATIONS,
};

static GREEN: ThemePreset = ThemePreset {
    key: ThemeKey::Green,
    label: "Green",
    base: LinearGradientSpec { angle_deg: 135.0, stops: &GREEN_BASE },
    decorations: &GREEN_DECORATIONS,
};

static ORANGE: ThemePreset = ThemePreset {
    key: ThemeKey::Orange,
    label: "Orange",
    base: LinearGradientSpec { angle_deg: 135.0, stops: &ORANGE_BASE },
    decorations: &ORANGE_DECORATIONS,
};

static PINK: ThemePreset = ThemePreset {
    key: ThemeKey::Pink,
    label: "Pink",
    base: LinearGradientSpec { angle_deg: 120.0, stops: &PINK_BASE },
    decorations: &[],
};

static MIDNIGHT: ThemePreset = ThemePreset {
    key: ThemeKey::Midnight,
    label: "Midnight",
    base: LinearGradientSpec { angle_deg: 160.0, stops: &MIDNIGHT_BASE },
    decorations: &MIDNIGHT_DECORATIONS,
};

/// Look up the geometry for a size key
pub fn resolve_size(key: SizeKey) -> &'static SizePreset {
    match key {
        SizeKey::Standard => &STANDARD,
        SizeKey::Wide => &WIDE,
    }
}

/// Look up the decoration data for a theme key
pub fn resolve_theme(key: ThemeKey) -> &'static ThemePreset {
    match key {
        ThemeKey::Purple => &PURPLE,
        ThemeKey::Blue => &BLUE,
        ThemeKey::Green => &GREEN,
        ThemeKey::Orange => &ORANGE,
        ThemeKey::Pink => &PINK,
        ThemeKey::Midnight => &MIDNIGHT,
    }
}

/// Resolve a size preset from a user-supplied name
pub fn resolve_size_name(name: &str) -> Result<&'static SizePreset> {
    name.parse::<SizeKey>().map(resolve_size)
}

/// Resolve a theme preset from a user-supplied name
pub fn resolve_theme_name(name: &str) -> Result<&'static ThemePreset> {
    name.parse::<ThemeKey>().map(resolve_theme)
}

pub fn size_presets() -> impl Iterator<Item = &'static SizePreset> {
    SizeKey::ALL.into_iter().map(resolve_size)
}

pub fn theme_presets() -> impl Iterator<Item = &'static ThemePreset> {
    ThemeKey::ALL.into_iter().map(resolve_theme)
}
