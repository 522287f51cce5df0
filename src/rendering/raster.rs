/// Rasterizer: executes the display list with tiny-skia and encodes PNG

use crate::font::Typeface;
use crate::icon::{cover_square, IconResolver};
use crate::presets::{ColorStop, LinearGradientSpec, RadialGradientSpec, Rgba};
use crate::rendering::layout::{ComposedLayout, Fill, Rect};
use crate::rendering::paint::{build_display_list, PaintCommand};
use crate::rendering::Screenshot;
use crate::{Error, Result};
use image::RgbaImage;
use std::sync::Arc;
use tiny_skia::{
    Color, FillRule, FilterQuality, GradientStop, IntSize, LinearGradient, Mask, Paint, Path,
    PathBuilder, Pixmap, PixmapPaint, Point, PremultipliedColorU8, RadialGradient, Shader,
    SpreadMode, Transform,
};

/// Highest accepted pixel density
pub const MAX_DENSITY: f32 = 4.0;

/// Physical output size for a logical target at `density`
pub fn output_size(target_width: u32, target_height: u32, density: f32) -> Result<(u32, u32)> {
    if !(density.is_finite() && density > 0.0 && density <= MAX_DENSITY) {
        return Err(Error::ConfigError(format!(
            "pixel density must be in (0, {}], got {}",
            MAX_DENSITY, density
        )));
    }
    if target_width == 0 || target_height == 0 {
        return Err(Error::ConfigError(format!(
            "target size must be non-zero, got {}x{}",
            target_width, target_height
        )));
    }
    let w = (target_width as f32 * density).round() as u32;
    let h = (target_height as f32 * density).round() as u32;
    if w == 0 || h == 0 {
        return Err(Error::ConfigError(format!(
            "density {} collapses {}x{} to nothing",
            density, target_width, target_height
        )));
    }
    Ok((w, h))
}

pub struct Rasterizer {
    typeface: Option<Arc<Typeface>>,
    icons: IconResolver,
}

impl Rasterizer {
    pub fn new(typeface: Option<Arc<Typeface>>, icons: IconResolver) -> Self {
        Self { typeface, icons }
    }

    pub fn typeface(&self) -> Option<&Arc<Typeface>> {
        self.typeface.as_ref()
    }

    /// Render `layout` onto a `target_width × target_height` logical canvas
    /// at `density`, returning PNG bytes.
    ///
    /// The output is always exactly `round(target × density)` pixels on each
    /// axis, whatever scale any preview happens to use.
    pub fn rasterize(
        &self,
        layout: &ComposedLayout,
        target_width: u32,
        target_height: u32,
        density: f32,
    ) -> Result<Screenshot> {
        let (width, height) = output_size(target_width, target_height, density)?;
        let sx = width as f32 / layout.width as f32;
        let sy = height as f32 / layout.height as f32;

        let commands = build_display_list(layout);

        // Resolve every image before touching pixels.
        let icons: Vec<Option<RgbaImage>> = commands
            .iter()
            .filter_map(|c| match c {
                PaintCommand::Image { source, .. } => Some(self.icons.resolve_or_default(source)),
                _ => None,
            })
            .collect();
        let mut icons = icons.into_iter();

        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            Error::RasterizationError(format!("cannot allocate a {}x{} canvas", width, height))
        })?;
        let transform = Transform::from_scale(sx, sy);
        let mut warned_font = false;

        for command in &commands {
            match command {
                PaintCommand::FillRect {
                    rect,
                    fill,
                    corner_radius,
                } => fill_rect(&mut pixmap, rect, fill, *corner_radius, transform),
                PaintCommand::Text {
                    x,
                    baseline,
                    text,
                    font_px,
                    color,
                } => match &self.typeface {
                    Some(face) => draw_text(&mut pixmap, face, text, *x, *baseline, *font_px, *color, sx, sy),
                    None => {
                        if !warned_font {
                            log::warn!("no font loaded; text is not rendered");
                            warned_font = true;
                        }
                    }
                },
                PaintCommand::Image {
                    rect, clip_circle, ..
                } => {
                    if let Some(Some(img)) = icons.next() {
                        draw_image(&mut pixmap, &img, rect, *clip_circle, sx, sy);
                    }
                }
            }
        }

        let png_data = pixmap
            .encode_png()
            .map_err(|e| Error::RasterizationError(format!("PNG encoding failed: {}", e)))?;

        log::debug!("rasterized {}x{} ({} bytes)", width, height, png_data.len());
        Ok(Screenshot {
            width,
            height,
            png_data,
        })
    }
}

fn to_color(c: Rgba) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn to_stops(stops: &[ColorStop]) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|s| GradientStop::new(s.offset, to_color(s.color)))
        .collect()
}

fn first_color(stops: &[ColorStop]) -> Color {
    stops
        .first()
        .map(|s| to_color(s.color))
        .unwrap_or(Color::TRANSPARENT)
}

/// CSS linear-gradient geometry: the gradient line passes through the box
/// center and is long enough that the corners get the end colors.
fn linear_shader(rect: &Rect, spec: &LinearGradientSpec) -> Shader<'static> {
    let angle = spec.angle_deg.to_radians();
    let (dx, dy) = (angle.sin(), -angle.cos());
    let half = (rect.width * dx.abs() + rect.height * dy.abs()) / 2.0;
    let cx = rect.x + rect.width / 2.0;
    let cy = rect.y + rect.height / 2.0;
    LinearGradient::new(
        Point::from_xy(cx - dx * half, cy - dy * half),
        Point::from_xy(cx + dx * half, cy + dy * half),
        to_stops(spec.stops),
        SpreadMode::Pad,
        Transform::identity(),
    )
    .unwrap_or(Shader::SolidColor(first_color(spec.stops)))
}

fn radial_shader(rect: &Rect, spec: &RadialGradientSpec) -> Shader<'static> {
    let center = Point::from_xy(
        rect.x + spec.center.0 * rect.width,
        rect.y + spec.center.1 * rect.height,
    );
    RadialGradient::new(
        center,
        center,
        spec.radius * rect.width,
        to_stops(spec.stops),
        SpreadMode::Pad,
        Transform::identity(),
    )
    .unwrap_or(Shader::SolidColor(first_color(spec.stops)))
}

fn rect_path(rect: &Rect, radius: f32) -> Option<Path> {
    let radius = radius.min(rect.width / 2.0).min(rect.height / 2.0);
    if radius <= 0.0 {
        let r = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)?;
        return Some(PathBuilder::from_rect(r));
    }

    // Cubic approximation of a quarter circle
    let k = 0.552_284_8 * radius;
    let (x, y, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
    let mut pb = PathBuilder::new();
    pb.move_to(x + radius, y);
    pb.line_to(r - radius, y);
    pb.cubic_to(r - radius + k, y, r, y + radius - k, r, y + radius);
    pb.line_to(r, b - radius);
    pb.cubic_to(r, b - radius + k, r - radius + k, b, r - radius, b);
    pb.line_to(x + radius, b);
    pb.cubic_to(x + radius - k, b, x, b - radius + k, x, b - radius);
    pb.line_to(x, y + radius);
    pb.cubic_to(x, y + radius - k, x + radius - k, y, x + radius, y);
    pb.close();
    pb.finish()
}

fn fill_rect(pixmap: &mut Pixmap, rect: &Rect, fill: &Fill, radius: f32, transform: Transform) {
    let Some(path) = rect_path(rect, radius) else {
        return;
    };
    let shader = match fill {
        Fill::Solid(c) => Shader::SolidColor(to_color(*c)),
        Fill::Linear(spec) => linear_shader(rect, spec),
        Fill::Radial(spec) => radial_shader(rect, spec),
    };
    let paint = Paint {
        shader,
        anti_alias: true,
        ..Paint::default()
    };
    pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
}

fn premultiplied(r: u8, g: u8, b: u8, a: u8) -> PremultipliedColorU8 {
    let mul = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
    PremultipliedColorU8::from_rgba(mul(r), mul(g), mul(b), a)
        .unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

#[allow(clippy::too_many_arguments)]
fn draw_text(
    pixmap: &mut Pixmap,
    face: &Typeface,
    text: &str,
    x: f32,
    baseline: f32,
    font_px: f32,
    color: Rgba,
    sx: f32,
    sy: f32,
) {
    use crate::text::TextMeasure;

    let device_px = font_px * sy;
    let device_baseline = baseline * sy;
    let mut pen = x;
    let mut buf = [0u8; 4];

    for c in text.chars() {
        if !c.is_whitespace() && !face.has_glyph(c) {
            log::debug!("{} has no glyph for {:?}", face.source(), c);
        }
        let (metrics, coverage) = face.rasterize(c, device_px);
        if metrics.width > 0 && metrics.height > 0 {
            if let Some(mut glyph) = Pixmap::new(metrics.width as u32, metrics.height as u32) {
                for (dst, &cov) in glyph.pixels_mut().iter_mut().zip(coverage.iter()) {
                    let a = ((color.a as u16 * cov as u16 + 127) / 255) as u8;
                    *dst = premultiplied(color.r, color.g, color.b, a);
                }
                let gx = (pen * sx).round() as i32 + metrics.xmin;
                let gy = (device_baseline - (metrics.height as i32 + metrics.ymin) as f32).round() as i32;
                pixmap.draw_pixmap(
                    gx,
                    gy,
                    glyph.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
            }
        }
        pen += face.advance(c.encode_utf8(&mut buf), font_px);
    }
}

fn draw_image(pixmap: &mut Pixmap, img: &RgbaImage, rect: &Rect, clip_circle: bool, sx: f32, sy: f32) {
    let left = rect.x * sx;
    let top = rect.y * sy;
    let side = (rect.width * sx).round().max(1.0) as u32;
    let fitted = cover_square(img, side);

    let data: Vec<u8> = fitted
        .pixels()
        .flat_map(|p| {
            let c = premultiplied(p.0[0], p.0[1], p.0[2], p.0[3]);
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    let Some(icon) = IntSize::from_wh(side, side).and_then(|size| Pixmap::from_vec(data, size)) else {
        log::warn!("icon pixmap could not be built; leaving it transparent");
        return;
    };

    let mask = if clip_circle {
        let half = side as f32 / 2.0;
        let circle = PathBuilder::from_circle(left.round() + half, top.round() + half, half);
        match (Mask::new(pixmap.width(), pixmap.height()), circle) {
            (Some(mut mask), Some(circle)) => {
                mask.fill_path(&circle, FillRule::Winding, true, Transform::identity());
                Some(mask)
            }
            _ => None,
        }
    } else {
        None
    };

    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(
        left.round() as i32,
        top.round() as i32,
        icon.as_ref(),
        &paint,
        Transform::identity(),
        mask.as_ref(),
    );
}
