//! Shrink-to-fit preview.
//!
//! A preview is rendered from a fresh layout at a reduced logical size. It is
//! informational only: export never reads preview output and always renders
//! at the full preset resolution.

use crate::rendering::{CardRenderer, Screenshot};
use crate::{CardConfig, Error, Result};

/// Widest preview, in logical pixels
pub const MAX_PREVIEW_WIDTH: u32 = 600;

/// Display scale for a canvas shown in `available_width` logical pixels.
///
/// Never enlarges and never exceeds [`MAX_PREVIEW_WIDTH`].
pub fn preview_scale(canvas_width: u32, available_width: u32) -> f32 {
    if canvas_width == 0 {
        return 1.0;
    }
    let shown = available_width.min(MAX_PREVIEW_WIDTH) as f32;
    (shown / canvas_width as f32).min(1.0)
}

/// Render a preview of `config` sized for `available_width`
pub fn render_preview(
    renderer: &CardRenderer,
    config: &CardConfig,
    available_width: u32,
) -> Result<Screenshot> {
    if available_width == 0 {
        return Err(Error::ConfigError("preview width must be non-zero".into()));
    }
    let layout = renderer.compose(config);
    let scale = preview_scale(layout.width, available_width);
    let width = ((layout.width as f32 * scale).round() as u32).max(1);
    let height = ((layout.height as f32 * scale).round() as u32).max(1);
    log::debug!("preview {}x{} at scale {:.3}", width, height, scale);
    renderer.render_to(config, width, height, 1.0)
}
