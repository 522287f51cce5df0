/// Flat paint command list built from a composed layout

use crate::icon::IconSource;
use crate::presets::Rgba;
use crate::rendering::layout::{ComposedLayout, Fill, NodeKind, Rect};

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    FillRect {
        rect: Rect,
        fill: Fill,
        corner_radius: f32,
    },
    Text {
        x: f32,
        baseline: f32,
        text: String,
        font_px: f32,
        color: Rgba,
    },
    Image {
        rect: Rect,
        source: IconSource,
        clip_circle: bool,
    },
}

/// Flatten the layout tree in paint order: a node before its children,
/// siblings in order.
pub fn build_display_list(layout: &ComposedLayout) -> Vec<PaintCommand> {
    let mut commands = Vec::new();
    for node in layout.nodes() {
        match &node.kind {
            NodeKind::Container {
                fill: Some(fill),
                corner_radius,
            } => commands.push(PaintCommand::FillRect {
                rect: node.rect,
                fill: fill.clone(),
                corner_radius: *corner_radius,
            }),
            NodeKind::Container { fill: None, .. } => {}
            NodeKind::Decoration(fill) => commands.push(PaintCommand::FillRect {
                rect: node.rect,
                fill: fill.clone(),
                corner_radius: 0.0,
            }),
            NodeKind::TextBlock(block) => {
                for line in block.lines.iter().filter(|l| !l.text.trim().is_empty()) {
                    commands.push(PaintCommand::Text {
                        x: line.x,
                        baseline: line.baseline,
                        text: line.text.trim_end().to_string(),
                        font_px: block.font_px,
                        color: block.color,
                    });
                }
            }
            NodeKind::Image(img) => commands.push(PaintCommand::Image {
                rect: node.rect,
                source: img.source.clone(),
                clip_circle: img.clip_circle,
            }),
        }
    }
    commands
}
