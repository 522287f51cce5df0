/// Card layout: turns a resolved card into positioned boxes

use crate::icon::IconSource;
use crate::presets::{
    Decoration, LinearGradientSpec, RadialGradientSpec, Rgba, SizePreset, ThemePreset,
};
use crate::text::{Segment, TextMeasure};
use crate::ResolvedCard;
use unicode_segmentation::UnicodeSegmentation;

// Template metrics at the 1200px reference width; scaled with the canvas.
const REFERENCE_WIDTH: f32 = 1200.0;
const PANEL_INSET: f32 = 48.0;
const PANEL_RADIUS: f32 = 24.0;
const PANEL_PADDING: f32 = 60.0;
const TITLE_PX: f32 = 64.0;
const TITLE_LINE_HEIGHT: f32 = 1.4;
const FOOTER_HEIGHT: f32 = 80.0;
const FOOTER_GAP: f32 = 24.0;
const ICON_DIAMETER: f32 = 72.0;
const ICON_GAP: f32 = 20.0;
const FOOTER_COLUMN_GAP: f32 = 32.0;
const AUTHOR_PX: f32 = 34.0;
const SITE_PX: f32 = 30.0;
const FOOTER_LINE_HEIGHT: f32 = 1.2;
const SITE_MAX_SHARE: f32 = 0.4;

const PANEL_COLOR: Rgba = Rgba::new(255, 255, 255, 242);
const TITLE_COLOR: Rgba = Rgba::opaque(0x1f, 0x29, 0x37);
const AUTHOR_COLOR: Rgba = Rgba::opaque(0x37, 0x41, 0x51);
const SITE_COLOR: Rgba = Rgba::opaque(0x6b, 0x72, 0x80);

const ELLIPSIS: &str = "…";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink by `d` on every side
    pub fn inset(&self, d: f32) -> Rect {
        Rect::new(
            self.x + d,
            self.y + d,
            (self.width - 2.0 * d).max(0.0),
            (self.height - 2.0 * d).max(0.0),
        )
    }

    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f32 = 0.01;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

/// How a box is filled
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Rgba),
    Linear(LinearGradientSpec),
    /// Geometry is relative to the node's rect
    Radial(RadialGradientSpec),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    AuthorName,
    SiteName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    End,
}

/// One positioned line of text; `baseline` is absolute
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub role: TextRole,
    pub lines: Vec<TextLine>,
    pub font_px: f32,
    pub line_height: f32,
    pub color: Rgba,
    pub align: TextAlign,
    /// Lines or characters were dropped to fit the box
    pub truncated: bool,
}

impl TextBlock {
    /// Visible text with lines joined by `\n`
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFit {
    Cover,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageBox {
    pub source: IconSource,
    pub fit: ObjectFit,
    pub clip_circle: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Container {
        fill: Option<Fill>,
        corner_radius: f32,
    },
    Decoration(Fill),
    TextBlock(TextBlock),
    Image(ImageBox),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub rect: Rect,
    pub kind: NodeKind,
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    fn leaf(rect: Rect, kind: NodeKind) -> Self {
        Self {
            rect,
            kind,
            children: Vec::new(),
        }
    }
}

/// The positioned tree for one card
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedLayout {
    pub width: u32,
    pub height: u32,
    pub root: LayoutNode,
}

impl ComposedLayout {
    /// All nodes in paint order (pre-order)
    pub fn nodes(&self) -> Vec<&LayoutNode> {
        let mut out = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            out.push(node);
            for child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    pub fn text_block(&self, role: TextRole) -> Option<&TextBlock> {
        self.nodes().into_iter().find_map(|n| match &n.kind {
            NodeKind::TextBlock(t) if t.role == role => Some(t),
            _ => None,
        })
    }

    pub fn image(&self) -> Option<(&Rect, &ImageBox)> {
        self.nodes().into_iter().find_map(|n| match &n.kind {
            NodeKind::Image(img) => Some((&n.rect, img)),
            _ => None,
        })
    }
}

/// Lay out the fixed card template.
///
/// Pure: the same inputs always produce an identical layout.
pub fn compose(
    card: &ResolvedCard,
    size: &SizePreset,
    theme: &ThemePreset,
    segments: &[Segment],
    measure: &dyn TextMeasure,
) -> ComposedLayout {
    let canvas = Rect::new(0.0, 0.0, size.width_px as f32, size.height_px as f32);
    let unit = canvas.width / REFERENCE_WIDTH;

    let mut background = Vec::with_capacity(theme.decorations.len() + 2);
    background.push(LayoutNode::leaf(
        canvas,
        NodeKind::Decoration(Fill::Linear(theme.base)),
    ));
    for decoration in theme.decorations {
        let fill = match decoration {
            Decoration::Radial(spec) => Fill::Radial(*spec),
        };
        background.push(LayoutNode::leaf(canvas, NodeKind::Decoration(fill)));
    }

    let panel = canvas.inset(PANEL_INSET * unit);
    let content = panel.inset(PANEL_PADDING * unit);

    let footer_h = FOOTER_HEIGHT * unit;
    let footer = Rect::new(content.x, content.bottom() - footer_h, content.width, footer_h);
    let title_rect = Rect::new(
        content.x,
        content.y,
        content.width,
        (footer.y - FOOTER_GAP * unit - content.y).max(0.0),
    );

    let title = layout_title(segments, title_rect, TITLE_PX * unit, measure);
    let footer_node = layout_footer(card, footer, unit, measure);

    background.push(LayoutNode {
        rect: panel,
        kind: NodeKind::Container {
            fill: Some(Fill::Solid(PANEL_COLOR)),
            corner_radius: PANEL_RADIUS * unit,
        },
        children: vec![LayoutNode::leaf(title_rect, NodeKind::TextBlock(title)), footer_node],
    });

    log::debug!(
        "composed {}x{} card with {} decorations",
        size.width_px,
        size.height_px,
        theme.decorations.len()
    );

    ComposedLayout {
        width: size.width_px,
        height: size.height_px,
        root: LayoutNode {
            rect: canvas,
            kind: NodeKind::Container {
                fill: None,
                corner_radius: 0.0,
            },
            children: background,
        },
    }
}

fn layout_title(
    segments: &[Segment],
    rect: Rect,
    font_px: f32,
    measure: &dyn TextMeasure,
) -> TextBlock {
    let line_h = font_px * TITLE_LINE_HEIGHT;
    let mut lines = wrap_segments(segments, rect.width, font_px, measure);

    let max_lines = ((rect.height / line_h).floor() as usize).max(1);
    let mut truncated = false;
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = ellipsize(&format!("{}{}", last.trim_end(), ELLIPSIS), rect.width, font_px, measure);
        }
        truncated = true;
    }

    let block_h = lines.len() as f32 * line_h;
    let top = rect.y + ((rect.height - block_h) / 2.0).max(0.0);
    let baseline_offset = baseline_in_line(line_h, font_px, measure);

    let lines = lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| TextLine {
            width: measure.advance(text.trim_end(), font_px),
            x: rect.x,
            baseline: top + i as f32 * line_h + baseline_offset,
            text,
        })
        .collect();

    TextBlock {
        role: TextRole::Title,
        lines,
        font_px,
        line_height: TITLE_LINE_HEIGHT,
        color: TITLE_COLOR,
        align: TextAlign::Start,
        truncated,
    }
}

fn layout_footer(card: &ResolvedCard, footer: Rect, unit: f32, measure: &dyn TextMeasure) -> LayoutNode {
    let diameter = ICON_DIAMETER * unit;
    let icon = Rect::new(
        footer.x,
        footer.y + (footer.height - diameter) / 2.0,
        diameter,
        diameter,
    );

    let site_px = SITE_PX * unit;
    let site_max = footer.width * SITE_MAX_SHARE;
    let site = single_line(
        TextRole::SiteName,
        &card.site_name,
        footer,
        site_max,
        site_px,
        SITE_COLOR,
        TextAlign::End,
        measure,
    );
    let site_w = site.lines.first().map(|l| l.width).unwrap_or(0.0);

    let author_x = icon.right() + ICON_GAP * unit;
    let author_max =
        (footer.right() - author_x - site_w - FOOTER_COLUMN_GAP * unit).max(0.0);
    let author_rect = Rect::new(author_x, footer.y, author_max, footer.height);
    let author = single_line(
        TextRole::AuthorName,
        &card.author_name,
        author_rect,
        author_max,
        AUTHOR_PX * unit,
        AUTHOR_COLOR,
        TextAlign::Start,
        measure,
    );
    let site_rect = Rect::new(footer.right() - site_w, footer.y, site_w, footer.height);

    LayoutNode {
        rect: footer,
        kind: NodeKind::Container {
            fill: None,
            corner_radius: 0.0,
        },
        children: vec![
            LayoutNode::leaf(
                icon,
                NodeKind::Image(ImageBox {
                    source: card.icon.clone(),
                    fit: ObjectFit::Cover,
                    clip_circle: true,
                }),
            ),
            LayoutNode::leaf(author_rect, NodeKind::TextBlock(author)),
            LayoutNode::leaf(site_rect, NodeKind::TextBlock(site)),
        ],
    }
}

/// One vertically centered line, ellipsized to `max_width`
#[allow(clippy::too_many_arguments)]
fn single_line(
    role: TextRole,
    text: &str,
    row: Rect,
    max_width: f32,
    font_px: f32,
    color: Rgba,
    align: TextAlign,
    measure: &dyn TextMeasure,
) -> TextBlock {
    // Footer fields are single-line; explicit breaks collapse to spaces.
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let fitted = ellipsize(&flat, max_width, font_px, measure);
    let truncated = fitted != flat;
    let width = measure.advance(&fitted, font_px);
    let line_h = font_px * FOOTER_LINE_HEIGHT;
    let top = row.y + (row.height - line_h) / 2.0;
    let x = match align {
        TextAlign::Start => row.x,
        TextAlign::End => row.right() - width,
    };

    TextBlock {
        role,
        lines: vec![TextLine {
            text: fitted,
            x,
            baseline: top + baseline_in_line(line_h, font_px, measure),
            width,
        }],
        font_px,
        line_height: FOOTER_LINE_HEIGHT,
        color,
        align,
        truncated,
    }
}

fn baseline_in_line(line_h: f32, font_px: f32, measure: &dyn TextMeasure) -> f32 {
    let ascent = measure.ascent(font_px);
    let descent = measure.descent(font_px);
    (line_h - (ascent + descent)) / 2.0 + ascent
}

/// Greedy line filling at segment boundaries.
///
/// Trailing whitespace never causes overflow. A segment wider than the whole
/// line is broken between grapheme clusters.
pub fn wrap_segments(
    segments: &[Segment],
    max_width: f32,
    font_px: f32,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let fits = |s: &str| measure.advance(s.trim_end(), font_px) <= max_width;
    let mut lines = Vec::new();
    let mut current = String::new();

    for segment in segments {
        if segment.is_hard_break() {
            lines.push(std::mem::take(&mut current));
            continue;
        }
        if segment.text.is_empty() {
            continue;
        }

        let candidate = format!("{}{}", current, segment.text);
        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(&segment.text) {
            current = segment.text.clone();
            continue;
        }

        for grapheme in segment.text.graphemes(true) {
            let candidate = format!("{}{}", current, grapheme);
            if current.is_empty() || fits(&candidate) {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, grapheme.to_string()));
            }
        }
    }

    lines.push(current);
    lines
}

/// Drop trailing graphemes until `text` fits, marking the cut with an ellipsis
fn ellipsize(text: &str, max_width: f32, font_px: f32, measure: &dyn TextMeasure) -> String {
    if measure.advance(text, font_px) <= max_width {
        return text.to_string();
    }
    let body = text.strip_suffix(ELLIPSIS).unwrap_or(text);
    let mut graphemes: Vec<&str> = body.graphemes(true).collect();
    while !graphemes.is_empty() {
        graphemes.pop();
        let candidate = format!("{}{}", graphemes.concat().trim_end(), ELLIPSIS);
        if measure.advance(&candidate, font_px) <= max_width {
            return candidate;
        }
    }
    if measure.advance(ELLIPSIS, font_px) <= max_width {
        ELLIPSIS.to_string()
    } else {
        String::new()
    }
}
