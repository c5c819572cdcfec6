//! Computed-style normalization.
//!
//! Turns the extractor's style bag into the sparse IR vocabulary. Only
//! values that differ from what a design tool would assume by default are
//! kept, and every length is rounded to two decimals so sub-pixel noise
//! from the browser does not show up as a diff.

use crate::ir::color::{normalize_css_color, round_to};
use crate::ir::raw::{RawLayoutDescriptor, RawNode, RawStyles};
use crate::ir::{
    AutoLayout, Border, BorderStyle, CornerRadii, CounterAlign, Direction, PrimaryAlign, Shadow,
    Styles, TextAlign, TextStyle,
};

use super::gradient::parse_css_gradient;

const DEFAULT_SHADOW_COLOR: &str = "rgba(0, 0, 0, 0.25)";

/// Rounds a pixel length to two decimals.
pub fn px(value: f64) -> f64 {
    round_to(value, 2)
}

/// Builds the sparse style bag of a node.
pub fn normalize_styles(node: &RawNode) -> Styles {
    let raw = &node.styles;
    Styles {
        background_color: raw.background_color.as_deref().and_then(normalize_css_color),
        gradient: raw.background_image.as_deref().and_then(parse_css_gradient),
        opacity: raw
            .opacity
            .map(|o| round_to(o.clamp(0.0, 1.0), 3))
            .filter(|o| *o < 1.0),
        blend_mode: raw.mix_blend_mode.as_deref().and_then(blend_mode),
        border_radius: raw
            .border_radius
            .map(|r| {
                let c = r.corners();
                CornerRadii {
                    top_left: px(c.top_left),
                    top_right: px(c.top_right),
                    bottom_right: px(c.bottom_right),
                    bottom_left: px(c.bottom_left),
                }
            })
            .filter(|c| !c.is_zero()),
        border: border(raw),
        shadow: shadows(raw),
        blur: node
            .filter
            .get("blur")
            .and_then(|arg| parse_length(arg))
            .map(px)
            .filter(|b| *b > 0.0),
        rotation: node
            .transform
            .and_then(|t| t.rotation)
            .map(|r| round_to(r, 2))
            .filter(|r| *r != 0.0),
        clips_content: raw.clips_content(),
    }
}

/// Maps a CSS `mix-blend-mode` to the design-tool enum spelling.
fn blend_mode(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("normal") {
        return None;
    }
    Some(value.to_ascii_uppercase().replace('-', "_"))
}

fn border(raw: &RawStyles) -> Option<Border> {
    let width = raw.border_width.map(px).filter(|w| *w > 0.0)?;
    let style = raw
        .border_style
        .as_deref()
        .map(|s| s.trim().to_ascii_lowercase())
        .unwrap_or_default();
    let style = match style.as_str() {
        "none" | "hidden" => return None,
        "dashed" | "dotted" => BorderStyle::Dashed,
        _ => BorderStyle::Solid,
    };
    let color = match raw.border_color.as_deref() {
        Some(c) => normalize_css_color(c)?,
        None => TextStyle::DEFAULT_COLOR.to_string(),
    };
    Some(Border {
        width,
        color,
        style,
    })
}

fn shadows(raw: &RawStyles) -> Vec<Shadow> {
    raw.shadow
        .iter()
        .filter_map(|s| {
            let color = match s.color.as_deref() {
                Some(c) => normalize_css_color(c)?,
                None => DEFAULT_SHADOW_COLOR.to_string(),
            };
            Some(Shadow {
                offset_x: px(s.offset_x),
                offset_y: px(s.offset_y),
                blur: px(s.blur.max(0.0)),
                spread: px(s.spread),
                color,
                inset: s.inset,
            })
        })
        .collect()
}

/// Parses `4px` or a bare number.
fn parse_length(arg: &str) -> Option<f64> {
    let arg = arg.trim();
    arg.strip_suffix("px").unwrap_or(arg).trim().parse().ok()
}

/// Builds the typography of a TEXT node.
pub fn text_style(raw: &RawStyles, characters: &str) -> TextStyle {
    let mut text = TextStyle::new(characters);
    if let Some(size) = raw.font_size.filter(|s| *s > 0.0) {
        text.font_size = px(size);
    }
    if let Some(family) = raw.font_family.as_deref().and_then(primary_font_family) {
        text.font_family = family;
    }
    if let Some(weight) = raw.font_weight {
        text.font_weight = weight.round().clamp(1.0, 1000.0) as u16;
    }
    text.line_height = raw.line_height.filter(|h| *h > 0.0).map(px);
    text.letter_spacing = raw.letter_spacing.map(px).unwrap_or(0.0);
    text.align = raw
        .text_align
        .as_deref()
        .map(text_align)
        .unwrap_or_default();
    if let Some(color) = raw.color.as_deref().and_then(normalize_css_color) {
        text.color = color;
    }
    text
}

/// First family of a CSS font stack, unquoted.
fn primary_font_family(stack: &str) -> Option<String> {
    stack
        .split(',')
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
        .find(|f| !f.is_empty())
        .map(str::to_string)
}

fn text_align(value: &str) -> TextAlign {
    match value.trim().to_ascii_lowercase().as_str() {
        "center" => TextAlign::Center,
        "right" | "end" => TextAlign::Right,
        "justify" => TextAlign::Justified,
        _ => TextAlign::Left,
    }
}

/// Maps a flex or grid container to an auto-layout descriptor.
pub fn auto_layout(descriptor: &RawLayoutDescriptor, styles: &RawStyles) -> Option<AutoLayout> {
    if descriptor.is_mapped() {
        return Some(mapped_auto_layout(descriptor, styles));
    }
    let [top, right, bottom, left] = styles.padding().map(px);
    let mut layout = AutoLayout {
        padding_top: top,
        padding_right: right,
        padding_bottom: bottom,
        padding_left: left,
        primary_align: descriptor
            .justify_content
            .as_deref()
            .map(primary_align)
            .unwrap_or_default(),
        counter_align: descriptor
            .align_items
            .as_deref()
            .map(counter_align)
            .unwrap_or_default(),
        ..Default::default()
    };

    if descriptor.is_flex() {
        let vertical = descriptor
            .flex_direction
            .as_deref()
            .is_some_and(|d| d.trim().starts_with("column"));
        let (direction, axis_gap) = if vertical {
            (Direction::Vertical, descriptor.row_gap)
        } else {
            (Direction::Horizontal, descriptor.column_gap)
        };
        layout.direction = direction;
        layout.spacing = px(axis_gap.or(descriptor.gap).unwrap_or(0.0));
        layout.wrap = descriptor
            .flex_wrap
            .as_deref()
            .is_some_and(|w| w.trim().starts_with("wrap"));
    } else if descriptor.is_grid() {
        // Grids have no managed-layout equivalent; a wrapping row is closest.
        layout.direction = Direction::Horizontal;
        layout.spacing = px(descriptor.column_gap.or(descriptor.gap).unwrap_or(0.0));
        layout.wrap = true;
    } else {
        return None;
    }
    Some(layout)
}

/// Descriptor already expressed in design-tool terms. Padding sides the
/// descriptor leaves out fall back to the computed styles.
fn mapped_auto_layout(descriptor: &RawLayoutDescriptor, styles: &RawStyles) -> AutoLayout {
    let side = |mapped: Option<f64>, computed: Option<f64>| px(mapped.or(computed).unwrap_or(0.0));
    AutoLayout {
        direction: match descriptor.direction.as_deref().map(str::trim) {
            Some(d) if d.eq_ignore_ascii_case("VERTICAL") => Direction::Vertical,
            _ => Direction::Horizontal,
        },
        spacing: px(descriptor.spacing.unwrap_or(0.0)),
        padding_top: side(descriptor.padding_top, styles.padding_top),
        padding_right: side(descriptor.padding_right, styles.padding_right),
        padding_bottom: side(descriptor.padding_bottom, styles.padding_bottom),
        padding_left: side(descriptor.padding_left, styles.padding_left),
        primary_align: match upper(descriptor.primary_align.as_deref()).as_str() {
            "CENTER" => PrimaryAlign::Center,
            "MAX" => PrimaryAlign::Max,
            "SPACE_BETWEEN" => PrimaryAlign::SpaceBetween,
            _ => PrimaryAlign::Min,
        },
        counter_align: match upper(descriptor.counter_align.as_deref()).as_str() {
            "CENTER" => CounterAlign::Center,
            "MAX" => CounterAlign::Max,
            "BASELINE" => CounterAlign::Baseline,
            // STRETCH has no counterpart.
            _ => CounterAlign::Min,
        },
        wrap: descriptor.wrap,
    }
}

fn upper(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_ascii_uppercase()
}

fn primary_align(value: &str) -> PrimaryAlign {
    match value.trim() {
        "center" => PrimaryAlign::Center,
        "flex-end" | "end" | "right" => PrimaryAlign::Max,
        "space-between" | "space-around" | "space-evenly" => PrimaryAlign::SpaceBetween,
        _ => PrimaryAlign::Min,
    }
}

fn counter_align(value: &str) -> CounterAlign {
    match value.trim() {
        "center" => CounterAlign::Center,
        "flex-end" | "end" => CounterAlign::Max,
        "baseline" | "first baseline" | "last baseline" => CounterAlign::Baseline,
        _ => CounterAlign::Min,
    }
}
