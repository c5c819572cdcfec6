//! Paint and effect conversion from design-tool values to IR styles.

use crate::ir::color::{round_to, Rgba};
use crate::ir::design::{DesignColor, Effect, Paint};
use crate::ir::{ColorStop, Gradient, GradientKind, ImageRef, ScaleMode, Shadow};

/// CSS angle used when a linear gradient has no usable handles.
const DEFAULT_LINEAR_ANGLE: f64 = 180.0;

const DEFAULT_SHADOW_COLOR: DesignColor = DesignColor {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.25,
};

/// Canonical color of a paint, with the paint opacity folded into alpha.
fn paint_color(color: DesignColor, opacity: Option<f64>) -> Rgba {
    Rgba::from_unit(color.r, color.g, color.b, color.a * opacity.unwrap_or(1.0))
}

/// The first visible paint of the given kind.
pub fn first_visible<'a>(paints: &'a [Paint], kind: &str) -> Option<&'a Paint> {
    paints.iter().find(|p| p.visible && p.paint_type == kind)
}

/// Canonical color of the first visible solid paint, if it is not fully
/// transparent.
pub fn solid_color(paints: &[Paint]) -> Option<String> {
    let paint = first_visible(paints, "SOLID")?;
    let color = paint_color(paint.color.unwrap_or_default(), paint.opacity);
    if color.is_transparent() {
        None
    } else {
        Some(color.to_string())
    }
}

/// The first visible gradient paint as an IR gradient.
pub fn gradient(paints: &[Paint]) -> Option<Gradient> {
    paints.iter().filter(|p| p.visible).find_map(|paint| {
        let kind = match paint.paint_type.as_str() {
            "GRADIENT_LINEAR" => GradientKind::Linear,
            "GRADIENT_RADIAL" => GradientKind::Radial,
            "GRADIENT_ANGULAR" => GradientKind::Angular,
            "GRADIENT_DIAMOND" => GradientKind::Diamond,
            _ => return None,
        };
        if paint.gradient_stops.len() < 2 {
            return None;
        }
        let stops = paint
            .gradient_stops
            .iter()
            .map(|stop| {
                (
                    paint_color(stop.color, paint.opacity).to_string(),
                    stop.position.map(|p| p.clamp(0.0, 1.0)),
                )
            })
            .collect();
        let angle = match kind {
            GradientKind::Linear => Some(handle_angle(paint).unwrap_or(DEFAULT_LINEAR_ANGLE)),
            _ => None,
        };
        Some(Gradient {
            kind,
            angle,
            stops: ColorStop::distribute(stops),
        })
    })
}

/// CSS angle of the start → end handle vector; y grows downwards.
fn handle_angle(paint: &Paint) -> Option<f64> {
    let [start, end, ..] = paint.gradient_handle_positions.as_slice() else {
        return None;
    };
    let (dx, dy) = (end.x - start.x, end.y - start.y);
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let degrees = dx.atan2(-dy).to_degrees().rem_euclid(360.0);
    Some(round_to(degrees, 2) % 360.0)
}

/// The first visible image paint as an image reference.
pub fn image(paints: &[Paint]) -> Option<ImageRef> {
    let paint = first_visible(paints, "IMAGE")?;
    let scale_mode = match paint.scale_mode.as_deref() {
        Some("FIT") => ScaleMode::Fit,
        Some("CROP") => ScaleMode::Crop,
        Some("TILE") => ScaleMode::Tile,
        _ => ScaleMode::Fill,
    };
    Some(ImageRef {
        src: paint.image_ref.clone().unwrap_or_default(),
        scale_mode,
    })
}

/// Visible drop and inner shadows.
pub fn shadows(effects: &[Effect]) -> Vec<Shadow> {
    effects
        .iter()
        .filter(|e| e.visible)
        .filter_map(|e| {
            let inset = match e.effect_type.as_str() {
                "DROP_SHADOW" => false,
                "INNER_SHADOW" => true,
                _ => return None,
            };
            Some(Shadow {
                offset_x: round_to(e.offset.x, 2),
                offset_y: round_to(e.offset.y, 2),
                blur: round_to(e.radius.max(0.0), 2),
                spread: round_to(e.spread, 2),
                color: paint_color(e.color.unwrap_or(DEFAULT_SHADOW_COLOR), None).to_string(),
                inset,
            })
        })
        .collect()
}

/// Radius of the first visible layer blur.
pub fn layer_blur(effects: &[Effect]) -> Option<f64> {
    effects
        .iter()
        .find(|e| e.visible && e.effect_type == "LAYER_BLUR")
        .map(|e| round_to(e.radius, 2))
        .filter(|r| *r > 0.0)
}
