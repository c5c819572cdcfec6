//! CSS gradient parsing.
//!
//! Handles the common computed-style forms of `linear-gradient`,
//! `radial-gradient` and `conic-gradient` (and their `repeating-`
//! variants). Only the first gradient layer of a multi-layer background is
//! used. Anything unrecognized yields `None`.

use crate::ir::color::{round_to, Rgba};
use crate::ir::{ColorStop, Gradient, GradientKind};

/// CSS default direction of a linear gradient (`to bottom`).
const DEFAULT_LINEAR_ANGLE: f64 = 180.0;

/// Parses a `background-image` value into a gradient descriptor.
pub fn parse_css_gradient(value: &str) -> Option<Gradient> {
    let layer = split_top_level(value.trim(), ',')
        .into_iter()
        .find(|layer| layer.contains("gradient("))?;

    let open = layer.find('(')?;
    let function = layer[..open].trim().to_ascii_lowercase();
    let function = function.strip_prefix("repeating-").unwrap_or(&function);
    let kind = match function {
        "linear-gradient" => GradientKind::Linear,
        "radial-gradient" => GradientKind::Radial,
        "conic-gradient" => GradientKind::Angular,
        _ => return None,
    };
    let close = layer.rfind(')')?;
    if close <= open {
        return None;
    }

    let mut args = split_top_level(&layer[open + 1..close], ',');
    let mut angle = None;
    if let Some(first) = args.first() {
        let first = first.trim().to_ascii_lowercase();
        match kind {
            GradientKind::Linear => {
                if let Some(a) = parse_direction(&first) {
                    angle = Some(a);
                    args.remove(0);
                }
            }
            GradientKind::Radial | GradientKind::Angular | GradientKind::Diamond => {
                if is_shape_prelude(&first) {
                    args.remove(0);
                }
            }
        }
    }
    if kind == GradientKind::Linear && angle.is_none() {
        angle = Some(DEFAULT_LINEAR_ANGLE);
    }

    let raw_stops: Vec<(String, Option<f64>)> = args
        .iter()
        .map(|arg| parse_stop(arg))
        .filter(|(color, _)| !color.is_empty())
        .collect();
    if raw_stops.len() < 2 {
        return None;
    }

    Some(Gradient {
        kind,
        angle,
        stops: ColorStop::distribute(raw_stops),
    })
}

/// Parses a linear-gradient direction into a CSS angle in degrees.
fn parse_direction(arg: &str) -> Option<f64> {
    if let Some(side) = arg.strip_prefix("to ") {
        let mut parts: Vec<&str> = side.split_whitespace().collect();
        parts.sort_unstable();
        let angle = match parts.as_slice() {
            ["top"] => 0.0,
            ["right"] => 90.0,
            ["bottom"] => 180.0,
            ["left"] => 270.0,
            ["right", "top"] => 45.0,
            ["bottom", "right"] => 135.0,
            ["bottom", "left"] => 225.0,
            ["left", "top"] => 315.0,
            _ => return None,
        };
        return Some(angle);
    }
    parse_angle(arg)
}

/// Parses `90deg`, `0.25turn`, `1.5708rad` or `100grad` into degrees in `[0, 360)`.
fn parse_angle(arg: &str) -> Option<f64> {
    let (number, factor) = if let Some(n) = arg.strip_suffix("deg") {
        (n, 1.0)
    } else if let Some(n) = arg.strip_suffix("turn") {
        (n, 360.0)
    } else if let Some(n) = arg.strip_suffix("grad") {
        (n, 0.9)
    } else if let Some(n) = arg.strip_suffix("rad") {
        (n, 180.0 / std::f64::consts::PI)
    } else {
        return None;
    };
    let degrees = number.trim().parse::<f64>().ok()? * factor;
    Some(round_to(degrees.rem_euclid(360.0), 2))
}

fn is_shape_prelude(arg: &str) -> bool {
    ["circle", "ellipse", "closest-", "farthest-", "at ", "from "]
        .iter()
        .any(|kw| arg.starts_with(kw))
}

/// Splits `rgba(0, 0, 0, 0.5) 40%` into a canonical color and a unit position.
fn parse_stop(arg: &str) -> (String, Option<f64>) {
    let arg = arg.trim();
    let parts = split_top_level(arg, ' ');
    match parts.as_slice() {
        [_, .., last] if last.trim_end().ends_with('%') => {
            let pct = last.trim().trim_end_matches('%').parse::<f64>().ok();
            // Everything before the position belongs to the color.
            let color = arg[..arg.len() - last.len()].trim();
            (
                canonical_stop_color(color),
                pct.map(|p| (p / 100.0).clamp(0.0, 1.0)),
            )
        }
        _ => (canonical_stop_color(arg), None),
    }
}

fn canonical_stop_color(color: &str) -> String {
    match Rgba::parse_css(color) {
        Some(rgba) => rgba.to_string(),
        None => color.trim().to_string(),
    }
}

/// Splits on `sep` outside parentheses, dropping empty pieces.
fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                if !s[start..i].trim().is_empty() {
                    out.push(&s[start..i]);
                }
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    if !s[start..].trim().is_empty() {
        out.push(&s[start..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_with_angle_and_positions() {
        let g = parse_css_gradient("linear-gradient(90deg, rgb(255, 0, 0) 0%, rgb(0, 0, 255) 100%)")
            .expect("gradient");
        assert_eq!(g.kind, GradientKind::Linear);
        assert_eq!(g.angle, Some(90.0));
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.stops[0].color, "rgba(255, 0, 0, 1)");
        assert_eq!(g.stops[1].position, 1.0);
    }

    #[test]
    fn linear_defaults_and_even_distribution() {
        let g = parse_css_gradient("linear-gradient(#fff, #000, red)").expect("gradient");
        assert_eq!(g.angle, Some(180.0));
        let positions: Vec<f64> = g.stops.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn side_keywords() {
        let g = parse_css_gradient("linear-gradient(to top right, red, blue)").expect("gradient");
        assert_eq!(g.angle, Some(45.0));
        let g = parse_css_gradient("linear-gradient(0.5turn, red, blue)").expect("gradient");
        assert_eq!(g.angle, Some(180.0));
    }

    #[test]
    fn radial_skips_shape_prelude() {
        let g = parse_css_gradient("radial-gradient(circle at center, rgba(0, 0, 0, 0.5) 20%, transparent)")
            .expect("gradient");
        assert_eq!(g.kind, GradientKind::Radial);
        assert_eq!(g.angle, None);
        assert_eq!(g.stops[0].position, 0.2);
        assert_eq!(g.stops[1].color, "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn first_gradient_layer_wins() {
        let g = parse_css_gradient("url(\"a.png\"), linear-gradient(red, blue)").expect("gradient");
        assert_eq!(g.stops.len(), 2);
    }

    #[test]
    fn non_gradients_are_ignored() {
        assert!(parse_css_gradient("none").is_none());
        assert!(parse_css_gradient("url(a.png)").is_none());
        assert!(parse_css_gradient("linear-gradient(red)").is_none());
    }
}
