//! Color parsing and canonical formatting.
//!
//! Browsers report computed colors as `rgb()`/`rgba()` strings while the
//! design tool stores unit-interval float channels. Both are funneled into
//! [`Rgba`] and printed back in one canonical form, `rgba(r, g, b, a)`, so
//! the same color compares equal no matter which side produced it.

use std::fmt;

/// An 8-bit-per-channel color with a float alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 1.0,
    };

    /// Builds a color from unit-interval channels, as the design tool stores them.
    ///
    /// Channels are rounded rather than truncated: `79 / 255 * 255` must
    /// come back as 79.
    pub fn from_unit(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: unit_to_byte(r),
            g: unit_to_byte(g),
            b: unit_to_byte(b),
            a: round_to(a.clamp(0.0, 1.0), 3),
        }
    }

    /// Parses a CSS color: `rgb()`, `rgba()`, `#rgb`, `#rgba`, `#rrggbb`,
    /// `#rrggbbaa`, or one of a few named colors.
    pub fn parse_css(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_args(args);
        }
        named(&s)
    }

    /// Returns true if the color is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            format_number(self.a)
        )
    }
}

/// Normalizes a CSS color string to the canonical form.
///
/// Returns `None` for fully transparent colors (they are the default and do
/// not belong in a sparse style bag). Strings that cannot be parsed are kept
/// verbatim so no information is silently dropped.
pub fn normalize_css_color(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    match Rgba::parse_css(trimmed) {
        Some(color) if color.is_transparent() => None,
        Some(color) => Some(color.to_string()),
        None => Some(trimmed.to_string()),
    }
}

/// Rounds to the given number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Formats a float without a trailing `.0` and with at most three decimals.
pub fn format_number(value: f64) -> String {
    let rounded = round_to(value, 3);
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

fn unit_to_byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };
    let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    let a = if expanded.len() == 8 {
        round_to(byte(6)? as f64 / 255.0, 3)
    } else {
        1.0
    };
    Some(Rgba {
        r: byte(0)?,
        g: byte(2)?,
        b: byte(4)?,
        a,
    })
}

fn parse_rgb_args(args: &str) -> Option<Rgba> {
    // Accept both the legacy comma syntax and `rgb(r g b / a)`.
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |p: &str| -> Option<u8> {
        if let Some(pct) = p.strip_suffix('%') {
            let v: f64 = pct.parse().ok()?;
            Some((v.clamp(0.0, 100.0) * 2.55).round() as u8)
        } else {
            let v: f64 = p.parse().ok()?;
            Some(v.clamp(0.0, 255.0).round() as u8)
        }
    };
    let a = match parts.get(3) {
        Some(p) => {
            if let Some(pct) = p.strip_suffix('%') {
                pct.parse::<f64>().ok()? / 100.0
            } else {
                p.parse::<f64>().ok()?
            }
        }
        None => 1.0,
    };
    Some(Rgba {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: round_to(a.clamp(0.0, 1.0), 3),
    })
}

fn named(name: &str) -> Option<Rgba> {
    let (r, g, b, a) = match name {
        "transparent" => (0, 0, 0, 0.0),
        "black" => (0, 0, 0, 1.0),
        "white" => (255, 255, 255, 1.0),
        "red" => (255, 0, 0, 1.0),
        "green" => (0, 128, 0, 1.0),
        "blue" => (0, 0, 255, 1.0),
        "yellow" => (255, 255, 0, 1.0),
        "gray" | "grey" => (128, 128, 128, 1.0),
        _ => return None,
    };
    Some(Rgba { r, g, b, a })
}
