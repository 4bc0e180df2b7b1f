//! HEX / RGB / HSL conversion.
//!
//! [`Hsl`] keeps unrounded components so RGB -> HSL -> RGB stays within one
//! unit per channel; rounding happens only when a value is displayed.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{Result, ToolError};

static NUMBER: OnceLock<Regex> = OnceLock::new();

fn number_regex() -> &'static Regex {
    NUMBER.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Hue in degrees `[0, 360]`, saturation and lightness in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    pub fn rounded(&self) -> (u16, u8, u8) {
        (
            self.h.round() as u16,
            self.s.round() as u8,
            self.l.round() as u8,
        )
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, s, l) = self.rounded();
        write!(f, "hsl({h}, {s}%, {l}%)")
    }
}

/// Accepts `#RRGGBB`, `#RGB`, with or without the leading `#`.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|ch| [ch, ch]).collect(),
        6 => digits.to_string(),
        _ => return Err(ToolError::format(format!("invalid hex color {hex:?}"))),
    };
    let bytes = hex::decode(&expanded)
        .map_err(|_| ToolError::format(format!("invalid hex color {hex:?}")))?;
    Ok(Rgb::new(bytes[0], bytes[1], bytes[2]))
}

pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{}", hex::encode([rgb.r, rgb.g, rgb.b]))
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return Hsl::new(0.0, 0.0, l * 100.0);
    }
    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    Hsl::new(h / 6.0 * 360.0, s * 100.0, l * 100.0)
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = hsl.h / 360.0;
    let s = hsl.s / 100.0;
    let l = hsl.l / 100.0;
    if s == 0.0 {
        let v = to_channel(l);
        return Rgb::new(v, v, v);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Rgb::new(
        to_channel(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_channel(hue_to_channel(p, q, h)),
        to_channel(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

pub fn hex_to_hsl(hex: &str) -> Result<Hsl> {
    hex_to_rgb(hex).map(rgb_to_hsl)
}

pub fn hsl_to_hex(hsl: Hsl) -> String {
    rgb_to_hex(hsl_to_rgb(hsl))
}

fn three_numbers(input: &str, what: &str) -> Result<[f64; 3]> {
    let numbers: Vec<f64> = number_regex()
        .find_iter(input)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    match numbers.as_slice() {
        [a, b, c] => Ok([*a, *b, *c]),
        _ => Err(ToolError::format(format!(
            "expected three numbers in {what} color {input:?}"
        ))),
    }
}

/// Parses `rgb(r, g, b)` or a bare `r, g, b` triple.
pub fn parse_rgb(input: &str) -> Result<Rgb> {
    let [r, g, b] = three_numbers(input, "rgb")?;
    let channel = |v: f64| {
        if v <= 255.0 {
            Ok(v.round() as u8)
        } else {
            Err(ToolError::format(format!("rgb channel {v} is out of range")))
        }
    };
    Ok(Rgb::new(channel(r)?, channel(g)?, channel(b)?))
}

/// Parses `hsl(h, s%, l%)` or a bare `h, s, l` triple.
pub fn parse_hsl(input: &str) -> Result<Hsl> {
    let [h, s, l] = three_numbers(input, "hsl")?;
    if h > 360.0 || s > 100.0 || l > 100.0 {
        return Err(ToolError::format(format!("hsl value out of range in {input:?}")));
    }
    Ok(Hsl::new(h, s, l))
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ColorCodes {
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
}

impl ColorCodes {
    fn from_rgb(rgb: Rgb, hsl: Hsl) -> Self {
        Self {
            hex: rgb_to_hex(rgb),
            rgb: rgb.to_string(),
            hsl: hsl.to_string(),
        }
    }
}

/// Detects whether `input` is hex, `rgb(...)` or `hsl(...)` and renders all
/// three notations.
pub fn convert_color(input: &str) -> Result<ColorCodes> {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("hsl") {
        let hsl = parse_hsl(trimmed)?;
        Ok(ColorCodes::from_rgb(hsl_to_rgb(hsl), hsl))
    } else if lower.starts_with("rgb") {
        let rgb = parse_rgb(trimmed)?;
        Ok(ColorCodes::from_rgb(rgb, rgb_to_hsl(rgb)))
    } else {
        let rgb = hex_to_rgb(trimmed)?;
        Ok(ColorCodes::from_rgb(rgb, rgb_to_hsl(rgb)))
    }
}
