//! FIGlet banner rendering.

use std::str::FromStr;
use std::sync::OnceLock;

use figlet_rs::FIGfont;

use crate::error::{Result, ToolError};

// Keeps allocations predictable for the browser host.
const ASCII_MAX_LEN: usize = 256;
const ASCII_MAX_WRAP: u32 = 120;
const ASCII_DEFAULT_WIDTH: u32 = 80;

/// Fonts bundled into the wasm build.
const FONT_NAMES: &[&str] = &["standard"];

static STANDARD_FONT: OnceLock<FIGfont> = OnceLock::new();

fn standard_font() -> Result<&'static FIGfont> {
    if let Some(font) = STANDARD_FONT.get() {
        return Ok(font);
    }
    let font = FIGfont::standard().map_err(|err| ToolError::format(err.to_string()))?;
    Ok(STANDARD_FONT.get_or_init(|| font))
}

fn lookup_font(name: &str) -> Result<&'static FIGfont> {
    match name.trim().to_ascii_lowercase().as_str() {
        "standard" => standard_font(),
        _ => Err(ToolError::format(format!("unsupported font: {name}"))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for Align {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(ToolError::format(format!("unknown alignment {other}"))),
        }
    }
}

pub fn list_ascii_fonts() -> Vec<String> {
    FONT_NAMES.iter().map(|s| s.to_string()).collect()
}

fn wrap_line(line: &str, limit: u32) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    for ch in line.chars() {
        current.push(ch);
        if current.chars().count() as u32 >= limit {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn align_line(line: &str, target_width: usize, align: Align) -> String {
    if target_width <= line.len() {
        return line.to_string();
    }
    let padding = target_width - line.len();
    match align {
        Align::Right => format!("{}{}", " ".repeat(padding), line),
        Align::Center => {
            let left = padding / 2;
            let right = padding - left;
            format!("{}{}{}", " ".repeat(left), line, " ".repeat(right))
        }
        Align::Left => line.to_string(),
    }
}

/// Renders `text` line by line, wrapping input lines at `width` characters
/// (default 80, values above 120 or zero fall back to the default).
pub fn render_ascii_art(
    text: &str,
    font: &str,
    width: Option<u32>,
    align: Align,
) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ToolError::format("text cannot be empty"));
    }
    if trimmed.chars().count() > ASCII_MAX_LEN {
        return Err(ToolError::format(format!(
            "text must be at most {ASCII_MAX_LEN} characters"
        )));
    }
    let font = lookup_font(font)?;
    let wrap = width
        .filter(|w| *w > 0 && *w <= ASCII_MAX_WRAP)
        .unwrap_or(ASCII_DEFAULT_WIDTH);

    let mut rendered = Vec::new();
    for line in trimmed.lines() {
        for segment in wrap_line(line, wrap) {
            let figure = font
                .convert(&segment)
                .ok_or_else(|| ToolError::format("unable to render ASCII art"))?;
            let ascii = figure.to_string();
            let lines: Vec<&str> = ascii.trim_end_matches('\n').lines().collect();
            let widest = lines.iter().map(|l| l.len()).max().unwrap_or(0);
            let target = widest.max(wrap as usize);
            let aligned: Vec<String> = lines
                .into_iter()
                .map(|line| align_line(line, target, align))
                .collect();
            rendered.push(aligned.join("\n"));
        }
    }
    Ok(rendered.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_multi_line_banner() {
        let art = render_ascii_art("Hi", "standard", None, Align::Left).unwrap();
        assert!(art.lines().count() > 1);
        assert!(art.contains('|'));
    }

    #[test]
    fn rejects_empty_and_unknown_font() {
        assert!(matches!(
            render_ascii_art("   ", "standard", None, Align::Left),
            Err(ToolError::Format(_))
        ));
        let err = render_ascii_art("x", "gothic", None, Align::Left).unwrap_err();
        assert!(err.to_string().contains("unsupported font"));
    }

    #[test]
    fn rejects_overlong_text() {
        let long = "a".repeat(ASCII_MAX_LEN + 1);
        assert!(render_ascii_art(&long, "standard", None, Align::Left).is_err());
    }

    #[test]
    fn wraps_long_lines_into_segments() {
        assert_eq!(wrap_line("abcdef", 4), vec!["abcd", "ef"]);
    }

    #[test]
    fn aligns_within_target_width() {
        assert_eq!(align_line("ab", 6, Align::Right), "    ab");
        assert_eq!(align_line("ab", 6, Align::Center), "  ab  ");
        assert_eq!(align_line("ab", 6, Align::Left), "ab");
    }

    #[test]
    fn lists_fonts() {
        assert_eq!(list_ascii_fonts(), vec!["standard"]);
    }

    #[test]
    fn only_bundled_fonts_are_accepted() {
        assert!(render_ascii_art("x", " Standard ", None, Align::Left).is_ok());
        for name in ["slant", "small"] {
            let err = render_ascii_art("x", name, None, Align::Left).unwrap_err();
            assert!(err.to_string().contains("unsupported font"), "{name}: {err}");
        }
    }
}
