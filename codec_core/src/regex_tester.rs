//! Regex tester with JavaScript-style flags.
//!
//! Offsets are counted in chars, not bytes.

use std::str::FromStr;

use regex::{Captures, Regex, RegexBuilder};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, ToolError};

/// Any subset of `gimsuy`, each at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegexFlags {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    /// Accepted for compatibility; matching is always Unicode-aware.
    pub unicode: bool,
    pub sticky: bool,
}

impl FromStr for RegexFlags {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        let mut flags = Self::default();
        for ch in s.trim().chars() {
            let slot = match ch {
                'g' => &mut flags.global,
                'i' => &mut flags.ignore_case,
                'm' => &mut flags.multiline,
                's' => &mut flags.dot_all,
                'u' => &mut flags.unicode,
                'y' => &mut flags.sticky,
                other => return Err(ToolError::format(format!("unknown regex flag {other:?}"))),
            };
            if *slot {
                return Err(ToolError::format(format!("repeated regex flag {ch:?}")));
            }
            *slot = true;
        }
        Ok(flags)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RegexMatch {
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// Positional groups after the whole match; `None` when a group did
    /// not take part.
    pub captures: Vec<Option<String>>,
    /// Named groups in pattern order.
    pub groups: Map<String, Value>,
}

impl RegexMatch {
    fn from_captures(regex: &Regex, caps: &Captures<'_>, haystack: &str) -> Option<Self> {
        let whole = caps.get(0)?;
        let char_pos = |byte: usize| haystack[..byte].chars().count();
        let captures = caps
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str().to_string()))
            .collect();
        let groups = regex
            .capture_names()
            .flatten()
            .map(|name| {
                let value = caps
                    .name(name)
                    .map_or(Value::Null, |m| Value::String(m.as_str().to_string()));
                (name.to_string(), value)
            })
            .collect();
        Some(Self {
            text: whole.as_str().to_string(),
            start: char_pos(whole.start()),
            end: char_pos(whole.end()),
            captures,
            groups,
        })
    }
}

fn build(pattern: &str, flags: &RegexFlags) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(flags.ignore_case)
        .multi_line(flags.multiline)
        .dot_matches_new_line(flags.dot_all)
        .build()
        .map_err(|err| ToolError::format(format!("invalid pattern or flags: {err}")))
}

/// Byte offset just past the char starting at `pos`.
fn next_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len() + 1, |ch| pos + ch.len_utf8())
}

/// Sticky matching: each match must begin where the previous one ended,
/// starting at offset 0.
fn sticky_matches(regex: &Regex, text: &str, global: bool) -> Vec<RegexMatch> {
    let mut found = Vec::new();
    let mut pos = 0;
    while pos <= text.len() {
        let Some(caps) = regex.captures_at(text, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        if whole.start() != pos {
            break;
        }
        found.extend(RegexMatch::from_captures(regex, &caps, text));
        if !global {
            break;
        }
        pos = if whole.end() == pos {
            next_boundary(text, pos)
        } else {
            whole.end()
        };
    }
    found
}

/// Runs `pattern` over `text`. Without `g` only the first match is kept.
pub fn test_regex(pattern: &str, flags: &str, text: &str) -> Result<Vec<RegexMatch>> {
    let flags: RegexFlags = flags.parse()?;
    let regex = build(pattern, &flags)?;
    if flags.sticky {
        return Ok(sticky_matches(&regex, text, flags.global));
    }
    let all = regex
        .captures_iter(text)
        .filter_map(|caps| RegexMatch::from_captures(&regex, &caps, text));
    Ok(if flags.global {
        all.collect()
    } else {
        all.take(1).collect()
    })
}
