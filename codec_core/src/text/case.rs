//! Identifier-style case conversion.

use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Result, ToolError};

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaseStyle {
    Camel,
    Pascal,
    Snake,
    Kebab,
    Constant,
    Title,
    Sentence,
}

impl FromStr for CaseStyle {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "camel" => Ok(Self::Camel),
            "pascal" => Ok(Self::Pascal),
            "snake" => Ok(Self::Snake),
            "kebab" => Ok(Self::Kebab),
            "constant" => Ok(Self::Constant),
            "title" => Ok(Self::Title),
            "sentence" => Ok(Self::Sentence),
            other => Err(ToolError::format(format!("unknown case style {other}"))),
        }
    }
}

/// Splits into ASCII alphanumeric words. `_` and `-` separate words, as
/// does a lowercase letter followed by an uppercase one (`helloWorld`).
pub fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in s.chars() {
        if !ch.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_ascii_uppercase() && prev_lower {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
        prev_lower = ch.is_ascii_lowercase();
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Upper-cases the first char and lower-cases the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = first.to_uppercase().collect::<String>();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

pub fn convert_case(text: &str, style: CaseStyle) -> String {
    let words = split_words(text);
    match style {
        CaseStyle::Camel => words
            .iter()
            .enumerate()
            .map(|(idx, word)| {
                if idx == 0 {
                    word.to_lowercase()
                } else {
                    capitalize(word)
                }
            })
            .collect(),
        CaseStyle::Pascal => words.iter().map(|word| capitalize(word)).collect(),
        CaseStyle::Snake => join_lower(&words, "_"),
        CaseStyle::Kebab => join_lower(&words, "-"),
        CaseStyle::Constant => words
            .iter()
            .map(|word| word.to_uppercase())
            .collect::<Vec<_>>()
            .join("_"),
        CaseStyle::Title => words
            .iter()
            .map(|word| capitalize(word))
            .collect::<Vec<_>>()
            .join(" "),
        CaseStyle::Sentence => capitalize_first(&text.trim().to_lowercase()),
    }
}

fn join_lower(words: &[String], sep: &str) -> String {
    words
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(sep)
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
