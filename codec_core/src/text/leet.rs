//! Leet-speak substitution.
//!
//! Encoding is randomized and lossy; decoding is a deterministic
//! longest-match scan over a curated reverse table, so
//! `decode(encode(x)) == x` does not hold in general.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use rand::Rng;
use serde::Deserialize;

use crate::error::{Result, ToolError};

/// Longest code in [`REVERSE_TABLE`], in chars.
const MAX_CODE_LEN: usize = 4;

static SUBSTITUTIONS: &[(char, &[&str])] = &[
    ('A', &["4", "@"]),
    ('B', &["8", "|3"]),
    ('C', &["<", "{", "["]),
    ('D', &["|)", "|]"]),
    ('E', &["3"]),
    ('F', &["|=", "ph"]),
    ('G', &["6", "9"]),
    ('H', &["#", "/-/", "[-]"]),
    ('I', &["1", "!", "|"]),
    ('J', &["_|", "_/", "]"]),
    ('K', &["|<", "|<", "|{"]),
    ('L', &["1", "|", "|_"]),
    ('M', &["|\\/|", "|'|'|", "(\\/)", "/\\/\\"]),
    ('N', &["|\\|", "/\\/", "{\\}"]),
    ('O', &["0", "()", "[]"]),
    ('P', &["|*", "|o", "|>"]),
    ('Q', &["0_", "(,)", "kw"]),
    ('R', &["|2", "|?", "l2"]),
    ('S', &["5", "$", "z"]),
    ('T', &["7", "+", "|-|"]),
    ('U', &["|_|", "(_)", "\\/"]),
    ('V', &["\\/", "|/", "\\|"]),
    ('W', &["\\/\\/", "\\X/", "(/\\)", "\\|/"]),
    ('X', &["><", "}{", ")("]),
    ('Y', &["`/", "`(", "`/"]),
    ('Z', &["2", "7_", ">_"]),
    ('0', &["O", "()"]),
    ('1', &["l", "I", "|"]),
    ('2', &["Z", "z"]),
    ('3', &["E", "e"]),
    ('4', &["A", "a"]),
    ('5', &["S", "s"]),
    ('6', &["G", "g"]),
    ('7', &["T", "t"]),
    ('8', &["B", "b"]),
    ('9', &["g", "G"]),
];

/// Each code maps to exactly one letter. Codes shared by two letters in
/// [`SUBSTITUTIONS`] resolve to the letter listed first there: `1` and `|`
/// decode to `I`, `\/` decodes to `U`.
static REVERSE_TABLE: &[(&str, char)] = &[
    ("4", 'A'),
    ("@", 'A'),
    ("8", 'B'),
    ("|3", 'B'),
    ("<", 'C'),
    ("{", 'C'),
    ("[", 'C'),
    ("|)", 'D'),
    ("|]", 'D'),
    ("3", 'E'),
    ("|=", 'F'),
    ("ph", 'F'),
    ("6", 'G'),
    ("9", 'G'),
    ("#", 'H'),
    ("/-/", 'H'),
    ("1", 'I'),
    ("!", 'I'),
    ("|", 'I'),
    ("_|", 'J'),
    ("_/", 'J'),
    ("]", 'J'),
    ("|<", 'K'),
    ("|{", 'K'),
    ("|_", 'L'),
    ("|\\/|", 'M'),
    ("(\\/)", 'M'),
    ("/\\/\\", 'M'),
    ("|\\|", 'N'),
    ("/\\/", 'N'),
    ("0", 'O'),
    ("()", 'O'),
    ("[]", 'O'),
    ("|*", 'P'),
    ("|o", 'P'),
    ("|>", 'P'),
    ("0_", 'Q'),
    ("(,)", 'Q'),
    ("|2", 'R'),
    ("l2", 'R'),
    ("5", 'S'),
    ("$", 'S'),
    ("z", 'S'),
    ("7", 'T'),
    ("+", 'T'),
    ("|-|", 'T'),
    ("|_|", 'U'),
    ("(_)", 'U'),
    ("\\/", 'U'),
    ("|/", 'V'),
    ("\\|", 'V'),
    ("\\/\\/", 'W'),
    ("(/\\)", 'W'),
    ("\\|/", 'W'),
    ("><", 'X'),
    ("}{", 'X'),
    (")(", 'X'),
    ("`/", 'Y'),
    ("`(", 'Y'),
    ("2", 'Z'),
    ("7_", 'Z'),
    (">_", 'Z'),
];

static FORWARD: OnceLock<HashMap<char, &'static [&'static str]>> = OnceLock::new();
static REVERSE: OnceLock<HashMap<&'static str, char>> = OnceLock::new();

fn forward() -> &'static HashMap<char, &'static [&'static str]> {
    FORWARD.get_or_init(|| SUBSTITUTIONS.iter().copied().collect())
}

fn reverse() -> &'static HashMap<&'static str, char> {
    REVERSE.get_or_init(|| REVERSE_TABLE.iter().copied().collect())
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeetLevel {
    /// Coin flip between the original letter and the first substitute.
    Low,
    /// Uniform pick among the first two substitutes.
    #[default]
    Medium,
    /// Uniform pick among all substitutes.
    High,
    /// Always the last substitute.
    Extreme,
}

impl FromStr for LeetLevel {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "extreme" => Ok(Self::Extreme),
            other => Err(ToolError::format(format!("unknown leet level {other}"))),
        }
    }
}

impl LeetLevel {
    fn pick<'a, R: Rng + ?Sized>(
        self,
        original: char,
        candidates: &[&'a str],
        rng: &mut R,
    ) -> Pick<'a> {
        match self {
            Self::Low => {
                if rng.gen_bool(0.5) {
                    Pick::Code(candidates[0])
                } else {
                    Pick::Keep(original)
                }
            }
            Self::Medium => {
                let upper = candidates.len().min(2);
                Pick::Code(candidates[rng.gen_range(0..upper)])
            }
            Self::High => Pick::Code(candidates[rng.gen_range(0..candidates.len())]),
            Self::Extreme => Pick::Code(candidates[candidates.len() - 1]),
        }
    }
}

enum Pick<'a> {
    Keep(char),
    Code(&'a str),
}

/// Upper-cases `text` and replaces each letter or digit that has
/// substitutes according to `level`. Everything else passes through.
pub fn encode_leet<R: Rng + ?Sized>(text: &str, level: LeetLevel, rng: &mut R) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let table = forward();
    let mut out = String::with_capacity(text.len() * 2);
    for ch in text.chars().flat_map(char::to_uppercase) {
        match table.get(&ch) {
            Some(candidates) => match level.pick(ch, candidates, rng) {
                Pick::Keep(original) => out.push(original),
                Pick::Code(code) => out.push_str(code),
            },
            None => out.push(ch),
        }
    }
    out
}

/// Greedy longest match: at each position tries codes of 4 chars down to
/// 1 and emits the first hit; otherwise copies the character unchanged.
pub fn decode_leet(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let table = reverse();
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    let mut candidate = String::with_capacity(MAX_CODE_LEN * 4);
    while pos < chars.len() {
        let mut matched = None;
        for len in (1..=MAX_CODE_LEN.min(chars.len() - pos)).rev() {
            candidate.clear();
            candidate.extend(&chars[pos..pos + len]);
            if let Some(letter) = table.get(candidate.as_str()) {
                matched = Some((*letter, len));
                break;
            }
        }
        match matched {
            Some((letter, len)) => {
                out.push(letter);
                pos += len;
            }
            None => {
                out.push(chars[pos]);
                pos += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;
    use std::collections::HashSet;

    fn rng() -> Xoshiro256StarStar {
        Xoshiro256StarStar::seed_from_u64(7)
    }

    #[test]
    fn reverse_codes_are_unique_and_bounded() {
        let codes: HashSet<&str> = REVERSE_TABLE.iter().map(|(code, _)| *code).collect();
        assert_eq!(codes.len(), REVERSE_TABLE.len());
        assert!(REVERSE_TABLE
            .iter()
            .all(|(code, _)| code.chars().count() <= MAX_CODE_LEN));
    }

    #[test]
    fn extreme_is_deterministic() {
        assert_eq!(encode_leet("leet", LeetLevel::Extreme, &mut rng()), "|_33|-|");
        assert_eq!(encode_leet("a1", LeetLevel::Extreme, &mut rng()), "@|");
    }

    #[test]
    fn medium_only_uses_first_two_candidates() {
        let mut rng = rng();
        for _ in 0..50 {
            let out = encode_leet("c", LeetLevel::Medium, &mut rng);
            assert!(out == "<" || out == "{", "unexpected {out}");
        }
    }

    #[test]
    fn low_keeps_or_uses_first_candidate() {
        let mut rng = rng();
        let mut seen = HashSet::new();
        for _ in 0..64 {
            seen.insert(encode_leet("a", LeetLevel::Low, &mut rng));
        }
        assert_eq!(seen, HashSet::from(["A".to_string(), "4".to_string()]));
    }

    #[test]
    fn high_draws_from_every_candidate() {
        let mut rng = rng();
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.insert(encode_leet("h", LeetLevel::High, &mut rng));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn same_seed_gives_same_output() {
        let a = encode_leet("hello world", LeetLevel::High, &mut rng());
        let b = encode_leet("hello world", LeetLevel::High, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn passes_through_unmapped_characters() {
        assert_eq!(encode_leet("e-e", LeetLevel::Extreme, &mut rng()), "3-3");
    }

    #[test]
    fn decode_prefers_longest_match() {
        assert_eq!(decode_leet("|_|"), "U");
        assert_eq!(decode_leet("|-|"), "T");
        assert_eq!(decode_leet("7_"), "Z");
        assert_eq!(decode_leet("|\\/|"), "M");
    }

    #[test]
    fn decode_resolves_shared_codes_to_first_letter() {
        assert_eq!(decode_leet("1"), "I");
        assert_eq!(decode_leet("\\/"), "U");
    }

    #[test]
    fn decode_keeps_unknown_characters() {
        assert_eq!(decode_leet("h3ll0 w0rld"), "hEllO wOrld");
    }

    #[test]
    fn level_parses_from_name() {
        assert_eq!("HIGH".parse::<LeetLevel>().unwrap(), LeetLevel::High);
        assert!(matches!("max".parse::<LeetLevel>(), Err(ToolError::Format(_))));
    }
}
