//! Password entropy estimate and random password generation.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shift + 0-9 on a US layout.
const SHIFT_SYMBOLS: &str = ")!@#$%^&*(";

const LOWER_POOL: u32 = 26;
const UPPER_POOL: u32 = 26;
const DIGIT_POOL: u32 = 10;
const SHIFT_POOL: u32 = 10;
/// Fixed approximation for every other symbol.
const OTHER_POOL: u32 = 23;

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const NUMBERS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+[]{}|;:,.<>?";

/// Longer requests are clamped to this many characters.
pub const MAX_PASSWORD_LENGTH: usize = 1024;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Strength {
    VeryWeak,
    Weak,
    Decent,
    Strong,
    VeryStrong,
    Uncrackable,
    Paranoid,
}

impl Strength {
    pub fn from_bits(bits: f64) -> Self {
        match bits {
            b if b >= 128.0 => Self::Paranoid,
            b if b >= 100.0 => Self::Uncrackable,
            b if b >= 89.0 => Self::VeryStrong,
            b if b >= 75.0 => Self::Strong,
            b if b >= 60.0 => Self::Decent,
            b if b >= 40.0 => Self::Weak,
            _ => Self::VeryWeak,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Paranoid => "The NSA is scared of you!",
            Self::Uncrackable => "Practically uncrackable for centuries.",
            Self::VeryStrong => "Good luck cracking that, H4x0r",
            Self::Strong => "Strong. Very hard to brute force.",
            Self::Decent => "Decent. Consider adding length.",
            Self::Weak => "Weak. Add symbols and length.",
            Self::VeryWeak => "Very weak. Use a longer passphrase.",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntropyReport {
    pub lower: bool,
    pub upper: bool,
    pub digit: bool,
    pub shift: bool,
    pub other: bool,
    pub pool: u32,
    pub bits: f64,
    pub strength: Strength,
    pub label: &'static str,
}

/// `bits = length * log2(max(1, pool))`, where `pool` sums the sizes of the
/// character classes that occur at least once. Empty input is 0 bits.
pub fn estimate_entropy(password: &str) -> EntropyReport {
    let mut report = EntropyReport {
        lower: false,
        upper: false,
        digit: false,
        shift: false,
        other: false,
        pool: 0,
        bits: 0.0,
        strength: Strength::VeryWeak,
        label: Strength::VeryWeak.label(),
    };
    for ch in password.chars() {
        match ch {
            'a'..='z' => report.lower = true,
            'A'..='Z' => report.upper = true,
            '0'..='9' => report.digit = true,
            c if SHIFT_SYMBOLS.contains(c) => report.shift = true,
            _ => report.other = true,
        }
    }
    report.pool = [
        (report.lower, LOWER_POOL),
        (report.upper, UPPER_POOL),
        (report.digit, DIGIT_POOL),
        (report.shift, SHIFT_POOL),
        (report.other, OTHER_POOL),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, size)| size)
    .sum();

    let length = password.chars().count();
    if length > 0 {
        report.bits = length as f64 * f64::from(report.pool.max(1)).log2();
    }
    report.strength = Strength::from_bits(report.bits);
    report.label = report.strength.label();
    report
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PasswordOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 16,
            uppercase: true,
            lowercase: true,
            numbers: true,
            symbols: true,
        }
    }
}

impl PasswordOptions {
    fn charset(&self) -> Vec<char> {
        [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.numbers, NUMBERS),
            (self.symbols, SYMBOLS),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .flat_map(|(_, set)| set.chars())
        .collect()
    }
}

/// Draws `length` chars (at most [`MAX_PASSWORD_LENGTH`]) uniformly from
/// the selected sets. No set selected yields an empty string.
pub fn generate_password<R: Rng + ?Sized>(options: &PasswordOptions, rng: &mut R) -> String {
    let charset = options.charset();
    if charset.is_empty() {
        return String::new();
    }
    (0..options.length.min(MAX_PASSWORD_LENGTH))
        .map(|_| charset[rng.gen_range(0..charset.len())])
        .collect()
}
