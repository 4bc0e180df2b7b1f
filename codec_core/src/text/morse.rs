//! International Morse code.
//!
//! Letters inside a word are separated by a single space and words by
//! `" / "`; a space in the input encodes to `/`.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Marker emitted for a code group with no table entry.
pub const UNKNOWN_MARKER: char = '?';

pub const WORD_SEPARATOR: &str = " / ";

pub(crate) static MORSE_TABLE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('$', "...-..-"),
    ('@', ".--.-."),
    (' ', "/"),
];

static ENCODE: OnceLock<HashMap<char, &'static str>> = OnceLock::new();
static DECODE: OnceLock<HashMap<&'static str, char>> = OnceLock::new();

fn encode_table() -> &'static HashMap<char, &'static str> {
    ENCODE.get_or_init(|| MORSE_TABLE.iter().copied().collect())
}

fn decode_table() -> &'static HashMap<&'static str, char> {
    DECODE.get_or_init(|| MORSE_TABLE.iter().map(|&(ch, code)| (code, ch)).collect())
}

/// Upper-cases `text` and joins the code of each known character with a
/// single space. Characters without a code are dropped.
pub fn encode_morse(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let table = encode_table();
    let mut codes = Vec::with_capacity(text.len());
    for ch in text.chars().flat_map(char::to_uppercase) {
        match table.get(&ch) {
            Some(code) => codes.push(*code),
            None => tracing::trace!(%ch, "no morse code for character, dropping"),
        }
    }
    codes.join(" ")
}

/// Collapses whitespace runs, splits on `" / "` into words and on spaces
/// into code groups. Unknown groups decode to [`UNKNOWN_MARKER`].
pub fn decode_morse(morse: &str) -> String {
    let normalized = morse.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return String::new();
    }
    let table = decode_table();
    let mut words = Vec::new();
    for word in normalized.split(WORD_SEPARATOR) {
        let mut decoded = String::with_capacity(word.len());
        for group in word.split(' ').filter(|group| !group.is_empty()) {
            match table.get(group) {
                Some(ch) => decoded.push(*ch),
                None => {
                    tracing::debug!(group, "unknown morse group");
                    decoded.push(UNKNOWN_MARKER);
                }
            }
        }
        words.push(decoded);
    }
    words.join(" ")
}
