//! Word, character and sentence counts.

use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextStats {
    pub words: usize,
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub sentences: usize,
}

pub fn text_stats(text: &str) -> TextStats {
    TextStats {
        words: text.split_whitespace().count(),
        characters: text.chars().count(),
        characters_no_spaces: text.chars().filter(|ch| !ch.is_whitespace()).count(),
        sentences: text
            .split(['.', '!', '?'])
            .filter(|piece| !piece.trim().is_empty())
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counts_words_and_sentences() {
        let stats = text_stats("Hello there. How are you?! Fine");
        assert_eq!(
            stats,
            TextStats {
                words: 6,
                characters: 31,
                characters_no_spaces: 26,
                sentences: 3,
            }
        );
    }

    #[test]
    fn empty_text_is_all_zero() {
        assert_eq!(text_stats("   "), TextStats { characters: 3, ..TextStats::default() });
    }
}
