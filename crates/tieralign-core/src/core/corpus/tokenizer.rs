//! Word tokenization for corpus output

use unicode_segmentation::UnicodeSegmentation;

/// Splits utterance text into corpus tokens
pub trait Tokenizer {
    fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str>;
}

/// Unicode word-boundary tokenizer.
///
/// Punctuation becomes its own token; whitespace is discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        text.split_word_bounds()
            .filter(|segment| !segment.trim().is_empty())
            .collect()
    }
}
