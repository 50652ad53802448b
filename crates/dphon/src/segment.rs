//! Text segmentation into words and punctuation.

/// One unit of input text, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Maximal run of word characters.
    Word(&'a str),
    /// A single character that is neither a word character nor whitespace.
    Punctuation(char),
}

/// Letters, digits (any script) and `_`.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split `text` into words and single-character punctuation tokens.
///
/// Whitespace separates tokens and never produces one.
pub fn segment(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if is_word_char(c) {
            if word_start.is_none() {
                word_start = Some(i);
            }
            continue;
        }
        if let Some(start) = word_start.take() {
            tokens.push(Token::Word(&text[start..i]));
        }
        if !c.is_whitespace() {
            tokens.push(Token::Punctuation(c));
        }
    }
    if let Some(start) = word_start {
        tokens.push(Token::Word(&text[start..]));
    }

    tokens
}
