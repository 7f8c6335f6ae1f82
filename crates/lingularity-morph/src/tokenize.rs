//! Whitespace/apostrophe tokenization shared by indexing and querying.

/// Characters treated as apostrophes when splitting elided forms (`l'uomo`).
pub const APOSTROPHES: [char; 2] = ['\'', '\u{2019}'];

/// Split on whitespace and, optionally, apostrophes. Empty pieces are dropped.
pub fn split_tokens(text: &str, split_apostrophes: bool) -> impl Iterator<Item = &str> {
    text.split(move |c: char| c.is_whitespace() || (split_apostrophes && APOSTROPHES.contains(&c)))
        .filter(|t| !t.is_empty())
}

pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '¿' | '¡'
                | '«'
                | '»'
                | '…'
                | '\u{2018}'
                | '\u{2019}'
                | '\u{201c}'
                | '\u{201d}'
                | '\u{201e}'
                | '\u{2013}'
                | '\u{2014}'
                | '·'
                | '。'
                | '、'
                | '，'
                | '！'
                | '？'
                | '：'
                | '；'
        )
}

pub fn strip_punctuation(token: &str) -> String {
    token.chars().filter(|c| !is_punctuation(*c)).collect()
}

/// Tokens worth indexing: punctuation stripped, empty and digit-bearing tokens dropped.
///
/// Case is preserved so callers can still tell proper nouns apart.
pub fn meaningful_tokens(text: &str, split_apostrophes: bool) -> Vec<String> {
    split_tokens(text, split_apostrophes)
        .map(strip_punctuation)
        .filter(|t| !t.is_empty() && !t.chars().any(|c| c.is_numeric()))
        .collect()
}
