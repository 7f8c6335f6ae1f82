//! Detection of "article + noun" phrases such as `il meglio` or `l'uomo`.

use lingularity_morph::tokenize::APOSTROPHES;

/// The noun of an article-prefixed phrase, if `phrase` has that shape.
///
/// A phrase qualifies when splitting on spaces and apostrophes yields exactly
/// two pieces and the first is shorter than the second.
pub fn article_stripped_noun(phrase: &str) -> Option<&str> {
    let mut pieces = phrase
        .split(|c: char| c == ' ' || APOSTROPHES.contains(&c))
        .filter(|piece| !piece.is_empty());
    let article = pieces.next()?;
    let noun = pieces.next()?;
    if pieces.next().is_some() {
        return None;
    }
    (article.chars().count() < noun.chars().count()).then_some(noun)
}
