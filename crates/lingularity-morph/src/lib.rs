//! Token normalisation strategies for sentence indexing.
//!
//! A language is indexed with the most precise strategy it supports:
//!
//! 1. **Lemma**: a lexicon model exists for the language ([`LemmaModels`]).
//! 2. **Stem**: a Snowball algorithm is registered for the language.
//! 3. **Raw**: lowercased tokens.
//!
//! The choice is made once by [`Normalizer::select`]; afterwards callers only
//! see the single-method [`Normalize`] interface. Lemmatization also exposes
//! part-of-speech tags through [`Lemmatizer::tag`], which the indexer uses to
//! leave out determiners, punctuation and the like.
//!
//! # Example
//! ```no_run
//! use lingularity_morph::{LemmaModels, Normalize, Normalizer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let models = LemmaModels::new("/data/lemmas");
//! let normalizer = Normalizer::select("Italian", &models)?;
//! println!("{} -> {}", normalizer.kind(), normalizer.normalize("Gatti"));
//! # Ok(()) }
//! ```

mod lexicon;
pub mod tokenize;

use std::fmt;

use anyhow::Result;
use lingularity_types::NormalizationKind;
use rust_stemmers::{Algorithm, Stemmer};
use tracing::info;

pub use lexicon::{LemmaModels, Lemmatizer, SuffixRule, TaggedToken, builtin_rules};

/// Map a token onto the key it is indexed under.
pub trait Normalize {
    fn normalize(&self, token: &str) -> String;
}

/// The closed set of normalisation strategies.
pub enum Normalizer {
    Lemma(Lemmatizer),
    Stem(SnowballStemmer),
    Raw,
}

impl Normalizer {
    /// Pick the best strategy available for `language`.
    ///
    /// Fails only when a lemma model is present but cannot be read.
    pub fn select(language: &str, models: &LemmaModels) -> Result<Self> {
        let normalizer = if models.is_available(language) {
            Normalizer::Lemma(models.load(language)?)
        } else if let Some(stemmer) = SnowballStemmer::for_language(language) {
            Normalizer::Stem(stemmer)
        } else {
            Normalizer::Raw
        };
        info!("normalizing {language} tokens by {}", normalizer.kind());
        Ok(normalizer)
    }

    pub fn kind(&self) -> NormalizationKind {
        match self {
            Normalizer::Lemma(_) => NormalizationKind::Lemma,
            Normalizer::Stem(_) => NormalizationKind::Stem,
            Normalizer::Raw => NormalizationKind::Raw,
        }
    }
}

impl Normalize for Normalizer {
    fn normalize(&self, token: &str) -> String {
        match self {
            Normalizer::Lemma(lemmatizer) => lemmatizer.lemmatize(token).0,
            Normalizer::Stem(stemmer) => stemmer.normalize(token),
            Normalizer::Raw => token.to_lowercase(),
        }
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Normalizer::Lemma(lemmatizer) => f
                .debug_struct("Lemma")
                .field("entries", &lemmatizer.entry_count())
                .finish(),
            Normalizer::Stem(stemmer) => f.debug_tuple("Stem").field(&stemmer.language).finish(),
            Normalizer::Raw => f.write_str("Raw"),
        }
    }
}

/// Snowball stemmer bound to one language.
pub struct SnowballStemmer {
    language: String,
    stemmer: Stemmer,
}

impl SnowballStemmer {
    pub fn for_language(language: &str) -> Option<Self> {
        let algorithm = stemming_algorithm(language)?;
        Some(Self {
            language: language.trim().to_string(),
            stemmer: Stemmer::create(algorithm),
        })
    }
}

impl Normalize for SnowballStemmer {
    fn normalize(&self, token: &str) -> String {
        self.stemmer.stem(&token.to_lowercase()).into_owned()
    }
}

/// Languages with a registered Snowball algorithm.
pub fn stemming_algorithm(language: &str) -> Option<Algorithm> {
    Some(match language.trim().to_lowercase().as_str() {
        "arabic" => Algorithm::Arabic,
        "danish" => Algorithm::Danish,
        "dutch" => Algorithm::Dutch,
        "english" => Algorithm::English,
        "finnish" => Algorithm::Finnish,
        "french" => Algorithm::French,
        "german" => Algorithm::German,
        "greek" => Algorithm::Greek,
        "hungarian" => Algorithm::Hungarian,
        "italian" => Algorithm::Italian,
        "norwegian" => Algorithm::Norwegian,
        "portuguese" => Algorithm::Portuguese,
        "romanian" => Algorithm::Romanian,
        "russian" => Algorithm::Russian,
        "spanish" => Algorithm::Spanish,
        "swedish" => Algorithm::Swedish,
        "tamil" => Algorithm::Tamil,
        "turkish" => Algorithm::Turkish,
        _ => return None,
    })
}
