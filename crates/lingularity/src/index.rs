use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use lingularity_corpus::SentenceCorpus;
use lingularity_morph::tokenize::meaningful_tokens;
use lingularity_morph::{Normalize, Normalizer};
use lingularity_types::{NormalizationKind, PosTag, SentencePair};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::persist::{PersistError, read_json, write_json_atomic};

/// Tags never indexed when lemmatizing.
const EXCLUDED_TAGS: [PosTag; 6] = [
    PosTag::Det,
    PosTag::Propn,
    PosTag::Sym,
    PosTag::Punct,
    PosTag::X,
    PosTag::Part,
];

/// Tags feeding the occurrence counts when lemmatizing.
const COUNTED_TAGS: [PosTag; 5] = [
    PosTag::Verb,
    PosTag::Noun,
    PosTag::Adj,
    PosTag::Adv,
    PosTag::Adp,
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexOptions {
    /// Split elided forms such as `l'uomo` into separate tokens.
    pub split_apostrophes: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            split_apostrophes: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index cache error: {0}")]
    Cache(#[from] PersistError),
}

/// Inverted mapping from normalized token to the sentences containing it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TokenIndex {
    kind: NormalizationKind,
    corpus_len: usize,
    sentence_indices: BTreeMap<String, Vec<usize>>,
    occurrences: BTreeMap<String, usize>,
}

impl TokenIndex {
    /// Index the foreign side of `corpus`.
    ///
    /// Each occurrence appends its sentence index, so a token used twice in a
    /// sentence lists that sentence twice.
    pub fn build(
        corpus: &SentenceCorpus,
        normalizer: &Normalizer,
        options: &IndexOptions,
    ) -> Self {
        let start = Instant::now();
        let mut index = Self {
            kind: normalizer.kind(),
            corpus_len: corpus.len(),
            sentence_indices: BTreeMap::new(),
            occurrences: BTreeMap::new(),
        };

        for (idx, pair) in corpus.iter().enumerate() {
            let names = proper_nouns(pair, options.split_apostrophes);
            match normalizer {
                Normalizer::Lemma(lemmatizer) => {
                    for token in lemmatizer.tag(pair.foreign, options.split_apostrophes) {
                        if names.contains(&token.surface)
                            || token.pos.is_some_and(|pos| EXCLUDED_TAGS.contains(&pos))
                        {
                            continue;
                        }
                        let counted = token.pos.is_some_and(|pos| COUNTED_TAGS.contains(&pos));
                        index.insert(token.lemma, idx, counted);
                    }
                }
                Normalizer::Stem(_) | Normalizer::Raw => {
                    for token in meaningful_tokens(pair.foreign, options.split_apostrophes) {
                        if names.contains(&token) {
                            continue;
                        }
                        index.insert(normalizer.normalize(&token), idx, true);
                    }
                }
            }
        }

        info!(
            "indexed {} {} tokens over {} sentences in {} ms",
            index.sentence_indices.len(),
            index.kind,
            index.corpus_len,
            start.elapsed().as_millis()
        );
        index
    }

    fn insert(&mut self, key: String, idx: usize, counted: bool) {
        if key.is_empty() {
            return;
        }
        if counted {
            *self.occurrences.entry(key.clone()).or_default() += 1;
        }
        self.sentence_indices.entry(key).or_default().push(idx);
    }

    /// Reuse a cached lemma index for this corpus, building and caching it when missing or stale.
    ///
    /// Stem and raw indices are cheap and always rebuilt.
    pub fn load_or_build(
        corpus: &SentenceCorpus,
        normalizer: &Normalizer,
        options: &IndexOptions,
        cache_dir: Option<&Path>,
    ) -> Result<Self, IndexError> {
        let cache = cache_dir
            .filter(|_| normalizer.kind() == NormalizationKind::Lemma)
            .map(|dir| Self::cache_path(dir, corpus.language()));
        let Some(path) = cache else {
            return Ok(Self::build(corpus, normalizer, options));
        };

        if path.exists() {
            match Self::load(&path) {
                Ok(index)
                    if index.kind == NormalizationKind::Lemma
                        && index.corpus_len == corpus.len() =>
                {
                    info!("loaded cached index from {}", path.display());
                    return Ok(index);
                }
                Ok(index) => warn!(
                    "cached index at {} covers {} sentences, corpus has {}; rebuilding",
                    path.display(),
                    index.corpus_len,
                    corpus.len()
                ),
                Err(err) => warn!("ignoring unreadable index cache {}: {err}", path.display()),
            }
        }

        let index = Self::build(corpus, normalizer, options);
        index.save(&path)?;
        debug!("cached index at {}", path.display());
        Ok(index)
    }

    pub fn cache_path(cache_dir: &Path, language: &str) -> PathBuf {
        cache_dir.join(format!("{}.json", language.trim().to_lowercase()))
    }

    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        write_json_atomic(path, self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, IndexError> {
        Ok(read_json(path)?)
    }

    pub fn kind(&self) -> NormalizationKind {
        self.kind
    }

    pub fn corpus_len(&self) -> usize {
        self.corpus_len
    }

    pub fn token_count(&self) -> usize {
        self.sentence_indices.len()
    }

    /// Sentence indices for an already normalized token, with multiplicity.
    pub fn sentence_indices(&self, token: &str) -> Option<&[usize]> {
        self.sentence_indices.get(token).map(Vec::as_slice)
    }

    pub fn occurrence_count(&self, token: &str) -> Option<usize> {
        self.occurrences.get(token).copied()
    }

    pub fn occurrences(&self) -> &BTreeMap<String, usize> {
        &self.occurrences
    }

    /// Counted tokens of each sentence, derived by inverting the index.
    pub fn counted_tokens_per_sentence(&self) -> Vec<Vec<&str>> {
        let mut per_sentence: Vec<Vec<&str>> = vec![Vec::new(); self.corpus_len];
        for (token, indices) in &self.sentence_indices {
            if !self.occurrences.contains_key(token) {
                continue;
            }
            for idx in indices {
                if let Some(tokens) = per_sentence.get_mut(*idx)
                    && tokens.last() != Some(&token.as_str())
                {
                    tokens.push(token);
                }
            }
        }
        per_sentence
    }
}

/// Tokens of the foreign sentence that also appear capitalized in the reference sentence.
///
/// A single-character token only counts when it lies outside Latin-1.
pub fn proper_nouns(pair: SentencePair<'_>, split_apostrophes: bool) -> HashSet<String> {
    let reference: HashSet<String> = meaningful_tokens(pair.reference, split_apostrophes)
        .into_iter()
        .collect();
    meaningful_tokens(pair.foreign, split_apostrophes)
        .into_iter()
        .filter(|token| reference.contains(token) && looks_like_name(token))
        .collect()
}

fn looks_like_name(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_uppercase() && (chars.next().is_some() || u32::from(first) > 255)
}
