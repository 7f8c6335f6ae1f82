//! Sentence selection for translation training by lexical difficulty.

use std::fmt;
use std::str::FromStr;

use lingularity_corpus::SentenceCorpus;
use lingularity_types::SentencePair;
use tracing::info;

use crate::index::TokenIndex;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DifficultyMode {
    /// Sentences built only from common vocabulary.
    Simple,
    /// Sentences introducing at least one rarer token.
    DictionExpansion,
    /// The whole corpus.
    Random,
}

impl FromStr for DifficultyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(DifficultyMode::Simple),
            "diction-expansion" | "diction_expansion" => Ok(DifficultyMode::DictionExpansion),
            "random" => Ok(DifficultyMode::Random),
            other => Err(format!("unknown difficulty mode: {other}")),
        }
    }
}

impl fmt::Display for DifficultyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DifficultyMode::Simple => "simple",
            DifficultyMode::DictionExpansion => "diction-expansion",
            DifficultyMode::Random => "random",
        })
    }
}

/// Retained sentences of a corpus, in corpus order.
pub struct CorpusSubset<'a> {
    corpus: &'a SentenceCorpus,
    indices: Vec<usize>,
}

impl<'a> CorpusSubset<'a> {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SentencePair<'a>> + '_ {
        self.indices.iter().filter_map(|idx| self.corpus.get(*idx))
    }
}

/// Keep the sentences of `corpus` suiting `mode`, judged by `index`'s occurrence counts.
pub fn filter_by_difficulty<'a>(
    corpus: &'a SentenceCorpus,
    index: &TokenIndex,
    mode: DifficultyMode,
) -> CorpusSubset<'a> {
    let indices: Vec<usize> = match mode {
        DifficultyMode::Random => (0..corpus.len()).collect(),
        DifficultyMode::Simple | DifficultyMode::DictionExpansion => {
            let counts: Vec<usize> = index.occurrences().values().copied().collect();
            let per_sentence = index.counted_tokens_per_sentence();
            let count_of = |token: &str| index.occurrence_count(token).unwrap_or(0) as f64;
            let threshold = if mode == DifficultyMode::Simple {
                median(&counts)
            } else {
                mean(&counts)
            };

            (0..corpus.len())
                .filter(|idx| {
                    let tokens = per_sentence.get(*idx).map_or(&[][..], Vec::as_slice);
                    if mode == DifficultyMode::Simple {
                        tokens.iter().all(|t| count_of(*t) >= threshold)
                    } else {
                        tokens.iter().any(|t| count_of(*t) <= threshold)
                    }
                })
                .collect()
        }
    };

    info!(
        "{mode} mode kept {} of {} sentences",
        indices.len(),
        corpus.len()
    );
    CorpusSubset { corpus, indices }
}

fn median(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    }
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<usize>() as f64 / values.len() as f64
}
