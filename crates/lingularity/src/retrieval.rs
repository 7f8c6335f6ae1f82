use bitvec::prelude::*;
use lingularity_corpus::SentenceCorpus;
use lingularity_morph::tokenize::meaningful_tokens;
use lingularity_morph::{Normalize, Normalizer};
use lingularity_types::SentencePair;
use tracing::debug;

use crate::articles::article_stripped_noun;
use crate::index::{IndexOptions, TokenIndex};

type BitSet = BitVec<usize, Lsb0>;

/// Best-fit lookup of example sentences for a vocable.
pub struct SentenceRetriever<'a> {
    index: &'a TokenIndex,
    normalizer: &'a Normalizer,
    options: IndexOptions,
}

impl<'a> SentenceRetriever<'a> {
    /// `normalizer` and `options` must match the ones `index` was built with.
    pub fn new(index: &'a TokenIndex, normalizer: &'a Normalizer, options: IndexOptions) -> Self {
        Self {
            index,
            normalizer,
            options,
        }
    }

    /// Indices of the sentences best matching `vocable`, ascending.
    ///
    /// Prefers sentences containing every query token. Tokens are ordered
    /// shortest first; when no sentence contains all of them, the last
    /// (longest) token is dropped until some do, down to the hits of the
    /// shortest token alone. `None` when no token is indexed.
    pub fn query_sentence_indices(&self, vocable: &str) -> Option<Vec<usize>> {
        let mut tokens: Vec<String> = match article_stripped_noun(vocable) {
            Some(noun) => meaningful_tokens(noun, self.options.split_apostrophes),
            None => meaningful_tokens(vocable, self.options.split_apostrophes),
        };
        tokens.sort_by_key(|token| token.chars().count());

        let len = self.index.corpus_len();
        let mut sets: Vec<BitSet> = tokens
            .iter()
            .filter_map(|token| {
                let key = self.normalizer.normalize(token);
                let hits = self.index.sentence_indices(&key)?;
                debug!("{token:?} -> {key:?}: {} hits", hits.len());
                let mut set = bitvec![usize, Lsb0; 0; len];
                for idx in hits {
                    if *idx < len {
                        set.set(*idx, true);
                    }
                }
                set.any().then_some(set)
            })
            .collect();

        if sets.is_empty() {
            debug!("no indexed sentences for {vocable:?}");
            return None;
        }

        while sets.len() > 1 {
            let mut candidates = sets[0].clone();
            for set in &sets[1..] {
                candidates &= set;
                if candidates.not_any() {
                    break;
                }
            }
            if candidates.any() {
                return Some(candidates.iter_ones().collect());
            }
            sets.pop();
        }
        Some(sets[0].iter_ones().collect())
    }

    /// Up to `limit` retrieved sentence pairs, shortest foreign sentence first.
    pub fn example_sentences<'c>(
        &self,
        corpus: &'c SentenceCorpus,
        vocable: &str,
        limit: usize,
    ) -> Vec<SentencePair<'c>> {
        let Some(indices) = self.query_sentence_indices(vocable) else {
            return Vec::new();
        };
        let mut pairs: Vec<(usize, SentencePair<'c>)> = indices
            .into_iter()
            .filter_map(|idx| corpus.get(idx).map(|pair| (idx, pair)))
            .collect();
        pairs.sort_by_key(|(idx, pair)| (pair.foreign.chars().count(), *idx));
        pairs.into_iter().take(limit).map(|(_, pair)| pair).collect()
    }
}
