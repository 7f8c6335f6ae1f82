use std::collections::HashSet;
use std::path::PathBuf;

use lingularity::articles::article_stripped_noun;
use lingularity::{DifficultyMode, IndexOptions, SentenceRetriever, TokenIndex, filter_by_difficulty};
use lingularity_corpus::SentenceCorpus;
use lingularity_morph::tokenize::meaningful_tokens;
use lingularity_morph::{LemmaModels, Lemmatizer, Normalize, Normalizer};
use lingularity_types::{NormalizationKind, PosTag};

fn fixture() -> SentenceCorpus {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../lingularity-corpus/tests/fixtures/italian.tsv");
    SentenceCorpus::load(path, "Italian").unwrap()
}

fn lemmatizer() -> Normalizer {
    Normalizer::Lemma(Lemmatizer::from_entries(
        [
            ("il", "il", PosTag::Det),
            ("i", "il", PosTag::Det),
            ("gatto", "gatto", PosTag::Noun),
            ("gatti", "gatto", PosTag::Noun),
            ("dormendo", "dormire", PosTag::Verb),
        ],
        Vec::new(),
    ))
}

fn normalizers() -> [Normalizer; 3] {
    [
        Normalizer::select("Italian", &LemmaModels::none()).unwrap(),
        Normalizer::Raw,
        lemmatizer(),
    ]
}

fn normalized_tokens(normalizer: &Normalizer, text: &str) -> Vec<String> {
    meaningful_tokens(text, true)
        .iter()
        .map(|token| normalizer.normalize(token))
        .collect()
}

#[test]
fn retrieved_sentences_contain_the_query_tokens() {
    let corpus = fixture();
    let options = IndexOptions::default();
    let vocables = [
        "gatti dormendo",
        "il gatto",
        "i gatti",
        "l'uomo",
        "uomo mortale",
        "è mortale",
        "gatto partito",
        "sta gatti ho",
        "mi piacciono cani",
        "vai capisco",
    ];
    let mut found = 0;
    for normalizer in normalizers() {
        let index = TokenIndex::build(&corpus, &normalizer, &options);
        let retriever = SentenceRetriever::new(&index, &normalizer, options);
        let sentences: Vec<HashSet<String>> = corpus
            .iter()
            .map(|pair| normalized_tokens(&normalizer, pair.foreign).into_iter().collect())
            .collect();

        for vocable in vocables {
            let phrase = article_stripped_noun(vocable).unwrap_or(vocable);
            let keys: Vec<String> = normalized_tokens(&normalizer, phrase)
                .into_iter()
                .filter(|key| index.sentence_indices(key).is_some())
                .collect();
            let Some(hits) = retriever.query_sentence_indices(vocable) else {
                assert!(keys.is_empty(), "{vocable:?} found nothing for {keys:?}");
                continue;
            };
            found += 1;
            let complete = sentences
                .iter()
                .any(|tokens| keys.iter().all(|key| tokens.contains(key)));
            for idx in hits {
                let tokens = &sentences[idx];
                assert!(
                    keys.iter().any(|key| tokens.contains(key)),
                    "{vocable:?} returned unrelated sentence {idx} under {:?}",
                    normalizer.kind()
                );
                if complete {
                    assert!(
                        keys.iter().all(|key| tokens.contains(key)),
                        "{vocable:?} returned partial match {idx} under {:?}",
                        normalizer.kind()
                    );
                }
            }
        }
    }
    assert!(found > 0);
}

#[test]
fn indexed_tokens_lead_back_to_every_sentence_using_them() {
    let corpus = fixture();
    let options = IndexOptions::default();
    for normalizer in normalizers() {
        let index = TokenIndex::build(&corpus, &normalizer, &options);
        let retriever = SentenceRetriever::new(&index, &normalizer, options);
        for (idx, pair) in corpus.iter().enumerate() {
            for token in meaningful_tokens(pair.foreign, options.split_apostrophes) {
                if let Some(hits) = retriever.query_sentence_indices(&token) {
                    assert!(
                        hits.contains(&idx),
                        "{token:?} misses sentence {idx} under {:?}",
                        normalizer.kind()
                    );
                }
            }
        }
    }
}

#[test]
fn queries_are_repeatable() {
    let corpus = fixture();
    let options = IndexOptions::default();
    let normalizer = Normalizer::select("Italian", &LemmaModels::none()).unwrap();
    let index = TokenIndex::build(&corpus, &normalizer, &options);
    let retriever = SentenceRetriever::new(&index, &normalizer, options);
    let first = retriever.query_sentence_indices("gatti");
    assert!(first.is_some());
    assert_eq!(first, retriever.query_sentence_indices("gatti"));
}

#[test]
fn names_and_unknown_words_find_nothing() {
    let corpus = fixture();
    let options = IndexOptions::default();
    let index = TokenIndex::build(&corpus, &Normalizer::Raw, &options);
    let retriever = SentenceRetriever::new(&index, &Normalizer::Raw, options);
    assert_eq!(retriever.query_sentence_indices("Tom"), None);
    assert_eq!(retriever.query_sentence_indices("automobile"), None);
    assert!(retriever.example_sentences(&corpus, "Tom", 3).is_empty());
}

#[test]
fn lemma_index_merges_inflections() {
    let corpus = fixture();
    let options = IndexOptions::default();
    let normalizer = lemmatizer();
    let index = TokenIndex::build(&corpus, &normalizer, &options);
    assert_eq!(index.kind(), NormalizationKind::Lemma);
    assert_eq!(index.sentence_indices("gatto"), Some(&[3, 4, 5][..]));
    assert_eq!(index.sentence_indices("il"), None);
    assert_eq!(index.occurrence_count("gatto"), Some(3));

    let retriever = SentenceRetriever::new(&index, &normalizer, options);
    assert_eq!(retriever.query_sentence_indices("il gatto"), Some(vec![3, 4, 5]));
    assert_eq!(retriever.query_sentence_indices("gatto dormire"), Some(vec![4]));

    let examples = retriever.example_sentences(&corpus, "gatto", 2);
    let foreign: Vec<_> = examples.iter().map(|pair| pair.foreign).collect();
    assert_eq!(foreign, vec!["Ho 3 gatti.", "Mi piacciono i gatti."]);
}

#[test]
fn lemma_index_is_cached_per_language() {
    let corpus = fixture();
    let options = IndexOptions::default();
    let normalizer = lemmatizer();
    let dir = tempfile::tempdir().unwrap();

    let built = TokenIndex::load_or_build(&corpus, &normalizer, &options, Some(dir.path())).unwrap();
    let cache = TokenIndex::cache_path(dir.path(), "Italian");
    assert!(cache.exists());

    let cached = TokenIndex::load_or_build(&corpus, &normalizer, &options, Some(dir.path())).unwrap();
    assert_eq!(built, cached);

    let smaller = SentenceCorpus::from_pairs("Italian", [("The cat.", "Il gatto.")]);
    let rebuilt =
        TokenIndex::load_or_build(&smaller, &normalizer, &options, Some(dir.path())).unwrap();
    assert_eq!(rebuilt.corpus_len(), 1);
    assert_eq!(TokenIndex::load(&cache).unwrap(), rebuilt);
}

#[test]
fn stem_indices_are_never_cached() {
    let corpus = fixture();
    let normalizer = Normalizer::select("Italian", &LemmaModels::none()).unwrap();
    assert_eq!(normalizer.kind(), NormalizationKind::Stem);
    let dir = tempfile::tempdir().unwrap();
    TokenIndex::load_or_build(&corpus, &normalizer, &IndexOptions::default(), Some(dir.path()))
        .unwrap();
    assert!(!TokenIndex::cache_path(dir.path(), "Italian").exists());
}

#[test]
fn difficulty_subsets_stay_within_the_corpus() {
    let corpus = fixture();
    let index = TokenIndex::build(&corpus, &Normalizer::Raw, &IndexOptions::default());
    let random = filter_by_difficulty(&corpus, &index, DifficultyMode::Random);
    assert_eq!(random.len(), corpus.len());
    for mode in [DifficultyMode::Simple, DifficultyMode::DictionExpansion] {
        let subset = filter_by_difficulty(&corpus, &index, mode);
        assert!(subset.len() <= corpus.len());
        assert!(subset.indices().windows(2).all(|w| w[0] < w[1]));
    }
}
