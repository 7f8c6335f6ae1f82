use std::env;
use std::path::PathBuf;

use lingularity_morph::{LemmaModels, Normalize, Normalizer};
use lingularity_types::NormalizationKind;

fn lexicon_dir() -> Option<PathBuf> {
    env::var("LINGULARITY_LEXICON_DIR").ok().map(PathBuf::from)
}

#[test]
fn lemmatizes_against_installed_english_model() {
    let Some(dir) = lexicon_dir() else {
        eprintln!("skipping: LINGULARITY_LEXICON_DIR not set");
        return;
    };
    let models = LemmaModels::new(&dir);
    if !models.is_available("English") {
        eprintln!("skipping: no English model in {}", dir.display());
        return;
    }
    let normalizer = Normalizer::select("English", &models).expect("load model");
    assert_eq!(normalizer.kind(), NormalizationKind::Lemma);
    assert_eq!(normalizer.normalize("children"), "child");
}

#[test]
fn capability_lookup_prefers_lemma_models() {
    let dir = tempfile::tempdir().unwrap();
    let english = dir.path().join("english");
    std::fs::create_dir_all(&english).unwrap();
    std::fs::write(english.join("lemmas.tsv"), "run\trun\tVERB\nmice\tmouse\tNOUN\n").unwrap();

    let models = LemmaModels::new(dir.path());
    let english = Normalizer::select("English", &models).expect("english");
    assert_eq!(english.kind(), NormalizationKind::Lemma);
    assert_eq!(english.normalize("Mice"), "mouse");
    assert_eq!(english.normalize("running"), "run");

    let german = Normalizer::select("German", &models).expect("german");
    assert_eq!(german.kind(), NormalizationKind::Stem);

    let esperanto = Normalizer::select("Esperanto", &models).expect("esperanto");
    assert_eq!(esperanto.kind(), NormalizationKind::Raw);
}
