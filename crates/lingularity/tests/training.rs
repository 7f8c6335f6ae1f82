use chrono::NaiveDate;
use lingularity::deviation::caret_line;
use lingularity::{DocumentStore, VocabularyStore, VocableDrill, deviation_masks, evaluate};
use lingularity_types::{ResponseEvaluation, Trainer, VocableEntry};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

#[test]
fn classifies_typical_responses() {
    let cases = [
        ("", "the cat", ResponseEvaluation::NoResponse),
        ("the cat", "the cat", ResponseEvaluation::Correct),
        ("citta", "città", ResponseEvaluation::AccentError),
        ("gatto", "il gatto", ResponseEvaluation::MissingArticle),
        ("la gatto", "il gatto", ResponseEvaluation::WrongArticle),
        ("the hose", "the house", ResponseEvaluation::AlmostCorrect),
        ("the dog", "the cat", ResponseEvaluation::Wrong),
    ];
    for (response, truth, expected) in cases {
        assert_eq!(evaluate(response, truth, "").1, expected, "{response:?}");
    }
}

#[test]
fn aid_completes_the_response() {
    let (adjusted, outcome) = evaluate("eat", "to eat", "to ");
    assert_eq!(adjusted, "to eat");
    assert_eq!(outcome, ResponseEvaluation::Correct);

    let (adjusted, _) = evaluate("to eat", "to eat", "to ");
    assert_eq!(adjusted, "to eat");
}

#[test]
fn carets_mark_deviations() {
    let (response, truth) = deviation_masks("the hose", "the house");
    assert!(response.not_any());
    assert_eq!(caret_line(&response), "");
    assert_eq!(caret_line(&truth), "      ^");
}

#[test]
fn drilled_vocabulary_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user.json");

    {
        let mut store = DocumentStore::open(&path).unwrap();
        store
            .upsert_vocable_entry("Italian", &VocableEntry::new("la casa", "the house"))
            .unwrap();
        store
            .upsert_vocable_entry("Italian", &VocableEntry::new("mangiare", "to eat"))
            .unwrap();

        let mut drill = VocableDrill::new(&mut store, "Italian", day(1));
        let mut entries = drill.active_entries();
        assert_eq!(entries.len(), 2);
        for entry in &mut entries {
            let response = if entry.vocable == "la casa" { "the house" } else { "drink" };
            drill.answer(entry, response, "").unwrap();
        }
        assert_eq!(drill.finish().unwrap(), 2);
    }

    let store = DocumentStore::open(&path).unwrap();
    let vocabulary = store.query_vocabulary("Italian");
    let casa = vocabulary.iter().find(|e| e.vocable == "la casa").unwrap();
    let mangiare = vocabulary.iter().find(|e| e.vocable == "mangiare").unwrap();
    assert_eq!(casa.score, 1.0);
    assert_eq!(mangiare.score, 0.0);
    assert_eq!(mangiare.times_faced, 1);
    assert_eq!(
        store.query_training_chronic()[&day(1)][Trainer::VocableTrainer.id()],
        2
    );
}
