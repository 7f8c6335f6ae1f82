//! Vocabulary and training-statistics persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use lingularity_types::{Trainer, VocableEntry};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::persist::{PersistError, read_json, write_json_atomic};

/// Sessions per trainer id, per day.
pub type TrainingChronic = BTreeMap<NaiveDate, BTreeMap<String, u32>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Persist(#[from] PersistError),
    #[error("unknown {language} vocable: {vocable}")]
    UnknownVocable { language: String, vocable: String },
}

/// Document-store operations the trainers rely on.
pub trait VocabularyStore {
    fn query_vocabulary(&self, language: &str) -> Vec<VocableEntry>;

    fn upsert_vocable_entry(&mut self, language: &str, entry: &VocableEntry)
    -> Result<(), StoreError>;

    /// Returns whether an entry was removed.
    fn delete_vocable_entry(&mut self, language: &str, vocable: &str) -> Result<bool, StoreError>;

    fn update_vocable_score(
        &mut self,
        language: &str,
        vocable: &str,
        score: f64,
    ) -> Result<(), StoreError>;

    fn query_training_chronic(&self) -> TrainingChronic;

    fn increment_session_statistics(
        &mut self,
        trainer: Trainer,
        count: u32,
        date: NaiveDate,
    ) -> Result<(), StoreError>;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    vocabulary: BTreeMap<String, BTreeMap<String, VocableEntry>>,
    training_chronic: TrainingChronic,
}

/// Single-user document, optionally mirrored to a JSON file after each change.
#[derive(Debug, Default)]
pub struct DocumentStore {
    document: Document,
    path: Option<PathBuf>,
}

impl DocumentStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the document at `path`, starting empty when the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let document = if path.exists() {
            let document: Document = read_json(&path)?;
            info!(
                "opened store {} with {} languages",
                path.display(),
                document.vocabulary.len()
            );
            document
        } else {
            Document::default()
        };
        Ok(Self {
            document,
            path: Some(path),
        })
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(path) = &self.path {
            write_json_atomic(path, &self.document)?;
            debug!("flushed store to {}", path.display());
        }
        Ok(())
    }

    fn language_key(language: &str) -> String {
        language.trim().to_lowercase()
    }
}

impl VocabularyStore for DocumentStore {
    fn query_vocabulary(&self, language: &str) -> Vec<VocableEntry> {
        self.document
            .vocabulary
            .get(&Self::language_key(language))
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default()
    }

    fn upsert_vocable_entry(
        &mut self,
        language: &str,
        entry: &VocableEntry,
    ) -> Result<(), StoreError> {
        self.document
            .vocabulary
            .entry(Self::language_key(language))
            .or_default()
            .insert(entry.vocable.clone(), entry.clone());
        self.flush()
    }

    fn delete_vocable_entry(&mut self, language: &str, vocable: &str) -> Result<bool, StoreError> {
        let removed = self
            .document
            .vocabulary
            .get_mut(&Self::language_key(language))
            .and_then(|entries| entries.remove(vocable))
            .is_some();
        if removed {
            self.flush()?;
        }
        Ok(removed)
    }

    fn update_vocable_score(
        &mut self,
        language: &str,
        vocable: &str,
        score: f64,
    ) -> Result<(), StoreError> {
        let Some(entry) = self
            .document
            .vocabulary
            .get_mut(&Self::language_key(language))
            .and_then(|entries| entries.get_mut(vocable))
        else {
            return Err(StoreError::UnknownVocable {
                language: language.to_string(),
                vocable: vocable.to_string(),
            });
        };
        entry.score = score;
        self.flush()
    }

    fn query_training_chronic(&self) -> TrainingChronic {
        self.document.training_chronic.clone()
    }

    fn increment_session_statistics(
        &mut self,
        trainer: Trainer,
        count: u32,
        date: NaiveDate,
    ) -> Result<(), StoreError> {
        *self
            .document
            .training_chronic
            .entry(date)
            .or_default()
            .entry(trainer.id().to_string())
            .or_default() += count;
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn upserts_queries_and_deletes() {
        let mut store = DocumentStore::in_memory();
        store
            .upsert_vocable_entry("Italian", &VocableEntry::new("il gatto", "the cat"))
            .unwrap();
        store
            .upsert_vocable_entry("italian", &VocableEntry::new("il cane", "the dog"))
            .unwrap();
        assert_eq!(store.query_vocabulary("Italian").len(), 2);
        assert!(store.query_vocabulary("French").is_empty());

        assert!(store.delete_vocable_entry("Italian", "il cane").unwrap());
        assert!(!store.delete_vocable_entry("Italian", "il cane").unwrap());
        assert_eq!(store.query_vocabulary("Italian")[0].vocable, "il gatto");
    }

    #[test]
    fn updates_scores_of_known_entries_only() {
        let mut store = DocumentStore::in_memory();
        store
            .upsert_vocable_entry("Italian", &VocableEntry::new("il gatto", "the cat"))
            .unwrap();
        store.update_vocable_score("Italian", "il gatto", 2.5).unwrap();
        assert_eq!(store.query_vocabulary("Italian")[0].score, 2.5);

        let err = store.update_vocable_score("Italian", "il cane", 1.0).unwrap_err();
        assert!(matches!(err, StoreError::UnknownVocable { .. }));
    }

    #[test]
    fn accumulates_training_chronic() {
        let mut store = DocumentStore::in_memory();
        store
            .increment_session_statistics(Trainer::VocableTrainer, 10, day(4))
            .unwrap();
        store
            .increment_session_statistics(Trainer::VocableTrainer, 5, day(4))
            .unwrap();
        store
            .increment_session_statistics(Trainer::SentenceTranslation, 3, day(5))
            .unwrap();

        let chronic = store.query_training_chronic();
        assert_eq!(chronic[&day(4)]["vocableTrainer"], 15);
        assert_eq!(chronic[&day(5)]["sentenceTranslation"], 3);
    }

    #[test]
    fn persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        {
            let mut store = DocumentStore::open(&path).unwrap();
            store
                .upsert_vocable_entry("Italian", &VocableEntry::new("il gatto", "the cat"))
                .unwrap();
            store
                .increment_session_statistics(Trainer::VocableTrainer, 1, day(4))
                .unwrap();
        }
        let store = DocumentStore::open(&path).unwrap();
        assert_eq!(store.query_vocabulary("Italian").len(), 1);
        assert_eq!(store.query_training_chronic()[&day(4)]["vocableTrainer"], 1);
    }
}
