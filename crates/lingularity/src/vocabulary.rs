use chrono::NaiveDate;
use lingularity_types::{ResponseEvaluation, Trainer, VocableEntry};
use tracing::{debug, info};

use crate::evaluation::evaluate;
use crate::store::{StoreError, VocabularyStore};

/// Entries still in the drill rotation.
pub fn active_entries(entries: &[VocableEntry], today: NaiveDate) -> Vec<&VocableEntry> {
    entries
        .iter()
        .filter(|entry| !entry.is_perfected(today))
        .collect()
}

/// One vocable drilling session against a store.
pub struct VocableDrill<'s, S: VocabularyStore> {
    store: &'s mut S,
    language: String,
    today: NaiveDate,
    faced: u32,
}

impl<'s, S: VocabularyStore> VocableDrill<'s, S> {
    pub fn new(store: &'s mut S, language: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            store,
            language: language.into(),
            today,
            faced: 0,
        }
    }

    /// Non-perfected entries of the session language.
    pub fn active_entries(&self) -> Vec<VocableEntry> {
        let entries = self.store.query_vocabulary(&self.language);
        active_entries(&entries, self.today)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Evaluate `response` against the entry's meaning, book and persist the encounter.
    pub fn answer(
        &mut self,
        entry: &mut VocableEntry,
        response: &str,
        identification_aid: &str,
    ) -> Result<ResponseEvaluation, StoreError> {
        let (adjusted, evaluation) = evaluate(response, &entry.meaning, identification_aid);
        debug!(
            "{:?}: {adjusted:?} vs {:?} -> {evaluation}",
            entry.vocable, entry.meaning
        );
        entry.record_encounter(evaluation, self.today);
        self.store.upsert_vocable_entry(&self.language, entry)?;
        self.faced += 1;
        Ok(evaluation)
    }

    pub fn faced(&self) -> u32 {
        self.faced
    }

    /// Book the session in the training chronic.
    pub fn finish(self) -> Result<u32, StoreError> {
        if self.faced > 0 {
            self.store
                .increment_session_statistics(Trainer::VocableTrainer, self.faced, self.today)?;
        }
        info!("faced {} {} vocables", self.faced, self.language);
        Ok(self.faced)
    }
}
