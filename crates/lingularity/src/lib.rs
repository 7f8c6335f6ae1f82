pub mod articles;
pub mod deviation;
pub mod difficulty;
pub mod evaluation;
pub mod index;
pub mod persist;
pub mod retrieval;
pub mod store;
pub mod vocabulary;

pub use deviation::{char_deviation_count, deviation_masks};
pub use difficulty::{CorpusSubset, DifficultyMode, filter_by_difficulty};
pub use evaluation::evaluate;
pub use index::{IndexError, IndexOptions, TokenIndex};
pub use retrieval::SentenceRetriever;
pub use store::{DocumentStore, StoreError, VocabularyStore};
pub use vocabulary::{VocableDrill, active_entries};
