//! Shared types for the Lingularity workspace.
//!
//! The crates built on top of this one agree on a handful of small values:
//! universal part-of-speech tags ([`PosTag`]), the qualitative outcome of
//! checking a typed answer ([`ResponseEvaluation`]), borrowed sentence pairs
//! ([`SentencePair`]) and the persisted flashcard record ([`VocableEntry`]).
//!
//! ```rust
//! use lingularity_types::{PosTag, ResponseEvaluation};
//!
//! assert_eq!(PosTag::from_code("NOUN"), Some(PosTag::Noun));
//! assert_eq!(ResponseEvaluation::AccentError.score(), 0.75);
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Score at which a vocable counts as perfected.
pub const PERFECTION_SCORE: f64 = 5.0;

/// Number of days a perfected vocable stays out of the drill rotation.
pub const PERFECTION_RETENTION_DAYS: i64 = 50;

/// Universal dependencies part-of-speech tag (`NOUN`, `VERB`, ...).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum PosTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl PosTag {
    /// Parse an upper-case UPOS code.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "ADJ" => PosTag::Adj,
            "ADP" => PosTag::Adp,
            "ADV" => PosTag::Adv,
            "AUX" => PosTag::Aux,
            "CCONJ" => PosTag::Cconj,
            "DET" => PosTag::Det,
            "INTJ" => PosTag::Intj,
            "NOUN" => PosTag::Noun,
            "NUM" => PosTag::Num,
            "PART" => PosTag::Part,
            "PRON" => PosTag::Pron,
            "PROPN" => PosTag::Propn,
            "PUNCT" => PosTag::Punct,
            "SCONJ" => PosTag::Sconj,
            "SYM" => PosTag::Sym,
            "VERB" => PosTag::Verb,
            "X" => PosTag::X,
            _ => return None,
        })
    }

    /// Emit the UPOS code.
    pub fn code(self) -> &'static str {
        match self {
            PosTag::Adj => "ADJ",
            PosTag::Adp => "ADP",
            PosTag::Adv => "ADV",
            PosTag::Aux => "AUX",
            PosTag::Cconj => "CCONJ",
            PosTag::Det => "DET",
            PosTag::Intj => "INTJ",
            PosTag::Noun => "NOUN",
            PosTag::Num => "NUM",
            PosTag::Part => "PART",
            PosTag::Pron => "PRON",
            PosTag::Propn => "PROPN",
            PosTag::Punct => "PUNCT",
            PosTag::Sconj => "SCONJ",
            PosTag::Sym => "SYM",
            PosTag::Verb => "VERB",
            PosTag::X => "X",
        }
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of comparing a typed response with its ground truth.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ResponseEvaluation {
    NoResponse,
    Wrong,
    MissingArticle,
    WrongArticle,
    AlmostCorrect,
    AccentError,
    Correct,
}

impl ResponseEvaluation {
    /// Score contribution credited to a vocable for this outcome.
    ///
    /// `MissingArticle`, `WrongArticle` and `AlmostCorrect` share a weight.
    pub fn score(self) -> f64 {
        match self {
            ResponseEvaluation::NoResponse | ResponseEvaluation::Wrong => 0.0,
            ResponseEvaluation::MissingArticle
            | ResponseEvaluation::WrongArticle
            | ResponseEvaluation::AlmostCorrect => 0.5,
            ResponseEvaluation::AccentError => 0.75,
            ResponseEvaluation::Correct => 1.0,
        }
    }
}

impl fmt::Display for ResponseEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResponseEvaluation::NoResponse => "no response",
            ResponseEvaluation::Wrong => "wrong",
            ResponseEvaluation::MissingArticle => "missing article",
            ResponseEvaluation::WrongArticle => "wrong article",
            ResponseEvaluation::AlmostCorrect => "almost correct",
            ResponseEvaluation::AccentError => "accent error",
            ResponseEvaluation::Correct => "correct",
        })
    }
}

/// One line of a bilingual corpus, borrowed from its backing buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SentencePair<'a> {
    pub reference: &'a str,
    pub foreign: &'a str,
}

/// How tokens were normalized before indexing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationKind {
    Lemma,
    Stem,
    Raw,
}

impl fmt::Display for NormalizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NormalizationKind::Lemma => "lemma",
            NormalizationKind::Stem => "stem",
            NormalizationKind::Raw => "raw",
        })
    }
}

/// Training mode a session statistic is booked against.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Trainer {
    VocableTrainer,
    SentenceTranslation,
}

impl Trainer {
    /// Identifier used as key in the training chronic.
    pub fn id(self) -> &'static str {
        match self {
            Trainer::VocableTrainer => "vocableTrainer",
            Trainer::SentenceTranslation => "sentenceTranslation",
        }
    }
}

impl fmt::Display for Trainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Trainer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vocableTrainer" => Ok(Trainer::VocableTrainer),
            "sentenceTranslation" => Ok(Trainer::SentenceTranslation),
            other => Err(format!("unknown trainer: {other}")),
        }
    }
}

/// A tracked foreign-language word or phrase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocableEntry {
    pub vocable: String,
    pub meaning: String,
    pub times_faced: u32,
    pub score: f64,
    pub last_faced_date: Option<NaiveDate>,
}

impl VocableEntry {
    pub fn new(vocable: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            vocable: vocable.into(),
            meaning: meaning.into(),
            times_faced: 0,
            score: 0.0,
            last_faced_date: None,
        }
    }

    /// Whether the entry is mastered and was faced recently enough to skip drilling.
    pub fn is_perfected(&self, today: NaiveDate) -> bool {
        self.score >= PERFECTION_SCORE
            && self
                .last_faced_date
                .is_some_and(|date| (today - date).num_days() <= PERFECTION_RETENTION_DAYS)
    }

    /// Book one training encounter.
    pub fn record_encounter(&mut self, evaluation: ResponseEvaluation, today: NaiveDate) {
        self.score += evaluation.score();
        self.times_faced += 1;
        self.last_faced_date = Some(today);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn pos_codes_round_trip() {
        for code in ["ADJ", "ADP", "DET", "PROPN", "X"] {
            assert_eq!(PosTag::from_code(code).unwrap().code(), code);
        }
        assert_eq!(PosTag::from_code("noun"), None);
    }

    #[test]
    fn article_outcomes_share_weight() {
        assert_eq!(ResponseEvaluation::MissingArticle.score(), 0.5);
        assert_eq!(ResponseEvaluation::WrongArticle.score(), 0.5);
        assert_eq!(ResponseEvaluation::AlmostCorrect.score(), 0.5);
        assert_eq!(ResponseEvaluation::Wrong.score(), 0.0);
        assert_eq!(ResponseEvaluation::Correct.score(), 1.0);
    }

    #[test]
    fn perfection_requires_score_and_recency() {
        let mut entry = VocableEntry::new("il meglio", "the best");
        entry.score = 5.0;
        assert!(!entry.is_perfected(date(2024, 3, 1)));

        entry.last_faced_date = Some(date(2024, 1, 1));
        assert!(entry.is_perfected(date(2024, 2, 1)));
        assert!(!entry.is_perfected(date(2024, 3, 1)));

        entry.score = 4.75;
        assert!(!entry.is_perfected(date(2024, 1, 2)));
    }

    #[test]
    fn records_encounters() {
        let mut entry = VocableEntry::new("scopare", "to sweep");
        entry.record_encounter(ResponseEvaluation::AccentError, date(2024, 5, 4));
        entry.record_encounter(ResponseEvaluation::Wrong, date(2024, 5, 5));
        assert_eq!(entry.times_faced, 2);
        assert_eq!(entry.score, 0.75);
        assert_eq!(entry.last_faced_date, Some(date(2024, 5, 5)));
    }

    #[test]
    fn entry_serializes_camel_case() {
        let mut entry = VocableEntry::new("ventredì", "friday");
        entry.last_faced_date = Some(date(2024, 5, 4));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["timesFaced"], 0);
        assert_eq!(json["lastFacedDate"], "2024-05-04");
    }
}
