//! Lexicon-backed lemmatization with part-of-speech tags.
//!
//! Each language lives in its own directory below a model root:
//!
//! ```text
//! <root>/italian/lemmas.tsv   surface<TAB>lemma<TAB>UPOS
//! <root>/italian/rules.tsv    UPOS<TAB>suffix<TAB>replacement   (optional)
//! ```
//!
//! Lookups follow the classic morphy order: the lexicon entry for the
//! surface form, the surface itself when it is a known lemma, then suffix
//! rules whose output is a known lemma of the rule's part of speech.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use lingularity_types::PosTag;

use crate::tokenize::meaningful_tokens;

const LEMMAS_FILE: &str = "lemmas.tsv";
const RULES_FILE: &str = "rules.tsv";

/// One suffix rewrite: `suffix` is replaced by `replacement` for words of `pos`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuffixRule {
    pub pos: PosTag,
    pub suffix: String,
    pub replacement: String,
}

/// A sentence token paired with its lemma and tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaggedToken {
    pub surface: String,
    pub lemma: String,
    pub pos: Option<PosTag>,
}

/// Directory of per-language lemma models; answers which languages can be lemmatized.
#[derive(Clone, Debug, Default)]
pub struct LemmaModels {
    root: Option<PathBuf>,
}

impl LemmaModels {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// A registry without any models; every language falls through to stemming.
    pub fn none() -> Self {
        Self::default()
    }

    fn language_dir(&self, language: &str) -> Option<PathBuf> {
        self.root
            .as_ref()
            .map(|root| root.join(language.trim().to_lowercase()))
    }

    pub fn is_available(&self, language: &str) -> bool {
        self.language_dir(language)
            .is_some_and(|dir| dir.join(LEMMAS_FILE).is_file())
    }

    pub fn load(&self, language: &str) -> Result<Lemmatizer> {
        let Some(dir) = self.language_dir(language) else {
            bail!("no lemma model directory configured");
        };
        Lemmatizer::load(&dir, language)
    }
}

/// Lexicon lemmatizer for a single language.
#[derive(Clone, Debug, Default)]
pub struct Lemmatizer {
    entries: HashMap<String, (String, PosTag)>,
    lemmas: HashMap<String, HashSet<PosTag>>,
    rules: Vec<SuffixRule>,
}

impl Lemmatizer {
    /// Load `lemmas.tsv` and, when present, `rules.tsv` from a language directory.
    ///
    /// English without a rule file falls back to the built-in suffix rules.
    pub fn load(dir: impl AsRef<Path>, language: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let mut lemmatizer = Self::default();
        for (surface, lemma, pos) in load_lexicon(&dir.join(LEMMAS_FILE))? {
            lemmatizer.insert(&surface, &lemma, pos);
        }

        let rules_path = dir.join(RULES_FILE);
        lemmatizer.rules = if rules_path.exists() {
            load_rules(&rules_path)?
        } else {
            builtin_rules(language)
        };
        Ok(lemmatizer)
    }

    /// Build an in-memory lemmatizer from `(surface, lemma, pos)` triples.
    pub fn from_entries<'a, I>(entries: I, rules: Vec<SuffixRule>) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, PosTag)>,
    {
        let mut lemmatizer = Self {
            rules,
            ..Self::default()
        };
        for (surface, lemma, pos) in entries {
            lemmatizer.insert(surface, lemma, pos);
        }
        lemmatizer
    }

    fn insert(&mut self, surface: &str, lemma: &str, pos: PosTag) {
        let surface = normalize(surface);
        let lemma = normalize(lemma);
        self.lemmas.entry(lemma.clone()).or_default().insert(pos);
        self.entries.entry(surface).or_insert((lemma, pos));
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Resolve a single surface form to its lemma and tag.
    pub fn lemmatize(&self, surface: &str) -> (String, Option<PosTag>) {
        let norm = normalize(surface);

        if let Some((lemma, pos)) = self.entries.get(&norm) {
            return (lemma.clone(), Some(*pos));
        }

        if let Some(tags) = self.lemmas.get(&norm)
            && let Some(pos) = tags.iter().min()
        {
            return (norm, Some(*pos));
        }

        for rule in &self.rules {
            if let Some(candidate) = apply_rule(&norm, &rule.suffix, &rule.replacement)
                && self
                    .lemmas
                    .get(&candidate)
                    .is_some_and(|tags| tags.contains(&rule.pos))
            {
                return (candidate, Some(rule.pos));
            }
        }

        (norm, None)
    }

    /// Tokenize and tag a sentence.
    pub fn tag(&self, sentence: &str, split_apostrophes: bool) -> Vec<TaggedToken> {
        meaningful_tokens(sentence, split_apostrophes)
            .into_iter()
            .map(|surface| {
                let (lemma, pos) = self.lemmatize(&surface);
                TaggedToken {
                    surface,
                    lemma,
                    pos,
                }
            })
            .collect()
    }
}

fn load_lexicon(path: &Path) -> Result<Vec<(String, String, PosTag)>> {
    let file = File::open(path).with_context(|| format!("open lexicon {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut out = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
        let Some(fields) = data_fields(&line) else {
            continue;
        };
        let [surface, lemma, code] = fields;
        let pos = PosTag::from_code(code).with_context(|| {
            format!("unknown tag {code:?} on line {} in {}", lineno + 1, path.display())
        })?;
        out.push((surface.to_string(), lemma.to_string(), pos));
    }
    Ok(out)
}

fn load_rules(path: &Path) -> Result<Vec<SuffixRule>> {
    let file = File::open(path).with_context(|| format!("open rules {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut rules = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
        let Some([code, suffix, replacement]) = data_fields(&line) else {
            continue;
        };
        let pos = PosTag::from_code(code).with_context(|| {
            format!("unknown tag {code:?} on line {} in {}", lineno + 1, path.display())
        })?;
        rules.push(SuffixRule {
            pos,
            suffix: suffix.to_string(),
            replacement: replacement.to_string(),
        });
    }
    Ok(rules)
}

/// Split a data line into three tab-separated fields; the third may be empty.
fn data_fields(line: &str) -> Option<[&str; 3]> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.trim().is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let mut parts = trimmed.split('\t');
    let first = parts.next()?.trim();
    let second = parts.next()?.trim();
    let third = parts.next().unwrap_or("").trim();
    if first.is_empty() {
        return None;
    }
    Some([first, second, third])
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn apply_rule(surface: &str, suffix: &str, replacement: &str) -> Option<String> {
    surface.strip_suffix(suffix).map(|stem| {
        let mut candidate = format!("{stem}{replacement}");

        // Doubled consonants from inflected forms ("running" -> "runn").
        if replacement.is_empty() && candidate.chars().count() >= 2 {
            let mut chars = candidate.chars();
            let last = chars.next_back();
            let prev = chars.next_back();
            if let (Some(a), Some(b)) = (last, prev)
                && a == b
                && !"aeiou".contains(a)
            {
                candidate.pop();
            }
        }

        candidate
    })
}

/// Suffix rules for languages shipped without a rule file.
pub fn builtin_rules(language: &str) -> Vec<SuffixRule> {
    let table: &[(PosTag, &str, &str)] = match language.trim().to_lowercase().as_str() {
        "english" => &[
            (PosTag::Noun, "s", ""),
            (PosTag::Noun, "ses", "s"),
            (PosTag::Noun, "xes", "x"),
            (PosTag::Noun, "zes", "z"),
            (PosTag::Noun, "ches", "ch"),
            (PosTag::Noun, "shes", "sh"),
            (PosTag::Noun, "men", "man"),
            (PosTag::Noun, "ies", "y"),
            (PosTag::Verb, "s", ""),
            (PosTag::Verb, "ies", "y"),
            (PosTag::Verb, "es", "e"),
            (PosTag::Verb, "es", ""),
            (PosTag::Verb, "ed", "e"),
            (PosTag::Verb, "ed", ""),
            (PosTag::Verb, "ing", "e"),
            (PosTag::Verb, "ing", ""),
            (PosTag::Adj, "er", ""),
            (PosTag::Adj, "er", "e"),
            (PosTag::Adj, "est", ""),
            (PosTag::Adj, "est", "e"),
        ],
        _ => &[],
    };
    table
        .iter()
        .map(|(pos, suffix, replacement)| SuffixRule {
            pos: *pos,
            suffix: (*suffix).to_string(),
            replacement: (*replacement).to_string(),
        })
        .collect()
}
