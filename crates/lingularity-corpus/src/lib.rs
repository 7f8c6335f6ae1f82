//! Load bilingual sentence corpora with zero-copy text.
//!
//! A corpus file holds one sentence pair per line:
//! `reference<TAB>foreign[<TAB>attribution...]`. Everything after the second
//! field is ignored. The file is read once, either memory-mapped or into an
//! owned buffer ([`LoadMode`]), and every sentence is handed out as a `&str`
//! borrowed from that buffer.
//!
//! Corpora are immutable after load and addressed by line position, skipping
//! lines that do not carry two non-empty fields.
//!
//! # Example
//! ```no_run
//! use lingularity_corpus::{LoadMode, SentenceCorpus};
//!
//! # fn main() -> anyhow::Result<()> {
//! let corpus = SentenceCorpus::load_with_mode("/data/italian.txt", "Italian", LoadMode::Mmap)?;
//! if let Some(pair) = corpus.get(0) {
//!     println!("{} -> {}", pair.reference, pair.foreign);
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p lingularity-corpus --example stats -- <file> <language>`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use lingularity_types::SentencePair;
use memmap2::Mmap;
use tracing::warn;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Strategy for loading corpus files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file (fast, zero-copy).
    Mmap,
    /// Read the file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

#[derive(Clone, Copy)]
struct TextRef {
    start: usize,
    len: usize,
}

#[derive(Clone, Copy)]
struct PairRef {
    reference: TextRef,
    foreign: TextRef,
}

/// Ordered, immutable sequence of (reference, foreign) sentence pairs for one language.
pub struct SentenceCorpus {
    language: String,
    buffer: Buffer,
    pairs: Vec<PairRef>,
    skipped: usize,
}

impl SentenceCorpus {
    /// Load a corpus file, memory-mapping it.
    pub fn load(path: impl AsRef<Path>, language: impl Into<String>) -> Result<Self> {
        Self::load_with_mode(path, language, LoadMode::Mmap)
    }

    /// Load a corpus file choosing between mmap and an owned buffer at runtime.
    pub fn load_with_mode(
        path: impl AsRef<Path>,
        language: impl Into<String>,
        mode: LoadMode,
    ) -> Result<Self> {
        let path = path.as_ref();
        let buffer = load_file(path, mode)?;
        let corpus = Self::from_buffer(language.into(), buffer)
            .with_context(|| format!("parse corpus {}", path.display()))?;
        if corpus.skipped > 0 {
            warn!(
                "skipped {} malformed lines in {}",
                corpus.skipped,
                path.display()
            );
        }
        Ok(corpus)
    }

    /// Build an owned corpus from in-memory sentence pairs.
    ///
    /// Tabs and line breaks inside a sentence are replaced by spaces.
    pub fn from_pairs<I, R, F>(language: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, F)>,
        R: AsRef<str>,
        F: AsRef<str>,
    {
        let mut text = String::new();
        for (reference, foreign) in pairs {
            push_field(&mut text, reference.as_ref());
            text.push('\t');
            push_field(&mut text, foreign.as_ref());
            text.push('\n');
        }
        let pairs = parse_lines(text.as_bytes()).0;
        Self {
            language: language.into(),
            buffer: Buffer::Owned(text.into_bytes()),
            pairs,
            skipped: 0,
        }
    }

    fn from_buffer(language: String, buffer: Buffer) -> Result<Self> {
        let bytes = buffer.as_slice();
        std::str::from_utf8(bytes).context("corpus is not valid utf-8")?;
        let (pairs, skipped) = parse_lines(bytes);
        Ok(Self {
            language,
            buffer,
            pairs,
            skipped,
        })
    }

    /// Language of the foreign-side sentences.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of lines dropped while parsing.
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    pub fn get(&self, idx: usize) -> Option<SentencePair<'_>> {
        self.pairs.get(idx).map(|pair| self.resolve(*pair))
    }

    /// Iterate all pairs in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = SentencePair<'_>> + '_ {
        self.pairs.iter().map(|pair| self.resolve(*pair))
    }

    fn resolve(&self, pair: PairRef) -> SentencePair<'_> {
        SentencePair {
            reference: self.text(pair.reference),
            foreign: self.text(pair.foreign),
        }
    }

    fn text(&self, r: TextRef) -> &str {
        let bytes = self.buffer.as_slice();
        // Field bounds sit on ASCII tabs/newlines of validated utf-8.
        std::str::from_utf8(&bytes[r.start..r.start + r.len]).unwrap_or_default()
    }
}

fn push_field(out: &mut String, field: &str) {
    out.extend(field.trim().chars().map(|c| match c {
        '\t' | '\n' | '\r' => ' ',
        other => other,
    }));
}

fn parse_lines(bytes: &[u8]) -> (Vec<PairRef>, usize) {
    let mut pairs = Vec::new();
    let mut skipped = 0usize;
    let mut offset = if bytes.starts_with(BOM) { BOM.len() } else { 0 };

    while offset < bytes.len() {
        let end = bytes[offset..]
            .iter()
            .position(|b| *b == b'\n')
            .map_or(bytes.len(), |p| offset + p);
        let mut line_end = end;
        if line_end > offset && bytes[line_end - 1] == b'\r' {
            line_end -= 1;
        }

        let line = &bytes[offset..line_end];
        if !line.is_empty() {
            match split_pair(line, offset) {
                Some(pair) => pairs.push(pair),
                None => skipped += 1,
            }
        }
        offset = end + 1;
    }

    (pairs, skipped)
}

fn split_pair(line: &[u8], base: usize) -> Option<PairRef> {
    let tab = line.iter().position(|b| *b == b'\t')?;
    let rest = &line[tab + 1..];
    let foreign_len = rest.iter().position(|b| *b == b'\t').unwrap_or(rest.len());

    let reference = trim_ref(line, base, 0, tab);
    let foreign = trim_ref(line, base, tab + 1, foreign_len);
    if reference.len == 0 || foreign.len == 0 {
        return None;
    }
    Some(PairRef { reference, foreign })
}

fn trim_ref(line: &[u8], base: usize, start: usize, len: usize) -> TextRef {
    let field = &line[start..start + len];
    let lead = field.iter().take_while(|b| *b == &b' ').count();
    let trail = field[lead..].iter().rev().take_while(|b| *b == &b' ').count();
    TextRef {
        start: base + start + lead,
        len: len - lead - trail,
    }
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    match mode {
        LoadMode::Mmap => {
            let mmap = unsafe { Mmap::map(&file) }
                .with_context(|| format!("mmap {}", path.display()))?;
            Ok(Buffer::Mmap(mmap))
        }
        LoadMode::Owned => {
            let mut buf = Vec::new();
            let mut reader = std::io::BufReader::new(file);
            reader
                .read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}
