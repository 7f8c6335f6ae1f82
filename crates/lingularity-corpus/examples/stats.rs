use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use lingularity_corpus::{LoadMode, SentenceCorpus};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let path = args.next().map(PathBuf::from).context(
        "usage: cargo run -p lingularity-corpus --example stats -- <corpus-file> <language>",
    )?;
    let language = args.next().unwrap_or_else(|| "unknown".to_string());

    let corpus = SentenceCorpus::load_with_mode(&path, language, LoadMode::Mmap)
        .with_context(|| format!("loading corpus from {}", path.display()))?;

    let mut reference_words = 0usize;
    let mut foreign_words = 0usize;
    let mut longest = 0usize;
    for pair in corpus.iter() {
        reference_words += pair.reference.split_whitespace().count();
        let n = pair.foreign.split_whitespace().count();
        foreign_words += n;
        longest = longest.max(n);
    }

    println!("Corpus       : {}", path.display());
    println!("Language     : {}", corpus.language());
    println!("Pairs        : {}", corpus.len());
    println!("Skipped lines: {}", corpus.skipped_lines());
    println!("Reference words: {}", reference_words);
    println!("Foreign words  : {}", foreign_words);
    println!("Longest foreign sentence: {} words", longest);

    Ok(())
}
