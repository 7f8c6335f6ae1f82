use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lingularity_corpus::{LoadMode, SentenceCorpus};
use lingularity_morph::{LemmaModels, Normalizer};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use lingularity::deviation::caret_line;
use lingularity::{
    DifficultyMode, IndexOptions, SentenceRetriever, TokenIndex, deviation_masks, evaluate,
    filter_by_difficulty,
};

#[derive(Parser)]
#[command(name = "lingularity")]
#[command(about = "Evaluate vocable responses and find example sentences in bilingual corpora")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a response against its ground truth.
    Evaluate {
        /// Hint shown to the learner, prepended to the response.
        #[arg(long, default_value = "")]
        aid: String,
        response: String,
        ground_truth: String,
    },
    /// Build (or load the cached) token index and print its size.
    Index {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// Print example sentences for a vocable.
    Sentences {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(long, default_value_t = 5)]
        limit: usize,
        vocable: String,
    },
    /// Select training sentences by lexical difficulty.
    Filter {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// simple, diction-expansion or random
        #[arg(long, default_value = "random")]
        mode: DifficultyMode,
        #[arg(long, default_value_t = 10)]
        show: usize,
    },
}

#[derive(Args)]
struct CorpusArgs {
    /// Tab-separated corpus file, reference sentence first.
    #[arg(long)]
    corpus: PathBuf,
    /// Language of the foreign-side sentences, e.g. Italian.
    #[arg(long)]
    language: String,
    #[arg(long, env = "LINGULARITY_LEXICON_DIR")]
    lexicon_dir: Option<PathBuf>,
    #[arg(long, env = "LINGULARITY_CACHE_DIR")]
    cache_dir: Option<PathBuf>,
    /// Index elided forms like l'uomo as one token.
    #[arg(long, env = "LINGULARITY_KEEP_APOSTROPHES")]
    keep_apostrophes: bool,
    #[arg(long, default_value = "mmap", value_parser = parse_load_mode)]
    load_mode: LoadMode,
}

struct Session {
    corpus: SentenceCorpus,
    normalizer: Normalizer,
    index: TokenIndex,
    options: IndexOptions,
}

impl CorpusArgs {
    fn open(&self) -> Result<Session> {
        info!(
            "using corpus at {} (mode: {:?})",
            self.corpus.display(),
            self.load_mode
        );
        let start = Instant::now();
        let corpus =
            SentenceCorpus::load_with_mode(&self.corpus, self.language.clone(), self.load_mode)
                .with_context(|| format!("loading corpus from {}", self.corpus.display()))?;
        info!(
            "loaded {} sentence pairs in {} ms",
            corpus.len(),
            start.elapsed().as_millis()
        );

        let models = self
            .lexicon_dir
            .as_ref()
            .map_or_else(LemmaModels::none, LemmaModels::new);
        let normalizer = Normalizer::select(&self.language, &models)?;
        let options = IndexOptions {
            split_apostrophes: !self.keep_apostrophes,
        };
        let index =
            TokenIndex::load_or_build(&corpus, &normalizer, &options, self.cache_dir.as_deref())?;

        Ok(Session {
            corpus,
            normalizer,
            index,
            options,
        })
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            aid,
            response,
            ground_truth,
        } => {
            let (adjusted, evaluation) = evaluate(&response, &ground_truth, &aid);
            let (response_mask, truth_mask) = deviation_masks(&adjusted, &ground_truth);
            println!("{evaluation} (+{})", evaluation.score());
            println!("response    : {adjusted}");
            println!("              {}", caret_line(&response_mask));
            println!("ground truth: {ground_truth}");
            println!("              {}", caret_line(&truth_mask));
        }
        Commands::Index { corpus } => {
            let session = corpus.open()?;
            println!("Language   : {}", session.corpus.language());
            println!("Sentences  : {}", session.corpus.len());
            println!("Skipped    : {}", session.corpus.skipped_lines());
            println!("Strategy   : {}", session.index.kind());
            println!("Tokens     : {}", session.index.token_count());
            println!("Counted    : {}", session.index.occurrences().len());
        }
        Commands::Sentences {
            corpus,
            limit,
            vocable,
        } => {
            let session = corpus.open()?;
            let retriever =
                SentenceRetriever::new(&session.index, &session.normalizer, session.options);
            let examples = retriever.example_sentences(&session.corpus, &vocable, limit);
            if examples.is_empty() {
                println!("No example sentences for {vocable:?}");
            }
            for pair in examples {
                println!("{}\n  {}", pair.foreign, pair.reference);
            }
        }
        Commands::Filter {
            corpus,
            mode,
            show,
        } => {
            let session = corpus.open()?;
            let subset = filter_by_difficulty(&session.corpus, &session.index, mode);
            println!(
                "{mode}: {} of {} sentences",
                subset.len(),
                session.corpus.len()
            );
            for pair in subset.iter().take(show) {
                println!("{}\n  {}", pair.foreign, pair.reference);
            }
        }
    }

    Ok(())
}

fn parse_load_mode(raw: &str) -> Result<LoadMode, String> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Ok(LoadMode::Mmap),
        "owned" => Ok(LoadMode::Owned),
        other => Err(format!("unknown load mode: {other}")),
    }
}

/// Log filter from `RUST_LOG`-style directives, `info` when none are given.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

fn init_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
