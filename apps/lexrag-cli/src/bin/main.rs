//! lexrag: build a TF-IDF index over a document folder and query it.
//!
//! Usage:
//!   lexrag index [--docs-dir ./docs] [--index-path ./index.json]
//!   lexrag query --query "how do I purify water?"
//!   lexrag query                      # interactive, `exit` to quit
//!   lexrag eval --questions tests/fixtures/questions.jsonl

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use lexrag_core::config::AppConfig;
use lexrag_core::traits::Vectorizer;
use lexrag_core::types::{Retrieval, RetrievalResult};
use lexrag_index::{build_index, IndexStore, JsonIndexStore};
use lexrag_search::answer::NO_ANSWER;
use lexrag_search::{evaluate, load_questions, AnswerGenerator, Retriever};

const SNIPPET_CHARS: usize = 500;

#[derive(Parser)]
#[command(name = "lexrag", version, about = "Lexical retrieval over a local document folder")]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chunk the corpus and write a fresh index
    Index {
        #[arg(long)]
        docs_dir: Option<String>,
        #[arg(long)]
        index_path: Option<String>,
        #[arg(long)]
        chunk_size: Option<usize>,
        #[arg(long)]
        overlap: Option<usize>,
    },
    /// Answer one query, or read queries from stdin when none is given
    Query {
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long)]
        index_path: Option<String>,
        #[arg(long)]
        top_k: Option<usize>,
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Score answers against a JSON Lines gold question set
    Eval {
        #[arg(long, default_value = "tests/fixtures/questions.jsonl")]
        questions: PathBuf,
        #[arg(long)]
        index_path: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "lexrag=debug" } else { "lexrag=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut config = AppConfig::load().context("Error loading config")?;

    match cli.command {
        Command::Index { docs_dir, index_path, chunk_size, overlap } => {
            if let Some(d) = docs_dir {
                config.indexer.docs_dir = d;
            }
            if let Some(p) = index_path {
                config.indexer.index_path = p;
            }
            if let Some(n) = chunk_size {
                config.indexer.chunk_size = n;
            }
            if let Some(n) = overlap {
                config.indexer.overlap = n;
            }
            run_index(&config)
        }
        Command::Query { query, index_path, top_k, threshold } => {
            if let Some(p) = index_path {
                config.retriever.index_path = p;
            }
            if let Some(k) = top_k {
                config.retriever.top_k = k;
            }
            if let Some(t) = threshold {
                config.retriever.threshold = t;
            }
            run_query(&config, query)
        }
        Command::Eval { questions, index_path } => {
            if let Some(p) = index_path {
                config.retriever.index_path = p;
            }
            run_eval(&config, &questions)
        }
    }
}

fn run_index(config: &AppConfig) -> Result<()> {
    debug!("Indexer config: {:?}", config.indexer);
    let index = build_index(&config.indexer).context("Index build failed")?;
    let store = JsonIndexStore::new(config.indexer.index_path());
    store.save(&index)?;
    info!("Index written to {}", store.path().display());
    println!(
        "✅ Indexed {} chunks ({} terms) into {}",
        index.len(),
        index.model.vocabulary_size(),
        store.path().display()
    );
    Ok(())
}

fn open_retriever(config: &AppConfig) -> Result<Retriever> {
    let store = JsonIndexStore::new(config.retriever.index_path());
    let retriever = Retriever::open(&store, &config.retriever)
        .with_context(|| format!("Cannot open index {}", store.path().display()))?;
    info!(
        "Loaded {} chunks from {} (top_k={}, threshold={})",
        retriever.index().len(),
        store.path().display(),
        config.retriever.top_k,
        config.retriever.threshold
    );
    Ok(retriever)
}

fn run_query(config: &AppConfig, query: Option<String>) -> Result<()> {
    let retriever = open_retriever(config)?;
    let generator = AnswerGenerator::new(&config.answer);

    if let Some(q) = query {
        answer_query(&retriever, &generator, &q);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Enter a query (or 'exit'): ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let q = line?.trim().to_string();
        if q.is_empty() {
            continue;
        }
        if q.eq_ignore_ascii_case("exit") || q.eq_ignore_ascii_case("quit") {
            break;
        }
        answer_query(&retriever, &generator, &q);
    }
    Ok(())
}

fn answer_query(retriever: &Retriever, generator: &AnswerGenerator, query: &str) {
    match retriever.retrieve(query) {
        Retrieval::NoMatch { .. } => println!("⚠️  {NO_ANSWER}"),
        Retrieval::Matches(results) => {
            println!("\n=== Answer ===");
            println!("{}", generator.generate(query, &results));
            println!("\n=== Citations ===");
            for r in &results {
                print_result(r);
            }
        }
    }
}

fn print_result(result: &RetrievalResult) {
    let snippet: String = result.chunk.text.chars().take(SNIPPET_CHARS).collect();
    println!("[{:.3}] {}", result.score, result.citation);
    println!("    {snippet}...\n");
}

fn run_eval(config: &AppConfig, questions_path: &std::path::Path) -> Result<()> {
    let retriever = open_retriever(config)?;
    let generator = AnswerGenerator::new(&config.answer);
    let questions = load_questions(questions_path)?;
    let report = evaluate(&retriever, &generator, &questions);
    for outcome in &report.outcomes {
        let status = if outcome.correct { "✅" } else { "❌" };
        let preview: String = outcome.answer.chars().take(220).collect();
        println!("{status} Q: {}", outcome.question.question);
        println!("   Answer: {preview}...");
        println!("   Gold: {:?}\n", outcome.question.gold_phrases);
    }
    println!(
        "=== Accuracy: {:.1}% ({}/{}) ===",
        report.accuracy() * 100.0,
        report.correct(),
        report.total()
    );
    Ok(())
}
