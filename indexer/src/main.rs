use anyhow::Result;
use clap::{Parser, Subcommand};
use stackir_core::corpus::{answer_stats, top_tags, LengthProfile};
use stackir_core::persist::{load_index, save_index, save_meta, IndexPaths, MetaFile};
use stackir_core::stats::{rank_frequencies, top_terms, zipf_fit};
use stackir_core::{BooleanOperator, InvertedIndex, Searcher};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

mod evaluate;
mod loader;

use evaluate::{evaluate_queries, read_qrels, read_queries, summarize, Relevance, CUTOFFS};

#[derive(Parser)]
#[command(name = "stackir")]
#[command(about = "Build and query a boolean / term-frequency inverted index over StackExchange posts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a dump file (Posts.xml, Comments.xml), JSON/JSONL, or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// Output index directory
        #[arg(long)]
        output: PathBuf,
        /// Stop after this many documents
        #[arg(long)]
        max_rows: Option<usize>,
    },
    /// Run one query against a built index
    Search {
        #[arg(long, default_value = "./index")]
        index: PathBuf,
        #[arg(long)]
        query: String,
        /// `and`, `or`, or `tf` for term-frequency ranking
        #[arg(long, default_value = "tf")]
        mode: String,
        /// Maximum number of results to print
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Compare boolean OR retrieval with TF ranking over a query file
    Evaluate {
        #[arg(long, default_value = "./index")]
        index: PathBuf,
        /// One query per line
        #[arg(long)]
        queries: PathBuf,
        /// JSON object mapping query text to relevant document ids
        #[arg(long)]
        qrels: Option<PathBuf>,
        /// Without --qrels, treat this many top TF results as relevant
        #[arg(long, default_value_t = 3)]
        pseudo_relevant: usize,
        /// Number of TF results retrieved per query
        #[arg(long, default_value_t = 10)]
        k: usize,
        /// Print the full report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Vocabulary statistics and a Zipf fit of term frequencies
    Stats {
        #[arg(long, default_value = "./index")]
        index: PathBuf,
        #[arg(long, default_value_t = 20)]
        top: usize,
        #[arg(long, default_value_t = 1000)]
        zipf_ranks: usize,
    },
    /// Tag frequencies and answer coverage read straight from a Posts.xml dump
    Corpus {
        /// Posts.xml, or a dump directory containing it
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        max_rows: Option<usize>,
        #[arg(long, default_value_t = 10)]
        top_tags: usize,
        /// Print the statistics as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, max_rows } => build(&input, &output, max_rows),
        Commands::Search { index, query, mode, limit } => search(&index, &query, &mode, limit),
        Commands::Evaluate { index, queries, qrels, pseudo_relevant, k, json } => {
            evaluate(&index, &queries, qrels.as_deref(), pseudo_relevant, k, json)
        }
        Commands::Stats { index, top, zipf_ranks } => stats(&index, top, zipf_ranks),
        Commands::Corpus { input, max_rows, top_tags, json } => corpus(&input, max_rows, top_tags, json),
    }
}

fn build(input: &Path, output: &Path, max_rows: Option<usize>) -> Result<()> {
    let start = Instant::now();
    let docs = loader::load_path(input, max_rows)?;
    tracing::info!(num_docs = docs.len(), "ingested documents");

    let index = InvertedIndex::from_texts(docs.into_iter().map(|d| (d.id, d.text)))?;
    let paths = IndexPaths::new(output);
    save_index(&paths, &index)?;
    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into());
    save_meta(&paths, &MetaFile::for_index(&index, created_at))?;

    println!(
        "Built indexes with {} unique terms over {} documents in {:.2}s",
        index.num_terms(),
        index.num_docs(),
        start.elapsed().as_secs_f64()
    );
    tracing::info!(output = %output.display(), "index build complete");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    Tf,
    Boolean(BooleanOperator),
}

impl FromStr for SearchMode {
    type Err = stackir_core::Error;

    fn from_str(s: &str) -> stackir_core::Result<Self> {
        if s.eq_ignore_ascii_case("tf") {
            Ok(Self::Tf)
        } else {
            s.parse().map(Self::Boolean)
        }
    }
}

/// Output lines for one query: `id\tscore` for TF ranking, the lowest `limit`
/// ids for boolean retrieval.
fn search_lines(searcher: &Searcher<'_>, query: &str, mode: SearchMode, limit: usize) -> Vec<String> {
    match mode {
        SearchMode::Tf => searcher
            .ranked(query, limit)
            .into_iter()
            .map(|hit| format!("{}\t{}", hit.doc_id, hit.score))
            .collect(),
        SearchMode::Boolean(op) => {
            let hits = searcher.boolean(query, op);
            tracing::info!(%op, total_hits = hits.len(), "boolean search");
            hits.into_iter().take(limit).map(|doc_id| doc_id.to_string()).collect()
        }
    }
}

fn search(index_dir: &Path, query: &str, mode: &str, limit: usize) -> Result<()> {
    let mode: SearchMode = mode.parse()?;
    let index = load_index(&IndexPaths::new(index_dir))?;
    for line in search_lines(&Searcher::new(&index), query, mode, limit) {
        println!("{line}");
    }
    Ok(())
}

fn evaluate(
    index_dir: &Path,
    queries: &Path,
    qrels: Option<&Path>,
    pseudo_relevant: usize,
    k: usize,
    json: bool,
) -> Result<()> {
    let index = load_index(&IndexPaths::new(index_dir))?;
    let searcher = Searcher::new(&index);
    let queries = read_queries(queries)?;
    let relevance = match qrels {
        Some(path) => Relevance::Judged(read_qrels(path)?),
        None => Relevance::PseudoTop(pseudo_relevant),
    };

    let reports = evaluate_queries(&searcher, &queries, &relevance, k)?;
    let summary = summarize(&reports);
    if json {
        let out = serde_json::json!({ "queries": reports, "average": summary });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for r in &reports {
        print!("{:<60}", truncate(&r.query, 58));
        for (b, t) in r.boolean.iter().zip(&r.tf) {
            print!("  P@{k} {:.2}/{:.2}  nDCG@{k} {:.2}/{:.2}", b.precision, t.precision, b.ndcg, t.ndcg, k = b.k);
        }
        println!();
    }
    println!("\n===== Average Metrics Across {} Queries (boolean / tf) =====", summary.queries);
    println!("BooleanTime: {:.6}s", summary.boolean_secs);
    println!("TFTime: {:.6}s", summary.tf_secs);
    for (i, k) in CUTOFFS.iter().enumerate() {
        let (b, t) = (&summary.boolean[i], &summary.tf[i]);
        println!("Prec{k}: {:.4} / {:.4}", b.precision, t.precision);
        println!("nDCG{k}: {:.4} / {:.4}", b.ndcg, t.ndcg);
    }
    Ok(())
}

fn stats(index_dir: &Path, top: usize, zipf_ranks: usize) -> Result<()> {
    let index = load_index(&IndexPaths::new(index_dir))?;
    println!("documents: {}", index.num_docs());
    println!("terms: {}", index.num_terms());
    println!("\nTop-{top} terms:");
    for (rank, (term, freq)) in top_terms(&index, top).into_iter().enumerate() {
        println!("{:>4}  {:<24} {}", rank + 1, term, freq);
    }
    match zipf_fit(&rank_frequencies(&index), zipf_ranks) {
        Some(fit) => println!(
            "\nZipf fit over top {} ranks: slope {:.3}, intercept {:.3}, R^2 {:.3}",
            fit.ranks, fit.slope, fit.intercept, fit.r_squared
        ),
        None => println!("\nZipf fit: not enough terms"),
    }
    Ok(())
}

fn corpus(input: &Path, max_rows: Option<usize>, top: usize, json: bool) -> Result<()> {
    let posts = loader::load_posts(input, max_rows)?;
    let tags = top_tags(&posts, top);
    let answers = answer_stats(&posts);
    if json {
        let out = serde_json::json!({ "tags": tags, "answers": answers });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Top-{top} question tags:");
    for (rank, (tag, count)) in tags.top.iter().enumerate() {
        println!("{:>4}. {:<30} {}", rank + 1, tag, count);
    }
    println!("      {:<30} {}", "Other", tags.other);

    println!("\nquestions: {}", answers.questions);
    println!("answers: {}", answers.answers);
    println!("average answers per answered question: {:.2}", answers.mean_answers_per_answered_question);
    println!("average answers per question: {:.2}", answers.mean_answers_per_question);
    println!("questions with no answers: {}", answers.questions_without_answers);
    println!("questions with an accepted answer: {}", answers.questions_with_accepted_answer);
    println!("average answer length (words): {:.2}", answers.mean_answer_body_words);
    print_profile("answered", &answers.answered);
    print_profile("unanswered", &answers.unanswered);
    Ok(())
}

fn print_profile(label: &str, p: &LengthProfile) {
    println!(
        "{label} questions: {} | body {:.2} words | title {:.2} words | {:.2} tags",
        p.questions, p.mean_body_words, p.mean_title_words, p.mean_tags
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
