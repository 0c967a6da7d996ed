use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use notesearch_core::scanner::{ScanOptions, ScanStats, Scanner};
use notesearch_core::{NoteIndex, SearchResult};
use tracing_subscriber::{fmt, EnvFilter};

use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

mod repl;

#[derive(Parser)]
#[command(name = "notesearch", version)]
#[command(about = "Index a directory of notes and run ranked keyword queries", long_about = None)]
struct Cli {
    /// File extension to index (repeatable); replaces the built-in list
    #[arg(long = "ext", global = true)]
    extensions: Vec<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a directory and print statistics
    Index {
        dir: String,
    },
    /// Index a directory and run a single query against it
    Search {
        dir: String,
        /// Query terms; every term must appear in a result
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Maximum number of results, 0 for all
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Index a directory and read queries from stdin
    Interactive {
        dir: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();
    let options = ScanOptions::with_extensions(&cli.extensions);

    match cli.command {
        Commands::Index { dir } => {
            let start = Instant::now();
            let (notes, stats) = build_index(&dir, options)?;
            let mut out = io::stdout().lock();
            print_index_summary(&mut out, &notes, &stats, start.elapsed().as_millis())?;
            Ok(())
        }
        Commands::Search { dir, query, limit, json } => {
            let (notes, _) = build_index(&dir, options)?;
            ensure_not_empty(&notes)?;
            let query = query.join(" ");
            let start = Instant::now();
            let results = notes.search(&query, limit);
            let elapsed = start.elapsed().as_millis();
            tracing::debug!(query = %query, hits = results.len(), elapsed_ms = elapsed as u64, "query answered");

            let mut out = io::stdout().lock();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
            } else {
                print_results(&mut out, &results)?;
                writeln!(out, "Search completed in {elapsed} ms")?;
            }
            Ok(())
        }
        Commands::Interactive { dir, limit } => {
            let (notes, _) = build_index(&dir, options)?;
            ensure_not_empty(&notes)?;
            let stdin = io::stdin();
            repl::run(&notes, stdin.lock(), io::stdout().lock(), limit)
        }
    }
}

fn build_index(dir: &str, options: ScanOptions) -> Result<(NoteIndex, ScanStats)> {
    let mut scanner = Scanner::new(options);
    let files = scanner
        .scan(Path::new(dir))
        .with_context(|| format!("failed to scan {dir}"))?;
    let mut notes = NoteIndex::new();
    notes.add_all(files.into_iter().map(|f| (f.path.display().to_string(), f.content)));
    let scan = scanner.last_stats();
    tracing::info!(
        dir,
        num_docs = notes.size(),
        num_terms = notes.vocabulary_size(),
        files_scanned = scan.files_scanned,
        total_bytes = scan.total_bytes,
        "index build complete"
    );
    Ok((notes, scan))
}

fn ensure_not_empty(notes: &NoteIndex) -> Result<()> {
    if notes.is_empty() {
        bail!("No documents indexed. Check the directory and --ext filters.");
    }
    Ok(())
}

fn print_index_summary<W: Write>(out: &mut W, notes: &NoteIndex, scan: &ScanStats, elapsed_ms: u128) -> io::Result<()> {
    writeln!(out, "Indexing complete!")?;
    writeln!(out, "  Files scanned: {}", scan.files_scanned)?;
    writeln!(out, "  Documents indexed: {}", notes.size())?;
    writeln!(out, "  Unique terms: {}", notes.vocabulary_size())?;
    writeln!(out, "  Bytes read: {}", scan.total_bytes)?;
    writeln!(out, "  Time: {elapsed_ms} ms")
}

pub(crate) fn print_results<W: Write>(out: &mut W, results: &[SearchResult]) -> io::Result<()> {
    if results.is_empty() {
        return writeln!(out, "No results found.");
    }
    writeln!(out, "\nFound {} result(s):\n", results.len())?;
    for (i, r) in results.iter().enumerate() {
        writeln!(out, "[{}] {}", i + 1, r.path)?;
        writeln!(out, "    Score: {:.4}", r.score)?;
        if !r.snippet.is_empty() {
            writeln!(out, "    {}", r.snippet)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
