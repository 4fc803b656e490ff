use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use docsearch_core::extract::{extract_file, DefaultExtractor};
use docsearch_core::{AnalyzerConfig, DocId, Document, IndexConfig, SearchService};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Index text/PDF files in memory and rank them against a query", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest every .txt/.md/.pdf file under the input path and print the ranking as JSON
    Rank {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Free-text query
        #[arg(long)]
        query: String,
        /// Print only the best N results
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        index: IndexArgs,
    },
}

#[derive(Args)]
struct IndexArgs {
    /// Apply English stemming to indexed and query terms
    #[arg(long, default_value_t = false)]
    stem: bool,
    /// Index stop words instead of dropping them
    #[arg(long, default_value_t = false)]
    keep_stopwords: bool,
    /// Use 1 + ln(tf) instead of raw term counts
    #[arg(long, default_value_t = false)]
    sublinear_tf: bool,
}

impl From<IndexArgs> for IndexConfig {
    fn from(a: IndexArgs) -> Self {
        IndexConfig {
            analyzer: AnalyzerConfig { stem: a.stem, remove_stopwords: !a.keep_stopwords },
            sublinear_tf: a.sublinear_tf,
        }
    }
}

#[derive(Debug, Serialize)]
struct RankedFile {
    document: String,
    doc_id: DocId,
    path: String,
    score: f32,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank { input, query, limit, index } => {
            let ranked = rank(Path::new(&input), &query, index.into())?;
            let shown = limit.unwrap_or(ranked.len());
            for hit in ranked.into_iter().take(shown) {
                println!("{}", serde_json::to_string(&hit)?);
            }
            Ok(())
        }
    }
}

fn collect_files(input_path: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext.to_ascii_lowercase().as_str(), "txt" | "md" | "pdf") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    }
    files
}

fn rank(input: &Path, query: &str, config: IndexConfig) -> Result<Vec<RankedFile>> {
    let files = collect_files(input);
    if files.is_empty() {
        bail!("no .txt, .md or .pdf files found under {}", input.display());
    }

    let service = SearchService::new(config);
    for file in &files {
        let text = match extract_file(&DefaultExtractor, file) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(path = %file.display(), error = %err, "extraction failed, indexing as empty document");
                String::new()
            }
        };
        service.add_document(text)?;
    }
    tracing::info!(num_docs = service.size(), num_terms = service.vocabulary_size(), "ingested documents");

    let ranked = service
        .score(query)?
        .into_iter()
        .map(|s| RankedFile {
            document: Document::label(s.doc_id),
            doc_id: s.doc_id,
            path: files[(s.doc_id - 1) as usize].display().to_string(),
            score: s.score,
        })
        .collect();
    Ok(ranked)
}
