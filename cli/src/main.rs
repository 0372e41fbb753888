//! sectrank CLI - persona-driven PDF section extraction and ranking

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use sectrank::embed::{Embedder, HashEmbedder};
use sectrank::{discover, AnalysisContext, CollectionAnalyzer, Error, RankConfig};

#[derive(Parser)]
#[command(name = "sectrank")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rank PDF sections by persona relevance", long_about = None)]
struct Cli {
    /// Input root: a collection directory or a directory of collections
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory for per-collection result JSON
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    output: PathBuf,

    /// Embedding backend
    #[arg(long, value_enum, default_value = "onnx")]
    embedder: EmbedderKind,

    /// Model directory for the ONNX backend (model.onnx + tokenizer.json)
    #[arg(long, value_name = "DIR", env = "SECTRANK_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Semantic weight of the hybrid score (0.0 - 1.0)
    #[arg(long, default_value = "0.7")]
    alpha: f32,

    /// Number of ranked sections to report
    #[arg(long, default_value = "10")]
    top_sections: usize,

    /// Number of top sections to refine
    #[arg(long, default_value = "5")]
    top_subsections: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum EmbedderKind {
    /// ONNX Runtime with a local SentenceTransformers model
    Onnx,
    /// Deterministic token-hash embedding (offline, degraded semantics)
    Hashing,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> sectrank::Result<()> {
    let embedder = build_embedder(cli)?;
    let rank = RankConfig::new()
        .with_semantic_weight(cli.alpha)
        .with_top_sections(cli.top_sections)
        .with_top_subsections(cli.top_subsections);
    let ctx = AnalysisContext::new(embedder).with_rank_config(rank);

    let collections = discover(&cli.input)?;
    if collections.is_empty() {
        println!("{}", "no collections found".yellow());
        return Ok(());
    }

    fs::create_dir_all(&cli.output)?;

    let bar = ProgressBar::new(collections.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let analyzer = CollectionAnalyzer::new(&ctx);
    let mut failed_documents = 0usize;
    for collection in &collections {
        bar.set_message(collection.name.clone());
        let result = analyzer.analyze(collection)?;
        failed_documents += result.metadata.failed_documents.len();

        let path = cli.output.join(format!("{}.json", collection.name));
        fs::write(&path, result.to_json()?)?;

        bar.println(format!(
            "{} {} ({} sections, {} refined)",
            "✓".green(),
            collection.name,
            result.extracted_sections.len(),
            result.subsection_analysis.len()
        ));
        bar.inc(1);
    }
    bar.finish_and_clear();

    if failed_documents > 0 {
        println!(
            "{} {} document(s) failed and were skipped; see failed_documents in the output",
            "!".yellow().bold(),
            failed_documents
        );
    }
    println!(
        "{} {} collection(s) written to {}",
        "done:".green().bold(),
        collections.len(),
        cli.output.display()
    );
    Ok(())
}

fn build_embedder(cli: &Cli) -> sectrank::Result<Box<dyn Embedder>> {
    match cli.embedder {
        EmbedderKind::Hashing => {
            log::info!("using the deterministic hashing embedder");
            Ok(Box::new(HashEmbedder::new()))
        }
        #[cfg(feature = "onnx")]
        EmbedderKind::Onnx => {
            let model_dir = cli.model_dir.clone().ok_or_else(|| {
                Error::Embedder("--model-dir (or SECTRANK_MODEL_DIR) is required".into())
            })?;
            Ok(Box::new(sectrank::embed::OnnxEmbedder::load(&model_dir)?))
        }
        #[cfg(not(feature = "onnx"))]
        EmbedderKind::Onnx => Err(Error::Embedder(
            "built without the `onnx` feature; pass --embedder hashing to opt into \
             lexical-leaning offline scoring"
                .into(),
        )),
    }
}
