use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use tile_catalog::categorize::material::MaterialDetector;
use tile_catalog::categorize::Categorizer;
use tile_catalog::config::CatalogConfig;
use tile_catalog::parser::detect::PageTypeClassifier;
use tile_catalog::parser::patterns::PatternTable;
use tile_catalog::pipeline::{PageOutcome, Pipeline};
use tile_catalog::record::ProductRecord;

#[derive(Parser)]
#[command(name = "tile_catalog", about = "Tile and flooring product page extraction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the page type of saved product pages
    Classify {
        files: Vec<PathBuf>,
        /// Page URL (defaults to the file path)
        #[arg(long)]
        url: Option<String>,
        /// JSON pattern table replacing the built-in one
        #[arg(long)]
        patterns: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run the full pipeline and print product records as JSON
    Extract {
        files: Vec<PathBuf>,
        /// Page URL (defaults to the file path)
        #[arg(long)]
        url: Option<String>,
        /// Structured product data (JSON) for the page
        #[arg(long)]
        structured: Option<PathBuf>,
        /// Research low-confidence material, category and brand
        #[arg(long)]
        validate: bool,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        patterns: Option<PathBuf>,
    },
    /// Categorize a product from its title and description
    Categorize {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Print the built-in pattern table as JSON
    Patterns,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Classify { files, url, patterns, config } => {
            let config = load_config(config.as_deref())?;
            let loaded = patterns.as_deref().map(PatternTable::load).transpose()?;
            let table = loaded.as_ref().unwrap_or_else(|| PatternTable::builtin());
            let classifier = PageTypeClassifier::new(table, config.detection);
            for path in &files {
                let html = read_page(path)?;
                let page_url = page_url(url.as_deref(), path);
                let detection = classifier.classify(&html, &page_url, None);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({ "file": path, "detection": detection }))?
                );
            }
            Ok(())
        }
        Commands::Extract { files, url, structured, validate, config, patterns } => {
            if files.is_empty() {
                println!("No input files.");
                return Ok(());
            }
            let config = load_config(config.as_deref())?;
            let loaded = patterns.as_deref().map(PatternTable::load).transpose()?;
            let table = loaded.as_ref().unwrap_or_else(|| PatternTable::builtin());
            let structured = structured.as_deref().map(read_structured).transpose()?;
            let pipeline = Pipeline::new(&config, table, None, None, validate);

            let outcomes = process_pages(&pipeline, &files, url.as_deref(), structured.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
            PageTypeCounts::from_outcomes(&outcomes).print();
            Ok(())
        }
        Commands::Categorize { title, description } => {
            let mut record = ProductRecord {
                title: Some(title),
                description,
                ..Default::default()
            };
            let material = MaterialDetector::default().detect(&record);
            record.material = material.material.clone();
            let info = Categorizer::default().categorize(&record);
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "category": info, "material": material }))?
            );
            Ok(())
        }
        Commands::Patterns => {
            let entries = PatternTable::builtin().to_entries();
            println!("{}", serde_json::to_string_pretty(&entries)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_elapsed(elapsed));
    }

    result
}

fn load_config(path: Option<&Path>) -> Result<CatalogConfig> {
    match path {
        Some(p) => CatalogConfig::load(p),
        None => Ok(CatalogConfig::default()),
    }
}

fn read_page(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading page {}", path.display()))
}

fn read_structured(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading structured data {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing structured data {}", path.display()))
}

fn page_url(url: Option<&str>, path: &Path) -> String {
    url.map(str::to_string).unwrap_or_else(|| path.display().to_string())
}

struct PageTypeCounts {
    pages: usize,
    by_type: BTreeMap<&'static str, usize>,
    categorized: usize,
}

impl PageTypeCounts {
    fn from_outcomes(outcomes: &[PageOutcome]) -> Self {
        let mut by_type = BTreeMap::new();
        for o in outcomes {
            *by_type.entry(o.detection.page_type.as_str()).or_insert(0) += 1;
        }
        Self {
            pages: outcomes.len(),
            by_type,
            categorized: outcomes
                .iter()
                .filter(|o| o.record.category.as_deref() != Some("uncategorized"))
                .count(),
        }
    }

    fn print(&self) {
        let types: Vec<String> = self.by_type.iter().map(|(t, n)| format!("{} {}", n, t)).collect();
        eprintln!(
            "Processed {} pages ({}), {} categorized.",
            self.pages,
            types.join(", "),
            self.categorized,
        );
    }
}

fn process_pages(
    pipeline: &Pipeline,
    files: &[PathBuf],
    url: Option<&str>,
    structured: Option<&Value>,
) -> Result<Vec<PageOutcome>> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut outcomes = Vec::with_capacity(files.len());
    for chunk in files.chunks(500) {
        let pages: Vec<(String, &PathBuf)> = chunk
            .iter()
            .map(|path| read_page(path).map(|html| (html, path)))
            .collect::<Result<_>>()?;
        let results: Vec<PageOutcome> = pages
            .par_iter()
            .map(|(html, path)| pipeline.process(html, &page_url(url, path), structured))
            .collect();
        outcomes.extend(results);
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(outcomes)
}

fn format_elapsed(d: std::time::Duration) -> String {
    let total = d.as_secs();
    let (h, m, s) = (total / 3600, total / 60 % 60, total % 60);
    match (h, m) {
        (0, 0) => format!("{:.1}s", d.as_secs_f64()),
        (0, _) => format!("{}m {:02}s", m, s),
        _ => format!("{}h {:02}m {:02}s", h, m, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn elapsed_time_is_compact() {
        assert_eq!(format_elapsed(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_elapsed(Duration::from_secs(65)), "1m 05s");
        assert_eq!(format_elapsed(Duration::from_secs(3723)), "1h 02m 03s");
    }
}
