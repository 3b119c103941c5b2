//! Médiathèque CLI — ingest library files and maintain their derived
//! metadata.
//!
//! Configuration comes from the environment (see
//! `mediatheque_core::Config`): MEDIA_ROOT, CATALOG_PATH, optional OCR
//! model paths, optional PDFIUM_LIBRARY_DIR.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use mediatheque_cli::init_tracing;
use mediatheque_core::{Catalog, Config, Resource};
use mediatheque_extract::validator::expected_content_type;
use mediatheque_extract::{Orchestrator, PdfExtractor, TextRecognizer, UploadValidator};
use mediatheque_storage::{ContentStore, HashedLocalStore};

#[derive(Parser)]
#[command(name = "mediatheque", about = "Library resource pipeline CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate, store, and extract metadata from one or more files
    Ingest {
        /// Paths of the files to ingest
        files: Vec<PathBuf>,
        /// Declared content type; defaults to the one expected for each
        /// file's extension
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Generate thumbnails for catalogued resources without one
    GenerateThumbnails {
        /// Regenerate thumbnails even when one already exists
        #[arg(long)]
        force: bool,
        /// Restrict processing to a single resource
        #[arg(long)]
        resource_id: Option<i64>,
    },
    /// Print one catalogued resource
    Show {
        /// Resource id
        id: i64,
    },
    /// List catalogued resources
    List,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Build the extraction orchestrator from configuration.
///
/// A missing Pdfium library or missing OCR models disable the matching
/// capability with a warning instead of refusing to start: ingestion and
/// dedup must keep working on hosts without them.
fn build_orchestrator(config: &Config) -> Orchestrator {
    let pdf = match PdfExtractor::new(config.pdfium_library_dir.as_deref()) {
        Ok(pdf) => Some(pdf),
        Err(e) => {
            tracing::warn!(error = %e, "Pdfium unavailable, PDF extraction disabled");
            None
        }
    };

    let recognizer = match (&config.ocr_detection_model, &config.ocr_recognition_model) {
        (Some(detection), Some(recognition)) => {
            match TextRecognizer::load(detection, recognition) {
                Ok(recognizer) => Some(Arc::new(recognizer)),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load OCR models, text recognition disabled");
                    None
                }
            }
        }
        _ => {
            tracing::debug!("OCR models not configured, text recognition disabled");
            None
        }
    };

    Orchestrator::new(&config.media_root, pdf, recognizer)
}

async fn ingest(
    config: &Config,
    files: Vec<PathBuf>,
    content_type: Option<String>,
) -> anyhow::Result<()> {
    let store = HashedLocalStore::new(&config.media_root).await?;
    let orchestrator = build_orchestrator(config);
    let validator = UploadValidator::new(config.max_upload_size_bytes);
    let mut catalog = Catalog::load(&config.catalog_path)?;

    let total = files.len();
    let mut errors = 0usize;

    for file in files {
        let name = match file.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => {
                println!("Error: invalid file name {}", file.display());
                errors += 1;
                continue;
            }
        };

        let data = match tokio::fs::read(&file).await {
            Ok(data) => data,
            Err(e) => {
                println!("Error: cannot read {}: {}", file.display(), e);
                errors += 1;
                continue;
            }
        };

        let extension = name.rsplit('.').next().unwrap_or("").to_lowercase();
        let declared = content_type
            .clone()
            .or_else(|| expected_content_type(&extension).map(String::from))
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if let Err(e) = validator.validate(&name, &declared, data.len()) {
            println!("Error: {} rejected: {}", name, e);
            errors += 1;
            continue;
        }

        let size_bytes = data.len() as i64;
        let key = store.store(&name, data).await?;
        let source = store.absolute_path(&key)?;
        let metadata = orchestrator.extract(&source).await;
        let miniature = metadata
            .get("miniature")
            .and_then(|v| v.as_str())
            .map(String::from);

        let existing_id = catalog.find_by_key(&key).map(|r| r.id);
        let resource = match existing_id.and_then(|id| catalog.get_mut(id)) {
            Some(record) => {
                if miniature.is_some() {
                    record.miniature = miniature;
                }
                record.clone()
            }
            None => {
                let resource = Resource {
                    id: catalog.next_id(),
                    original_filename: name,
                    stored_key: key,
                    content_type: declared,
                    size_bytes,
                    miniature,
                    ingested_at: chrono::Utc::now(),
                };
                catalog.push(resource.clone());
                resource
            }
        };

        print_json(&serde_json::json!({
            "resource": resource,
            "metadata": metadata,
        }))?;
    }

    catalog.save(&config.catalog_path)?;

    if errors > 0 {
        println!("\n{}/{} files ingested, {} errors", total - errors, total, errors);
    }
    Ok(())
}

async fn generate_thumbnails(
    config: &Config,
    force: bool,
    resource_id: Option<i64>,
) -> anyhow::Result<()> {
    let store = HashedLocalStore::new(&config.media_root).await?;
    let orchestrator = build_orchestrator(config);
    let mut catalog = Catalog::load(&config.catalog_path)?;

    let ids: Vec<i64> = catalog
        .resources
        .iter()
        .filter(|r| resource_id.map_or(true, |id| r.id == id))
        .filter(|r| force || !r.has_thumbnail())
        .map(|r| r.id)
        .collect();

    let total = ids.len();
    let mut processed = 0usize;
    let mut errors = 0usize;

    println!("Generating thumbnails for {} resources...", total);

    for id in ids {
        // Snapshot the key; the record is only mutated on success.
        let stored_key = catalog.get(id).map(|r| r.stored_key.clone());
        let Some(stored_key) = stored_key else { continue };

        if !store.exists(&stored_key).await.unwrap_or(false) {
            println!("Warning: source file not found for resource {}", id);
            errors += 1;
            continue;
        }

        let source = match store.absolute_path(&stored_key) {
            Ok(path) => path,
            Err(e) => {
                println!("Error: resource {}: {}", id, e);
                errors += 1;
                continue;
            }
        };

        let metadata = orchestrator.extract(&source).await;

        match metadata.get("miniature").and_then(|v| v.as_str()) {
            Some(thumb_key) => {
                if let Some(record) = catalog.get_mut(id) {
                    record.miniature = Some(thumb_key.to_string());
                }
                processed += 1;
                println!("Thumbnail generated for resource {}", id);
            }
            None => {
                println!("Warning: could not generate thumbnail for resource {}", id);
                errors += 1;
            }
        }
    }

    catalog.save(&config.catalog_path)?;

    println!(
        "\nProcessing complete:\n- Resources processed: {}/{}\n- Errors: {}",
        processed, total, errors
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            files,
            content_type,
        } => {
            ingest(&config, files, content_type).await?;
        }
        Commands::GenerateThumbnails { force, resource_id } => {
            generate_thumbnails(&config, force, resource_id).await?;
        }
        Commands::Show { id } => {
            let catalog = Catalog::load(&config.catalog_path)?;
            let resource = catalog
                .get(id)
                .with_context(|| format!("No resource with id {}", id))?;
            print_json(resource)?;
        }
        Commands::List => {
            let catalog = Catalog::load(&config.catalog_path)?;
            print_json(&catalog.resources)?;
        }
    }

    Ok(())
}
