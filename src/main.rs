// src/main.rs
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use amendment_extractor::storage::StorageManager;
use amendment_extractor::utils::{self, block_debug, AppError};
use amendment_extractor::{AmendmentExtractor, Document, ParseError, ParseMode, ParsedDocument};

/// Kind of committee document being parsed
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// Tabled amendments (author block required)
    Amendments,
    /// Rapporteur's draft report (no author block)
    DraftReport,
}

impl From<Mode> for ParseMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Amendments => ParseMode::Amendments,
            Mode::DraftReport => ParseMode::DraftReport,
        }
    }
}

/// Command Line Interface for the EP amendment parser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more .docx amendment documents
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory for parsed JSON
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Document type
    #[arg(long, value_enum, default_value = "amendments")]
    mode: Mode,

    /// Also write added/deleted text per amendment
    #[arg(long)]
    summary: bool,

    /// Debug mode - save a block-by-block dump of each document
    #[arg(short, long)]
    debug: bool,

    /// Print parsed JSON to stdout instead of writing files
    #[arg(long)]
    stdout: bool,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Initialize storage (not needed when printing)
    let storage = if args.stdout {
        None
    } else {
        Some(StorageManager::new(&args.output_dir)?)
    };

    // 4. Initialize extractor
    let extractor = AmendmentExtractor::new(args.mode.into());

    // 5. Process each document
    let mut success_count = 0;
    let mut failure_count = 0;

    for input in &args.inputs {
        match process_document(&extractor, input, &args, storage.as_ref()) {
            Ok(count) => {
                tracing::info!("Parsed {} amendments from {}", count, input.display());
                success_count += 1;
            }
            Err(e) => {
                tracing::error!("Failed to process {}: {}", input.display(), e);
                failure_count += 1;
            }
        }
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!("Failed to parse any of {} documents", failure_count)));
    }

    Ok(())
}

fn process_document(
    extractor: &AmendmentExtractor,
    input: &Path,
    args: &Args,
    storage: Option<&StorageManager>,
) -> Result<usize, AppError> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| AppError::Config(format!("Cannot derive a name from {}", input.display())))?
        .to_string();

    let document = Document::open(input).map_err(|source| ParseError::DocumentOpen {
        document: input.display().to_string(),
        source,
    })?;

    if args.debug {
        let debug_dir = Path::new(&args.output_dir).join("debug");
        std::fs::create_dir_all(&debug_dir)?;
        let dump_path = debug_dir.join(format!("{}_blocks.txt", stem));
        if let Err(e) = block_debug::write_block_dump(&document, &dump_path) {
            tracing::warn!("Failed to write block dump: {}", e);
        }
    }

    let parsed = extractor.extract(&document)?;
    let count = parsed.amendments.len();

    match storage {
        None => print_json(&parsed, args.summary)?,
        Some(storage) => {
            storage.save_parsed(&stem, &parsed)?;
            storage.save_metadata(&stem, &parsed, input, extractor.mode())?;
            if args.summary {
                storage.save_summary(&stem, &parsed.summaries())?;
            }
        }
    }

    Ok(count)
}

fn print_json(parsed: &ParsedDocument, with_summary: bool) -> Result<(), AppError> {
    let value = if with_summary {
        let summaries: Vec<serde_json::Value> = parsed
            .summaries()
            .into_iter()
            .map(|(number, summary)| serde_json::json!({ "amendment": number, "summary": summary }))
            .collect();
        serde_json::json!({ "document": parsed, "summaries": summaries })
    } else {
        serde_json::to_value(parsed).map_err(|e| AppError::Processing(e.to_string()))?
    };

    let text = serde_json::to_string_pretty(&value).map_err(|e| AppError::Processing(e.to_string()))?;
    println!("{}", text);
    Ok(())
}
