//! High-level pipeline: orchestrates discover → read → generate → persist
//! for workflow files, then aggregates the index.
//!
//! This module provides the top-level orchestration for one documentation
//! run as described in the loaded config. The pipeline:
//!   - Prepares the output directory once, ahead of the loop
//!   - Discovers workflow files by suffix (non-recursive)
//!   - For each file: reads it, requests generated documentation through the
//!     [`Generator`] contract (streaming chunks to the injected observer),
//!     and persists the result as `<stem>.md`
//!   - Aggregates and returns a report of what succeeded and failed
//!   - Writes the index over the ordered success list, if anything succeeded
//!
//! # Major Types
//! - [`PipelineReport`]: output report with every document outcome
//! - [`DocumentOutcome`]: tagged per-document result, from which both
//!   logging and index construction are derived
//!
//! # Error Handling
//! A failed document is logged with its stage and cause and the loop moves
//! on; no single document aborts the batch. Only output-directory creation
//! and input discovery are fatal, and both happen before any document is
//! touched.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::DocumenterConfig;
use crate::contract::{ChunkObserver, GenerationRequest, Generator};
use crate::discover::{self, DiscoverError};
use crate::index;

/// Pipeline stage a document failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Generate,
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Read => write!(f, "read"),
            Stage::Generate => write!(f, "generate"),
            Stage::Write => write!(f, "write"),
        }
    }
}

/// Terminal state for one workflow file. There are no other states.
#[derive(Debug)]
pub enum DocumentOutcome {
    Succeeded { output_path: PathBuf },
    Failed { stage: Stage, cause: String },
}

#[derive(Debug)]
pub struct DocumentReport {
    pub source: PathBuf,
    /// File stem, shared by the output document and its index entry.
    pub base_name: String,
    pub outcome: DocumentOutcome,
}

#[derive(Debug)]
pub struct PipelineReport {
    pub discovered: usize,
    pub documents: Vec<DocumentReport>,
    /// Path of the written index, absent when nothing succeeded or the
    /// index write itself failed.
    pub index_path: Option<PathBuf>,
}

impl PipelineReport {
    pub fn succeeded(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| matches!(d.outcome, DocumentOutcome::Succeeded { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.documents.len() - self.succeeded()
    }
}

/// Fatal pre-loop errors; everything after discovery is per-document.
#[derive(Debug)]
pub enum PipelineError {
    OutputDirectory(std::io::Error),
    Discovery(DiscoverError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::OutputDirectory(e) => {
                write!(f, "failed to prepare docs directory: {e}")
            }
            PipelineError::Discovery(e) => write!(f, "workflow discovery failed: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::OutputDirectory(e) => Some(e),
            PipelineError::Discovery(e) => Some(e),
        }
    }
}

/// Runs one full documentation pass over the configured workflows directory.
///
/// Strictly sequential: each file is fully read, generated and persisted
/// before the next one starts.
pub async fn run<G>(
    config: &DocumenterConfig,
    generator: &G,
    observer: &mut dyn ChunkObserver,
) -> Result<PipelineReport, PipelineError>
where
    G: Generator,
{
    info!("[DOCS] Starting documentation pipeline");

    fs::create_dir_all(&config.docs_dir).map_err(|e| {
        error!(error = ?e, dir = %config.docs_dir.display(), "[DOCS][ERROR] Failed to create docs directory");
        PipelineError::OutputDirectory(e)
    })?;

    let files = discover::workflow_files(&config.workflows_dir, &config.suffixes).map_err(|e| {
        error!(error = %e, dir = %config.workflows_dir.display(), "[DOCS][ERROR] Workflow discovery failed");
        PipelineError::Discovery(e)
    })?;

    if files.is_empty() {
        info!(dir = %config.workflows_dir.display(), "[DOCS] No workflow files found, nothing to do");
        return Ok(PipelineReport {
            discovered: 0,
            documents: Vec::new(),
            index_path: None,
        });
    }

    info!(count = files.len(), "[DOCS] Found workflow files to document");
    println!("Found {} workflow(s) to document", files.len());

    let mut documents: Vec<DocumentReport> = Vec::new();

    for file in &files {
        let base_name = file_stem(file);
        info!(file = %file.display(), "[DOCS] Processing workflow");
        println!("Processing: {}", file_name(file));

        let outcome = process_document(config, generator, observer, file, &base_name).await;
        match &outcome {
            DocumentOutcome::Succeeded { output_path } => {
                info!(file = %file.display(), output = %output_path.display(), "[DOCS] Generated documentation");
                println!("Generated: {}", output_path.display());
            }
            DocumentOutcome::Failed { stage, cause } => {
                error!(file = %file.display(), stage = %stage, cause = %cause, "[DOCS][ERROR] Document failed");
                println!("Failed [{stage}] {}: {cause}", file.display());
            }
        }
        documents.push(DocumentReport {
            source: file.clone(),
            base_name,
            outcome,
        });
    }

    // The index is a pure derivation of the ordered success list.
    let succeeded: Vec<String> = documents
        .iter()
        .filter(|d| matches!(d.outcome, DocumentOutcome::Succeeded { .. }))
        .map(|d| d.base_name.clone())
        .collect();

    let index_path = if succeeded.is_empty() {
        info!("[DOCS] No documents succeeded, skipping index");
        None
    } else {
        match index::write(&config.docs_dir, &succeeded, chrono::Utc::now()) {
            Ok(path) => Some(path),
            Err(e) => {
                error!(error = ?e, "[DOCS][ERROR] Failed to write index file");
                None
            }
        }
    };

    Ok(PipelineReport {
        discovered: files.len(),
        documents,
        index_path,
    })
}

async fn process_document<G>(
    config: &DocumenterConfig,
    generator: &G,
    observer: &mut dyn ChunkObserver,
    file: &Path,
    base_name: &str,
) -> DocumentOutcome
where
    G: Generator,
{
    // --- Step 1: Read ---
    let bytes = match fs::read(file) {
        Ok(bytes) => bytes,
        Err(e) => {
            return DocumentOutcome::Failed {
                stage: Stage::Read,
                cause: e.to_string(),
            }
        }
    };
    let content = String::from_utf8_lossy(&bytes);

    // --- Step 2: Generate ---
    let request = GenerationRequest {
        system_instructions: &config.generation.system_instructions,
        source_content: &content,
        user_prompt: &config.generation.user_prompt,
    };
    let text = match generator.generate(request, observer).await {
        Ok(text) => text,
        Err(e) => {
            return DocumentOutcome::Failed {
                stage: Stage::Generate,
                cause: e.to_string(),
            }
        }
    };

    // --- Step 3: Persist ---
    let output_path = config.docs_dir.join(format!("{base_name}.md"));
    match fs::write(&output_path, &text) {
        Ok(()) => DocumentOutcome::Succeeded { output_path },
        Err(e) => DocumentOutcome::Failed {
            stage: Stage::Write,
            cause: e.to_string(),
        },
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
