//! Index builder: renders and writes the aggregated `README.md` for the
//! generated documentation directory.
//!
//! Rendering is a pure function of the ordered success list and the run
//! timestamp, so the same successes always produce the same index body.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Fixed name of the index document inside the docs directory.
pub const INDEX_FILE: &str = "README.md";

/// Turns a file stem into its index label: hyphens become spaces and the
/// first character is uppercased. Total on any input; empty stems pass
/// through unchanged.
pub fn display_name(base: &str) -> String {
    let spaced = base.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}

/// Renders the full index document for the given stems, in the order given.
pub fn render(stems: &[String], generated_at: DateTime<Utc>) -> String {
    let mut content = String::from(
        "# GitHub Actions Workflows Documentation\n\n\
         This directory contains auto-generated documentation for all GitHub Actions workflows.\n\n",
    );
    content.push_str(&format!(
        "**Last Updated:** {} UTC\n\n## Workflows\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    for stem in stems {
        content.push_str(&format!("- [{}](./{}.md)\n", display_name(stem), stem));
    }
    content
}

/// Writes the rendered index into `docs_dir`, overwriting any prior index.
pub fn write(
    docs_dir: &Path,
    stems: &[String],
    generated_at: DateTime<Utc>,
) -> std::io::Result<PathBuf> {
    let path = docs_dir.join(INDEX_FILE);
    fs::write(&path, render(stems, generated_at))?;
    info!(path = %path.display(), entries = stems.len(), "Index written");
    Ok(path)
}
