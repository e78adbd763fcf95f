//! Artifact destinations and atomic writes

use anyhow::{Context, Result};
use cpt_render::ArtifactKind;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where an invocation sends its artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Main artifact to standard output
    Stdout,
    /// Main artifact to this file, companions next to it
    File(PathBuf),
    /// One file per artifact in this directory
    Directory(PathBuf),
}

/// Where one artifact goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Standard output
    Stdout,
    /// File, replaced atomically
    File(PathBuf),
}

/// Artifact ready to be emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// Destination
    pub target: Target,
    /// Text
    pub content: String,
}

/// Target of an artifact, `None` when the destination has no place for it
#[must_use]
pub fn target_for(kind: ArtifactKind, destination: &Destination, extension: &str) -> Option<Target> {
    match (kind, destination) {
        (ArtifactKind::Main, Destination::Stdout) => Some(Target::Stdout),
        (ArtifactKind::Main, Destination::File(path)) => Some(Target::File(path.clone())),
        (ArtifactKind::Sections, Destination::File(path)) => {
            Some(Target::File(path.with_extension("sections")))
        }
        (ArtifactKind::Verbatim, Destination::File(path)) => {
            Some(Target::File(path.with_extension("verbatim")))
        }
        (ArtifactKind::AssumptionKind(kind), Destination::Directory(dir)) => Some(Target::File(
            dir.join(format!("tracing-{}.{extension}", kind.to_lowercase())),
        )),
        _ => None,
    }
}

/// Emit every output in order, returning the files written
///
/// # Errors
/// Fails on the first output that cannot be written.
pub fn emit(outputs: &[Output]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for output in outputs {
        match &output.target {
            Target::Stdout => std::io::stdout()
                .lock()
                .write_all(output.content.as_bytes())
                .context("cannot write to standard output")?,
            Target::File(path) => {
                write_atomically(path, &output.content)?;
                tracing::info!(path = %path.display(), bytes = output.content.len(), "artifact written");
                written.push(path.clone());
            }
        }
    }
    Ok(written)
}

/// Write through a temporary file in the destination directory, then rename
///
/// # Errors
/// Fails if the directory cannot be created or the file cannot be written.
pub fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create directory {}", dir.display()))?;
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot create temporary file in {}", dir.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("cannot write {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("cannot replace {}", path.display()))?;
    Ok(())
}
