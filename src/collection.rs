//! Collection discovery and descriptor parsing.
//!
//! A collection directory holds a `PDFs/` subdirectory plus a JSON
//! descriptor naming the documents, the persona and the job to be done.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Descriptor file names probed inside a collection directory.
const DESCRIPTOR_NAMES: [&str; 2] = ["collection.json", "challenge1b_input.json"];

/// Subdirectory holding the source PDFs.
const PDF_DIR: &str = "PDFs";

/// One document entry in the descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentEntry {
    /// PDF filename inside the collection's `PDFs/` directory
    pub filename: String,
    /// Optional human-readable title
    #[serde(default)]
    pub title: Option<String>,
}

/// Persona descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Persona {
    /// Persona role description
    #[serde(default)]
    pub role: String,
}

/// Job-to-be-done descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobToBeDone {
    /// Task description
    #[serde(default)]
    pub task: String,
}

/// Parsed collection descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSpec {
    /// Documents to analyze
    #[serde(default)]
    pub documents: Vec<DocumentEntry>,
    /// Persona
    #[serde(default)]
    pub persona: Persona,
    /// Job to be done
    #[serde(default)]
    pub job_to_be_done: JobToBeDone,
}

/// A discovered collection on disk.
#[derive(Debug, Clone)]
pub struct Collection {
    /// Collection name (directory basename)
    pub name: String,
    /// Collection directory
    pub dir: PathBuf,
    /// Parsed descriptor
    pub spec: CollectionSpec,
}

impl Collection {
    /// Load the collection rooted at `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let descriptor = DESCRIPTOR_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
            .ok_or_else(|| {
                Error::Descriptor(format!("no descriptor found in {}", dir.display()))
            })?;

        let data = fs::read_to_string(&descriptor)?;
        let spec: CollectionSpec = serde_json::from_str(&data)
            .map_err(|e| Error::Descriptor(format!("{}: {e}", descriptor.display())))?;

        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| dir.display().to_string());

        Ok(Self {
            name,
            dir: dir.to_path_buf(),
            spec,
        })
    }

    /// Absolute paths of the collection's PDFs, in descriptor order.
    pub fn pdf_paths(&self) -> Vec<(String, PathBuf)> {
        let pdf_dir = self.dir.join(PDF_DIR);
        self.spec
            .documents
            .iter()
            .map(|doc| (doc.filename.clone(), pdf_dir.join(&doc.filename)))
            .collect()
    }
}

/// Discover collections under an input root.
///
/// The root may itself be a collection, or contain one directory per
/// collection; results come back sorted by name so runs are
/// reproducible. A missing or unreadable root is the one fatal input
/// error.
pub fn discover<P: AsRef<Path>>(root: P) -> Result<Vec<Collection>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::InputRoot(root.display().to_string()));
    }

    // Root-as-collection
    if DESCRIPTOR_NAMES.iter().any(|n| root.join(n).is_file()) {
        return Ok(vec![Collection::load(root)?]);
    }

    let entries =
        fs::read_dir(root).map_err(|_| Error::InputRoot(root.display().to_string()))?;

    let mut collections = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if DESCRIPTOR_NAMES.iter().any(|n| path.join(n).is_file()) {
            match Collection::load(&path) {
                Ok(collection) => collections.push(collection),
                Err(e) => log::warn!("skipping {}: {e}", path.display()),
            }
        }
    }

    collections.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(collections)
}
