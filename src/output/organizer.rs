// Output organizer
//
// Computes where one rendered document lands and persists it. Layout:
// <root>/<folder value>/<template stem>/<file name>. Each template gets
// its own subfolder inside each row folder so the merge stage can collect
// one template's instances across all row folders.

use crate::binding::ResolvedBinding;
use crate::data::DataRow;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Places rendered documents into the output tree
pub struct OutputOrganizer {
    root: PathBuf,
}

impl OutputOrganizer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compute the destination path for one (row, template) document
    ///
    /// Fails before any file-system side effect when the binding lacks a
    /// folder key or file name pattern, or the row lacks a bound column.
    pub fn destination(&self, row: &DataRow, binding: &ResolvedBinding) -> Result<PathBuf> {
        let folder_key = binding.folder_key.as_deref().ok_or(Error::MissingFolderKey)?;
        let folder = row.require(folder_key)?;

        let filename = binding
            .filename
            .as_ref()
            .ok_or_else(|| Error::MissingFilenamePattern(binding.template.clone()))?;
        let value = row.require(&filename.source_column)?;

        Ok(self
            .root
            .join(folder)
            .join(template_stem(&binding.template))
            .join(filename.file_name(value)))
    }

    /// Persist one rendered document at its computed destination
    pub fn write(&self, row: &DataRow, binding: &ResolvedBinding, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.destination(row, binding)?;
        self.persist(&path, bytes)?;
        Ok(path)
    }

    /// Write bytes at a previously computed destination
    ///
    /// Directory creation is idempotent; concurrent writers may race on
    /// create_dir_all without failing.
    pub fn persist(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
        Ok(())
    }
}

/// The per-template subfolder name: the identity without its extension
pub fn template_stem(identity: &str) -> String {
    Path::new(identity)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| identity.to_string())
}
