// Template store
//
// Holds template contents keyed by template identity (the file name) and
// discovers the placeholder variables a template declares.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use walkdir::WalkDir;

/// Pattern for {{placeholder}} variables inside a template
static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

/// Template contents keyed by identity, iterated in stable order
#[derive(Debug, Default)]
pub struct TemplateStore {
    templates: BTreeMap<String, Vec<u8>>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every regular file in a directory; the file name becomes the
    /// template identity
    pub fn load_dir(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }

        let mut store = Self::new();
        for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let identity = entry.file_name().to_string_lossy().to_string();
            let bytes = std::fs::read(entry.path())?;
            store.insert(identity, bytes);
        }

        Ok(store)
    }

    /// Add a template by identity
    pub fn insert(&mut self, identity: impl Into<String>, bytes: Vec<u8>) {
        self.templates.insert(identity.into(), bytes);
    }

    /// Get a template's content
    pub fn get(&self, identity: &str) -> Option<&[u8]> {
        self.templates.get(identity).map(|b| b.as_slice())
    }

    /// Get a template's content, erroring if unknown
    pub fn require(&self, identity: &str) -> Result<&[u8]> {
        self.get(identity)
            .ok_or_else(|| Error::UnknownTemplate(identity.to_string()))
    }

    /// Iterate over identities in stable order
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    /// Placeholder variables declared by a template, in stable order
    pub fn placeholders(&self, identity: &str) -> Result<BTreeSet<String>> {
        let bytes = self.require(identity)?;
        Ok(scan_placeholders(&String::from_utf8_lossy(bytes)))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Extract the set of {{placeholder}} names declared in template text
pub fn scan_placeholders(text: &str) -> BTreeSet<String> {
    PLACEHOLDER_PATTERN
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}
