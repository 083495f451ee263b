// Merge engine
//
// Runs after every row has been rendered and written. For each template
// identity it collects every rendered instance across all row folders,
// orders them lexically by (folder, file name), and concatenates them into
// one merged document under a dedicated top-level folder.

use crate::error::Result;
use crate::output::organizer::template_stem;
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};

/// Document concatenation delegate: combines a base document with a list
/// of documents to append, in order
pub trait DocumentComposer: Send + Sync {
    fn compose(&self, base: Vec<u8>, parts: Vec<Vec<u8>>) -> Result<Vec<u8>>;
}

/// Default composer: verbatim byte concatenation
#[derive(Debug, Default)]
pub struct ConcatComposer;

impl DocumentComposer for ConcatComposer {
    fn compose(&self, mut base: Vec<u8>, parts: Vec<Vec<u8>>) -> Result<Vec<u8>> {
        for part in parts {
            base.extend_from_slice(&part);
        }
        Ok(base)
    }
}

/// Merges rendered documents per template identity
pub struct MergeEngine<'a> {
    root: &'a Path,
    composer: &'a dyn DocumentComposer,
    merged_dir: String,
    merged_prefix: String,
}

impl<'a> MergeEngine<'a> {
    pub fn new(root: &'a Path, composer: &'a dyn DocumentComposer) -> Self {
        Self {
            root,
            composer,
            merged_dir: "merged".to_string(),
            merged_prefix: "Объединённый_".to_string(),
        }
    }

    /// Override the name of the merged-output folder
    pub fn with_merged_dir(mut self, dir: impl Into<String>) -> Self {
        self.merged_dir = dir.into();
        self
    }

    /// Override the merged file name prefix
    pub fn with_merged_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.merged_prefix = prefix.into();
        self
    }

    /// Merge every rendered instance of one template into a single file
    ///
    /// Returns the merged file path, or None when no instances exist
    /// (not an error: that template simply produced nothing).
    pub fn merge_template(&self, identity: &str) -> Result<Option<PathBuf>> {
        let files = self.collect_files(identity)?;
        let Some((first, rest)) = files.split_first() else {
            return Ok(None);
        };

        let base = fs::read(first)?;
        let parts = rest.iter().map(fs::read).collect::<std::io::Result<Vec<_>>>()?;
        let merged = self.composer.compose(base, parts)?;

        let out_dir = self.root.join(&self.merged_dir);
        fs::create_dir_all(&out_dir)?;
        let out_path = out_dir.join(format!("{}{}", self.merged_prefix, identity));
        fs::write(&out_path, merged)?;

        Ok(Some(out_path))
    }

    /// Every rendered instance of one template, sorted by row folder then
    /// file name. Glob traversal is alphabetical per directory, which
    /// makes merge order stable across runs; an explicit sort guards the
    /// contract anyway.
    fn collect_files(&self, identity: &str) -> Result<Vec<PathBuf>> {
        let stem = template_stem(identity);
        let pattern = format!(
            "{}/*/{}/*",
            Pattern::escape(&self.root.to_string_lossy()),
            Pattern::escape(&stem)
        );

        let mut files = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry?;
            if !path.is_file() {
                continue;
            }
            if self.row_folder_of(&path) == Some(PathBuf::from(&self.merged_dir)) {
                continue;
            }
            files.push(path);
        }
        files.sort();
        Ok(files)
    }

    /// The top-level row folder a matched file sits under
    fn row_folder_of(&self, path: &Path) -> Option<PathBuf> {
        path.strip_prefix(self.root)
            .ok()
            .and_then(|rel| rel.components().next())
            .map(|c| PathBuf::from(c.as_os_str()))
    }

    /// Merge all given template identities, reporting (identity, path)
    /// for each merged file actually produced
    pub fn merge_all(&self, identities: &[String]) -> Result<Vec<(String, PathBuf)>> {
        let mut merged = Vec::new();
        for identity in identities {
            if let Some(path) = self.merge_template(identity)? {
                merged.push((identity.clone(), path));
            }
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    /// A composer that refuses anything beyond a lone document
    struct SingleDocComposer;

    impl DocumentComposer for SingleDocComposer {
        fn compose(&self, base: Vec<u8>, parts: Vec<Vec<u8>>) -> Result<Vec<u8>> {
            if !parts.is_empty() {
                return Err(Error::compose("cannot append to this document"));
            }
            Ok(base)
        }
    }

    fn write_instance(root: &Path, folder: &str, stem: &str, name: &str, content: &str) {
        let dir = root.join(folder).join(stem);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_concat_composer() {
        let composer = ConcatComposer;
        let out = composer
            .compose(b"one".to_vec(), vec![b"two".to_vec(), b"three".to_vec()])
            .unwrap();
        assert_eq!(out, b"onetwothree");
    }

    #[test]
    fn test_concat_composer_no_parts() {
        let composer = ConcatComposer;
        let out = composer.compose(b"solo".to_vec(), vec![]).unwrap();
        assert_eq!(out, b"solo");
    }

    #[test]
    fn test_merge_orders_by_folder_then_file() {
        let dir = TempDir::new().unwrap();
        write_instance(dir.path(), "Bob", "report", "report Bob.docx", "IT");
        write_instance(dir.path(), "Alice", "report", "report Alice.docx", "HR");

        let composer = ConcatComposer;
        let engine = MergeEngine::new(dir.path(), &composer);
        let path = engine.merge_template("report.docx").unwrap().unwrap();

        assert!(path.ends_with("merged/Объединённый_report.docx"));
        assert_eq!(fs::read(&path).unwrap(), b"HRIT");
    }

    #[test]
    fn test_merge_is_reproducible() {
        let dir = TempDir::new().unwrap();
        write_instance(dir.path(), "Alice", "report", "a.docx", "1");
        write_instance(dir.path(), "Bob", "report", "b.docx", "2");

        let composer = ConcatComposer;
        let engine = MergeEngine::new(dir.path(), &composer);
        let first = engine.merge_template("report.docx").unwrap().unwrap();
        let first_bytes = fs::read(&first).unwrap();
        let second = engine.merge_template("report.docx").unwrap().unwrap();

        assert_eq!(fs::read(&second).unwrap(), first_bytes);
    }

    #[test]
    fn test_merge_skips_empty_group() {
        let dir = TempDir::new().unwrap();
        write_instance(dir.path(), "Alice", "report", "a.docx", "1");

        let composer = ConcatComposer;
        let engine = MergeEngine::new(dir.path(), &composer);
        let result = engine.merge_template("letter.docx").unwrap();

        assert!(result.is_none());
        assert!(!dir.path().join("merged/Объединённый_letter.docx").exists());
    }

    #[test]
    fn test_merge_ignores_other_templates() {
        let dir = TempDir::new().unwrap();
        write_instance(dir.path(), "Alice", "report", "a.docx", "R");
        write_instance(dir.path(), "Alice", "letter", "b.docx", "L");

        let composer = ConcatComposer;
        let engine = MergeEngine::new(dir.path(), &composer);
        let path = engine.merge_template("report.docx").unwrap().unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"R");
    }

    #[test]
    fn test_merge_all() {
        let dir = TempDir::new().unwrap();
        write_instance(dir.path(), "Alice", "report", "a.docx", "1");
        write_instance(dir.path(), "Alice", "letter", "b.docx", "2");

        let composer = ConcatComposer;
        let engine = MergeEngine::new(dir.path(), &composer);
        let merged = engine
            .merge_all(&[
                "report.docx".to_string(),
                "letter.docx".to_string(),
                "unused.docx".to_string(),
            ])
            .unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].0, "report.docx");
        assert_eq!(merged[1].0, "letter.docx");
    }

    #[test]
    fn test_composer_failure_surfaces_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        write_instance(dir.path(), "Alice", "report", "a.docx", "1");
        write_instance(dir.path(), "Bob", "report", "b.docx", "2");

        let composer = SingleDocComposer;
        let engine = MergeEngine::new(dir.path(), &composer);
        let err = engine.merge_template("report.docx").unwrap_err();

        assert!(matches!(err, Error::Compose(_)));
        assert!(err.to_string().contains("cannot append"));
        assert!(!dir.path().join("merged/Объединённый_report.docx").exists());
    }

    #[test]
    fn test_custom_merged_dir_and_prefix() {
        let dir = TempDir::new().unwrap();
        write_instance(dir.path(), "Alice", "report", "a.docx", "1");

        let composer = ConcatComposer;
        let engine = MergeEngine::new(dir.path(), &composer)
            .with_merged_dir("combined")
            .with_merged_prefix("all_");
        let path = engine.merge_template("report.docx").unwrap().unwrap();

        assert!(path.ends_with("combined/all_report.docx"));
    }
}
