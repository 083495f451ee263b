use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub render: RenderConfig,
    pub output: OutputConfig,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub description: Option<String>,
}

/// Render settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Render rows in parallel
    pub parallel: bool,
    /// Reject targets with more than one connected source
    pub strict_bindings: bool,
    /// Produce merged documents after rendering
    pub merge: bool,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    /// Name of the top-level folder holding merged documents
    pub merged_dir: String,
    /// Prefix prepended to each merged file name
    pub merged_prefix: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Untitled Batch".to_string(),
            description: None,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            strict_bindings: false,
            merge: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./papermill-out"),
            merged_dir: "merged".to_string(),
            merged_prefix: "Объединённый_".to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        output: Option<PathBuf>,
        no_merge: bool,
        strict: bool,
        parallel: bool,
    ) {
        if let Some(out) = output {
            self.output.directory = out;
        }

        if no_merge {
            self.render.merge = false;
        }

        if strict {
            self.render.strict_bindings = true;
        }

        if parallel {
            self.render.parallel = true;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.output.merged_dir.is_empty() {
            return Err(Error::config_validation("merged_dir must not be empty"));
        }

        if self.output.merged_dir.contains('/') || self.output.merged_dir.contains('\\') {
            return Err(Error::config_validation(
                "merged_dir must be a single folder name",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.project.name, "Untitled Batch");
        assert!(!config.render.parallel);
        assert!(!config.render.strict_bindings);
        assert!(config.render.merge);
        assert_eq!(config.output.merged_dir, "merged");
        assert_eq!(config.output.merged_prefix, "Объединённый_");
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[project]
name = "HR Batch"

[render]
parallel = true
strict_bindings = true

[output]
directory = "/tmp/out"
merged_dir = "combined"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.project.name, "HR Batch");
        assert!(config.render.parallel);
        assert!(config.render.strict_bindings);
        assert_eq!(config.output.directory, PathBuf::from("/tmp/out"));
        assert_eq!(config.output.merged_dir, "combined");
        // untouched sections keep their defaults
        assert_eq!(config.output.merged_prefix, "Объединённый_");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/papermill.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_empty_merged_dir() {
        let mut config = Config::default();
        config.output.merged_dir = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_nested_merged_dir() {
        let mut config = Config::default();
        config.output.merged_dir = "a/b".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_cli_output() {
        let mut config = Config::default();
        config.merge_cli(Some(PathBuf::from("/custom/out")), false, false, false);
        assert_eq!(config.output.directory, PathBuf::from("/custom/out"));
    }

    #[test]
    fn test_merge_cli_no_merge() {
        let mut config = Config::default();
        config.merge_cli(None, true, false, false);
        assert!(!config.render.merge);
    }

    #[test]
    fn test_merge_cli_strict_and_parallel() {
        let mut config = Config::default();
        config.merge_cli(None, false, true, true);
        assert!(config.render.strict_bindings);
        assert!(config.render.parallel);
    }
}
