use std::path::PathBuf;
use thiserror::Error;

/// Papermill error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("No folder key is bound in the graph")]
    MissingFolderKey,

    #[error("No file name pattern is bound for template '{0}'")]
    MissingFilenamePattern(String),

    #[error("Row {row} has no column '{column}'")]
    MissingColumn { column: String, row: usize },

    #[error("Multiple sources are connected to '{0}'")]
    AmbiguousBinding(String),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Compose error: {0}")]
    Compose(String),
}

/// Result type alias for Papermill operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a missing-column error
    pub fn missing_column(column: impl Into<String>, row: usize) -> Self {
        Error::MissingColumn {
            column: column.into(),
            row,
        }
    }

    /// Create a render error
    pub fn render(msg: impl Into<String>) -> Self {
        Error::Render(msg.into())
    }

    /// Create a compose error
    pub fn compose(msg: impl Into<String>) -> Self {
        Error::Compose(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_path_not_found_display() {
        let err = Error::PathNotFound(PathBuf::from("/some/path"));
        assert_eq!(err.to_string(), "Path not found: /some/path");
    }

    #[test]
    fn test_missing_column_display() {
        let err = Error::missing_column("dept", 3);
        assert_eq!(err.to_string(), "Row 3 has no column 'dept'");
    }

    #[test]
    fn test_missing_folder_key_display() {
        let err = Error::MissingFolderKey;
        assert_eq!(err.to_string(), "No folder key is bound in the graph");
    }

    #[test]
    fn test_missing_filename_pattern_display() {
        let err = Error::MissingFilenamePattern("report.docx".to_string());
        assert!(err.to_string().contains("report.docx"));
    }

    #[test]
    fn test_ambiguous_binding_display() {
        let err = Error::AmbiguousBinding("dept".to_string());
        assert_eq!(err.to_string(), "Multiple sources are connected to 'dept'");
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::config_validation("merged dir must not be empty");
        assert_eq!(
            err.to_string(),
            "Config validation error: merged dir must not be empty"
        );
    }

    #[test]
    fn test_compose_error_display() {
        let err = Error::compose("documents disagree on format");
        assert_eq!(err.to_string(), "Compose error: documents disagree on format");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
