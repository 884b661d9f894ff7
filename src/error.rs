// Error module for the provisioning pipeline

use std::path::PathBuf;
use thiserror::Error;

use crate::constants;

/// Every way a provisioning run can fail.
///
/// Each variant carries enough context (raw input, path, URL, cause) to
/// diagnose the failure from the message alone.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(
        "Malformed Spigot version '{raw}': expected 4 dash-separated segments. \
         Please use the version number from the CodeMC nms repo, like {example}."
    )]
    MalformedVersion { raw: String, example: &'static str },

    #[error("Spigot version '{raw}' cannot be used as a cache directory name")]
    UnsafeVersionPath { raw: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Download failed: {url} ({cause})")]
    Download { url: String, cause: String },

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Expected only 1 version in META-INF/versions.list, but got {count}")]
    UnsupportedBundle { count: usize },

    #[error("Bundle entry '{path}' not found in archive")]
    BundleEntryNotFound { path: String },

    #[error("Hash mismatch for {}: expected {expected}, got {actual}", path.display())]
    Integrity {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Invalid archive {}: {message}", path.display())]
    Archive { path: PathBuf, message: String },

    #[error("Invalid configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl ProvisionError {
    pub fn malformed_version(raw: impl Into<String>) -> Self {
        ProvisionError::MalformedVersion {
            raw: raw.into(),
            example: constants::EXAMPLE_VERSION,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProvisionError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn download(url: impl Into<String>, cause: impl ToString) -> Self {
        ProvisionError::Download {
            url: url.into(),
            cause: cause.to_string(),
        }
    }

    pub fn archive(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ProvisionError::Archive {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_version_message_has_guidance() {
        let err = ProvisionError::malformed_version("1.19.3-R0.1");
        let msg = err.to_string();
        assert!(msg.contains("1.19.3-R0.1"));
        assert!(msg.contains("CodeMC nms repo"));
        assert!(msg.contains(constants::EXAMPLE_VERSION));
    }

    #[test]
    fn test_unsupported_bundle_names_count() {
        let err = ProvisionError::UnsupportedBundle { count: 3 };
        assert_eq!(
            err.to_string(),
            "Expected only 1 version in META-INF/versions.list, but got 3"
        );
    }

    #[test]
    fn test_unsafe_version_path_names_input() {
        let err = ProvisionError::UnsafeVersionPath {
            raw: "../x-R0.1-1-2".to_string(),
        };
        assert!(err.to_string().contains("'../x-R0.1-1-2'"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = ProvisionError::io(
            "/tmp/cache/spigot",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/cache/spigot"));
        assert!(err.to_string().contains("denied"));
    }
}
