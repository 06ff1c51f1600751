use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unable to read spreadsheet: {0}")]
    UnreadableFile(String),

    #[error("Missing required tabs. Found: {found}. Need {required}.")]
    MissingSheet { found: String, required: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {message}")]
    Store { message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ImportError {
    /// Build a missing-sheet error that lists what the workbook actually contains.
    pub fn missing_sheet(found: &[String], required: &str) -> Self {
        ImportError::MissingSheet {
            found: if found.is_empty() {
                "(no sheets)".to_string()
            } else {
                found.join(", ")
            },
            required: required.to_string(),
        }
    }

    /// Fatal parse errors are reported to the caller without committing data;
    /// storage failures after a successful parse are server-side faults.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ImportError::UnreadableFile(_) | ImportError::MissingSheet { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
