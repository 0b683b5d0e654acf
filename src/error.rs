use thiserror::Error;

/// Reasons a loaded file is rejected and skipped.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Unsupported file type: {0}")]
    UnsupportedExtension(String),

    #[error("Error reading file {file}: {message}")]
    Parse { file: String, message: String },
}

impl SweepError {
    pub fn parse(file: &str, err: anyhow::Error) -> Self {
        SweepError::Parse {
            file: file.to_string(),
            message: format!("{err:#}"),
        }
    }
}
