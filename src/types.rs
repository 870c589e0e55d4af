// Type definitions and error types

/// A file to submit to the stash, keyed by `name` in the multipart form.
#[derive(Debug, Clone)]
pub struct StashFile {
    pub name: String,
    pub content: bytes::Bytes,
}

impl StashFile {
    pub fn new(name: impl Into<String>, content: impl Into<bytes::Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a local file, keyed by its file name
    pub async fn from_path(path: &std::path::Path) -> AppResult<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AppError::InvalidRequest(format!("{} has no usable file name", path.display()))
            })?
            .to_string();
        let content = tokio::fs::read(path).await?;
        Ok(Self::new(name, content))
    }

    /// Guess the part's MIME type from the name, falling back to octet-stream
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

/// Download progress for a single fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub received: u64,
    pub total: Option<u64>,
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.total {
            Some(total) => write!(f, "{}/{} bytes", self.received, total),
            None => write!(f, "{} bytes", self.received),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Download(String),

    #[error("{0}")]
    Upload(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
