//! Uploaded file slots.
//!
//! Multipart decoding is the job of an external form-parsing collaborator;
//! once decoded, each file part lands here. Failures are explicit values,
//! never silently ignored.

use std::io::Write;
use std::path::Path;

use bytes::Bytes;
use http::Method;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("uploads require POST or PUT, got {0}")]
    WrongMethod(Method),
    #[error("no uploaded file for field `{0}`")]
    MissingField(String),
    #[error("failed to save upload: {0}")]
    Save(#[from] std::io::Error),
}

/// One decoded file part from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadFile {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

impl UploadFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            data: data.into(),
        }
    }

    /// Client-supplied filename. Untrusted; callers choose the save path.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Write the file bytes to `path`. Disk errors propagate to the caller.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), UploadError> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(&self.data)?;
        Ok(())
    }
}
