use std::fmt;

/// Scratch-file allocation failure. The only error that aborts a flow
/// step; everything downstream of "have an image reference" degrades to
/// `Material::Undefined` instead.
#[derive(Debug)]
pub struct StorageError {
    pub message: String,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError {
            message: err.to_string(),
        }
    }
}

impl From<String> for StorageError {
    fn from(message: String) -> Self {
        StorageError { message }
    }
}

/// Failures inside the classification engine. Never crosses the
/// `classify` boundary; callers only ever see `Material::Undefined`.
#[derive(Debug)]
pub enum ClassifierError {
    /// Image could not be resolved, read or decoded.
    Decode(String),
    /// Model file missing/corrupt or the inference runtime failed.
    Model(String),
    /// Malformed buffer or unexpected output shape.
    Processing(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(msg) => write!(f, "decode error: {}", msg),
            Self::Model(msg) => write!(f, "model error: {}", msg),
            Self::Processing(msg) => write!(f, "processing error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<image::ImageError> for ClassifierError {
    fn from(err: image::ImageError) -> Self {
        ClassifierError::Decode(err.to_string())
    }
}

impl From<ort::Error> for ClassifierError {
    fn from(err: ort::Error) -> Self {
        ClassifierError::Model(err.to_string())
    }
}
