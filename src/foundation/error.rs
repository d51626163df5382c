/// Convenience result type used across qrdecor.
pub type QrResult<T> = Result<T, QrError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum QrError {
    /// Style or content outside the domain limits the engine accepts.
    #[error("validation error: {0}")]
    Validation(String),

    /// The matrix encoder rejected the content for the requested capacity.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A logo (or other external asset) could not be read or decoded.
    #[error("asset load error: {0}")]
    AssetLoad(String),

    /// Encoding or saving a downloadable file failed.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing style documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QrError {
    /// Build a [`QrError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QrError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`QrError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`QrError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`QrError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
