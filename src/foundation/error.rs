/// Convenience result type used across slidecast.
pub type SlidecastResult<T> = Result<T, SlidecastError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SlidecastError {
    /// Invalid script, settings, catalog or asset layout. Raised before rendering starts.
    #[error("configuration error: {0}")]
    Config(String),

    /// Errors while compositing frames.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while decoding, mixing or exporting audio.
    #[error("audio error: {0}")]
    Audio(String),

    /// Errors from the external encoder/muxer processes.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlidecastError {
    /// Build a [`SlidecastError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`SlidecastError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SlidecastError::Audio`] value.
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Build a [`SlidecastError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SlidecastError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for configuration errors (the ones reported before any rendering).
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
