/// Crate-wide result alias.
pub type SlideResult<T> = Result<T, SlideError>;

/// Errors produced by the slide pipeline.
///
/// Any per-slide failure aborts the whole batch; callers decide whether to retry or substitute
/// fallback inputs.
#[derive(thiserror::Error, Debug)]
pub enum SlideError {
    /// The background could not be read or decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// Canvas-to-PNG serialization failed or produced no data.
    #[error("encode error: {0}")]
    Encode(String),

    /// Unrecoverable layout input (non-finite sizes, missing font faces).
    #[error("layout error: {0}")]
    Layout(String),

    /// Malformed request (slide count, color strings, paths).
    #[error("validation error: {0}")]
    Validation(String),

    /// Zip container construction or save failure.
    #[error("archive error: {0}")]
    Archive(String),

    /// Background decode exceeded its deadline.
    #[error("timed out after {0:?} waiting for background decode")]
    Timeout(std::time::Duration),

    /// A newer render request was issued while this one was in flight.
    #[error("render superseded: started at generation {started}, current is {current}")]
    Superseded {
        /// Generation captured when the request started.
        started: u64,
        /// Generation observed when the result was about to be published.
        current: u64,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlideError {
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// `true` for failures where rerunning the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ImageLoad(_) | Self::Timeout(_) | Self::Superseded { .. } | Self::Archive(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
