/// Convenience result type used across mediacard.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy used by the card pipeline.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Invalid caller-provided request data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The poster could not be fetched.
    #[error("invalid poster: {0}")]
    InvalidPoster(String),

    /// Unexpected failure while decoding, drawing or encoding pixels.
    #[error("render error: {0}")]
    Render(String),

    /// Failure reading from or writing to a cache store.
    #[error("cache error: {0}")]
    Cache(String),

    /// Invalid service configuration or startup asset.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::InvalidPoster`] value.
    pub fn invalid_poster(msg: impl Into<String>) -> Self {
        Self::InvalidPoster(msg.into())
    }

    /// Build a [`CardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CardError::Cache`] value.
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Build a [`CardError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// HTTP status class a front end should answer with.
    ///
    /// Caller mistakes (bad fields, unusable poster) are 400; everything else is a server fault.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidPoster(_) => 400,
            _ => 500,
        }
    }

    /// Structured error body matching the shape clients of the card endpoints expect.
    pub fn payload(&self) -> ErrorPayload {
        let status = self.status_code();
        let error = match status {
            400 => "Bad Request",
            _ => "Internal Server Error",
        };
        ErrorPayload {
            status_code: status,
            error: error.to_owned(),
            message: self.to_string(),
        }
    }
}

/// Client-visible error body.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    /// HTTP status code.
    pub status_code: u16,
    /// Reason phrase for `status_code`.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
