/// VendorMatch error types
#[derive(Debug, thiserror::Error)]
pub enum VendorMatchError {
    /// Request rejected before any matching work (e.g. empty capability list)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Vendor feature payload could not be decoded into the expected shape
    #[error("Malformed feature data: {0}")]
    MalformedFeatureData(String),

    /// Embedding provider failure
    #[error("Embedding provider error: {0}")]
    Embedding(String),

    /// Dataset loading error
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request deadline exceeded
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VendorMatchError {
    /// Create invalid request error
    pub fn invalid_request<S: Into<String>>(msg: S) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create malformed feature data error
    pub fn malformed_feature_data<S: Into<String>>(msg: S) -> Self {
        Self::MalformedFeatureData(msg.into())
    }

    /// Create embedding provider error
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create dataset error
    pub fn dataset<S: Into<String>>(msg: S) -> Self {
        Self::Dataset(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::MalformedFeatureData(_) => "MalformedFeatureData",
            Self::Embedding(_) => "EmbeddingProviderFailure",
            Self::Dataset(_) => "Dataset",
            Self::Config(_) => "Config",
            Self::Timeout(_) => "Timeout",
            Self::Internal(_) => "Internal",
            Self::Io(_) => "Io",
            Self::Json(_) => "Json",
            Self::Other(_) => "Internal",
        }
    }
}

// HTTP response conversion
impl VendorMatchError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::MalformedFeatureData(_) => 422,
            Self::Embedding(_) => 503,
            Self::Timeout(_) => 504,
            Self::Dataset(_) => 500,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
            Self::Io(_) => 500,
            Self::Json(_) => 400,
            Self::Other(_) => 500,
        }
    }
}
