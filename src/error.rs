//! Bridge error types.
//!
//! Everything that can fail between a decoded frame and a WordPress
//! response funnels into [`BridgeError`]. Variants carry the exact
//! message text that ends up in the JSON-RPC error envelope, so the
//! `Display` output is the wire contract: `Api`, `Http` and `Network`
//! reproduce the upstream REST client's phrasing, and the catalog
//! lookups (`UnknownSite`, `UnknownTool`, `UnknownPrompt`) name the
//! missing key verbatim.

use thiserror::Error;

/// Bridge errors.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// No site is configured under the requested alias.
    #[error("Unknown site: {0}")]
    UnknownSite(String),

    /// Tool name is not in the catalog.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Prompt name is not in the catalog.
    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    /// Tool disabled by the site's capability map.
    #[error("Tool {tool} is not allowed for site: {site}")]
    NotAllowed {
        /// Tool that was refused.
        tool: String,
        /// Site alias whose capability map refused it.
        site: String,
    },

    /// Per-tool minimum call interval violated.
    #[error("Rate limit exceeded for tool: {0}")]
    RateLimited(String),

    /// Consent was revoked for the requesting scope.
    #[error("User consent not granted for tool execution")]
    ConsentDenied,

    /// Tool call missing its params, name or arguments envelope.
    #[error("Invalid request parameters")]
    InvalidRequestParams,

    /// Tool arguments failed the typed parameter check.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Shop filter payload could not be parsed.
    #[error("Invalid filters format: {0}")]
    InvalidFilters(String),

    /// `readResource` called without an id.
    #[error("Resource ID is required")]
    ResourceIdRequired,

    /// `getPrompt` called without a name.
    #[error("Prompt name is required")]
    PromptNameRequired,

    /// Active-theme lookup returned an empty list.
    #[error("No active theme found")]
    NoActiveTheme,

    /// WordPress rejected the request with a structured error body.
    #[error("API Error ({code}): {message}")]
    Api {
        /// WordPress error code, e.g. `rest_post_invalid_id`.
        code: String,
        /// Human-readable message from the error body.
        message: String,
    },

    /// HTTP failure without a parseable WordPress error body.
    #[error("HTTP Error {0}")]
    Http(u16),

    /// Transport failure before any HTTP status was received.
    #[error("Network Error: {0}")]
    Network(String),

    /// Server-side error.
    #[error("Server error: {0}")]
    Server(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        BridgeError::Network(err.to_string())
    }
}

impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        BridgeError::Config(err.to_string())
    }
}
