use std::{io, path::PathBuf};

use http::StatusCode;

pub type Result<T = (), E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`{0}` is not configured")]
    Config(&'static str),

    #[error("invalid operation name `{name}`, valid names are: {valid}")]
    InvalidName { name: String, valid: String },

    #[error("invalid parameters for `{operation}`: {reason}")]
    InvalidParams { operation: String, reason: String },

    #[error("failed to call `{url}`")]
    Transport {
        url: String,

        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("`{url}` responded with {status}: {body}")]
    Api { url: String, status: StatusCode, body: String },

    #[error("failed to authenticate against `{url}`: {reason}")]
    Authentication { url: String, reason: String },

    #[error("`{url}` responded with invalid JSON")]
    InvalidJson {
        url: String,

        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read the cached `{path}`")]
    CacheRead {
        path: PathBuf,

        #[source]
        source: io::Error,
    },

    #[error("failed to write the cached `{path}`")]
    CacheWrite {
        path: PathBuf,

        #[source]
        source: io::Error,
    },

    #[error("`{operation}` returned no items")]
    EmptyResult { operation: String },

    #[error("`{operation}` response has no `{pointer}`")]
    MalformedResponse { operation: String, pointer: &'static str },

    #[error("failed to build the request")]
    Request(#[from] http::Error),
}
