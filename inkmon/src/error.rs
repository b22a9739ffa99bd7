//!
//! Check error
//!
use std::num::ParseIntError;

/// Error raised while fetching, parsing or evaluating printer status
#[allow(clippy::large_enum_variant)]
#[derive(Debug, thiserror::Error)]
pub enum InkError {
    #[error(transparent)]
    /// HTTP protocol error
    HttpError(#[from] http::Error),

    #[error("HTTP request error: {0}")]
    /// HTTP request error
    RequestError(u16),

    #[error(transparent)]
    /// Client error
    ClientError(#[from] ureq::Error),

    #[error("Invalid XML document: {0}")]
    /// Malformed XML document
    XmlError(#[from] roxmltree::Error),

    #[error("Invalid hostname: {0}")]
    /// Host name is neither a DNS name nor an IPv4 address
    InvalidHost(String),

    #[error("Unknown namespace prefix: {0}")]
    /// Namespace prefix is not declared in the document
    UnknownPrefix(String),

    #[error("Missing element in document: {0}")]
    /// Expected element is not present in the document
    MissingElement(String),

    #[error("Invalid level value for {tag}: {source}")]
    /// Level element does not contain an integer
    InvalidLevel {
        tag: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Invalid fill level check: {0}")]
    /// Malformed fill level check arguments
    InvalidCheck(String),

    #[error("Invalid HTTP header, expected key=value: {0}")]
    /// Extra HTTP header argument without a `=` separator
    InvalidHeader(String),
}
