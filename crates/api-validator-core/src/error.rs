// crates/api-validator-core/src/error.rs
// ============================================================================
// Module: Client Error Taxonomy
// Description: Service error bodies and client failure classification.
// Purpose: Let conformance checks discriminate NOT_FOUND from every other failure.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Service errors carry a JSON body with a kebab-case `errorType`
//! discriminator. Classification keys off that discriminator, never off the
//! HTTP status alone. Unknown discriminators decode to [`ErrorType::Unknown`]
//! instead of failing so a non-conforming server still yields a readable
//! report.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Error Body
// ============================================================================

/// Service error discriminator.
///
/// # Invariants
/// - Wire labels are stable kebab-case strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorType {
    /// Requested resource does not exist.
    NotFound,
    /// Request signature was rejected.
    InvalidSignature,
    /// Server-side failure.
    InternalError,
    /// Operation is not supported by the implementation.
    UnsupportedOperation,
    /// Request did not match the expected schema.
    SchemaError,
    /// Referenced asset is unknown.
    UnknownAsset,
    /// Discriminator not recognized by this validator.
    #[serde(other)]
    Unknown,
}

impl ErrorType {
    /// Returns the wire label for the discriminator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::InvalidSignature => "invalid-signature",
            Self::InternalError => "internal-error",
            Self::UnsupportedOperation => "unsupported-operation",
            Self::SchemaError => "schema-error",
            Self::UnknownAsset => "unknown-asset",
            Self::Unknown => "unknown",
        }
    }
}

/// JSON error body returned by the service on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Human-readable error message.
    #[serde(default)]
    pub message: String,
    /// Error discriminator.
    pub error_type: ErrorType,
}

impl ErrorBody {
    /// Creates an error body.
    #[must_use]
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type,
        }
    }
}

// ============================================================================
// SECTION: Client Errors
// ============================================================================

/// Accounts client failures.
///
/// # Invariants
/// - Variants are stable for check classification and reporting.
/// - String payloads are user-facing and may include untrusted server text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The request could not be built from the given options.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The service could not be reached or the exchange was interrupted.
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("service error (http {status}): {}", describe_body(.body.as_ref(), .raw.as_deref()))]
    Service {
        /// HTTP status code.
        status: u16,
        /// Decoded error body when the payload matched the error schema.
        body: Option<ErrorBody>,
        /// Raw body preview when the payload did not decode.
        raw: Option<String>,
    },
    /// A success payload did not match the expected schema.
    #[error("decode error: {0}")]
    Decode(String),
    /// The response body exceeded the configured size limit.
    #[error("response exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// Observed size in bytes.
        actual: usize,
        /// Maximum size in bytes.
        limit: usize,
    },
}

impl ClientError {
    /// Builds a service error from a decoded body.
    #[must_use]
    pub const fn service(status: u16, body: ErrorBody) -> Self {
        Self::Service {
            status,
            body: Some(body),
            raw: None,
        }
    }

    /// Returns the service error discriminator, if any.
    #[must_use]
    pub fn error_type(&self) -> Option<ErrorType> {
        match self {
            Self::Service {
                body: Some(body),
                ..
            } => Some(body.error_type),
            _ => None,
        }
    }

    /// Returns true when the service reported `not-found`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.error_type() == Some(ErrorType::NotFound)
    }
}

/// Formats the detail portion of a service error.
fn describe_body(body: Option<&ErrorBody>, raw: Option<&str>) -> String {
    match (body, raw) {
        (Some(body), _) if body.message.is_empty() => body.error_type.as_str().to_string(),
        (Some(body), _) => format!("{} ({})", body.message, body.error_type.as_str()),
        (None, Some(raw)) if !raw.trim().is_empty() => raw.trim().to_string(),
        (None, _) => "no error body".to_string(),
    }
}
