//! # Registry Errors
//!
//! Every failure raised by the registry is terminal for the operation that
//! raised it: nothing is written to the store once an error is returned. Only
//! [`Error::VersionConflict`] is worth retrying, and then only after the caller
//! has re-read the current document state.

use thiserror::Error;

/// Log an error with `tracing` and return it from the enclosing function.
///
/// # Example
/// ```
/// use vercre_didledger::{tracerr, Error, Result};
///
/// fn check(found: bool) -> Result<()> {
///     if !found {
///         tracerr!(Error::NotFound, "{}: document not found", "did:cheqd:testnet:zABCDEFGH");
///     }
///     Ok(())
/// }
///
/// assert!(check(false).is_err());
/// ```
#[macro_export]
macro_rules! tracerr {
    ($kind:path, $($msg:tt)*) => {{
        let message = format!($($msg)*);
        $crate::tracing::error!(error = %message);
        return Err($kind(message).into());
    }};
}

/// Errors raised by the DID registry.
#[derive(Error, Debug)]
pub enum Error {
    /// The string does not match the DID grammar or uses the wrong method.
    #[error("malformed DID: {0}")]
    MalformedDid(String),

    /// The string does not match the DID URL grammar.
    #[error("malformed DID URL: {0}")]
    MalformedDidUrl(String),

    /// The DID namespace is not in the configured allow-list.
    #[error("namespace not allowed: {0}")]
    NamespaceNotAllowed(String),

    /// A document or payload fails a field-level invariant.
    #[error("structural validation failed: {0}")]
    StructuralValidation(String),

    /// A create targets an id, or a revision, that is already present.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The requested document does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A mutation was attempted on a deactivated document.
    #[error("already deactivated: {0}")]
    AlreadyDeactivated(String),

    /// The submitted version id does not match the current stored version.
    #[error("version conflict: {0}")]
    VersionConflict(String),

    /// A required signer contributed no candidate signature.
    #[error("signature missing: {0}")]
    SignatureMissing(String),

    /// Candidate signatures were present for a signer but none verified.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// A referenced controller does not resolve to an active document.
    #[error("controller not found: {0}")]
    ControllerNotFound(String),

    /// Public key material could not be decoded.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// A value could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage collaborator failed.
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl Error {
    /// A stable, machine-readable code for the error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedDid(_) => "malformed_did",
            Self::MalformedDidUrl(_) => "malformed_did_url",
            Self::NamespaceNotAllowed(_) => "namespace_not_allowed",
            Self::StructuralValidation(_) => "structural_validation",
            Self::AlreadyExists(_) => "already_exists",
            Self::NotFound(_) => "not_found",
            Self::AlreadyDeactivated(_) => "already_deactivated",
            Self::VersionConflict(_) => "version_conflict",
            Self::SignatureMissing(_) => "signature_missing",
            Self::InvalidSignature(_) => "invalid_signature",
            Self::ControllerNotFound(_) => "controller_not_found",
            Self::InvalidPublicKey(_) => "invalid_public_key",
            Self::Serialization(_) => "serialization_error",
            Self::Store(_) => "store_error",
        }
    }

    /// Transfer the error to a JSON `{error, error_description}` object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.code(),
            "error_description": self.to_string(),
        })
    }

    /// Returns `true` when the caller may retry the operation after
    /// re-reading current state.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionConflict(_))
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_json_snapshot;
    use tracing_subscriber::FmtSubscriber;

    use super::*;

    fn stale(version: &str) -> crate::Result<()> {
        tracerr!(Error::VersionConflict, "got: {version}, must be: ABC");
    }

    #[test]
    fn traced_error() {
        let subscriber = FmtSubscriber::builder().with_max_level(tracing::Level::ERROR).finish();
        tracing::subscriber::with_default(subscriber, || {
            let err = stale("XYZ").expect_err("should fail");
            assert!(matches!(err, Error::VersionConflict(_)));
            assert!(err.is_retryable());
        });
    }

    #[test]
    fn error_json() {
        let err = Error::SignatureMissing("did:cheqd:testnet:zABCDEFGHJKLMNPQ".into());
        assert!(!err.is_retryable());
        assert_json_snapshot!(err.to_json(), @r###"
        {
          "error": "signature_missing",
          "error_description": "signature missing: did:cheqd:testnet:zABCDEFGHJKLMNPQ"
        }
        "###);
    }
}
