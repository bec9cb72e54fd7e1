//! # Signature Verification
//!
//! Checks that every required signer has authorized an operation.
//!
//! A signer is satisfied by any one signature that names one of its
//! authentication methods and verifies over the payload's canonical bytes.
//! Signatures are matched to signers by DID, so one signature may satisfy the
//! same DID at both revisions when a key survives an update unchanged.

use crate::document::Document;
use crate::error::Error;
use crate::message::SignInfo;
use crate::provider::Store;
use crate::resolve::{Resolver, Revision};
use crate::signer::{RequiredSigner, SignerSet};
use crate::tracerr;

/// A required signer resolved to the document its keys are taken from.
#[derive(Debug)]
pub struct Signer<'a> {
    /// The signing DID.
    pub did: &'a str,

    /// Layer the document was resolved from.
    pub revision: Revision,

    /// The signer's document at `revision`.
    pub document: &'a Document,
}

impl Signer<'_> {
    /// Returns `true` if `sign_info` was made by one of the signer's
    /// authentication methods over `message`.
    #[must_use]
    pub fn verify(&self, message: &[u8], sign_info: &SignInfo) -> bool {
        let vm_id = &sign_info.verification_method_id;
        let Some(vm) = self.document.verification_method(vm_id) else {
            tracing::debug!(did = self.did, vm = %vm_id, "verification method not found");
            return false;
        };
        if !self.document.is_authentication_method(vm_id) {
            tracing::debug!(did = self.did, vm = %vm_id, "not an authentication method");
            return false;
        }
        match vm.public_key() {
            Ok(key) => key.verify(message, &sign_info.signature),
            Err(e) => {
                tracing::debug!(did = self.did, vm = %vm_id, error = %e, "unusable public key");
                false
            }
        }
    }
}

/// Verify that each signer in `signers` has produced at least one valid
/// signature over `message`. Signers are checked in order and the first
/// failure is returned.
///
/// # Errors
///
/// * [`Error::SignatureMissing`] if a signer has no signature at all.
/// * [`Error::ControllerNotFound`] if a signer's document cannot be resolved.
/// * [`Error::InvalidSignature`] if none of a signer's signatures verify.
pub fn verify_signers<S: Store>(
    resolver: &Resolver<'_, S>, signers: &SignerSet, message: &[u8], signatures: &[SignInfo],
) -> crate::Result<()> {
    for required in signers {
        verify_signer(resolver, required, message, signatures)?;
    }
    Ok(())
}

fn verify_signer<S: Store>(
    resolver: &Resolver<'_, S>, required: &RequiredSigner, message: &[u8], signatures: &[SignInfo],
) -> crate::Result<()> {
    let name = resolver.describe(&required.did, required.revision);

    let candidates = signatures
        .iter()
        .filter(|s| s.did().as_deref() == Some(required.did.as_str()))
        .collect::<Vec<_>>();
    if candidates.is_empty() {
        tracerr!(Error::SignatureMissing, "{name}: signature is required");
    }

    let Some(document) = resolver.resolve(&required.did, required.revision)? else {
        tracerr!(Error::ControllerNotFound, "{name}: signer document not found");
    };
    let signer = Signer {
        did: &required.did,
        revision: required.revision,
        document: document.as_ref(),
    };

    if candidates.iter().any(|sign_info| signer.verify(message, sign_info)) {
        tracing::debug!(signer = %name, "signature verified");
        return Ok(());
    }
    tracerr!(Error::InvalidSignature, "{name}: no valid signature");
}
