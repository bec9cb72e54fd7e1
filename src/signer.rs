//! # Signer Resolution
//!
//! Works out which DIDs must sign an operation, and at which [`Revision`] each
//! signer's keys are taken from.

use std::collections::BTreeSet;

use crate::document::Document;
use crate::resolve::Revision;

/// A DID whose authentication keys must have signed the operation.
///
/// The same DID may be required at both revisions: when an update rotates a
/// document's keys, both the old and the new keys must sign.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequiredSigner {
    /// The signing DID.
    pub did: String,

    /// Layer the signer's document is resolved from.
    pub revision: Revision,
}

impl RequiredSigner {
    /// A signer named by `doc`. The document's own id takes the document's
    /// `revision`; any other DID is always committed.
    #[must_use]
    pub fn named_by(doc: &Document, did: &str, revision: Revision) -> Self {
        Self {
            did: did.to_string(),
            revision: if did == doc.id { revision } else { Revision::Committed },
        }
    }
}

/// Required signers in deterministic order, without duplicates.
pub type SignerSet = BTreeSet<RequiredSigner>;

/// The document's controllers, or its subject when it has none.
#[must_use]
pub fn controller_signers(doc: &Document, revision: Revision) -> SignerSet {
    doc.controllers_or_subject()
        .iter()
        .map(|did| RequiredSigner::named_by(doc, did, revision))
        .collect()
}

/// Signers required to create, or to deactivate, `doc`: its controllers (or
/// subject) plus the controller of each of its verification methods.
#[must_use]
pub fn document_signers(doc: &Document, revision: Revision) -> SignerSet {
    let mut signers = controller_signers(doc, revision);
    signers.extend(
        doc.verification_method
            .iter()
            .map(|vm| RequiredSigner::named_by(doc, &vm.controller, revision)),
    );
    signers
}
