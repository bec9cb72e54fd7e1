//! # Update Diff
//!
//! Compares two revisions of a document to find who must authorize the
//! change. Verification methods are matched by fragment.
//!
//! * Both revisions' controllers always sign, the old ones at the committed
//!   revision and the new ones at the pending revision.
//! * An added method's controller signs with the new revision's keys.
//! * A removed method's controller signs with the old revision's keys.
//! * A modified method's old and new controllers both sign.
//! * An unchanged method adds no signer.

use crate::document::{Document, VerificationMethod};
use crate::resolve::Revision;
use crate::signer::{controller_signers, RequiredSigner, SignerSet};

/// How a verification method differs between two revisions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change<'a> {
    /// Present only in the new revision.
    Added(&'a VerificationMethod),

    /// Present only in the old revision.
    Removed(&'a VerificationMethod),

    /// Present in both with a different type, controller, or key.
    Modified {
        /// Method in the old revision.
        old: &'a VerificationMethod,
        /// Method in the new revision.
        new: &'a VerificationMethod,
    },

    /// Present in both and identical.
    Unchanged(&'a VerificationMethod),
}

/// Pair up the verification methods of two revisions. Methods of the new
/// revision come first, in order, followed by removed methods.
#[must_use]
pub fn diff_verification_methods<'a>(old: &'a Document, new: &'a Document) -> Vec<Change<'a>> {
    let find = |doc: &'a Document, fragment: &str| {
        doc.verification_method.iter().find(|vm| vm.fragment() == fragment)
    };

    let mut changes = new
        .verification_method
        .iter()
        .map(|new_vm| match find(old, new_vm.fragment()) {
            None => Change::Added(new_vm),
            Some(old_vm) if is_modified(old_vm, new_vm) => Change::Modified {
                old: old_vm,
                new: new_vm,
            },
            Some(old_vm) => Change::Unchanged(old_vm),
        })
        .collect::<Vec<_>>();

    changes.extend(
        old.verification_method
            .iter()
            .filter(|old_vm| find(new, old_vm.fragment()).is_none())
            .map(Change::Removed),
    );
    changes
}

/// Signers required to replace `old` with `new`.
#[must_use]
pub fn update_signers(old: &Document, new: &Document) -> SignerSet {
    let mut signers = controller_signers(old, Revision::Committed);
    signers.extend(controller_signers(new, Revision::Pending));

    let committed = |vm: &VerificationMethod| {
        RequiredSigner::named_by(old, &vm.controller, Revision::Committed)
    };
    let pending =
        |vm: &VerificationMethod| RequiredSigner::named_by(new, &vm.controller, Revision::Pending);

    for change in diff_verification_methods(old, new) {
        match change {
            Change::Added(vm) => {
                signers.insert(pending(vm));
            }
            Change::Removed(vm) => {
                signers.insert(committed(vm));
            }
            Change::Modified { old: old_vm, new: new_vm } => {
                signers.insert(committed(old_vm));
                signers.insert(pending(new_vm));
            }
            Change::Unchanged(_) => {}
        }
    }
    signers
}

fn is_modified(old: &VerificationMethod, new: &VerificationMethod) -> bool {
    old.type_ != new.type_
        || old.controller != new.controller
        || old.public_key_multibase != new.public_key_multibase
        || old.public_key_jwk != new.public_key_jwk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentBuilder;

    const ALICE: &str = "did:cheqd:testnet:zAAAAAAA12345678";
    const BOB: &str = "did:cheqd:testnet:zBBBBBBB12345678";
    const CAROL: &str = "did:cheqd:testnet:zCCCCCCC12345678";
    const KEY_1: &str = "z6MkmM42vxfqZQsv4ehtTjFFxQ4sQKS2w6WR7emozFAn5cxu";
    const KEY_2: &str = "z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK";

    fn vm(fragment: &str, controller: &str, key: &str) -> VerificationMethod {
        VerificationMethod::ed25519_2020(format!("{ALICE}#{fragment}"), controller, key)
    }

    fn doc(controllers: &[&str], vms: Vec<VerificationMethod>) -> Document {
        let mut builder = DocumentBuilder::new(ALICE);
        for c in controllers {
            builder = builder.controller(c);
        }
        for vm in vms {
            builder = builder.verification_method(vm);
        }
        builder.build()
    }

    fn signer(did: &str, revision: Revision) -> RequiredSigner {
        RequiredSigner {
            did: did.to_string(),
            revision,
        }
    }

    #[test]
    fn unchanged_methods() {
        let old = doc(&[], vec![vm("key-1", BOB, KEY_1)]);
        let new = old.clone();

        let changes = diff_verification_methods(&old, &new);
        assert!(matches!(changes[..], [Change::Unchanged(_)]));

        // the subject signs at both revisions; BOB's unchanged method adds nothing
        let signers = update_signers(&old, &new).into_iter().collect::<Vec<_>>();
        assert_eq!(
            signers,
            vec![signer(ALICE, Revision::Committed), signer(ALICE, Revision::Pending)]
        );
    }

    #[test]
    fn rotated_key() {
        let old = doc(&[], vec![vm("key-1", ALICE, KEY_1)]);
        let new = doc(&[], vec![vm("key-1", ALICE, KEY_2)]);

        let changes = diff_verification_methods(&old, &new);
        assert!(matches!(changes[..], [Change::Modified { .. }]));

        let signers = update_signers(&old, &new).into_iter().collect::<Vec<_>>();
        assert_eq!(
            signers,
            vec![signer(ALICE, Revision::Committed), signer(ALICE, Revision::Pending)]
        );
    }

    #[test]
    fn added_and_removed() {
        let old = doc(&[ALICE], vec![vm("key-1", BOB, KEY_1)]);
        let new = doc(&[ALICE], vec![vm("key-2", CAROL, KEY_2)]);

        let changes = diff_verification_methods(&old, &new);
        assert_eq!(changes.len(), 2);
        assert!(matches!(changes[0], Change::Added(vm) if vm.controller == CAROL));
        assert!(matches!(changes[1], Change::Removed(vm) if vm.controller == BOB));

        let signers = update_signers(&old, &new).into_iter().collect::<Vec<_>>();
        assert_eq!(
            signers,
            vec![
                signer(ALICE, Revision::Committed),
                signer(ALICE, Revision::Pending),
                signer(BOB, Revision::Committed),
                signer(CAROL, Revision::Committed),
            ]
        );
    }

    #[test]
    fn changed_controller() {
        let old = doc(&[BOB], vec![vm("key-1", BOB, KEY_1)]);
        let new = doc(&[CAROL], vec![vm("key-1", CAROL, KEY_1)]);

        let signers = update_signers(&old, &new).into_iter().collect::<Vec<_>>();
        assert_eq!(
            signers,
            vec![signer(BOB, Revision::Committed), signer(CAROL, Revision::Committed)]
        );
    }
}
