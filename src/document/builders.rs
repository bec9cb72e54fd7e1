//! # Document Builder
//!
//! Helpers for assembling a DID document, typically on the client side before
//! a create or update payload is signed.

use super::{Document, Service, VerificationMethod};

/// A builder for creating a DID Document.
#[derive(Default)]
pub struct DocumentBuilder {
    // Document under construction
    doc: Document,
}

impl DocumentBuilder {
    /// Creates a new `DocumentBuilder` for the given DID.
    #[must_use]
    pub fn new(did: &str) -> Self {
        let doc = Document {
            id: did.to_string(),
            ..Document::default()
        };
        Self { doc }
    }

    /// Start from an existing document, for example to prepare an update.
    #[must_use]
    pub const fn from_document(doc: Document) -> Self {
        Self { doc }
    }

    /// Add a JSON-LD context.
    #[must_use]
    pub fn context(mut self, context: &str) -> Self {
        self.doc.context.push(context.to_string());
        self
    }

    /// Add an also-known-as identifier.
    #[must_use]
    pub fn also_known_as(mut self, aka: &str) -> Self {
        self.doc.also_known_as.push(aka.to_string());
        self
    }

    /// Add a controller.
    ///
    /// Chain to add multiple controllers.
    #[must_use]
    pub fn controller(mut self, controller: &str) -> Self {
        self.doc.controller.push(controller.to_string());
        self
    }

    /// Add a verification method.
    ///
    /// Chain to add multiple verification methods.
    #[must_use]
    pub fn verification_method(mut self, vm: VerificationMethod) -> Self {
        self.doc.verification_method.push(vm);
        self
    }

    /// Replace the verification method with the same id, or add it if no such
    /// method exists.
    #[must_use]
    pub fn replace_verification_method(mut self, vm: VerificationMethod) -> Self {
        match self.doc.verification_method.iter_mut().find(|v| v.id == vm.id) {
            Some(existing) => *existing = vm,
            None => self.doc.verification_method.push(vm),
        }
        self
    }

    /// Remove the verification method `id`, and any relationship entries
    /// referencing it.
    #[must_use]
    pub fn remove_verification_method(mut self, id: &str) -> Self {
        self.doc.verification_method.retain(|vm| vm.id != id);
        let doc_id = self.doc.id.clone();
        let keep = |r: &String| r != id && format!("{doc_id}{r}") != id;
        self.doc.authentication.retain(keep);
        self.doc.assertion_method.retain(keep);
        self.doc.capability_invocation.retain(keep);
        self.doc.capability_delegation.retain(keep);
        self.doc.key_agreement.retain(keep);
        self
    }

    /// Add a verification relationship.
    ///
    /// Pass the ID of the verification method to associate with the
    /// relationship.
    ///
    /// Chain to add multiple relationships.
    #[must_use]
    pub fn relationship(mut self, relationship: VerificationRelationship, vm_id: &str) -> Self {
        let references = match relationship {
            VerificationRelationship::Authentication => &mut self.doc.authentication,
            VerificationRelationship::AssertionMethod => &mut self.doc.assertion_method,
            VerificationRelationship::CapabilityInvocation => &mut self.doc.capability_invocation,
            VerificationRelationship::CapabilityDelegation => &mut self.doc.capability_delegation,
            VerificationRelationship::KeyAgreement => &mut self.doc.key_agreement,
        };
        references.push(vm_id.to_string());
        self
    }

    /// Shorthand for an `authentication` relationship.
    #[must_use]
    pub fn authentication(self, vm_id: &str) -> Self {
        self.relationship(VerificationRelationship::Authentication, vm_id)
    }

    /// Add a service endpoint.
    ///
    /// Chain to add multiple service endpoints.
    #[must_use]
    pub fn service(mut self, service: Service) -> Self {
        self.doc.service.push(service);
        self
    }

    /// Build the DID Document.
    #[must_use]
    pub fn build(self) -> Document {
        self.doc
    }
}

/// Verification relationships a method can be referenced from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerificationRelationship {
    /// `authentication`
    Authentication,

    /// `assertionMethod`
    AssertionMethod,

    /// `capabilityInvocation`
    CapabilityInvocation,

    /// `capabilityDelegation`
    CapabilityDelegation,

    /// `keyAgreement`
    KeyAgreement,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DID: &str = "did:cheqd:testnet:zABCDEFG12345678";
    const MULTIBASE: &str = "z6MkmM42vxfqZQsv4ehtTjFFxQ4sQKS2w6WR7emozFAn5cxu";

    #[test]
    fn rotate_and_remove() {
        let other = "did:cheqd:testnet:zZZZZZZZ12345678";
        let key_1 = format!("{DID}#key-1");
        let doc = DocumentBuilder::new(DID)
            .verification_method(VerificationMethod::ed25519_2020(&key_1, DID, MULTIBASE))
            .authentication(&key_1)
            .relationship(VerificationRelationship::AssertionMethod, "#key-1")
            .build();

        let rotated = DocumentBuilder::from_document(doc.clone())
            .replace_verification_method(VerificationMethod::ed25519_2020(&key_1, other, MULTIBASE))
            .build();
        assert_eq!(rotated.verification_method.len(), 1);
        assert_eq!(rotated.verification_method[0].controller, other);

        let removed =
            DocumentBuilder::from_document(doc).remove_verification_method(&key_1).build();
        assert!(removed.verification_method.is_empty());
        assert!(removed.authentication.is_empty());
        assert!(removed.assertion_method.is_empty());
    }
}
