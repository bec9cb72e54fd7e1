//! # DID Document
//!
//! A DID Document is a JSON-LD document that contains information related to a
//! DID. This module holds the document model stored by the registry and the
//! structural rules a document must satisfy before it is accepted.

mod builders;
mod service;
mod verification;

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use self::builders::*;
pub use self::service::*;
pub use self::verification::*;
use crate::did::{normalize_did, validate_did};
use crate::error::Error;
use crate::url::{normalize_did_url, DidUrl, Part};

/// DID Document
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// The JSON-LD context of the DID document.
    #[serde(rename = "@context", default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,

    /// The DID for a particular DID subject.
    ///
    /// The subject is defined as the entity identified by the DID and described
    /// by the DID document. Anything can be a DID subject: person, group,
    /// organization, physical thing, digital thing, logical thing, etc.
    pub id: String,

    /// DIDs permitted to co-author changes to this document as a whole.
    ///
    /// When empty, the DID subject itself is the controller.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controller: Vec<String>,

    /// Verification methods, such as public keys, declared for the subject.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verification_method: Vec<VerificationMethod>,

    /// The `authentication` verification relationship is used to specify how
    /// the DID subject is expected to be authenticated. The registry only
    /// accepts signatures by keys listed here.
    ///
    /// <https://www.w3.org/TR/did-core/#authentication>
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<String>,

    /// The `assertion_method` verification relationship is used to specify how
    /// the DID subject is expected to express claims, such as for the
    /// purposes of issuing a Verifiable Credential.
    ///
    /// <https://www.w3.org/TR/did-core/#assertion>
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertion_method: Vec<String>,

    /// The `capability_invocation` verification relationship is used to specify
    /// a verification method that might be used by the DID subject to
    /// invoke a cryptographic capability.
    ///
    /// <https://www.w3.org/TR/did-core/#capability-invocation>
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capability_invocation: Vec<String>,

    /// The `capability_delegation` verification relationship is used to specify
    /// a mechanism that might be used by the DID subject to delegate a
    /// cryptographic capability to another party.
    ///
    /// <https://www.w3.org/TR/did-core/#capability-delegation>
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capability_delegation: Vec<String>,

    /// The `key_agreement` verification relationship is used to specify how an
    /// entity can generate encryption material in order to transmit
    /// confidential information intended for the DID subject.
    ///
    /// <https://www.w3.org/TR/did-core/#key-agreement>
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_agreement: Vec<String>,

    /// A set of services, that express ways of communicating with the DID
    /// subject or related entities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<Service>,

    /// A set of URIs that are other identifiers for the subject of the above
    /// DID.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub also_known_as: Vec<String>,
}

impl Document {
    /// Check the document against the registry's structural rules.
    ///
    /// # Errors
    ///
    /// Identifier grammar failures are returned with their own kind
    /// ([`Error::MalformedDid`], [`Error::MalformedDidUrl`],
    /// [`Error::NamespaceNotAllowed`]). All other rule violations are
    /// [`Error::StructuralValidation`].
    pub fn validate(&self, method: &str, namespaces: &[String]) -> crate::Result<()> {
        validate_did(&self.id, method, namespaces)?;

        for controller in &self.controller {
            validate_did(controller, method, namespaces)?;
        }
        unique("controller", self.controller.iter().map(String::as_str))?;

        for vm in &self.verification_method {
            vm.validate(&self.id, method, namespaces)?;
        }
        let vm_ids = self.verification_method.iter().map(|vm| vm.id.as_str());
        unique("verificationMethod ids", vm_ids)?;

        let declared =
            self.verification_method.iter().map(|vm| vm.id.as_str()).collect::<HashSet<_>>();
        for (name, references) in self.relationships() {
            for reference in references {
                let resolved = self.resolve_reference(reference);
                let url = DidUrl::from_str(&resolved)?;
                url.validate(method, namespaces, Part::Empty, Part::Empty, Part::Required)?;
                if url.did != self.id {
                    return Err(Error::StructuralValidation(format!(
                        "{name}: {reference} must reference a method of {}",
                        self.id
                    )));
                }
                if !reference.starts_with('#') && !declared.contains(resolved.as_str()) {
                    return Err(Error::StructuralValidation(format!(
                        "{name}: {reference} is not a declared verification method"
                    )));
                }
            }
            unique(name, references.iter().map(|r| self.resolve_reference(r)))?;
        }

        for service in &self.service {
            service.validate(&self.id, method, namespaces)?;
        }
        unique("service ids", self.service.iter().map(|s| s.id.as_str()))?;

        for aka in &self.also_known_as {
            ::url::Url::parse(aka).map_err(|e| {
                Error::StructuralValidation(format!("alsoKnownAs: {aka} is not a URI: {e}"))
            })?;
        }
        unique("alsoKnownAs", self.also_known_as.iter().map(String::as_str))?;

        if self.controller.is_empty() && self.authentication.is_empty() {
            return Err(Error::StructuralValidation(format!(
                "{}: one of controller or authentication must be set",
                self.id
            )));
        }

        Ok(())
    }

    /// Lower-case UUID unique ids wherever a DID appears in the document.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        self.id = normalize_did(&self.id);
        self.controller = self.controller.iter().map(|c| normalize_did(c)).collect();
        for vm in &mut self.verification_method {
            vm.id = normalize_did_url(&vm.id);
            vm.controller = normalize_did(&vm.controller);
        }
        for references in [
            &mut self.authentication,
            &mut self.assertion_method,
            &mut self.capability_invocation,
            &mut self.capability_delegation,
            &mut self.key_agreement,
        ] {
            *references = references.iter().map(|r| normalize_did_url(r)).collect();
        }
        for service in &mut self.service {
            service.id = normalize_did_url(&service.id);
        }
        self
    }

    /// The document's controllers, or the subject itself when no controller is
    /// declared.
    #[must_use]
    pub fn controllers_or_subject(&self) -> Vec<String> {
        if self.controller.is_empty() {
            vec![self.id.clone()]
        } else {
            self.controller.clone()
        }
    }

    /// Every DID named as a controller, of the document or of one of its
    /// verification methods. Sorted and duplicate-free.
    #[must_use]
    pub fn all_controller_dids(&self) -> Vec<String> {
        let mut dids = self.controller.clone();
        dids.extend(self.verification_method.iter().map(|vm| vm.controller.clone()));
        dids.sort();
        dids.dedup();
        dids
    }

    /// Expand a bare `#fragment` reference against the document id.
    #[must_use]
    pub fn resolve_reference(&self, reference: &str) -> String {
        if reference.starts_with('#') {
            format!("{}{reference}", self.id)
        } else {
            reference.to_string()
        }
    }

    /// Find a verification method by its full id.
    #[must_use]
    pub fn verification_method(&self, id: &str) -> Option<&VerificationMethod> {
        self.verification_method.iter().find(|vm| vm.id == id)
    }

    /// Returns `true` if the verification method `id` is listed, directly or
    /// as a bare fragment, in the `authentication` relationship.
    #[must_use]
    pub fn is_authentication_method(&self, id: &str) -> bool {
        self.authentication.iter().any(|r| self.resolve_reference(r) == id)
    }

    fn relationships(&self) -> [(&'static str, &Vec<String>); 5] {
        [
            ("authentication", &self.authentication),
            ("assertionMethod", &self.assertion_method),
            ("capabilityInvocation", &self.capability_invocation),
            ("capabilityDelegation", &self.capability_delegation),
            ("keyAgreement", &self.key_agreement),
        ]
    }
}

fn unique<T: AsRef<str>>(name: &str, values: impl Iterator<Item = T>) -> crate::Result<()> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value.as_ref().to_string()) {
            return Err(Error::StructuralValidation(format!(
                "{name} must be unique: {} is repeated",
                value.as_ref()
            )));
        }
    }
    Ok(())
}
