//! # Services

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::OneMany;
use crate::error::Error;
use crate::url::{DidUrl, Part};

/// Services are used to express ways of communicating with the DID subject or
/// associated entities.
///
/// They can be any type of service the DID subject wants to advertise,
/// including decentralized identity management services for further
/// discovery, authentication, authorization, or interaction.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// A DID URL, with fragment, unique to the service within the document.
    pub id: String,

    /// The service type. SHOULD be registered in the DID Specification
    /// Registries.
    #[serde(rename = "type")]
    pub type_: String,

    /// One or more endpoints for the service.
    pub service_endpoint: OneMany<String>,
}

impl Service {
    /// A service with a single endpoint.
    #[must_use]
    pub fn new(
        id: impl Into<String>, type_: impl Into<String>, endpoint: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            type_: type_.into(),
            service_endpoint: OneMany::One(endpoint.into()),
        }
    }

    /// Validate the service as a member of the document `base_did`.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a fragment DID URL under `base_did`,
    /// the type is empty or longer than 255 characters, or there is no
    /// non-empty endpoint.
    pub fn validate(
        &self, base_did: &str, method: &str, namespaces: &[String],
    ) -> crate::Result<()> {
        let url = DidUrl::from_str(&self.id)?;
        url.validate(method, namespaces, Part::Empty, Part::Empty, Part::Required)?;
        if url.did != base_did {
            return Err(Error::StructuralValidation(format!(
                "service {}: id must have prefix {base_did}",
                self.id
            )));
        }

        if self.type_.is_empty() || self.type_.chars().count() > 255 {
            return Err(Error::StructuralValidation(format!(
                "service {}: type must be between 1 and 255 characters",
                self.id
            )));
        }

        if self.service_endpoint.is_empty() || self.service_endpoint.iter().any(String::is_empty) {
            return Err(Error::StructuralValidation(format!(
                "service {}: serviceEndpoint must not be empty",
                self.id
            )));
        }

        Ok(())
    }
}
