use tracing::instrument;

use super::{rejected, Registry};
use crate::error::Error;
use crate::message::{normalize_signatures, validate_signatures, MsgCreateDid, SignedPayload};
use crate::provider::{Canonicalizer, Store};
use crate::resolve::{Resolver, Revision};
use crate::signer::document_signers;
use crate::state::{Metadata, StateValue, TxContext};
use crate::tracerr;
use crate::verify::verify_signers;

impl<S: Store, C: Canonicalizer> Registry<S, C> {
    /// Create a new DID document.
    ///
    /// The document's controllers (or the document itself when it has none)
    /// and the controller of each of its verification methods must sign. A
    /// document that controls itself signs with the keys it is introducing.
    ///
    /// Returns the id of the created document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists, fails validation, names an
    /// unknown controller, or is not signed by every required signer.
    #[instrument(level = "debug", skip_all, fields(did = %msg.payload.document.id))]
    pub fn create_document(&mut self, ctx: &TxContext, msg: MsgCreateDid) -> crate::Result<String> {
        let payload = msg.payload.normalize();
        let signatures = normalize_signatures(msg.signatures);
        let id = payload.document.id.clone();
        let namespaces = self.namespaces()?;

        if self.state.has_state(&id)? {
            tracerr!(Error::AlreadyExists, "{id}: document already exists");
        }

        let doc = payload.to_document();
        doc.validate(&self.config.method, &namespaces).inspect_err(rejected)?;
        validate_signatures(&signatures, &self.config.method, &namespaces)
            .inspect_err(rejected)?;

        let metadata = Metadata::new(ctx);

        let resolver = Resolver::new(&self.state).with_pending(doc.clone());
        resolver.ensure_controllers_exist(&doc)?;
        let signers = document_signers(&doc, Revision::Pending);
        tracing::debug!(?signers, "required signers");
        let message = payload.sign_bytes(&self.canonicalizer)?;
        verify_signers(&resolver, &signers, &message, &signatures)?;

        self.state.add_revision(&StateValue::new(doc, metadata))?;
        let count = self.state.increment_count()?;

        tracing::info!(did = %id, count, "document created");
        Ok(id)
    }
}
