use tracing::instrument;

use super::{rejected, Registry};
use crate::did::validate_did;
use crate::error::Error;
use crate::message::{normalize_signatures, validate_signatures, MsgDeactivateDid, SignedPayload};
use crate::provider::{Canonicalizer, Store};
use crate::resolve::{Resolver, Revision};
use crate::signer::document_signers;
use crate::state::{StateValue, TxContext};
use crate::tracerr;
use crate::verify::verify_signers;

impl<S: Store, C: Canonicalizer> Registry<S, C> {
    /// Permanently deactivate a DID document.
    ///
    /// The current revision's controllers and verification method controllers
    /// sign with their committed keys. The document is kept, marked
    /// deactivated, and can no longer be updated or deactivated.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not exist or is already
    /// deactivated, the version id is stale, or a required signer has not
    /// signed.
    #[instrument(level = "debug", skip_all, fields(did = %msg.payload.id))]
    pub fn deactivate_document(
        &mut self, ctx: &TxContext, msg: MsgDeactivateDid,
    ) -> crate::Result<()> {
        let payload = msg.payload.normalize();
        let signatures = normalize_signatures(msg.signatures);
        let id = payload.id.clone();
        let namespaces = self.namespaces()?;

        let Some(existing) = self.state.get_state(&id)? else {
            tracerr!(Error::NotFound, "{id}: document not found");
        };
        if existing.metadata.deactivated {
            tracerr!(Error::AlreadyDeactivated, "{id}: document is already deactivated");
        }

        validate_did(&id, &self.config.method, &namespaces).inspect_err(rejected)?;
        validate_signatures(&signatures, &self.config.method, &namespaces)
            .inspect_err(rejected)?;
        if payload.version_id != existing.metadata.version_id {
            tracerr!(
                Error::VersionConflict,
                "{id}: got: {}, must be: {}",
                payload.version_id,
                existing.metadata.version_id
            );
        }

        let resolver = Resolver::new(&self.state);
        let signers = document_signers(existing.document(), Revision::Committed);
        tracing::debug!(?signers, "required signers");
        let message = payload.sign_bytes(&self.canonicalizer)?;
        verify_signers(&resolver, &signers, &message, &signatures)?;

        let (doc, old_metadata) = existing.into_parts();
        let mut metadata = old_metadata.next(ctx);
        metadata.deactivated = true;
        self.state.add_revision(&StateValue::new(doc, metadata))?;

        tracing::info!(did = %id, "document deactivated");
        Ok(())
    }
}
