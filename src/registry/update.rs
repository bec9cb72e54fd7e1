use tracing::instrument;

use super::{rejected, Registry};
use crate::diff::update_signers;
use crate::error::Error;
use crate::message::{normalize_signatures, validate_signatures, MsgUpdateDid, SignedPayload};
use crate::provider::{Canonicalizer, Store};
use crate::resolve::Resolver;
use crate::state::{StateValue, TxContext};
use crate::tracerr;
use crate::verify::verify_signers;

impl<S: Store, C: Canonicalizer> Registry<S, C> {
    /// Replace a DID document with a new revision.
    ///
    /// The payload must carry the current revision's version id. Controllers
    /// of both revisions sign, as do the controllers of every verification
    /// method that is added, removed or modified. When a document's own keys
    /// change, it signs with its old and its new keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not exist or is deactivated, the
    /// version id is stale, the new revision fails validation, or a required
    /// signer has not signed.
    #[instrument(level = "debug", skip_all, fields(did = %msg.payload.document.id))]
    pub fn update_document(&mut self, ctx: &TxContext, msg: MsgUpdateDid) -> crate::Result<()> {
        let payload = msg.payload.normalize();
        let signatures = normalize_signatures(msg.signatures);
        let id = payload.document.id.clone();
        let namespaces = self.namespaces()?;

        let Some(existing) = self.state.get_state(&id)? else {
            tracerr!(Error::NotFound, "{id}: document not found");
        };
        if existing.metadata.deactivated {
            tracerr!(Error::AlreadyDeactivated, "{id}: document is deactivated");
        }

        let doc = payload.to_document();
        doc.validate(&self.config.method, &namespaces).inspect_err(rejected)?;
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

        let (old_doc, old_metadata) = existing.into_parts();

        let resolver = Resolver::new(&self.state).with_pending(doc.clone());
        resolver.ensure_controllers_exist(&doc)?;
        let signers = update_signers(&old_doc, &doc);
        tracing::debug!(?signers, "required signers");
        let message = payload.sign_bytes(&self.canonicalizer)?;
        verify_signers(&resolver, &signers, &message, &signatures)?;

        let metadata = old_metadata.next(ctx);
        let version_id = metadata.version_id.clone();
        self.state.add_revision(&StateValue::new(doc, metadata))?;

        tracing::info!(did = %id, version = %version_id, "document updated");
        Ok(())
    }
}
