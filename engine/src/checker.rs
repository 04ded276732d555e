//! The proof-check engine boundary.

use crate::observer::ProgressObserver;
use crate::state::VerificationState;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use vouch_types::Proof;

/// Receives individual proof results as the engine checks them, and one
/// final completion call.
pub trait CompletionListener: Send + Sync {
    /// One proof finished checking, in whatever state it landed.
    fn proof_checked(&self, proof: &Proof);

    /// All proofs have been checked.
    fn check_done(&self);
}

/// Checks every declared proof on an identity against live external state.
///
/// Contract: for each claimed proof, implementations record the checked
/// result on `state` (`record_proof`) and then notify the listener, if one
/// was given. Once every proof is checked they call `state.finish()` and
/// then `listener.check_done()`. Per-proof failures never abort the run;
/// they land in the state and in the listener's stream.
pub trait ProofCheckEngine: Send + Sync {
    fn identify<'a>(
        &'a self,
        state: Arc<VerificationState>,
        force_recheck: bool,
        observer: Arc<dyn ProgressObserver>,
        listener: Option<Arc<dyn CompletionListener>>,
    ) -> BoxFuture<'a, ()>;
}
