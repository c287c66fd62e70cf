use thiserror::Error;

use forecourt_common::listing::ValidationError;
use forecourt_common::request::{RequestId, RequestStatus};

/// Failures crossing the persistence boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote call failed or timed out. Not retried internally; the
    /// caller surfaces this as a retryable failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The referenced document is absent from its collection.
    #[error("no document {id} in {collection}")]
    NotFound { collection: &'static str, id: String },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Failures of the request lifecycle engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected before any remote call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The session's role does not permit the operation.
    #[error("operation requires the admin role")]
    Forbidden,

    /// The request already left `Pending`. Decisions are not idempotent; a
    /// second call is a conflict, never a duplicate side effect.
    #[error("request {} is already {status:?}", id.0)]
    AlreadyDecided { id: RequestId, status: RequestStatus },

    /// The accept-sell composite write partially failed: the request is
    /// marked accepted but its listing write did not land. Surfaced for
    /// reconciliation, not repaired at the failure site.
    #[error("request {} accepted but its listing write failed: {source}", id.0)]
    Inconsistent { id: RequestId, source: StoreError },
}
