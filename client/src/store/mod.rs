//! Adapter contracts over the document-oriented persistence service.
//!
//! The core depends only on these traits, never on a concrete product. Two
//! collections exist: `cars` and `purchaseRequests`. Every operation is an
//! async remote call that may fail with [`StoreError::Transport`]; there is
//! no transactional guarantee across operations, and change notifications
//! are ordered within a collection but not across the two.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use tokio::sync::watch;

use forecourt_common::listing::{Listing, ListingDraft, ListingId, ListingPatch};
use forecourt_common::request::{PurchaseRequest, RequestDraft, RequestId, RequestStatus};

use crate::error::StoreError;

/// Collection names as the persistence service knows them.
pub const CARS: &str = "cars";
pub const PURCHASE_REQUESTS: &str = "purchaseRequests";

/// The `cars` collection.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Listing>, StoreError>;

    async fn get(&self, id: &ListingId) -> Result<Listing, StoreError>;

    /// Create with a server-assigned id.
    async fn create(&self, draft: ListingDraft) -> Result<ListingId, StoreError>;

    /// Set with an explicit id (upsert).
    async fn put(&self, listing: Listing) -> Result<(), StoreError>;

    /// Partial-field update of an existing listing.
    async fn update(&self, id: &ListingId, patch: ListingPatch) -> Result<(), StoreError>;

    /// Immediate, irreversible delete.
    async fn delete(&self, id: &ListingId) -> Result<(), StoreError>;

    /// Subscribe to collection changes. The receiver holds the current full
    /// snapshot and is refreshed on every change.
    fn watch(&self) -> watch::Receiver<Vec<Listing>>;
}

/// The `purchaseRequests` collection.
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<PurchaseRequest>, StoreError>;

    async fn get(&self, id: &RequestId) -> Result<PurchaseRequest, StoreError>;

    /// The requests belonging to one user (`userEmail ==` query).
    async fn list_for_user(&self, email: &str) -> Result<Vec<PurchaseRequest>, StoreError>;

    /// Create with a server-assigned id.
    async fn create(&self, draft: RequestDraft) -> Result<RequestId, StoreError>;

    /// Single-field status write. The store does not guard transitions;
    /// that is the engine's job.
    async fn update_status(&self, id: &RequestId, status: RequestStatus)
        -> Result<(), StoreError>;

    /// Subscribe to collection changes, snapshot-per-change.
    fn watch(&self) -> watch::Receiver<Vec<PurchaseRequest>>;
}
