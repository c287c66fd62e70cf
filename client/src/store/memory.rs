use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use forecourt_common::listing::{Listing, ListingDraft, ListingId, ListingPatch};
use forecourt_common::request::{PurchaseRequest, RequestDraft, RequestId, RequestStatus};

use crate::error::StoreError;
use crate::store::{ListingStore, RequestStore, CARS, PURCHASE_REQUESTS};

/// In-process document store backing tests and local development.
///
/// One map per collection; every mutation publishes the full collection
/// snapshot to the collection's watch channel while the write lock is held,
/// so notifications keep the store's per-collection ordering. Writes can be
/// made to fail on demand to exercise transport-failure paths.
#[derive(Debug)]
pub struct MemoryStore {
    cars: RwLock<BTreeMap<ListingId, Listing>>,
    requests: RwLock<BTreeMap<RequestId, PurchaseRequest>>,
    next_car_id: AtomicU64,
    next_request_id: AtomicU64,
    cars_tx: watch::Sender<Vec<Listing>>,
    requests_tx: watch::Sender<Vec<PurchaseRequest>>,
    fail_listing_writes: AtomicBool,
    fail_request_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (cars_tx, _) = watch::channel(Vec::new());
        let (requests_tx, _) = watch::channel(Vec::new());
        MemoryStore {
            cars: RwLock::new(BTreeMap::new()),
            requests: RwLock::new(BTreeMap::new()),
            next_car_id: AtomicU64::new(1),
            next_request_id: AtomicU64::new(1),
            cars_tx,
            requests_tx,
            fail_listing_writes: AtomicBool::new(false),
            fail_request_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `cars` write fail with a transport error.
    pub fn fail_listing_writes(&self, fail: bool) {
        self.fail_listing_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `purchaseRequests` write fail with a transport
    /// error.
    pub fn fail_request_writes(&self, fail: bool) {
        self.fail_request_writes.store(fail, Ordering::SeqCst);
    }

    fn check_listing_write(&self) -> Result<(), StoreError> {
        if self.fail_listing_writes.load(Ordering::SeqCst) {
            Err(StoreError::Transport("cars write refused".into()))
        } else {
            Ok(())
        }
    }

    fn check_request_write(&self) -> Result<(), StoreError> {
        if self.fail_request_writes.load(Ordering::SeqCst) {
            Err(StoreError::Transport("purchaseRequests write refused".into()))
        } else {
            Ok(())
        }
    }

    fn publish_cars(&self, cars: &BTreeMap<ListingId, Listing>) {
        self.cars_tx.send_replace(cars.values().cloned().collect());
    }

    fn publish_requests(&self, requests: &BTreeMap<RequestId, PurchaseRequest>) {
        self.requests_tx
            .send_replace(requests.values().cloned().collect());
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Listing>, StoreError> {
        Ok(self.cars.read().await.values().cloned().collect())
    }

    async fn get(&self, id: &ListingId) -> Result<Listing, StoreError> {
        self.cars
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                collection: CARS,
                id: id.0.clone(),
            })
    }

    async fn create(&self, draft: ListingDraft) -> Result<ListingId, StoreError> {
        self.check_listing_write()?;
        let id = ListingId(format!(
            "car-{}",
            self.next_car_id.fetch_add(1, Ordering::SeqCst)
        ));
        let mut cars = self.cars.write().await;
        cars.insert(id.clone(), draft.into_listing(id.clone()));
        self.publish_cars(&cars);
        debug!(id = %id.0, "listing created");
        Ok(id)
    }

    async fn put(&self, listing: Listing) -> Result<(), StoreError> {
        self.check_listing_write()?;
        let mut cars = self.cars.write().await;
        cars.insert(listing.id.clone(), listing);
        self.publish_cars(&cars);
        Ok(())
    }

    async fn update(&self, id: &ListingId, patch: ListingPatch) -> Result<(), StoreError> {
        self.check_listing_write()?;
        let mut cars = self.cars.write().await;
        let listing = cars.get_mut(id).ok_or_else(|| StoreError::NotFound {
            collection: CARS,
            id: id.0.clone(),
        })?;
        patch.apply_to(listing);
        self.publish_cars(&cars);
        Ok(())
    }

    async fn delete(&self, id: &ListingId) -> Result<(), StoreError> {
        self.check_listing_write()?;
        let mut cars = self.cars.write().await;
        if cars.remove(id).is_none() {
            return Err(StoreError::NotFound {
                collection: CARS,
                id: id.0.clone(),
            });
        }
        self.publish_cars(&cars);
        Ok(())
    }

    fn watch(&self) -> watch::Receiver<Vec<Listing>> {
        self.cars_tx.subscribe()
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<PurchaseRequest>, StoreError> {
        Ok(self.requests.read().await.values().cloned().collect())
    }

    async fn get(&self, id: &RequestId) -> Result<PurchaseRequest, StoreError> {
        self.requests
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                collection: PURCHASE_REQUESTS,
                id: id.0.clone(),
            })
    }

    async fn list_for_user(&self, email: &str) -> Result<Vec<PurchaseRequest>, StoreError> {
        Ok(self
            .requests
            .read()
            .await
            .values()
            .filter(|r| r.user_email == email)
            .cloned()
            .collect())
    }

    async fn create(&self, draft: RequestDraft) -> Result<RequestId, StoreError> {
        self.check_request_write()?;
        let id = RequestId(format!(
            "req-{}",
            self.next_request_id.fetch_add(1, Ordering::SeqCst)
        ));
        let mut requests = self.requests.write().await;
        requests.insert(id.clone(), draft.into_request(id.clone()));
        self.publish_requests(&requests);
        debug!(id = %id.0, "purchase request created");
        Ok(id)
    }

    async fn update_status(
        &self,
        id: &RequestId,
        status: RequestStatus,
    ) -> Result<(), StoreError> {
        self.check_request_write()?;
        let mut requests = self.requests.write().await;
        let request = requests.get_mut(id).ok_or_else(|| StoreError::NotFound {
            collection: PURCHASE_REQUESTS,
            id: id.0.clone(),
        })?;
        request.status = status;
        self.publish_requests(&requests);
        Ok(())
    }

    fn watch(&self) -> watch::Receiver<Vec<PurchaseRequest>> {
        self.requests_tx.subscribe()
    }
}
