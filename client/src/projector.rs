//! Live projections over the two collection subscriptions.
//!
//! Each projector owns a background task that waits on the collections'
//! watch channels and recomputes its whole projection on every change
//! notification. There is no incremental diffing: recomputation is cheap,
//! idempotent, and safe to run on any interleaving of the two feeds. The two
//! collections carry no cross-ordering guarantee, so a recompute may briefly
//! see a buy request whose listing has not arrived yet; the projection math
//! resolves that to the placeholder image rather than failing.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use forecourt_common::listing::Listing;
use forecourt_common::overview::{AdminOverview, UserRequestView};
use forecourt_common::request::PurchaseRequest;

/// Keeps the admin dashboard aggregate current.
pub struct OverviewProjector {
    rx: watch::Receiver<AdminOverview>,
    task: JoinHandle<()>,
}

impl OverviewProjector {
    /// Start projecting from the given collection subscriptions. Must be
    /// called from within a tokio runtime.
    pub fn spawn(
        listings: watch::Receiver<Vec<Listing>>,
        requests: watch::Receiver<Vec<PurchaseRequest>>,
    ) -> Self {
        let initial = AdminOverview::project(&listings.borrow(), &requests.borrow());
        let (tx, rx) = watch::channel(initial);
        let task = tokio::spawn(run_overview(listings, requests, tx));
        OverviewProjector { rx, task }
    }

    /// The projection output feed. The receiver always holds the latest
    /// overview.
    pub fn subscribe(&self) -> watch::Receiver<AdminOverview> {
        self.rx.clone()
    }
}

impl Drop for OverviewProjector {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_overview(
    mut listings: watch::Receiver<Vec<Listing>>,
    mut requests: watch::Receiver<Vec<PurchaseRequest>>,
    tx: watch::Sender<AdminOverview>,
) {
    loop {
        tokio::select! {
            changed = listings.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            changed = requests.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        // borrow_and_update on both coalesces a burst of notifications into
        // one recompute.
        let listing_snapshot = listings.borrow_and_update().clone();
        let request_snapshot = requests.borrow_and_update().clone();
        let overview = AdminOverview::project(&listing_snapshot, &request_snapshot);
        debug!(
            total_cars = overview.total_cars,
            cars_sold = overview.cars_sold,
            cars_bought = overview.cars_bought,
            "admin overview recomputed"
        );
        if tx.send(overview).is_err() {
            break;
        }
    }
}

/// Keeps one user's per-listing request standing current.
pub struct UserViewProjector {
    rx: watch::Receiver<UserRequestView>,
    task: JoinHandle<()>,
}

impl UserViewProjector {
    /// Start projecting the given user's view from the request-collection
    /// subscription. Must be called from within a tokio runtime.
    pub fn spawn(
        user_email: impl Into<String>,
        requests: watch::Receiver<Vec<PurchaseRequest>>,
    ) -> Self {
        let user_email = user_email.into();
        let initial = UserRequestView::project(&user_email, &requests.borrow());
        let (tx, rx) = watch::channel(initial);
        let task = tokio::spawn(run_user_view(user_email, requests, tx));
        UserViewProjector { rx, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<UserRequestView> {
        self.rx.clone()
    }
}

impl Drop for UserViewProjector {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_user_view(
    user_email: String,
    mut requests: watch::Receiver<Vec<PurchaseRequest>>,
    tx: watch::Sender<UserRequestView>,
) {
    while requests.changed().await.is_ok() {
        let snapshot = requests.borrow_and_update().clone();
        let view = UserRequestView::project(&user_email, &snapshot);
        debug!(user = %user_email, "user request view recomputed");
        if tx.send(view).is_err() {
            break;
        }
    }
}
