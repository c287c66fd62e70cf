use std::sync::Arc;

use forecourt_client::engine::RequestEngine;
use forecourt_client::session::{login, StaticIdentity};
use forecourt_client::store::MemoryStore;
use forecourt_common::identity::{AdminDirectory, Session};
use forecourt_common::listing::{ListingDraft, ListingId};

pub const ADMIN_EMAIL: &str = "priya@forecourt.test";

/// A signed-in participant.
pub struct Participant {
    pub name: String,
    pub session: Session,
}

/// Top-level test fixture: one shared in-memory store, an engine over it,
/// and three signed-in participants. Priya is on the admin allow-list;
/// Arun and Bella are ordinary members.
pub struct MarketHarness {
    pub store: Arc<MemoryStore>,
    pub engine: RequestEngine<MemoryStore, MemoryStore>,
    pub priya: Participant,
    pub arun: Participant,
    pub bella: Participant,
}

impl MarketHarness {
    pub async fn setup() -> Self {
        tracing_subscriber::fmt::try_init().ok();

        let store = Arc::new(MemoryStore::new());
        let engine = RequestEngine::new(store.clone(), store.clone());

        let directory = AdminDirectory::new([ADMIN_EMAIL]);
        let priya = sign_in("Priya", ADMIN_EMAIL, &directory).await;
        let arun = sign_in("Arun", "arun@x.com", &directory).await;
        let bella = sign_in("Bella", "bella@x.com", &directory).await;

        MarketHarness {
            store,
            engine,
            priya,
            arun,
            bella,
        }
    }

    /// Admin-add a listing and return its id.
    pub async fn seed_listing(&self, name: &str, price: i64, image_url: &str) -> ListingId {
        self.engine
            .add_listing(
                &self.priya.session,
                ListingDraft::new(name, price, image_url),
            )
            .await
            .expect("seed listing")
    }
}

async fn sign_in(name: &str, email: &str, directory: &AdminDirectory) -> Participant {
    let provider = StaticIdentity::new(name, email);
    let session = login(&provider, directory)
        .await
        .expect("sign-in should succeed");
    Participant {
        name: name.to_string(),
        session,
    }
}
