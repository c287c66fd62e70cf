use forecourt_client::engine::Decision;
use forecourt_client::error::EngineError;
use forecourt_client::store::{ListingStore, RequestStore};
use forecourt_common::listing::{ListingDraft, ListingId, ListingPatch};
use forecourt_common::request::{RequestAction, RequestStatus};

use market_integration::harness::MarketHarness;

/// A buy submission snapshots the listing's fields as they are at that
/// moment and starts out pending.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn buy_request_snapshots_the_listing() {
    let h = MarketHarness::setup().await;
    let car = h.seed_listing("Sedan", 500_000, "sedan.jpg").await;

    let request_id = h
        .engine
        .submit_buy_request(&h.arun.session, &car)
        .await
        .unwrap();

    let request = RequestStore::get(&*h.store, &request_id).await.unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.action, RequestAction::Buy);
    assert_eq!(request.user_email, "arun@x.com");
    assert_eq!(request.car_id, Some(car));
    assert_eq!(request.car_name, "Sedan");
    assert_eq!(request.price, 500_000);
    assert_eq!(request.image_url, "sedan.jpg");
    assert!(request.car_reference_consistent());
}

/// The snapshot is not live-linked: editing and even deleting the listing
/// afterwards leaves the request's copy untouched.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn buy_snapshot_survives_listing_edit_and_delete() {
    let h = MarketHarness::setup().await;
    let car = h.seed_listing("Sedan", 500_000, "sedan.jpg").await;

    let request_id = h
        .engine
        .submit_buy_request(&h.arun.session, &car)
        .await
        .unwrap();

    h.engine
        .update_listing(
            &h.priya.session,
            &car,
            ListingPatch {
                price: Some(450_000),
                ..ListingPatch::default()
            },
        )
        .await
        .unwrap();
    h.engine.remove_listing(&h.priya.session, &car).await.unwrap();

    let request = RequestStore::get(&*h.store, &request_id).await.unwrap();
    assert_eq!(request.price, 500_000);
    assert_eq!(request.car_name, "Sedan");
}

/// Accepting a sell request mints exactly one listing, under the request's
/// own id, owned by the requester.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn accepting_a_sell_promotes_it_into_a_listing() {
    let h = MarketHarness::setup().await;

    let request_id = h
        .engine
        .submit_sell_request(
            &h.bella.session,
            ListingDraft::new("Hatch", 300_000, "img.jpg"),
        )
        .await
        .unwrap();

    let outcome = h
        .engine
        .decide(&h.priya.session, &request_id, Decision::Accept)
        .await
        .unwrap();
    assert_eq!(outcome.status, RequestStatus::Accepted);

    let listing = ListingStore::get(&*h.store, &ListingId(request_id.0.clone()))
        .await
        .unwrap();
    assert_eq!(listing.name, "Hatch");
    assert_eq!(listing.price, 300_000);
    assert_eq!(listing.image_url, "img.jpg");
    assert_eq!(listing.owner_email.as_deref(), Some("bella@x.com"));
    assert_eq!(outcome.new_listing, Some(listing));

    let request = RequestStore::get(&*h.store, &request_id).await.unwrap();
    assert_eq!(request.status, RequestStatus::Accepted);
    assert_eq!(ListingStore::list_all(&*h.store).await.unwrap().len(), 1);
}

/// Decisions are not idempotent: the second accept is a conflict and mints
/// nothing.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn accepting_a_sell_twice_is_a_conflict_and_creates_nothing() {
    let h = MarketHarness::setup().await;

    let request_id = h
        .engine
        .submit_sell_request(
            &h.bella.session,
            ListingDraft::new("Hatch", 300_000, "img.jpg"),
        )
        .await
        .unwrap();

    h.engine
        .decide(&h.priya.session, &request_id, Decision::Accept)
        .await
        .unwrap();
    let err = h
        .engine
        .decide(&h.priya.session, &request_id, Decision::Accept)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::AlreadyDecided {
            status: RequestStatus::Accepted,
            ..
        }
    ));
    assert_eq!(ListingStore::list_all(&*h.store).await.unwrap().len(), 1);
}

/// Rejection is a pure status write for either action.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rejecting_touches_no_listing() {
    let h = MarketHarness::setup().await;
    let car = h.seed_listing("Sedan", 500_000, "").await;

    let buy = h
        .engine
        .submit_buy_request(&h.arun.session, &car)
        .await
        .unwrap();
    let sell = h
        .engine
        .submit_sell_request(&h.bella.session, ListingDraft::new("Hatch", 300_000, ""))
        .await
        .unwrap();

    h.engine
        .decide(&h.priya.session, &buy, Decision::Reject)
        .await
        .unwrap();
    h.engine
        .decide(&h.priya.session, &sell, Decision::Reject)
        .await
        .unwrap();

    assert_eq!(
        RequestStore::get(&*h.store, &buy).await.unwrap().status,
        RequestStatus::Rejected
    );
    assert_eq!(
        RequestStore::get(&*h.store, &sell).await.unwrap().status,
        RequestStatus::Rejected
    );
    // Only the seeded car exists; the rejected sell minted nothing.
    let listings = ListingStore::list_all(&*h.store).await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id, car);
}

/// Accepting a buy is informational: the listing is not mutated.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn accepting_a_buy_leaves_the_listing_untouched() {
    let h = MarketHarness::setup().await;
    let car = h.seed_listing("Sedan", 500_000, "sedan.jpg").await;
    let before = ListingStore::get(&*h.store, &car).await.unwrap();

    let request_id = h
        .engine
        .submit_buy_request(&h.arun.session, &car)
        .await
        .unwrap();
    let outcome = h
        .engine
        .decide(&h.priya.session, &request_id, Decision::Accept)
        .await
        .unwrap();

    assert_eq!(outcome.status, RequestStatus::Accepted);
    assert_eq!(outcome.new_listing, None);
    assert_eq!(ListingStore::get(&*h.store, &car).await.unwrap(), before);
}

/// A failed submission leaves prior state unchanged and the user free to
/// resubmit once the store recovers.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_submission_leaves_prior_state_unchanged() {
    let h = MarketHarness::setup().await;
    let car = h.seed_listing("Sedan", 500_000, "").await;

    h.store.fail_request_writes(true);
    let err = h
        .engine
        .submit_buy_request(&h.arun.session, &car)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Store(_)));
    assert!(RequestStore::list_all(&*h.store).await.unwrap().is_empty());

    h.store.fail_request_writes(false);
    assert!(h
        .engine
        .submit_buy_request(&h.arun.session, &car)
        .await
        .is_ok());
}
