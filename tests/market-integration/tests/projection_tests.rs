use forecourt_client::engine::Decision;
use forecourt_client::store::{ListingStore, RequestStore};
use forecourt_common::catalog::{CatalogFilter, PriceRange};
use forecourt_common::listing::ListingDraft;
use forecourt_common::overview::{AdminOverview, Standing, UserRequestView, PLACEHOLDER_IMAGE};

use market_integration::harness::MarketHarness;

/// Overview counts are the admin's labels: accepted buys are cars the
/// platform sold, accepted sells are cars it bought.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn overview_counts_match_accepted_requests() {
    let h = MarketHarness::setup().await;
    let car_a = h.seed_listing("Sedan", 500_000, "").await;
    let car_b = h.seed_listing("Coupe", 800_000, "").await;

    // Two accepted buys, one accepted sell, one of each left undecided.
    let buy_a = h.engine.submit_buy_request(&h.arun.session, &car_a).await.unwrap();
    let buy_b = h.engine.submit_buy_request(&h.bella.session, &car_b).await.unwrap();
    let sell = h
        .engine
        .submit_sell_request(&h.bella.session, ListingDraft::new("Hatch", 300_000, ""))
        .await
        .unwrap();
    h.engine.submit_buy_request(&h.bella.session, &car_a).await.unwrap();
    h.engine
        .submit_sell_request(&h.arun.session, ListingDraft::new("Wagon", 200_000, ""))
        .await
        .unwrap();

    for id in [&buy_a, &buy_b, &sell] {
        h.engine.decide(&h.priya.session, id, Decision::Accept).await.unwrap();
    }

    let listings = ListingStore::list_all(&*h.store).await.unwrap();
    let requests = RequestStore::list_all(&*h.store).await.unwrap();
    let overview = AdminOverview::project(&listings, &requests);

    // The accepted sell minted a third listing.
    assert_eq!(overview.total_cars, 3);
    assert_eq!(overview.cars_sold, 2);
    assert_eq!(overview.cars_bought, 1);
    assert_eq!(overview.sold_list.len(), 2);
    assert_eq!(overview.bought_list.len(), 1);
    assert_eq!(overview.bought_list[0].user_email, "bella@x.com");
}

/// Sold cars borrow the listing's image; a listing deleted after the fact
/// degrades to the placeholder rather than an error.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn overview_image_resolution_tolerates_deleted_listings() {
    let h = MarketHarness::setup().await;
    let car = h.seed_listing("Sedan", 500_000, "sedan.jpg").await;

    let buy = h.engine.submit_buy_request(&h.arun.session, &car).await.unwrap();
    h.engine.decide(&h.priya.session, &buy, Decision::Accept).await.unwrap();

    let listings = ListingStore::list_all(&*h.store).await.unwrap();
    let requests = RequestStore::list_all(&*h.store).await.unwrap();
    let overview = AdminOverview::project(&listings, &requests);
    assert_eq!(overview.sold_list[0].image_url, "sedan.jpg");

    h.engine.remove_listing(&h.priya.session, &car).await.unwrap();
    let listings = ListingStore::list_all(&*h.store).await.unwrap();
    let overview = AdminOverview::project(&listings, &requests);
    assert_eq!(overview.sold_list[0].image_url, PLACEHOLDER_IMAGE);
}

/// A user with no requests sees every listing as not requested; a buy
/// submission flips that listing to pending for them alone.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn request_standing_is_per_user() {
    let h = MarketHarness::setup().await;
    let car = h.seed_listing("Sedan", 500_000, "").await;

    let requests = RequestStore::list_all(&*h.store).await.unwrap();
    let arun_view = UserRequestView::project("arun@x.com", &requests);
    assert_eq!(arun_view.standing_for(&car), Standing::NotRequested);

    h.engine.submit_buy_request(&h.arun.session, &car).await.unwrap();

    let requests = RequestStore::list_all(&*h.store).await.unwrap();
    let arun_view = UserRequestView::project("arun@x.com", &requests);
    let bella_view = UserRequestView::project("bella@x.com", &requests);
    assert_eq!(arun_view.standing_for(&car), Standing::Pending);
    assert_eq!(bella_view.standing_for(&car), Standing::NotRequested);
}

/// The catalog filter over live store contents: case-insensitive name
/// search combined with inclusive price bounds.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn catalog_filter_over_the_stored_listings() {
    let h = MarketHarness::setup().await;
    h.seed_listing("Sedan", 500_000, "").await;
    h.seed_listing("Used Sedan", 400_000, "").await;
    h.seed_listing("Hatch", 200_000, "").await;

    let listings = ListingStore::list_all(&*h.store).await.unwrap();
    let filter = CatalogFilter {
        search: "sed".into(),
        price: PriceRange::new(100_000, 400_000),
        ..CatalogFilter::default()
    };

    let matched = filter.apply(&listings, &UserRequestView::default());
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "Used Sedan");
}
