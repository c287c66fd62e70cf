use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::listing::{Listing, ListingId};
use crate::request::{PurchaseRequest, RequestAction, RequestId, RequestStatus};

/// Shown wherever a car has no usable image.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

/// Resolve the image for a request.
///
/// A sell request carries its own image. A buy request borrows the referenced
/// listing's image, falling back to the placeholder when the listing is gone
/// (deleted, or not yet locally known) or has no image of its own. Projections
/// must tolerate that staleness rather than treat it as an error.
pub fn resolve_image(request: &PurchaseRequest, listings: &[Listing]) -> String {
    let resolved = match request.action {
        RequestAction::Sell => Some(request.image_url.clone()),
        RequestAction::Buy => request.car_id.as_ref().and_then(|car_id| {
            listings
                .iter()
                .find(|l| l.id == *car_id)
                .map(|l| l.image_url.clone())
        }),
    };

    match resolved {
        Some(url) if !url.is_empty() => url,
        _ => PLACEHOLDER_IMAGE.to_string(),
    }
}

/// An accepted request as it appears on the admin overview lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactedCar {
    pub car_name: String,
    pub price: i64,
    pub user_email: String,
    pub image_url: String,
}

impl TransactedCar {
    fn from_request(request: &PurchaseRequest, listings: &[Listing]) -> Self {
        TransactedCar {
            car_name: request.car_name.clone(),
            price: request.price,
            user_email: request.user_email.clone(),
            image_url: resolve_image(request, listings),
        }
    }
}

/// The admin dashboard aggregate over both collections.
///
/// Labels are from the admin's perspective: an accepted buy request means the
/// platform sold a car to the user, an accepted sell request means the
/// platform bought one from the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminOverview {
    pub total_cars: usize,
    pub cars_sold: usize,
    pub cars_bought: usize,
    pub sold_list: Vec<TransactedCar>,
    pub bought_list: Vec<TransactedCar>,
}

impl AdminOverview {
    pub fn project(listings: &[Listing], requests: &[PurchaseRequest]) -> AdminOverview {
        let mut overview = AdminOverview {
            total_cars: listings.len(),
            ..AdminOverview::default()
        };

        for request in requests {
            if request.status != RequestStatus::Accepted {
                continue;
            }
            match request.action {
                RequestAction::Buy => {
                    overview.cars_sold += 1;
                    overview
                        .sold_list
                        .push(TransactedCar::from_request(request, listings));
                }
                RequestAction::Sell => {
                    overview.cars_bought += 1;
                    overview
                        .bought_list
                        .push(TransactedCar::from_request(request, listings));
                }
            }
        }

        overview
    }
}

/// A listing's standing relative to one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    NotRequested,
    Pending,
    Accepted,
    Rejected,
}

impl From<RequestStatus> for Standing {
    fn from(status: RequestStatus) -> Standing {
        match status {
            RequestStatus::Pending => Standing::Pending,
            RequestStatus::Accepted => Standing::Accepted,
            RequestStatus::Rejected => Standing::Rejected,
        }
    }
}

/// Status and action of one request, as the user-facing views need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub id: RequestId,
    pub status: RequestStatus,
    pub action: RequestAction,
}

/// One user's requests, keyed by the listing each buy request targets.
/// Sell requests have no listing to join against and are tracked separately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRequestView {
    by_car: BTreeMap<ListingId, RequestSummary>,
    sell_requests: Vec<RequestSummary>,
}

impl UserRequestView {
    /// Project the full request set down to one user's view. Requests from
    /// other users are invisible here.
    pub fn project(user_email: &str, requests: &[PurchaseRequest]) -> UserRequestView {
        let mut view = UserRequestView::default();

        for request in requests {
            if request.user_email != user_email {
                continue;
            }
            let summary = RequestSummary {
                id: request.id.clone(),
                status: request.status,
                action: request.action,
            };
            match &request.car_id {
                Some(car_id) => {
                    view.by_car.insert(car_id.clone(), summary);
                }
                None => view.sell_requests.push(summary),
            }
        }

        view
    }

    pub fn standing_for(&self, listing_id: &ListingId) -> Standing {
        self.by_car
            .get(listing_id)
            .map(|summary| summary.status.into())
            .unwrap_or(Standing::NotRequested)
    }

    pub fn request_for(&self, listing_id: &ListingId) -> Option<&RequestSummary> {
        self.by_car.get(listing_id)
    }

    pub fn sell_requests(&self) -> &[RequestSummary] {
        &self.sell_requests
    }
}
