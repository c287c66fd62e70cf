use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::{Listing, ListingDraft, ListingId};

/// Unique purchase-request identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

/// What the requester wants: to buy an existing listing, or to sell a car
/// the platform does not know about yet. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestAction {
    Buy,
    Sell,
}

/// Where a request sits in its lifecycle. Every request starts `Pending`;
/// `Accepted` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Returns true if transitioning from self to `next` is valid.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (RequestStatus::Pending, RequestStatus::Accepted)
                | (RequestStatus::Pending, RequestStatus::Rejected)
        )
    }
}

/// A buy/sell intent awaiting (or past) an admin decision.
///
/// Documents live in the `purchaseRequests` collection. The car fields are a
/// snapshot taken at submission time, not a live link: a buy request keeps
/// the listing's values as they were, and survives the listing's later
/// mutation or deletion. Requests are never deleted in normal operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub id: RequestId,
    pub user_email: String,
    pub action: RequestAction,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_id: Option<ListingId>,
    pub car_name: String,
    pub price: i64,
    #[serde(default)]
    pub image_url: String,
    pub requested_at: DateTime<Utc>,
}

impl PurchaseRequest {
    /// Exactly one shape per action: a buy request references the listing it
    /// wants, a sell request carries a car that has no listing yet.
    pub fn car_reference_consistent(&self) -> bool {
        match self.action {
            RequestAction::Buy => self.car_id.is_some(),
            RequestAction::Sell => self.car_id.is_none(),
        }
    }
}

/// Creation payload: a request minus its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDraft {
    pub user_email: String,
    pub action: RequestAction,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_id: Option<ListingId>,
    pub car_name: String,
    pub price: i64,
    #[serde(default)]
    pub image_url: String,
    pub requested_at: DateTime<Utc>,
}

impl RequestDraft {
    /// A buy intent: snapshots the listing's fields as they are right now.
    pub fn buy(user_email: impl Into<String>, listing: &Listing, now: DateTime<Utc>) -> Self {
        RequestDraft {
            user_email: user_email.into(),
            action: RequestAction::Buy,
            status: RequestStatus::Pending,
            car_id: Some(listing.id.clone()),
            car_name: listing.name.clone(),
            price: listing.price,
            image_url: listing.image_url.clone(),
            requested_at: now,
        }
    }

    /// A sell intent: the proposed car's data rides inside the request,
    /// since no listing exists for it yet.
    pub fn sell(user_email: impl Into<String>, proposed: &ListingDraft, now: DateTime<Utc>) -> Self {
        RequestDraft {
            user_email: user_email.into(),
            action: RequestAction::Sell,
            status: RequestStatus::Pending,
            car_id: None,
            car_name: proposed.name.clone(),
            price: proposed.price,
            image_url: proposed.image_url.clone(),
            requested_at: now,
        }
    }

    pub fn into_request(self, id: RequestId) -> PurchaseRequest {
        PurchaseRequest {
            id,
            user_email: self.user_email,
            action: self.action,
            status: self.status,
            car_id: self.car_id,
            car_name: self.car_name,
            price: self.price,
            image_url: self.image_url,
            requested_at: self.requested_at,
        }
    }
}

/// The admin request-board filter: status and type dropdowns, `None` meaning
/// "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub action: Option<RequestAction>,
}

impl RequestFilter {
    pub fn matches(&self, request: &PurchaseRequest) -> bool {
        self.status.is_none_or(|s| request.status == s)
            && self.action.is_none_or(|a| request.action == a)
    }

    pub fn apply<'a>(&self, requests: &'a [PurchaseRequest]) -> Vec<&'a PurchaseRequest> {
        requests.iter().filter(|r| self.matches(r)).collect()
    }
}
