use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use forecourt_common::identity::Session;
use forecourt_common::listing::{Listing, ListingDraft, ListingId, ListingPatch, ValidationError};
use forecourt_common::request::{
    RequestAction, RequestDraft, RequestId, RequestStatus,
};

use crate::error::EngineError;
use crate::store::{ListingStore, RequestStore};

/// An admin's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

/// What a decision produced: the request's new status and, for an accepted
/// sell, the listing it minted.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionOutcome {
    pub status: RequestStatus,
    pub new_listing: Option<Listing>,
}

/// Owns every valid purchase-request transition and the one derived write in
/// the system: an accepted sell request minting its listing.
///
/// Every operation takes the caller's immutable [`Session`]; the role was
/// resolved once at login and is never re-derived here.
pub struct RequestEngine<L, R> {
    listings: Arc<L>,
    requests: Arc<R>,
}

impl<L, R> RequestEngine<L, R>
where
    L: ListingStore,
    R: RequestStore,
{
    pub fn new(listings: Arc<L>, requests: Arc<R>) -> Self {
        RequestEngine { listings, requests }
    }

    /// Submit a buy request for a listing the platform currently knows.
    ///
    /// The request snapshots the listing's name, price and image as they are
    /// right now; later edits or deletion of the listing do not touch it.
    pub async fn submit_buy_request(
        &self,
        session: &Session,
        car_id: &ListingId,
    ) -> Result<RequestId, EngineError> {
        require_email(session)?;
        let listing = self.listings.get(car_id).await?;

        let draft = RequestDraft::buy(&session.email, &listing, Utc::now());
        let id = self.requests.create(draft).await?;
        info!(user = %session.email, car = %car_id.0, request = %id.0, "buy request submitted");
        Ok(id)
    }

    /// Submit a sell request carrying the proposed car's data. No listing
    /// exists for it until an admin accepts.
    pub async fn submit_sell_request(
        &self,
        session: &Session,
        proposed: ListingDraft,
    ) -> Result<RequestId, EngineError> {
        require_email(session)?;
        proposed.validate()?;

        let draft = RequestDraft::sell(&session.email, &proposed, Utc::now());
        let id = self.requests.create(draft).await?;
        info!(user = %session.email, car = %proposed.name, request = %id.0, "sell request submitted");
        Ok(id)
    }

    /// Apply an admin decision to a pending request.
    ///
    /// Rejection is a plain status write. Accepting a buy is too: ownership
    /// transfer is not modeled as a listing change. Accepting a sell also
    /// upserts the listing the request proposed, under the request's own id
    /// (see [`Listing::from_accepted_sale`]). The two writes are independent
    /// remote calls; when the second fails the store is left inconsistent and
    /// the error says so, leaving repair to [`Self::reconcile_accepted_sales`].
    pub async fn decide(
        &self,
        session: &Session,
        id: &RequestId,
        decision: Decision,
    ) -> Result<DecisionOutcome, EngineError> {
        require_admin(session)?;
        let request = self.requests.get(id).await?;
        if request.status.is_terminal() {
            return Err(EngineError::AlreadyDecided {
                id: id.clone(),
                status: request.status,
            });
        }

        match decision {
            Decision::Reject => {
                self.requests
                    .update_status(id, RequestStatus::Rejected)
                    .await?;
                info!(request = %id.0, "request rejected");
                Ok(DecisionOutcome {
                    status: RequestStatus::Rejected,
                    new_listing: None,
                })
            }
            Decision::Accept => {
                self.requests
                    .update_status(id, RequestStatus::Accepted)
                    .await?;

                let new_listing = match request.action {
                    RequestAction::Buy => None,
                    RequestAction::Sell => {
                        let listing = Listing::from_accepted_sale(&request);
                        if let Err(source) = self.listings.put(listing.clone()).await {
                            warn!(request = %id.0, error = %source,
                                "accepted sell left without its listing");
                            return Err(EngineError::Inconsistent {
                                id: id.clone(),
                                source,
                            });
                        }
                        Some(listing)
                    }
                };

                info!(request = %id.0, action = ?request.action, "request accepted");
                Ok(DecisionOutcome {
                    status: RequestStatus::Accepted,
                    new_listing,
                })
            }
        }
    }

    /// Detect and repair orphaned accepted sells.
    ///
    /// The reconciliation half of the non-transactional accept-sell write:
    /// any accepted sell request whose listing never landed gets the listing
    /// upserted now. Idempotent; a consistent store yields an empty list.
    pub async fn reconcile_accepted_sales(
        &self,
        session: &Session,
    ) -> Result<Vec<RequestId>, EngineError> {
        require_admin(session)?;

        let mut repaired = Vec::new();
        for request in self.requests.list_all().await? {
            if request.action != RequestAction::Sell
                || request.status != RequestStatus::Accepted
            {
                continue;
            }

            let listing = Listing::from_accepted_sale(&request);
            match self.listings.get(&listing.id).await {
                Ok(_) => {}
                Err(err) if err.is_not_found() => {
                    self.listings.put(listing).await?;
                    warn!(request = %request.id.0, "repaired accepted sell without a listing");
                    repaired.push(request.id);
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(repaired)
    }

    /// Admin manual add, the path that does not go through a request.
    pub async fn add_listing(
        &self,
        session: &Session,
        draft: ListingDraft,
    ) -> Result<ListingId, EngineError> {
        require_admin(session)?;
        draft.validate()?;
        let id = self.listings.create(draft).await?;
        info!(car = %id.0, "listing added");
        Ok(id)
    }

    /// Admin edit of listing fields.
    pub async fn update_listing(
        &self,
        session: &Session,
        id: &ListingId,
        patch: ListingPatch,
    ) -> Result<(), EngineError> {
        require_admin(session)?;
        patch.validate()?;
        self.listings.update(id, patch).await?;
        info!(car = %id.0, "listing updated");
        Ok(())
    }

    /// Admin delete. Immediate and irreversible; requests that referenced
    /// the listing keep their snapshot.
    pub async fn remove_listing(
        &self,
        session: &Session,
        id: &ListingId,
    ) -> Result<(), EngineError> {
        require_admin(session)?;
        self.listings.delete(id).await?;
        info!(car = %id.0, "listing removed");
        Ok(())
    }
}

fn require_email(session: &Session) -> Result<(), EngineError> {
    if session.email.trim().is_empty() {
        return Err(ValidationError::EmptyEmail.into());
    }
    Ok(())
}

fn require_admin(session: &Session) -> Result<(), EngineError> {
    if !session.is_admin() {
        return Err(EngineError::Forbidden);
    }
    Ok(())
}
