use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::request::PurchaseRequest;

/// Unique listing identifier, assigned by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

/// A submission rejected before any store write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listing name must not be empty")]
    EmptyName,
    #[error("price must not be negative (got {0})")]
    NegativePrice(i64),
    #[error("requester email must not be empty")]
    EmptyEmail,
}

/// A car for sale. Documents live in the `cars` collection with camelCase
/// field names; the id is carried alongside the document body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
}

impl Listing {
    /// Promote an accepted sell request into a listing.
    ///
    /// The listing id is carried over from the request id. This is the single
    /// cross-reference rule linking the two collections: no other path mints
    /// a listing id inside the request id space.
    pub fn from_accepted_sale(request: &PurchaseRequest) -> Listing {
        Listing {
            id: ListingId(request.id.0.clone()),
            name: request.car_name.clone(),
            price: request.price,
            image_url: request.image_url.clone(),
            owner_email: Some(request.user_email.clone()),
        }
    }
}

/// Creation payload: a listing minus its id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
}

impl ListingDraft {
    pub fn new(name: impl Into<String>, price: i64, image_url: impl Into<String>) -> Self {
        ListingDraft {
            name: name.into(),
            price,
            image_url: image_url.into(),
            owner_email: None,
        }
    }

    /// Name must be non-empty and price non-negative. A missing image is the
    /// empty string, not an error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.price < 0 {
            return Err(ValidationError::NegativePrice(self.price));
        }
        Ok(())
    }

    pub fn into_listing(self, id: ListingId) -> Listing {
        Listing {
            id,
            name: self.name,
            price: self.price,
            image_url: self.image_url,
            owner_email: self.owner_email,
        }
    }
}

/// Partial update to a listing. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ListingPatch {
    /// Patch fields obey the same rules as drafts, when present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyName);
            }
        }
        if let Some(price) = self.price {
            if price < 0 {
                return Err(ValidationError::NegativePrice(price));
            }
        }
        Ok(())
    }

    pub fn apply_to(&self, listing: &mut Listing) {
        if let Some(name) = &self.name {
            listing.name = name.clone();
        }
        if let Some(price) = self.price {
            listing.price = price;
        }
        if let Some(image_url) = &self.image_url {
            listing.image_url = image_url.clone();
        }
    }
}
