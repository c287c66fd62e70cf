use serde::{Deserialize, Serialize};

use crate::listing::Listing;
use crate::overview::{Standing, UserRequestView};

/// Inclusive price bounds for the catalog slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl PriceRange {
    pub fn new(min: i64, max: i64) -> Self {
        PriceRange { min, max }
    }

    pub fn full() -> Self {
        PriceRange {
            min: 0,
            max: i64::MAX,
        }
    }

    pub fn contains(&self, price: i64) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        PriceRange::full()
    }
}

/// Which request standing the user wants the catalog narrowed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandingFilter {
    #[default]
    All,
    NotRequested,
    Pending,
    Accepted,
    Rejected,
}

impl StandingFilter {
    fn matches(self, standing: Standing) -> bool {
        match self {
            StandingFilter::All => true,
            StandingFilter::NotRequested => standing == Standing::NotRequested,
            StandingFilter::Pending => standing == Standing::Pending,
            StandingFilter::Accepted => standing == Standing::Accepted,
            StandingFilter::Rejected => standing == Standing::Rejected,
        }
    }
}

/// The catalog filter: search text, price range, and the current user's
/// request standing. A linear predicate scan over the in-memory list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub search: String,
    pub price: PriceRange,
    pub standing: StandingFilter,
}

impl CatalogFilter {
    /// Name match is a case-insensitive substring test; price is inclusive
    /// on both bounds.
    pub fn matches(&self, listing: &Listing, standing: Standing) -> bool {
        let name_matches = listing
            .name
            .to_lowercase()
            .contains(&self.search.to_lowercase());

        name_matches && self.price.contains(listing.price) && self.standing.matches(standing)
    }

    pub fn apply<'a>(&self, listings: &'a [Listing], view: &UserRequestView) -> Vec<&'a Listing> {
        listings
            .iter()
            .filter(|listing| self.matches(listing, view.standing_for(&listing.id)))
            .collect()
    }
}
