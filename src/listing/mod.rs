//! Restaurant listing: paginated fetching, accumulation and client-side filtering.

use serde::Serialize;

use crate::error::ApiError;
use crate::models::restaurant::Restaurant;

pub mod accumulator;
pub mod browser;
pub mod filter;
pub mod geo;
pub mod geolocation;
pub mod scroll;

pub use accumulator::Accumulator;
pub use browser::{BrowseContext, ListingBrowser, LoadState, PageOutcome, PageTicket};
pub use filter::{FilterState, RatingBucket};
pub use geo::DistanceBucket;
pub use scroll::{ScrollTrigger, ViewportMetrics};

/// Query string of `GET /resto`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Anything that can serve a page of restaurants.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Restaurant>, ApiError>;
}
