//! Client-side filtering of the accumulated listing.
//!
//! Everything here is a pure function of the listing, the filter state, the
//! user's position and the search term, so the visible result can be
//! recomputed on every interaction without touching the backend.

use std::collections::BTreeSet;
use std::fmt;

use crate::listing::geo::{distance_km, DistanceBucket};
use crate::models::restaurant::{Coordinate, Restaurant};

/// One of the five star-rating options.
///
/// Buckets 1 to 4 cover `[N, N + 1)`; bucket 5 only matches a rating of
/// exactly 5.0 or more.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RatingBucket(u8);

impl RatingBucket {
    pub const TOP: u8 = 5;

    pub fn new(stars: u8) -> Option<Self> {
        (1..=Self::TOP).contains(&stars).then_some(Self(stars))
    }

    pub fn stars(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, star: f64) -> bool {
        let floor = f64::from(self.0);
        if self.0 == Self::TOP {
            star >= floor
        } else {
            star >= floor && star < floor + 1.0
        }
    }
}

impl TryFrom<u8> for RatingBucket {
    type Error = String;

    fn try_from(stars: u8) -> Result<Self, Self::Error> {
        RatingBucket::new(stars).ok_or_else(|| format!("rating bucket must be 1-5, got {}", stars))
    }
}

impl fmt::Display for RatingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}★", self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterState {
    pub distances: BTreeSet<DistanceBucket>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub ratings: BTreeSet<RatingBucket>,
}

impl FilterState {
    /// Flips a distance option on or off, returning whether it is now selected.
    pub fn toggle_distance(&mut self, bucket: DistanceBucket) -> bool {
        if !self.distances.remove(&bucket) {
            self.distances.insert(bucket);
            return true;
        }
        false
    }

    pub fn toggle_rating(&mut self, bucket: RatingBucket) -> bool {
        if !self.ratings.remove(&bucket) {
            self.ratings.insert(bucket);
            return true;
        }
        false
    }

    pub fn set_min_price(&mut self, price: Option<String>) {
        self.min_price = price;
    }

    pub fn set_max_price(&mut self, price: Option<String>) {
        self.max_price = price;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
            && self.ratings.is_empty()
            && parse_price(self.min_price.as_deref()).is_none()
            && parse_price(self.max_price.as_deref()).is_none()
    }
}

/// Blank or non-numeric input leaves the bound inactive.
fn parse_price(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|price| price.is_finite())
}

fn within_distance(
    restaurant: &Restaurant,
    buckets: &BTreeSet<DistanceBucket>,
    user_location: Coordinate,
) -> bool {
    match distance_km(Some(user_location), restaurant.coordinate) {
        Some(distance) => buckets.iter().any(|bucket| bucket.contains(distance)),
        None => false,
    }
}

fn above_floor(restaurant: &Restaurant, floor: f64) -> bool {
    restaurant
        .price_range
        .is_some_and(|range| range.min as f64 >= floor)
}

fn below_ceiling(restaurant: &Restaurant, ceiling: f64) -> bool {
    restaurant
        .price_range
        .is_some_and(|range| range.max as f64 <= ceiling)
}

fn within_rating(restaurant: &Restaurant, buckets: &BTreeSet<RatingBucket>) -> bool {
    restaurant
        .star
        .is_some_and(|star| buckets.iter().any(|bucket| bucket.contains(star)))
}

/// Case-insensitive substring match against the name or the place.
pub fn matches_search(restaurant: &Restaurant, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    restaurant.name.to_lowercase().contains(&term)
        || restaurant.place.to_lowercase().contains(&term)
}

/// Applies distance, price floor, price ceiling and rating in that order.
///
/// The distance stage only runs when a bucket is selected and the user's
/// position is known. Every other active stage drops restaurants that lack
/// the data it needs.
pub fn apply_filters<'a>(
    listing: &'a [Restaurant],
    filters: &FilterState,
    user_location: Option<Coordinate>,
) -> Vec<&'a Restaurant> {
    let mut visible: Vec<&Restaurant> = listing.iter().collect();

    if let Some(user_location) = user_location.filter(|_| !filters.distances.is_empty()) {
        visible.retain(|restaurant| within_distance(restaurant, &filters.distances, user_location));
    }
    if let Some(floor) = parse_price(filters.min_price.as_deref()) {
        visible.retain(|restaurant| above_floor(restaurant, floor));
    }
    if let Some(ceiling) = parse_price(filters.max_price.as_deref()) {
        visible.retain(|restaurant| below_ceiling(restaurant, ceiling));
    }
    if !filters.ratings.is_empty() {
        visible.retain(|restaurant| within_rating(restaurant, &filters.ratings));
    }

    visible
}

/// The listing as the user sees it: bucketed filters plus the text search.
pub fn visible_listing<'a>(
    listing: &'a [Restaurant],
    filters: &FilterState,
    user_location: Option<Coordinate>,
    search: Option<&str>,
) -> Vec<&'a Restaurant> {
    let mut visible = apply_filters(listing, filters, user_location);
    if let Some(term) = search {
        visible.retain(|restaurant| matches_search(restaurant, term));
    }
    visible
}
