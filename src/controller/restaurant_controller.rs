use tracing::{info, warn};

use crate::checkout::format_rupiah;
use crate::config::BrowseArgs;
use crate::controller::AppState;
use crate::listing::geo::distance_km;
use crate::listing::geolocation::locate;
use crate::listing::{
    BrowseContext, FilterState, ListingBrowser, PageOutcome, RatingBucket, ScrollTrigger,
    ViewportMetrics,
};
use crate::models::restaurant::{Coordinate, Restaurant, RestaurantDetail};
use crate::storage::KeyValueStore;

/// Height of one rendered listing row, used to estimate scroll position.
pub const ROW_HEIGHT_PX: f64 = 96.0;
pub const VIEWPORT_HEIGHT_PX: f64 = 900.0;

fn apply_filter_args(filters: &mut FilterState, args: &BrowseArgs) {
    for bucket in &args.distances {
        filters.distances.insert(*bucket);
    }
    for stars in &args.ratings {
        match RatingBucket::new(*stars) {
            Some(bucket) => {
                filters.ratings.insert(bucket);
            }
            None => warn!("Ignoring rating bucket {}", stars),
        }
    }
    filters.set_min_price(args.min_price.clone());
    filters.set_max_price(args.max_price.clone());
}

/// Loads pages the way an infinite-scrolling list would: the first page
/// up front, then one more every time the rendered rows run out, until
/// `args.pages` pages have been read or the listing is exhausted.
pub async fn browse_restaurants<S: KeyValueStore>(
    app_state: &mut AppState<S>,
    args: &BrowseArgs,
) -> anyhow::Result<Vec<Restaurant>> {
    let location = locate(&app_state.config.geolocator()).await;
    let mut browser = ListingBrowser::new(
        app_state.config.page_limit,
        ScrollTrigger::new(app_state.config.scroll_threshold_px),
    );
    browser.set_context(BrowseContext::new(args.category.clone(), args.search.clone()));
    browser.set_location(location);
    apply_filter_args(browser.filters_mut(), args);

    let mut pages_loaded = 0;
    let mut ticket = browser.begin_next_page();
    while let Some(next) = ticket {
        if browser.resolve(&app_state.repo, next).await == PageOutcome::Failed {
            println!("Failed to load restaurants, please try again!");
            break;
        }
        pages_loaded += 1;
        if pages_loaded >= args.pages {
            break;
        }

        let content_height = browser.visible().len() as f64 * ROW_HEIGHT_PX;
        ticket = browser.on_scroll(&ViewportMetrics::scrolled_to_bottom(
            content_height,
            VIEWPORT_HEIGHT_PX,
        ));
    }

    let visible = browser.visible();
    info!(
        fetched = browser.items().len(),
        visible = visible.len(),
        state = ?browser.state(),
        "Finished browsing"
    );
    if visible.is_empty() {
        println!("No restaurants match the current filters.");
    }
    for restaurant in &visible {
        println!("{}", describe_restaurant(restaurant, location));
    }

    Ok(visible.into_iter().cloned().collect())
}

pub fn describe_restaurant(restaurant: &Restaurant, location: Option<Coordinate>) -> String {
    let mut line = format!("{:>5}  {}", restaurant.id, restaurant.name);
    if !restaurant.place.is_empty() {
        line.push_str(&format!(" · {}", restaurant.place));
    }
    if let Some(star) = restaurant.star {
        line.push_str(&format!(" · ★ {:.1}", star));
    }
    if let Some(range) = restaurant.price_range {
        line.push_str(&format!(
            " · {} - {}",
            format_rupiah(range.min),
            format_rupiah(range.max)
        ));
    }
    if let Some(distance) = distance_km(location, restaurant.coordinate) {
        line.push_str(&format!(" · {:.1} km", distance));
    }
    line
}

pub async fn retrieve_restaurant<S: KeyValueStore>(
    app_state: &mut AppState<S>,
    restaurant_id: i64,
) -> anyhow::Result<RestaurantDetail> {
    let detail = match app_state.repo.retrieve_restaurant(restaurant_id).await {
        Ok(detail) => detail,
        Err(e) => return Err(app_state.api_failure("retrieving restaurant", e)),
    };

    let location = locate(&app_state.config.geolocator()).await;
    println!("{}", describe_restaurant(&detail.restaurant, location));
    for menu in &detail.menus {
        println!(
            "  #{:<5} {:<32} {:>12}",
            menu.id,
            menu.name,
            format_rupiah(menu.price)
        );
    }

    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::geo::DistanceBucket;
    use crate::models::restaurant::PriceRange;

    #[test]
    fn describes_every_known_field() {
        let restaurant = Restaurant {
            id: 4,
            name: "Gudeg Yu Djum".to_string(),
            place: "Yogyakarta".to_string(),
            star: Some(4.66),
            coordinate: Some(Coordinate::new(-7.78, 110.36)),
            price_range: Some(PriceRange { min: 15000, max: 45000 }),
            logo: None,
        };

        let line = describe_restaurant(&restaurant, Some(Coordinate::new(-7.78, 110.36)));

        assert_eq!(
            line,
            "    4  Gudeg Yu Djum · Yogyakarta · ★ 4.7 · Rp15.000 - Rp45.000 · 0.0 km"
        );
    }

    #[test]
    fn filter_args_populate_the_filter_state() {
        let args = BrowseArgs {
            distances: vec![DistanceBucket::ThreeKm],
            ratings: vec![5, 2],
            min_price: Some("10000".to_string()),
            ..BrowseArgs::default()
        };
        let mut filters = FilterState::default();

        apply_filter_args(&mut filters, &args);

        assert!(filters.distances.contains(&DistanceBucket::ThreeKm));
        assert_eq!(filters.ratings.len(), 2);
        assert_eq!(filters.min_price.as_deref(), Some("10000"));
        assert_eq!(filters.max_price, None);
    }
}
