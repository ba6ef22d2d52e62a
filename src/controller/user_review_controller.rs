use anyhow::bail;

use crate::controller::AppState;
use crate::models::rating::{NewReview, RestaurantReview};
use crate::storage::KeyValueStore;

pub async fn retrieve_restaurant_reviews<S: KeyValueStore>(
    app_state: &mut AppState<S>,
    restaurant_id: i64,
) -> anyhow::Result<Vec<RestaurantReview>> {
    let reviews = match app_state.repo.retrieve_reviews(restaurant_id).await {
        Ok(reviews) => reviews,
        Err(e) => return Err(app_state.api_failure("retrieving reviews", e)),
    };

    if reviews.is_empty() {
        println!("No reviews yet.");
    }
    for review in &reviews {
        println!(
            "★ {:.1}  {}  {}",
            review.star,
            review.user.as_deref().unwrap_or("anonymous"),
            review.comment
        );
    }

    Ok(reviews)
}

pub async fn add_review<S: KeyValueStore>(
    app_state: &mut AppState<S>,
    restaurant_id: i64,
    star: f64,
    comment: String,
) -> anyhow::Result<RestaurantReview> {
    app_state.require_login()?;
    if !(0.0..=5.0).contains(&star) {
        bail!("Star rating must be between 0 and 5, got {}", star);
    }

    let review = NewReview { star, comment };
    match app_state.repo.add_review(restaurant_id, &review).await {
        Ok(review) => {
            println!("Successfully added review for the restaurant");
            Ok(review)
        }
        Err(e) => Err(app_state.api_failure("adding review for restaurant", e)),
    }
}
