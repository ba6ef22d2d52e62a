use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RestaurantReview {
    pub id: i64,
    #[serde(default)]
    pub user: Option<String>,
    pub star: f64,
    #[serde(default)]
    pub comment: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewReview {
    pub star: f64,
    pub comment: String,
}
