use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub star: Option<f64>,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub long: f64,
}

impl Coordinate {
    pub fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }

    /// Formats the coordinate as the `lat,long` pair the listing endpoint expects.
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.lat, self.long)
    }
}

/// Prices are sent either as JSON numbers or as numeric strings.
#[serde_as]
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct PriceRange {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub min: i64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub max: i64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RestaurantDetail {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    #[serde(default)]
    pub menus: Vec<MenuItem>,
}

#[serde_as]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub price: i64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}
