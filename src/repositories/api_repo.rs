use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ApiError, EndpointClass};
use crate::listing::{PageQuery, PageSource};
use crate::models::cart::{AddCartItem, Cart};
use crate::models::order::{NewOrder, Order};
use crate::models::rating::{NewReview, RestaurantReview};
use crate::models::restaurant::{Restaurant, RestaurantDetail};
use crate::models::user::{AuthToken, LoginRequest, Profile, RegisterRequest};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin typed wrapper over the restaurant REST backend.
#[derive(Clone, Debug)]
pub struct RestoApiRepo {
    base_url: String,
    client: Client,
}

impl RestoApiRepo {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<&str>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("Stored token is not a valid header value")?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("Failed to build the HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("Request to {} was rejected as unauthorized", endpoint);
            return Err(ApiError::Unauthorized {
                endpoint: endpoint.to_string(),
                class: EndpointClass::of(endpoint),
            });
        }
        if !status.is_success() {
            warn!("Request to {} failed due to: {}", endpoint, status);
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        let body = response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize the response of {}", endpoint))?;
        Ok(body)
    }

    pub async fn retrieve_restaurants(
        &self,
        query: &PageQuery,
    ) -> Result<Vec<Restaurant>, ApiError> {
        debug!(page = query.page, limit = query.limit, "Fetching restaurant page");
        let endpoint = "/resto";
        let request = self.client.get(self.url(endpoint)).query(query);

        self.send(request, endpoint).await
    }

    pub async fn retrieve_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<RestaurantDetail, ApiError> {
        let endpoint = format!("/resto/{}", restaurant_id);
        let request = self.client.get(self.url(&endpoint));

        self.send(request, &endpoint).await
    }

    pub async fn retrieve_reviews(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<RestaurantReview>, ApiError> {
        let endpoint = format!("/resto/{}/reviews", restaurant_id);
        let request = self.client.get(self.url(&endpoint));

        self.send(request, &endpoint).await
    }

    pub async fn add_review(
        &self,
        restaurant_id: i64,
        review: &NewReview,
    ) -> Result<RestaurantReview, ApiError> {
        let endpoint = format!("/resto/{}/reviews", restaurant_id);
        let request = self.client.post(self.url(&endpoint)).json(review);

        self.send(request, &endpoint).await
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthToken, ApiError> {
        let endpoint = "/auth/login";
        let request = self.client.post(self.url(endpoint)).json(credentials);

        self.send(request, endpoint).await
    }

    pub async fn register(&self, registration: &RegisterRequest) -> Result<AuthToken, ApiError> {
        let endpoint = "/auth/register";
        let request = self.client.post(self.url(endpoint)).json(registration);

        self.send(request, endpoint).await
    }

    pub async fn retrieve_profile(&self) -> Result<Profile, ApiError> {
        let endpoint = "/auth/profile";
        let request = self.client.get(self.url(endpoint));

        self.send(request, endpoint).await
    }

    pub async fn retrieve_cart(&self) -> Result<Cart, ApiError> {
        let endpoint = "/cart";
        let request = self.client.get(self.url(endpoint));

        self.send(request, endpoint).await
    }

    pub async fn add_to_cart(&self, item: &AddCartItem) -> Result<Cart, ApiError> {
        let endpoint = "/cart";
        let request = self.client.post(self.url(endpoint)).json(item);

        self.send(request, endpoint).await
    }

    pub async fn remove_from_cart(&self, cart_item_id: i64) -> Result<Cart, ApiError> {
        let endpoint = format!("/cart/{}", cart_item_id);
        let request = self.client.delete(self.url(&endpoint));

        self.send(request, &endpoint).await
    }

    pub async fn place_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        let endpoint = "/orders";
        let request = self.client.post(self.url(endpoint)).json(order);

        self.send(request, endpoint).await
    }

    pub async fn retrieve_orders(&self) -> Result<Vec<Order>, ApiError> {
        let endpoint = "/orders";
        let request = self.client.get(self.url(endpoint));

        self.send(request, endpoint).await
    }
}

impl PageSource for RestoApiRepo {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Restaurant>, ApiError> {
        self.retrieve_restaurants(query).await
    }
}
