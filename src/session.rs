use tracing::{info, warn};

use crate::error::{ApiError, EndpointClass};
use crate::models::order::Order;
use crate::models::user::AuthToken;
use crate::storage::{read_json, write_json, KeyValueStore, ADDRESS_KEY, LAST_ORDER_KEY, TOKEN_KEY};

/// Session state persisted between runs.
#[derive(Debug)]
pub struct Session<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(e) => {
                warn!("Failed to read the stored token due to: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn store_token(&mut self, token: &AuthToken) -> anyhow::Result<()> {
        self.store.set(TOKEN_KEY, &token.token)
    }

    pub fn logout(&mut self) -> anyhow::Result<()> {
        info!("Clearing stored credentials");
        self.store.remove(TOKEN_KEY)
    }

    /// Applies the credential policy for a failed request and returns whether
    /// the stored token was cleared.
    ///
    /// Only a 401 from an `/auth/*` endpoint proves the token is bad. A 401
    /// anywhere else keeps the token so a racing request cannot log the user out.
    pub fn handle_api_error(&mut self, error: &ApiError) -> anyhow::Result<bool> {
        match error {
            ApiError::Unauthorized {
                class: EndpointClass::Auth,
                endpoint,
            } => {
                warn!("{} rejected the stored token, logging out", endpoint);
                self.logout()?;
                Ok(true)
            }
            ApiError::Unauthorized { endpoint, .. } => {
                warn!("{} answered unauthorized, keeping credentials", endpoint);
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    pub fn cached_address(&self) -> Option<String> {
        read_json(&self.store, ADDRESS_KEY)
    }

    pub fn cache_address(&mut self, address: &str) -> anyhow::Result<()> {
        write_json(&mut self.store, ADDRESS_KEY, &address)
    }

    pub fn last_order(&self) -> Option<Order> {
        read_json(&self.store, LAST_ORDER_KEY)
    }

    pub fn remember_order(&mut self, order: &Order) -> anyhow::Result<()> {
        write_json(&mut self.store, LAST_ORDER_KEY, order)
    }
}
