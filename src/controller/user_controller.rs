use anyhow::Context;
use tracing::info;

use crate::checkout::format_rupiah;
use crate::controller::AppState;
use crate::models::order::Order;
use crate::models::user::{LoginRequest, Profile, RegisterRequest};
use crate::storage::KeyValueStore;

pub async fn login<S: KeyValueStore>(
    app_state: &mut AppState<S>,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let credentials = LoginRequest { email, password };
    let token = match app_state.repo.login(&credentials).await {
        Ok(token) => token,
        Err(e) => return Err(app_state.api_failure("logging in", e)),
    };

    app_state
        .session
        .store_token(&token)
        .context("Failed to persist the session token")?;
    app_state.refresh_repo()?;
    info!("Logged in as {}", credentials.email);
    println!("Successfully logged in");
    Ok(())
}

pub async fn register<S: KeyValueStore>(
    app_state: &mut AppState<S>,
    name: String,
    email: String,
    password: String,
    phone: Option<String>,
) -> anyhow::Result<()> {
    let registration = RegisterRequest {
        name,
        email,
        password,
        phone,
    };
    let token = match app_state.repo.register(&registration).await {
        Ok(token) => token,
        Err(e) => return Err(app_state.api_failure("registering", e)),
    };

    app_state
        .session
        .store_token(&token)
        .context("Failed to persist the session token")?;
    app_state.refresh_repo()?;
    println!("Successfully registered {}", registration.email);
    Ok(())
}

pub fn logout<S: KeyValueStore>(app_state: &mut AppState<S>) -> anyhow::Result<()> {
    app_state.session.logout()?;
    app_state.refresh_repo()?;
    println!("Logged out");
    Ok(())
}

/// Fetches the profile and the order history side by side.
pub async fn retrieve_profile<S: KeyValueStore>(
    app_state: &mut AppState<S>,
) -> anyhow::Result<(Profile, Vec<Order>)> {
    app_state.require_login()?;

    let res = futures::try_join!(
        app_state.repo.retrieve_profile(),
        app_state.repo.retrieve_orders(),
    );
    let (profile, orders) = match res {
        Ok(res) => res,
        Err(e) => return Err(app_state.api_failure("retrieving profile", e)),
    };

    println!("{} <{}>", profile.name, profile.email);
    if let Some(phone) = &profile.phone {
        println!("Phone    {}", phone);
    }
    if let Some(address) = &profile.address {
        println!("Address  {}", address);
    }
    if orders.is_empty() {
        println!("No orders yet.");
    }
    for order in &orders {
        println!(
            "Order #{:<6} {:<10} {:>12}  {}",
            order.id,
            order.status,
            format_rupiah(order.total),
            order.created_at.date()
        );
    }

    Ok((profile, orders))
}
