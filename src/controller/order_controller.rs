use anyhow::anyhow;
use tracing::{info, warn};

use crate::checkout::{format_rupiah, CheckoutSummary};
use crate::controller::cart_controller::load_cart;
use crate::controller::AppState;
use crate::models::order::{Order, PaymentMethod};
use crate::storage::KeyValueStore;

/// Explicit address first, then the cached one, then the profile's.
async fn resolve_address<S: KeyValueStore>(
    app_state: &mut AppState<S>,
    address: Option<String>,
) -> anyhow::Result<String> {
    if let Some(address) = address.filter(|address| !address.trim().is_empty()) {
        return Ok(address);
    }
    if let Some(address) = app_state.session.cached_address() {
        return Ok(address);
    }

    let profile = match app_state.repo.retrieve_profile().await {
        Ok(profile) => profile,
        Err(e) => return Err(app_state.api_failure("retrieving profile", e)),
    };
    profile
        .address
        .ok_or_else(|| anyhow!("No delivery address known, pass one with --address"))
}

pub async fn checkout<S: KeyValueStore>(
    app_state: &mut AppState<S>,
    payment_method: PaymentMethod,
    address: Option<String>,
) -> anyhow::Result<Order> {
    let cart = load_cart(app_state).await?;
    let address = resolve_address(app_state, address).await?;
    let summary = CheckoutSummary::prepare(&cart, payment_method, &address)?;
    println!("{}", summary);

    let order = match app_state.repo.place_order(&summary.to_order()).await {
        Ok(order) => order,
        Err(e) => return Err(app_state.api_failure("placing order", e)),
    };
    info!(order_id = order.id, total = order.total, "Order placed");

    if let Err(e) = app_state.session.cache_address(&summary.address) {
        warn!("Failed to cache delivery address due to: {}", e);
    }
    if let Err(e) = app_state.session.remember_order(&order) {
        warn!("Failed to store the order snapshot due to: {}", e);
    }

    println!(
        "Order #{} placed, {} to pay by {}",
        order.id,
        format_rupiah(order.total),
        order.payment_method
    );
    Ok(order)
}

pub fn show_last_order<S: KeyValueStore>(app_state: &AppState<S>) -> Option<Order> {
    let order = app_state.session.last_order();
    match &order {
        Some(order) => {
            println!(
                "Order #{} ({}) placed {}",
                order.id, order.status, order.created_at
            );
            for item in &order.items {
                println!(
                    "  {:<32} x{:<3} {:>12}",
                    item.name,
                    item.quantity,
                    format_rupiah(item.line_total())
                );
            }
            println!("  Total {:>44}", format_rupiah(order.total));
            println!("  Deliver to {}", order.address);
        }
        None => println!("No recent order."),
    }
    order
}
