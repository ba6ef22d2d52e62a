use anyhow::{anyhow, bail};
use tracing::info;

use crate::cart::CartState;
use crate::checkout::format_rupiah;
use crate::controller::AppState;
use crate::models::cart::AddCartItem;
use crate::storage::KeyValueStore;

pub fn print_cart(cart: &CartState) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for item in cart.items() {
        println!(
            "  #{:<5} {:<32} x{:<3} {:>12}",
            item.id,
            item.name,
            item.quantity,
            format_rupiah(item.line_total())
        );
    }
    println!("  Subtotal {:>44}", format_rupiah(cart.subtotal()));
}

pub async fn load_cart<S: KeyValueStore>(
    app_state: &mut AppState<S>,
) -> anyhow::Result<CartState> {
    app_state.require_login()?;
    match app_state.repo.retrieve_cart().await {
        Ok(cart) => Ok(CartState::new(cart)),
        Err(e) => Err(app_state.api_failure("retrieving cart", e)),
    }
}

pub async fn retrieve_cart<S: KeyValueStore>(
    app_state: &mut AppState<S>,
) -> anyhow::Result<CartState> {
    let cart = load_cart(app_state).await?;
    print_cart(&cart);
    Ok(cart)
}

/// Shows the item in the cart straight away and reverts it if the backend
/// refuses.
pub async fn add_to_cart<S: KeyValueStore>(
    app_state: &mut AppState<S>,
    restaurant_id: i64,
    menu_id: i64,
    quantity: u32,
) -> anyhow::Result<CartState> {
    if quantity == 0 {
        bail!("Quantity must be at least 1");
    }
    let mut cart = load_cart(app_state).await?;
    let detail = match app_state.repo.retrieve_restaurant(restaurant_id).await {
        Ok(detail) => detail,
        Err(e) => return Err(app_state.api_failure("retrieving restaurant", e)),
    };
    let menu = detail
        .menus
        .iter()
        .find(|menu| menu.id == menu_id)
        .ok_or_else(|| anyhow!("{} has no menu item #{}", detail.restaurant.name, menu_id))?;

    let pending = cart.stage_add(menu, quantity);
    print_cart(&cart);

    let request = AddCartItem { menu_id, quantity };
    match app_state.repo.add_to_cart(&request).await {
        Ok(confirmed) => {
            cart.commit(pending, confirmed);
            info!(menu_id, quantity, "Added to cart");
            println!("Successfully added {} to the cart", menu.name);
            Ok(cart)
        }
        Err(e) => {
            cart.rollback(pending);
            print_cart(&cart);
            Err(app_state.api_failure("adding to cart", e))
        }
    }
}

pub async fn remove_from_cart<S: KeyValueStore>(
    app_state: &mut AppState<S>,
    cart_item_id: i64,
) -> anyhow::Result<CartState> {
    let mut cart = load_cart(app_state).await?;
    let pending = cart
        .stage_remove(cart_item_id)
        .ok_or_else(|| anyhow!("Cart has no item #{}", cart_item_id))?;

    match app_state.repo.remove_from_cart(cart_item_id).await {
        Ok(confirmed) => {
            cart.commit(pending, confirmed);
            print_cart(&cart);
            Ok(cart)
        }
        Err(e) => {
            cart.rollback(pending);
            Err(app_state.api_failure("removing from cart", e))
        }
    }
}
