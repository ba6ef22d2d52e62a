use tracing::debug;

use crate::models::cart::{Cart, CartItem};
use crate::models::restaurant::MenuItem;

/// Local cart that is updated before the backend confirms a change.
#[derive(Clone, Debug, PartialEq)]
pub struct CartState {
    cart: Cart,
    next_provisional_id: i64,
}

impl Default for CartState {
    fn default() -> Self {
        Self::new(Cart::default())
    }
}

/// The cart as it was before an optimistic change, kept for rollback.
#[must_use]
#[derive(Clone, Debug)]
pub struct PendingChange {
    previous: Cart,
}

impl CartState {
    pub fn new(cart: Cart) -> Self {
        Self {
            cart,
            next_provisional_id: -1,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.cart.items
    }

    pub fn is_empty(&self) -> bool {
        self.cart.items.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.cart.items.iter().map(|item| item.quantity).sum()
    }

    pub fn subtotal(&self) -> i64 {
        self.cart.items.iter().map(CartItem::line_total).sum()
    }

    /// Adds `quantity` of a menu item locally. Items not yet confirmed by the
    /// backend carry negative ids.
    pub fn stage_add(&mut self, menu: &MenuItem, quantity: u32) -> PendingChange {
        let pending = PendingChange {
            previous: self.cart.clone(),
        };

        match self.cart.items.iter_mut().find(|item| item.menu_id == menu.id) {
            Some(item) => item.quantity += quantity,
            None => {
                self.cart.items.push(CartItem {
                    id: self.next_provisional_id,
                    menu_id: menu.id,
                    name: menu.name.clone(),
                    price: menu.price,
                    quantity,
                });
                self.next_provisional_id -= 1;
            }
        }
        debug!(menu_id = menu.id, quantity, "Staged cart addition");
        pending
    }

    pub fn stage_remove(&mut self, cart_item_id: i64) -> Option<PendingChange> {
        let position = self
            .cart
            .items
            .iter()
            .position(|item| item.id == cart_item_id)?;
        let pending = PendingChange {
            previous: self.cart.clone(),
        };
        self.cart.items.remove(position);
        Some(pending)
    }

    /// The backend's cart replaces whatever was staged.
    pub fn commit(&mut self, _pending: PendingChange, confirmed: Cart) {
        self.cart = confirmed;
    }

    pub fn rollback(&mut self, pending: PendingChange) {
        debug!("Rolling back staged cart change");
        self.cart = pending.previous;
    }
}
