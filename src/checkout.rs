use std::fmt;

use anyhow::bail;

use crate::cart::CartState;
use crate::models::order::{NewOrder, PaymentMethod};

pub const DELIVERY_FEE: i64 = 10000;
pub const SERVICE_FEE: i64 = 2000;

/// What the checkout screen shows before the order is placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub item_count: u32,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub service_fee: i64,
    pub total: i64,
    pub payment_method: PaymentMethod,
    pub address: String,
}

impl CheckoutSummary {
    pub fn prepare(
        cart: &CartState,
        payment_method: PaymentMethod,
        address: &str,
    ) -> anyhow::Result<Self> {
        if cart.is_empty() {
            bail!("Cart is empty, add something before checking out");
        }
        let address = address.trim();
        if address.is_empty() {
            bail!("A delivery address is required to check out");
        }

        let subtotal = cart.subtotal();
        Ok(Self {
            item_count: cart.item_count(),
            subtotal,
            delivery_fee: DELIVERY_FEE,
            service_fee: SERVICE_FEE,
            total: subtotal + DELIVERY_FEE + SERVICE_FEE,
            payment_method,
            address: address.to_string(),
        })
    }

    pub fn to_order(&self) -> NewOrder {
        NewOrder {
            address: self.address.clone(),
            payment_method: self.payment_method,
        }
    }
}

impl fmt::Display for CheckoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Items       {:>12}", self.item_count)?;
        writeln!(f, "Subtotal    {:>12}", format_rupiah(self.subtotal))?;
        writeln!(f, "Delivery    {:>12}", format_rupiah(self.delivery_fee))?;
        writeln!(f, "Service     {:>12}", format_rupiah(self.service_fee))?;
        writeln!(f, "Total       {:>12}", format_rupiah(self.total))?;
        writeln!(f, "Payment     {}", self.payment_method)?;
        write!(f, "Deliver to  {}", self.address)
    }
}

/// `52000` becomes `Rp52.000`.
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}Rp{}", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::restaurant::MenuItem;

    fn cart_with(price: i64, quantity: u32) -> CartState {
        let mut cart = CartState::default();
        let menu = MenuItem {
            id: 1,
            name: "Ayam Bakar".to_string(),
            price,
            kind: None,
            image: None,
        };
        let _ = cart.stage_add(&menu, quantity);
        cart
    }

    #[test]
    fn total_adds_fees_to_the_subtotal() {
        let summary =
            CheckoutSummary::prepare(&cart_with(20000, 2), PaymentMethod::Cash, "Jl. Merdeka 1")
                .unwrap();

        assert_eq!(summary.subtotal, 40000);
        assert_eq!(summary.total, 40000 + DELIVERY_FEE + SERVICE_FEE);
        assert_eq!(summary.to_order().payment_method, PaymentMethod::Cash);
    }

    #[test]
    fn refuses_an_empty_cart_or_blank_address() {
        let empty = CartState::default();
        let filled = cart_with(20000, 1);

        assert!(CheckoutSummary::prepare(&empty, PaymentMethod::Cash, "Jl. Merdeka 1").is_err());
        assert!(CheckoutSummary::prepare(&filled, PaymentMethod::Cash, "   ").is_err());
    }

    #[test]
    fn formats_rupiah_with_thousand_separators() {
        assert_eq!(format_rupiah(0), "Rp0");
        assert_eq!(format_rupiah(950), "Rp950");
        assert_eq!(format_rupiah(52000), "Rp52.000");
        assert_eq!(format_rupiah(1250000), "Rp1.250.000");
        assert_eq!(format_rupiah(-3000), "-Rp3.000");
    }
}
