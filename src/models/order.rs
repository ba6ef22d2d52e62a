use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::cart::CartItem;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub address: String,
    pub payment_method: PaymentMethod,
    pub total: i64,
    #[serde(default)]
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub address: String,
    pub payment_method: PaymentMethod,
}

/// Payment is display-only, nothing is charged by the client.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    EWallet,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "Cash on delivery",
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::EWallet => "E-wallet",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_round_trips_created_at_as_rfc3339() {
        let json = r#"{
            "id": 12,
            "items": [],
            "address": "Jl. Braga 1",
            "paymentMethod": "e-wallet",
            "total": 52000,
            "status": "pending",
            "createdAt": "2024-03-01T12:30:00Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();

        assert_eq!(order.payment_method, PaymentMethod::EWallet);
        assert_eq!(order.created_at.year(), 2024);
        assert!(serde_json::to_string(&order).unwrap().contains("2024-03-01T12:30:00Z"));
    }
}
