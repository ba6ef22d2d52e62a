pub mod cart;
pub mod checkout;
pub mod config;
pub mod controller;
pub mod error;
pub mod listing;
pub mod models;
pub mod repositories;
pub mod session;
pub mod storage;
