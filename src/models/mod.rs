pub mod cart;
pub mod order;
pub mod rating;
pub mod restaurant;
pub mod user;
