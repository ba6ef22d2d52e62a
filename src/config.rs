use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::listing::geo::DistanceBucket;
use crate::listing::geolocation::ConfiguredGeolocator;
use crate::models::order::PaymentMethod;

#[derive(Parser, Clone, Debug)]
#[command(author, version, about)]
pub struct Config {
    #[clap(env, long, default_value = "development")]
    pub environment: String,

    /// Base URL of the restaurant REST backend.
    #[clap(env, long)]
    pub api_base_url: String,

    /// Where the session (token, address, last order) is persisted.
    #[clap(env, long, default_value = ".eat-where-la/session.json")]
    pub storage_path: PathBuf,

    #[clap(env, long, default_value_t = 10)]
    pub page_limit: u32,

    #[clap(env, long, default_value_t = 1000.0)]
    pub scroll_threshold_px: f64,

    #[clap(env, long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    #[clap(env, long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    #[clap(env, long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn geolocator(&self) -> ConfiguredGeolocator {
        ConfiguredGeolocator::from_parts(self.latitude, self.longitude)
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Browse restaurants with client-side filters.
    Browse(BrowseArgs),

    /// Show a restaurant and its menu.
    Restaurant { id: i64 },

    /// List reviews of a restaurant.
    Reviews { id: i64 },

    /// Review a restaurant.
    Review {
        id: i64,

        #[clap(long)]
        star: f64,

        #[clap(long, default_value = "")]
        comment: String,
    },

    Login {
        #[clap(long)]
        email: String,

        #[clap(long, env = "EAT_WHERE_LA_PASSWORD")]
        password: String,
    },

    Register {
        #[clap(long)]
        name: String,

        #[clap(long)]
        email: String,

        #[clap(long, env = "EAT_WHERE_LA_PASSWORD")]
        password: String,

        #[clap(long)]
        phone: Option<String>,
    },

    Logout,

    /// Show the profile and order history.
    Profile,

    /// Show the cart.
    Cart,

    AddToCart {
        #[clap(long)]
        restaurant: i64,

        #[clap(long)]
        menu: i64,

        #[clap(long, default_value_t = 1)]
        quantity: u32,
    },

    RemoveFromCart { item: i64 },

    /// Place an order for everything in the cart.
    Checkout {
        #[clap(long, value_enum, default_value_t = PaymentMethod::Cash)]
        payment: PaymentMethod,

        /// Falls back to the cached address, then the profile address.
        #[clap(long)]
        address: Option<String>,
    },

    /// Show the last order placed from this machine.
    LastOrder,
}

#[derive(Args, Clone, Debug, Default)]
pub struct BrowseArgs {
    #[clap(long)]
    pub category: Option<String>,

    /// Matched against name and place.
    #[clap(long)]
    pub search: Option<String>,

    #[clap(long = "distance", value_enum)]
    pub distances: Vec<DistanceBucket>,

    #[clap(long = "rating", value_parser = clap::value_parser!(u8).range(1..=5))]
    pub ratings: Vec<u8>,

    #[clap(long)]
    pub min_price: Option<String>,

    #[clap(long)]
    pub max_price: Option<String>,

    /// How many pages to scroll through at most.
    #[clap(long, default_value_t = 3)]
    pub pages: u32,
}
