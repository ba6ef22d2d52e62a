use anyhow::bail;
use tracing::{info, warn};

use crate::config::{Command, Config};
use crate::error::ApiError;
use crate::repositories::api_repo::RestoApiRepo;
use crate::session::Session;
use crate::storage::{FileStore, KeyValueStore};

pub mod cart_controller;
pub mod order_controller;
pub mod restaurant_controller;
pub mod user_controller;
pub mod user_review_controller;

/// Everything a command needs: configuration, the API client and the session.
pub struct AppState<S: KeyValueStore> {
    pub config: Config,
    pub repo: RestoApiRepo,
    pub session: Session<S>,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(config: Config, store: S) -> anyhow::Result<Self> {
        let session = Session::new(store);
        let repo = RestoApiRepo::new(
            config.api_base_url.clone(),
            session.token().as_deref(),
            config.request_timeout(),
        )?;

        Ok(Self {
            config,
            repo,
            session,
        })
    }

    /// Rebuilds the API client so it carries the current token.
    pub fn refresh_repo(&mut self) -> anyhow::Result<()> {
        self.repo = RestoApiRepo::new(
            self.config.api_base_url.clone(),
            self.session.token().as_deref(),
            self.config.request_timeout(),
        )?;
        Ok(())
    }

    pub fn require_login(&self) -> anyhow::Result<()> {
        if !self.session.is_authenticated() {
            bail!("You need to log in first");
        }
        Ok(())
    }

    /// Logs a failed API call, applies the credential policy and turns the
    /// error into something a command can return.
    pub fn api_failure(&mut self, action: &str, e: ApiError) -> anyhow::Error {
        warn!("Something went wrong {} due to: {}", action, e);
        match self.session.handle_api_error(&e) {
            Ok(true) => {
                if let Err(refresh_error) = self.refresh_repo() {
                    warn!("Failed to rebuild the API client due to: {}", refresh_error);
                }
            }
            Ok(false) => {}
            Err(storage_error) => {
                warn!("Failed to update stored credentials due to: {}", storage_error);
            }
        }
        anyhow::Error::new(e).context(format!("Failed {}, please try again", action))
    }
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let store = FileStore::open(&config.storage_path)?;
    info!(
        environment = %config.environment,
        storage = %store.path().display(),
        "Starting eat-where-la client"
    );
    let command = config.command.clone();
    let mut app_state = AppState::new(config, store)?;

    match command {
        Command::Browse(args) => {
            restaurant_controller::browse_restaurants(&mut app_state, &args).await?;
        }
        Command::Restaurant { id } => {
            restaurant_controller::retrieve_restaurant(&mut app_state, id).await?;
        }
        Command::Reviews { id } => {
            user_review_controller::retrieve_restaurant_reviews(&mut app_state, id).await?;
        }
        Command::Review { id, star, comment } => {
            user_review_controller::add_review(&mut app_state, id, star, comment).await?;
        }
        Command::Login { email, password } => {
            user_controller::login(&mut app_state, email, password).await?;
        }
        Command::Register {
            name,
            email,
            password,
            phone,
        } => {
            user_controller::register(&mut app_state, name, email, password, phone).await?;
        }
        Command::Logout => user_controller::logout(&mut app_state)?,
        Command::Profile => {
            user_controller::retrieve_profile(&mut app_state).await?;
        }
        Command::Cart => {
            cart_controller::retrieve_cart(&mut app_state).await?;
        }
        Command::AddToCart {
            restaurant,
            menu,
            quantity,
        } => {
            cart_controller::add_to_cart(&mut app_state, restaurant, menu, quantity).await?;
        }
        Command::RemoveFromCart { item } => {
            cart_controller::remove_from_cart(&mut app_state, item).await?;
        }
        Command::Checkout { payment, address } => {
            order_controller::checkout(&mut app_state, payment, address).await?;
        }
        Command::LastOrder => {
            order_controller::show_last_order(&app_state);
        }
    }

    Ok(())
}
