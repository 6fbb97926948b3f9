use std::sync::Arc;

use crate::{
    config::Config,
    error::{AppResult, AuthResult},
    models::User,
    services::{
        feed::{self, HomeFeed},
        AccountStore, CatalogProvider, FavoritesStore, SessionState, TmdbProvider,
    },
    storage::{self, StoreHandle},
};

/// Shared application state
///
/// Built once at startup and handed to whatever drives the screens. Every
/// service in here shares the same store and session.
#[derive(Clone)]
pub struct AppState {
    pub store: StoreHandle,
    pub session: Arc<SessionState>,
    pub accounts: Arc<AccountStore>,
    pub favorites: Arc<FavoritesStore>,
    pub catalog: Arc<dyn CatalogProvider>,
}

impl AppState {
    /// Wires the services over an already opened store
    pub fn new(store: StoreHandle, catalog: Arc<dyn CatalogProvider>) -> Self {
        let session = Arc::new(SessionState::new(Arc::clone(&store)));
        let accounts = Arc::new(AccountStore::new(Arc::clone(&store), Arc::clone(&session)));
        let favorites = FavoritesStore::new(Arc::clone(&store), Arc::clone(&session));

        Self {
            store,
            session,
            accounts,
            favorites,
            catalog,
        }
    }

    /// Opens the configured store and TMDB client
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let store = storage::open_store(config)?;
        let catalog: Arc<dyn CatalogProvider> = Arc::new(TmdbProvider::from_config(config)?);

        tracing::info!(provider = catalog.name(), "Catalog provider ready");

        Ok(Self::new(store, catalog))
    }

    /// Logs in and carries guest favorites over to the account
    pub fn sign_in(&self, email: &str, password: &str) -> AuthResult<User> {
        let user = self.accounts.login(email, password)?;
        self.favorites.migrate_guest_favorites()?;
        Ok(user)
    }

    /// Registers, logs in and carries guest favorites over to the account
    pub fn sign_up(&self, email: &str, password: &str, name: &str) -> AuthResult<User> {
        let user = self.accounts.register(email, password, name)?;
        self.favorites.migrate_guest_favorites()?;
        Ok(user)
    }

    pub async fn home_feed(&self) -> AppResult<HomeFeed> {
        feed::load_home_feed(Arc::clone(&self.catalog), &self.favorites).await
    }
}
