pub mod accounts;
pub mod favorites;
pub mod feed;
pub mod observable;
pub mod providers;
pub mod session;
pub mod validation;

pub use accounts::{messages, AccountStore, AuthResponse};
pub use favorites::FavoritesStore;
pub use feed::{load_home_feed, search_movies, HomeFeed};
pub use observable::{Observable, SubscriptionId};
pub use providers::{CatalogProvider, TmdbProvider};
pub use session::SessionState;
