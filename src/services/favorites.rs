use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;

use crate::{
    error::AppResult,
    models::{Movie, User},
    services::{
        observable::{Observable, SubscriptionId},
        session::SessionState,
    },
    storage::{self, Identity, KeyValueStore, StorageKey, StoreHandle},
};

/// Movies loaded for one identity
#[derive(Debug)]
struct Partition {
    identity: Identity,
    movies: Vec<Movie>,
}

/// Per-identity favorites list that follows the session.
///
/// The store listens to [`SessionState`] and swaps to the partition of the
/// new identity whenever it changes; redundant session notifications for the
/// same identity do not reload. Every mutation rewrites the whole partition in
/// storage before the in-memory list changes.
pub struct FavoritesStore {
    store: StoreHandle,
    session: Arc<SessionState>,
    partition: Mutex<Partition>,
    favorites: Observable<Vec<Movie>>,
    session_subscription: Mutex<Option<SubscriptionId>>,
}

impl FavoritesStore {
    /// Loads the partition of the current session and starts following it
    pub fn new(store: StoreHandle, session: Arc<SessionState>) -> Arc<Self> {
        let identity = session.identity();
        let movies = load_partition(&*store, &identity);

        tracing::debug!(identity = ?identity, count = movies.len(), "Favorites loaded");

        let favorites = Arc::new(Self {
            store,
            session: Arc::clone(&session),
            partition: Mutex::new(Partition {
                identity,
                movies: movies.clone(),
            }),
            favorites: Observable::new(movies),
            session_subscription: Mutex::new(None),
        });

        let weak: Weak<Self> = Arc::downgrade(&favorites);
        let id = session.subscribe(move |user| {
            if let Some(favorites) = weak.upgrade() {
                favorites.on_session_change(user.as_ref());
            }
        });
        *favorites.subscription() = Some(id);

        favorites
    }

    fn partition(&self) -> MutexGuard<'_, Partition> {
        self.partition.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscription(&self) -> MutexGuard<'_, Option<SubscriptionId>> {
        self.session_subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn on_session_change(&self, user: Option<&User>) {
        let identity = Identity::of(user);

        let movies = {
            let mut partition = self.partition();
            if partition.identity == identity {
                return;
            }

            let movies = load_partition(&*self.store, &identity);
            tracing::debug!(
                from = ?partition.identity,
                to = ?identity,
                count = movies.len(),
                "Switched favorites partition"
            );

            partition.identity = identity;
            partition.movies = movies.clone();
            movies
        };

        self.favorites.publish(movies);
    }

    /// Runs `f` on a copy of the list; when it reports a change the copy is
    /// persisted, committed and published.
    fn mutate<F>(&self, f: F) -> AppResult<()>
    where
        F: FnOnce(&mut Vec<Movie>) -> bool,
    {
        let movies = {
            let mut partition = self.partition();
            let mut next = partition.movies.clone();
            if !f(&mut next) {
                return Ok(());
            }

            let key = StorageKey::Favorites(partition.identity.clone());
            storage::write_json(&*self.store, &key, &next)?;
            partition.movies = next.clone();
            next
        };

        self.favorites.publish(movies);
        Ok(())
    }

    pub fn favorites(&self) -> Vec<Movie> {
        self.partition().movies.clone()
    }

    pub fn is_favorite(&self, movie_id: u64) -> bool {
        self.partition().movies.iter().any(|m| m.id == movie_id)
    }

    /// Appends `movie` unless a movie with its id is already listed
    pub fn add_favorite(&self, movie: Movie) -> AppResult<()> {
        self.mutate(|movies| {
            if movies.iter().any(|m| m.id == movie.id) {
                return false;
            }
            movies.push(movie);
            true
        })
    }

    pub fn remove_favorite(&self, movie_id: u64) -> AppResult<()> {
        self.mutate(|movies| {
            movies.retain(|m| m.id != movie_id);
            true
        })
    }

    /// Removes `movie` if listed, adds it otherwise. Returns whether it is a
    /// favorite afterwards.
    pub fn toggle_favorite(&self, movie: Movie) -> AppResult<bool> {
        if self.is_favorite(movie.id) {
            self.remove_favorite(movie.id)?;
            Ok(false)
        } else {
            self.add_favorite(movie)?;
            Ok(true)
        }
    }

    pub fn favorites_count(&self) -> usize {
        self.partition().movies.len()
    }

    /// Empties the active partition
    pub fn clear_favorites(&self) -> AppResult<()> {
        self.mutate(|movies| {
            movies.clear();
            true
        })
    }

    /// Moves guest favorites into the logged in user's list.
    ///
    /// The user's movies keep their order, guest movies not already present
    /// are appended in guest order and the guest partition is deleted. Does
    /// nothing while logged out. Returns how many movies were added.
    ///
    /// The merged list is committed once the user partition is written, so a
    /// failure deleting the guest key leaves nothing stale in memory and a
    /// retry adds no duplicates.
    pub fn migrate_guest_favorites(&self) -> AppResult<usize> {
        let guest_key = StorageKey::Favorites(Identity::Guest);

        let (user_id, added, movies) = {
            let mut partition = self.partition();
            let user_id = match &partition.identity {
                Identity::User(id) => id.clone(),
                Identity::Guest => return Ok(0),
            };

            let guest: Vec<Movie> = storage::read_json(&*self.store, &guest_key).unwrap_or_default();

            let mut merged = partition.movies.clone();
            for movie in guest {
                if !merged.iter().any(|m| m.id == movie.id) {
                    merged.push(movie);
                }
            }
            let added = merged.len() - partition.movies.len();

            let user_key = StorageKey::Favorites(Identity::User(user_id.clone()));
            storage::write_json(&*self.store, &user_key, &merged)?;
            partition.movies = merged.clone();

            (user_id, added, merged)
        };

        self.favorites.publish(movies);

        storage::remove(&*self.store, &guest_key)?;

        tracing::info!(user_id = %user_id, added, "Migrated guest favorites");
        Ok(added)
    }

    /// Leading favorites for the "continue watching" row
    pub fn continue_watching(&self, limit: usize) -> Vec<Movie> {
        self.partition().movies.iter().take(limit).cloned().collect()
    }

    /// Calls `listener` with the list now and after every change
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Vec<Movie>) + Send + Sync + 'static,
    {
        self.favorites.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.favorites.unsubscribe(id)
    }

    pub fn watch(&self) -> watch::Receiver<Vec<Movie>> {
        self.favorites.watch()
    }
}

impl Drop for FavoritesStore {
    fn drop(&mut self) {
        if let Some(id) = self.subscription().take() {
            self.session.unsubscribe(id);
        }
    }
}

fn load_partition(store: &dyn KeyValueStore, identity: &Identity) -> Vec<Movie> {
    storage::read_json(store, &StorageKey::Favorites(identity.clone())).unwrap_or_default()
}
