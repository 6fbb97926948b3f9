use tokio::sync::watch;

use crate::{
    error::AppResult,
    models::User,
    services::observable::{Observable, SubscriptionId},
    storage::{self, Identity, StorageKey, StoreHandle},
};

/// The logged in user, if any.
///
/// Backed by the `current-session` storage entry. Every change is written to
/// storage first and published second, so after a crash the stored value is
/// the last one that was durably written.
pub struct SessionState {
    store: StoreHandle,
    current: Observable<Option<User>>,
}

impl SessionState {
    /// Restores the session saved in `store`
    pub fn new(store: StoreHandle) -> Self {
        let restored: Option<User> = storage::read_json(&*store, &StorageKey::CurrentSession);

        match &restored {
            Some(user) => tracing::info!(user_id = %user.id, "Restored session"),
            None => tracing::debug!("No saved session"),
        }

        Self {
            store,
            current: Observable::new(restored),
        }
    }

    /// In-memory current user
    pub fn current(&self) -> Option<User> {
        self.current.get()
    }

    /// Favorites partition of the current user
    pub fn identity(&self) -> Identity {
        Identity::of(self.current().as_ref())
    }

    /// Reads the session entry straight from storage, bypassing the cell
    pub fn stored(&self) -> Option<User> {
        storage::read_json(&*self.store, &StorageKey::CurrentSession)
    }

    pub fn set(&self, user: User) -> AppResult<()> {
        storage::write_json(&*self.store, &StorageKey::CurrentSession, &user)?;
        self.current.publish(Some(user));
        Ok(())
    }

    pub fn clear(&self) -> AppResult<()> {
        storage::remove(&*self.store, &StorageKey::CurrentSession)?;
        self.current.publish(None);
        Ok(())
    }

    /// Calls `listener` now and after every change
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Option<User>) + Send + Sync + 'static,
    {
        self.current.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.current.unsubscribe(id)
    }

    pub fn watch(&self) -> watch::Receiver<Option<User>> {
        self.current.watch()
    }
}
