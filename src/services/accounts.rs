use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{
    error::{AuthError, AuthResult},
    models::{CredentialEntry, ProfileUpdate, User},
    services::session::SessionState,
    storage::{self, StorageKey, StoreHandle},
};

/// Success messages shown after account operations
pub mod messages {
    pub const REGISTERED: &str = "Account created successfully.";
    pub const LOGGED_IN: &str = "Logged in successfully.";
    pub const PROFILE_UPDATED: &str = "Profile updated successfully.";
    pub const PASSWORD_CHANGED: &str = "Password changed successfully.";
}

/// email -> credential entry
type AccountsMap = BTreeMap<String, CredentialEntry>;

/// Outcome of an account operation, shaped for the presentation layer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl AuthResponse {
    /// Builds a response for an operation that yields a user
    pub fn from_user_result(result: &AuthResult<User>, success_message: &str) -> Self {
        match result {
            Ok(user) => Self {
                success: true,
                message: success_message.to_string(),
                user: Some(user.clone()),
            },
            Err(e) => Self::failure(e),
        }
    }

    /// Builds a response for an operation with no payload
    pub fn from_result(result: &AuthResult<()>, success_message: &str) -> Self {
        match result {
            Ok(()) => Self {
                success: true,
                message: success_message.to_string(),
                user: None,
            },
            Err(e) => Self::failure(e),
        }
    }

    fn failure(error: &AuthError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            user: None,
        }
    }
}

/// Locally stored accounts with plaintext passwords.
///
/// The whole accounts map is read, changed and rewritten on every mutation.
/// Storage is always written before the session cell is updated.
pub struct AccountStore {
    store: StoreHandle,
    session: Arc<SessionState>,
}

impl AccountStore {
    pub fn new(store: StoreHandle, session: Arc<SessionState>) -> Self {
        Self { store, session }
    }

    fn accounts(&self) -> AccountsMap {
        storage::read_json(&*self.store, &StorageKey::AccountsMap).unwrap_or_default()
    }

    fn save_accounts(&self, accounts: &AccountsMap) -> AuthResult<()> {
        storage::write_json(&*self.store, &StorageKey::AccountsMap, accounts)?;
        Ok(())
    }

    /// Creates an account and logs it in
    pub fn register(&self, email: &str, password: &str, name: &str) -> AuthResult<User> {
        if email.trim().is_empty() || password.is_empty() || name.trim().is_empty() {
            return Err(AuthError::InvalidInput(
                "Email, password and name are required.".to_string(),
            ));
        }

        let mut accounts = self.accounts();
        if accounts.contains_key(email) {
            tracing::debug!(email = %email, "Registration rejected, email taken");
            return Err(AuthError::EmailTaken);
        }

        let user = User::new(email.to_string(), name.to_string());
        accounts.insert(
            email.to_string(),
            CredentialEntry {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        self.save_accounts(&accounts)?;
        self.session.set(user.clone())?;

        tracing::info!(user_id = %user.id, "Account registered");
        Ok(user)
    }

    /// Logs in with an exact email and password match.
    ///
    /// A failed attempt leaves the session as it was.
    pub fn login(&self, email: &str, password: &str) -> AuthResult<User> {
        let entry = self
            .accounts()
            .remove(email)
            .ok_or(AuthError::EmailNotFound)?;

        if entry.password != password {
            tracing::debug!(user_id = %entry.user.id, "Login rejected, wrong password");
            return Err(AuthError::WrongPassword);
        }

        self.session.set(entry.user.clone())?;

        tracing::info!(user_id = %entry.user.id, "Logged in");
        Ok(entry.user)
    }

    /// Ends the session. Logging out twice is fine.
    pub fn logout(&self) -> AuthResult<()> {
        let previous = self.session.current();
        self.session.clear()?;

        if let Some(user) = previous {
            tracing::info!(user_id = %user.id, "Logged out");
        }
        Ok(())
    }

    /// Merges `update` into the logged in user's profile
    pub fn update_profile(&self, update: ProfileUpdate) -> AuthResult<User> {
        let current = self.current_user().ok_or(AuthError::NotLoggedIn)?;

        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AuthError::InvalidInput("Name cannot be empty.".to_string()));
        }

        let mut accounts = self.accounts();
        let entry = accounts
            .get_mut(&current.email)
            .ok_or(AuthError::AccountMissing)?;

        entry.user.apply(update);
        let user = entry.user.clone();

        self.save_accounts(&accounts)?;
        self.session.set(user.clone())?;

        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    /// Replaces the stored password after checking the current one
    pub fn change_password(&self, current_password: &str, new_password: &str) -> AuthResult<()> {
        let current = self.current_user().ok_or(AuthError::NotLoggedIn)?;

        if new_password.is_empty() {
            return Err(AuthError::InvalidInput(
                "New password cannot be empty.".to_string(),
            ));
        }

        let mut accounts = self.accounts();
        let entry = accounts
            .get_mut(&current.email)
            .ok_or(AuthError::AccountMissing)?;

        if entry.password != current_password {
            return Err(AuthError::WrongCurrentPassword);
        }

        entry.password = new_password.to_string();
        self.save_accounts(&accounts)?;

        tracing::info!(user_id = %current.id, "Password changed");
        Ok(())
    }

    /// The user in the stored session entry, read fresh from storage
    pub fn current_user(&self) -> Option<User> {
        self.session.stored()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }
}
