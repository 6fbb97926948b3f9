use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Preset avatars offered on the profile screen
pub const AVATAR_OPTIONS: [&str; 8] = [
    "https://api.dicebear.com/7.x/avataaars/svg?seed=Felix",
    "https://api.dicebear.com/7.x/avataaars/svg?seed=Luna",
    "https://api.dicebear.com/7.x/avataaars/svg?seed=Max",
    "https://api.dicebear.com/7.x/avataaars/svg?seed=Sophie",
    "https://api.dicebear.com/7.x/avataaars/svg?seed=Charlie",
    "https://api.dicebear.com/7.x/avataaars/svg?seed=Bella",
    "https://api.dicebear.com/7.x/avataaars/svg?seed=Oscar",
    "https://api.dicebear.com/7.x/avataaars/svg?seed=Mia",
];

/// A locally registered user
///
/// `id`, `email` and `created_at` never change after registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user with a fresh time-ordered id
    pub fn new(email: String, name: String) -> Self {
        Self {
            id: Uuid::now_v7().simple().to_string(),
            email,
            name,
            avatar: None,
            phone: None,
            bio: None,
            created_at: Utc::now(),
        }
    }

    /// Applies the mutable profile fields of `update`
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(bio) = update.bio {
            self.bio = Some(bio);
        }
    }

    /// First letter of the first and last word of the name
    pub fn initials(&self) -> String {
        let words: Vec<&str> = self.name.split_whitespace().collect();
        let first_char = |w: &&str| w.chars().next();

        match (words.first(), words.last()) {
            (Some(first), Some(last)) if words.len() >= 2 => {
                first_char(first).into_iter().chain(first_char(last)).collect()
            }
            (Some(only), _) => first_char(only).map(String::from).unwrap_or_default(),
            _ => "?".to_string(),
        }
    }

    pub fn avatar_or_default(&self) -> &str {
        self.avatar.as_deref().unwrap_or(AVATAR_OPTIONS[0])
    }
}

/// Partial profile change; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

impl ProfileUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Stored account: profile plus plaintext password
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CredentialEntry {
    pub user: User,
    pub password: String,
}
