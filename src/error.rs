/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Expected failures of account operations.
///
/// These are ordinary values the presentation layer shows to the user; the
/// `Display` text is the user-facing message.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("This email is already registered.")]
    EmailTaken,

    #[error("Email not found.")]
    EmailNotFound,

    #[error("Incorrect password.")]
    WrongPassword,

    #[error("User is not logged in.")]
    NotLoggedIn,

    /// A session exists but its account entry is gone.
    #[error("User not found.")]
    AccountMissing,

    #[error("Current password is incorrect.")]
    WrongCurrentPassword,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] AppError),
}

pub type AuthResult<T> = Result<T, AuthError>;
