pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use api::AppState;
pub use config::Config;
pub use error::{AppError, AppResult, AuthError, AuthResult};
