use anyhow::Context;

use cinewave::{logging, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = Config::from_env()?;
    let state = AppState::from_config(&config).context("Failed to initialize application state")?;

    match state.session.current() {
        Some(user) => tracing::info!(user_id = %user.id, name = %user.name, "Welcome back"),
        None => tracing::info!("Browsing as guest"),
    }
    tracing::info!(
        favorites = state.favorites.favorites_count(),
        "Favorites loaded"
    );

    let feed = state.home_feed().await.context("Failed to load home feed")?;

    tracing::info!(
        featured = feed.featured.len(),
        trending = feed.trending.len(),
        top_rated = feed.top_rated.len(),
        action = feed.action.len(),
        comedy = feed.comedy.len(),
        drama = feed.drama.len(),
        horror = feed.horror.len(),
        continue_watching = feed.continue_watching.len(),
        "Home feed ready"
    );

    Ok(())
}
