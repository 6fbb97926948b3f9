use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{genres, Movie, MoviePage},
    services::{favorites::FavoritesStore, providers::CatalogProvider},
};

/// Movies in the featured carousel
pub const FEATURED_LIMIT: usize = 5;
/// Movies per browsing row
pub const ROW_LIMIT: usize = 10;
/// Shortest query sent to catalog search
pub const MIN_SEARCH_LEN: usize = 3;

/// Rows of the home screen
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct HomeFeed {
    pub popular: Vec<Movie>,
    pub featured: Vec<Movie>,
    pub trending: Vec<Movie>,
    pub top_rated: Vec<Movie>,
    pub action: Vec<Movie>,
    pub comedy: Vec<Movie>,
    pub drama: Vec<Movie>,
    pub horror: Vec<Movie>,
    pub continue_watching: Vec<Movie>,
    pub total_pages: u32,
}

fn leading(movies: &[Movie], limit: usize) -> Vec<Movie> {
    movies.iter().take(limit).cloned().collect()
}

/// Awaits one optional row; a failure is logged and yields an empty row
async fn row<F>(name: &'static str, request: F) -> Vec<Movie>
where
    F: Future<Output = AppResult<MoviePage>>,
{
    match request.await {
        Ok(page) => leading(&page.results, ROW_LIMIT),
        Err(e) => {
            tracing::warn!(row = name, error = %e, "Home feed row failed");
            Vec::new()
        }
    }
}

/// Loads every home row concurrently.
///
/// Only the popular query is required; any other failed row comes back empty.
pub async fn load_home_feed(
    provider: Arc<dyn CatalogProvider>,
    favorites: &FavoritesStore,
) -> AppResult<HomeFeed> {
    let (popular, trending, top_rated, action, comedy, drama, horror) = tokio::join!(
        provider.popular(1),
        row("trending", provider.trending()),
        row("top_rated", provider.top_rated(1)),
        row("action", provider.by_genre(genres::ACTION, 1)),
        row("comedy", provider.by_genre(genres::COMEDY, 1)),
        row("drama", provider.by_genre(genres::DRAMA, 1)),
        row("horror", provider.by_genre(genres::HORROR, 1)),
    );

    let popular = popular.inspect_err(|e| {
        tracing::error!(error = %e, provider = provider.name(), "Failed to load popular movies");
    })?;

    Ok(HomeFeed {
        featured: leading(&popular.results, FEATURED_LIMIT),
        total_pages: popular.total_pages,
        popular: popular.results,
        trending,
        top_rated,
        action,
        comedy,
        drama,
        horror,
        continue_watching: favorites.continue_watching(ROW_LIMIT),
    })
}

/// Search box behaviour: short queries browse popular movies instead
pub async fn search_movies(
    provider: Arc<dyn CatalogProvider>,
    query: &str,
    page: u32,
) -> AppResult<MoviePage> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_LEN {
        return provider.popular(page).await;
    }
    provider.search(query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::{providers::MockCatalogProvider, session::SessionState};
    use crate::storage::{InMemoryStore, StoreHandle};
    use mockall::predicate::eq;

    fn movie(id: u64) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            overview: String::new(),
            poster_path: None,
            release_date: String::new(),
            vote_average: 0.0,
            backdrop_path: None,
        }
    }

    fn page_of(ids: std::ops::RangeInclusive<u64>) -> MoviePage {
        let results: Vec<Movie> = ids.map(movie).collect();
        MoviePage {
            page: 1,
            total_results: results.len() as u32,
            results,
            total_pages: 3,
        }
    }

    fn favorites() -> Arc<FavoritesStore> {
        let store: StoreHandle = Arc::new(InMemoryStore::new());
        let session = Arc::new(SessionState::new(Arc::clone(&store)));
        FavoritesStore::new(store, session)
    }

    fn ids(movies: &[Movie]) -> Vec<u64> {
        movies.iter().map(|m| m.id).collect()
    }

    #[tokio::test]
    async fn test_home_feed_composes_rows() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_popular()
            .with(eq(1))
            .returning(|_| Ok(page_of(1..=20)));
        mock.expect_trending().returning(|| Ok(page_of(100..=120)));
        mock.expect_top_rated().returning(|_| Ok(page_of(200..=205)));
        mock.expect_by_genre()
            .returning(|genre, _| Ok(page_of(genre * 1000..=genre * 1000 + 15)));
        mock.expect_name().return_const("mock");

        let favorites = favorites();
        favorites.add_favorite(movie(7)).unwrap();

        let feed = load_home_feed(Arc::new(mock), &favorites).await.unwrap();

        assert_eq!(feed.popular.len(), 20);
        assert_eq!(ids(&feed.featured), vec![1, 2, 3, 4, 5]);
        assert_eq!(feed.trending.len(), ROW_LIMIT);
        assert_eq!(feed.top_rated.len(), 6);
        assert_eq!(feed.action[0].id, 28_000);
        assert_eq!(feed.comedy[0].id, 35_000);
        assert_eq!(feed.drama[0].id, 18_000);
        assert_eq!(feed.horror.len(), ROW_LIMIT);
        assert_eq!(ids(&feed.continue_watching), vec![7]);
        assert_eq!(feed.total_pages, 3);
    }

    #[tokio::test]
    async fn test_failed_secondary_row_is_empty() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_popular().returning(|_| Ok(page_of(1..=3)));
        mock.expect_trending()
            .returning(|| Err(AppError::ExternalApi("boom".to_string())));
        mock.expect_top_rated().returning(|_| Ok(page_of(1..=3)));
        mock.expect_by_genre().returning(|_, _| Ok(page_of(1..=3)));
        mock.expect_name().return_const("mock");

        let feed = load_home_feed(Arc::new(mock), &favorites()).await.unwrap();
        assert!(feed.trending.is_empty());
        assert_eq!(feed.popular.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_popular_fails_feed() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_popular()
            .returning(|_| Err(AppError::ExternalApi("down".to_string())));
        mock.expect_trending().returning(|| Ok(page_of(1..=3)));
        mock.expect_top_rated().returning(|_| Ok(page_of(1..=3)));
        mock.expect_by_genre().returning(|_, _| Ok(page_of(1..=3)));
        mock.expect_name().return_const("mock");

        let result = load_home_feed(Arc::new(mock), &favorites()).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_short_query_browses_popular() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_popular()
            .with(eq(2))
            .times(1)
            .returning(|_| Ok(page_of(1..=2)));
        mock.expect_search().times(0);

        let page = search_movies(Arc::new(mock), " ab ", 2).await.unwrap();
        assert_eq!(page.results.len(), 2);
    }

    #[tokio::test]
    async fn test_long_query_searches() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_search()
            .withf(|q| q == "matrix")
            .times(1)
            .returning(|_| Ok(page_of(603..=603)));

        let page = search_movies(Arc::new(mock), " matrix ", 1).await.unwrap();
        assert_eq!(ids(&page.results), vec![603]);
    }
}
