#![allow(dead_code)]

use std::sync::Arc;

use cinewave::{
    error::AppResult,
    models::{Movie, MovieDetails, MoviePage},
    services::CatalogProvider,
    storage::{InMemoryStore, StoreHandle},
    AppState,
};
use mockall::mock;

mock! {
    pub Catalog {}

    #[async_trait::async_trait]
    impl CatalogProvider for Catalog {
        async fn popular(&self, page: u32) -> AppResult<MoviePage>;
        async fn trending(&self) -> AppResult<MoviePage>;
        async fn top_rated(&self, page: u32) -> AppResult<MoviePage>;
        async fn by_genre(&self, genre_id: u64, page: u32) -> AppResult<MoviePage>;
        async fn search(&self, query: &str) -> AppResult<MoviePage>;
        async fn movie_details(&self, movie_id: u64) -> AppResult<MovieDetails>;
        fn name(&self) -> &'static str;
    }
}

pub fn movie(id: u64) -> Movie {
    Movie {
        id,
        title: format!("Movie {}", id),
        overview: String::new(),
        poster_path: Some(format!("/poster{}.jpg", id)),
        release_date: "2020-01-01".to_string(),
        vote_average: 6.5,
        backdrop_path: None,
    }
}

pub fn ids(movies: &[Movie]) -> Vec<u64> {
    movies.iter().map(|m| m.id).collect()
}

pub fn state_over(store: StoreHandle) -> AppState {
    AppState::new(store, Arc::new(MockCatalog::new()))
}

pub fn test_state() -> (StoreHandle, AppState) {
    let store: StoreHandle = Arc::new(InMemoryStore::new());
    let state = state_over(Arc::clone(&store));
    (store, state)
}
