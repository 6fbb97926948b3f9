//! Movie catalog abstraction
//!
//! The home, search and details screens read everything through a
//! [`CatalogProvider`]. TMDB is the only source today; the trait keeps the
//! feed composition testable without the network.

use crate::{
    error::AppResult,
    models::{MovieDetails, MoviePage},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Read-only, paginated movie catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Most popular movies right now
    async fn popular(&self, page: u32) -> AppResult<MoviePage>;

    /// Trending movies of the week
    async fn trending(&self) -> AppResult<MoviePage>;

    async fn top_rated(&self, page: u32) -> AppResult<MoviePage>;

    /// Movies of one genre, most popular first
    async fn by_genre(&self, genre_id: u64, page: u32) -> AppResult<MoviePage>;

    /// Title search. An empty query is rejected.
    async fn search(&self, query: &str) -> AppResult<MoviePage>;

    /// Full record with genres, runtime and the leading cast members
    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieDetails>;

    /// Provider name for logs
    fn name(&self) -> &'static str;
}
