use serde::Deserialize;

pub mod movie;
pub mod user;

pub use movie::{genres, CastMember, Genre, Movie, MovieDetails, MoviePage};
pub use user::{CredentialEntry, ProfileUpdate, User, AVATAR_OPTIONS};

/// Number of billed cast members kept on a details record
pub const CAST_LIMIT: usize = 10;

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw response from `/movie/{id}?append_to_response=credits`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub credits: Option<ApiCredits>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCredits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

impl From<ApiMovieDetails> for MovieDetails {
    fn from(api: ApiMovieDetails) -> Self {
        let cast = api
            .credits
            .map(|credits| credits.cast.into_iter().take(CAST_LIMIT).collect())
            .unwrap_or_default();

        MovieDetails {
            movie: api.movie,
            genres: api.genres,
            runtime: api.runtime,
            cast,
        }
    }
}
