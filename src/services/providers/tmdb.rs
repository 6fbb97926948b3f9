//! TMDB catalog provider
//!
//! Every request carries `api_key` and `language`; list endpoints also take
//! `page`. Responses are decoded straight into the crate's movie models.
//!
//! Endpoints:
//! - `/movie/popular`, `/movie/top_rated`, `/trending/movie/week`
//! - `/discover/movie?with_genres=<id>&sort_by=popularity.desc`
//! - `/search/movie?query=<q>`
//! - `/movie/{id}?append_to_response=credits`

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{ApiMovieDetails, MovieDetails, MoviePage},
    services::providers::CatalogProvider,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        language: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "TMDB API key cannot be empty".to_string(),
            ));
        }

        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Poster URL for `path` at `size` (`w185`, `w342`, `w500`, `original`, ...)
    pub fn poster_url(path: &str, size: &str) -> String {
        format!("{}/{}{}", TMDB_IMAGE_BASE, size, path)
    }

    /// Backdrop URL for `path` at `size` (`w780`, `w1280`, `original`, ...)
    pub fn backdrop_url(path: &str, size: &str) -> String {
        format!("{}/{}{}", TMDB_IMAGE_BASE, size, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        tracing::debug!(path = %path, "TMDB request");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "TMDB resource not found: {}",
                path
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to deserialize TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn popular(&self, page: u32) -> AppResult<MoviePage> {
        self.get("/movie/popular", &[("page", page.to_string())])
            .await
    }

    async fn trending(&self) -> AppResult<MoviePage> {
        self.get("/trending/movie/week", &[]).await
    }

    async fn top_rated(&self, page: u32) -> AppResult<MoviePage> {
        self.get("/movie/top_rated", &[("page", page.to_string())])
            .await
    }

    async fn by_genre(&self, genre_id: u64, page: u32) -> AppResult<MoviePage> {
        self.get(
            "/discover/movie",
            &[
                ("with_genres", genre_id.to_string()),
                ("page", page.to_string()),
                ("sort_by", "popularity.desc".to_string()),
            ],
        )
        .await
    }

    async fn search(&self, query: &str) -> AppResult<MoviePage> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let page: MoviePage = self
            .get("/search/movie", &[("query", query.to_string())])
            .await?;

        tracing::info!(
            query = %query,
            results = page.results.len(),
            provider = self.name(),
            "Movie search completed"
        );

        Ok(page)
    }

    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieDetails> {
        let details: ApiMovieDetails = self
            .get(
                &format!("/movie/{}", movie_id),
                &[("append_to_response", "credits".to_string())],
            )
            .await?;

        Ok(details.into())
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const PAGE_BODY: &str = r#"{
        "page": 2,
        "results": [
            {"id": 550, "title": "Clube da Luta", "overview": "...", "poster_path": "/p.jpg",
             "release_date": "1999-10-15", "vote_average": 8.4, "backdrop_path": null}
        ],
        "total_pages": 40,
        "total_results": 800
    }"#;

    /// Answers one HTTP request with `status` and `body`; yields the request line.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 16 * 1024];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            request.lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{}/3", addr), handle)
    }

    fn provider(api_url: String) -> TmdbProvider {
        TmdbProvider::new(
            "test_key".to_string(),
            api_url,
            "pt-BR".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_poster_url() {
        assert_eq!(
            TmdbProvider::poster_url("/abc123.jpg", "w500"),
            "https://image.tmdb.org/t/p/w500/abc123.jpg"
        );
    }

    #[test]
    fn test_backdrop_url() {
        assert_eq!(
            TmdbProvider::backdrop_url("/xyz789.jpg", "original"),
            "https://image.tmdb.org/t/p/original/xyz789.jpg"
        );
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = TmdbProvider::new(
            "  ".to_string(),
            "http://test.local".to_string(),
            "pt-BR".to_string(),
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_popular_sends_key_language_and_page() {
        let (url, server) = serve_once("200 OK", PAGE_BODY).await;

        let page = provider(url).popular(2).await.unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.results[0].id, 550);
        assert_eq!(page.results[0].backdrop_path, None);

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /3/movie/popular?"));
        assert!(request_line.contains("api_key=test_key"));
        assert!(request_line.contains("language=pt-BR"));
        assert!(request_line.contains("page=2"));
    }

    #[tokio::test]
    async fn test_by_genre_sorts_by_popularity() {
        let (url, server) = serve_once("200 OK", PAGE_BODY).await;

        provider(url).by_genre(27, 1).await.unwrap();

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /3/discover/movie?"));
        assert!(request_line.contains("with_genres=27"));
        assert!(request_line.contains("sort_by=popularity.desc"));
    }

    #[tokio::test]
    async fn test_movie_details_appends_credits() {
        let body = r#"{"id": 603, "title": "Matrix", "overview": null, "poster_path": null,
            "release_date": "1999-03-31", "vote_average": 8.2, "runtime": 136,
            "genres": [{"id": 28, "name": "Ação"}],
            "credits": {"cast": [{"id": 6384, "name": "Keanu Reeves", "character": "Neo", "profile_path": null}]}}"#;
        let (url, server) = serve_once("200 OK", body).await;

        let details = provider(url).movie_details(603).await.unwrap();
        assert_eq!(details.movie.title, "Matrix");
        assert_eq!(details.movie.overview, "");
        assert_eq!(details.runtime, Some(136));
        assert_eq!(details.cast[0].character, "Neo");

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /3/movie/603?"));
        assert!(request_line.contains("append_to_response=credits"));
    }

    #[tokio::test]
    async fn test_error_status_becomes_external_api_error() {
        let (url, _server) = serve_once(
            "401 Unauthorized",
            r#"{"status_message": "Invalid API key"}"#,
        )
        .await;

        let err = provider(url).trending().await.unwrap_err();
        match err {
            AppError::ExternalApi(message) => {
                assert!(message.contains("401"));
                assert!(message.contains("Invalid API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_movie_is_not_found() {
        let (url, _server) = serve_once("404 Not Found", "{}").await;

        let err = provider(url).movie_details(1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_search_is_rejected_without_request() {
        let provider = provider("http://127.0.0.1:9".to_string());
        let err = provider.search("   ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
