use serde::{Deserialize, Deserializer, Serialize};

/// A movie as listed by the catalog and stored in favorites
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Catalog identifier, unique within a favorites list
    pub id: u64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    /// Average user rating (0-10)
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
}

/// TMDB sends `null` for some text fields; treat that like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Genre tag on a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Well-known TMDB genre ids used by the home feed rows
pub mod genres {
    pub const ACTION: u64 = 28;
    pub const COMEDY: u64 = 35;
    pub const DRAMA: u64 = 18;
    pub const HORROR: u64 = 27;
}

/// A billed cast member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Full movie record shown on the details screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    pub genres: Vec<Genre>,
    /// Runtime in minutes, unknown for unreleased titles
    pub runtime: Option<u32>,
    pub cast: Vec<CastMember>,
}

impl From<MovieDetails> for Movie {
    fn from(details: MovieDetails) -> Self {
        details.movie
    }
}

/// One page of catalog results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoviePage {
    #[serde(default = "first_page")]
    pub page: u32,
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_deserializes_tmdb_result_with_nulls() {
        let json = r#"{
            "id": 550,
            "title": "Fight Club",
            "overview": null,
            "poster_path": null,
            "release_date": "1999-10-15",
            "vote_average": 8.4,
            "backdrop_path": null,
            "popularity": 61.4
        }"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 550);
        assert_eq!(movie.overview, "");
        assert_eq!(movie.poster_path, None);
        assert_eq!(movie.release_date, "1999-10-15");
        assert_eq!(movie.backdrop_path, None);
    }

    #[test]
    fn test_movie_without_backdrop_omits_field() {
        let movie = Movie {
            id: 1,
            title: "A".to_string(),
            overview: String::new(),
            poster_path: Some("/a.jpg".to_string()),
            release_date: "2020-01-01".to_string(),
            vote_average: 7.0,
            backdrop_path: None,
        };

        let json = serde_json::to_value(&movie).unwrap();
        assert!(json.get("backdrop_path").is_none());
        assert_eq!(json["poster_path"], "/a.jpg");
    }

    #[test]
    fn test_details_flatten_and_convert_back_to_movie() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "overview": "Dreams within dreams",
            "poster_path": "/inception.jpg",
            "release_date": "2010-07-15",
            "vote_average": 8.4,
            "genres": [{"id": 28, "name": "Action"}],
            "runtime": 148,
            "cast": [{"id": 6193, "name": "Leonardo DiCaprio", "character": "Cobb", "profile_path": null}]
        }"#;

        let details: MovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.genres[0].id, genres::ACTION);
        assert_eq!(details.runtime, Some(148));
        assert_eq!(details.cast[0].character, "Cobb");

        let movie: Movie = details.into();
        assert_eq!(movie.id, 27205);
        assert_eq!(movie.title, "Inception");
    }

    #[test]
    fn test_movie_page_defaults() {
        let page: MoviePage = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.results.is_empty());
    }
}
