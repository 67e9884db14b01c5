use greenlight_types::{
    Validator,
    validator::{no_empty_strings, unique_strings},
};
use serde::Serialize;
use sqlx::{Pool, Row as _, types::Json};
use time::PrimitiveDateTime;
use tracing::debug;

use crate::{ChosenRow, Error, error::Result, runtime::Runtime};

pub const MAX_TITLE_LEN: usize = 500;
pub const MAX_GENRES: usize = 5;
pub const FIRST_FILM_YEAR: i32 = 1888;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    pub id: i64,
    #[serde(skip)]
    pub created_at: Option<PrimitiveDateTime>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<Runtime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    pub version: i32,
}

impl Movie {
    /// Unsaved movie, store owned fields are filled in by [`MovieRepositoryImpl::insert`].
    pub fn new(
        title: impl Into<String>,
        year: Option<i32>,
        runtime: Option<Runtime>,
        genres: Option<Vec<String>>,
    ) -> Self {
        Movie {
            id: 0,
            created_at: None,
            title: title.into(),
            year,
            runtime,
            genres,
            version: 0,
        }
    }
}

impl sqlx::FromRow<'_, ChosenRow> for Movie {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        let genres: Option<Json<Vec<String>>> = row.try_get("genres")?;
        Ok(Movie {
            id: row.try_get("id")?,
            created_at: Some(row.try_get("created_at")?),
            title: row.try_get("title")?,
            year: row.try_get("year")?,
            runtime: row.try_get("runtime")?,
            genres: genres.map(|g| g.0),
            version: row.try_get("version")?,
        })
    }
}

pub fn validate_movie(v: &mut Validator, movie: &Movie) {
    let current_year = time::OffsetDateTime::now_utc().year();
    validate_movie_at(v, movie, current_year)
}

/// Same rules as [`validate_movie`], with the upper bound for `year` given explicitly.
pub fn validate_movie_at(v: &mut Validator, movie: &Movie, current_year: i32) {
    v.check(!movie.title.is_empty(), "title", "cannot be empty");
    v.check(
        movie.title.len() < MAX_TITLE_LEN,
        "title",
        "must be under 500 characters",
    );

    v.check(movie.year.is_some(), "year", "cannot be empty");
    v.check(
        movie
            .year
            .is_none_or(|y| y > FIRST_FILM_YEAR && y <= current_year),
        "year",
        "must be between 1888 and today",
    );

    v.check(movie.runtime.is_some(), "runtime", "cannot be empty");
    v.check(
        movie.runtime.is_none_or(|r| r.minutes() > 0),
        "runtime",
        "must be a positive integer",
    );

    let genres = movie.genres.as_deref().unwrap_or_default();
    v.check(movie.genres.is_some(), "genres", "cannot be empty");
    v.check(no_empty_strings(genres), "genres", "cannot be empty");
    v.check(
        !genres.is_empty() && genres.len() <= MAX_GENRES,
        "genres",
        "must have between 1 and 5 genres",
    );
    v.check(unique_strings(genres), "genres", "must be unique");
}

pub type MovieRepository = MovieRepositoryImpl<Pool<crate::ChosenDB>>;

/// CRUD access to the `movies` table.
///
/// Every method is a single statement. Inputs are expected to be validated
/// by the caller.
pub struct MovieRepositoryImpl<E> {
    executor: E,
}

fn not_found(id: i64) -> Error {
    Error::RecordNotFound(format!("Movie {id}"))
}

impl<'c, E> MovieRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Stores a new movie and writes the assigned `id`, `created_at` and `version` back into it.
    pub async fn insert(&self, movie: &mut Movie) -> Result<()> {
        const SQL: &str = r#"
        INSERT INTO movies (title, year, runtime, genres)
        VALUES (?, ?, ?, ?)
        RETURNING id, created_at, version
        "#;
        let (id, created_at, version): (i64, PrimitiveDateTime, i32) = sqlx::query_as(SQL)
            .bind(&movie.title)
            .bind(movie.year)
            .bind(movie.runtime)
            .bind(movie.genres.as_ref().map(Json))
            .fetch_one(&self.executor)
            .await?;

        movie.id = id;
        movie.created_at = Some(created_at);
        movie.version = version;
        debug!(id, "Inserted movie");
        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<Movie> {
        if id < 0 {
            return Err(not_found(id));
        }
        const SQL: &str = r#"
        SELECT id, created_at, title, year, runtime, genres, version
        FROM movies
        WHERE id = ?
        "#;
        sqlx::query_as::<_, Movie>(SQL)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Rewrites all mutable fields if the stored version still equals `movie.version`.
    ///
    /// On success the incremented version is written back into `movie`. If the
    /// row was changed since it was read, nothing is written and
    /// [`Error::EditConflict`] is returned. A missing row is [`Error::RecordNotFound`].
    pub async fn update(&self, movie: &mut Movie) -> Result<()> {
        if movie.id < 0 {
            return Err(not_found(movie.id));
        }
        const SQL: &str = r#"
        UPDATE movies
        SET title = ?, year = ?, runtime = ?, genres = ?, version = version + 1
        WHERE id = ? AND version = ?
        RETURNING version
        "#;
        let new_version: Option<i32> = sqlx::query_scalar(SQL)
            .bind(&movie.title)
            .bind(movie.year)
            .bind(movie.runtime)
            .bind(movie.genres.as_ref().map(Json))
            .bind(movie.id)
            .bind(movie.version)
            .fetch_optional(&self.executor)
            .await?;

        match new_version {
            Some(version) => {
                movie.version = version;
                Ok(())
            }
            None => {
                let current: Option<i32> =
                    sqlx::query_scalar("SELECT version FROM movies WHERE id = ?")
                        .bind(movie.id)
                        .fetch_optional(&self.executor)
                        .await?;
                debug!(
                    id = movie.id,
                    version = movie.version,
                    ?current,
                    "Update matched no row"
                );
                match current {
                    Some(_) => Err(Error::EditConflict {
                        id: movie.id,
                        version: movie.version,
                    }),
                    None => Err(not_found(movie.id)),
                }
            }
        }
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if id < 0 {
            return Err(not_found(id));
        }
        let res = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(not_found(id))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    use super::*;

    const CURRENT_YEAR: i32 = 2026;

    fn titanic() -> Movie {
        Movie::new(
            "Titanic",
            Some(1997),
            Some(Runtime::new(195)),
            Some(vec!["drama".to_string(), "romance".to_string()]),
        )
    }

    fn errors_for(movie: &Movie) -> Validator {
        let mut v = Validator::new();
        validate_movie_at(&mut v, movie, CURRENT_YEAR);
        v
    }

    #[test]
    fn test_valid_movie() {
        let v = errors_for(&titanic());
        assert!(v.valid(), "unexpected errors {:?}", v.errors());

        let mut v = Validator::new();
        validate_movie(&mut v, &titanic());
        assert!(v.valid());
    }

    #[test]
    fn test_empty_movie_reports_every_field() {
        let movie = Movie::new("", None, None, None);
        let v = errors_for(&movie);
        let errors = v.errors();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors["title"], "cannot be empty");
        assert_eq!(errors["year"], "cannot be empty");
        assert_eq!(errors["runtime"], "cannot be empty");
        assert_eq!(errors["genres"], "cannot be empty");
    }

    #[test]
    fn test_first_rule_wins_per_field() {
        let mut movie = titanic();
        // empty, too short and duplicated at once
        movie.genres = Some(vec![String::new(), String::new()]);
        let v = errors_for(&movie);
        assert_eq!(v.errors()["genres"], "cannot be empty");

        movie.genres = Some(vec![]);
        let v = errors_for(&movie);
        assert_eq!(v.errors()["genres"], "must have between 1 and 5 genres");

        movie.genres = Some(["a", "b", "c", "d", "e", "f"].map(String::from).to_vec());
        let v = errors_for(&movie);
        assert_eq!(v.errors()["genres"], "must have between 1 and 5 genres");
    }

    #[test]
    fn test_title_length() {
        let mut movie = titanic();
        movie.title = "x".repeat(499);
        assert!(errors_for(&movie).valid());
        movie.title = "x".repeat(500);
        assert_eq!(
            errors_for(&movie).errors()["title"],
            "must be under 500 characters"
        );
    }

    #[test]
    fn test_runtime_must_be_positive() {
        let mut movie = titanic();
        movie.runtime = Some(Runtime::new(0));
        assert_eq!(
            errors_for(&movie).errors()["runtime"],
            "must be a positive integer"
        );
    }

    #[test]
    fn test_year_boundaries() {
        let mut movie = titanic();
        for (year, ok) in [
            (1888, false),
            (1889, true),
            (CURRENT_YEAR, true),
            (CURRENT_YEAR + 1, false),
            (0, false),
        ] {
            movie.year = Some(year);
            assert_eq!(errors_for(&movie).valid(), ok, "year {year}");
        }
    }

    #[quickcheck]
    fn test_year_range(year: i32) -> bool {
        let mut movie = titanic();
        movie.year = Some(year);
        let v = errors_for(&movie);
        let expected_ok = year > FIRST_FILM_YEAR && year <= CURRENT_YEAR;
        v.valid() == expected_ok
    }

    #[quickcheck]
    fn test_duplicate_genres_rejected(genres: Vec<String>, pick: usize) -> TestResult {
        if genres.is_empty() {
            return TestResult::discard();
        }
        let mut genres = genres;
        let dup = genres[pick % genres.len()].clone();
        genres.push(dup);
        assert!(!unique_strings(&genres));

        let mut movie = titanic();
        movie.genres = Some(genres);
        TestResult::from_bool(errors_for(&movie).errors().contains_key("genres"))
    }

    #[quickcheck]
    fn test_empty_title_rejected(year: Option<i32>, genres: Option<Vec<String>>) -> bool {
        let movie = Movie::new("", year, None, genres);
        errors_for(&movie).errors().get("title").map(String::as_str) == Some("cannot be empty")
    }

    #[test]
    fn test_json_shape() {
        let mut movie = titanic();
        movie.id = 7;
        movie.version = 2;
        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "title": "Titanic",
                "year": 1997,
                "runtime": "195 mins",
                "genres": ["drama", "romance"],
                "version": 2
            })
        );

        let partial = Movie::new("Untitled", None, None, None);
        let json = serde_json::to_value(&partial).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 0, "title": "Untitled", "version": 0})
        );
    }
}
