//! SQLite implementation of the MovieRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Movie;
use crate::domain::ports::MovieRepository;

use super::{format_timestamp, parse_timestamp};

#[derive(Clone)]
pub struct SqliteMovieRepository {
    pool: SqlitePool,
}

impl SqliteMovieRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieRepository for SqliteMovieRepository {
    async fn record(&self, movies: &[Movie]) -> DomainResult<()> {
        if movies.is_empty() {
            return Ok(());
        }

        // Insert and prune run in one transaction: no reader observes a
        // written-but-unpruned group once the write settles.
        let mut tx = self.pool.begin().await?;

        for movie in movies {
            sqlx::query(
                r#"INSERT OR IGNORE INTO movies (
                       movie_id, name, alternative_name, year, country,
                       imdb_rating, kp_rating, runtime, description, genres,
                       poster_url, kp_url, imdb_url, requester_id, recorded_at
                   ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            )
            .bind(&movie.movie_id)
            .bind(&movie.name)
            .bind(&movie.alternative_name)
            .bind(movie.year)
            .bind(&movie.country)
            .bind(movie.imdb_rating)
            .bind(movie.kp_rating)
            .bind(movie.runtime)
            .bind(&movie.description)
            .bind(&movie.genres)
            .bind(&movie.poster_url)
            .bind(&movie.kp_url)
            .bind(&movie.imdb_url)
            .bind(&movie.requester)
            .bind(format_timestamp(movie.recorded_at))
            .execute(&mut *tx)
            .await?;

            // Strict `<` keeps timestamp ties alive.
            sqlx::query(
                r#"DELETE FROM movies
                   WHERE requester_id = ? AND movie_id = ?
                     AND recorded_at < (
                         SELECT MAX(recorded_at) FROM movies
                         WHERE requester_id = ? AND movie_id = ?
                     )"#,
            )
            .bind(&movie.requester)
            .bind(&movie.movie_id)
            .bind(&movie.requester)
            .bind(&movie.movie_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find(&self, movie_id: &str, requester: &str) -> DomainResult<Vec<Movie>> {
        let rows: Vec<MovieRow> = sqlx::query_as(
            "SELECT * FROM movies WHERE movie_id = ? AND requester_id = ? ORDER BY rowid",
        )
        .bind(movie_id)
        .bind(requester)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct MovieRow {
    movie_id: String,
    name: Option<String>,
    alternative_name: Option<String>,
    year: Option<i64>,
    country: Option<String>,
    imdb_rating: Option<f64>,
    kp_rating: Option<f64>,
    runtime: Option<i64>,
    description: Option<String>,
    genres: String,
    poster_url: Option<String>,
    kp_url: Option<String>,
    imdb_url: Option<String>,
    requester_id: String,
    recorded_at: String,
}

impl TryFrom<MovieRow> for Movie {
    type Error = DomainError;

    fn try_from(row: MovieRow) -> Result<Self, Self::Error> {
        let recorded_at = parse_timestamp(&row.recorded_at)?;
        Ok(Movie {
            movie_id: row.movie_id,
            name: row.name,
            alternative_name: row.alternative_name,
            year: row.year,
            country: row.country,
            imdb_rating: row.imdb_rating,
            kp_rating: row.kp_rating,
            runtime: row.runtime,
            description: row.description,
            genres: row.genres,
            poster_url: row.poster_url,
            kp_url: row.kp_url,
            imdb_url: row.imdb_url,
            requester: row.requester_id,
            recorded_at,
        })
    }
}
