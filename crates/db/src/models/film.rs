//! Row types for the `film`, `studio` and `producer` tables.

use chrono::NaiveDate;
use filmdb_core::error::CoreError;
use filmdb_core::film::{Film, Producer, Studio};
use filmdb_core::types::{DbId, Timestamp, Version};
use sqlx::FromRow;

/// A `film` row joined with its `studio`.
#[derive(Debug, Clone, FromRow)]
pub struct FilmRow {
    pub id: DbId,
    pub version: Version,
    pub title: String,
    pub rating: Option<i32>,
    pub price: f64,
    pub discount: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub imdb_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub provider: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub studio_id: DbId,
    pub studio_name: String,
}

/// A row from the `producer` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProducerRow {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub film_id: DbId,
}

impl From<ProducerRow> for Producer {
    fn from(row: ProducerRow) -> Self {
        Producer {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            film_id: row.film_id,
        }
    }
}

impl FilmRow {
    /// Assemble the domain record. `producers` is `None` when they were not loaded.
    pub fn into_film(self, producers: Option<Vec<Producer>>) -> Result<Film, CoreError> {
        let provider = self
            .provider
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|e: CoreError| {
                CoreError::Internal(format!("film {} has a bad provider: {e}", self.id))
            })?;

        Ok(Film {
            id: self.id,
            version: self.version,
            title: self.title,
            rating: self.rating,
            price: self.price,
            discount: self.discount,
            release_date: self.release_date,
            imdb_url: self.imdb_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
            genres: self.genres,
            provider,
            studio: Some(Studio {
                id: self.studio_id,
                name: self.studio_name,
                film_id: self.id,
            }),
            producers,
        })
    }
}
