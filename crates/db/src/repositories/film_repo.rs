//! Repository for the `film`, `studio` and `producer` tables.

use filmdb_core::film::{Film, NewFilm};
use filmdb_core::predicate::Value;
use filmdb_core::types::{DbId, Version};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgConnection, PgPool, Postgres};

use crate::filter::SqlFilter;
use crate::models::film::{FilmRow, ProducerRow};

/// Film columns joined with the studio. Always followed by a WHERE/ORDER BY.
const FILM_SELECT: &str = "SELECT f.id, f.version, f.title, f.rating, f.price, f.discount, \
    f.release_date, f.imdb_url, f.genres, f.provider, f.created_at, f.updated_at, \
    s.id AS studio_id, s.name AS studio_name \
    FROM film f JOIN studio s ON s.film_id = f.id";

/// Column list for the `producer` table.
const PRODUCER_COLUMNS: &str = "id, first_name, last_name, film_id";

/// Provides reads and writes for films and their owned rows.
pub struct FilmRepo;

impl FilmRepo {
    /// Find a film with its studio by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FilmRow>, sqlx::Error> {
        let query = format!("{FILM_SELECT} WHERE f.id = $1");
        sqlx::query_as::<_, FilmRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List films with their studio, filtered by a rendered predicate.
    pub async fn list(pool: &PgPool, filter: &SqlFilter) -> Result<Vec<FilmRow>, sqlx::Error> {
        let query = format!("{FILM_SELECT}{} ORDER BY f.id", filter.clause);
        let mut q = sqlx::query_as::<_, FilmRow>(&query);
        for value in &filter.binds {
            q = bind_value(q, value);
        }
        q.fetch_all(pool).await
    }

    /// All producers of a film, in insertion order.
    pub async fn find_producers(
        pool: &PgPool,
        film_id: DbId,
    ) -> Result<Vec<ProducerRow>, sqlx::Error> {
        let query = format!("SELECT {PRODUCER_COLUMNS} FROM producer WHERE film_id = $1 ORDER BY id");
        sqlx::query_as::<_, ProducerRow>(&query)
            .bind(film_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a film, its studio and its producers in one transaction.
    pub async fn create(pool: &PgPool, input: &NewFilm) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO film \
                (title, rating, price, discount, release_date, imdb_url, genres, provider) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id",
        )
        .bind(&input.title)
        .bind(input.rating)
        .bind(input.price)
        .bind(input.discount)
        .bind(input.release_date)
        .bind(&input.imdb_url)
        .bind(&input.genres)
        .bind(input.provider.map(|p| p.as_str()))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO studio (name, film_id) VALUES ($1, $2)")
            .bind(&input.studio.name)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for producer in &input.producers {
            sqlx::query("INSERT INTO producer (first_name, last_name, film_id) VALUES ($1, $2, $3)")
                .bind(&producer.first_name)
                .bind(&producer.last_name)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    /// Write all scalar fields of `film` and increment its version.
    ///
    /// Only applies while the stored version equals `film.version`. Returns
    /// the new version, or `None` if no row qualified.
    pub async fn update_versioned(
        pool: &PgPool,
        film: &Film,
    ) -> Result<Option<Version>, sqlx::Error> {
        let row: Option<(Version,)> = sqlx::query_as(
            "UPDATE film SET \
                title = $3, \
                rating = $4, \
                price = $5, \
                discount = $6, \
                release_date = $7, \
                imdb_url = $8, \
                genres = $9, \
                provider = $10, \
                version = version + 1, \
                updated_at = now() \
             WHERE id = $1 AND version = $2 \
             RETURNING version",
        )
        .bind(film.id)
        .bind(film.version)
        .bind(&film.title)
        .bind(film.rating)
        .bind(film.price)
        .bind(film.discount)
        .bind(film.release_date)
        .bind(&film.imdb_url)
        .bind(&film.genres)
        .bind(film.provider.map(|p| p.as_str()))
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(version,)| version))
    }

    /// Delete a studio row. Returns the number of rows removed.
    pub async fn delete_studio(conn: &mut PgConnection, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM studio WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete a producer row. Returns the number of rows removed.
    pub async fn delete_producer(conn: &mut PgConnection, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM producer WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete a film row. Its studio and producers must already be gone.
    pub async fn delete_film(conn: &mut PgConnection, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM film WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}

fn bind_value<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    value: &Value,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match value {
        Value::BigInt(v) => query.bind(*v),
        Value::Int(v) => query.bind(*v),
        Value::Float(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.clone()),
        Value::TextList(v) => query.bind(v.clone()),
        Value::Date(v) => query.bind(*v),
        Value::Timestamp(v) => query.bind(*v),
    }
}
