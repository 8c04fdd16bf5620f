//! PostgreSQL implementation of the core storage traits.

use async_trait::async_trait;
use filmdb_core::error::CoreError;
use filmdb_core::film::{Film, NewFilm, Producer};
use filmdb_core::predicate::Predicate;
use filmdb_core::store::{FilmStore, FilmTransaction};
use filmdb_core::types::{DbId, Version};
use sqlx::{Postgres, Transaction};

use crate::filter::{render_filter, SqlDialect};
use crate::repositories::FilmRepo;
use crate::DbPool;

/// [`FilmStore`] backed by a connection pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PgFilmStore {
    pool: DbPool,
}

impl PgFilmStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FilmStore for PgFilmStore {
    type Tx = PgFilmTransaction;

    async fn find_by_id(
        &self,
        id: DbId,
        with_producers: bool,
    ) -> Result<Option<Film>, CoreError> {
        let Some(row) = FilmRepo::find_by_id(&self.pool, id)
            .await
            .map_err(CoreError::storage)?
        else {
            return Ok(None);
        };

        let producers = if with_producers {
            let rows = FilmRepo::find_producers(&self.pool, id)
                .await
                .map_err(CoreError::storage)?;
            Some(rows.into_iter().map(Producer::from).collect())
        } else {
            None
        };
        row.into_film(producers).map(Some)
    }

    async fn find_by(&self, predicate: Option<&Predicate>) -> Result<Vec<Film>, CoreError> {
        let filter = render_filter(predicate, SqlDialect::Postgres);
        tracing::debug!(clause = %filter.clause, binds = filter.binds.len(), "find_by");

        FilmRepo::list(&self.pool, &filter)
            .await
            .map_err(CoreError::storage)?
            .into_iter()
            .map(|row| row.into_film(None))
            .collect()
    }

    async fn insert(&self, film: &NewFilm) -> Result<DbId, CoreError> {
        FilmRepo::create(&self.pool, film)
            .await
            .map_err(CoreError::storage)
    }

    async fn save_versioned(&self, film: &Film) -> Result<Option<Version>, CoreError> {
        FilmRepo::update_versioned(&self.pool, film)
            .await
            .map_err(CoreError::storage)
    }

    async fn begin(&self) -> Result<PgFilmTransaction, CoreError> {
        let tx = self.pool.begin().await.map_err(CoreError::storage)?;
        Ok(PgFilmTransaction { tx })
    }
}

/// An open database transaction. Rolled back on drop unless committed.
pub struct PgFilmTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl FilmTransaction for PgFilmTransaction {
    async fn delete_studio(&mut self, studio_id: DbId) -> Result<u64, CoreError> {
        FilmRepo::delete_studio(&mut *self.tx, studio_id)
            .await
            .map_err(CoreError::storage)
    }

    async fn delete_producer(&mut self, producer_id: DbId) -> Result<u64, CoreError> {
        FilmRepo::delete_producer(&mut *self.tx, producer_id)
            .await
            .map_err(CoreError::storage)
    }

    async fn delete_film(&mut self, film_id: DbId) -> Result<u64, CoreError> {
        FilmRepo::delete_film(&mut *self.tx, film_id)
            .await
            .map_err(CoreError::storage)
    }

    async fn commit(self) -> Result<(), CoreError> {
        self.tx.commit().await.map_err(CoreError::storage)
    }
}
