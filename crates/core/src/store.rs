//! Storage and notification seams used by the film services.
//!
//! Concrete implementations live in the infrastructure crates
//! (`filmdb-db` for PostgreSQL, `filmdb-events` for mail).

use async_trait::async_trait;

use crate::error::CoreError;
use crate::film::{Film, NewFilm};
use crate::predicate::Predicate;
use crate::types::{DbId, Version};

/// Persistence for the film aggregate.
#[async_trait]
pub trait FilmStore: Send + Sync {
    type Tx: FilmTransaction;

    /// Load one film with its studio joined; producers only if requested.
    async fn find_by_id(&self, id: DbId, with_producers: bool)
        -> Result<Option<Film>, CoreError>;

    /// Load every film matching `predicate` (all films for `None`), studio joined.
    async fn find_by(&self, predicate: Option<&Predicate>) -> Result<Vec<Film>, CoreError>;

    /// Insert a film with its studio and producers as one write. Returns the new id.
    async fn insert(&self, film: &NewFilm) -> Result<DbId, CoreError>;

    /// Write the scalar fields of `film` and bump its version by one.
    ///
    /// The write only applies while the stored version still equals
    /// `film.version`. Returns the new version, or `None` if the row was
    /// changed or removed in the meantime.
    async fn save_versioned(&self, film: &Film) -> Result<Option<Version>, CoreError>;

    /// Open a transaction for a multi-statement write.
    async fn begin(&self) -> Result<Self::Tx, CoreError>;
}

/// A unit of work opened by [`FilmStore::begin`].
///
/// Dropping it without calling [`FilmTransaction::commit`] rolls back every
/// statement issued through it.
#[async_trait]
pub trait FilmTransaction: Send {
    /// Returns the number of rows removed.
    async fn delete_studio(&mut self, studio_id: DbId) -> Result<u64, CoreError>;

    /// Returns the number of rows removed.
    async fn delete_producer(&mut self, producer_id: DbId) -> Result<u64, CoreError>;

    /// Returns the number of rows removed.
    async fn delete_film(&mut self, film_id: DbId) -> Result<u64, CoreError>;

    async fn commit(self) -> Result<(), CoreError>;
}

/// Outbound notification channel (e.g. e-mail to the editorial team).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), CoreError>;
}
