use std::sync::Arc;

use filmdb_core::store::Notifier;
use filmdb_core::{FilmReadService, FilmWriteService};
use filmdb_db::PgFilmStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything inside is a pool handle or behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: filmdb_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Lookups by id and by search criteria.
    pub films: FilmReadService<PgFilmStore>,
    /// Create, versioned update and cascading delete.
    pub film_writer: FilmWriteService<PgFilmStore>,
}

impl AppState {
    pub fn new(pool: filmdb_db::DbPool, config: ServerConfig, notifier: Arc<dyn Notifier>) -> Self {
        let store = Arc::new(PgFilmStore::new(pool.clone()));
        Self {
            pool,
            config: Arc::new(config),
            films: FilmReadService::new(Arc::clone(&store)),
            film_writer: FilmWriteService::new(store, notifier),
        }
    }
}
