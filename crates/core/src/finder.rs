//! Read path for films.

use std::sync::Arc;

use crate::error::CoreError;
use crate::film::{Film, FILM_ENTITY};
use crate::predicate::build_predicate;
use crate::search::{validate_criteria, SearchCriteria};
use crate::store::FilmStore;
use crate::types::DbId;

/// Looks films up by id or by search criteria.
pub struct FilmReadService<S> {
    store: Arc<S>,
}

impl<S> Clone for FilmReadService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: FilmStore> FilmReadService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Find a film by id. The studio is always loaded, producers on request.
    ///
    /// Fails with [`CoreError::NotFound`] if no film has this id.
    pub async fn find_by_id(&self, id: DbId, with_producers: bool) -> Result<Film, CoreError> {
        tracing::debug!(id, with_producers, "find_by_id");

        let mut film = self
            .store
            .find_by_id(id, with_producers)
            .await?
            .ok_or(CoreError::NotFound {
                entity: FILM_ENTITY,
                id,
            })?;
        film.normalize_genres();

        tracing::debug!(id, title = %film.title, version = film.version, "find_by_id: found");
        Ok(film)
    }

    /// Find films matching `criteria`.
    ///
    /// Without criteria, or with an empty map, every film is returned and an
    /// empty store is not an error. Non-empty criteria must only use
    /// searchable fields and must match at least one film; otherwise the
    /// search fails with a not-found error.
    pub async fn find(&self, criteria: Option<&SearchCriteria>) -> Result<Vec<Film>, CoreError> {
        tracing::debug!(?criteria, "find");

        let criteria = match criteria {
            None => return self.find_all().await,
            Some(criteria) => criteria,
        };
        if criteria.is_empty() {
            // Validation holds trivially and the predicate is empty.
            let predicate = build_predicate(criteria)?;
            let films = self.store.find_by(predicate.as_ref()).await?;
            return Ok(normalized(films));
        }

        if !validate_criteria(criteria) {
            let field = criteria.first_unknown_key().unwrap_or_default().to_string();
            return Err(CoreError::InvalidCriteria { field });
        }

        let predicate = build_predicate(criteria)?;
        let films = self.store.find_by(predicate.as_ref()).await?;
        if films.is_empty() {
            tracing::debug!(%criteria, "find: no films found");
            return Err(CoreError::NoMatch {
                entity: FILM_ENTITY,
                criteria: criteria.to_string(),
            });
        }

        tracing::debug!(count = films.len(), "find: films found");
        Ok(normalized(films))
    }

    async fn find_all(&self) -> Result<Vec<Film>, CoreError> {
        let films = self.store.find_by(None).await?;
        Ok(normalized(films))
    }
}

fn normalized(mut films: Vec<Film>) -> Vec<Film> {
    films.iter_mut().for_each(Film::normalize_genres);
    films
}
