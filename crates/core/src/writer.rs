//! Write path for films: create, version-checked update, cascading delete.

use std::sync::Arc;

use crate::error::CoreError;
use crate::film::{validate_new_film, validate_update, Film, FilmUpdate, NewFilm, FILM_ENTITY};
use crate::finder::FilmReadService;
use crate::store::{FilmStore, FilmTransaction, Notifier};
use crate::types::{DbId, Version};
use crate::versioning::{check_version, parse_version_token};

/// Creates, updates and deletes films.
pub struct FilmWriteService<S> {
    store: Arc<S>,
    reader: FilmReadService<S>,
    notifier: Arc<dyn Notifier>,
}

impl<S> Clone for FilmWriteService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            reader: self.reader.clone(),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

/// Subject and body of the "film created" notification.
pub fn creation_message(id: DbId, title: &str) -> (String, String) {
    (
        format!("Neuer Film {id}"),
        format!("Der Film mit dem Titel <strong>{title}</strong> ist angelegt."),
    )
}

impl<S: FilmStore> FilmWriteService<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        let reader = FilmReadService::new(Arc::clone(&store));
        Self {
            store,
            reader,
            notifier,
        }
    }

    /// Create a film with its studio and producers. Returns the new id.
    ///
    /// A failing notification is logged; the film stays created.
    pub async fn create(&self, film: &NewFilm) -> Result<DbId, CoreError> {
        tracing::debug!(title = %film.title, producers = film.producers.len(), "create");
        validate_new_film(film)?;

        let id = self.store.insert(film).await?;
        tracing::debug!(id, "create: inserted");

        let (subject, body) = creation_message(id, &film.title);
        if let Err(err) = self.notifier.notify(&subject, &body).await {
            tracing::warn!(id, error = %err, "create: notification failed");
        }
        Ok(id)
    }

    /// Update the scalar fields of a film under optimistic concurrency control.
    ///
    /// `version_token` is the quoted version the client last saw. Returns the
    /// new version.
    pub async fn update(
        &self,
        id: Option<DbId>,
        version_token: &str,
        changes: FilmUpdate,
    ) -> Result<Version, CoreError> {
        tracing::debug!(?id, version_token, ?changes, "update");
        let Some(id) = id else {
            return Err(CoreError::MissingId {
                entity: FILM_ENTITY,
            });
        };

        let (mut film, attempted) = self.validate_update(id, version_token).await?;

        validate_update(&changes)?;
        film.merge(changes);

        let version = self
            .store
            .save_versioned(&film)
            .await?
            .ok_or(CoreError::VersionOutdated { attempted })?;
        tracing::debug!(id, version, "update: saved");
        Ok(version)
    }

    /// Check the version token against the stored film. Returns the fresh
    /// record to merge into and the version the client sent.
    async fn validate_update(
        &self,
        id: DbId,
        version_token: &str,
    ) -> Result<(Film, Version), CoreError> {
        let version = parse_version_token(version_token)?;
        let film = self.reader.find_by_id(id, false).await?;
        check_version(version, film.version).inspect_err(|_| {
            tracing::debug!(id, version, stored = film.version, "update: version outdated");
        })?;
        Ok((film, version))
    }

    /// Delete a film together with its studio and producers.
    ///
    /// Returns `false` without writing anything if the film does not exist.
    /// All deletes run in one transaction: studio, producers, then the film.
    pub async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        tracing::debug!(id, "delete");
        let film = match self.reader.find_by_id(id, true).await {
            Ok(film) => film,
            Err(CoreError::NotFound { .. }) => {
                tracing::debug!(id, "delete: nothing to delete");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        let mut tx = self.store.begin().await?;
        if let Some(studio) = &film.studio {
            tx.delete_studio(studio.id).await?;
        }
        for producer in film.producers.iter().flatten() {
            tx.delete_producer(producer.id).await?;
        }
        let affected = tx.delete_film(id).await?;
        tx.commit().await?;

        tracing::debug!(id, affected, "delete: done");
        Ok(affected > 0)
    }
}
