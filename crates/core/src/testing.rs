//! In-memory [`FilmStore`] and [`Notifier`] fakes for service tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::CoreError;
use crate::film::{Film, NewFilm, Producer, Studio};
use crate::predicate::Predicate;
use crate::store::{FilmStore, FilmTransaction, Notifier};
use crate::types::{DbId, Version};

#[derive(Debug, Default)]
struct Inner {
    films: BTreeMap<DbId, Film>,
    next_id: DbId,
    writes: usize,
    deleted: Vec<String>,
    fail_producer_deletes: bool,
    bump_before_save: Option<DbId>,
}

/// Films keyed by id. Transactions work on a copy that replaces the table on commit.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub(crate) fn put(&self, film: Film) {
        let mut inner = self.lock();
        inner.next_id = inner.next_id.max(film.id);
        inner.films.insert(film.id, film);
    }

    pub(crate) fn get(&self, id: DbId) -> Option<Film> {
        self.lock().films.get(&id).cloned()
    }

    /// Committed write statements so far.
    pub(crate) fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Committed deletes in the order they were issued, e.g. `"studio:70"`.
    pub(crate) fn deleted(&self) -> Vec<String> {
        self.lock().deleted.clone()
    }

    pub(crate) fn fail_producer_deletes(&self) {
        self.lock().fail_producer_deletes = true;
    }

    /// Simulate a concurrent writer winning between re-read and save.
    pub(crate) fn bump_version_before_next_save(&self, id: DbId) {
        self.lock().bump_before_save = Some(id);
    }
}

#[async_trait]
impl FilmStore for MemoryStore {
    type Tx = MemoryTx;

    async fn find_by_id(
        &self,
        id: DbId,
        with_producers: bool,
    ) -> Result<Option<Film>, CoreError> {
        Ok(self.get(id).map(|mut film| {
            if !with_producers {
                film.producers = None;
            }
            film
        }))
    }

    async fn find_by(&self, predicate: Option<&Predicate>) -> Result<Vec<Film>, CoreError> {
        Ok(self
            .lock()
            .films
            .values()
            .filter(|film| predicate.map_or(true, |p| p.matches(film)))
            .cloned()
            .map(|mut film| {
                film.producers = None;
                film
            })
            .collect())
    }

    async fn insert(&self, new: &NewFilm) -> Result<DbId, CoreError> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        let now = chrono::Utc::now();
        let film = Film {
            id,
            version: 0,
            title: new.title.clone(),
            rating: new.rating,
            price: new.price,
            discount: new.discount,
            release_date: new.release_date,
            imdb_url: new.imdb_url.clone(),
            created_at: now,
            updated_at: now,
            genres: new.genres.clone(),
            provider: new.provider,
            studio: Some(Studio {
                id: id * 10,
                name: new.studio.name.clone(),
                film_id: id,
            }),
            producers: Some(
                new.producers
                    .iter()
                    .zip(0..)
                    .map(|(p, n)| Producer {
                        id: id * 100 + n,
                        first_name: p.first_name.clone(),
                        last_name: p.last_name.clone(),
                        film_id: id,
                    })
                    .collect(),
            ),
        };
        inner.films.insert(id, film);
        inner.writes += 1;
        Ok(id)
    }

    async fn save_versioned(&self, film: &Film) -> Result<Option<Version>, CoreError> {
        let mut inner = self.lock();
        if inner.bump_before_save.take() == Some(film.id) {
            if let Some(stored) = inner.films.get_mut(&film.id) {
                stored.version += 1;
            }
        }
        let Some(stored) = inner.films.get_mut(&film.id) else {
            return Ok(None);
        };
        if stored.version != film.version {
            return Ok(None);
        }

        let mut updated = film.clone();
        updated.studio = stored.studio.clone();
        updated.producers = stored.producers.clone();
        updated.version = stored.version + 1;
        updated.updated_at = chrono::Utc::now();
        let version = updated.version;
        *stored = updated;
        inner.writes += 1;
        Ok(Some(version))
    }

    async fn begin(&self) -> Result<MemoryTx, CoreError> {
        let inner = self.lock();
        Ok(MemoryTx {
            shared: Arc::clone(&self.inner),
            films: inner.films.clone(),
            log: Vec::new(),
            fail_producer_deletes: inner.fail_producer_deletes,
        })
    }
}

pub(crate) struct MemoryTx {
    shared: Arc<Mutex<Inner>>,
    films: BTreeMap<DbId, Film>,
    log: Vec<String>,
    fail_producer_deletes: bool,
}

#[async_trait]
impl FilmTransaction for MemoryTx {
    async fn delete_studio(&mut self, studio_id: DbId) -> Result<u64, CoreError> {
        let mut affected = 0;
        for film in self.films.values_mut() {
            if film.studio.as_ref().is_some_and(|s| s.id == studio_id) {
                film.studio = None;
                affected += 1;
            }
        }
        self.log.push(format!("studio:{studio_id}"));
        Ok(affected)
    }

    async fn delete_producer(&mut self, producer_id: DbId) -> Result<u64, CoreError> {
        if self.fail_producer_deletes {
            let err = std::io::Error::new(std::io::ErrorKind::Other, "producer delete failed");
            return Err(CoreError::storage(err));
        }
        let mut affected = 0;
        for producers in self.films.values_mut().filter_map(|f| f.producers.as_mut()) {
            let before = producers.len();
            producers.retain(|p| p.id != producer_id);
            affected += (before - producers.len()) as u64;
        }
        self.log.push(format!("producer:{producer_id}"));
        Ok(affected)
    }

    async fn delete_film(&mut self, film_id: DbId) -> Result<u64, CoreError> {
        self.log.push(format!("film:{film_id}"));
        Ok(u64::from(self.films.remove(&film_id).is_some()))
    }

    async fn commit(self) -> Result<(), CoreError> {
        let mut inner = self.shared.lock().unwrap();
        inner.films = self.films;
        inner.writes += self.log.len();
        inner.deleted.extend(self.log);
        Ok(())
    }
}

/// Collects notifications instead of sending them.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    failing: Mutex<bool>,
}

impl RecordingNotifier {
    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn fail(&self) {
        *self.failing.lock().unwrap() = true;
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), CoreError> {
        if *self.failing.lock().unwrap() {
            return Err(CoreError::Internal("mail server unreachable".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}
