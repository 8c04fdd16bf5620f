/// Primary keys of the `film`, `studio` and `producer` tables (BIGSERIAL).
pub type DbId = i64;

/// Optimistic-concurrency counter stored in `film.version`.
pub type Version = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
