//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a connection for statements that must share a
//! transaction) as the first argument.

pub mod film_repo;

pub use film_repo::FilmRepo;
