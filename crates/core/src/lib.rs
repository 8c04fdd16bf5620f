//! Domain core of the film record service.
//!
//! - [`film`]: the film aggregate and its write DTOs.
//! - [`search`] / [`predicate`]: criteria whitelist and the typed filter tree.
//! - [`versioning`]: optimistic-concurrency version tokens.
//! - [`store`]: storage and notification traits implemented elsewhere.
//! - [`finder`] / [`writer`]: the read and write services.

pub mod error;
pub mod film;
pub mod finder;
pub mod predicate;
pub mod search;
pub mod store;
pub mod types;
pub mod versioning;
pub mod writer;

#[cfg(test)]
mod testing;

pub use finder::FilmReadService;
pub use writer::FilmWriteService;
