//! Row structs for the film tables.
//!
//! Rows are converted into the `filmdb_core` domain records before they
//! leave this crate.

pub mod film;
