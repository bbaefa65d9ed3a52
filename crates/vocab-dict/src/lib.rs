//! Word sources that live outside the store.
//!
//! [`LocalDictionary`] answers from a small built-in table and is also the
//! source of curated rows for seeding. [`FreeDictionary`] queries the public
//! Free Dictionary API.

pub mod error;
pub mod free;
pub mod local;

pub use error::{Error, Result};
pub use free::FreeDictionary;
pub use local::{LocalDictionary, LocalEntry};
