//! Core types and trait definitions for the vocabulary backend.
//!
//! This crate has no HTTP and database dependencies.
//! The review scheduler lives here as a set of pure functions; storage and
//! dictionary backends plug in through [`store::VocabStore`] and
//! [`dictionary::WordSource`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod clock;
pub mod dictionary;
pub mod error;
pub mod record;
pub mod schedule;
pub mod store;
pub mod user;
pub mod word;
pub mod wordbook;

pub use error::{Error, Result};
