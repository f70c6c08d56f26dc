//! Gokedex Library
//!
//! This module exposes the cache, API client, Pokedex and REPL for use by the
//! binary and in integration tests.

pub mod api;
pub mod cache;
pub mod cli;
pub mod pokedex;
pub mod repl;
