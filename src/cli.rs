//! Command-line interface parsing for Gokedex
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! validated startup settings: the response cache TTL, the API base URL, and the
//! log verbosity.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::api::POKEAPI_BASE_URL;

/// Default cache TTL in seconds (one minute)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// The base URL is not an http(s) URL
    #[error("Invalid base URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    /// A zero TTL would expire entries before they could be read
    #[error("Invalid cache TTL: must be at least 1 second")]
    ZeroCacheTtl,
}

/// Gokedex - explore PokeAPI location areas and catch pokemon
#[derive(Parser, Debug)]
#[command(name = "gokedex")]
#[command(about = "Interactive Pokedex backed by PokeAPI")]
#[command(version)]
pub struct Cli {
    /// How long API responses stay cached, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Root URL of the PokeAPI v2 endpoints
    #[arg(long, value_name = "URL", default_value = POKEAPI_BASE_URL)]
    pub base_url: String,

    /// Enable debug logging (cache hits, misses and reaper sweeps)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// TTL and reaper period for the response cache
    pub cache_ttl: Duration,
    /// API base URL, always ending in `/`
    pub base_url: String,
    /// Whether debug logging is on by default
    pub verbose: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            base_url: POKEAPI_BASE_URL.to_string(),
            verbose: false,
        }
    }
}

/// Checks the scheme and appends a trailing `/` if missing
///
/// # Returns
/// * `Ok(String)` with the normalised URL
/// * `Err(CliError::InvalidBaseUrl)` if the URL is not http(s)
pub fn normalize_base_url(url: &str) -> Result<String, CliError> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(CliError::InvalidBaseUrl(url.to_string()));
    }
    if url.ends_with('/') {
        Ok(url.to_string())
    } else {
        Ok(format!("{}/", url))
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if the TTL is zero or the base URL is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.cache_ttl == 0 {
            return Err(CliError::ZeroCacheTtl);
        }

        Ok(StartupConfig {
            cache_ttl: Duration::from_secs(cli.cache_ttl),
            base_url: normalize_base_url(&cli.base_url)?,
            verbose: cli.verbose,
        })
    }
}
