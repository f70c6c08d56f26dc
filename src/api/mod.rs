//! PokeAPI data models and client
//!
//! This module contains the subset of PokeAPI resources the REPL needs:
//! paginated location-area listings, the pokemon encountered in an area, and
//! per-pokemon details used by `catch` and `inspect`.

pub mod client;

pub use client::{ApiError, PokeClient, POKEAPI_BASE_URL};

use serde::Deserialize;

/// A `{ name, url }` reference to another PokeAPI resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// One page of the location-area listing
#[derive(Debug, Clone, Deserialize)]
pub struct AreaPage {
    /// Total number of areas across all pages
    pub count: u32,
    /// URL of the following page, `None` on the last page
    pub next: Option<String>,
    /// URL of the preceding page, `None` on the first page
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

/// Details of a single location area
#[derive(Debug, Clone, Deserialize)]
pub struct AreaInfo {
    pub name: String,
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonEncounter {
    pub pokemon: NamedResource,
}

impl AreaInfo {
    /// Names of all pokemon that can be encountered in this area
    pub fn pokemon_names(&self) -> Vec<&str> {
        self.pokemon_encounters
            .iter()
            .map(|encounter| encounter.pokemon.name.as_str())
            .collect()
    }
}

/// Details of a single pokemon
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PokemonInfo {
    pub name: String,
    /// Base experience yielded when defeated; some forms report `null`
    pub base_experience: Option<u32>,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    pub stats: Vec<PokemonStat>,
    pub types: Vec<PokemonType>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PokemonType {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}
