//! Local collection of caught pokemon
//!
//! Catching is a single weighted coin flip: the chance of success is the
//! pokemon's base experience divided by 255.

use std::collections::BTreeMap;

use rand::Rng;

use crate::api::PokemonInfo;

/// Base experience at which a catch always succeeds
const MAX_BASE_EXPERIENCE: f64 = 255.0;

/// Probability in `[0, 1]` that a catch attempt succeeds
pub fn catch_chance(base_experience: u32) -> f64 {
    (base_experience as f64 / MAX_BASE_EXPERIENCE).min(1.0)
}

/// In-memory collection of caught pokemon, keyed by name
#[derive(Debug, Default)]
pub struct Pokedex {
    caught: BTreeMap<String, PokemonInfo>,
}

impl Pokedex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to catch `pokemon`, recording it on success
    ///
    /// Returns whether the pokemon was caught. Catching an already caught
    /// pokemon again replaces the stored record.
    pub fn try_catch<R: Rng>(&mut self, pokemon: PokemonInfo, rng: &mut R) -> bool {
        let chance = catch_chance(pokemon.base_experience.unwrap_or(0));
        let luck: f64 = rng.gen();
        if luck < chance {
            self.caught.insert(pokemon.name.clone(), pokemon);
            true
        } else {
            false
        }
    }

    pub fn get(&self, name: &str) -> Option<&PokemonInfo> {
        self.caught.get(name)
    }

    /// Names of caught pokemon in alphabetical order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.caught.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.caught.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caught.is_empty()
    }
}
