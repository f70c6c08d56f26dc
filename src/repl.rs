//! Interactive read-eval-print loop
//!
//! Parses one command per input line, runs it against the PokeAPI client and
//! the local Pokedex, and writes the result to the given output. Command
//! failures are reported inline and the loop keeps going.

use std::io::{self, Write};
use std::ops::ControlFlow;

use rand::Rng;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::api::{ApiError, PokeClient};
use crate::pokedex::Pokedex;

/// Shown before every input line
pub const PROMPT: &str = "Gokedex > ";

/// Name and description of every command, in help order
const COMMANDS: &[(&str, &str)] = &[
    ("help", "Displays a help message"),
    ("exit", "Exit the Gokedex"),
    ("map", "Show next 20 areas"),
    ("mapb", "Show previous 20 areas"),
    ("explore <area>", "Show the pokemon found in an area"),
    ("catch <pokemon>", "Try to catch a pokemon"),
    ("inspect <pokemon>", "Show details of a caught pokemon"),
    ("gokedex", "Show all caught pokemon"),
];

/// A parsed REPL command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Map,
    MapBack,
    Explore(String),
    Catch(String),
    Inspect(String),
    Pokedex,
}

/// Errors from turning an input line into a `Command`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Expected exactly one argument")]
    WrongArity,
}

/// Errors from running a command
#[derive(Debug, Error)]
pub enum ReplError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Writing output failed; this ends the loop
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Command {
    /// Parses a line of input
    ///
    /// # Returns
    /// * `Ok(Some(Command))` for a recognised command
    /// * `Ok(None)` for a blank line
    /// * `Err(ParseError)` for an unknown command or wrong argument count
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match name {
            "help" => Command::Help,
            "exit" => Command::Exit,
            "map" => Command::Map,
            "mapb" => Command::MapBack,
            "gokedex" | "pokedex" => Command::Pokedex,
            "explore" => Command::Explore(single_arg(&args)?),
            "catch" => Command::Catch(single_arg(&args)?),
            "inspect" => Command::Inspect(single_arg(&args)?),
            _ => return Err(ParseError::Unknown(line.to_string())),
        };
        Ok(Some(command))
    }
}

fn single_arg(args: &[&str]) -> Result<String, ParseError> {
    match args {
        [arg] => Ok(arg.to_string()),
        _ => Err(ParseError::WrongArity),
    }
}

/// REPL state: the API client, the caught pokemon, and the catch RNG
pub struct Repl<R> {
    client: PokeClient,
    pokedex: Pokedex,
    rng: R,
}

impl<R: Rng> Repl<R> {
    pub fn new(client: PokeClient, rng: R) -> Self {
        Self {
            client,
            pokedex: Pokedex::new(),
            rng,
        }
    }

    pub fn pokedex(&self) -> &Pokedex {
        &self.pokedex
    }

    /// Reads commands from `input` until `exit` or end of input
    pub async fn run<I, W>(&mut self, input: I, out: &mut W) -> io::Result<()>
    where
        I: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(out, "{}", e)?;
                    continue;
                }
            };

            debug!(?command, "running command");
            match self.execute(command, out).await {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => break,
                Err(ReplError::Io(e)) => return Err(e),
                Err(e) => writeln!(out, "Error: {}", e)?,
            }
        }

        Ok(())
    }

    /// Runs a single command, writing its output to `out`
    pub async fn execute<W: Write>(
        &mut self,
        command: Command,
        out: &mut W,
    ) -> Result<ControlFlow<()>, ReplError> {
        match command {
            Command::Help => write_help(out)?,
            Command::Exit => {
                writeln!(out, "Closing the Gokedex... Goodbye!")?;
                return Ok(ControlFlow::Break(()));
            }
            Command::Map => {
                let areas = self.client.next_areas().await?;
                for area in areas {
                    writeln!(out, "{}", area.name)?;
                }
            }
            Command::MapBack => {
                let areas = self.client.previous_areas().await?;
                for area in areas {
                    writeln!(out, "{}", area.name)?;
                }
            }
            Command::Explore(area) => {
                writeln!(out, "Exploring {}...", area)?;
                let info = self.client.area_info(&area).await?;
                writeln!(out, "Found Pokemon:")?;
                for name in info.pokemon_names() {
                    writeln!(out, " - {}", name)?;
                }
            }
            Command::Catch(name) => {
                writeln!(out, "Throwing a Pokeball at {}...", name)?;
                let pokemon = self.client.pokemon_info(&name).await?;
                let display_name = pokemon.name.clone();
                if self.pokedex.try_catch(pokemon, &mut self.rng) {
                    writeln!(out, "{} was caught!", display_name)?;
                    writeln!(out, "You may now inspect it with the inspect command.")?;
                } else {
                    writeln!(out, "{} escaped!", display_name)?;
                }
            }
            Command::Inspect(name) => match self.pokedex.get(&name.to_lowercase()) {
                Some(pokemon) => {
                    writeln!(out, "Name: {}", pokemon.name)?;
                    writeln!(out, "Height: {}", pokemon.height)?;
                    writeln!(out, "Weight: {}", pokemon.weight)?;
                    writeln!(out, "Stats:")?;
                    for stat in &pokemon.stats {
                        writeln!(out, "  -{}: {}", stat.stat.name, stat.base_stat)?;
                    }
                    writeln!(out, "Types:")?;
                    for kind in &pokemon.types {
                        writeln!(out, "  - {}", kind.kind.name)?;
                    }
                }
                None => writeln!(out, "you have not caught that pokemon")?,
            },
            Command::Pokedex => {
                if self.pokedex.is_empty() {
                    writeln!(out, "Your Gokedex is empty.")?;
                } else {
                    writeln!(out, "Your Gokedex:")?;
                    for name in self.pokedex.names() {
                        writeln!(out, " - {}", name)?;
                    }
                }
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Stops the response cache's background reaper
    pub async fn shutdown(&self) {
        self.client.cache().shutdown().await;
    }
}

fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Welcome to the Gokedex!")?;
    writeln!(out, "Usage:")?;
    writeln!(out)?;
    for (name, description) in COMMANDS {
        writeln!(out, "{}: {}", name, description)?;
    }
    Ok(())
}
