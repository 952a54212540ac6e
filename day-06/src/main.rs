use itertools::Itertools;
use pathfinder::{Graph, PathError};
use std::collections::{BTreeMap, BTreeSet};
use std::{fs, io, path::PathBuf};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T, E = Error> = std::result::Result<T, E>;

const ROOT: &str = "COM";
const YOU: &str = "YOU";
const SANTA: &str = "SAN";

const INPUT_PATH: &str = "puzzle_input.txt";

#[derive(Debug, Error)]
enum OrbitError {
    #[error("Could not read {}: {}", path.display(), source)]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Line {line} is not a `planet)moon` relation: {text:?}")]
    Malformed { line: usize, text: String },

    #[error("{} cannot orbit anything", ROOT)]
    RootOrbits,

    #[error("{moon} already orbits {existing}, cannot also orbit {new}")]
    DuplicateParent {
        moon: String,
        existing: String,
        new: String,
    },

    #[error("{0} is not in the orbit map")]
    UnknownBody(String),

    #[error("Orbits of {0} loop back on themselves")]
    Cycle(String),

    #[error("{0} orbits nothing, but only {} may be the root", ROOT)]
    Detached(String),

    #[error(transparent)]
    Path(#[from] PathError),
}

#[derive(Debug, Clone)]
struct Config {
    input: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: INPUT_PATH.into(),
        }
    }
}

impl Config {
    fn read_input(&self) -> Result<String, OrbitError> {
        fs::read_to_string(&self.input).map_err(|source| OrbitError::Input {
            path: self.input.clone(),
            source,
        })
    }
}

#[derive(Debug, Default)]
struct OrbitMap<'a> {
    parents: BTreeMap<&'a str, &'a str>,
    adjacency: Graph<&'a str>,
}

fn relation(line: &str) -> Option<(&str, &str)> {
    let (planet, moon) = line.split(')').collect_tuple()?;
    let valid = |body: &str| !body.is_empty() && !body.contains(char::is_whitespace);
    if !valid(planet) || !valid(moon) {
        return None;
    }
    Some((planet, moon))
}

impl<'a> OrbitMap<'a> {
    fn parse(input: &'a str) -> Result<Self, OrbitError> {
        let mut map = OrbitMap::default();
        let mut blank = None;

        for (i, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                // Only blank lines around the relations are allowed
                if !map.parents.is_empty() {
                    blank.get_or_insert(i + 1);
                }
                continue;
            }

            if let Some(line) = blank {
                return Err(OrbitError::Malformed {
                    line,
                    text: String::new(),
                });
            }

            let (planet, moon) = relation(line).ok_or_else(|| OrbitError::Malformed {
                line: i + 1,
                text: line.into(),
            })?;
            map.push(planet, moon)?;
        }

        debug!(
            bodies = map.adjacency.len(),
            relations = map.parents.len(),
            "orbit map built"
        );
        Ok(map)
    }

    fn push(&mut self, planet: &'a str, moon: &'a str) -> Result<(), OrbitError> {
        if moon == ROOT {
            return Err(OrbitError::RootOrbits);
        }

        let existing = *self.parents.entry(moon).or_insert(planet);
        if existing != planet {
            return Err(OrbitError::DuplicateParent {
                moon: moon.into(),
                existing: existing.into(),
                new: planet.into(),
            });
        }

        pathfinder::connect(&mut self.adjacency, planet, moon);
        Ok(())
    }

    fn parent(&self, body: &str) -> Result<&'a str, OrbitError> {
        self.parents
            .get(body)
            .copied()
            .ok_or_else(|| OrbitError::UnknownBody(body.into()))
    }

    /// Direct and indirect orbits of one body: the number of steps up the
    /// parent chain to the root.
    fn depth(&self, body: &str) -> Result<usize, OrbitError> {
        if !self.adjacency.contains_key(body) {
            return Err(OrbitError::UnknownBody(body.into()));
        }

        let mut seen = BTreeSet::new();
        let mut depth = 0;
        let mut orbiter = body;

        while let Some(&next) = self.parents.get(orbiter) {
            if !seen.insert(orbiter) {
                return Err(OrbitError::Cycle(orbiter.into()));
            }
            depth += 1;
            orbiter = next;
        }

        if orbiter != ROOT {
            return Err(OrbitError::Detached(orbiter.into()));
        }

        Ok(depth)
    }

    fn total_orbits(&self) -> Result<usize, OrbitError> {
        self.parents.keys().map(|moon| self.depth(moon)).sum()
    }

    /// Transfers needed to move from the body `from` orbits to the body
    /// `to` orbits.
    fn transfers(&self, from: &str, to: &str) -> Result<usize, OrbitError> {
        let start = self.parent(from)?;
        let finish = self.parent(to)?;

        let transfers = pathfinder::shortest_path_length(&self.adjacency, start, finish)?;
        debug!(from, to, start, finish, transfers, "transfers computed");
        Ok(transfers)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::default();
    let input = config.read_input()?;
    let map = OrbitMap::parse(&input)?;

    println!(
        "Total number of direct and indirect orbits = {}",
        map.total_orbits()?
    );
    println!(
        "Minimum number of orbital transfers = {}",
        map.transfers(YOU, SANTA)?
    );

    Ok(())
}
