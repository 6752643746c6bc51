//! World creation settings and the enums they carry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueParseError;

/// Dimension a world is generated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorldEnvironment {
    #[default]
    Normal,
    Nether,
    End,
}

impl WorldEnvironment {
    pub const NAMES: &'static str = "NORMAL, NETHER, END";

    pub fn as_str(self) -> &'static str {
        match self {
            WorldEnvironment::Normal => "NORMAL",
            WorldEnvironment::Nether => "NETHER",
            WorldEnvironment::End => "END",
        }
    }
}

impl FromStr for WorldEnvironment {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NORMAL" | "OVERWORLD" => Ok(WorldEnvironment::Normal),
            "NETHER" => Ok(WorldEnvironment::Nether),
            "END" | "THE_END" => Ok(WorldEnvironment::End),
            _ => Err(ValueParseError::Enum {
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for WorldEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terrain shape algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorldType {
    Normal,
    Flat,
    LargeBiomes,
    Amplified,
}

impl WorldType {
    pub const NAMES: &'static str = "NORMAL, FLAT, LARGE_BIOMES, AMPLIFIED";

    pub fn as_str(self) -> &'static str {
        match self {
            WorldType::Normal => "NORMAL",
            WorldType::Flat => "FLAT",
            WorldType::LargeBiomes => "LARGE_BIOMES",
            WorldType::Amplified => "AMPLIFIED",
        }
    }
}

impl FromStr for WorldType {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NORMAL" | "DEFAULT" => Ok(WorldType::Normal),
            "FLAT" => Ok(WorldType::Flat),
            "LARGE_BIOMES" | "LARGEBIOMES" => Ok(WorldType::LargeBiomes),
            "AMPLIFIED" => Ok(WorldType::Amplified),
            _ => Err(ValueParseError::Enum {
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for WorldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to create (or load) a world.
///
/// Built with chained setters, then handed to
/// [`WorldManager::add_world`](crate::WorldManager::add_world) which only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldCreationSettings {
    name: String,
    seed: Option<i64>,
    environment: WorldEnvironment,
    world_type: Option<WorldType>,
    generate_structures: Option<bool>,
    generator: Option<String>,
    adjust_spawn: bool,
}

impl WorldCreationSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seed: None,
            environment: WorldEnvironment::Normal,
            world_type: None,
            generate_structures: None,
            generator: None,
            adjust_spawn: true,
        }
    }

    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn environment(mut self, environment: WorldEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn world_type(mut self, world_type: Option<WorldType>) -> Self {
        self.world_type = world_type;
        self
    }

    /// `None` leaves the decision to the server default.
    pub fn generate_structures(mut self, generate: Option<bool>) -> Self {
        self.generate_structures = generate;
        self
    }

    pub fn generator(mut self, generator: Option<String>) -> Self {
        self.generator = generator;
        self
    }

    pub fn adjust_spawn(mut self, adjust: bool) -> Self {
        self.adjust_spawn = adjust;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seed_value(&self) -> Option<i64> {
        self.seed
    }

    pub fn environment_value(&self) -> WorldEnvironment {
        self.environment
    }

    pub fn world_type_value(&self) -> Option<WorldType> {
        self.world_type
    }

    pub fn generate_structures_value(&self) -> Option<bool> {
        self.generate_structures
    }

    pub fn generator_value(&self) -> Option<&str> {
        self.generator.as_deref()
    }

    pub fn adjust_spawn_value(&self) -> bool {
        self.adjust_spawn
    }
}

/// Derive a seed from user input.
///
/// Numeric strings are used as-is. Anything else is hashed with the same
/// 31-multiplier string hash Java servers use, so a word seed produces the
/// same world here as it does there. Empty input means "no seed".
pub fn parse_seed(input: &str) -> Option<i64> {
    if input.is_empty() {
        return None;
    }
    match input.parse::<i64>() {
        Ok(seed) => Some(seed),
        Err(_) => Some(string_hash(input) as i64),
    }
}

/// 31-multiplier hash over UTF-16 code units, wrapping at 32 bits.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}
