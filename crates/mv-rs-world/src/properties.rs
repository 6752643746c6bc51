//! Per-world property bag and the named property accessors used by commands.
//!
//! Every property is addressable by a camelCase name. Properties fixed at
//! creation are read-only; list properties are changed through add/remove.
//! Failed mutations never touch the stored values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PropertyError, ValueParseError};
use crate::settings::{WorldCreationSettings, WorldEnvironment, WorldType};

// ─── Enums stored as properties ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Peaceful,
    Easy,
    #[default]
    Normal,
    Hard,
}

impl FromStr for Difficulty {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PEACEFUL" | "0" => Ok(Difficulty::Peaceful),
            "EASY" | "1" => Ok(Difficulty::Easy),
            "NORMAL" | "2" => Ok(Difficulty::Normal),
            "HARD" | "3" => Ok(Difficulty::Hard),
            _ => Err(ValueParseError::Enum {
                value: s.to_string(),
                expected: "PEACEFUL, EASY, NORMAL, HARD",
            }),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Peaceful => "PEACEFUL",
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl FromStr for GameMode {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SURVIVAL" | "0" => Ok(GameMode::Survival),
            "CREATIVE" | "1" => Ok(GameMode::Creative),
            "ADVENTURE" | "2" => Ok(GameMode::Adventure),
            "SPECTATOR" | "3" => Ok(GameMode::Spectator),
            _ => Err(ValueParseError::Enum {
                value: s.to_string(),
                expected: "SURVIVAL, CREATIVE, ADVENTURE, SPECTATOR",
            }),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameMode::Survival => "SURVIVAL",
            GameMode::Creative => "CREATIVE",
            GameMode::Adventure => "ADVENTURE",
            GameMode::Spectator => "SPECTATOR",
        })
    }
}

// ─── Property names ─────────────────────────────────────────────────────────

/// How a property may be changed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Fixed when the world is created.
    ReadOnly,
    /// A single value, changed with `set`.
    Scalar,
    /// A collection, changed with `add`/`remove`/`clear` (or replaced with `set`).
    List,
}

/// A named world property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Environment,
    Seed,
    Type,
    Generator,
    GenerateStructures,
    Alias,
    AdjustSpawn,
    Hidden,
    Pvp,
    AllowWeather,
    AutoLoad,
    Difficulty,
    GameMode,
    PlayerLimit,
    RespawnWorld,
    WorldBlacklist,
}

impl Property {
    pub const ALL: [Property; 16] = [
        Property::Environment,
        Property::Seed,
        Property::Type,
        Property::Generator,
        Property::GenerateStructures,
        Property::Alias,
        Property::AdjustSpawn,
        Property::Hidden,
        Property::Pvp,
        Property::AllowWeather,
        Property::AutoLoad,
        Property::Difficulty,
        Property::GameMode,
        Property::PlayerLimit,
        Property::RespawnWorld,
        Property::WorldBlacklist,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Property::Environment => "environment",
            Property::Seed => "seed",
            Property::Type => "type",
            Property::Generator => "generator",
            Property::GenerateStructures => "generateStructures",
            Property::Alias => "alias",
            Property::AdjustSpawn => "adjustSpawn",
            Property::Hidden => "hidden",
            Property::Pvp => "pvp",
            Property::AllowWeather => "allowWeather",
            Property::AutoLoad => "autoLoad",
            Property::Difficulty => "difficulty",
            Property::GameMode => "gameMode",
            Property::PlayerLimit => "playerLimit",
            Property::RespawnWorld => "respawnWorld",
            Property::WorldBlacklist => "worldBlacklist",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Property::Environment => "The dimension the world was generated as (NORMAL, NETHER, END).",
            Property::Seed => "The seed the world was generated with.",
            Property::Type => "The terrain type the world was generated with.",
            Property::Generator => "The generator plugin that generates this world's terrain.",
            Property::GenerateStructures => "Whether villages, strongholds and other structures generate.",
            Property::Alias => "A friendly name shown instead of the world name. Cannot contain spaces.",
            Property::AdjustSpawn => "Whether the spawn point is moved to a safe location on load.",
            Property::Hidden => "Whether the world is left out of world lists.",
            Property::Pvp => "Whether players can damage each other.",
            Property::AllowWeather => "Whether it can rain or storm in this world.",
            Property::AutoLoad => "Whether the world is loaded when the server starts.",
            Property::Difficulty => "The difficulty (PEACEFUL, EASY, NORMAL, HARD).",
            Property::GameMode => "The game mode players are put in (SURVIVAL, CREATIVE, ADVENTURE, SPECTATOR).",
            Property::PlayerLimit => "Maximum players allowed in the world. -1 for no limit.",
            Property::RespawnWorld => "The world players respawn in after dying here. Empty for this world.",
            Property::WorldBlacklist => "Worlds players cannot travel to from this world.",
        }
    }

    pub fn access(self) -> Access {
        match self {
            Property::Environment
            | Property::Seed
            | Property::Type
            | Property::Generator
            | Property::GenerateStructures => Access::ReadOnly,
            Property::WorldBlacklist => Access::List,
            _ => Access::Scalar,
        }
    }

    /// Resolve a property name, ignoring case.
    pub fn lookup(name: &str) -> Result<Property, PropertyError> {
        Property::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| PropertyError::Unknown {
                property: name.to_string(),
            })
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Names of every known property, in display order.
pub fn property_names() -> impl Iterator<Item = &'static str> {
    Property::ALL.into_iter().map(Property::name)
}

/// Description of a property by name, if it exists.
pub fn property_description(name: &str) -> Option<&'static str> {
    Property::lookup(name).ok().map(Property::description)
}

// ─── Values ─────────────────────────────────────────────────────────────────

/// The current value of a property, as reported back to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
    Unset,
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::List(items) => write!(f, "[{}]", items.join(", ")),
            PropertyValue::Unset => f.write_str("(unset)"),
        }
    }
}

fn parse_bool(value: &str) -> Result<bool, ValueParseError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => Err(ValueParseError::Bool(value.to_string())),
    }
}

fn parse_int(value: &str) -> Result<i32, ValueParseError> {
    value
        .parse()
        .map_err(|_| ValueParseError::Int(value.to_string()))
}

fn invalid(property: Property) -> impl FnOnce(ValueParseError) -> PropertyError {
    move |source| PropertyError::InvalidValue {
        property: property.name().to_string(),
        source,
    }
}

fn veto(property: Property, reason: impl Into<String>) -> PropertyError {
    PropertyError::Vetoed {
        property: property.name().to_string(),
        reason: reason.into(),
    }
}

// ─── Property bag ───────────────────────────────────────────────────────────

/// Persisted settings of one world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldProperties {
    environment: WorldEnvironment,
    seed: i64,
    #[serde(rename = "type")]
    world_type: Option<WorldType>,
    generator: Option<String>,
    generate_structures: Option<bool>,
    alias: String,
    adjust_spawn: bool,
    hidden: bool,
    pvp: bool,
    allow_weather: bool,
    auto_load: bool,
    difficulty: Difficulty,
    game_mode: GameMode,
    player_limit: i32,
    respawn_world: String,
    world_blacklist: Vec<String>,
}

impl Default for WorldProperties {
    fn default() -> Self {
        Self {
            environment: WorldEnvironment::Normal,
            seed: 0,
            world_type: None,
            generator: None,
            generate_structures: None,
            alias: String::new(),
            adjust_spawn: true,
            hidden: false,
            pvp: true,
            allow_weather: true,
            auto_load: true,
            difficulty: Difficulty::Normal,
            game_mode: GameMode::Survival,
            player_limit: -1,
            respawn_world: String::new(),
            world_blacklist: Vec::new(),
        }
    }
}

impl WorldProperties {
    /// Record the creation-time properties of a freshly generated world.
    pub fn apply_creation(&mut self, settings: &WorldCreationSettings, seed: i64) {
        self.environment = settings.environment_value();
        self.seed = seed;
        self.world_type = settings.world_type_value();
        self.generator = settings.generator_value().map(str::to_string);
        self.generate_structures = settings.generate_structures_value();
    }

    pub fn environment(&self) -> WorldEnvironment {
        self.environment
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn world_type(&self) -> Option<WorldType> {
        self.world_type
    }

    pub fn generator(&self) -> Option<&str> {
        self.generator.as_deref()
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn adjust_spawn(&self) -> bool {
        self.adjust_spawn
    }

    pub fn set_adjust_spawn(&mut self, adjust: bool) {
        self.adjust_spawn = adjust;
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn auto_load(&self) -> bool {
        self.auto_load
    }

    pub fn world_blacklist(&self) -> &[String] {
        &self.world_blacklist
    }

    pub fn get(&self, property: Property) -> PropertyValue {
        match property {
            Property::Environment => PropertyValue::Text(self.environment.to_string()),
            Property::Seed => PropertyValue::Int(self.seed),
            Property::Type => self
                .world_type
                .map_or(PropertyValue::Unset, |t| PropertyValue::Text(t.to_string())),
            Property::Generator => self
                .generator
                .clone()
                .map_or(PropertyValue::Unset, PropertyValue::Text),
            Property::GenerateStructures => self
                .generate_structures
                .map_or(PropertyValue::Unset, PropertyValue::Bool),
            Property::Alias => PropertyValue::Text(self.alias.clone()),
            Property::AdjustSpawn => PropertyValue::Bool(self.adjust_spawn),
            Property::Hidden => PropertyValue::Bool(self.hidden),
            Property::Pvp => PropertyValue::Bool(self.pvp),
            Property::AllowWeather => PropertyValue::Bool(self.allow_weather),
            Property::AutoLoad => PropertyValue::Bool(self.auto_load),
            Property::Difficulty => PropertyValue::Text(self.difficulty.to_string()),
            Property::GameMode => PropertyValue::Text(self.game_mode.to_string()),
            Property::PlayerLimit => PropertyValue::Int(self.player_limit as i64),
            Property::RespawnWorld => PropertyValue::Text(self.respawn_world.clone()),
            Property::WorldBlacklist => PropertyValue::List(self.world_blacklist.clone()),
        }
    }

    /// Replace a property's value. `owner` is the name of the world these
    /// properties belong to.
    pub fn set(&mut self, owner: &str, property: Property, value: &str) -> Result<(), PropertyError> {
        match property {
            Property::Environment
            | Property::Seed
            | Property::Type
            | Property::Generator
            | Property::GenerateStructures => {
                return Err(PropertyError::ReadOnly {
                    property: property.name().to_string(),
                })
            }
            Property::Alias => {
                if value.chars().any(char::is_whitespace) {
                    return Err(veto(property, "An alias cannot contain spaces."));
                }
                self.alias = value.to_string();
            }
            Property::AdjustSpawn => self.adjust_spawn = parse_bool(value).map_err(invalid(property))?,
            Property::Hidden => self.hidden = parse_bool(value).map_err(invalid(property))?,
            Property::Pvp => self.pvp = parse_bool(value).map_err(invalid(property))?,
            Property::AllowWeather => self.allow_weather = parse_bool(value).map_err(invalid(property))?,
            Property::AutoLoad => self.auto_load = parse_bool(value).map_err(invalid(property))?,
            Property::Difficulty => self.difficulty = value.parse().map_err(invalid(property))?,
            Property::GameMode => self.game_mode = value.parse().map_err(invalid(property))?,
            Property::PlayerLimit => {
                let limit = parse_int(value).map_err(invalid(property))?;
                if limit < -1 {
                    return Err(veto(property, "The player limit must be -1 (no limit) or higher."));
                }
                self.player_limit = limit;
            }
            Property::RespawnWorld => self.respawn_world = value.to_string(),
            Property::WorldBlacklist => {
                let mut entries: Vec<String> = Vec::new();
                for entry in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    if !entries.iter().any(|e| e == entry) {
                        entries.push(entry.to_string());
                    }
                }
                if entries.iter().any(|e| e == owner) {
                    return Err(veto(property, "A world cannot blacklist itself."));
                }
                self.world_blacklist = entries;
            }
        }
        Ok(())
    }

    /// Add a value to a list property.
    pub fn add(&mut self, owner: &str, property: Property, value: &str) -> Result<(), PropertyError> {
        self.require_list(property)?;
        // Only the blacklist is a list today.
        if value == owner {
            return Err(veto(property, "A world cannot blacklist itself."));
        }
        if !self.world_blacklist.iter().any(|e| e == value) {
            self.world_blacklist.push(value.to_string());
        }
        Ok(())
    }

    /// Remove a value from a list property. Removing an absent value is not an error.
    pub fn remove(&mut self, property: Property, value: &str) -> Result<(), PropertyError> {
        self.require_list(property)?;
        self.world_blacklist.retain(|e| e != value);
        Ok(())
    }

    /// Empty a list property.
    pub fn clear(&mut self, property: Property) -> Result<(), PropertyError> {
        self.require_list(property)?;
        self.world_blacklist.clear();
        Ok(())
    }

    fn require_list(&self, property: Property) -> Result<(), PropertyError> {
        match property.access() {
            Access::List => Ok(()),
            Access::ReadOnly | Access::Scalar => Err(PropertyError::NotRemovable {
                property: property.name().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(Property::lookup("PVP").unwrap(), Property::Pvp);
        assert_eq!(Property::lookup("worldblacklist").unwrap(), Property::WorldBlacklist);
    }

    #[test]
    fn lookup_unknown() {
        let err = Property::lookup("fly").unwrap_err();
        assert!(matches!(err, PropertyError::Unknown { ref property } if property == "fly"));
    }

    #[test]
    fn every_property_has_a_description() {
        for p in Property::ALL {
            assert!(!p.description().is_empty(), "{p} has no description");
            assert_eq!(property_description(p.name()), Some(p.description()));
        }
        assert_eq!(property_names().count(), Property::ALL.len());
    }

    #[test]
    fn defaults() {
        let props = WorldProperties::default();
        assert!(props.adjust_spawn());
        assert_eq!(props.get(Property::Pvp), PropertyValue::Bool(true));
        assert_eq!(props.get(Property::PlayerLimit), PropertyValue::Int(-1));
        assert_eq!(props.get(Property::Type), PropertyValue::Unset);
    }

    #[test]
    fn set_scalar_values() {
        let mut props = WorldProperties::default();
        props.set("world", Property::Pvp, "false").unwrap();
        props.set("world", Property::Difficulty, "hard").unwrap();
        props.set("world", Property::GameMode, "1").unwrap();
        props.set("world", Property::PlayerLimit, "20").unwrap();
        assert_eq!(props.get(Property::Pvp), PropertyValue::Bool(false));
        assert_eq!(props.get(Property::Difficulty), PropertyValue::Text("HARD".into()));
        assert_eq!(props.get(Property::GameMode), PropertyValue::Text("CREATIVE".into()));
        assert_eq!(props.get(Property::PlayerLimit), PropertyValue::Int(20));
    }

    #[test]
    fn set_read_only_is_rejected() {
        let mut props = WorldProperties::default();
        let err = props.set("world", Property::Seed, "5").unwrap_err();
        assert!(matches!(err, PropertyError::ReadOnly { .. }));
        assert_eq!(props.seed(), 0);
    }

    #[test]
    fn invalid_value_leaves_property_unchanged() {
        let mut props = WorldProperties::default();
        let err = props.set("world", Property::Hidden, "maybe").unwrap_err();
        match err {
            PropertyError::InvalidValue { property, source } => {
                assert_eq!(property, "hidden");
                assert_eq!(source, ValueParseError::Bool("maybe".into()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!props.hidden());
    }

    #[test]
    fn vetoed_values() {
        let mut props = WorldProperties::default();
        assert!(matches!(
            props.set("world", Property::Alias, "two words"),
            Err(PropertyError::Vetoed { .. })
        ));
        assert!(matches!(
            props.set("world", Property::PlayerLimit, "-5"),
            Err(PropertyError::Vetoed { .. })
        ));
        assert_eq!(props.alias(), "");
        assert_eq!(props.get(Property::PlayerLimit), PropertyValue::Int(-1));
    }

    #[test]
    fn blacklist_add_remove_clear() {
        let mut props = WorldProperties::default();
        props.add("world", Property::WorldBlacklist, "nether").unwrap();
        props.add("world", Property::WorldBlacklist, "end").unwrap();
        props.add("world", Property::WorldBlacklist, "nether").unwrap();
        assert_eq!(props.world_blacklist(), ["nether", "end"]);

        props.remove(Property::WorldBlacklist, "nether").unwrap();
        assert_eq!(props.world_blacklist(), ["end"]);

        // Absent value is fine.
        props.remove(Property::WorldBlacklist, "creative").unwrap();
        assert_eq!(props.world_blacklist(), ["end"]);

        props.clear(Property::WorldBlacklist).unwrap();
        assert!(props.world_blacklist().is_empty());
    }

    #[test]
    fn blacklist_set_drops_duplicates() {
        let mut props = WorldProperties::default();
        props.set("world", Property::WorldBlacklist, "a, b,a,,b").unwrap();
        assert_eq!(props.world_blacklist(), ["a", "b"]);

        props.add("world", Property::WorldBlacklist, "a").unwrap();
        assert_eq!(props.world_blacklist(), ["a", "b"]);
    }

    #[test]
    fn blacklist_cannot_contain_owner() {
        let mut props = WorldProperties::default();
        assert!(matches!(
            props.add("world", Property::WorldBlacklist, "world"),
            Err(PropertyError::Vetoed { .. })
        ));
        assert!(matches!(
            props.set("world", Property::WorldBlacklist, "nether, world"),
            Err(PropertyError::Vetoed { .. })
        ));
        assert!(props.world_blacklist().is_empty());
    }

    #[test]
    fn remove_from_scalar_is_not_removable() {
        let mut props = WorldProperties::default();
        let before = props.clone();
        assert!(matches!(
            props.remove(Property::Pvp, "true"),
            Err(PropertyError::NotRemovable { .. })
        ));
        assert!(matches!(
            props.remove(Property::Seed, "0"),
            Err(PropertyError::NotRemovable { .. })
        ));
        assert_eq!(props, before);
    }

    #[test]
    fn apply_creation_records_settings() {
        let settings = WorldCreationSettings::new("hell")
            .environment(WorldEnvironment::Nether)
            .world_type(Some(WorldType::Flat))
            .generator(Some("Gen".into()));
        let mut props = WorldProperties::default();
        props.apply_creation(&settings, 99);
        assert_eq!(props.environment(), WorldEnvironment::Nether);
        assert_eq!(props.seed(), 99);
        assert_eq!(props.world_type(), Some(WorldType::Flat));
        assert_eq!(props.generator(), Some("Gen"));
    }

    #[test]
    fn json_uses_camel_case_and_fills_defaults() {
        let props: WorldProperties =
            serde_json::from_str(r#"{"seed": 12, "playerLimit": 5, "type": "FLAT"}"#).unwrap();
        assert_eq!(props.seed(), 12);
        assert_eq!(props.get(Property::PlayerLimit), PropertyValue::Int(5));
        assert_eq!(props.world_type(), Some(WorldType::Flat));
        assert!(props.adjust_spawn());

        let json = serde_json::to_string(&props).unwrap();
        assert!(json.contains("\"adjustSpawn\":true"));
        assert!(json.contains("\"worldBlacklist\":[]"));
    }
}
