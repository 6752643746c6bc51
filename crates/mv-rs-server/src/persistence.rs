//! On-disk world data: per-world properties and the level marker.
//!
//! Layout under the worlds directory:
//! `<name>/properties.json` (editable world properties) and
//! `<name>/level.json` (written once when the world is generated).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mv_rs_world::{WorldCreationSettings, WorldEnvironment, WorldProperties, WorldType};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const PROPERTIES_FILE: &str = "properties.json";
const LEVEL_FILE: &str = "level.json";

/// Creation-time facts about a generated world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub name: String,
    pub seed: i64,
    pub environment: WorldEnvironment,
    #[serde(default, rename = "type")]
    pub world_type: Option<WorldType>,
    #[serde(default)]
    pub generator: Option<String>,
    #[serde(default)]
    pub generate_structures: Option<bool>,
}

impl LevelInfo {
    pub fn new(settings: &WorldCreationSettings, seed: i64) -> Self {
        Self {
            name: settings.name().to_string(),
            seed,
            environment: settings.environment_value(),
            world_type: settings.world_type_value(),
            generator: settings.generator_value().map(str::to_string),
            generate_structures: settings.generate_structures_value(),
        }
    }

    /// Settings equivalent to the ones this level was generated with.
    pub fn to_settings(&self) -> WorldCreationSettings {
        WorldCreationSettings::new(&self.name)
            .seed(self.seed)
            .environment(self.environment)
            .world_type(self.world_type)
            .generate_structures(self.generate_structures)
            .generator(self.generator.clone())
    }
}

/// Reads and writes world data below one directory.
#[derive(Debug, Clone)]
pub struct WorldStore {
    root: PathBuf,
}

impl WorldStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn world_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Load a world's properties, writing defaults first if the file is missing.
    pub fn load_or_create_properties(&self, name: &str) -> io::Result<WorldProperties> {
        let path = self.world_dir(name).join(PROPERTIES_FILE);
        if !path.exists() {
            let properties = WorldProperties::default();
            self.save_properties(name, &properties)?;
            info!("Created default properties for world '{name}'");
            return Ok(properties);
        }
        let contents = fs::read_to_string(&path)?;
        let properties = serde_json::from_str(&contents)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{}: {e}", path.display())))?;
        debug!("Loaded properties from {}", path.display());
        Ok(properties)
    }

    pub fn save_properties(&self, name: &str, properties: &WorldProperties) -> io::Result<()> {
        let dir = self.world_dir(name);
        fs::create_dir_all(&dir)?;
        let json = serde_json::to_string_pretty(properties)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(dir.join(PROPERTIES_FILE), json)
    }

    /// Whether the world has been generated before.
    pub fn has_level(&self, name: &str) -> bool {
        self.world_dir(name).join(LEVEL_FILE).exists()
    }

    pub fn load_level(&self, name: &str) -> io::Result<LevelInfo> {
        let path = self.world_dir(name).join(LEVEL_FILE);
        let contents = fs::read_to_string(&path)?;
        serde_json::from_str(&contents)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{}: {e}", path.display())))
    }

    pub fn save_level(&self, level: &LevelInfo) -> io::Result<()> {
        let dir = self.world_dir(&level.name);
        fs::create_dir_all(&dir)?;
        let json = serde_json::to_string_pretty(level)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(dir.join(LEVEL_FILE), json)
    }
}
