use std::collections::HashMap;
use std::path::Path;

use mv_rs_world::{WorldCreationSettings, WorldEnvironment, WorldType};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub permissions: PermissionsSection,
    /// Message template overrides keyed by message id. Quote dotted keys.
    #[serde(default)]
    pub messages: HashMap<String, String>,
    /// Worlds to bring up at start, besides the default world.
    #[serde(default)]
    pub worlds: Vec<WorldEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_worlds_directory")]
    pub worlds_directory: String,
    /// The primary world. It is always loaded and cannot be unloaded.
    #[serde(default = "default_world_name")]
    pub default_world: String,
}

fn default_worlds_directory() -> String {
    "worlds".into()
}

fn default_world_name() -> String {
    "world".into()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            worlds_directory: default_worlds_directory(),
            default_world: default_world_name(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PermissionsSection {
    #[serde(default = "default_permissions_file")]
    pub file: String,
}

fn default_permissions_file() -> String {
    "permissions.json".into()
}

impl Default for PermissionsSection {
    fn default() -> Self {
        Self {
            file: default_permissions_file(),
        }
    }
}

/// A world loaded at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct WorldEntry {
    pub name: String,
    #[serde(default)]
    pub environment: WorldEnvironment,
    /// Numeric seed or any text to hash into one.
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default, rename = "type")]
    pub world_type: Option<WorldType>,
    #[serde(default)]
    pub generator: Option<String>,
    #[serde(default)]
    pub generate_structures: Option<bool>,
    #[serde(default = "default_true")]
    pub adjust_spawn: bool,
}

fn default_true() -> bool {
    true
}

impl WorldEntry {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            environment: WorldEnvironment::Normal,
            seed: None,
            world_type: None,
            generator: None,
            generate_structures: None,
            adjust_spawn: true,
        }
    }

    pub fn to_settings(&self) -> WorldCreationSettings {
        let mut settings = WorldCreationSettings::new(&self.name)
            .environment(self.environment)
            .world_type(self.world_type)
            .generate_structures(self.generate_structures)
            .generator(self.generator.clone().filter(|g| !g.is_empty()))
            .adjust_spawn(self.adjust_spawn);
        if let Some(seed) = self.seed.as_deref().and_then(mv_rs_world::parse_seed) {
            settings = settings.seed(seed);
        }
        settings
    }
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Startup worlds with the default world first. A `[[worlds]]` entry for
    /// the default world supplies its settings.
    pub fn startup_worlds(&self) -> Vec<WorldEntry> {
        let default = &self.server.default_world;
        let mut entries = vec![self
            .worlds
            .iter()
            .find(|w| &w.name == default)
            .cloned()
            .unwrap_or_else(|| WorldEntry::named(default))];
        entries.extend(self.worlds.iter().filter(|w| &w.name != default).cloned());
        entries
    }
}
