//! Directory-backed world host.
//!
//! Stands in for the game server's world loader: a world "exists" once its
//! level marker is on disk and is "loaded" while it sits in the loaded set.

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use mv_rs_world::{World, WorldBackend, WorldCreationError, WorldCreationSettings, WorldProperties};
use tracing::{debug, info};

use crate::persistence::{LevelInfo, WorldStore};

pub struct DirectoryHost {
    store: WorldStore,
    default_world: String,
    loaded: HashSet<String>,
}

impl DirectoryHost {
    pub fn new(root: impl Into<PathBuf>, default_world: &str) -> io::Result<Self> {
        let store = WorldStore::new(root);
        std::fs::create_dir_all(store.root())?;
        Ok(Self {
            store,
            default_world: default_world.to_string(),
            loaded: HashSet::new(),
        })
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    fn invalid_name_reason(name: &str) -> Option<&'static str> {
        if name.is_empty() {
            Some("name is empty")
        } else if name.contains(['/', '\\']) || name == "." || name == ".." {
            Some("name must not contain path separators")
        } else if name.chars().any(char::is_whitespace) {
            Some("name must not contain spaces")
        } else {
            None
        }
    }

    fn validate_name(name: &str) -> Result<(), WorldCreationError> {
        let Some(reason) = Self::invalid_name_reason(name) else {
            return Ok(());
        };
        Err(WorldCreationError::InvalidSettings {
            name: name.to_string(),
            reason: reason.into(),
        })
    }
}

impl WorldBackend for DirectoryHost {
    fn world_properties(&mut self, name: &str) -> io::Result<WorldProperties> {
        // Names that can never be created have nothing on disk.
        if Self::invalid_name_reason(name).is_some() {
            return Ok(WorldProperties::default());
        }
        self.store.load_or_create_properties(name)
    }

    fn save_world_properties(&mut self, name: &str, properties: &WorldProperties) -> io::Result<()> {
        self.store.save_properties(name, properties)
    }

    fn create_world(
        &mut self,
        settings: &WorldCreationSettings,
        mut properties: WorldProperties,
    ) -> Result<World, WorldCreationError> {
        let name = settings.name();
        Self::validate_name(name)?;
        let io_err = |source: io::Error| WorldCreationError::Io {
            name: name.to_string(),
            source,
        };

        if self.loaded.contains(name) {
            debug!("World '{name}' is already loaded, attaching");
        } else if self.store.has_level(name) {
            let level = self.store.load_level(name).map_err(io_err)?;
            properties.apply_creation(&level.to_settings(), level.seed);
            info!("Loading existing world '{name}' (seed {})", level.seed);
        } else {
            let seed = settings.seed_value().unwrap_or_else(rand::random);
            let level = LevelInfo::new(settings, seed);
            self.store.save_level(&level).map_err(io_err)?;
            properties.apply_creation(settings, seed);
            self.store.save_properties(name, &properties).map_err(io_err)?;
            info!("Generated new {} world '{name}' (seed {seed})", settings.environment_value());
        }

        self.loaded.insert(name.to_string());
        Ok(World::new(name, properties))
    }

    fn unload_world_from_server(&mut self, world: &World) -> bool {
        if world.name() == self.default_world {
            return false;
        }
        self.loaded.remove(world.name())
    }
}
