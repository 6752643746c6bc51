//! In-memory [`WorldBackend`] for tests.

use std::collections::{HashMap, HashSet};
use std::io;

use crate::backend::WorldBackend;
use crate::error::WorldCreationError;
use crate::properties::WorldProperties;
use crate::settings::WorldCreationSettings;
use crate::world::World;

/// Records everything the registry asks of it and keeps "disk" in a map.
#[derive(Debug, Default)]
pub struct FakeBackend {
    /// Worlds currently loaded on the fake server.
    pub loaded: HashSet<String>,
    /// Persisted properties, keyed by world name.
    pub stored: HashMap<String, WorldProperties>,
    /// Worlds the server refuses to unload.
    pub protected: HashSet<String>,
    /// Worlds whose property store fails to open.
    pub broken_storage: HashSet<String>,
    /// Worlds the server refuses to create.
    pub rejected: HashSet<String>,
    /// Number of `create_world` calls.
    pub create_calls: usize,
    /// Number of `save_world_properties` calls.
    pub save_calls: usize,
}

impl FakeBackend {
    /// A backend whose default world cannot be unloaded.
    pub fn with_default_world(name: &str) -> Self {
        let mut backend = Self::default();
        backend.protected.insert(name.to_string());
        backend
    }
}

impl WorldBackend for FakeBackend {
    fn world_properties(&mut self, name: &str) -> io::Result<WorldProperties> {
        if self.broken_storage.contains(name) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("cannot open properties for {name}"),
            ));
        }
        Ok(self.stored.get(name).cloned().unwrap_or_default())
    }

    fn save_world_properties(&mut self, name: &str, properties: &WorldProperties) -> io::Result<()> {
        self.save_calls += 1;
        self.stored.insert(name.to_string(), properties.clone());
        Ok(())
    }

    fn create_world(
        &mut self,
        settings: &WorldCreationSettings,
        mut properties: WorldProperties,
    ) -> Result<World, WorldCreationError> {
        self.create_calls += 1;
        let name = settings.name();
        if self.rejected.contains(name) {
            return Err(WorldCreationError::Rejected {
                name: name.to_string(),
                reason: "rejected by test".into(),
            });
        }
        if !self.stored.contains_key(name) {
            properties.apply_creation(settings, settings.seed_value().unwrap_or(0));
            self.stored.insert(name.to_string(), properties.clone());
        }
        self.loaded.insert(name.to_string());
        Ok(World::new(name, properties))
    }

    fn unload_world_from_server(&mut self, world: &World) -> bool {
        if self.protected.contains(world.name()) {
            return false;
        }
        self.loaded.remove(world.name())
    }
}
