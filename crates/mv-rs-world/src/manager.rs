//! The world registry.
//!
//! Tracks every world the plugin manages, keyed by exact name. Creation,
//! loading and unloading go through the injected [`WorldBackend`]; the map is
//! only changed after the backend reports success, so it always mirrors the
//! server.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::backend::WorldBackend;
use crate::error::{WorldCreationError, WorldSaveError};
use crate::settings::{parse_seed, WorldCreationSettings, WorldEnvironment, WorldType};
use crate::world::World;

/// Registry of managed worlds.
///
/// Not thread-safe; all calls are expected on the server's main thread.
pub struct WorldManager<B> {
    backend: B,
    worlds: HashMap<String, World>,
}

impl<B: WorldBackend> WorldManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            worlds: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Create or load a world and start managing it.
    ///
    /// Fails with [`WorldCreationError::AlreadyExists`] when the name is
    /// already managed. Calling this twice with one name is an error, not a no-op.
    pub fn add_world(&mut self, settings: WorldCreationSettings) -> Result<&World, WorldCreationError> {
        let name = settings.name().to_string();
        if self.worlds.contains_key(&name) {
            return Err(WorldCreationError::AlreadyExists { name });
        }

        let properties = self
            .backend
            .world_properties(&name)
            .map_err(|source| WorldCreationError::Properties {
                name: name.clone(),
                source,
            })?;

        let mut world = self.backend.create_world(&settings, properties)?;
        world.set_adjust_spawn(settings.adjust_spawn_value());
        info!(
            "Managing world '{name}' ({}, seed {})",
            world.environment(),
            world.seed()
        );
        Ok(self.worlds.entry(name).or_insert(world))
    }

    /// Build settings from loose arguments and add the world.
    ///
    /// A numeric `seed` is used verbatim; any other non-empty text is hashed.
    /// An empty generator string counts as no generator.
    #[allow(clippy::too_many_arguments)]
    pub fn add_world_with(
        &mut self,
        name: &str,
        environment: Option<WorldEnvironment>,
        seed: Option<&str>,
        world_type: Option<WorldType>,
        generate_structures: Option<bool>,
        generator: Option<&str>,
        adjust_spawn: bool,
    ) -> Result<&World, WorldCreationError> {
        let mut settings = WorldCreationSettings::new(name)
            .environment(environment.unwrap_or_default())
            .world_type(world_type)
            .generate_structures(generate_structures)
            .generator(generator.filter(|g| !g.is_empty()).map(str::to_string))
            .adjust_spawn(adjust_spawn);
        if let Some(seed) = seed.and_then(parse_seed) {
            settings = settings.seed(seed);
        }
        self.add_world(settings)
    }

    /// [`add_world_with`](Self::add_world_with) with spawn adjustment enabled.
    pub fn add_world_default(
        &mut self,
        name: &str,
        environment: Option<WorldEnvironment>,
        seed: Option<&str>,
        world_type: Option<WorldType>,
        generate_structures: Option<bool>,
        generator: Option<&str>,
    ) -> Result<&World, WorldCreationError> {
        self.add_world_with(
            name,
            environment,
            seed,
            world_type,
            generate_structures,
            generator,
            true,
        )
    }

    /// Whether a world with exactly this name is managed.
    pub fn is_managed(&self, name: &str) -> bool {
        self.worlds.contains_key(name)
    }

    /// Look a world up by name, falling back to its alias.
    ///
    /// When several worlds share the alias, whichever the map yields first
    /// wins; the map has no stable order.
    pub fn get_world(&self, name: &str) -> Option<&World> {
        self.resolve(name).and_then(|key| self.worlds.get(key))
    }

    pub fn get_world_mut(&mut self, name: &str) -> Option<&mut World> {
        let key = self.resolve(name)?.to_string();
        self.worlds.get_mut(&key)
    }

    /// Read-only view of every managed world.
    pub fn worlds(&self) -> impl Iterator<Item = &World> {
        self.worlds.values()
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    /// Unload a world by name or alias.
    ///
    /// Returns `false` when nothing matches or the server refuses; neither
    /// case is an error.
    pub fn unload_world(&mut self, name: &str) -> bool {
        match self.resolve(name).map(str::to_string) {
            Some(key) => self.unload_managed_world(&key),
            None => {
                info!("'{name}' is not a world managed by this server.");
                false
            }
        }
    }

    /// Unload the managed world with exactly this name.
    ///
    /// The world leaves the registry only if the server unloads it.
    pub fn unload_managed_world(&mut self, world_name: &str) -> bool {
        let Some(world) = self.worlds.get(world_name) else {
            debug!("Unload requested for unmanaged world '{world_name}'");
            return false;
        };
        if self.backend.unload_world_from_server(world) {
            self.worlds.remove(world_name);
            info!("World '{world_name}' was unloaded from memory.");
            true
        } else {
            warn!("World '{world_name}' could not be unloaded. Is it a default world?");
            false
        }
    }

    /// Persist a managed world's properties.
    pub fn save_world(&mut self, world_name: &str) -> Result<(), WorldSaveError> {
        let world = self
            .worlds
            .get(world_name)
            .ok_or_else(|| WorldSaveError::NotManaged(world_name.to_string()))?;
        self.backend
            .save_world_properties(world.name(), world.properties())
            .map_err(|source| WorldSaveError::Io {
                name: world_name.to_string(),
                source,
            })
    }

    /// Save every world and forget them all. The registry is empty afterwards.
    pub fn shutdown(&mut self) {
        for (name, world) in &self.worlds {
            if let Err(e) = self.backend.save_world_properties(name, world.properties()) {
                warn!("Failed to save world '{name}': {e}");
            }
        }
        info!("Released {} managed world(s)", self.worlds.len());
        self.worlds.clear();
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.worlds.get_key_value(name) {
            return Some(key.as_str());
        }
        self.worlds
            .iter()
            .find(|(_, w)| w.has_alias(name))
            .map(|(key, _)| key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    fn manager() -> WorldManager<FakeBackend> {
        WorldManager::new(FakeBackend::with_default_world("world"))
    }

    #[test]
    fn add_world_registers_it() {
        let mut mgr = manager();
        assert!(!mgr.is_managed("survival"));
        let world = mgr
            .add_world(WorldCreationSettings::new("survival").seed(3))
            .unwrap();
        assert_eq!(world.name(), "survival");
        assert_eq!(world.seed(), 3);
        assert!(mgr.is_managed("survival"));
        assert_eq!(mgr.len(), 1);
        assert!(mgr.backend().loaded.contains("survival"));
    }

    #[test]
    fn add_world_twice_is_already_exists() {
        let mut mgr = manager();
        mgr.add_world(WorldCreationSettings::new("survival").seed(3))
            .unwrap();
        let before = mgr.get_world("survival").cloned();

        let err = mgr
            .add_world(WorldCreationSettings::new("survival").seed(4))
            .unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(mgr.len(), 1);
        assert_eq!(mgr.get_world("survival").cloned(), before);
        assert_eq!(mgr.backend().create_calls, 1);
    }

    #[test]
    fn adjust_spawn_comes_from_settings() {
        let mut mgr = manager();
        let world = mgr
            .add_world(WorldCreationSettings::new("skyblock").adjust_spawn(false))
            .unwrap();
        assert!(!world.adjust_spawn());
    }

    #[test]
    fn properties_failure_becomes_creation_error() {
        let mut backend = FakeBackend::default();
        backend.broken_storage.insert("broken".into());
        let mut mgr = WorldManager::new(backend);

        let err = mgr.add_world(WorldCreationSettings::new("broken")).unwrap_err();
        assert!(matches!(err, WorldCreationError::Properties { .. }));
        assert!(!mgr.is_managed("broken"));
        assert_eq!(mgr.backend().create_calls, 0);
    }

    #[test]
    fn rejected_creation_is_not_registered() {
        let mut backend = FakeBackend::default();
        backend.rejected.insert("bad".into());
        let mut mgr = WorldManager::new(backend);

        let err = mgr.add_world(WorldCreationSettings::new("bad")).unwrap_err();
        assert!(matches!(err, WorldCreationError::Rejected { .. }));
        assert!(mgr.is_empty());
    }

    #[test]
    fn existing_world_keeps_its_stored_seed() {
        let mut backend = FakeBackend::default();
        let mut stored = crate::WorldProperties::default();
        stored.apply_creation(&WorldCreationSettings::new("old"), 777);
        backend.stored.insert("old".into(), stored);
        let mut mgr = WorldManager::new(backend);

        let world = mgr.add_world(WorldCreationSettings::new("old").seed(1)).unwrap();
        assert_eq!(world.seed(), 777);
    }

    #[test]
    fn convenience_overload_parses_seed() {
        let mut mgr = manager();
        let world = mgr
            .add_world_default("world", Some(WorldEnvironment::Normal), Some("12345"), None, None, None)
            .unwrap();
        assert_eq!(world.seed(), 12345);
        assert!(world.adjust_spawn());
        assert!(mgr.is_managed("world"));
    }

    #[test]
    fn convenience_overload_hashes_word_seed() {
        let mut a = manager();
        let mut b = manager();
        let seed_a = a
            .add_world_default("w", None, Some("mountains"), None, None, None)
            .unwrap()
            .seed();
        let seed_b = b
            .add_world_default("w", None, Some("mountains"), None, None, None)
            .unwrap()
            .seed();
        assert_eq!(seed_a, seed_b);
        assert_eq!(seed_a, crate::settings::string_hash("mountains") as i64);
    }

    #[test]
    fn convenience_overload_passes_through_options() {
        let mut mgr = manager();
        let world = mgr
            .add_world_with(
                "flat",
                Some(WorldEnvironment::End),
                Some(""),
                Some(WorldType::Flat),
                Some(false),
                Some(""),
                false,
            )
            .unwrap();
        assert_eq!(world.environment(), WorldEnvironment::End);
        assert_eq!(world.world_type(), Some(WorldType::Flat));
        assert_eq!(world.properties().generator(), None);
        assert!(!world.adjust_spawn());
    }

    #[test]
    fn get_world_by_alias() {
        let mut mgr = manager();
        mgr.add_world(WorldCreationSettings::new("world_nether"))
            .unwrap();
        mgr.get_world_mut("world_nether")
            .unwrap()
            .set_property("alias", "Hell")
            .unwrap();

        assert_eq!(mgr.get_world("Hell").unwrap().name(), "world_nether");
        assert!(!mgr.is_managed("Hell"));
        assert!(mgr.get_world("Heaven").is_none());
    }

    #[test]
    fn exact_name_beats_alias() {
        let mut mgr = manager();
        mgr.add_world(WorldCreationSettings::new("A")).unwrap();
        mgr.add_world(WorldCreationSettings::new("B")).unwrap();
        mgr.get_world_mut("B")
            .unwrap()
            .set_property("alias", "A")
            .unwrap();

        assert_eq!(mgr.get_world("A").unwrap().name(), "A");
        assert_eq!(mgr.get_world_mut("A").unwrap().name(), "A");
    }

    #[test]
    fn worlds_view_lists_everything() {
        let mut mgr = manager();
        mgr.add_world(WorldCreationSettings::new("a")).unwrap();
        mgr.add_world(WorldCreationSettings::new("b")).unwrap();
        let mut names: Vec<&str> = mgr.worlds().map(World::name).collect();
        names.sort();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn unload_unknown_name_is_false() {
        let mut mgr = manager();
        mgr.add_world(WorldCreationSettings::new("a")).unwrap();
        assert!(!mgr.unload_world("nowhere"));
        assert_eq!(mgr.len(), 1);
    }

    #[test]
    fn unload_round_trip() {
        let mut mgr = manager();
        let name = mgr
            .add_world(WorldCreationSettings::new("event"))
            .unwrap()
            .name()
            .to_string();
        assert!(mgr.unload_managed_world(&name));
        assert!(!mgr.is_managed("event"));
        assert!(mgr.get_world("event").is_none());
        assert!(!mgr.backend().loaded.contains("event"));
    }

    #[test]
    fn unload_by_alias() {
        let mut mgr = manager();
        mgr.add_world(WorldCreationSettings::new("event")).unwrap();
        mgr.get_world_mut("event")
            .unwrap()
            .set_property("alias", "Party")
            .unwrap();
        assert!(mgr.unload_world("Party"));
        assert!(!mgr.is_managed("event"));
    }

    #[test]
    fn default_world_refuses_unload() {
        let mut mgr = manager();
        mgr.add_world_default("world", Some(WorldEnvironment::Normal), Some("12345"), None, None, None)
            .unwrap();
        assert!(!mgr.unload_world("world"));
        assert!(mgr.is_managed("world"));
        assert_eq!(mgr.get_world("world").unwrap().seed(), 12345);
    }

    #[test]
    fn save_world_persists_properties() {
        let mut mgr = manager();
        mgr.add_world(WorldCreationSettings::new("a")).unwrap();
        mgr.get_world_mut("a")
            .unwrap()
            .set_property("pvp", "false")
            .unwrap();
        mgr.save_world("a").unwrap();
        assert_eq!(mgr.backend().stored["a"], *mgr.get_world("a").unwrap().properties());

        assert!(matches!(
            mgr.save_world("missing"),
            Err(WorldSaveError::NotManaged(_))
        ));
    }

    #[test]
    fn shutdown_saves_and_clears() {
        let mut mgr = manager();
        mgr.add_world(WorldCreationSettings::new("a")).unwrap();
        mgr.add_world(WorldCreationSettings::new("b")).unwrap();
        let saves_before = mgr.backend().save_calls;
        mgr.shutdown();
        assert!(mgr.is_empty());
        assert_eq!(mgr.backend().save_calls, saves_before + 2);
    }
}
