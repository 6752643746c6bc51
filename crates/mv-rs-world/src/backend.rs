//! The host-server capability the registry delegates to.

use std::io;

use crate::error::WorldCreationError;
use crate::properties::WorldProperties;
use crate::settings::WorldCreationSettings;
use crate::world::World;

/// Operations the registry cannot perform itself: touching the live server
/// and the property store.
///
/// Implementations run on the server's main thread only.
pub trait WorldBackend {
    /// Fetch the stored properties of a world, creating defaults when none exist yet.
    fn world_properties(&mut self, name: &str) -> io::Result<WorldProperties>;

    /// Persist a world's properties.
    fn save_world_properties(&mut self, name: &str, properties: &WorldProperties) -> io::Result<()>;

    /// Bring a world up on the server and wrap it.
    ///
    /// If the server already has it loaded, attach to it. If it exists on disk
    /// but is not loaded, load it. Otherwise generate it from `settings`.
    fn create_world(
        &mut self,
        settings: &WorldCreationSettings,
        properties: WorldProperties,
    ) -> Result<World, WorldCreationError>;

    /// Unload a world from the live server. Returns `false` if the server refused.
    fn unload_world_from_server(&mut self, world: &World) -> bool;
}
