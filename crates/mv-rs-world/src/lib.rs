//! World registry: creation settings, per-world properties, and the manager
//! that tracks which worlds are live.

pub mod backend;
pub mod error;
pub mod manager;
pub mod properties;
pub mod settings;
pub mod testing;
pub mod world;

pub use backend::WorldBackend;
pub use error::{PropertyError, ValueParseError, WorldCreationError, WorldSaveError};
pub use manager::WorldManager;
pub use properties::{property_description, property_names, Property, PropertyValue, WorldProperties};
pub use settings::{parse_seed, WorldCreationSettings, WorldEnvironment, WorldType};
pub use world::World;
