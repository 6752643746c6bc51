//! A managed world and its named-property operations.

use crate::error::PropertyError;
use crate::properties::{Property, PropertyValue, WorldProperties};
use crate::settings::{WorldEnvironment, WorldType};

/// A world that is loaded on the server and tracked by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    name: String,
    properties: WorldProperties,
}

impl World {
    pub fn new(name: impl Into<String>, properties: WorldProperties) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    /// Unique, case-sensitive world name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configured alias, or the name when no alias is set.
    pub fn alias(&self) -> &str {
        match self.properties.alias() {
            "" => &self.name,
            alias => alias,
        }
    }

    /// Whether `name` is this world's configured alias. An unset alias never matches.
    pub fn has_alias(&self, name: &str) -> bool {
        let alias = self.properties.alias();
        !alias.is_empty() && alias == name
    }

    pub fn seed(&self) -> i64 {
        self.properties.seed()
    }

    pub fn environment(&self) -> WorldEnvironment {
        self.properties.environment()
    }

    pub fn world_type(&self) -> Option<WorldType> {
        self.properties.world_type()
    }

    pub fn adjust_spawn(&self) -> bool {
        self.properties.adjust_spawn()
    }

    pub fn set_adjust_spawn(&mut self, adjust: bool) {
        self.properties.set_adjust_spawn(adjust);
    }

    pub fn properties(&self) -> &WorldProperties {
        &self.properties
    }

    pub fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        Ok(self.properties.get(Property::lookup(name)?))
    }

    pub fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        let property = Property::lookup(name)?;
        self.properties.set(&self.name, property, value)
    }

    pub fn add_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        let property = Property::lookup(name)?;
        self.properties.add(&self.name, property, value)
    }

    pub fn remove_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        let property = Property::lookup(name)?;
        self.properties.remove(property, value)
    }

    pub fn clear_property(&mut self, name: &str) -> Result<(), PropertyError> {
        let property = Property::lookup(name)?;
        self.properties.clear(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(name: &str) -> World {
        World::new(name, WorldProperties::default())
    }

    #[test]
    fn alias_falls_back_to_name() {
        let mut w = world("world_nether");
        assert_eq!(w.alias(), "world_nether");
        assert!(!w.has_alias("world_nether"));

        w.set_property("alias", "Hell").unwrap();
        assert_eq!(w.alias(), "Hell");
        assert!(w.has_alias("Hell"));
    }

    #[test]
    fn remove_unknown_property_leaves_world_unchanged() {
        let mut w = world("world");
        w.add_property("worldBlacklist", "nether").unwrap();
        let before = w.clone();

        let err = w.remove_property("flySpeed", "1").unwrap_err();
        assert!(matches!(err, PropertyError::Unknown { .. }));
        assert_eq!(err.property(), "flySpeed");
        assert_eq!(w, before);
    }

    #[test]
    fn remove_property_value() {
        let mut w = world("world");
        w.add_property("worldBlacklist", "nether").unwrap();
        w.remove_property("worldblacklist", "nether").unwrap();
        assert_eq!(
            w.get_property("worldBlacklist").unwrap(),
            PropertyValue::List(vec![])
        );
    }

    #[test]
    fn adjust_spawn_accessor() {
        let mut w = world("world");
        assert!(w.adjust_spawn());
        w.set_adjust_spawn(false);
        assert!(!w.adjust_spawn());
        assert_eq!(w.get_property("adjustSpawn").unwrap(), PropertyValue::Bool(false));
    }
}
