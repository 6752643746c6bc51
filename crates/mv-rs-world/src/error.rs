//! World registry and property error types.

use std::io;

use thiserror::Error;

/// Failure to bring a world under management.
#[derive(Debug, Error)]
pub enum WorldCreationError {
    #[error("world '{name}' already exists")]
    AlreadyExists { name: String },

    #[error("could not access properties for world '{name}': {source}")]
    Properties {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings for world '{name}': {reason}")]
    InvalidSettings { name: String, reason: String },

    #[error("server refused to create world '{name}': {reason}")]
    Rejected { name: String, reason: String },

    #[error("I/O error creating world '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl WorldCreationError {
    /// Whether this error is the "name already registered" case.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, WorldCreationError::AlreadyExists { .. })
    }
}

/// Failure to persist a registered world's properties.
#[derive(Debug, Error)]
pub enum WorldSaveError {
    #[error("world '{0}' is not managed")]
    NotManaged(String),

    #[error("could not save properties for world '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Why a property lookup or mutation on a single world failed.
///
/// The property bag is left untouched whenever one of these is returned.
#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("no such property: {property}")]
    Unknown { property: String },

    #[error("property '{property}' cannot be changed after creation")]
    ReadOnly { property: String },

    #[error("property '{property}' is not a list and cannot be added to or removed from")]
    NotRemovable { property: String },

    #[error("{reason}")]
    Vetoed { property: String, reason: String },

    #[error("invalid value for property '{property}': {source}")]
    InvalidValue {
        property: String,
        #[source]
        source: ValueParseError,
    },
}

impl PropertyError {
    /// Name of the property the failure refers to.
    pub fn property(&self) -> &str {
        match self {
            PropertyError::Unknown { property }
            | PropertyError::ReadOnly { property }
            | PropertyError::NotRemovable { property }
            | PropertyError::Vetoed { property, .. }
            | PropertyError::InvalidValue { property, .. } => property,
        }
    }
}

/// A textual property value that could not be converted to its typed form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueParseError {
    #[error("'{0}' is not a boolean")]
    Bool(String),

    #[error("'{0}' is not an integer")]
    Int(String),

    #[error("'{value}' is not one of {expected}")]
    Enum { value: String, expected: &'static str },
}
