//! Symbolic message ids and the bundle that turns them into text.
//!
//! Templates use `%s` placeholders filled left to right. Servers may override
//! any template by its key.

use std::collections::HashMap;
use std::fmt::{self, Write};

/// Every message a command can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    UnknownCommand,
    Usage,
    NoPermission,
    WorldRequired,
    WorldNotFound,
    InvalidArgument,
    PropertyList,
    PropertyDescription,
    NoSuchProperty,
    PropertyCannotBeRemoved,
    PropertyReadOnly,
    ProbablyInvalidValue,
    NoModifyPermission,
    ModifySetSuccess,
    ModifyAddSuccess,
    ModifyRemoveSuccess,
    ModifyClearSuccess,
    SaveFailed,
    WorldListHeader,
    WorldListEntry,
    WorldInfo,
    CreateStarting,
    CreateSuccess,
    CreateFailed,
    WorldAlreadyExists,
    UnloadSuccess,
    UnloadFailed,
}

impl Message {
    pub const ALL: [Message; 27] = [
        Message::UnknownCommand,
        Message::Usage,
        Message::NoPermission,
        Message::WorldRequired,
        Message::WorldNotFound,
        Message::InvalidArgument,
        Message::PropertyList,
        Message::PropertyDescription,
        Message::NoSuchProperty,
        Message::PropertyCannotBeRemoved,
        Message::PropertyReadOnly,
        Message::ProbablyInvalidValue,
        Message::NoModifyPermission,
        Message::ModifySetSuccess,
        Message::ModifyAddSuccess,
        Message::ModifyRemoveSuccess,
        Message::ModifyClearSuccess,
        Message::SaveFailed,
        Message::WorldListHeader,
        Message::WorldListEntry,
        Message::WorldInfo,
        Message::CreateStarting,
        Message::CreateSuccess,
        Message::CreateFailed,
        Message::WorldAlreadyExists,
        Message::UnloadSuccess,
        Message::UnloadFailed,
    ];

    /// Key used to override the template in configuration.
    pub fn key(self) -> &'static str {
        match self {
            Message::UnknownCommand => "command.unknown",
            Message::Usage => "command.usage",
            Message::NoPermission => "command.no_permission",
            Message::WorldRequired => "command.world_required",
            Message::WorldNotFound => "command.world_not_found",
            Message::InvalidArgument => "command.invalid_argument",
            Message::PropertyList => "command.modify.property_list",
            Message::PropertyDescription => "command.modify.property_description",
            Message::NoSuchProperty => "command.modify.no_such_property",
            Message::PropertyCannotBeRemoved => "command.modify.cannot_be_removed",
            Message::PropertyReadOnly => "command.modify.read_only",
            Message::ProbablyInvalidValue => "command.modify.probably_invalid_value",
            Message::NoModifyPermission => "command.modify.no_permission",
            Message::ModifySetSuccess => "command.modify.set.success",
            Message::ModifyAddSuccess => "command.modify.add.success",
            Message::ModifyRemoveSuccess => "command.modify.remove.success",
            Message::ModifyClearSuccess => "command.modify.clear.success",
            Message::SaveFailed => "command.modify.save_failed",
            Message::WorldListHeader => "command.list.header",
            Message::WorldListEntry => "command.list.entry",
            Message::WorldInfo => "command.info",
            Message::CreateStarting => "command.create.starting",
            Message::CreateSuccess => "command.create.success",
            Message::CreateFailed => "command.create.failed",
            Message::WorldAlreadyExists => "command.create.already_exists",
            Message::UnloadSuccess => "command.unload.success",
            Message::UnloadFailed => "command.unload.failed",
        }
    }

    pub fn default_template(self) -> &'static str {
        match self {
            Message::UnknownCommand => "Unknown command: %s. Type /help for a list of commands.",
            Message::Usage => "Usage: /%s %s",
            Message::NoPermission => "You do not have permission to use this command.",
            Message::WorldRequired => "You must name a world when running this from the console.",
            Message::WorldNotFound => "No managed world is named '%s'.",
            Message::InvalidArgument => "Invalid %s: %s",
            Message::PropertyList => "World properties: %s",
            Message::PropertyDescription => "%s: %s",
            Message::NoSuchProperty => "There is no property named '%s'.",
            Message::PropertyCannotBeRemoved => {
                "Property '%s' is not a list; values cannot be added to or removed from it."
            }
            Message::PropertyReadOnly => "Property '%s' cannot be changed after the world is created.",
            Message::ProbablyInvalidValue => "That is probably not a valid value for '%s': %s",
            Message::NoModifyPermission => "You do not have permission to modify world '%s'.",
            Message::ModifySetSuccess => "Set %s to '%s'. It is now: %s",
            Message::ModifyAddSuccess => "Added '%s' to %s. It is now: %s",
            Message::ModifyRemoveSuccess => "Removed '%s' from %s. It is now: %s",
            Message::ModifyClearSuccess => "Cleared %s. It is now: %s",
            Message::SaveFailed => "The change was applied but could not be saved: %s",
            Message::WorldListHeader => "Worlds (%s):",
            Message::WorldListEntry => "  %s - %s",
            Message::WorldInfo => "World '%s' (alias %s): %s, seed %s, type %s",
            Message::CreateStarting => "Starting creation of world '%s'...",
            Message::CreateSuccess => "Created world '%s' with seed %s.",
            Message::CreateFailed => "Could not create world '%s': %s",
            Message::WorldAlreadyExists => "A world named '%s' already exists.",
            Message::UnloadSuccess => "Unloaded world '%s'.",
            Message::UnloadFailed => "World '%s' could not be unloaded. Is it the default world?",
        }
    }

    pub fn from_key(key: &str) -> Option<Message> {
        Message::ALL.into_iter().find(|m| m.key() == key)
    }
}

/// Message templates, with optional per-key overrides.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    overrides: HashMap<Message, String>,
}

impl MessageBundle {
    /// Build a bundle from `key -> template` pairs. Unknown keys are returned
    /// so the caller can report them.
    pub fn with_overrides<I>(overrides: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut bundle = Self::default();
        let mut unknown = Vec::new();
        for (key, template) in overrides {
            match Message::from_key(&key) {
                Some(message) => {
                    bundle.overrides.insert(message, template);
                }
                None => unknown.push(key),
            }
        }
        (bundle, unknown)
    }

    pub fn template(&self, message: Message) -> &str {
        self.overrides
            .get(&message)
            .map(String::as_str)
            .unwrap_or_else(|| message.default_template())
    }

    /// Fill a message's `%s` placeholders with `args`, in order.
    ///
    /// Missing arguments render as nothing; extra arguments are ignored.
    pub fn render(&self, message: Message, args: &[&dyn fmt::Display]) -> String {
        let mut rest = self.template(message);
        let mut out = String::with_capacity(rest.len());
        let mut args = args.iter();
        while let Some(idx) = rest.find("%s") {
            out.push_str(&rest[..idx]);
            if let Some(arg) = args.next() {
                let _ = write!(out, "{arg}");
            }
            rest = &rest[idx + 2..];
        }
        out.push_str(rest);
        out
    }
}
