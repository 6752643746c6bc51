//! `/modify set|add|remove|clear`: change world properties at runtime.
//!
//! With no arguments the property names are listed; with one, the named
//! property is described. Otherwise `{PROPERTY} {VALUE} [WORLD]` (clear takes
//! no value) is applied to the target world, which is saved on success.

use mv_rs_world::{property_description, property_names, PropertyError, WorldBackend};
use tracing::warn;

use crate::{perms, target_world, CommandContext, CommandResult, Message};

pub(crate) const VALUE_USAGE: &str = "{PROPERTY} {VALUE} [WORLD]";
pub(crate) const CLEAR_USAGE: &str = "{PROPERTY} [WORLD]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModifyAction {
    Set,
    Add,
    Remove,
    Clear,
}

impl ModifyAction {
    /// Positional arguments before the optional world name.
    fn arity(self) -> usize {
        match self {
            ModifyAction::Clear => 1,
            ModifyAction::Set | ModifyAction::Add | ModifyAction::Remove => 2,
        }
    }

    fn command_name(self) -> &'static str {
        match self {
            ModifyAction::Set => "modify set",
            ModifyAction::Add => "modify add",
            ModifyAction::Remove => "modify remove",
            ModifyAction::Clear => "modify clear",
        }
    }

    fn usage(self) -> &'static str {
        match self {
            ModifyAction::Clear => CLEAR_USAGE,
            ModifyAction::Set | ModifyAction::Add | ModifyAction::Remove => VALUE_USAGE,
        }
    }

    fn success_message(self) -> Message {
        match self {
            ModifyAction::Set => Message::ModifySetSuccess,
            ModifyAction::Add => Message::ModifyAddSuccess,
            ModifyAction::Remove => Message::ModifyRemoveSuccess,
            ModifyAction::Clear => Message::ModifyClearSuccess,
        }
    }
}

pub(crate) fn cmd_modify_set<B: WorldBackend>(ctx: &mut CommandContext<'_, B>) -> CommandResult {
    run_modify(ctx, ModifyAction::Set)
}

pub(crate) fn cmd_modify_add<B: WorldBackend>(ctx: &mut CommandContext<'_, B>) -> CommandResult {
    run_modify(ctx, ModifyAction::Add)
}

pub(crate) fn cmd_modify_remove<B: WorldBackend>(ctx: &mut CommandContext<'_, B>) -> CommandResult {
    run_modify(ctx, ModifyAction::Remove)
}

pub(crate) fn cmd_modify_clear<B: WorldBackend>(ctx: &mut CommandContext<'_, B>) -> CommandResult {
    run_modify(ctx, ModifyAction::Clear)
}

fn run_modify<B: WorldBackend>(ctx: &mut CommandContext<'_, B>, action: ModifyAction) -> CommandResult {
    if ctx.args.is_empty() {
        let names: Vec<&str> = property_names().collect();
        return CommandResult::ok(ctx.render(Message::PropertyList, &[&names.join(", ")]));
    }
    if ctx.args.len() < action.arity() {
        let property = &ctx.args[0];
        return match property_description(property) {
            Some(desc) => CommandResult::ok(ctx.render(Message::PropertyDescription, &[property, &desc])),
            None => CommandResult::err(ctx.render(Message::NoSuchProperty, &[property])),
        };
    }

    if ctx.args.len() > action.arity() + 1 {
        return CommandResult::err(ctx.render(Message::Usage, &[&action.command_name(), &action.usage()]));
    }

    let world_name = match target_world(ctx, action.arity()) {
        Ok(name) => name,
        Err(result) => return result,
    };
    if !ctx.has_permission(&perms::scoped(perms::MODIFY, &world_name)) {
        return CommandResult::err(ctx.render(Message::NoModifyPermission, &[&world_name]));
    }

    let property = ctx.args[0].clone();
    let value = ctx.args.get(1).cloned().unwrap_or_default();
    let outcome = {
        let Some(world) = ctx.worlds.get_world_mut(&world_name) else {
            return CommandResult::err(ctx.render(Message::WorldNotFound, &[&world_name]));
        };
        let changed = match action {
            ModifyAction::Set => world.set_property(&property, &value),
            ModifyAction::Add => world.add_property(&property, &value),
            ModifyAction::Remove => world.remove_property(&property, &value),
            ModifyAction::Clear => world.clear_property(&property),
        };
        changed.and_then(|()| world.get_property(&property))
    };

    match outcome {
        Ok(current) => {
            let mut messages = vec![match action {
                ModifyAction::Set => ctx.render(action.success_message(), &[&property, &value, &current]),
                ModifyAction::Add | ModifyAction::Remove => {
                    ctx.render(action.success_message(), &[&value, &property, &current])
                }
                ModifyAction::Clear => ctx.render(action.success_message(), &[&property, &current]),
            }];
            if let Err(e) = ctx.worlds.save_world(&world_name) {
                warn!("Failed to save world '{world_name}' after modify: {e}");
                messages.push(ctx.render(Message::SaveFailed, &[&e]));
            }
            CommandResult::lines(true, messages)
        }
        Err(PropertyError::NotRemovable { property }) => {
            CommandResult::err(ctx.render(Message::PropertyCannotBeRemoved, &[&property]))
        }
        Err(PropertyError::ReadOnly { property }) => {
            CommandResult::err(ctx.render(Message::PropertyReadOnly, &[&property]))
        }
        Err(PropertyError::Unknown { property }) => {
            CommandResult::err(ctx.render(Message::NoSuchProperty, &[&property]))
        }
        Err(PropertyError::Vetoed { reason, .. }) => CommandResult::err(reason),
        Err(PropertyError::InvalidValue { property, source }) => {
            CommandResult::err(ctx.render(Message::ProbablyInvalidValue, &[&property, &source]))
        }
    }
}
