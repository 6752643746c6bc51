//! Commands that read or change the set of managed worlds.

use mv_rs_world::{PropertyValue, WorldBackend, WorldCreationError, WorldEnvironment, WorldType};

use crate::{perms, target_world, CommandContext, CommandResult, Message};

pub(crate) const INFO_USAGE: &str = "[WORLD]";
pub(crate) const CREATE_USAGE: &str = "{NAME} {ENV} [-s SEED] [-t TYPE] [-g GENERATOR] [-a true|false] [-n]";
pub(crate) const UNLOAD_USAGE: &str = "{WORLD}";

pub(crate) fn cmd_list<B: WorldBackend>(ctx: &mut CommandContext<'_, B>) -> CommandResult {
    if !ctx.has_permission(perms::LIST) {
        return CommandResult::err(ctx.render(Message::NoPermission, &[]));
    }
    let show_hidden = ctx.has_permission(perms::LIST_HIDDEN);

    let mut worlds: Vec<_> = ctx
        .worlds
        .worlds()
        .filter(|w| show_hidden || !w.properties().hidden())
        .collect();
    worlds.sort_by(|a, b| a.name().cmp(b.name()));

    let mut lines = vec![ctx.render(Message::WorldListHeader, &[&worlds.len()])];
    for world in worlds {
        lines.push(ctx.render(Message::WorldListEntry, &[&world.alias(), &world.environment()]));
    }
    CommandResult::lines(true, lines)
}

pub(crate) fn cmd_info<B: WorldBackend>(ctx: &mut CommandContext<'_, B>) -> CommandResult {
    if !ctx.has_permission(perms::INFO) {
        return CommandResult::err(ctx.render(Message::NoPermission, &[]));
    }
    if ctx.args.len() > 1 {
        return CommandResult::err(ctx.render(Message::Usage, &[&"info", &INFO_USAGE]));
    }
    let world_name = match target_world(ctx, 0) {
        Ok(name) => name,
        Err(result) => return result,
    };
    let Some(world) = ctx.worlds.get_world(&world_name) else {
        return CommandResult::err(ctx.render(Message::WorldNotFound, &[&world_name]));
    };
    let world_type = world
        .world_type()
        .map_or(PropertyValue::Unset, |t| PropertyValue::Text(t.to_string()));
    CommandResult::ok(ctx.render(
        Message::WorldInfo,
        &[
            &world.name(),
            &world.alias(),
            &world.environment(),
            &world.seed(),
            &world_type,
        ],
    ))
}

/// Arguments of `/create` after the name and environment.
#[derive(Debug, Default, PartialEq, Eq)]
struct CreateFlags {
    seed: Option<String>,
    world_type: Option<WorldType>,
    generator: Option<String>,
    adjust_spawn: Option<bool>,
    no_structures: bool,
}

fn parse_create_flags(args: &[String]) -> Result<CreateFlags, (&'static str, String)> {
    let mut flags = CreateFlags::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "-n" => flags.no_structures = true,
            "-s" | "-t" | "-g" | "-a" => {
                let value = iter
                    .next()
                    .ok_or_else(|| ("flag", format!("{flag} needs a value")))?;
                match flag.as_str() {
                    "-s" => flags.seed = Some(value.clone()),
                    "-t" => {
                        flags.world_type = Some(value.parse().map_err(|_| ("world type", value.clone()))?)
                    }
                    "-g" => flags.generator = Some(value.clone()),
                    _ => {
                        flags.adjust_spawn = Some(match value.to_ascii_lowercase().as_str() {
                            "true" => true,
                            "false" => false,
                            _ => return Err(("spawn adjust flag", value.clone())),
                        })
                    }
                }
            }
            other => return Err(("flag", other.to_string())),
        }
    }
    Ok(flags)
}

pub(crate) fn cmd_create<B: WorldBackend>(ctx: &mut CommandContext<'_, B>) -> CommandResult {
    if !ctx.has_permission(perms::CREATE) {
        return CommandResult::err(ctx.render(Message::NoPermission, &[]));
    }
    if ctx.args.len() < 2 {
        return CommandResult::err(ctx.render(Message::Usage, &[&"create", &CREATE_USAGE]));
    }
    let name = ctx.args[0].clone();
    let environment: WorldEnvironment = match ctx.args[1].parse() {
        Ok(env) => env,
        Err(e) => return CommandResult::err(ctx.render(Message::InvalidArgument, &[&"environment", &e])),
    };
    let flags = match parse_create_flags(&ctx.args[2..]) {
        Ok(flags) => flags,
        Err((what, value)) => {
            return CommandResult::err(ctx.render(Message::InvalidArgument, &[&what, &value]))
        }
    };

    let starting = ctx.render(Message::CreateStarting, &[&name]);
    let created = ctx
        .worlds
        .add_world_with(
            &name,
            Some(environment),
            flags.seed.as_deref(),
            flags.world_type,
            flags.no_structures.then_some(false),
            flags.generator.as_deref(),
            flags.adjust_spawn.unwrap_or(true),
        )
        .map(|w| w.seed());

    match created {
        Ok(seed) => CommandResult::lines(
            true,
            vec![starting, ctx.render(Message::CreateSuccess, &[&name, &seed])],
        ),
        Err(WorldCreationError::AlreadyExists { name }) => {
            CommandResult::err(ctx.render(Message::WorldAlreadyExists, &[&name]))
        }
        Err(e) => CommandResult::lines(
            false,
            vec![starting, ctx.render(Message::CreateFailed, &[&name, &e])],
        ),
    }
}

pub(crate) fn cmd_unload<B: WorldBackend>(ctx: &mut CommandContext<'_, B>) -> CommandResult {
    if !ctx.has_permission(perms::UNLOAD) {
        return CommandResult::err(ctx.render(Message::NoPermission, &[]));
    }
    let [requested] = ctx.args.as_slice() else {
        return CommandResult::err(ctx.render(Message::Usage, &[&"unload", &UNLOAD_USAGE]));
    };
    let requested = requested.clone();
    let Some(world_name) = ctx.worlds.get_world(&requested).map(|w| w.name().to_string()) else {
        return CommandResult::err(ctx.render(Message::WorldNotFound, &[&requested]));
    };
    if ctx.worlds.unload_managed_world(&world_name) {
        CommandResult::ok(ctx.render(Message::UnloadSuccess, &[&world_name]))
    } else {
        CommandResult::err(ctx.render(Message::UnloadFailed, &[&world_name]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn create_flags() {
        let flags = parse_create_flags(&args("-s hello -t flat -g Gen -a false -n")).unwrap();
        assert_eq!(
            flags,
            CreateFlags {
                seed: Some("hello".into()),
                world_type: Some(WorldType::Flat),
                generator: Some("Gen".into()),
                adjust_spawn: Some(false),
                no_structures: true,
            }
        );
        assert!(parse_create_flags(&args("-s")).is_err());
        assert!(parse_create_flags(&args("-t round")).is_err());
        assert!(parse_create_flags(&args("--fast")).is_err());
    }

    #[test]
    fn list_sorted_and_hides_hidden_worlds() {
        let mut mgr = manager();
        mgr.get_world_mut("world_nether")
            .unwrap()
            .set_property("hidden", "true")
            .unwrap();

        let only_list = |_: &str, node: &str| node == perms::LIST;
        let result = run(&mut mgr, &only_list, None, "list");
        assert!(result.success);
        assert_eq!(result.messages, ["Worlds (1):", "  world - NORMAL"]);

        let result = run(&mut mgr, &allow_all, None, "list");
        assert_eq!(
            result.messages,
            ["Worlds (2):", "  world - NORMAL", "  world_nether - NETHER"]
        );

        assert!(!run(&mut mgr, &deny_all, None, "list").success);
    }

    #[test]
    fn info_for_sender_world() {
        let mut mgr = manager();
        let result = run(&mut mgr, &allow_all, Some("world"), "info");
        assert!(result.success);
        assert_eq!(
            result.messages[0],
            "World 'world' (alias world): NORMAL, seed 12345, type (unset)"
        );
    }

    #[test]
    fn create_with_numeric_seed() {
        let mut mgr = manager();
        let result = run(&mut mgr, &allow_all, None, "create skylands normal -s 42 -t amplified");
        assert!(result.success, "{:?}", result.messages);
        assert_eq!(result.messages[1], "Created world 'skylands' with seed 42.");
        let world = mgr.get_world("skylands").unwrap();
        assert_eq!(world.world_type(), Some(WorldType::Amplified));
        assert!(world.adjust_spawn());
    }

    #[test]
    fn create_existing_world() {
        let mut mgr = manager();
        let result = run(&mut mgr, &allow_all, None, "create world normal");
        assert!(!result.success);
        assert_eq!(result.messages[0], "A world named 'world' already exists.");
        assert_eq!(mgr.len(), 2);
    }

    #[test]
    fn create_bad_environment() {
        let mut mgr = manager();
        let result = run(&mut mgr, &allow_all, None, "create moon space");
        assert!(!result.success);
        assert!(result.messages[0].starts_with("Invalid environment"));
        assert!(!mgr.is_managed("moon"));
    }

    #[test]
    fn create_rejected_by_server() {
        let mut mgr = manager();
        mgr.backend_mut().rejected.insert("void".into());
        let result = run(&mut mgr, &allow_all, None, "create void end");
        assert!(!result.success);
        assert!(result.messages[1].starts_with("Could not create world 'void'"));
    }

    #[test]
    fn create_requires_permission() {
        let mut mgr = manager();
        let result = run(&mut mgr, &deny_all, None, "create skylands normal");
        assert!(!result.success);
        assert!(!mgr.is_managed("skylands"));
    }

    #[test]
    fn extra_arguments_are_rejected() {
        let mut mgr = manager();
        let result = run(&mut mgr, &allow_all, None, "info world junk");
        assert!(!result.success);
        assert_eq!(result.messages[0], "Usage: /info [WORLD]");

        let result = run(&mut mgr, &allow_all, None, "unload world_nether junk");
        assert!(!result.success);
        assert_eq!(result.messages[0], "Usage: /unload {WORLD}");
        assert!(mgr.is_managed("world_nether"));

        let result = run(&mut mgr, &allow_all, None, "unload");
        assert_eq!(result.messages[0], "Usage: /unload {WORLD}");
    }

    #[test]
    fn unload_commands() {
        let mut mgr = manager();
        let result = run(&mut mgr, &allow_all, None, "unload world");
        assert!(!result.success);
        assert!(result.messages[0].contains("Is it the default world?"));
        assert!(mgr.is_managed("world"));

        let result = run(&mut mgr, &allow_all, None, "unload world_nether");
        assert!(result.success);
        assert!(!mgr.is_managed("world_nether"));

        let result = run(&mut mgr, &allow_all, None, "unload world_nether");
        assert!(!result.success);
        assert!(result.messages[0].contains("No managed world"));
    }
}
