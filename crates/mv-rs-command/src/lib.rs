//! Command parsing, registry, and the world-management commands.

pub mod messages;
mod modify;
mod worlds;

use std::collections::HashMap;

use mv_rs_world::{WorldBackend, WorldManager};
use tracing::debug;

pub use messages::{Message, MessageBundle};

/// Permission nodes checked by the built-in commands.
pub mod perms {
    pub const MODIFY: &str = "multiverse.core.modify";
    pub const LIST: &str = "multiverse.core.list";
    pub const LIST_HIDDEN: &str = "multiverse.core.list.hidden";
    pub const INFO: &str = "multiverse.core.info";
    pub const CREATE: &str = "multiverse.core.create";
    pub const UNLOAD: &str = "multiverse.core.unload";

    /// A node scoped to a single world, e.g. `multiverse.core.modify.world_nether`.
    pub fn scoped(base: &str, world: &str) -> String {
        format!("{base}.{world}")
    }
}

/// Answers whether a sender holds a permission node.
pub trait PermissionCheck {
    fn has_permission(&self, sender: &str, node: &str) -> bool;
}

impl<F> PermissionCheck for F
where
    F: Fn(&str, &str) -> bool,
{
    fn has_permission(&self, sender: &str, node: &str) -> bool {
        self(sender, node)
    }
}

/// Context passed to a command handler.
pub struct CommandContext<'a, B> {
    /// Name of the player (or console) executing the command.
    pub sender_name: String,
    /// World the sender is standing in, if any. The console has none.
    pub sender_world: Option<String>,
    /// Arguments after the command name.
    pub args: Vec<String>,
    pub worlds: &'a mut WorldManager<B>,
    pub permissions: &'a dyn PermissionCheck,
    pub messages: &'a MessageBundle,
}

impl<B> CommandContext<'_, B> {
    pub fn has_permission(&self, node: &str) -> bool {
        self.permissions.has_permission(&self.sender_name, node)
    }

    pub fn render(&self, message: Message, args: &[&dyn std::fmt::Display]) -> String {
        self.messages.render(message, args)
    }
}

/// Result returned by a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command executed successfully.
    pub success: bool,
    /// Messages to send back to the command sender.
    pub messages: Vec<String>,
}

impl CommandResult {
    /// Create a successful result with a single message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            messages: vec![message.into()],
        }
    }

    /// Create a failed result with a single message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            messages: vec![message.into()],
        }
    }

    pub fn lines(success: bool, messages: Vec<String>) -> Self {
        Self { success, messages }
    }
}

/// Function pointer type for command handlers.
pub type CommandFn<B> = fn(&mut CommandContext<'_, B>) -> CommandResult;

/// A registered command.
pub struct CommandEntry<B> {
    pub name: String,
    pub usage: String,
    pub description: String,
    pub handler: CommandFn<B>,
}

/// Registry of available commands and their aliases.
pub struct CommandRegistry<B> {
    commands: HashMap<String, CommandEntry<B>>,
    aliases: HashMap<String, String>,
}

impl<B: WorldBackend> CommandRegistry<B> {
    /// Create a registry with the world-management commands.
    pub fn new() -> Self {
        let mut registry = Self {
            commands: HashMap::new(),
            aliases: HashMap::new(),
        };
        registry.register("help", "", "List available commands", cmd_help::<B>);
        registry.register("list", "", "List managed worlds", worlds::cmd_list::<B>);
        registry.register("info", worlds::INFO_USAGE, "Show details of a world", worlds::cmd_info::<B>);
        registry.register("create", worlds::CREATE_USAGE, "Create a new world", worlds::cmd_create::<B>);
        registry.register("unload", worlds::UNLOAD_USAGE, "Unload a world", worlds::cmd_unload::<B>);
        registry.register(
            "modify set",
            modify::VALUE_USAGE,
            "Set a property of a world",
            modify::cmd_modify_set::<B>,
        );
        registry.register(
            "modify add",
            modify::VALUE_USAGE,
            "Add a value to a list property of a world",
            modify::cmd_modify_add::<B>,
        );
        registry.register(
            "modify remove",
            modify::VALUE_USAGE,
            "Remove a value from a list property of a world",
            modify::cmd_modify_remove::<B>,
        );
        registry.register(
            "modify clear",
            modify::CLEAR_USAGE,
            "Empty a list property of a world",
            modify::cmd_modify_clear::<B>,
        );

        for alias in ["m set", "mset", "m s", "ms"] {
            registry.register_alias(alias, "modify set");
        }
        for alias in ["m add", "madd", "m a", "ma", "m +", "m+"] {
            registry.register_alias(alias, "modify add");
        }
        for alias in ["m remove", "mremove", "m rm", "mrm", "m -", "m-"] {
            registry.register_alias(alias, "modify remove");
        }
        for alias in ["m clear", "mclear"] {
            registry.register_alias(alias, "modify clear");
        }
        registry
    }

    /// Register a command.
    fn register(&mut self, name: &str, usage: &str, description: &str, handler: CommandFn<B>) {
        self.commands.insert(
            name.to_string(),
            CommandEntry {
                name: name.to_string(),
                usage: usage.to_string(),
                description: description.to_string(),
                handler,
            },
        );
    }

    /// Make `alias` an alternative name for an already registered command.
    pub fn register_alias(&mut self, alias: &str, target: &str) {
        debug_assert!(self.commands.contains_key(target), "alias for unknown command {target}");
        self.aliases.insert(alias.to_string(), target.to_string());
    }

    /// Split a command line into its canonical command name and arguments.
    ///
    /// Two-word names ("modify remove") are tried before one-word names. A
    /// leading '/' is ignored. Returns `None` for a blank line.
    pub fn parse(&self, line: &str) -> Option<(String, Vec<String>)> {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let first = *tokens.first()?;

        if let Some(second) = tokens.get(1) {
            let pair = format!("{first} {second}");
            if let Some(name) = self.canonical(&pair) {
                return Some((name, tokens[2..].iter().map(|s| s.to_string()).collect()));
            }
        }
        let name = self.canonical(first).unwrap_or_else(|| first.to_string());
        Some((name, tokens[1..].iter().map(|s| s.to_string()).collect()))
    }

    fn canonical(&self, name: &str) -> Option<String> {
        if self.commands.contains_key(name) {
            return Some(name.to_string());
        }
        self.aliases.get(name).cloned()
    }

    /// Execute a command by name.
    ///
    /// `help` receives the rendered command list as its arguments.
    pub fn execute(&self, name: &str, ctx: &mut CommandContext<'_, B>) -> CommandResult {
        match self.commands.get(name) {
            Some(entry) => {
                if name == "help" {
                    ctx.args = self.help_lines();
                }
                debug!("{} runs '{name}' with {:?}", ctx.sender_name, ctx.args);
                (entry.handler)(ctx)
            }
            None => CommandResult::err(ctx.render(Message::UnknownCommand, &[&name])),
        }
    }

    /// Usage line for a command, rendered through the bundle.
    pub fn usage(&self, name: &str, messages: &MessageBundle) -> Option<String> {
        self.commands
            .get(name)
            .map(|e| messages.render(Message::Usage, &[&e.name, &e.usage]))
    }

    fn help_lines(&self) -> Vec<String> {
        let mut entries: Vec<&CommandEntry<B>> = self.commands.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
            .into_iter()
            .map(|e| match e.usage.as_str() {
                "" => format!("  /{} - {}", e.name, e.description),
                usage => format!("  /{} {usage} - {}", e.name, e.description),
            })
            .collect()
    }

    /// Get a reference to all registered commands.
    pub fn get_commands(&self) -> &HashMap<String, CommandEntry<B>> {
        &self.commands
    }
}

impl<B: WorldBackend> Default for CommandRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

fn cmd_help<B>(ctx: &mut CommandContext<'_, B>) -> CommandResult {
    let mut lines = vec!["Available commands:".to_string()];
    lines.append(&mut ctx.args);
    CommandResult::lines(true, lines)
}

/// Resolve the world a command targets: the argument at `index` when given,
/// otherwise the sender's own world. Returns the world's registry name.
pub(crate) fn target_world<B: WorldBackend>(
    ctx: &CommandContext<'_, B>,
    index: usize,
) -> Result<String, CommandResult> {
    let requested = match ctx.args.get(index).or(ctx.sender_world.as_ref()) {
        Some(name) => name,
        None => return Err(CommandResult::err(ctx.render(Message::WorldRequired, &[]))),
    };
    ctx.worlds
        .get_world(requested)
        .map(|w| w.name().to_string())
        .ok_or_else(|| CommandResult::err(ctx.render(Message::WorldNotFound, &[requested])))
}
