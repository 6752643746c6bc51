mod config;
mod host;
mod permissions;
mod persistence;

use config::ServerConfig;
use host::DirectoryHost;
use mv_rs_command::{CommandContext, CommandRegistry, MessageBundle};
use mv_rs_world::{WorldBackend, WorldManager};
use permissions::{PermissionManager, CONSOLE};
use tokio::io::AsyncBufReadExt;
use tracing::{error, info, warn};

const CONFIG_FILE: &str = "server.toml";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = if std::path::Path::new(CONFIG_FILE).exists() {
        match ServerConfig::load(CONFIG_FILE) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load {CONFIG_FILE}: {e}");
                std::process::exit(1);
            }
        }
    } else {
        ServerConfig::default()
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("MV-RS world manager v{} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Worlds directory: {} (default world: {})",
        config.server.worlds_directory, config.server.default_world
    );

    let host = match DirectoryHost::new(&config.server.worlds_directory, &config.server.default_world) {
        Ok(host) => host,
        Err(e) => {
            error!("Cannot use worlds directory {}: {e}", config.server.worlds_directory);
            std::process::exit(1);
        }
    };
    let mut worlds = WorldManager::new(host);

    for entry in config.startup_worlds() {
        if entry.name != config.server.default_world {
            match worlds.backend_mut().world_properties(&entry.name) {
                Ok(props) if !props.auto_load() => {
                    info!("Skipping world '{}' (autoLoad is off)", entry.name);
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    error!("Could not read properties of world '{}': {e}", entry.name);
                    continue;
                }
            }
        }
        if let Err(e) = worlds.add_world(entry.to_settings()) {
            error!("{e}");
        }
    }
    if !worlds.backend().is_loaded(&config.server.default_world) {
        error!("Default world '{}' failed to load", config.server.default_world);
        std::process::exit(1);
    }
    info!("{} world(s) loaded", worlds.len());

    let permissions = PermissionManager::load(&config.permissions.file);
    let (messages, unknown) = MessageBundle::with_overrides(config.messages.clone());
    for key in unknown {
        warn!("Unknown message id in {CONFIG_FILE}: {key}");
    }
    let registry = CommandRegistry::<DirectoryHost>::new();

    // Console REPL: read lines from stdin
    let (console_tx, mut console_rx) = tokio::sync::mpsc::channel::<String>(32);
    tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    info!("Ready. Type 'help' for commands, 'stop' to shut down.");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Shutdown signal received");
                break;
            }
            line = console_rx.recv() => {
                let Some(line) = line else { break };
                if line == "stop" {
                    break;
                }
                let Some((name, args)) = registry.parse(&line) else {
                    continue;
                };
                let mut ctx = CommandContext {
                    sender_name: CONSOLE.to_string(),
                    sender_world: None,
                    args,
                    worlds: &mut worlds,
                    permissions: &permissions,
                    messages: &messages,
                };
                let result = registry.execute(&name, &mut ctx);
                for message in result.messages {
                    if result.success {
                        info!("{message}");
                    } else {
                        warn!("{message}");
                    }
                }
            }
        }
    }

    info!("Saving worlds before shutdown...");
    worlds.shutdown();
    // Writes an empty template on first run; a file that failed to load is left alone.
    permissions.save();
    info!("Server shut down.");
}
