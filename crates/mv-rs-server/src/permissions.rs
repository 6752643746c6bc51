//! Permission management: operators and per-player permission grants.
//!
//! Persists data as a single JSON file whose path comes from the config.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use mv_rs_command::PermissionCheck;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Name the console sends commands as. It holds every permission.
pub const CONSOLE: &str = "CONSOLE";

/// On-disk shape of the permissions file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PermissionsFile {
    #[serde(default)]
    ops: BTreeSet<String>,
    #[serde(default)]
    players: BTreeMap<String, BTreeSet<String>>,
}

/// Manages operators and permission grants with JSON persistence.
pub struct PermissionManager {
    /// Names of operators. Operators hold every permission.
    pub ops: HashSet<String>,
    /// Granted nodes per player name. A node may end in `.*` or be `*`.
    pub players: HashMap<String, HashSet<String>>,
    path: PathBuf,
    /// Set when the file existed but could not be loaded. Saving is refused
    /// so the operator's file is never replaced by an empty one.
    load_failed: bool,
}

impl PermissionManager {
    /// Load permission data from `path`. Missing or unreadable files give an
    /// empty manager.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (file, load_failed) = match load_file(&path) {
            Some(file) => (file, false),
            None => (PermissionsFile::default(), true),
        };
        Self {
            ops: file.ops.into_iter().collect(),
            players: file
                .players
                .into_iter()
                .map(|(name, nodes)| (name, nodes.into_iter().collect()))
                .collect(),
            path,
            load_failed,
        }
    }

    /// Save ops and grants to disk, sorted.
    pub fn save(&self) {
        if self.load_failed {
            warn!(
                "Not saving {}: it could not be loaded and would be overwritten",
                self.path.display()
            );
            return;
        }
        let file = PermissionsFile {
            ops: self.ops.iter().cloned().collect(),
            players: self
                .players
                .iter()
                .map(|(name, nodes)| (name.clone(), nodes.iter().cloned().collect()))
                .collect(),
        };
        match serde_json::to_string_pretty(&file) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    warn!("Failed to write {}: {e}", self.path.display());
                }
            }
            Err(e) => warn!("Failed to serialize {}: {e}", self.path.display()),
        }
    }
}

impl PermissionCheck for PermissionManager {
    fn has_permission(&self, sender: &str, node: &str) -> bool {
        if sender == CONSOLE || self.ops.contains(sender) {
            return true;
        }
        self.players
            .get(sender)
            .is_some_and(|granted| granted.iter().any(|g| node_matches(g, node)))
    }
}

/// `*` matches everything; `a.b.*` matches `a.b` and anything below it.
fn node_matches(granted: &str, node: &str) -> bool {
    if granted == "*" || granted == node {
        return true;
    }
    match granted.strip_suffix(".*") {
        Some(prefix) => node == prefix || node.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('.')),
        None => false,
    }
}

/// `None` when the file exists but cannot be read or parsed.
fn load_file(path: &Path) -> Option<PermissionsFile> {
    if !path.exists() {
        return Some(PermissionsFile::default());
    }
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<PermissionsFile>(&contents) {
            Ok(file) => {
                info!(
                    "Loaded {} ops and {} players from {}",
                    file.ops.len(),
                    file.players.len(),
                    path.display()
                );
                Some(file)
            }
            Err(e) => {
                warn!("Failed to parse {}: {e}", path.display());
                None
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            None
        }
    }
}
