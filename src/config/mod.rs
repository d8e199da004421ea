//! Configuration module for the typed array node
//!
//! This module handles:
//! - Persisted node state ([`NodeState`]): the element type, the only field
//!   that survives node re-creation. Stored as JSON: `{"datatype": 6}`.
//! - Node settings ([`NodeSettings`]): defaults for new nodes and diagnostics
//!   plumbing, stored as TOML.
//!
//! # Settings Location
//!
//! Settings are stored in the platform-appropriate config directory under
//! [`APP_ID`]:
//!
//! - **Linux**: `~/.config/typed-array-node/`
//! - **macOS**: `~/Library/Application Support/typed-array-node/`
//! - **Windows**: `%APPDATA%\typed-array-node\`
//!
//! # Example
//!
//! ```ignore
//! use typed_array_node::config::{NodeSettings, NodeState};
//!
//! let settings = NodeSettings::load_or_default(NodeSettings::default_path()?);
//! let node = settings.create_node();
//!
//! let json = node.state().to_json()?;
//! let restored = ArrayItemToTypedArrayNode::from_state(NodeState::from_json(&json)?);
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{NodeError, Result, ResultExt};
use crate::types::ElementType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "typed-array-node";

/// Settings filename
pub const SETTINGS_FILE: &str = "settings.toml";

/// Default capacity of the diagnostics channel
pub const DEFAULT_DIAGNOSTIC_CAPACITY: usize = 64;

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Ensure the config directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir()
        .ok_or_else(|| NodeError::Config("Could not determine config directory".to_string()))?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).context("Failed to create config directory")?;
    }

    Ok(dir)
}

// ==================== Node State ====================

/// Persisted state of a conversion node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeState {
    /// Selected element type, stored as its numeric code.
    #[serde(default)]
    pub datatype: ElementType,
}

impl NodeState {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| NodeError::Serialization(format!("Failed to serialize node state: {}", e)))
    }

    /// Parse state, rejecting unknown element type codes.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| NodeError::Serialization(format!("Failed to parse node state: {}", e)))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read node state {:?}", path))?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create state directory {:?}", parent))?;
        }

        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write node state {:?}", path))
    }
}
