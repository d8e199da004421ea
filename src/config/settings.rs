//! Settings for creating and hosting conversion nodes
//!
//! # Main Types
//!
//! - [`NodeSettings`] - Defaults applied to newly created nodes
//! - [`DiagnosticSettings`] - How node diagnostics are delivered
//!
//! # File Format
//!
//! ```toml
//! default_element_type = "Uint8"
//!
//! [diagnostics]
//! channel_capacity = 64
//! log_to_tracing = true
//! ```

use crate::config::{ensure_config_dir, DEFAULT_DIAGNOSTIC_CAPACITY, SETTINGS_FILE};
use crate::error::{NodeError, Result, ResultExt};
use crate::pipeline::diagnostics::{ChannelSink, Diagnostic};
use crate::pipeline::nodes::ArrayItemToTypedArrayNode;
use crate::types::ElementType;
use crossbeam_channel::Receiver;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};

/// Settings for node creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSettings {
    /// Element type of newly created nodes, by label
    #[serde(
        serialize_with = "serialize_label",
        deserialize_with = "deserialize_label"
    )]
    pub default_element_type: ElementType,

    /// Diagnostics delivery
    pub diagnostics: DiagnosticSettings,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            default_element_type: ElementType::default(),
            diagnostics: DiagnosticSettings::default(),
        }
    }
}

/// Diagnostics delivery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticSettings {
    /// Capacity of the diagnostics channel
    pub channel_capacity: usize,

    /// Whether diagnostics are also logged through tracing
    pub log_to_tracing: bool,
}

impl Default for DiagnosticSettings {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_DIAGNOSTIC_CAPACITY,
            log_to_tracing: true,
        }
    }
}

impl DiagnosticSettings {
    /// Build a channel sink according to these settings.
    pub fn build_sink(&self) -> (ChannelSink, Receiver<Diagnostic>) {
        let (sink, rx) = ChannelSink::new(self.channel_capacity.max(1));
        (sink.with_tracing(self.log_to_tracing), rx)
    }
}

impl NodeSettings {
    /// Path of the settings file in the config directory
    pub fn default_path() -> Result<PathBuf> {
        Ok(ensure_config_dir()?.join(SETTINGS_FILE))
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| NodeError::Config(format!("Failed to parse settings: {}", e)))
    }

    /// Load settings from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Invalid settings file {:?}", path))
    }

    /// Load settings, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save settings as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| NodeError::Serialization(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(path, content).with_context(|| format!("Failed to write settings {:?}", path))
    }

    /// Create a node configured with the default element type
    pub fn create_node(&self) -> ArrayItemToTypedArrayNode {
        ArrayItemToTypedArrayNode::with_element_type(self.default_element_type)
    }
}

fn serialize_label<S: Serializer>(ty: &ElementType, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(ty.label())
}

fn deserialize_label<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<ElementType, D::Error> {
    let label = String::deserialize(d)?;
    ElementType::from_label(&label)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown element type \"{}\"", label)))
}
