// Input configuration: action template and multiplayer routing settings

use super::action::{default_actions, ActionConfig, DeviceId};
use super::action_map::ActionMap;
use super::InputError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Device that template joypad events are parked on until a real joypad
/// gets its own copy
pub const DEFAULT_TEMPLATE_DEVICE: DeviceId = 8;

/// Default prefix of menu/UI navigation actions
pub const DEFAULT_UI_PREFIX: &str = "ui_";

/// Settings for per-device action routing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiplayerConfig {
    /// Joypad GUIDs that never get per-device actions
    pub ignored_guids: Vec<String>,

    /// Actions whose name starts with this prefix are UI actions
    pub ui_prefix: String,

    /// Device index assigned to the template's joypad events on reset
    pub template_device: DeviceId,
}

impl Default for MultiplayerConfig {
    fn default() -> Self {
        Self {
            ignored_guids: Vec::new(),
            ui_prefix: DEFAULT_UI_PREFIX.to_string(),
            template_device: DEFAULT_TEMPLATE_DEVICE,
        }
    }
}

impl MultiplayerConfig {
    /// Check if a joypad GUID is on the ignore list
    pub fn is_ignored(&self, guid: &str) -> bool {
        self.ignored_guids.iter().any(|ignored| ignored == guid)
    }

    /// Check if an action is a UI action
    pub fn is_ui_action(&self, action: &str) -> bool {
        action.starts_with(&self.ui_prefix)
    }
}

/// Complete input configuration, usually loaded from `input.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub multiplayer: MultiplayerConfig,

    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

impl InputConfig {
    /// Create a configuration from a template and routing settings
    pub fn new(multiplayer: MultiplayerConfig, actions: Vec<ActionConfig>) -> Self {
        Self {
            multiplayer,
            actions,
        }
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml_str(source: &str) -> Result<Self, InputError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(InputError::from)
            .with_context(|| format!("Failed to read input config {}", path.display()))?;
        let config = Self::from_toml_str(&source)
            .with_context(|| format!("Invalid input config {}", path.display()))?;
        log::info!(
            "Loaded {} actions from {}",
            config.actions.len(),
            path.display()
        );
        Ok(config)
    }

    /// Serialize this configuration to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the configuration for problems that would break routing
    pub fn validate(&self) -> Result<(), InputError> {
        if self.multiplayer.template_device < 0 {
            return Err(InputError::InvalidConfig(format!(
                "template_device must be a joypad index, got {}",
                self.multiplayer.template_device
            )));
        }

        // An empty prefix would make every action a UI action
        if self.multiplayer.ui_prefix.is_empty() {
            return Err(InputError::InvalidConfig("ui_prefix must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for action in &self.actions {
            let name = action.name.as_str();
            if name.is_empty() {
                return Err(InputError::InvalidConfig("empty action name".to_string()));
            }
            // Synthesized names are "<device><action>", so a leading digit
            // would make them ambiguous
            if name.starts_with(|c: char| c.is_ascii_digit()) {
                return Err(InputError::InvalidConfig(format!(
                    "action '{}' must not start with a digit",
                    name
                )));
            }
            if !seen.insert(name) {
                return Err(InputError::InvalidConfig(format!(
                    "duplicate action '{}'",
                    name
                )));
            }
            if !(0.0..=1.0).contains(&action.deadzone) {
                return Err(InputError::InvalidConfig(format!(
                    "deadzone of '{}' must be within 0..=1, got {}",
                    name, action.deadzone
                )));
            }
        }
        Ok(())
    }

    /// Build a fresh action map from the template
    pub fn action_map(&self) -> ActionMap {
        ActionMap::from_actions(&self.actions)
    }

    /// Find an action template by name
    pub fn action(&self, name: &str) -> Option<&ActionConfig> {
        self.actions.iter().find(|action| action.name == name)
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::new(MultiplayerConfig::default(), default_actions())
    }
}
