// Input handling system
//
// This module routes a single set of logical actions to every local player's
// input device. Each connected joypad gets a private copy of the joypad
// bindings, so players sharing a template never steal each other's input.
//
// ## Architecture
//
// - `action`: Device identifiers, bound input events and the default template
// - `action_map`: Registered actions with their deadzones and events
// - `config`: Input configuration (TOML) and routing settings
// - `host`: Interface to the platform that owns the hardware
// - `local`: In-process host implementation
// - `registry`: Per-device action synthesis and name resolution
// - `device`: Per-device query handle
// - `ui`: Menu/UI action device assignment
//
// ## Usage Example
//
// ```rust
// use multiplayer_input::engine::input::{DeviceActionRegistry, DeviceInput, InputConfig, LocalInput};
//
// let config = InputConfig::default();
// let mut registry = DeviceActionRegistry::new(LocalInput::new(config.clone()), config.multiplayer);
// let mut player = DeviceInput::new(&registry, 0);
//
// // In your event loop, after feeding hardware events to the host
// for change in registry.process_connection_events() {
//     player.handle_connection_change(change);
// }
//
// if player.is_action_just_pressed(&registry, "jump")? {
//     // Joypad 0 just pressed jump!
// }
//
// // At the end of each frame, update the host state
// registry.host_mut().update();
// ```

pub mod action;
pub mod action_map;
pub mod config;
pub mod device;
pub mod host;
pub mod local;
pub mod registry;
pub mod ui;

// Re-export commonly used types
pub use action::{ActionConfig, ActionName, DeviceId, InputEvent, ALL_DEVICES, KEYBOARD, NO_DEVICE};
pub use action_map::ActionMap;
pub use config::{InputConfig, MultiplayerConfig};
pub use device::DeviceInput;
pub use host::{ConnectionChange, InputHost};
pub use local::{JoypadInfo, LocalInput};
pub use registry::{DeviceActionMap, DeviceActionRegistry};
pub use ui::UiTarget;

/// Input routing errors
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Device {0} has no actions. Maybe the joypad is disconnected.")]
    DeviceHasNoActions(DeviceId),

    #[error("Action '{action}' has no binding for device {device}")]
    ActionNotMapped { device: DeviceId, action: String },

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid input config: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse input config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_display() {
        let err = InputError::DeviceHasNoActions(2);
        assert_eq!(
            err.to_string(),
            "Device 2 has no actions. Maybe the joypad is disconnected."
        );

        let err = InputError::ActionNotMapped {
            device: 1,
            action: "debug_overlay".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Action 'debug_overlay' has no binding for device 1"
        );
    }
}
