// Device identifiers, bound input events and the default action template

use serde::{Deserialize, Serialize};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Index of an input device.
///
/// Negative values denote the keyboard pseudo-device, non-negative values are
/// joypad slots.
pub type DeviceId = i32;

/// Name of an action registered in the action map
pub type ActionName = String;

/// The keyboard pseudo-device (always connected)
pub const KEYBOARD: DeviceId = -1;

/// "No device" sentinel, used to leave UI actions on their template defaults
pub const NO_DEVICE: DeviceId = -2;

/// Device value of a joypad event that matches every connected joypad
pub const ALL_DEVICES: DeviceId = -1;

/// Default deadzone for actions that don't specify one
pub const DEFAULT_DEADZONE: f32 = 0.5;

/// An input event bound to an action.
///
/// Keyboard and mouse events are device-free. Joypad events carry the index of
/// the joypad they listen to, which is what per-device routing rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Key {
        key: KeyCode,
    },
    MouseButton {
        button: MouseButton,
    },
    JoypadButton {
        #[serde(default = "all_devices")]
        device: DeviceId,
        button: u32,
    },
    JoypadMotion {
        #[serde(default = "all_devices")]
        device: DeviceId,
        axis: u32,
        /// Direction of the axis this event reacts to (-1.0 or 1.0)
        axis_value: f32,
    },
}

fn all_devices() -> DeviceId {
    ALL_DEVICES
}

impl InputEvent {
    /// Create a keyboard event
    pub fn key(key: KeyCode) -> Self {
        Self::Key { key }
    }

    /// Create a mouse button event
    pub fn mouse(button: MouseButton) -> Self {
        Self::MouseButton { button }
    }

    /// Create a joypad button event listening to every joypad
    pub fn joy_button(button: u32) -> Self {
        Self::JoypadButton {
            device: ALL_DEVICES,
            button,
        }
    }

    /// Create a joypad motion event listening to every joypad
    pub fn joy_motion(axis: u32, axis_value: f32) -> Self {
        Self::JoypadMotion {
            device: ALL_DEVICES,
            axis,
            axis_value,
        }
    }

    /// Whether this event targets a specific joypad (and can be retargeted)
    pub fn is_joypad(&self) -> bool {
        matches!(self, Self::JoypadButton { .. } | Self::JoypadMotion { .. })
    }

    /// Joypad this event listens to, `None` for device-free events
    pub fn device(&self) -> Option<DeviceId> {
        match self {
            Self::JoypadButton { device, .. } | Self::JoypadMotion { device, .. } => Some(*device),
            Self::Key { .. } | Self::MouseButton { .. } => None,
        }
    }

    /// Retarget a joypad event. Returns false for device-free events.
    pub fn set_device(&mut self, target: DeviceId) -> bool {
        match self {
            Self::JoypadButton { device, .. } | Self::JoypadMotion { device, .. } => {
                *device = target;
                true
            }
            Self::Key { .. } | Self::MouseButton { .. } => false,
        }
    }

    /// Duplicate this event retargeted to another joypad
    pub fn with_device(mut self, target: DeviceId) -> Self {
        self.set_device(target);
        self
    }

    /// Whether a joypad event listens to `joypad`
    pub fn matches_joypad(&self, joypad: DeviceId) -> bool {
        match self.device() {
            Some(device) => device == ALL_DEVICES || device == joypad,
            None => false,
        }
    }
}

/// Template entry for a single action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub name: ActionName,

    #[serde(default = "default_deadzone")]
    pub deadzone: f32,

    #[serde(default)]
    pub events: Vec<InputEvent>,
}

fn default_deadzone() -> f32 {
    DEFAULT_DEADZONE
}

impl ActionConfig {
    /// Create an action template entry with the default deadzone
    pub fn new(name: impl Into<ActionName>, events: Vec<InputEvent>) -> Self {
        Self {
            name: name.into(),
            deadzone: DEFAULT_DEADZONE,
            events,
        }
    }

    /// Override the deadzone
    pub fn with_deadzone(mut self, deadzone: f32) -> Self {
        self.deadzone = deadzone;
        self
    }
}

/// Joypad button indices used by the default template (SDL layout)
pub mod joy_button {
    pub const A: u32 = 0;
    pub const B: u32 = 1;
    pub const X: u32 = 2;
    pub const Y: u32 = 3;
    pub const START: u32 = 6;
    pub const DPAD_UP: u32 = 11;
    pub const DPAD_DOWN: u32 = 12;
    pub const DPAD_LEFT: u32 = 13;
    pub const DPAD_RIGHT: u32 = 14;
}

/// Joypad axis indices used by the default template
pub mod joy_axis {
    pub const LEFT_X: u32 = 0;
    pub const LEFT_Y: u32 = 1;
}

/// Default action template shared by every device
pub fn default_actions() -> Vec<ActionConfig> {
    use joy_axis::*;
    use joy_button::*;

    vec![
        // Movement (WASD - standard gaming layout, left stick on joypads)
        ActionConfig::new(
            "move_left",
            vec![
                InputEvent::key(KeyCode::KeyA),
                InputEvent::joy_motion(LEFT_X, -1.0),
                InputEvent::joy_button(DPAD_LEFT),
            ],
        )
        .with_deadzone(0.2),
        ActionConfig::new(
            "move_right",
            vec![
                InputEvent::key(KeyCode::KeyD),
                InputEvent::joy_motion(LEFT_X, 1.0),
                InputEvent::joy_button(DPAD_RIGHT),
            ],
        )
        .with_deadzone(0.2),
        ActionConfig::new(
            "jump",
            vec![InputEvent::key(KeyCode::KeyW), InputEvent::joy_button(A)],
        ),
        ActionConfig::new(
            "duck",
            vec![
                InputEvent::key(KeyCode::KeyS),
                InputEvent::joy_motion(LEFT_Y, 1.0),
            ],
        ),
        // Abilities (mouse buttons, face buttons on joypads)
        ActionConfig::new(
            "ability_1",
            vec![InputEvent::mouse(MouseButton::Left), InputEvent::joy_button(X)],
        ),
        ActionConfig::new(
            "ability_2",
            vec![InputEvent::mouse(MouseButton::Right), InputEvent::joy_button(Y)],
        ),
        ActionConfig::new(
            "ability_3",
            vec![InputEvent::mouse(MouseButton::Middle), InputEvent::joy_button(B)],
        ),
        ActionConfig::new(
            "pause",
            vec![InputEvent::key(KeyCode::KeyP), InputEvent::joy_button(START)],
        ),
        // Keyboard-only debug toggle
        ActionConfig::new("debug_overlay", vec![InputEvent::key(KeyCode::F3)]),
        // Menu navigation
        ActionConfig::new(
            "ui_accept",
            vec![InputEvent::key(KeyCode::Enter), InputEvent::joy_button(A)],
        ),
        ActionConfig::new(
            "ui_cancel",
            vec![InputEvent::key(KeyCode::Escape), InputEvent::joy_button(B)],
        ),
        ActionConfig::new(
            "ui_left",
            vec![
                InputEvent::key(KeyCode::ArrowLeft),
                InputEvent::joy_button(DPAD_LEFT),
                InputEvent::joy_motion(LEFT_X, -1.0),
            ],
        ),
        ActionConfig::new(
            "ui_right",
            vec![
                InputEvent::key(KeyCode::ArrowRight),
                InputEvent::joy_button(DPAD_RIGHT),
                InputEvent::joy_motion(LEFT_X, 1.0),
            ],
        ),
        ActionConfig::new(
            "ui_up",
            vec![
                InputEvent::key(KeyCode::ArrowUp),
                InputEvent::joy_button(DPAD_UP),
                InputEvent::joy_motion(LEFT_Y, -1.0),
            ],
        ),
        ActionConfig::new(
            "ui_down",
            vec![
                InputEvent::key(KeyCode::ArrowDown),
                InputEvent::joy_button(DPAD_DOWN),
                InputEvent::joy_motion(LEFT_Y, 1.0),
            ],
        ),
    ]
}
