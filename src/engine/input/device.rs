// Per-device input handle

use super::action::{DeviceId, KEYBOARD};
use super::host::{ConnectionChange, InputHost};
use super::registry::DeviceActionRegistry;
use super::InputError;
use glam::Vec2;
use log::debug;
use std::fmt;

/// Name and GUID reported for the keyboard pseudo-device
pub const KEYBOARD_NAME: &str = "Keyboard";

/// Callback invoked with the new connection state
type ConnectionListener = Box<dyn FnMut(bool)>;

/// Input handle for a single device (keyboard or joypad).
///
/// While the device is disconnected every query returns a neutral value
/// instead of reaching the registry.
pub struct DeviceInput {
    /// Device index (negative for the keyboard)
    device: DeviceId,

    /// Whether the device is currently connected
    connected: bool,

    /// Subscribers to connection changes
    listeners: Vec<ConnectionListener>,
}

impl DeviceInput {
    /// Create a handle for `device`, taking its initial connection state from
    /// the host
    pub fn new<H: InputHost>(registry: &DeviceActionRegistry<H>, device: DeviceId) -> Self {
        let connected = device < 0 || registry.host().is_joy_connected(device);
        Self {
            device,
            connected,
            listeners: Vec::new(),
        }
    }

    /// Create a handle for the keyboard pseudo-device
    pub fn keyboard() -> Self {
        Self {
            device: KEYBOARD,
            connected: true,
            listeners: Vec::new(),
        }
    }

    /// Get the device index
    pub fn device(&self) -> DeviceId {
        self.device
    }

    pub fn is_keyboard(&self) -> bool {
        self.device < 0
    }

    pub fn is_joypad(&self) -> bool {
        self.device >= 0
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Subscribe to connection changes of this device
    pub fn on_connection_changed(&mut self, listener: impl FnMut(bool) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply a connect/disconnect notification; changes for other devices are
    /// ignored
    pub fn handle_connection_change(&mut self, change: ConnectionChange) {
        if self.is_keyboard() || change.device != self.device {
            return;
        }

        debug!(
            "Device handle {} is now {}",
            self.device,
            if change.connected {
                "connected"
            } else {
                "disconnected"
            }
        );
        self.connected = change.connected;
        for listener in &mut self.listeners {
            listener(change.connected);
        }
    }

    pub fn guid<H: InputHost>(&self, registry: &DeviceActionRegistry<H>) -> String {
        if self.is_keyboard() {
            return KEYBOARD_NAME.to_string();
        }
        registry.host().joy_guid(self.device)
    }

    pub fn name<H: InputHost>(&self, registry: &DeviceActionRegistry<H>) -> String {
        if self.is_keyboard() {
            return KEYBOARD_NAME.to_string();
        }
        registry.host().joy_name(self.device)
    }

    pub fn is_known<H: InputHost>(&self, registry: &DeviceActionRegistry<H>) -> bool {
        if self.is_keyboard() {
            return true;
        }
        registry.host().is_joy_known(self.device)
    }

    pub fn vibration_duration<H: InputHost>(&self, registry: &DeviceActionRegistry<H>) -> f32 {
        if self.is_keyboard() {
            return 0.0;
        }
        registry.host().joy_vibration_duration(self.device)
    }

    pub fn vibration_strength<H: InputHost>(&self, registry: &DeviceActionRegistry<H>) -> Vec2 {
        if self.is_keyboard() {
            return Vec2::ZERO;
        }
        registry.host().joy_vibration_strength(self.device)
    }

    /// Start rumble. A `duration` of 0.0 vibrates until stopped.
    pub fn start_vibration<H: InputHost>(
        &self,
        registry: &mut DeviceActionRegistry<H>,
        weak_magnitude: f32,
        strong_magnitude: f32,
        duration: f32,
    ) {
        if self.is_keyboard() {
            return;
        }
        registry
            .host_mut()
            .start_joy_vibration(self.device, weak_magnitude, strong_magnitude, duration);
    }

    pub fn stop_vibration<H: InputHost>(&self, registry: &mut DeviceActionRegistry<H>) {
        if self.is_keyboard() {
            return;
        }
        registry.host_mut().stop_joy_vibration(self.device);
    }

    pub fn action_raw_strength<H: InputHost>(
        &self,
        registry: &DeviceActionRegistry<H>,
        action: &str,
    ) -> Result<f32, InputError> {
        if !self.connected {
            return Ok(0.0);
        }
        registry.get_action_raw_strength(self.device, action)
    }

    pub fn action_strength<H: InputHost>(
        &self,
        registry: &DeviceActionRegistry<H>,
        action: &str,
    ) -> Result<f32, InputError> {
        if !self.connected {
            return Ok(0.0);
        }
        registry.get_action_strength(self.device, action)
    }

    pub fn axis<H: InputHost>(
        &self,
        registry: &DeviceActionRegistry<H>,
        negative: &str,
        positive: &str,
    ) -> Result<f32, InputError> {
        if !self.connected {
            return Ok(0.0);
        }
        registry.get_axis(self.device, negative, positive)
    }

    /// Four-action vector. A negative `deadzone` uses the actions' own deadzones.
    pub fn vector<H: InputHost>(
        &self,
        registry: &DeviceActionRegistry<H>,
        negative_x: &str,
        positive_x: &str,
        negative_y: &str,
        positive_y: &str,
        deadzone: f32,
    ) -> Result<Vec2, InputError> {
        if !self.connected {
            return Ok(Vec2::ZERO);
        }
        registry.get_vector(
            self.device,
            negative_x,
            positive_x,
            negative_y,
            positive_y,
            deadzone,
        )
    }

    pub fn is_action_just_pressed<H: InputHost>(
        &self,
        registry: &DeviceActionRegistry<H>,
        action: &str,
    ) -> Result<bool, InputError> {
        if !self.connected {
            return Ok(false);
        }
        registry.is_action_just_pressed(self.device, action)
    }

    pub fn is_action_just_released<H: InputHost>(
        &self,
        registry: &DeviceActionRegistry<H>,
        action: &str,
    ) -> Result<bool, InputError> {
        if !self.connected {
            return Ok(false);
        }
        registry.is_action_just_released(self.device, action)
    }

    pub fn is_action_pressed<H: InputHost>(
        &self,
        registry: &DeviceActionRegistry<H>,
        action: &str,
    ) -> Result<bool, InputError> {
        if !self.connected {
            return Ok(false);
        }
        registry.is_action_pressed(self.device, action)
    }

    /// Make this device the only one driving UI actions
    pub fn take_ui_actions<H: InputHost>(&self, registry: &mut DeviceActionRegistry<H>) {
        if !self.connected {
            return;
        }
        registry.set_ui_action_device(self.device);
    }
}

impl fmt::Debug for DeviceInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceInput")
            .field("device", &self.device)
            .field("connected", &self.connected)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
