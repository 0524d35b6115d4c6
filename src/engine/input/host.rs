// Host input platform interface
//
// Everything that touches hardware or computes raw input values lives behind
// `InputHost`. The multiplayer layer only rewrites the action map and
// resolves names, then asks the host for the actual values.

use super::action::DeviceId;
use super::action_map::ActionMap;
use crate::core::math::apply_radial_deadzone;
use glam::Vec2;

/// A joypad connect/disconnect notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionChange {
    pub device: DeviceId,
    pub connected: bool,
}

impl ConnectionChange {
    pub fn connected(device: DeviceId) -> Self {
        Self {
            device,
            connected: true,
        }
    }

    pub fn disconnected(device: DeviceId) -> Self {
        Self {
            device,
            connected: false,
        }
    }
}

/// The host input platform.
///
/// Value queries take concrete action names (logical or synthesized) and
/// know nothing about per-device routing.
pub trait InputHost {
    // Device identity

    /// Hardware GUID of a joypad
    fn joy_guid(&self, device: DeviceId) -> String;

    /// Display name of a joypad
    fn joy_name(&self, device: DeviceId) -> String;

    /// Whether the host recognizes the joypad's layout
    fn is_joy_known(&self, device: DeviceId) -> bool;

    /// Whether a joypad is currently connected
    fn is_joy_connected(&self, device: DeviceId) -> bool;

    // Vibration

    /// Duration of the current vibration in seconds (0.0 means until stopped)
    fn joy_vibration_duration(&self, device: DeviceId) -> f32;

    /// Current (weak, strong) vibration magnitudes
    fn joy_vibration_strength(&self, device: DeviceId) -> Vec2;

    fn start_joy_vibration(&mut self, device: DeviceId, weak: f32, strong: f32, duration: f32);

    fn stop_joy_vibration(&mut self, device: DeviceId);

    // Action values

    /// Strength of an action ignoring its deadzone
    fn action_raw_strength(&self, action: &str) -> f32;

    /// Strength of an action after applying its deadzone
    fn action_strength(&self, action: &str) -> f32;

    fn is_action_pressed(&self, action: &str) -> bool;

    fn is_action_just_pressed(&self, action: &str) -> bool;

    fn is_action_just_released(&self, action: &str) -> bool;

    /// Combine two actions into a single axis value in -1.0..=1.0
    fn axis(&self, negative: &str, positive: &str) -> f32 {
        self.action_strength(positive) - self.action_strength(negative)
    }

    /// Combine four actions into a 2D vector with a radial deadzone.
    ///
    /// A negative `deadzone` uses the average deadzone of the four actions.
    fn vector(
        &self,
        negative_x: &str,
        positive_x: &str,
        negative_y: &str,
        positive_y: &str,
        deadzone: f32,
    ) -> Vec2 {
        let raw = Vec2::new(
            self.action_raw_strength(positive_x) - self.action_raw_strength(negative_x),
            self.action_raw_strength(positive_y) - self.action_raw_strength(negative_y),
        );

        let deadzone = if deadzone < 0.0 {
            let map = self.action_map();
            let total: f32 = [negative_x, positive_x, negative_y, positive_y]
                .iter()
                .map(|action| map.action_deadzone(action).unwrap_or(0.0))
                .sum();
            total / 4.0
        } else {
            deadzone
        };

        apply_radial_deadzone(raw, deadzone)
    }

    // Action map

    fn action_map(&self) -> &ActionMap;

    fn action_map_mut(&mut self) -> &mut ActionMap;

    /// Discard the live action map and rebuild it from the persisted template
    fn load_action_map(&mut self);

    // Notifications

    /// Next pending connect/disconnect notification, in delivery order
    fn poll_connection_change(&mut self) -> Option<ConnectionChange>;
}
