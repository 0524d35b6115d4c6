// Device action registry: per-device copies of the joypad bindings
//
// Every connected joypad gets its own action for each logical action with a
// joypad binding, named "<device><action>" and listening only to that joypad.
// Queries for (device, action) are resolved to that name before being handed
// to the host. The keyboard uses the logical actions directly.

use super::action::{ActionName, DeviceId, InputEvent};
use super::config::MultiplayerConfig;
use super::host::{ConnectionChange, InputHost};
use super::ui::{route_ui_actions, UiTarget};
use super::InputError;
use glam::Vec2;
use log::{debug, error, info, warn};
use std::collections::HashMap;

/// Name of the action synthesized for `action` on `device`
pub fn synthesized_action_name(device: DeviceId, action: &str) -> ActionName {
    format!("{}{}", device, action)
}

/// Split a synthesized action name into its device and logical action.
///
/// Returns `None` for names without a device prefix.
pub fn split_synthesized_action_name(name: &str) -> Option<(DeviceId, &str)> {
    let digits = name.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits == name.len() {
        return None;
    }
    let device = name[..digits].parse().ok()?;
    Some((device, &name[digits..]))
}

/// Logical action -> synthesized action for a single connected joypad
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceActionMap {
    actions: HashMap<ActionName, ActionName>,
}

impl DeviceActionMap {
    /// Synthesized name for a logical action
    pub fn get(&self, action: &str) -> Option<&str> {
        self.actions.get(action).map(String::as_str)
    }

    /// Check if a logical action has a per-device copy
    pub fn contains(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }

    /// Every action created for this device
    pub fn synthesized_actions(&self) -> impl Iterator<Item = &str> {
        self.actions.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Joypad bindings of a logical action, as captured on the last reset
#[derive(Debug, Clone, PartialEq)]
struct JoypadTemplate {
    deadzone: f32,
    events: Vec<InputEvent>,
}

/// Keeps per-device actions in sync with connected joypads and resolves
/// (device, action) queries.
///
/// Owns the host so that registration, teardown and resolution all happen
/// through one `&mut` borrow; a multi-threaded game wraps the whole registry
/// in a single lock.
pub struct DeviceActionRegistry<H: InputHost> {
    /// Host input platform
    host: H,

    /// Routing settings
    config: MultiplayerConfig,

    /// Logical actions captured on the last reset
    core_actions: Vec<ActionName>,

    /// Joypad bindings of each logical action before any UI routing
    templates: HashMap<ActionName, JoypadTemplate>,

    /// Per-device mappings for connected, non-ignored joypads
    device_actions: HashMap<DeviceId, DeviceActionMap>,
}

impl<H: InputHost> DeviceActionRegistry<H> {
    /// Create a registry and load the template from the host
    pub fn new(host: H, config: MultiplayerConfig) -> Self {
        let mut registry = Self {
            host,
            config,
            core_actions: Vec::new(),
            templates: HashMap::new(),
            device_actions: HashMap::new(),
        };
        registry.reset();
        registry
    }

    /// The host input platform
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host input platform
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Routing settings
    pub fn config(&self) -> &MultiplayerConfig {
        &self.config
    }

    /// Logical actions captured on the last reset
    pub fn core_actions(&self) -> &[ActionName] {
        &self.core_actions
    }

    /// Mapping of a device, if it has one
    pub fn device_actions(&self, device: DeviceId) -> Option<&DeviceActionMap> {
        self.device_actions.get(&device)
    }

    /// Joypads that currently have per-device actions, sorted
    pub fn mapped_devices(&self) -> Vec<DeviceId> {
        let mut devices: Vec<_> = self.device_actions.keys().copied().collect();
        devices.sort_unstable();
        devices
    }

    /// Check if an action is a UI action
    pub fn is_ui_action(&self, action: &str) -> bool {
        self.config.is_ui_action(action)
    }

    /// Reload the template and park its joypad events on the template device.
    ///
    /// Non-UI joypad events in the template are moved to the template device
    /// so they don't match any real joypad; each joypad only sees its own
    /// copies. Devices that had a mapping get their actions rebuilt from the
    /// fresh template. Later UI routing doesn't change what joypads get.
    pub fn reset(&mut self) {
        self.host.load_action_map();

        let map = self.host.action_map_mut();
        self.core_actions = map.action_names();
        self.templates.clear();
        for (action, entry) in map.entries_mut() {
            if !self.config.is_ui_action(action) {
                entry.set_joypad_device(self.config.template_device);
            }

            let events: Vec<_> = entry
                .events()
                .iter()
                .filter(|event| event.is_joypad())
                .copied()
                .collect();
            if !events.is_empty() {
                self.templates.insert(
                    action.to_string(),
                    JoypadTemplate {
                        deadzone: entry.deadzone(),
                        events,
                    },
                );
            }
        }

        let devices = self.mapped_devices();
        for device in &devices {
            self.create_actions_for_device(*device);
        }

        debug!(
            "Reset action map: {} core actions, rebuilt {} devices",
            self.core_actions.len(),
            devices.len()
        );
    }

    /// Give a newly connected joypad its own copy of every joypad binding.
    ///
    /// Returns the number of actions registered. Joypads on the ignore list
    /// get none. Connecting an already mapped joypad rebuilds its actions.
    pub fn create_actions_for_device(&mut self, device: DeviceId) -> usize {
        if device < 0 {
            warn!("Ignoring action creation for keyboard device {}", device);
            return 0;
        }

        let guid = self.host.joy_guid(device);
        if self.config.is_ignored(&guid) {
            info!("Joypad {} ({}) is on the ignore list", device, guid);
            self.delete_actions_for_device(device);
            return 0;
        }

        if self.device_actions.contains_key(&device) {
            debug!("Rebuilding actions for joypad {}", device);
            self.delete_actions_for_device(device);
        }

        let map = self.host.action_map_mut();
        let mut device_map = DeviceActionMap::default();

        for core_action in &self.core_actions {
            let Some(template) = self.templates.get(core_action) else {
                continue;
            };

            let new_action = synthesized_action_name(device, core_action);
            map.add_action_with_events(
                new_action.clone(),
                template.deadzone,
                template.events.iter().map(|event| event.with_device(device)),
            );
            device_map
                .actions
                .insert(core_action.clone(), new_action);
        }

        let created = device_map.len();
        self.device_actions.insert(device, device_map);
        debug!("Created {} actions for joypad {}", created, device);
        created
    }

    /// Remove every action created for a joypad, returning how many were removed
    pub fn delete_actions_for_device(&mut self, device: DeviceId) -> usize {
        let Some(device_map) = self.device_actions.remove(&device) else {
            return 0;
        };

        let map = self.host.action_map_mut();
        let removed = device_map
            .synthesized_actions()
            .filter(|action| map.erase_action(action))
            .count();

        debug!("Deleted {} actions for joypad {}", removed, device);
        removed
    }

    /// Apply a connect/disconnect notification
    pub fn handle_connection_change(&mut self, change: ConnectionChange) {
        if change.device < 0 {
            return;
        }

        if change.connected {
            info!(
                "Joypad {} connected: {}",
                change.device,
                self.host.joy_name(change.device)
            );
            self.create_actions_for_device(change.device);
        } else {
            info!("Joypad {} disconnected", change.device);
            self.delete_actions_for_device(change.device);
        }
    }

    /// Drain the host's pending notifications in delivery order.
    ///
    /// Returns the processed changes so they can be forwarded to device
    /// handles.
    pub fn process_connection_events(&mut self) -> Vec<ConnectionChange> {
        let mut changes = Vec::new();
        while let Some(change) = self.host.poll_connection_change() {
            self.handle_connection_change(change);
            changes.push(change);
        }
        changes
    }

    /// Resolve the action name to query for `device`.
    ///
    /// The keyboard uses logical names directly. Asking for a joypad without
    /// a mapping is a caller bug (the joypad was never connected, is
    /// ignored, or is already gone) and fails.
    pub fn get_action_name<'a>(&'a self, device: DeviceId, action: &'a str) -> Result<&'a str, InputError> {
        if device < 0 {
            return Ok(action);
        }

        let Some(device_map) = self.device_actions.get(&device) else {
            error!(
                "Device {} has no actions. Maybe the joypad is disconnected.",
                device
            );
            return Err(InputError::DeviceHasNoActions(device));
        };

        device_map
            .get(action)
            .ok_or_else(|| InputError::ActionNotMapped {
                device,
                action: action.to_string(),
            })
    }

    pub fn get_action_raw_strength(&self, device: DeviceId, action: &str) -> Result<f32, InputError> {
        let action = self.get_action_name(device, action)?;
        Ok(self.host.action_raw_strength(action))
    }

    pub fn get_action_strength(&self, device: DeviceId, action: &str) -> Result<f32, InputError> {
        let action = self.get_action_name(device, action)?;
        Ok(self.host.action_strength(action))
    }

    pub fn get_axis(&self, device: DeviceId, negative: &str, positive: &str) -> Result<f32, InputError> {
        let negative = self.get_action_name(device, negative)?;
        let positive = self.get_action_name(device, positive)?;
        Ok(self.host.axis(negative, positive))
    }

    /// Four-action vector for a device. A negative `deadzone` uses the
    /// actions' own deadzones.
    pub fn get_vector(
        &self,
        device: DeviceId,
        negative_x: &str,
        positive_x: &str,
        negative_y: &str,
        positive_y: &str,
        deadzone: f32,
    ) -> Result<Vec2, InputError> {
        let negative_x = self.get_action_name(device, negative_x)?;
        let positive_x = self.get_action_name(device, positive_x)?;
        let negative_y = self.get_action_name(device, negative_y)?;
        let positive_y = self.get_action_name(device, positive_y)?;
        Ok(self
            .host
            .vector(negative_x, positive_x, negative_y, positive_y, deadzone))
    }

    pub fn is_action_just_pressed(&self, device: DeviceId, action: &str) -> Result<bool, InputError> {
        let action = self.get_action_name(device, action)?;
        Ok(self.host.is_action_just_pressed(action))
    }

    pub fn is_action_just_released(&self, device: DeviceId, action: &str) -> Result<bool, InputError> {
        let action = self.get_action_name(device, action)?;
        Ok(self.host.is_action_just_released(action))
    }

    pub fn is_action_pressed(&self, device: DeviceId, action: &str) -> Result<bool, InputError> {
        let action = self.get_action_name(device, action)?;
        Ok(self.host.is_action_pressed(action))
    }

    /// Choose which device drives UI actions.
    ///
    /// Always resets first. `NO_DEVICE` keeps the template bindings,
    /// `KEYBOARD` strips joypad bindings from UI actions, and a joypad index
    /// makes that joypad the only source of UI input.
    pub fn set_ui_action_device(&mut self, device: DeviceId) {
        self.reset();
        let target = UiTarget::from(device);
        route_ui_actions(self.host.action_map_mut(), &self.config, target);
        info!("UI actions assigned to {:?}", target);
    }
}
