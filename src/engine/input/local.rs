// In-process input host: raw device state, action values and hot-plug events

use super::action::{DeviceId, InputEvent};
use super::action_map::ActionMap;
use super::config::InputConfig;
use super::host::{ConnectionChange, InputHost};
use crate::core::math::{apply_deadzone, clamp};
use glam::Vec2;
use log::{debug, warn};
use std::collections::{HashMap, HashSet, VecDeque};
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Identity of a connected joypad
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoypadInfo {
    pub name: String,
    pub guid: String,

    /// Whether the joypad has a known button/axis layout
    pub known: bool,
}

impl JoypadInfo {
    pub fn new(name: impl Into<String>, guid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guid: guid.into(),
            known: true,
        }
    }
}

/// Active rumble on a joypad
#[derive(Debug, Clone, Copy, PartialEq)]
struct Vibration {
    weak: f32,
    strong: f32,
    duration: f32,
}

/// Live state of a single joypad
#[derive(Debug, Clone)]
struct JoypadState {
    info: JoypadInfo,
    buttons: HashSet<u32>,
    axes: HashMap<u32, f32>,
    vibration: Option<Vibration>,
}

impl JoypadState {
    fn new(info: JoypadInfo) -> Self {
        Self {
            info,
            buttons: HashSet::new(),
            axes: HashMap::new(),
            vibration: None,
        }
    }
}

/// Input host backed by in-memory device state.
///
/// Feed it keyboard/mouse/joypad input as it arrives, call `update()` once
/// per frame after processing all events, and query action values in between.
#[derive(Debug)]
pub struct LocalInput {
    /// Persisted template the action map is rebuilt from
    config: InputConfig,

    /// Live action map (template plus any synthesized actions)
    action_map: ActionMap,

    /// Keys currently held
    keys: HashSet<KeyCode>,

    /// Mouse buttons currently held
    mouse_buttons: HashSet<MouseButton>,

    /// Connected joypads
    joypads: HashMap<DeviceId, JoypadState>,

    /// Actions that were pressed when `update()` was last called
    previous_pressed: HashSet<String>,

    /// Connection notifications not yet delivered
    pending: VecDeque<ConnectionChange>,
}

impl LocalInput {
    /// Create a host with the action map loaded from `config`
    pub fn new(config: InputConfig) -> Self {
        let action_map = config.action_map();
        Self {
            config,
            action_map,
            keys: HashSet::new(),
            mouse_buttons: HashSet::new(),
            joypads: HashMap::new(),
            previous_pressed: HashSet::new(),
            pending: VecDeque::new(),
        }
    }

    /// The persisted configuration
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Plug in a joypad. Reconnecting an occupied slot replaces its state.
    pub fn connect_joypad(&mut self, device: DeviceId, info: JoypadInfo) {
        debug!("Joypad {} plugged in: {} ({})", device, info.name, info.guid);
        self.joypads.insert(device, JoypadState::new(info));
        self.pending.push_back(ConnectionChange::connected(device));
    }

    /// Unplug a joypad. Returns false if nothing was connected in that slot.
    pub fn disconnect_joypad(&mut self, device: DeviceId) -> bool {
        if self.joypads.remove(&device).is_none() {
            return false;
        }
        debug!("Joypad {} unplugged", device);
        self.pending.push_back(ConnectionChange::disconnected(device));
        true
    }

    /// Indices of all connected joypads, sorted
    pub fn connected_joypads(&self) -> Vec<DeviceId> {
        let mut devices: Vec<_> = self.joypads.keys().copied().collect();
        devices.sort_unstable();
        devices
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        self.process_key(event.physical_key, event.state, event.repeat);
    }

    /// Apply a physical key transition. Auto-repeats are ignored.
    pub fn process_key(&mut self, physical_key: PhysicalKey, state: ElementState, repeat: bool) {
        // Only process physical key presses
        if let PhysicalKey::Code(key_code) = physical_key {
            match state {
                ElementState::Pressed => {
                    if !repeat {
                        self.press_key(key_code);
                    }
                }
                ElementState::Released => self.release_key(key_code),
            }
        }
    }

    /// Process a mouse button event from winit
    pub fn process_mouse_event(&mut self, state: ElementState, button: MouseButton) {
        match state {
            ElementState::Pressed => self.press_mouse_button(button),
            ElementState::Released => self.release_mouse_button(button),
        }
    }

    pub fn press_key(&mut self, key: KeyCode) {
        self.keys.insert(key);
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    pub fn press_mouse_button(&mut self, button: MouseButton) {
        self.mouse_buttons.insert(button);
    }

    pub fn release_mouse_button(&mut self, button: MouseButton) {
        self.mouse_buttons.remove(&button);
    }

    /// Press a joypad button. Input from disconnected joypads is dropped.
    pub fn press_joy_button(&mut self, device: DeviceId, button: u32) {
        if let Some(joypad) = self.joypads.get_mut(&device) {
            joypad.buttons.insert(button);
        }
    }

    pub fn release_joy_button(&mut self, device: DeviceId, button: u32) {
        if let Some(joypad) = self.joypads.get_mut(&device) {
            joypad.buttons.remove(&button);
        }
    }

    /// Move a joypad axis, clamped to -1.0..=1.0
    pub fn set_joy_axis(&mut self, device: DeviceId, axis: u32, value: f32) {
        if let Some(joypad) = self.joypads.get_mut(&device) {
            joypad.axes.insert(axis, clamp(value, -1.0, 1.0));
        }
    }

    /// Update frame state.
    /// Call this once per frame after processing all events
    pub fn update(&mut self) {
        self.previous_pressed = self
            .action_map
            .names()
            .filter(|action| self.is_action_pressed(action))
            .map(str::to_string)
            .collect();
    }

    /// Release every key, button and axis
    pub fn reset(&mut self) {
        self.keys.clear();
        self.mouse_buttons.clear();
        for joypad in self.joypads.values_mut() {
            joypad.buttons.clear();
            joypad.axes.clear();
        }
        self.previous_pressed.clear();
    }

    /// Strength of a single bound event
    fn event_strength(&self, event: &InputEvent) -> f32 {
        match event {
            InputEvent::Key { key } => pressed_strength(self.keys.contains(key)),
            InputEvent::MouseButton { button } => {
                pressed_strength(self.mouse_buttons.contains(button))
            }
            InputEvent::JoypadButton { button, .. } => self
                .joypads_for(event)
                .map(|joypad| pressed_strength(joypad.buttons.contains(button)))
                .fold(0.0, f32::max),
            InputEvent::JoypadMotion {
                axis, axis_value, ..
            } => self
                .joypads_for(event)
                .map(|joypad| {
                    let value = joypad.axes.get(axis).copied().unwrap_or(0.0);
                    if value * axis_value > 0.0 {
                        value.abs().min(1.0)
                    } else {
                        0.0
                    }
                })
                .fold(0.0, f32::max),
        }
    }

    /// Connected joypads a joypad event listens to
    fn joypads_for<'a>(&'a self, event: &'a InputEvent) -> impl Iterator<Item = &'a JoypadState> {
        self.joypads
            .iter()
            .filter(move |(device, _)| event.matches_joypad(**device))
            .map(|(_, joypad)| joypad)
    }
}

fn pressed_strength(pressed: bool) -> f32 {
    if pressed {
        1.0
    } else {
        0.0
    }
}

impl Default for LocalInput {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

impl InputHost for LocalInput {
    fn joy_guid(&self, device: DeviceId) -> String {
        self.joypads
            .get(&device)
            .map(|joypad| joypad.info.guid.clone())
            .unwrap_or_default()
    }

    fn joy_name(&self, device: DeviceId) -> String {
        self.joypads
            .get(&device)
            .map(|joypad| joypad.info.name.clone())
            .unwrap_or_default()
    }

    fn is_joy_known(&self, device: DeviceId) -> bool {
        self.joypads
            .get(&device)
            .is_some_and(|joypad| joypad.info.known)
    }

    fn is_joy_connected(&self, device: DeviceId) -> bool {
        self.joypads.contains_key(&device)
    }

    fn joy_vibration_duration(&self, device: DeviceId) -> f32 {
        self.joypads
            .get(&device)
            .and_then(|joypad| joypad.vibration)
            .map_or(0.0, |vibration| vibration.duration)
    }

    fn joy_vibration_strength(&self, device: DeviceId) -> Vec2 {
        self.joypads
            .get(&device)
            .and_then(|joypad| joypad.vibration)
            .map_or(Vec2::ZERO, |vibration| {
                Vec2::new(vibration.weak, vibration.strong)
            })
    }

    fn start_joy_vibration(&mut self, device: DeviceId, weak: f32, strong: f32, duration: f32) {
        if let Some(joypad) = self.joypads.get_mut(&device) {
            joypad.vibration = Some(Vibration {
                weak: clamp(weak, 0.0, 1.0),
                strong: clamp(strong, 0.0, 1.0),
                duration: duration.max(0.0),
            });
        }
    }

    fn stop_joy_vibration(&mut self, device: DeviceId) {
        if let Some(joypad) = self.joypads.get_mut(&device) {
            joypad.vibration = None;
        }
    }

    fn action_raw_strength(&self, action: &str) -> f32 {
        match self.action_map.get(action) {
            Some(entry) => entry
                .events()
                .iter()
                .map(|event| self.event_strength(event))
                .fold(0.0, f32::max),
            None => {
                warn!("Queried unknown action '{}'", action);
                0.0
            }
        }
    }

    fn action_strength(&self, action: &str) -> f32 {
        match self.action_map.get(action) {
            Some(entry) => apply_deadzone(self.action_raw_strength(action), entry.deadzone()),
            None => {
                warn!("Queried unknown action '{}'", action);
                0.0
            }
        }
    }

    fn is_action_pressed(&self, action: &str) -> bool {
        self.action_strength(action) > 0.0
    }

    fn is_action_just_pressed(&self, action: &str) -> bool {
        self.is_action_pressed(action) && !self.previous_pressed.contains(action)
    }

    fn is_action_just_released(&self, action: &str) -> bool {
        !self.is_action_pressed(action) && self.previous_pressed.contains(action)
    }

    fn action_map(&self) -> &ActionMap {
        &self.action_map
    }

    fn action_map_mut(&mut self) -> &mut ActionMap {
        &mut self.action_map
    }

    fn load_action_map(&mut self) {
        // The frame snapshot is kept: rebuilt actions reuse their names
        self.action_map = self.config.action_map();
    }

    fn poll_connection_change(&mut self) -> Option<ConnectionChange> {
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::action::{ActionConfig, ALL_DEVICES};
    use crate::engine::input::config::MultiplayerConfig;
    use approx::assert_relative_eq;
    use winit::keyboard::NativeKeyCode;

    fn host() -> LocalInput {
        let actions = vec![
            ActionConfig::new(
                "jump",
                vec![InputEvent::key(KeyCode::KeyW), InputEvent::joy_button(0)],
            ),
            ActionConfig::new("left", vec![InputEvent::joy_motion(0, -1.0)]).with_deadzone(0.2),
            ActionConfig::new("right", vec![InputEvent::joy_motion(0, 1.0)]).with_deadzone(0.2),
            ActionConfig::new("up", vec![InputEvent::joy_motion(1, -1.0)]).with_deadzone(0.2),
            ActionConfig::new("down", vec![InputEvent::joy_motion(1, 1.0)]).with_deadzone(0.2),
            ActionConfig::new("fire", vec![InputEvent::mouse(MouseButton::Left)]),
        ];
        LocalInput::new(InputConfig::new(MultiplayerConfig::default(), actions))
    }

    fn pad() -> JoypadInfo {
        JoypadInfo::new("Test Pad", "0300aa")
    }

    #[test]
    fn test_key_press_and_release() {
        let mut input = host();
        input.press_key(KeyCode::KeyW);
        assert!(input.is_action_pressed("jump"));
        assert_eq!(input.action_strength("jump"), 1.0);

        input.release_key(KeyCode::KeyW);
        assert!(!input.is_action_pressed("jump"));
    }

    #[test]
    fn test_key_repeat_ignored() {
        let mut input = host();
        let key = PhysicalKey::Code(KeyCode::KeyW);

        input.process_key(key, ElementState::Pressed, false);
        assert!(input.is_action_pressed("jump"));

        input.process_key(key, ElementState::Released, false);
        input.process_key(key, ElementState::Pressed, true);
        assert!(!input.is_action_pressed("jump"));
    }

    #[test]
    fn test_unidentified_key_ignored() {
        let mut input = host();
        input.process_key(
            PhysicalKey::Unidentified(NativeKeyCode::Unidentified),
            ElementState::Pressed,
            false,
        );
        assert!(input.keys.is_empty());
    }

    #[test]
    fn test_held_action_survives_reload() {
        let mut input = host();
        input.connect_joypad(0, pad());
        input.press_joy_button(0, 0);
        input.update();

        input.load_action_map();
        assert!(input.is_action_pressed("jump"));
        assert!(!input.is_action_just_pressed("jump"));
    }

    #[test]
    fn test_mouse_button() {
        let mut input = host();
        input.process_mouse_event(ElementState::Pressed, MouseButton::Left);
        assert!(input.is_action_pressed("fire"));

        input.process_mouse_event(ElementState::Released, MouseButton::Left);
        assert!(!input.is_action_pressed("fire"));
    }

    #[test]
    fn test_joypad_button_matches_all_devices() {
        let mut input = host();
        input.connect_joypad(3, pad());
        input.press_joy_button(3, 0);
        assert!(input.is_action_pressed("jump"));
    }

    #[test]
    fn test_joypad_event_targets_one_device() {
        let mut input = host();
        input.connect_joypad(0, pad());
        input.connect_joypad(1, pad());
        input
            .action_map_mut()
            .action_set_joypad_device("jump", 1)
            .unwrap();

        input.press_joy_button(0, 0);
        assert!(!input.is_action_pressed("jump"));

        input.press_joy_button(1, 0);
        assert!(input.is_action_pressed("jump"));
    }

    #[test]
    fn test_input_from_disconnected_joypad_is_dropped() {
        let mut input = host();
        input.press_joy_button(0, 0);
        assert!(!input.is_action_pressed("jump"));
    }

    #[test]
    fn test_axis_strength_and_deadzone() {
        let mut input = host();
        input.connect_joypad(0, pad());

        input.set_joy_axis(0, 0, 0.1);
        assert_relative_eq!(input.action_raw_strength("right"), 0.1);
        assert_eq!(input.action_strength("right"), 0.0);
        assert!(!input.is_action_pressed("right"));

        input.set_joy_axis(0, 0, 0.6);
        assert_relative_eq!(input.action_strength("right"), 0.5, epsilon = 1e-6);
        assert_eq!(input.action_raw_strength("left"), 0.0);
    }

    #[test]
    fn test_axis_combination() {
        let mut input = host();
        input.connect_joypad(0, pad());
        input.set_joy_axis(0, 0, -1.0);

        assert_relative_eq!(input.axis("left", "right"), -1.0);
    }

    #[test]
    fn test_vector_combination() {
        let mut input = host();
        input.connect_joypad(0, pad());
        input.set_joy_axis(0, 0, 1.0);
        input.set_joy_axis(0, 1, 1.0);

        let v = input.vector("left", "right", "up", "down", -1.0);
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-6);
        assert!(v.x > 0.0 && v.y > 0.0);

        input.set_joy_axis(0, 0, 0.1);
        input.set_joy_axis(0, 1, 0.0);
        assert_eq!(input.vector("left", "right", "up", "down", -1.0), Vec2::ZERO);
    }

    #[test]
    fn test_axis_value_clamped() {
        let mut input = host();
        input.connect_joypad(0, pad());
        input.set_joy_axis(0, 0, 4.0);
        assert_eq!(input.action_raw_strength("right"), 1.0);
    }

    #[test]
    fn test_just_pressed_cleared_on_update() {
        let mut input = host();
        input.press_key(KeyCode::KeyW);
        assert!(input.is_action_just_pressed("jump"));

        input.update();
        assert!(input.is_action_pressed("jump"));
        assert!(!input.is_action_just_pressed("jump"));
    }

    #[test]
    fn test_just_released() {
        let mut input = host();
        input.press_key(KeyCode::KeyW);
        input.update();
        input.release_key(KeyCode::KeyW);

        assert!(input.is_action_just_released("jump"));
        input.update();
        assert!(!input.is_action_just_released("jump"));
    }

    #[test]
    fn test_unknown_action_is_neutral() {
        let input = host();
        assert_eq!(input.action_strength("missing"), 0.0);
        assert!(!input.is_action_pressed("missing"));
    }

    #[test]
    fn test_connection_notifications_in_order() {
        let mut input = host();
        input.connect_joypad(0, pad());
        input.connect_joypad(2, pad());
        assert!(input.disconnect_joypad(0));
        assert!(!input.disconnect_joypad(5));

        assert_eq!(
            input.poll_connection_change(),
            Some(ConnectionChange::connected(0))
        );
        assert_eq!(
            input.poll_connection_change(),
            Some(ConnectionChange::connected(2))
        );
        assert_eq!(
            input.poll_connection_change(),
            Some(ConnectionChange::disconnected(0))
        );
        assert_eq!(input.poll_connection_change(), None);
        assert_eq!(input.connected_joypads(), vec![2]);
    }

    #[test]
    fn test_joypad_identity() {
        let mut input = host();
        let mut info = JoypadInfo::new("Arcade Stick", "beef");
        info.known = false;
        input.connect_joypad(1, info);

        assert_eq!(input.joy_name(1), "Arcade Stick");
        assert_eq!(input.joy_guid(1), "beef");
        assert!(!input.is_joy_known(1));
        assert!(input.is_joy_connected(1));
        assert!(!input.is_joy_connected(0));
        assert_eq!(input.joy_guid(0), "");
    }

    #[test]
    fn test_vibration() {
        let mut input = host();
        input.connect_joypad(0, pad());
        input.start_joy_vibration(0, 0.25, 0.75, 1.5);

        assert_eq!(input.joy_vibration_strength(0), Vec2::new(0.25, 0.75));
        assert_eq!(input.joy_vibration_duration(0), 1.5);

        input.stop_joy_vibration(0);
        assert_eq!(input.joy_vibration_strength(0), Vec2::ZERO);
        assert_eq!(input.joy_vibration_duration(0), 0.0);
    }

    #[test]
    fn test_load_action_map_discards_runtime_actions() {
        let mut input = host();
        input.action_map_mut().add_action("0jump", 0.5);
        input
            .action_map_mut()
            .action_set_joypad_device("jump", 7)
            .unwrap();

        input.load_action_map();
        assert!(!input.action_map().has_action("0jump"));
        assert_eq!(
            input.action_map().action_events("jump").unwrap()[1].device(),
            Some(ALL_DEVICES)
        );
    }

    #[test]
    fn test_reset_releases_everything() {
        let mut input = host();
        input.connect_joypad(0, pad());
        input.press_key(KeyCode::KeyW);
        input.press_joy_button(0, 0);
        input.reset();

        assert!(!input.is_action_pressed("jump"));
    }
}
