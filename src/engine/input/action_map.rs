// Action map: named actions, their deadzones and bound input events

use super::action::{ActionConfig, ActionName, DeviceId, InputEvent, DEFAULT_DEADZONE};
use super::InputError;
use std::collections::BTreeMap;

/// A single registered action
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEntry {
    deadzone: f32,
    events: Vec<InputEvent>,
}

impl ActionEntry {
    fn new(deadzone: f32) -> Self {
        Self {
            deadzone,
            events: Vec::new(),
        }
    }

    /// Deadzone of this action
    pub fn deadzone(&self) -> f32 {
        self.deadzone
    }

    /// Events bound to this action
    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Bind an event. Binding the same event twice is a no-op.
    pub fn add_event(&mut self, event: InputEvent) {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
    }

    /// Unbind every event matching `predicate`, returning how many were removed
    pub fn erase_events_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&InputEvent) -> bool,
    {
        let before = self.events.len();
        self.events.retain(|e| !predicate(e));
        before - self.events.len()
    }

    /// Retarget every joypad event to `device`, returning how many changed
    pub fn set_joypad_device(&mut self, device: DeviceId) -> usize {
        self.events
            .iter_mut()
            .map(|event| event.set_device(device))
            .filter(|changed| *changed)
            .count()
    }
}

/// The set of all registered actions.
///
/// Holds both the logical actions loaded from configuration and any actions
/// synthesized at runtime. Names are kept sorted so enumeration is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionMap {
    actions: BTreeMap<ActionName, ActionEntry>,
}

impl ActionMap {
    /// Create an empty action map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an action map from template entries
    pub fn from_actions(actions: &[ActionConfig]) -> Self {
        let mut map = Self::new();
        for action in actions {
            map.add_action_with_events(action.name.clone(), action.deadzone, action.events.iter().copied());
        }
        map
    }

    /// Register an action, replacing any existing action with the same name
    pub fn add_action(&mut self, name: impl Into<ActionName>, deadzone: f32) {
        self.actions.insert(name.into(), ActionEntry::new(deadzone));
    }

    /// Register an action bound to `events`, replacing any existing action
    /// with the same name
    pub fn add_action_with_events<I>(&mut self, name: impl Into<ActionName>, deadzone: f32, events: I)
    where
        I: IntoIterator<Item = InputEvent>,
    {
        let mut entry = ActionEntry::new(deadzone);
        for event in events {
            entry.add_event(event);
        }
        self.actions.insert(name.into(), entry);
    }

    /// Register an action with the default deadzone
    pub fn add_action_default(&mut self, name: impl Into<ActionName>) {
        self.add_action(name, DEFAULT_DEADZONE);
    }

    /// Remove an action. Returns true if it existed.
    pub fn erase_action(&mut self, name: &str) -> bool {
        self.actions.remove(name).is_some()
    }

    /// Check if an action is registered
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Get an action entry
    pub fn get(&self, name: &str) -> Option<&ActionEntry> {
        self.actions.get(name)
    }

    /// Get a mutable action entry
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ActionEntry> {
        self.actions.get_mut(name)
    }

    /// Iterate over every action with mutable access to its entry
    pub fn entries_mut(&mut self) -> impl Iterator<Item = (&str, &mut ActionEntry)> {
        self.actions
            .iter_mut()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Names of all registered actions
    pub fn action_names(&self) -> Vec<ActionName> {
        self.actions.keys().cloned().collect()
    }

    /// Iterate over action names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if no action is registered
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Remove every action
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Events bound to an action
    pub fn action_events(&self, name: &str) -> Result<&[InputEvent], InputError> {
        self.entry(name).map(|entry| entry.events.as_slice())
    }

    /// Bind an event to an action. Binding the same event twice is a no-op.
    pub fn action_add_event(&mut self, name: &str, event: InputEvent) -> Result<(), InputError> {
        self.entry_mut(name)?.add_event(event);
        Ok(())
    }

    /// Unbind an event from an action. Returns true if it was bound.
    pub fn action_erase_event(&mut self, name: &str, event: &InputEvent) -> Result<bool, InputError> {
        let entry = self.entry_mut(name)?;
        let before = entry.events.len();
        entry.events.retain(|e| e != event);
        Ok(entry.events.len() != before)
    }

    /// Unbind every event matching `predicate`, returning how many were removed
    pub fn action_erase_events_where<F>(&mut self, name: &str, predicate: F) -> Result<usize, InputError>
    where
        F: FnMut(&InputEvent) -> bool,
    {
        Ok(self.entry_mut(name)?.erase_events_where(predicate))
    }

    /// Unbind all events from an action
    pub fn action_erase_events(&mut self, name: &str) -> Result<(), InputError> {
        self.entry_mut(name)?.events.clear();
        Ok(())
    }

    /// Check if an action has a specific event bound
    pub fn action_has_event(&self, name: &str, event: &InputEvent) -> bool {
        self.actions
            .get(name)
            .is_some_and(|entry| entry.events.contains(event))
    }

    /// Retarget every joypad event of an action to `device`.
    /// Returns the number of events changed.
    pub fn action_set_joypad_device(&mut self, name: &str, device: DeviceId) -> Result<usize, InputError> {
        Ok(self.entry_mut(name)?.set_joypad_device(device))
    }

    /// Deadzone of an action
    pub fn action_deadzone(&self, name: &str) -> Result<f32, InputError> {
        self.entry(name).map(|entry| entry.deadzone)
    }

    /// Change the deadzone of an action
    pub fn action_set_deadzone(&mut self, name: &str, deadzone: f32) -> Result<(), InputError> {
        self.entry_mut(name)?.deadzone = deadzone;
        Ok(())
    }

    fn entry(&self, name: &str) -> Result<&ActionEntry, InputError> {
        self.actions
            .get(name)
            .ok_or_else(|| InputError::UnknownAction(name.to_string()))
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut ActionEntry, InputError> {
        self.actions
            .get_mut(name)
            .ok_or_else(|| InputError::UnknownAction(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    fn jump_map() -> ActionMap {
        ActionMap::from_actions(&[ActionConfig::new(
            "jump",
            vec![InputEvent::key(KeyCode::KeyW), InputEvent::joy_button(0)],
        )])
    }

    #[test]
    fn test_map_creation() {
        let map = ActionMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_from_actions() {
        let map = jump_map();
        assert!(map.has_action("jump"));
        assert_eq!(map.action_events("jump").unwrap().len(), 2);
        assert_eq!(map.action_deadzone("jump").unwrap(), DEFAULT_DEADZONE);
    }

    #[test]
    fn test_add_and_erase_action() {
        let mut map = ActionMap::new();
        map.add_action("dash", 0.3);
        assert!(map.has_action("dash"));
        assert_eq!(map.action_deadzone("dash").unwrap(), 0.3);

        assert!(map.erase_action("dash"));
        assert!(!map.has_action("dash"));
        assert!(!map.erase_action("dash"));
    }

    #[test]
    fn test_add_action_replaces_existing() {
        let mut map = jump_map();
        map.add_action("jump", 0.1);

        assert!(map.action_events("jump").unwrap().is_empty());
        assert_eq!(map.action_deadzone("jump").unwrap(), 0.1);
    }

    #[test]
    fn test_add_event_no_duplicates() {
        let mut map = jump_map();
        map.action_add_event("jump", InputEvent::joy_button(0)).unwrap();
        assert_eq!(map.action_events("jump").unwrap().len(), 2);
    }

    #[test]
    fn test_erase_event() {
        let mut map = jump_map();
        let key = InputEvent::key(KeyCode::KeyW);

        assert!(map.action_erase_event("jump", &key).unwrap());
        assert!(!map.action_has_event("jump", &key));
        assert!(!map.action_erase_event("jump", &key).unwrap());
    }

    #[test]
    fn test_erase_events_where() {
        let mut map = jump_map();
        let removed = map
            .action_erase_events_where("jump", InputEvent::is_joypad)
            .unwrap();

        assert_eq!(removed, 1);
        assert_eq!(
            map.action_events("jump").unwrap(),
            &[InputEvent::key(KeyCode::KeyW)]
        );
    }

    #[test]
    fn test_erase_all_events() {
        let mut map = jump_map();
        map.action_erase_events("jump").unwrap();
        assert!(map.action_events("jump").unwrap().is_empty());
        assert!(map.has_action("jump"));
    }

    #[test]
    fn test_set_joypad_device() {
        let mut map = jump_map();
        let changed = map.action_set_joypad_device("jump", 3).unwrap();

        assert_eq!(changed, 1);
        let devices: Vec<_> = map
            .action_events("jump")
            .unwrap()
            .iter()
            .filter_map(InputEvent::device)
            .collect();
        assert_eq!(devices, vec![3]);
    }

    #[test]
    fn test_set_deadzone() {
        let mut map = jump_map();
        map.action_set_deadzone("jump", 0.75).unwrap();
        assert_eq!(map.action_deadzone("jump").unwrap(), 0.75);
    }

    #[test]
    fn test_unknown_action_errors() {
        let mut map = ActionMap::new();
        assert!(matches!(
            map.action_events("missing"),
            Err(InputError::UnknownAction(name)) if name == "missing"
        ));
        assert!(map
            .action_add_event("missing", InputEvent::joy_button(0))
            .is_err());
        assert!(map.action_set_deadzone("missing", 0.1).is_err());
    }

    #[test]
    fn test_add_action_with_events() {
        let mut map = ActionMap::new();
        let button = InputEvent::joy_button(0).with_device(2);
        map.add_action_with_events("2jump", 0.4, [button, button]);

        assert_eq!(map.action_events("2jump").unwrap(), &[button]);
        assert_eq!(map.action_deadzone("2jump").unwrap(), 0.4);
    }

    #[test]
    fn test_entries_mut() {
        let mut map = jump_map();
        map.add_action_default("ui_accept");
        for (name, entry) in map.entries_mut() {
            if name == "jump" {
                assert_eq!(entry.set_joypad_device(5), 1);
            }
        }

        assert!(map.action_has_event("jump", &InputEvent::joy_button(0).with_device(5)));
        assert!(map.action_events("ui_accept").unwrap().is_empty());
    }

    #[test]
    fn test_names_sorted() {
        let mut map = ActionMap::new();
        map.add_action_default("b");
        map.add_action_default("a");
        map.add_action_default("c");

        assert_eq!(map.action_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clear() {
        let mut map = jump_map();
        map.clear();
        assert!(map.is_empty());
    }
}
