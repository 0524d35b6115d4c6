// UI action routing: which device drives menu navigation

use super::action::{DeviceId, InputEvent, NO_DEVICE};
use super::action_map::ActionMap;
use super::config::MultiplayerConfig;
use log::debug;

/// Device assignment for UI actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiTarget {
    /// Leave UI actions bound as in the template
    Default,

    /// Only keyboard/mouse drive the UI, joypad bindings are stripped
    Keyboard,

    /// A single joypad drives the UI
    Joypad(DeviceId),
}

impl From<DeviceId> for UiTarget {
    fn from(device: DeviceId) -> Self {
        match device {
            NO_DEVICE => Self::Default,
            d if d >= 0 => Self::Joypad(d),
            _ => Self::Keyboard,
        }
    }
}

/// Rebind every UI action in `map` for `target`.
///
/// Mutates the live UI actions in place; a reload of the action map undoes
/// it. Returns the number of UI actions visited.
pub fn route_ui_actions(map: &mut ActionMap, config: &MultiplayerConfig, target: UiTarget) -> usize {
    if target == UiTarget::Default {
        return 0;
    }

    let mut visited = 0;
    for (_, entry) in map
        .entries_mut()
        .filter(|(action, _)| config.is_ui_action(action))
    {
        match target {
            UiTarget::Default => {}
            UiTarget::Keyboard => {
                entry.erase_events_where(InputEvent::is_joypad);
            }
            UiTarget::Joypad(device) => {
                entry.erase_events_where(|event| !event.is_joypad());
                entry.set_joypad_device(device);
            }
        }
        visited += 1;
    }

    debug!("Routed {} UI actions to {:?}", visited, target);
    visited
}
