use anyhow::Result;
use log::{info, warn};
use multiplayer_input::engine::input::{
    DeviceActionRegistry, DeviceInput, InputConfig, InputHost, JoypadInfo, LocalInput, NO_DEVICE,
};
use winit::keyboard::KeyCode;

/// Drive a scripted local multiplayer session against the in-process host
fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting multiplayer input demo...");

    let config = match std::env::args().nth(1) {
        Some(path) => InputConfig::load(path)?,
        None => InputConfig::default(),
    };

    let mut registry = DeviceActionRegistry::new(LocalInput::new(config.clone()), config.multiplayer);
    info!("{} core actions loaded", registry.core_actions().len());

    let mut players = vec![
        DeviceInput::keyboard(),
        DeviceInput::new(&registry, 0),
        DeviceInput::new(&registry, 1),
    ];
    for player in &mut players {
        let device = player.device();
        player.on_connection_changed(move |connected| {
            info!("Player on device {} connected: {}", device, connected);
        });
    }

    // Two players plug in their joypads
    registry
        .host_mut()
        .connect_joypad(0, JoypadInfo::new("Xbox Controller", "030000005e0400008e02000000007801"));
    registry
        .host_mut()
        .connect_joypad(1, JoypadInfo::new("DualSense", "030000004c050000e60c000000016800"));
    pump(&mut registry, &mut players);

    for player in &players {
        info!(
            "Device {} ({}): jump -> {}",
            player.device(),
            player.name(&registry),
            registry.get_action_name(player.device(), "jump")?
        );
    }

    // Frame 1: keyboard jumps, joypad 1 pushes the stick right
    registry.host_mut().press_key(KeyCode::KeyW);
    registry.host_mut().set_joy_axis(1, 0, 0.8);
    report(&registry, &players)?;
    registry.host_mut().update();

    // Joypad 1 takes over the menus
    players[2].take_ui_actions(&mut registry);
    info!(
        "ui_accept now bound to {:?}",
        registry.host().action_map().action_events("ui_accept")?
    );

    // Joypad 0 gets unplugged mid-game
    registry.host_mut().disconnect_joypad(0);
    pump(&mut registry, &mut players);
    report(&registry, &players)?;

    if let Err(e) = registry.get_action_name(0, "jump") {
        warn!("Expected failure after unplug: {}", e);
    }

    registry.set_ui_action_device(NO_DEVICE);
    info!("Demo finished");

    Ok(())
}

/// Deliver pending connection changes to the registry, then to the handles
fn pump(registry: &mut DeviceActionRegistry<LocalInput>, players: &mut [DeviceInput]) {
    for change in registry.process_connection_events() {
        for player in players.iter_mut() {
            player.handle_connection_change(change);
        }
    }
}

/// Log what every player sees this frame
fn report(registry: &DeviceActionRegistry<LocalInput>, players: &[DeviceInput]) -> Result<()> {
    for player in players {
        info!(
            "Device {}: jump={} move={:.2} stick={:?}",
            player.device(),
            player.is_action_pressed(registry, "jump")?,
            player.axis(registry, "move_left", "move_right")?,
            player.vector(registry, "move_left", "move_right", "ui_up", "ui_down", -1.0)?
        );
    }
    Ok(())
}
