use anyhow::Result;
use log::info;
use rusted_input::engine::input::{
    AxisControl, Binding, ButtonControl, GamepadAxis, GamepadButton, GamepadDevice, GamepadEvent,
    GamepadListener, InputSystem, Modifier, ModifierSet, ScriptedBackend,
};
use winit::keyboard::KeyCode;

const FRAME_TIME: f32 = 1.0 / 60.0;

/// Logs every gamepad event
struct EventLogger;

impl GamepadListener for EventLogger {
    fn on_gamepad_event(&mut self, gamepad: &GamepadDevice, event: GamepadEvent) {
        info!("Gamepad {} ({}): {:?}", gamepad.index(), gamepad.name(), event);
    }
}

/// One scripted frame: mutate the backend, then advance the input system
fn frame(
    input: &mut InputSystem,
    backend: &mut ScriptedBackend,
    script: impl FnOnce(&mut ScriptedBackend),
) {
    script(backend);
    input.update(backend, FRAME_TIME);
}

fn report(input: &InputSystem) {
    for player_id in 0..input.num_players() {
        let Some(player) = input.player(player_id) else {
            continue;
        };
        for action in player.actions() {
            if action.just_pressed() {
                info!("Player {} pressed {}", player_id, action.name());
            }
            if action.just_released() {
                info!("Player {} released {}", player_id, action.name());
            }
            if action.axis() != 0.0 {
                info!("Player {} {} axis {:.2}", player_id, action.name(), action.axis());
            }
        }
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Input demo...");

    let mut input = InputSystem::new(2);
    input.gamepads_mut().add_listener(Box::new(EventLogger));

    for player_id in 0..input.num_players() {
        let jump = input
            .create_action("jump")
            .with_binding(Binding::button(ButtonControl::key(KeyCode::Space)))
            .with_binding(Binding::button(ButtonControl::gamepad(GamepadButton::South)));
        let dash = input.create_action("dash").with_binding(
            Binding::button(ButtonControl::key(KeyCode::KeyD))
                .with_modifiers(ModifierSet::all(vec![Modifier::key(KeyCode::ShiftLeft)])),
        );
        let steer = input
            .create_action("steer")
            .with_binding(Binding::axis(AxisControl::Gamepad(GamepadAxis::LeftStickX)))
            .with_binding(Binding::button_pair(
                ButtonControl::key(KeyCode::ArrowLeft),
                ButtonControl::key(KeyCode::ArrowRight),
            ));

        if let Some(player) = input.player_mut(player_id) {
            player.add_action(jump);
            player.add_action(dash);
            player.add_action(steer);
            info!(
                "Player {} jump bindings: {}",
                player_id,
                player.action("jump").map(|a| a.describe(true)).unwrap_or_default()
            );
        }
    }

    let mut backend = ScriptedBackend::new();

    // Player 1 waits for a gamepad; player 0 sticks to the keyboard
    input.request_gamepad(1);

    backend.connect_gamepad(0, "Demo Pad");
    input.try_update(&mut backend, FRAME_TIME)?;
    info!("Player 1 gamepad: {:?}", input.player(1).and_then(|p| p.gamepad()));

    frame(&mut input, &mut backend, |b| b.press_key(KeyCode::Space));
    report(&input);

    frame(&mut input, &mut backend, |b| {
        b.release_key(KeyCode::Space);
        b.press_key(KeyCode::KeyD);
    });
    report(&input);

    frame(&mut input, &mut backend, |b| b.press_key(KeyCode::ShiftLeft));
    report(&input);

    for _ in 0..10 {
        frame(&mut input, &mut backend, |b| {
            b.release_key(KeyCode::KeyD);
            b.release_key(KeyCode::ShiftLeft);
            b.set_gamepad_axis(0, GamepadAxis::LeftStickX, 0.8);
        });
    }
    report(&input);
    info!("Current device: {:?}", input.current_device_type());

    frame(&mut input, &mut backend, |b| {
        b.set_gamepad_axis(0, GamepadAxis::LeftStickX, 0.0);
        b.press_gamepad_button(0, GamepadButton::South);
    });
    report(&input);

    frame(&mut input, &mut backend, |b| b.fail_next_poll("demo glitch"));
    report(&input);

    frame(&mut input, &mut backend, |b| b.disconnect_gamepad(0));
    info!("Player 1 gamepad: {:?}", input.player(1).and_then(|p| p.gamepad()));

    info!(
        "Demo finished after {} frames ({} backend polls)",
        input.frame_count(),
        backend.poll_count()
    );

    Ok(())
}
