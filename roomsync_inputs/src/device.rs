use bevy_ecs::prelude::*;
use bevy_input::ButtonInput;
use bevy_input::keyboard::KeyCode;

/// Latest state of the movement input.
///
/// Written at any time by the keyboard system or by the host application, read once per tick.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct InputDevice {
    pub horizontal: f32,
    pub vertical: f32,
    /// False while a modal UI (chat, inventory) owns the input
    pub movement_permitted: bool,
}

impl Default for InputDevice {
    fn default() -> Self {
        Self {
            horizontal: 0.0,
            vertical: 0.0,
            movement_permitted: true,
        }
    }
}

impl InputDevice {
    pub fn set_axes(&mut self, horizontal: f32, vertical: f32) {
        self.horizontal = horizontal;
        self.vertical = vertical;
    }

    /// Take the input away from movement
    pub fn capture(&mut self) {
        self.movement_permitted = false;
    }

    pub fn release(&mut self) {
        self.movement_permitted = true;
    }
}

fn axis(keys: &ButtonInput<KeyCode>, negative: [KeyCode; 2], positive: [KeyCode; 2]) -> f32 {
    let mut value = 0.0;
    if keys.any_pressed(negative) {
        value -= 1.0;
    }
    if keys.any_pressed(positive) {
        value += 1.0;
    }
    value
}

/// Update the [`InputDevice`] axes from the arrow keys and WASD
pub(crate) fn read_keyboard(keys: Res<ButtonInput<KeyCode>>, mut device: ResMut<InputDevice>) {
    let horizontal = axis(
        &keys,
        [KeyCode::ArrowLeft, KeyCode::KeyA],
        [KeyCode::ArrowRight, KeyCode::KeyD],
    );
    let vertical = axis(
        &keys,
        [KeyCode::ArrowDown, KeyCode::KeyS],
        [KeyCode::ArrowUp, KeyCode::KeyW],
    );
    let movement_permitted = device.movement_permitted;
    device.set_if_neq(InputDevice {
        horizontal,
        vertical,
        movement_permitted,
    });
}
