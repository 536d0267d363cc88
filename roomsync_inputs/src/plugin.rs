use crate::device::{InputDevice, read_keyboard};
use bevy_app::{App, Plugin, PreUpdate};
use bevy_ecs::prelude::*;
use bevy_input::ButtonInput;
use bevy_input::keyboard::KeyCode;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum InputSet {
    // PRE UPDATE
    /// Write the [`InputDevice`] from the platform input (or from the application)
    ReadDevice,
}

#[derive(Default)]
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputDevice>();
        app.add_systems(
            PreUpdate,
            read_keyboard
                .in_set(InputSet::ReadDevice)
                .run_if(resource_exists::<ButtonInput<KeyCode>>),
        );
    }
}
