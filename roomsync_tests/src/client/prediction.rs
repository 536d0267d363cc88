//! Prediction and reconciliation of the controlled entity
use crate::stepper::RoomStepper;
use approx::assert_relative_eq;
use bevy::prelude::*;
use roomsync::prelude::*;
use test_log::test;

fn controlled_position(stepper: &RoomStepper) -> Vec3 {
    let entity = stepper.controlled().unwrap();
    stepper.get::<Position>(entity).unwrap().0
}

fn controlled_visual(stepper: &RoomStepper) -> Vec3 {
    let entity = stepper.controlled().unwrap();
    stepper.get::<VisualState>(entity).unwrap().position
}

#[test]
fn test_one_command_per_tick() {
    let mut stepper = RoomStepper::connected();
    stepper.device_mut().set_axes(1.0, 0.0);
    stepper.frame_step(3);

    let sequences: Vec<_> = stepper.room.inputs().iter().map(|i| i.sequence).collect();
    assert_eq!(sequences, vec![Sequence(1), Sequence(2), Sequence(3)]);
    assert!(stepper.room.inputs().iter().all(|i| i.horizontal == 1.0 && i.vertical == 0.0));

    // the controlled entity moved by three steps, without waiting for the room
    let speed = MovementConfig::default().speed;
    assert_relative_eq!(controlled_position(&stepper).x, -3.0 * speed, epsilon = 1e-5);
    assert_eq!(stepper.prediction().pending.len(), 3);
}

#[test]
fn test_commands_accumulate_without_acknowledgment() {
    let mut stepper = RoomStepper::connected();
    stepper.device_mut().set_axes(0.0, 1.0);
    stepper.frame_step(5);
    let prediction = stepper.prediction();
    assert_eq!(prediction.pending.len(), 5);
    assert_eq!(prediction.pending.last_sequence(), Some(Sequence(5)));
}

#[test]
fn test_pending_buffer_is_bounded() {
    let mut config = ClientConfig::default();
    config.prediction.buffer_capacity = 4;
    let mut stepper = RoomStepper::connected_with(config);
    stepper.device_mut().set_axes(1.0, 0.0);
    stepper.frame_step(6);
    let prediction = stepper.prediction();
    assert_eq!(prediction.pending.len(), 4);
    assert_eq!(prediction.stats.commands_dropped, 2);
    assert_eq!(prediction.pending.iter().next().unwrap().sequence, Sequence(3));
}

#[test]
fn test_blocked_movement_sends_nothing() {
    let mut stepper = RoomStepper::connected();
    stepper.device_mut().set_axes(1.0, 0.0);
    stepper.device_mut().capture();
    stepper.frame_step(3);

    assert!(stepper.room.inputs().is_empty());
    assert!(stepper.prediction().pending.is_empty());
    assert_eq!(stepper.prediction().sampler.last_sequence(), Sequence::ZERO);
    assert_eq!(controlled_position(&stepper), Vec3::ZERO);

    // the counter resumes where it was
    stepper.device_mut().release();
    stepper.frame_step(1);
    assert_eq!(stepper.room.last_input_sequence(), Sequence(1));
}

#[test]
fn test_dead_entity_does_not_move() {
    let mut stepper = RoomStepper::connected();
    stepper.room.update(
        EntityKind::Player,
        "me",
        EntitySnapshot::default().with_anim_state(AnimState::Dead),
    );
    stepper.device_mut().set_axes(1.0, 0.0);
    stepper.frame_step(3);
    assert!(stepper.room.inputs().is_empty());
    assert_eq!(controlled_position(&stepper), Vec3::ZERO);
}

#[test]
fn test_acknowledgment_trims_pending_commands() {
    let mut stepper = RoomStepper::connected();
    stepper.device_mut().set_axes(1.0, 0.0);
    stepper.frame_step(3);

    // the room applied the first two commands, exactly as the client did
    let speed = MovementConfig::default().speed;
    let snapshot = EntitySnapshot::at(Vec3::new(-2.0 * speed, 0.0, 0.0), 0.0)
        .with_sequence(Sequence(2));
    stepper.device_mut().set_axes(0.0, 0.0);
    stepper.room.update(EntityKind::Player, "me", snapshot);
    stepper.frame_step(1);

    let prediction = stepper.prediction();
    // command 3 is still pending, and the command sent this frame
    assert_eq!(prediction.pending.len(), 2);
    assert_eq!(prediction.stats.corrections, 0);
    assert_eq!(prediction.stats.snaps, 0);
    assert_relative_eq!(controlled_position(&stepper).x, -3.0 * speed, epsilon = 1e-5);
}

#[test]
fn test_divergence_is_blended_over_frames() {
    let mut stepper = RoomStepper::connected();
    stepper.frame_step(2);
    let last = stepper.room.last_input_sequence();
    assert_eq!(last, Sequence(2));

    // the room disagrees by two units
    let target = Vec3::new(0.0, 0.0, 2.0);
    stepper
        .room
        .update(EntityKind::Player, "me", EntitySnapshot::at(target, 0.0).with_sequence(last));
    stepper.frame_step(1);

    assert_eq!(controlled_position(&stepper), target);
    assert_eq!(stepper.prediction().stats.corrections, 1);
    // displayed position is strictly between the old prediction and the correction
    let visual = controlled_visual(&stepper);
    assert!(visual.z > 0.0 && visual.z < target.z, "visual = {visual:?}");
    // ease-out: more than half of the error was absorbed after a third of the duration
    assert!(visual.z > 1.0);

    stepper.frame_step(2);
    let visual = controlled_visual(&stepper);
    assert_relative_eq!(visual.z, target.z, epsilon = 1e-4);
}

#[test]
fn test_duplicate_snapshot_adds_no_movement() {
    let mut stepper = RoomStepper::connected();
    stepper.frame_step(1);
    let snapshot = EntitySnapshot::at(Vec3::new(1.0, 0.0, 0.0), 0.0)
        .with_sequence(stepper.room.last_input_sequence());
    stepper.room.update(EntityKind::Player, "me", snapshot);
    stepper.frame_step(4);
    let position = controlled_position(&stepper);
    let visual = controlled_visual(&stepper);
    let corrections = stepper.prediction().stats.corrections;
    assert_eq!(corrections, 1);

    stepper.room.update(EntityKind::Player, "me", snapshot);
    stepper.frame_step(1);
    assert_eq!(controlled_position(&stepper), position);
    assert_eq!(controlled_visual(&stepper), visual);
    assert_eq!(stepper.prediction().stats.corrections, corrections);
}

#[test]
fn test_large_divergence_snaps() {
    let mut stepper = RoomStepper::connected();
    stepper.frame_step(1);
    let target = Vec3::new(100.0, 0.0, 0.0);
    stepper.room.update(
        EntityKind::Player,
        "me",
        EntitySnapshot::at(target, 0.0).with_sequence(stepper.room.last_input_sequence()),
    );
    stepper.frame_step(1);
    assert_eq!(stepper.prediction().stats.snaps, 1);
    assert_eq!(controlled_position(&stepper), target);
    assert_eq!(controlled_visual(&stepper), target);
}
