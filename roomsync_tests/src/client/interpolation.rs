//! Smoothing of entities the client does not control
use crate::stepper::RoomStepper;
use approx::assert_relative_eq;
use bevy::prelude::*;
use core::time::Duration;
use roomsync::prelude::*;
use test_log::test;

fn visual_x(stepper: &RoomStepper, entity: Entity) -> f32 {
    stepper.get::<VisualState>(entity).unwrap().position.x
}

#[test]
fn test_remote_entity_moves_along_segment() {
    let mut stepper = RoomStepper::connected();
    stepper.room.add(EntityKind::Npc, "orc", EntitySnapshot::default());
    stepper.frame_step(1);
    let orc = stepper.entity("orc").unwrap();
    assert!(stepper.get::<Interpolated>(orc).is_some());
    assert_eq!(visual_x(&stepper, orc), 0.0);

    stepper.room.update(
        EntityKind::Npc,
        "orc",
        EntitySnapshot::at(Vec3::new(10.0, 0.0, 0.0), 0.0),
    );
    // half of a segment
    stepper.advance_frame(Duration::from_millis(50));
    assert_relative_eq!(visual_x(&stepper, orc), 5.0, epsilon = 1e-4);
    // the simulation position is the authoritative one right away
    assert_eq!(stepper.get::<Position>(orc).unwrap().0.x, 10.0);

    stepper.advance_frame(Duration::from_millis(50));
    assert_relative_eq!(visual_x(&stepper, orc), 10.0, epsilon = 1e-4);

    // never extrapolates past the last value
    stepper.frame_step(3);
    assert_relative_eq!(visual_x(&stepper, orc), 10.0, epsilon = 1e-4);
}

#[test]
fn test_new_update_restarts_from_displayed_state() {
    let mut stepper = RoomStepper::connected();
    stepper.room.add(EntityKind::Player, "other", EntitySnapshot::default());
    stepper.frame_step(1);
    let other = stepper.entity("other").unwrap();

    stepper.room.update(
        EntityKind::Player,
        "other",
        EntitySnapshot::at(Vec3::new(4.0, 0.0, 0.0), 0.0),
    );
    stepper.advance_frame(Duration::from_millis(50));
    let halfway = visual_x(&stepper, other);
    assert_relative_eq!(halfway, 2.0, epsilon = 1e-4);

    // the room changed its mind before the segment ended
    stepper.room.update(
        EntityKind::Player,
        "other",
        EntitySnapshot::at(Vec3::new(-4.0, 0.0, 0.0), 0.0),
    );
    stepper.advance_frame(Duration::from_millis(50));
    // halfway between 2 and -4
    assert_relative_eq!(visual_x(&stepper, other), -1.0, epsilon = 1e-4);
}

#[test]
fn test_stalled_frame_completes_segment_without_overshoot() {
    let mut stepper = RoomStepper::connected();
    stepper.room.add(EntityKind::Npc, "orc", EntitySnapshot::default());
    stepper.frame_step(1);
    let orc = stepper.entity("orc").unwrap();

    stepper.room.update(
        EntityKind::Npc,
        "orc",
        EntitySnapshot::at(Vec3::new(0.0, 0.0, 3.0), 0.0),
    );
    stepper.advance_frame(Duration::from_secs(5));
    let visual = stepper.get::<VisualState>(orc).unwrap();
    assert_relative_eq!(visual.position.z, 3.0, epsilon = 1e-4);
}
