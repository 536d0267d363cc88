//! Frame pipeline: delta clamping, animation, level of detail and presentation
use crate::stepper::RoomStepper;
use approx::assert_relative_eq;
use bevy::prelude::*;
use core::time::Duration;
use roomsync::prelude::*;
use test_log::test;

#[test]
fn test_stalled_frame_is_clamped() {
    let mut stepper = RoomStepper::connected();
    stepper.advance_frame(Duration::from_secs(5));
    let frame = stepper.world().resource::<FrameDelta>();
    assert_eq!(frame.raw, Duration::from_secs(5));
    assert_eq!(frame.clamped, Duration::from_millis(250));
    assert!(frame.was_clamped());

    stepper.frame_step(1);
    let frame = stepper.world().resource::<FrameDelta>();
    assert_eq!(frame.clamped, Duration::from_millis(100));
    assert!(!frame.was_clamped());
}

#[test]
fn test_stalled_frame_runs_bounded_ticks() {
    let mut stepper = RoomStepper::connected();
    stepper.device_mut().set_axes(1.0, 0.0);
    stepper.advance_frame(Duration::from_secs(5));
    // 250ms of virtual time: two ticks, not fifty
    assert_eq!(stepper.room.inputs().len(), 2);
}

#[test]
fn test_transform_follows_visual_state() {
    let mut stepper = RoomStepper::connected();
    stepper.room.add(
        EntityKind::Npc,
        "orc",
        EntitySnapshot::at(Vec3::new(1.0, 0.0, -2.0), core::f32::consts::FRAC_PI_2),
    );
    stepper.frame_step(1);
    let orc = stepper.entity("orc").unwrap();
    let transform = stepper.get::<Transform>(orc).unwrap();
    assert_eq!(transform.translation, Vec3::new(1.0, 0.0, -2.0));
    let (axis, angle) = transform.rotation.to_axis_angle();
    assert_relative_eq!(axis.y, 1.0, epsilon = 1e-4);
    assert_relative_eq!(angle, core::f32::consts::FRAC_PI_2, epsilon = 1e-4);

    let me = stepper.controlled().unwrap();
    stepper.device_mut().set_axes(1.0, 0.0);
    stepper.frame_step(2);
    let visual = *stepper.get::<VisualState>(me).unwrap();
    assert_eq!(stepper.get::<Transform>(me).unwrap().translation, visual.position);
    assert!(visual.position.x < 0.0);
}

#[test]
fn test_moving_entity_walks() {
    let mut stepper = RoomStepper::connected();
    let me = stepper.controlled().unwrap();
    assert_eq!(stepper.get::<Animator>(me).unwrap().clip, AnimationClip::Idle);

    stepper.device_mut().set_axes(0.0, 1.0);
    stepper.frame_step(3);
    assert_eq!(stepper.get::<Animator>(me).unwrap().clip, AnimationClip::Walk);

    stepper.device_mut().set_axes(0.0, 0.0);
    stepper.frame_step(3);
    assert_eq!(stepper.get::<Animator>(me).unwrap().clip, AnimationClip::Idle);
}

#[test]
fn test_debug_stats() {
    let mut stepper = RoomStepper::connected();
    stepper.room.add(
        EntityKind::Npc,
        "near",
        EntitySnapshot::at(Vec3::new(3.0, 0.0, 0.0), 0.0),
    );
    stepper.room.add(
        EntityKind::Npc,
        "far",
        EntitySnapshot::at(Vec3::new(300.0, 0.0, 0.0), 0.0),
    );
    stepper.frame_step(2);

    let stats = stepper.world().resource::<DebugStats>();
    assert_eq!(stats.total_entities, 3);
    assert_eq!(stats.visible_entities, 2);
    assert_eq!(stats.controlled_xz, Some((0.0, 0.0)));
    assert!(stats.rtt.is_some());
    assert_relative_eq!(stats.fps, 10.0, epsilon = 1e-3);
}
