//! Mirroring of the room entities
use crate::stepper::RoomStepper;
use bevy::prelude::*;
use roomsync::prelude::*;
use test_log::test;

#[test]
fn test_local_player_is_controlled() {
    let mut stepper = RoomStepper::connected();
    stepper.room.add(EntityKind::Player, "other", EntitySnapshot::default());
    stepper.room.add(EntityKind::Item, "sword", EntitySnapshot::default());
    stepper.frame_step(1);

    assert_eq!(stepper.registry().len(), 3);
    let me = stepper.controlled().unwrap();
    assert_eq!(stepper.entity("me"), Some(me));
    assert!(stepper.get::<Controlled>(me).is_some());
    assert!(stepper.get::<Interpolated>(me).is_none());
    for id in ["other", "sword"] {
        let entity = stepper.entity(id).unwrap();
        assert!(stepper.get::<Controlled>(entity).is_none());
        assert!(stepper.get::<Interpolated>(entity).is_some());
    }
}

#[test]
fn test_duplicate_add_keeps_first_entity() {
    let mut stepper = RoomStepper::connected();
    stepper.room.add(EntityKind::Npc, "orc", EntitySnapshot::default());
    stepper.frame_step(1);
    let orc = stepper.entity("orc").unwrap();

    stepper.room.add(
        EntityKind::Npc,
        "orc",
        EntitySnapshot::at(Vec3::new(7.0, 0.0, 0.0), 0.0),
    );
    // a second add of the local player must not create a second controlled entity
    stepper.room.add(EntityKind::Player, "me", EntitySnapshot::default());
    stepper.frame_step(1);

    assert_eq!(stepper.registry().len(), 2);
    assert_eq!(stepper.entity("orc"), Some(orc));
    assert_eq!(stepper.get::<Position>(orc).unwrap().0, Vec3::ZERO);
    let mut controlled = stepper
        .app
        .world_mut()
        .query_filtered::<Entity, With<Controlled>>();
    assert_eq!(controlled.iter(stepper.app.world()).count(), 1);
}

#[test]
fn test_update_and_remove_npc() {
    let mut stepper = RoomStepper::connected();
    stepper.room.add(EntityKind::Npc, "orc", EntitySnapshot::default());
    stepper.frame_step(1);
    let orc = stepper.entity("orc").unwrap();

    stepper.room.update(
        EntityKind::Npc,
        "orc",
        EntitySnapshot::at(Vec3::new(2.0, 0.0, 2.0), 1.0).with_anim_state(AnimState::Attacking),
    );
    stepper.frame_step(1);
    assert_eq!(stepper.get::<Position>(orc).unwrap().0, Vec3::new(2.0, 0.0, 2.0));
    assert_eq!(stepper.get::<AnimState>(orc), Some(&AnimState::Attacking));

    stepper.room.remove(EntityKind::Npc, "orc");
    stepper.frame_step(1);
    assert!(stepper.entity("orc").is_none());
    assert!(stepper.world().get_entity(orc).is_err());
}

#[test]
fn test_unknown_remove_is_a_no_op() {
    let mut stepper = RoomStepper::connected();
    stepper.room.remove(EntityKind::Item, "ghost");
    stepper.room.update(EntityKind::Item, "ghost", EntitySnapshot::default());
    stepper.room.add(EntityKind::Item, "sword", EntitySnapshot::default());
    stepper.frame_step(1);
    // the bad events did not prevent the next one from being applied
    assert!(stepper.entity("sword").is_some());
    assert_eq!(stepper.registry().len(), 2);
    assert!(stepper.session().is_connected());
}

#[test]
fn test_removing_controlled_entity_stops_prediction() {
    let mut stepper = RoomStepper::connected();
    stepper.room.remove(EntityKind::Player, "me");
    stepper.frame_step(1);
    assert!(stepper.controlled().is_none());

    stepper.device_mut().set_axes(1.0, 0.0);
    stepper.frame_step(2);
    assert!(stepper.room.inputs().is_empty());
}
