//! Session lifecycle against a scripted room
use crate::room::ScriptedRoom;
use crate::stepper::RoomStepper;
use bevy::prelude::*;
use roomsync::prelude::*;
use test_log::test;

#[derive(Resource, Default)]
struct Notifications(Vec<String>);

fn notify_disconnect(
    trigger: On<Add, Disconnected>,
    query: Query<&Disconnected>,
    mut notifications: ResMut<Notifications>,
) {
    if let Ok(disconnected) = query.get(trigger.entity) {
        notifications.0.push(disconnected.reason.clone());
    }
}

#[test]
fn test_join_handshake() {
    let stepper = RoomStepper::connected();
    let session = stepper.session();
    assert_eq!(session.room_id(), "room-1");
    assert_eq!(session.session_id(), Some(&SessionId::from("me")));

    let join = stepper.room.received.iter().find_map(|message| match message {
        ClientMessage::Join(options) => Some(options.clone()),
        _ => None,
    });
    assert_eq!(join.map(|options| options.character_id), Some(1));
}

#[test]
fn test_rejected_join_spawns_nothing() {
    let mut stepper = RoomStepper::new(ClientConfig::default());
    // the first answer was already sent; reject the join on a fresh room instead
    let (client_io, room_io) = CrossbeamIo::new_pair();
    let mut room = ScriptedRoom::new(room_io);
    room.reject_with = Some("room is full".to_string());
    stepper.room = room;
    let (session, ping) = join_room(
        &ClientConfig::default(),
        &[RoomListing::new("room-2", "lh_town")],
        "lh_town",
        JoinOptions::default(),
    )
    .unwrap();
    stepper.app.world_mut().despawn(stepper.session);
    stepper.session = stepper.app.world_mut().spawn((session, ping, client_io)).id();
    stepper.frame_step(2);

    assert!(matches!(
        stepper.session().state(),
        SessionState::Rejected { reason } if reason == "room is full"
    ));
    assert!(stepper.registry().is_empty());
    assert!(stepper.room.inputs().is_empty());
    assert!(stepper.get::<Connected>(stepper.session).is_none());
    assert_eq!(
        stepper
            .get::<Disconnected>(stepper.session)
            .map(|d| d.reason.as_str()),
        Some("join rejected: room is full")
    );
}

#[test]
fn test_ping_measures_round_trip() {
    let mut stepper = RoomStepper::connected();
    // the pong sent while connecting is received on the next frame
    stepper.frame_step(1);
    let rtt = stepper
        .world()
        .get::<PingTracker>(stepper.session)
        .and_then(PingTracker::rtt);
    assert!(rtt.is_some());
    let pings = stepper
        .room
        .received
        .iter()
        .filter(|message| matches!(message, ClientMessage::Ping { .. }))
        .count();
    assert_eq!(pings, 1);
}

#[test]
fn test_close_session_tears_everything_down() {
    let mut stepper = RoomStepper::connected();
    stepper.room.add(EntityKind::Npc, "orc", EntitySnapshot::default());
    stepper.frame_step(1);
    let me = stepper.controlled().unwrap();
    let orc = stepper.entity("orc").unwrap();

    stepper
        .app
        .world_mut()
        .get_mut::<RoomSession>(stepper.session)
        .unwrap()
        .close();
    stepper.frame_step(1);

    assert!(stepper.room.client_left());
    assert!(stepper.registry().is_empty());
    let world = stepper.world();
    assert!(world.get_entity(me).is_err());
    assert!(world.get_entity(orc).is_err());
    assert!(world.get_entity(stepper.session).is_err());
}

#[test]
fn test_lost_channel_disconnects_session() {
    let mut stepper = RoomStepper::connected();
    stepper.device_mut().set_axes(1.0, 0.0);
    stepper.frame_step(3);
    assert_eq!(stepper.prediction().pending.len(), 3);

    stepper.room.disconnect();
    stepper.frame_step(1);

    assert!(matches!(
        stepper.session().state(),
        SessionState::Disconnected { .. }
    ));
    assert!(stepper.prediction().pending.is_empty());
    assert!(stepper.registry().is_empty());

    // nothing is predicted or sent afterwards
    let sent = stepper.prediction().stats.commands_sent;
    stepper.frame_step(2);
    assert_eq!(stepper.prediction().stats.commands_sent, sent);
}

#[test]
fn test_host_observes_disconnect() {
    let mut stepper = RoomStepper::connected();
    stepper.app.init_resource::<Notifications>();
    stepper.app.add_observer(notify_disconnect);
    assert!(stepper.get::<Connected>(stepper.session).is_some());

    stepper.room.disconnect();
    stepper.frame_step(1);

    assert!(stepper.get::<Connected>(stepper.session).is_none());
    assert_eq!(
        stepper.world().resource::<Notifications>().0,
        vec!["io channel is disconnected".to_string()]
    );

    // the marker is only added once
    stepper.frame_step(2);
    assert_eq!(stepper.world().resource::<Notifications>().0.len(), 1);
}
