use crate::room::ScriptedRoom;
use bevy::MinimalPlugins;
use bevy::platform::time::Instant;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use core::time::Duration;
use roomsync::prelude::*;

/// One client `App` connected to a [`ScriptedRoom`].
///
/// Time only advances through [`RoomStepper::frame_step`] and [`RoomStepper::advance_frame`].
/// With the default configuration a frame lasts exactly one network tick.
pub struct RoomStepper {
    pub app: App,
    pub room: ScriptedRoom,
    pub session: Entity,
    pub frame_duration: Duration,
    pub current_time: Instant,
}

impl RoomStepper {
    /// Client and room, before the join request was answered
    pub fn new(config: ClientConfig) -> Self {
        let frame_duration = config.tick_duration;
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(ClientPlugins {
            config: config.clone(),
        });
        app.finish();
        app.cleanup();

        let (client_io, room_io) = CrossbeamIo::new_pair();
        let listings = [RoomListing::new("room-1", "lh_town")];
        let options = JoinOptions {
            token: "token".to_string(),
            character_id: 1,
        };
        let session = match join_room(&config, &listings, "lh_town", options) {
            Ok(session) => session,
            Err(e) => panic!("could not join test room: {e}"),
        };
        let session = app.world_mut().spawn((session, client_io)).id();

        let current_time = Instant::now();
        app.insert_resource(TimeUpdateStrategy::ManualInstant(current_time));
        let mut stepper = Self {
            app,
            room: ScriptedRoom::new(room_io),
            session,
            frame_duration,
            current_time,
        };
        // the first update has a zero delta and sends the join request
        stepper.app.update();
        stepper.room.pump();
        stepper
    }

    /// Client joined, with its controlled entity spawned and no command sent yet
    pub fn connected() -> Self {
        Self::connected_with(ClientConfig::default())
    }

    pub fn connected_with(config: ClientConfig) -> Self {
        let mut stepper = Self::new(config);
        stepper.device_mut().capture();
        stepper.frame_step(1);
        stepper.device_mut().release();
        assert!(stepper.session().is_connected());
        assert!(stepper.controlled().is_some());
        stepper
    }

    pub fn advance_time(&mut self, duration: Duration) {
        self.current_time += duration;
        self.app
            .insert_resource(TimeUpdateStrategy::ManualInstant(self.current_time));
    }

    /// Run one client frame of `duration`, then let the room answer
    pub fn advance_frame(&mut self, duration: Duration) {
        self.advance_time(duration);
        self.app.update();
        self.room.pump();
    }

    /// Advance the client by `n` frames of `frame_duration`
    pub fn frame_step(&mut self, n: usize) {
        for _ in 0..n {
            self.advance_frame(self.frame_duration);
        }
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn device_mut(&mut self) -> Mut<'_, InputDevice> {
        self.app.world_mut().resource_mut::<InputDevice>()
    }

    pub fn session(&self) -> &RoomSession {
        self.world()
            .get::<RoomSession>(self.session)
            .expect("session entity was despawned")
    }

    pub fn prediction(&self) -> &PredictionLoop {
        self.world()
            .get::<PredictionLoop>(self.session)
            .expect("session has no PredictionLoop")
    }

    pub fn registry(&self) -> &EntityRegistry {
        self.world().resource::<EntityRegistry>()
    }

    pub fn entity(&self, id: &str) -> Option<Entity> {
        self.registry()
            .get(&SessionId::from(id))
            .map(|entry| entry.entity)
    }

    pub fn controlled(&self) -> Option<Entity> {
        self.registry().local().map(|(_, entry)| entry.entity)
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.world().get::<C>(entity)
    }
}
