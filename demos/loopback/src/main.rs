//! Runs a headless client against an in-process room for a fixed number of frames.
//!
//! The room applies the client's commands with the same movement function as the client, and
//! can be told to drift the player to exercise reconciliation.
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use core::time::Duration;
use roomsync::prelude::*;
use std::path::PathBuf;

use crate::room::LoopbackRoom;

mod room;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Number of frames to run
    #[arg(short, long, default_value_t = 100)]
    frames: u32,
    /// Duration of one frame, in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Settings file, in RON
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// Number of NPCs wandering in the room
    #[arg(long, default_value_t = 3)]
    npcs: usize,
    /// The room pushes the player along z by this distance every 20 ticks
    #[arg(long, default_value_t = 0.0)]
    drift: f32,
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn main() {
    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => match ClientSettings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("could not load {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => ClientSettings::default(),
    };
    let config = settings.client_config();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(LogPlugin {
        level: cli.log_level,
        filter: "wgpu=error,bevy_render=info,bevy_ecs=warn".to_string(),
        ..default()
    });
    app.add_plugins(ClientPlugins {
        config: config.clone(),
    });
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        cli.frame_ms,
    )));
    app.finish();
    app.cleanup();

    let (client_io, room_io) = CrossbeamIo::new_pair();
    let mut room = LoopbackRoom::new(room_io, config.movement, cli.npcs, cli.drift);
    let listings = [room.listing(&settings.location)];
    let session = match join_room(&config, &listings, &settings.location, settings.join_options()) {
        Ok(session) => session,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    app.world_mut().spawn((session, client_io));

    let frame = Duration::from_millis(cli.frame_ms);
    let ticks_per_frame = frame.as_secs_f32() / config.tick_duration.as_secs_f32();
    let mut elapsed_ticks = 0.0;
    for i in 0..cli.frames {
        steer(&mut app, i);
        app.update();
        elapsed_ticks += ticks_per_frame;
        while elapsed_ticks >= 1.0 {
            elapsed_ticks -= 1.0;
            room.tick();
        }
        room.receive();
    }
    report(&mut app);
}

/// Walk in a square, changing direction every 60 frames
fn steer(app: &mut App, frame: u32) {
    let (horizontal, vertical) = match (frame / 60) % 4 {
        0 => (0.0, 1.0),
        1 => (1.0, 0.0),
        2 => (0.0, -1.0),
        _ => (-1.0, 0.0),
    };
    app.world_mut()
        .resource_mut::<InputDevice>()
        .set_axes(horizontal, vertical);
}

fn report(app: &mut App) {
    let world = app.world_mut();
    let mut sessions = world.query::<(&RoomSession, &PredictionLoop)>();
    for (session, prediction) in sessions.iter(world) {
        info!(
            room_id = %session.room_id(),
            state = ?session.state(),
            sent = prediction.stats.commands_sent,
            pending = prediction.pending.len(),
            corrections = prediction.stats.corrections,
            snaps = prediction.stats.snaps,
            last_error = prediction.stats.last_error,
            "prediction"
        );
    }
    let stats = world.resource::<DebugStats>();
    info!(
        fps = stats.fps,
        entities = stats.total_entities,
        visible = stats.visible_entities,
        rtt = ?stats.rtt,
        position = ?stats.controlled_xz,
        "render"
    );
}
