use crate::buffer::PendingCommandBuffer;
use crate::correction::VisualCorrection;
use crate::frame_interpolation::FrameInterpolate;
use crate::reconcile::{CorrectionPolicy, Reconciliation, reconcile};
use bevy_app::{App, FixedPostUpdate, FixedUpdate, Plugin, PreUpdate, Update};
use bevy_ecs::prelude::*;
use bevy_time::{Fixed, Time};
use roomsync_core::prelude::{
    AnimState, FrameDelta, FrameSet, MovementConfig, Position, Rotation, VisualState,
};
use roomsync_core::movement::integrate;
use roomsync_inputs::prelude::{InputDevice, InputSampler};
use roomsync_replication::prelude::{AuthoritativeState, Controlled, ReplicationSet};
use roomsync_transport::prelude::{ClientMessage, PlayerInput, RoomSession, TransportSet};
use tracing::{debug, info, trace, warn};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum PredictionSet {
    // PRE UPDATE
    /// Clear the prediction state of sessions that were lost
    Clean,
    /// Compare the controlled entity with the latest authoritative state
    Reconcile,
    // FIXED UPDATE
    /// Sample the input, move the controlled entity and send the command
    Predict,
    // FIXED POST UPDATE
    /// Record the tick history used for frame interpolation
    RecordHistory,
    // UPDATE
    /// Compute the displayed state of the controlled entity
    Visual,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PredictionConfig {
    pub policy: CorrectionPolicy,
    /// Maximum number of unacknowledged commands kept for replay
    pub buffer_capacity: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            policy: CorrectionPolicy::default(),
            buffer_capacity: 64,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PredictionStats {
    pub commands_sent: u64,
    /// Commands dropped from a full buffer before being acknowledged
    pub commands_dropped: u64,
    pub corrections: u64,
    pub snaps: u64,
    /// Length of the last non-negligible prediction error
    pub last_error: f32,
}

/// Prediction state of one room session. Lives on the session entity and is dropped with it.
#[derive(Component, Debug)]
pub struct PredictionLoop {
    pub sampler: InputSampler,
    pub pending: PendingCommandBuffer,
    pub stats: PredictionStats,
}

impl PredictionLoop {
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            sampler: InputSampler::default(),
            pending: PendingCommandBuffer::with_capacity(buffer_capacity),
            stats: PredictionStats::default(),
        }
    }
}

#[derive(Default)]
pub struct PredictionPlugin {
    pub config: PredictionConfig,
}

impl PredictionPlugin {
    /// Give every new session its own prediction state
    pub(crate) fn add_prediction_loop(
        mut commands: Commands,
        config: Res<PredictionConfig>,
        sessions: Query<Entity, (With<RoomSession>, Without<PredictionLoop>)>,
    ) {
        for entity in sessions.iter() {
            trace!(?entity, "adding PredictionLoop to session");
            commands
                .entity(entity)
                .insert(PredictionLoop::new(config.buffer_capacity));
        }
    }

    pub(crate) fn clear_lost_sessions(mut sessions: Query<(&RoomSession, &mut PredictionLoop)>) {
        for (session, mut prediction) in sessions.iter_mut() {
            if session.is_terminated() && !prediction.pending.is_empty() {
                info!(
                    room_id = %session.room_id(),
                    pending = prediction.pending.len(),
                    "clearing pending commands of terminated session"
                );
                prediction.pending.clear();
            }
        }
    }

    /// Sample one command, apply it to the controlled entity, send it, and keep it for replay
    pub(crate) fn predict(
        device: Res<InputDevice>,
        movement: Res<MovementConfig>,
        mut sessions: Query<(&mut RoomSession, &mut PredictionLoop)>,
        mut controlled: Query<(&mut Position, &mut Rotation, &AnimState), With<Controlled>>,
    ) {
        let Ok((mut position, mut rotation, anim_state)) = controlled.single_mut() else {
            return;
        };
        for (mut session, mut prediction) in sessions.iter_mut() {
            if !session.is_connected() {
                continue;
            }
            let Some(command) = prediction
                .sampler
                .sample(&device, anim_state.blocks_movement())
            else {
                continue;
            };
            integrate(
                &mut position.0,
                &mut rotation.0,
                command.horizontal,
                command.vertical,
                &movement,
            );
            session.send(ClientMessage::PlayerInput(PlayerInput {
                sequence: command.sequence,
                horizontal: command.horizontal,
                vertical: command.vertical,
            }));
            prediction.stats.commands_sent += 1;
            match prediction.pending.push(command) {
                Ok(None) => {}
                Ok(Some(dropped)) => {
                    prediction.stats.commands_dropped += 1;
                    debug!(sequence = %dropped.sequence, "pending command buffer full, dropping oldest command");
                }
                Err(e) => warn!(error = %e, "could not buffer command"),
            }
        }
    }

    /// React to a new authoritative state of the controlled entity
    pub(crate) fn reconcile(
        config: Res<PredictionConfig>,
        movement: Res<MovementConfig>,
        mut sessions: Query<(&RoomSession, &mut PredictionLoop)>,
        mut controlled: Query<
            (
                Entity,
                Ref<AuthoritativeState>,
                &mut Position,
                &mut Rotation,
                &mut AnimState,
                &mut VisualCorrection,
                &mut FrameInterpolate,
            ),
            With<Controlled>,
        >,
    ) {
        let Ok((
            entity,
            authoritative,
            mut position,
            mut rotation,
            mut anim_state,
            mut correction,
            mut history,
        )) = controlled.single_mut()
        else {
            return;
        };
        if !authoritative.is_changed() {
            return;
        }
        let Some(mut prediction) = sessions
            .iter_mut()
            .find_map(|(session, prediction)| session.is_connected().then_some(prediction))
        else {
            return;
        };
        let snapshot = authoritative.0;
        let acknowledged = prediction.pending.acknowledge(snapshot.sequence);
        trace!(?entity, sequence = %snapshot.sequence, acknowledged, pending = prediction.pending.len(), "reconciling");

        anim_state.set_if_neq(snapshot.anim_state);
        let corrected_rotation = match reconcile(
            position.0,
            &snapshot,
            &prediction.pending,
            &movement,
            &config.policy,
        ) {
            Reconciliation::Unchanged { rotation } => rotation,
            Reconciliation::Blend {
                corrected,
                rotation,
                error,
            } => {
                debug!(?entity, ?error, "prediction error, blending");
                position.0 = corrected;
                correction.start(error, config.policy.correction_duration);
                history.shift(-error);
                prediction.stats.corrections += 1;
                prediction.stats.last_error = error.length();
                rotation
            }
            Reconciliation::Snap {
                corrected,
                rotation,
            } => {
                info!(?entity, from = ?position.0, to = ?corrected, "prediction error too large, snapping");
                prediction.stats.last_error = (position.0 - corrected).length();
                prediction.stats.snaps += 1;
                position.0 = corrected;
                correction.cancel();
                history.reset();
                rotation
            }
        };
        if (rotation.0 - corrected_rotation).abs() > f32::EPSILON {
            rotation.0 = corrected_rotation;
        }
    }

    pub(crate) fn record_history(
        mut controlled: Query<(&Position, &Rotation, &mut FrameInterpolate), With<Controlled>>,
    ) {
        for (position, rotation, mut history) in controlled.iter_mut() {
            history.push(position.0, rotation.0);
        }
    }

    /// Displayed state = interpolated tick history + remaining correction offset
    pub(crate) fn update_visual(
        time: Res<Time<Fixed>>,
        frame: Res<FrameDelta>,
        mut controlled: Query<
            (
                &Position,
                &Rotation,
                &FrameInterpolate,
                &mut VisualCorrection,
                &mut VisualState,
            ),
            With<Controlled>,
        >,
    ) {
        let overstep = time.overstep_fraction();
        for (position, rotation, history, mut correction, mut visual) in controlled.iter_mut() {
            correction.advance(frame.clamped);
            let (base, yaw) = history
                .interpolate(overstep)
                .unwrap_or((position.0, rotation.0));
            visual.position = base + correction.offset();
            visual.rotation = yaw;
        }
    }
}

impl Plugin for PredictionPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config);
        app.register_required_components::<Controlled, VisualCorrection>();
        app.register_required_components::<Controlled, FrameInterpolate>();

        app.configure_sets(
            PreUpdate,
            (
                PredictionSet::Clean.after(TransportSet::Decode),
                PredictionSet::Reconcile.after(ReplicationSet::Apply),
            ),
        );
        app.configure_sets(Update, PredictionSet::Visual.in_set(FrameSet::Advance));

        app.add_systems(
            PreUpdate,
            (
                (Self::add_prediction_loop, Self::clear_lost_sessions)
                    .chain()
                    .in_set(PredictionSet::Clean),
                Self::reconcile.in_set(PredictionSet::Reconcile),
            ),
        );
        app.add_systems(
            FixedUpdate,
            Self::predict
                .in_set(PredictionSet::Predict)
                .run_if(any_with_component::<Controlled>),
        );
        app.add_systems(
            FixedPostUpdate,
            Self::record_history.in_set(PredictionSet::RecordHistory),
        );
        app.add_systems(Update, Self::update_visual.in_set(PredictionSet::Visual));
    }
}
