//! Selection and timing of animation clips
use bevy_ecs::component::Component;
use bevy_math::Vec3;
use core::time::Duration;
use roomsync_core::prelude::AnimState;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationClip {
    #[default]
    Idle,
    Walk,
    Attack,
    Damage,
    Death,
}

impl AnimationClip {
    /// Pick the clip for an entity. Movement wins over every replicated state.
    pub fn select(moving: bool, state: AnimState) -> Self {
        if moving {
            return AnimationClip::Walk;
        }
        match state {
            AnimState::Dead => AnimationClip::Death,
            AnimState::Attacking => AnimationClip::Attack,
            AnimState::TakingDamage => AnimationClip::Damage,
            AnimState::Idle | AnimState::Walking => AnimationClip::Idle,
        }
    }

    pub fn looping(self) -> bool {
        self != AnimationClip::Death
    }

    pub fn length(self) -> Duration {
        match self {
            AnimationClip::Idle => Duration::from_millis(2000),
            AnimationClip::Walk => Duration::from_millis(1000),
            AnimationClip::Attack => Duration::from_millis(800),
            AnimationClip::Damage => Duration::from_millis(400),
            AnimationClip::Death => Duration::from_millis(1200),
        }
    }
}

/// Clip currently played by an entity, and the time into it
#[derive(Component, Debug, Default, Clone, PartialEq)]
pub struct Animator {
    pub clip: AnimationClip,
    pub time: Duration,
    last_position: Option<Vec3>,
}

impl Animator {
    /// Returns true if the displayed position moved by more than `epsilon` since the last call
    pub(crate) fn moved(&mut self, position: Vec3, epsilon: f32) -> bool {
        let moved = self
            .last_position
            .is_some_and(|last| last.distance(position) > epsilon);
        self.last_position = Some(position);
        moved
    }

    /// Switch to `clip` (restarting it if it changed) and advance it by `delta`
    pub fn play(&mut self, clip: AnimationClip, delta: Duration) {
        if clip != self.clip {
            self.clip = clip;
            self.time = Duration::ZERO;
        }
        let length = clip.length();
        let time = self.time + delta;
        self.time = if clip.looping() {
            Duration::from_nanos((time.as_nanos() % length.as_nanos()) as u64)
        } else {
            time.min(length)
        };
    }

    pub fn is_finished(&self) -> bool {
        !self.clip.looping() && self.time >= self.clip.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_clip_selection() {
        assert_eq!(AnimationClip::select(true, AnimState::Dead), AnimationClip::Walk);
        assert_eq!(AnimationClip::select(false, AnimState::Dead), AnimationClip::Death);
        assert_eq!(AnimationClip::select(false, AnimState::Attacking), AnimationClip::Attack);
        assert_eq!(AnimationClip::select(false, AnimState::TakingDamage), AnimationClip::Damage);
        assert_eq!(AnimationClip::select(false, AnimState::Walking), AnimationClip::Idle);
    }

    #[test]
    fn test_death_does_not_loop() {
        let mut animator = Animator::default();
        animator.play(AnimationClip::Death, Duration::from_secs(1));
        assert!(!animator.is_finished());
        animator.play(AnimationClip::Death, Duration::from_secs(1));
        assert!(animator.is_finished());
        assert_eq!(animator.time, AnimationClip::Death.length());
    }

    #[test]
    fn test_walk_loops_and_restarts_on_switch() {
        let mut animator = Animator::default();
        animator.play(AnimationClip::Walk, Duration::from_millis(1500));
        assert!(animator.time < AnimationClip::Walk.length());
        animator.play(AnimationClip::Attack, Duration::from_millis(100));
        assert_eq!(animator.clip, AnimationClip::Attack);
        assert_eq!(animator.time, Duration::from_millis(100));
    }

    #[test]
    fn test_moved_uses_epsilon() {
        let mut animator = Animator::default();
        assert!(!animator.moved(Vec3::ZERO, 0.05));
        assert!(!animator.moved(Vec3::new(0.01, 0.0, 0.0), 0.05));
        assert!(animator.moved(Vec3::new(0.5, 0.0, 0.0), 0.05));
    }
}
