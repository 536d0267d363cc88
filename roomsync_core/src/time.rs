use bevy_derive::{Deref, DerefMut};
use bevy_ecs::resource::Resource;
use bevy_reflect::Reflect;
use core::time::Duration;

/// Resource that contains the duration of a network tick
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Reflect, Deref, DerefMut)]
pub struct TickDuration(pub Duration);

impl Default for TickDuration {
    fn default() -> Self {
        Self(Duration::from_millis(100))
    }
}

/// Elapsed wall-clock time since the previous render frame.
///
/// `raw` is what the clock measured; `clamped` is the value every per-frame computation must use.
/// They differ after a stall (backgrounded tab, debugger, slow load) so that entities do not
/// jump on resume.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FrameDelta {
    pub raw: Duration,
    pub clamped: Duration,
    pub max: Duration,
}

impl Default for FrameDelta {
    fn default() -> Self {
        Self::new(Duration::ZERO, Duration::from_millis(250))
    }
}

impl FrameDelta {
    pub fn new(raw: Duration, max: Duration) -> Self {
        Self {
            raw,
            clamped: raw.min(max),
            max,
        }
    }

    /// Record the delta measured for the current frame
    pub fn record(&mut self, raw: Duration) {
        self.raw = raw;
        self.clamped = raw.min(self.max);
    }

    pub fn was_clamped(&self) -> bool {
        self.raw > self.clamped
    }
}
