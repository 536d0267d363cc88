use bevy_ecs::resource::Resource;
use core::time::Duration;

/// Figures shown by the debug overlay
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct DebugStats {
    pub total_entities: usize,
    pub visible_entities: usize,
    /// Frames per second, exponentially smoothed
    pub fps: f32,
    /// Last measured round-trip time to the room
    pub rtt: Option<Duration>,
    /// Horizontal position of the controlled entity
    pub controlled_xz: Option<(f32, f32)>,
}

impl DebugStats {
    const FPS_SMOOTHING: f32 = 0.1;

    pub(crate) fn record_frame(&mut self, raw_delta: Duration) {
        let secs = raw_delta.as_secs_f32();
        if secs <= 0.0 {
            return;
        }
        let instant = 1.0 / secs;
        self.fps = if self.fps == 0.0 {
            instant
        } else {
            self.fps + (instant - self.fps) * Self::FPS_SMOOTHING
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_log::test;

    #[test]
    fn test_fps_smoothing() {
        let mut stats = DebugStats::default();
        stats.record_frame(Duration::ZERO);
        assert_eq!(stats.fps, 0.0);
        stats.record_frame(Duration::from_millis(10));
        assert_relative_eq!(stats.fps, 100.0, epsilon = 1e-3);
        stats.record_frame(Duration::from_millis(20));
        assert_relative_eq!(stats.fps, 95.0, epsilon = 1e-3);
    }
}
