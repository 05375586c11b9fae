use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LoopState {
    #[default]
    Idle,
    Running {
        last: Option<Instant>,
    },
    Stopped,
}

/// Lifecycle of the per-frame loop. Runs at most once: a stopped scheduler
/// cannot be restarted.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    state: LoopState,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the loop already ran.
    pub fn start(&mut self) -> bool {
        if self.state != LoopState::Idle {
            return false;
        }
        self.state = LoopState::Running { last: None };
        true
    }

    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    /// Accepts a frame at `now` and returns the seconds elapsed since the
    /// previous one, or `None` when the loop is not running. The first frame
    /// reports zero; a clock that steps backwards reports zero too.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        let LoopState::Running { last } = &mut self.state else {
            return None;
        };
        let dt = last.map_or(0.0, |prev| now.saturating_duration_since(prev).as_secs_f64());
        *last = Some(last.map_or(now, |prev| prev.max(now)));
        Some(dt)
    }
}
