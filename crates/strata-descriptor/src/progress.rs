//! Progress reporting interface for the engine that consumes a descriptor.
//!
//! The descriptor builder itself never reports progress; the engine calls a
//! listener while it carves terrain from the emitted text.

use tracing::info;

/// Receives progress updates from a long-running generation pass.
pub trait ProgressListener {
    /// `percent` is in `[0, 100]`; `stage` names the current pass.
    fn on_progress_update(&mut self, percent: f32, stage: &str);
}

/// Logs progress through `tracing`, clamping into `[0, 100]` and never
/// letting the reported value go backwards.
#[derive(Debug, Default)]
pub struct TracingProgress {
    last: f32,
    stage: String,
}

impl TracingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest percentage reported so far.
    pub fn percent(&self) -> f32 {
        self.last
    }

    /// Most recent stage name.
    pub fn stage(&self) -> &str {
        &self.stage
    }
}

impl ProgressListener for TracingProgress {
    fn on_progress_update(&mut self, percent: f32, stage: &str) {
        let percent = if percent.is_nan() {
            self.last
        } else {
            percent.clamp(0.0, 100.0).max(self.last)
        };
        self.last = percent;
        if self.stage != stage {
            self.stage = stage.to_string();
        }
        info!(percent, stage, "generation progress");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_clamped_and_monotonic() {
        let mut p = TracingProgress::new();
        p.on_progress_update(-5.0, "noise");
        assert_eq!(p.percent(), 0.0);
        p.on_progress_update(40.0, "noise");
        p.on_progress_update(30.0, "carving");
        assert_eq!(p.percent(), 40.0);
        assert_eq!(p.stage(), "carving");
        p.on_progress_update(f32::NAN, "carving");
        assert_eq!(p.percent(), 40.0);
        p.on_progress_update(250.0, "features");
        assert_eq!(p.percent(), 100.0);
    }

    #[test]
    fn test_listener_is_object_safe() {
        let mut sink: Box<dyn ProgressListener> = Box::new(TracingProgress::new());
        sink.on_progress_update(10.0, "noise");
    }
}
