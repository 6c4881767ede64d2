use std::time::Instant;
use tracing::info;

/// Logs how long its scope took when dropped.
pub struct ScopedTimer {
    label: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(label: impl Into<String>) -> Self {
        ScopedTimer {
            label: label.into(),
            start: Instant::now(),
        }
    }

    /// Milliseconds since the timer was created.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        info!("{} took {:.3} ms", self.label, self.elapsed_ms());
    }
}
