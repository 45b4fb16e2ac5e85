use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

/// Observer for batch progress, per-stage timings and job failures.
///
/// Use cases report through this trait so the core never decides where
/// progress goes.
pub trait PipelineLogger: Send {
    /// Report that item `current` of `total` has been handled.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one image.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record an image that could not be processed.
    fn failure(&mut self, source: &Path, error: &str);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-batch summary. Default: no-op.
    fn summary(&self, _written: usize, _failed: usize) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn failure(&mut self, _source: &Path, _error: &str) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI logger that tracks per-stage timing and prints a summary when the
/// batch completes.
///
/// Progress output is throttled to every `throttle_items` images.
pub struct StdoutPipelineLogger {
    throttle_items: usize,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    total_items: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_items: usize) -> Self {
        Self {
            throttle_items: throttle_items.max(1),
            timings: HashMap::new(),
            start_time: Instant::now(),
            total_items: 0,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was processed.
    pub fn summary_string(&self, written: usize, failed: usize) -> Option<String> {
        if self.total_items == 0 && self.timings.is_empty() {
            return None;
        }
        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        Some(self.format_summary(written, failed, elapsed_ms))
    }

    fn format_summary(&self, written: usize, failed: usize, elapsed_ms: f64) -> String {
        let items = self.total_items;
        let mut lines = vec![format!(
            "Batch summary ({items} images, {written} written, {failed} failed, {:.1}s total):",
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = mean(durations);
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:8}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        if items > 0 && elapsed_ms > 0.0 {
            let rate = items as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {rate:.1} images/s"));
        }

        lines.join("\n")
    }

}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_items = total;
        if total > 0 && (current % self.throttle_items == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Processing: {current}/{total} images ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn failure(&mut self, source: &Path, error: &str) {
        log::warn!("Skipping {}: {error}", source.display());
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self, written: usize, failed: usize) {
        if let Some(text) = self.summary_string(written, failed) {
            log::info!("\n\n{text}");
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
