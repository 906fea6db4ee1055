use std::time::{Duration, Instant};

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        log::debug!("⏱️  {}: {}µs", step_name, elapsed.as_micros());

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn total(&self) -> Duration {
        self.timings.iter().map(|(_, d)| *d).sum()
    }

    pub fn log_summary(&self, label: &str) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        let total = self.total();
        log::info!("📊 Performance Summary ({label}):");
        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            log::info!(
                "   {:.<35} {}µs ({:.1}%)",
                step,
                duration.as_micros(),
                percentage
            );
        }
        log::info!("   {:.<35} {}µs", "Total", total.as_micros());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_profiler_records_nothing() {
        let mut profiler = StepProfiler::new(false);
        let value = profiler.time_step("noop", || 7);
        assert_eq!(value, 7);
        assert!(profiler.timings().is_empty());
    }

    #[test]
    fn test_enabled_profiler_records_steps_in_order() {
        let mut profiler = StepProfiler::new(true);
        profiler.time_step("first", || ());
        profiler.time_step("second", || ());
        let names: Vec<&str> = profiler.timings().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
