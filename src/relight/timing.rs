//! Per-step timings for a single render.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

/// Accumulated time of one named step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
    /// How many times the step ran.
    pub count: u32,
}

/// Per-step totals, one entry per step name in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct RenderTimings {
    steps: Vec<StepTiming>,
}

impl RenderTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: impl Into<String>, duration: Duration) {
        self.accumulate(name.into(), duration, 1);
    }

    /// Fold another set of timings in.
    pub fn merge(&mut self, other: &RenderTimings) {
        for step in &other.steps {
            self.accumulate(step.name.clone(), step.duration, step.count);
        }
    }

    fn accumulate(&mut self, name: String, duration: Duration, count: u32) {
        match self.steps.iter_mut().find(|s| s.name == name) {
            Some(step) => {
                step.duration += duration;
                step.count = step.count.saturating_add(count);
            }
            None => self.steps.push(StepTiming {
                name,
                duration,
                count,
            }),
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.steps.iter().find(|s| s.name == name).map(|s| s.duration)
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn summary(&self) -> String {
        let total = self.total_duration();

        let mut out = String::new();
        let _ = writeln!(out, "Render Timing Summary:");
        let _ = writeln!(out, "{:-<60}", "");
        for step in &self.steps {
            let percentage = if total.as_secs_f64() > 0.0 {
                (step.duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            let _ = writeln!(
                out,
                "{:<24} {:>6}x {:>12.3}ms ({:>5.1}%)",
                step.name,
                step.count,
                step.duration.as_secs_f64() * 1000.0,
                percentage
            );
        }
        let _ = writeln!(out, "{:-<60}", "");
        let _ = write!(out, "{:<32} {:>12.3}ms", "Total", total.as_secs_f64() * 1000.0);
        out
    }
}

pub struct Timer {
    start: Instant,
    name: &'static str,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    pub fn stop(self) -> (&'static str, Duration) {
        (self.name, self.start.elapsed())
    }
}
