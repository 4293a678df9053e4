//! Step Progress
//!
//! Terminal rendering of workflow progress. Lines go to stderr so a report
//! printed to stdout can be piped.

use std::sync::Mutex;
use std::time::Instant;

use console::{Term, style};

use crate::ai::RetryStats;
use crate::workflow::{RunObserver, Step};

pub struct StepProgress {
    term: Term,
    enabled: bool,
    started: Mutex<Option<Instant>>,
}

impl StepProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            term: Term::stderr(),
            enabled,
            started: Mutex::new(None),
        }
    }

    fn line(&self, text: &str) {
        if self.enabled {
            let _ = self.term.write_line(text);
        }
    }
}

impl RunObserver for StepProgress {
    fn step_started(&self, index: usize, total: usize, step: &Step) {
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
        self.line(&format!(
            "{} {}...",
            style(format!("[{}/{}]", index + 1, total)).cyan(),
            step.heading
        ));
    }

    fn step_finished(&self, _index: usize, _total: usize, step: &Step, stats: &RetryStats) {
        let elapsed = self
            .started
            .lock()
            .ok()
            .and_then(|s| *s)
            .map(|s| s.elapsed().as_secs_f32())
            .unwrap_or_default();

        let retries = if stats.attempts > 1 {
            format!(
                ", {} attempts, waited {:.1}s",
                stats.attempts,
                stats.total_delay().as_secs_f32()
            )
        } else {
            String::new()
        };
        self.line(&format!(
            "  {} {} ({:.1}s{})",
            style("✓").green(),
            step.heading,
            elapsed,
            retries
        ));
    }
}
