//! Timing and rendering of a completed health check.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::health::status::Status;

/// How the probe set was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckMode {
    Serial,
    Parallel,
}

impl CheckMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckMode::Serial => "serial",
            CheckMode::Parallel => "parallel",
        }
    }
}

impl fmt::Display for CheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate outcome of one check plus its wall-clock duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    mode: CheckMode,
    outcome: Result<(), Status>,
    elapsed: Duration,
}

impl Verdict {
    pub fn new(mode: CheckMode, outcome: Result<(), Status>, elapsed: Duration) -> Self {
        Self { mode, outcome, elapsed }
    }

    /// Run `check` and time it.
    pub async fn measure<F>(mode: CheckMode, check: F) -> Self
    where
        F: Future<Output = Result<(), Status>>,
    {
        let start = Instant::now();
        let outcome = check.await;
        Self::new(mode, outcome, start.elapsed())
    }

    pub fn is_healthy(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The status that failed the check, if any.
    pub fn failure(&self) -> Option<&Status> {
        self.outcome.as_ref().err()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// Text reported to HTTP callers.
    ///
    /// - success: `WORKING <N> ms`
    /// - serial failure: `<message> <N> ms`
    /// - parallel failure: `<message> - <N> ms`
    pub fn body(&self) -> String {
        match (&self.outcome, self.mode) {
            (Ok(()), _) => format!("WORKING {} ms", self.elapsed_ms()),
            (Err(status), CheckMode::Serial) => format!("{} {} ms", status.message(), self.elapsed_ms()),
            (Err(status), CheckMode::Parallel) => format!("{} - {} ms", status.message(), self.elapsed_ms()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_rendering() {
        let elapsed = Duration::from_micros(12_900);
        let failure = Status::unhealthy("KeyValue - KeyValue Timeout");

        assert_eq!(Verdict::new(CheckMode::Serial, Ok(()), elapsed).body(), "WORKING 12 ms");
        assert_eq!(Verdict::new(CheckMode::Parallel, Ok(()), elapsed).body(), "WORKING 12 ms");
        assert_eq!(
            Verdict::new(CheckMode::Serial, Err(failure.clone()), elapsed).body(),
            "KeyValue - KeyValue Timeout 12 ms"
        );
        assert_eq!(
            Verdict::new(CheckMode::Parallel, Err(failure), elapsed).body(),
            "KeyValue - KeyValue Timeout - 12 ms"
        );
    }

    #[tokio::test]
    async fn test_measure_times_the_check() {
        let verdict = Verdict::measure(CheckMode::Serial, async {
            tokio::time::sleep(Duration::from_millis(60)).await;
            Err(Status::unhealthy("x"))
        })
        .await;

        assert!(!verdict.is_healthy());
        assert_eq!(verdict.failure().map(|s| s.message()), Some("x"));
        assert!(verdict.elapsed() >= Duration::from_millis(60));
    }
}
