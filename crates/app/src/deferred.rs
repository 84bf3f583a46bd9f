use std::future::Future;
use std::time::Duration;

/// Pause before a rebuild so the loading indicator is visible first.
pub const BUILD_DEFER: Duration = Duration::from_millis(10);

/// A unit of work that starts after a fixed delay.
///
/// The work is an ordinary future: dropping it before the delay elapses
/// cancels it, and nothing of it has run.
#[derive(Debug, Clone, Copy)]
pub struct Deferred {
    delay: Duration,
}

impl Deferred {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn run<F: Future>(&self, work: F) -> F::Output {
        tracing::debug!(delay_ms = self.delay.as_millis(), "deferring work");
        tokio::time::sleep(self.delay).await;
        work.await
    }
}

impl Default for Deferred {
    fn default() -> Self {
        Self::new(BUILD_DEFER)
    }
}
