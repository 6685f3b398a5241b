//! Fixed inter-page pacing.

use std::time::Duration;

/// Sleeps a fixed delay before every request except the first.
#[derive(Debug, Clone)]
pub struct InterPageDelay {
    delay: Duration,
    is_first_page: bool,
}

impl InterPageDelay {
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
            is_first_page: true,
        }
    }

    /// Waits out the delay unless this is the first call.
    pub async fn wait(&mut self) {
        if !self.is_first_page && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.is_first_page = false;
    }
}
