use std::time::Duration;

use tokio::time::Instant;

/// Trailing-edge debounce timer.
///
/// Every [`touch`](Debouncer::touch) pushes the deadline out to `delay` from
/// now; [`fired`](Debouncer::fired) resolves once the deadline passes without
/// another touch.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn touch(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Wait for the pending deadline and clear it.
    ///
    /// Cancel safe: dropping the future leaves the deadline in place. Never
    /// resolves when nothing is pending.
    pub async fn fired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                tokio::time::sleep_until(deadline).await;
                self.deadline = None;
            }
            None => std::future::pending().await,
        }
    }
}
