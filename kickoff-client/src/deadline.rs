//! Global deadline for a trigger-and-wait run
//!
//! The deadline is a single timer task that cancels a [`CancellationToken`]
//! when the configured timeout elapses. The poll loop selects on that token
//! instead of consulting a shared timer. The timer task is aborted when the
//! deadline is disarmed or dropped, so it can never fire after a terminal
//! state has been reported.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Armed timer guarding the whole operation
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct Deadline {
    token: CancellationToken,
    fired: Arc<AtomicBool>,
    timer: Option<JoinHandle<()>>,
}

impl Deadline {
    /// Starts the timer
    pub fn arm(timeout: Duration) -> Self {
        let token = CancellationToken::new();
        let fired = Arc::new(AtomicBool::new(false));

        let timer = {
            let token = token.clone();
            let fired = Arc::clone(&fired);
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                fired.store(true, Ordering::SeqCst);
                warn!("Deadline of {}s elapsed", timeout.as_secs());
                token.cancel();
            })
        };

        debug!("Deadline armed ({}s)", timeout.as_secs());

        Self {
            token,
            fired,
            timer: Some(timer),
        }
    }

    /// Token cancelled when the deadline fires
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Stops the timer and reports whether it had already fired
    pub fn disarm(mut self) -> bool {
        self.stop_timer();
        self.has_fired()
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            debug!("Deadline disarmed");
        }
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        self.stop_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_timeout() {
        let deadline = Deadline::arm(Duration::from_secs(2));
        let token = deadline.token();

        tokio::time::sleep(Duration::from_millis(1_999)).await;
        assert!(!token.is_cancelled());

        token.cancelled().await;
        assert!(deadline.has_fired());
        assert!(deadline.disarm());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_prevents_firing() {
        let deadline = Deadline::arm(Duration::from_secs(2));
        let token = deadline.token();

        assert!(!deadline.disarm());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_prevents_firing() {
        let token = {
            let deadline = Deadline::arm(Duration::from_secs(1));
            deadline.token()
        };

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!token.is_cancelled());
    }
}
