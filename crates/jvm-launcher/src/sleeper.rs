//! An interruptible sleep, used to poll long-running JVMs without
//! waiting out the full interval once the process has finished.

use std::time::Duration;

use async_channel::{bounded, Receiver, Sender};
use async_io::Timer;
use futures_lite::future;

/// Sleeps for a requested duration, unless interrupted first.
///
/// An interrupt is sticky: if it arrives before the sleep starts, the
/// next sleep returns immediately instead of waiting.
pub struct TimedSleeper {
    interrupt_tx: Sender<()>,
    interrupt_rx: Receiver<()>,
}

impl TimedSleeper {
    /// Create a sleeper with no pending interrupt.
    pub fn new() -> Self {
        let (interrupt_tx, interrupt_rx) = bounded(1);
        Self {
            interrupt_tx,
            interrupt_rx,
        }
    }

    /// Sleep for the given duration, or less if interrupted.
    pub async fn sleep(&self, duration: Duration) {
        let interrupted = async {
            let _ = self.interrupt_rx.recv().await;
        };
        let timed_out = async {
            Timer::after(duration).await;
        };
        future::or(interrupted, timed_out).await;
    }

    /// Cut short the sleep in progress, or the next one to start.
    pub fn interrupt(&self) {
        // A full channel means an interrupt is already pending.
        let _ = self.interrupt_tx.try_send(());
    }
}

impl Default for TimedSleeper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[smol_potat::test]
    async fn sleep_waits_out_short_duration() {
        let sleeper = TimedSleeper::new();
        let start = Instant::now();
        sleeper.sleep(Duration::from_millis(50)).await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[smol_potat::test]
    async fn interrupt_before_sleep_returns_immediately() {
        let sleeper = TimedSleeper::new();
        sleeper.interrupt();
        let start = Instant::now();
        sleeper.sleep(Duration::from_secs(60)).await;
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[smol_potat::test]
    async fn interrupt_during_sleep_wakes_it() {
        let sleeper = std::sync::Arc::new(TimedSleeper::new());
        let waker = sleeper.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            waker.interrupt();
        });
        let start = Instant::now();
        sleeper.sleep(Duration::from_secs(60)).await;
        assert!(start.elapsed() < Duration::from_secs(30));
        handle.join().unwrap();
    }

    #[smol_potat::test]
    async fn repeated_interrupts_do_not_block() {
        let sleeper = TimedSleeper::new();
        sleeper.interrupt();
        sleeper.interrupt();
        sleeper.interrupt();
        sleeper.sleep(Duration::from_secs(60)).await;
    }
}
