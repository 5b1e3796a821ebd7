//! Duration timer for live record capture
//!
//! Ticks once a second on a tokio task. Stopping or dropping the timer
//! aborts the task and freezes the count.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
pub struct RecordTimer {
    counter: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
    frozen: u64,
}

impl RecordTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to zero and start ticking. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        self.cancel();
        self.frozen = 0;

        let counter = Arc::new(AtomicU64::new(0));
        self.counter = counter.clone();
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + TICK, TICK);
            loop {
                ticker.tick().await;
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }));

        tracing::debug!("Timer started");
    }

    /// Stop ticking and return the elapsed seconds
    pub fn stop(&mut self) -> u64 {
        if self.task.is_some() {
            self.frozen = self.counter.load(Ordering::Relaxed);
            self.cancel();
            tracing::debug!(elapsed_secs = self.frozen, "Timer stopped");
        }
        self.frozen
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn elapsed_secs(&self) -> u64 {
        if self.is_running() {
            self.counter.load(Ordering::Relaxed)
        } else {
            self.frozen
        }
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for RecordTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Whole minutes for an elapsed duration, rounding any partial minute up
pub fn duration_minutes(elapsed_secs: u64) -> u32 {
    u32::try_from(elapsed_secs.div_ceil(60)).unwrap_or(u32::MAX)
}

/// `MM:SS` clock face
pub fn format_clock(elapsed_secs: u64) -> String {
    format!("{:02}:{:02}", elapsed_secs / 60, elapsed_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_minutes_rounds_up() {
        assert_eq!(duration_minutes(0), 0);
        assert_eq!(duration_minutes(1), 1);
        assert_eq!(duration_minutes(60), 1);
        assert_eq!(duration_minutes(61), 2);
        assert_eq!(duration_minutes(600), 10);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(75), "01:15");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_second() {
        let mut timer = RecordTimer::new();
        timer.start();
        assert_eq!(timer.elapsed_secs(), 0);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(timer.elapsed_secs(), 3);

        assert_eq!(timer.stop(), 3);
        assert!(!timer.is_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(timer.elapsed_secs(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_resets_count() {
        let mut timer = RecordTimer::new();
        timer.start();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(timer.stop(), 2);

        timer.start();
        assert_eq!(timer.elapsed_secs(), 0);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(timer.stop(), 1);
    }

    #[test]
    fn test_stop_without_start() {
        let mut timer = RecordTimer::new();
        assert_eq!(timer.stop(), 0);
        assert_eq!(timer.elapsed_secs(), 0);
    }
}
