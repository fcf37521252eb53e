//! Background polling until a transaction settles.

use std::time::Duration;

use att_core::entities::TransactionRecord;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::tracker::TransactionTracker;

/// Default spacing between receipt queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Poll `hash` every `every` until it is terminal, hand the terminal record
/// to `on_terminal` exactly once, then stop.
///
/// Queries are sequential: a slow one delays the next tick rather than
/// overlapping it. The first query happens one interval after spawning.
pub fn spawn_poller<F>(
    tracker: TransactionTracker,
    hash: String,
    every: Duration,
    on_terminal: F,
) -> PollHandle
where
    F: FnOnce(TransactionRecord) + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let settled = loop {
            ticker.tick().await;
            let record = tracker.poll_status(&hash).await;
            if record.is_terminal() {
                break record;
            }
        };

        tracing::debug!(hash = %settled.hash, status = %settled.status, "polling stopped");
        on_terminal(settled.clone());
        settled
    });
    PollHandle { task: Some(task) }
}

/// Owns a running poller. Dropping the handle cancels it.
#[derive(Debug)]
pub struct PollHandle {
    task: Option<JoinHandle<TransactionRecord>>,
}

impl PollHandle {
    /// Stop polling. No callback fires after this returns unless it was
    /// already running.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether the poller has stopped, either settled or cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the terminal record. `None` if cancelled.
    pub async fn wait(mut self) -> Option<TransactionRecord> {
        let task = self.task.take()?;
        task.await.ok()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use att_core::enums::TransactionStatus;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::gateway::Receipt;
    use crate::scripted::{ReceiptStep, ScriptedGateway};

    const HASH: &str = "0x00000000000000000000000000000000000000000000000000000000000000aa";

    fn tracker(gateway: &Arc<ScriptedGateway>) -> TransactionTracker {
        TransactionTracker::new(gateway.clone(), None)
    }

    fn mined(success: bool) -> ReceiptStep {
        ReceiptStep::Mined(Receipt {
            block_number: Some(12_345),
            success,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn stops_after_first_terminal_record() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.script(HASH, vec![ReceiptStep::NotMined, ReceiptStep::NotMined, mined(true)]);
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        let handle = spawn_poller(tracker(&gateway), HASH.into(), DEFAULT_POLL_INTERVAL, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let settled = handle.wait().await.unwrap();

        assert_eq!(settled.status, TransactionStatus::Confirmed);
        assert_eq!(settled.block_number, Some(12_345));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.poll_count(HASH), 3);

        tokio::time::sleep(DEFAULT_POLL_INTERVAL * 4).await;
        assert_eq!(gateway.poll_count(HASH), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn first_poll_waits_one_interval() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.script(HASH, vec![ReceiptStep::NotMined]);
        let _handle = spawn_poller(tracker(&gateway), HASH.into(), DEFAULT_POLL_INTERVAL, |_| {});

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(gateway.poll_count(HASH), 0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(gateway.poll_count(HASH), 1);
        tokio::time::sleep(DEFAULT_POLL_INTERVAL).await;
        assert_eq!(gateway.poll_count(HASH), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_error_settles_as_failed() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.script(HASH, vec![ReceiptStep::Error("timeout".into())]);
        let handle = spawn_poller(tracker(&gateway), HASH.into(), DEFAULT_POLL_INTERVAL, |_| {});

        let settled = handle.wait().await.unwrap();
        assert_eq!(settled.status, TransactionStatus::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_polling_and_suppresses_callback() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.script(HASH, vec![ReceiptStep::NotMined, mined(true)]);
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        let mut handle =
            spawn_poller(tracker(&gateway), HASH.into(), DEFAULT_POLL_INTERVAL, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        tokio::time::sleep(Duration::from_millis(5_100)).await;
        assert_eq!(gateway.poll_count(HASH), 1);

        handle.cancel();
        tokio::time::sleep(DEFAULT_POLL_INTERVAL * 3).await;

        assert!(handle.is_finished());
        assert_eq!(gateway.poll_count(HASH), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(handle.wait().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.script(HASH, vec![ReceiptStep::NotMined]);
        drop(spawn_poller(tracker(&gateway), HASH.into(), DEFAULT_POLL_INTERVAL, |_| {}));

        tokio::time::sleep(DEFAULT_POLL_INTERVAL * 3).await;
        assert_eq!(gateway.poll_count(HASH), 0);
    }
}
