use crate::domain::model::{DeliveryReport, DeliveryResult, Message, Outcome, RecipientList};
use crate::domain::ports::{Pacer, Transport};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Duration, Instant};

/// Cooperative cancellation flag, checked between recipients. An attempt
/// already in flight runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Waits so that consecutive attempt *starts* are at least `interval` apart.
/// The first attempt starts immediately.
#[derive(Debug)]
pub struct IntervalPacer {
    interval: Duration,
    last_start: Option<Instant>,
}

impl IntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_start: None,
        }
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn pace(&mut self) {
        if let Some(last_start) = self.last_start {
            let elapsed = last_start.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }
        self.last_start = Some(Instant::now());
    }
}

/// No pacing. Used by tests so runs complete without wall-clock waits.
#[derive(Debug, Default)]
pub struct NoPacer;

#[async_trait]
impl Pacer for NoPacer {
    async fn pace(&mut self) {}
}

/// Drives delivery: one sequential, paced attempt per recipient, in list
/// order, with per-recipient fault isolation. Every recipient ends in
/// exactly one terminal outcome.
pub struct Dispatcher<T: Transport> {
    transport: T,
    cancel: CancelToken,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cancel: CancelToken::default(),
        }
    }

    /// Handle for requesting cancellation from another task.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub async fn dispatch(
        &self,
        recipients: &RecipientList,
        message: &Message,
        pacer: &mut dyn Pacer,
    ) -> DeliveryReport {
        let started_at = Utc::now();
        let mut results = Vec::with_capacity(recipients.len());
        let mut sent = 0;
        let mut failed = 0;

        tracing::info!(recipients = recipients.len(), "starting dispatch");

        for recipient in recipients {
            if self.cancel.is_cancelled() {
                tracing::warn!(%recipient, "run cancelled, recipient not attempted");
                results.push(DeliveryResult {
                    recipient: recipient.clone(),
                    outcome: Outcome::Failed("cancelled before attempt".to_string()),
                });
                failed += 1;
                continue;
            }

            pacer.pace().await;

            match self.transport.send(message, recipient).await {
                Ok(()) => {
                    tracing::info!(%recipient, "sent");
                    results.push(DeliveryResult {
                        recipient: recipient.clone(),
                        outcome: Outcome::Sent,
                    });
                    sent += 1;
                }
                Err(e) => {
                    tracing::warn!(%recipient, error = %e, "delivery failed");
                    results.push(DeliveryResult {
                        recipient: recipient.clone(),
                        outcome: Outcome::Failed(e.to_string()),
                    });
                    failed += 1;
                }
            }
        }

        let report = DeliveryReport {
            results,
            sent,
            failed,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            sent = report.sent,
            failed = report.failed,
            "dispatch finished"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compose::Composer;
    use crate::domain::model::ContentMode;
    use crate::utils::error::{MailError, Result};
    use std::collections::HashSet;
    use tokio::sync::Mutex;

    struct MockTransport {
        attempted: Arc<Mutex<Vec<String>>>,
        fail_for: HashSet<String>,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                attempted: Arc::new(Mutex::new(Vec::new())),
                fail_for: HashSet::new(),
            }
        }

        fn failing_for(addresses: &[&str]) -> Self {
            Self {
                attempted: Arc::new(Mutex::new(Vec::new())),
                fail_for: addresses.iter().map(|a| a.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, _message: &Message, to: &str) -> Result<()> {
            self.attempted.lock().await.push(to.to_string());
            if self.fail_for.contains(to) {
                Err(MailError::Rejected {
                    status: 550,
                    body: "mailbox unavailable".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn recipients(addresses: &[&str]) -> RecipientList {
        let mut list = RecipientList::new();
        for address in addresses {
            list.push_trimmed(address);
        }
        list
    }

    fn message() -> Message {
        Composer::new("Sender", "subject", ContentMode::Text).compose("hello", None, None)
    }

    #[tokio::test]
    async fn test_report_has_one_entry_per_recipient_in_order() {
        let transport = MockTransport::new();
        let dispatcher = Dispatcher::new(transport);
        let list = recipients(&["a@x.com", "b@x.com", "c@x.com"]);

        let report = dispatcher
            .dispatch(&list, &message(), &mut NoPacer)
            .await;

        assert_eq!(report.total(), 3);
        let order: Vec<&str> = report.results.iter().map(|r| r.recipient.as_str()).collect();
        assert_eq!(order, vec!["a@x.com", "b@x.com", "c@x.com"]);
        assert_eq!(report.sent, 3);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_remaining_recipients() {
        let transport = MockTransport::failing_for(&["b@x.com"]);
        let attempted = transport.attempted.clone();
        let dispatcher = Dispatcher::new(transport);
        let list = recipients(&["a@x.com", "b@x.com", "c@x.com"]);

        let report = dispatcher
            .dispatch(&list, &message(), &mut NoPacer)
            .await;

        assert_eq!(attempted.lock().await.len(), 3);
        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.results[0].outcome, Outcome::Sent);
        assert!(matches!(report.results[1].outcome, Outcome::Failed(_)));
        assert_eq!(report.results[2].outcome, Outcome::Sent);
    }

    #[tokio::test]
    async fn test_each_list_entry_attempted_exactly_once() {
        let transport = MockTransport::new();
        let attempted = transport.attempted.clone();
        let dispatcher = Dispatcher::new(transport);
        // Duplicates are legitimate list entries and each gets one attempt.
        let list = recipients(&["a@x.com", "a@x.com"]);

        let report = dispatcher
            .dispatch(&list, &message(), &mut NoPacer)
            .await;

        assert_eq!(attempted.lock().await.as_slice(), &["a@x.com", "a@x.com"]);
        assert_eq!(report.total(), 2);
    }

    #[tokio::test]
    async fn test_cancellation_skips_remaining_recipients() {
        let transport = MockTransport::new();
        let attempted = transport.attempted.clone();
        let dispatcher = Dispatcher::new(transport);
        dispatcher.cancel_token().cancel();
        let list = recipients(&["a@x.com", "b@x.com"]);

        let report = dispatcher
            .dispatch(&list, &message(), &mut NoPacer)
            .await;

        assert!(attempted.lock().await.is_empty());
        assert_eq!(report.total(), 2);
        assert_eq!(report.failed, 2);
        for result in &report.results {
            assert_eq!(
                result.outcome,
                Outcome::Failed("cancelled before attempt".to_string())
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_pacer_spaces_attempt_starts() {
        let mut pacer = IntervalPacer::new(Duration::from_millis(500));

        let start = Instant::now();
        pacer.pace().await;
        // First attempt starts immediately.
        assert_eq!(start.elapsed(), Duration::ZERO);

        pacer.pace().await;
        assert!(start.elapsed() >= Duration::from_millis(500));

        pacer.pace().await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_empty_recipient_list_yields_empty_report() {
        let dispatcher = Dispatcher::new(MockTransport::new());
        let report = dispatcher
            .dispatch(&RecipientList::new(), &message(), &mut NoPacer)
            .await;
        assert_eq!(report.total(), 0);
        assert_eq!(report.sent, 0);
        assert_eq!(report.failed, 0);
    }
}
