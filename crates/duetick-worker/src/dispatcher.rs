//! Bounded fan-out dispatch of notification emails.
//!
//! One dispatch call drains one cycle's worth of candidates: the producer
//! resolves recipients and feeds jobs into a bounded queue, a fixed pool
//! of send workers drains it, and the call returns only after every
//! worker has exited. Closing the queue is the only stop signal the
//! workers need.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use duetick_core::error::ErrorKind;
use duetick_entity::notification::{NotificationCandidate, NotificationCategory};
use duetick_mailer::Mailer;

use crate::error::DispatchError;
use crate::gateway::{ReminderGateway, UserDirectory};
use crate::job::EmailJob;

/// Outcome counts for one dispatch cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    /// Emails delivered and recorded.
    pub sent: usize,
    /// Send attempts that failed; those candidates stay pending.
    pub failed: usize,
    /// Candidates dropped before sending: recipient missing or lookup failed.
    pub skipped: usize,
}

/// Fans notification emails out to a fixed pool of send workers.
pub struct EmailDispatcher {
    gateway: Arc<dyn ReminderGateway>,
    directory: Arc<dyn UserDirectory>,
    mailer: Arc<dyn Mailer>,
    concurrency: usize,
}

impl EmailDispatcher {
    /// Creates a dispatcher with a fixed send-pool size.
    pub fn new(
        gateway: Arc<dyn ReminderGateway>,
        directory: Arc<dyn UserDirectory>,
        mailer: Arc<dyn Mailer>,
        concurrency: usize,
    ) -> Self {
        Self {
            gateway,
            directory,
            mailer,
            concurrency: concurrency.max(1),
        }
    }

    /// Sends one cycle's candidates and waits for every send to finish.
    ///
    /// A candidate whose recipient cannot be resolved is skipped without
    /// affecting the others. A failed send is logged and the candidate is
    /// left pending; only successful sends are recorded back.
    pub async fn dispatch(&self, candidates: Vec<NotificationCandidate>) -> CycleStats {
        if candidates.is_empty() {
            return CycleStats::default();
        }

        // The queue bound doubles as backpressure: enqueueing blocks once
        // every send worker is busy.
        let (tx, rx) = mpsc::channel::<EmailJob>(self.concurrency);
        let rx = Arc::new(Mutex::new(rx));

        let mut workers = Vec::with_capacity(self.concurrency);
        for worker in 0..self.concurrency {
            workers.push(tokio::spawn(send_worker(
                worker,
                Arc::clone(&rx),
                Arc::clone(&self.mailer),
                Arc::clone(&self.gateway),
            )));
        }

        let mut skipped = 0usize;
        for candidate in candidates {
            match self.directory.find_recipient(candidate.user_id).await {
                Ok(Some(recipient)) => {
                    let job = EmailJob::build(candidate, &recipient);
                    if tx.send(job).await.is_err() {
                        // Every worker is gone; nothing more can be delivered.
                        break;
                    }
                }
                Ok(None) => {
                    tracing::warn!(
                        user_id = %candidate.user_id,
                        reminder_id = %candidate.reminder_id,
                        "Recipient no longer exists, skipping candidate"
                    );
                    skipped += 1;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        user_id = %candidate.user_id,
                        reminder_id = %candidate.reminder_id,
                        "Failed to resolve recipient, skipping candidate"
                    );
                    skipped += 1;
                }
            }
        }

        // Closing the queue lets the workers drain it and exit.
        drop(tx);

        let mut sent = 0usize;
        let mut failed = 0usize;
        for handle in workers {
            match handle.await {
                Ok((worker_sent, worker_failed)) => {
                    sent += worker_sent;
                    failed += worker_failed;
                }
                Err(e) => tracing::error!(error = %e, "Send worker panicked"),
            }
        }

        CycleStats {
            sent,
            failed,
            skipped,
        }
    }
}

/// One member of the send pool. Returns its (sent, failed) counts.
async fn send_worker(
    worker: usize,
    queue: Arc<Mutex<mpsc::Receiver<EmailJob>>>,
    mailer: Arc<dyn Mailer>,
    gateway: Arc<dyn ReminderGateway>,
) -> (usize, usize) {
    let mut sent = 0usize;
    let mut failed = 0usize;

    loop {
        // Hold the queue lock only while dequeuing so sends overlap.
        let job = queue.lock().await.recv().await;
        let Some(job) = job else { break };

        match mailer.send(&job.message).await {
            Ok(()) => {
                record_sent(gateway.as_ref(), &job.candidate).await;
                sent += 1;
            }
            Err(e) => {
                failed += 1;
                match DispatchError::from(e) {
                    DispatchError::Transient(reason) => tracing::warn!(
                        worker,
                        reminder_id = %job.candidate.reminder_id,
                        to = ?job.message.to,
                        reason,
                        "Email send failed, candidate stays pending"
                    ),
                    err => tracing::error!(
                        worker,
                        reminder_id = %job.candidate.reminder_id,
                        to = ?job.message.to,
                        error = %err,
                        "Email send failed, candidate stays pending"
                    ),
                }
            }
        }
    }

    (sent, failed)
}

/// Records one successfully sent email back in the store.
///
/// Look-ahead emails flip the reminder's notified flag; deadline emails
/// remove exactly the stored period entry that fired. A reminder deleted
/// between fetch and write-back is not an error.
async fn record_sent(gateway: &dyn ReminderGateway, candidate: &NotificationCandidate) {
    let result = match candidate.category {
        NotificationCategory::UserMessage => {
            gateway.mark_user_notified(candidate.reminder_id).await
        }
        NotificationCategory::DeadlineMessage => match candidate.fired_period {
            Some(fired) => {
                gateway
                    .remove_deadline_period_entry(candidate.reminder_id, fired)
                    .await
            }
            None => {
                tracing::error!(
                    reminder_id = %candidate.reminder_id,
                    "Deadline candidate carries no fired period entry"
                );
                return;
            }
        },
    };

    match result {
        Ok(()) => {}
        Err(e) if e.kind == ErrorKind::NotFound => {
            tracing::debug!(
                reminder_id = %candidate.reminder_id,
                "Reminder gone before write-back"
            );
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                reminder_id = %candidate.reminder_id,
                "Failed to record sent notification, a duplicate email may follow"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use crate::testing::{candidate, FakeDirectory, FakeMailer, FakeStore};

    fn dispatcher(
        store: &Arc<FakeStore>,
        directory: &Arc<FakeDirectory>,
        mailer: &Arc<FakeMailer>,
        concurrency: usize,
    ) -> EmailDispatcher {
        EmailDispatcher::new(
            Arc::clone(store),
            Arc::clone(directory),
            Arc::clone(mailer),
            concurrency,
        )
    }

    #[tokio::test]
    async fn test_sent_look_ahead_email_marks_reminder() {
        let store = Arc::new(FakeStore::default());
        let directory = Arc::new(FakeDirectory::default());
        let mailer = Arc::new(FakeMailer::default());

        let c = candidate(NotificationCategory::UserMessage);
        directory.insert(c.user_id, "ada@example.com", "Ada");

        let stats = dispatcher(&store, &directory, &mailer, 2)
            .dispatch(vec![c.clone()])
            .await;

        assert_eq!(
            stats,
            CycleStats {
                sent: 1,
                failed: 0,
                skipped: 0
            }
        );
        assert_eq!(mailer.sent_count(), 1);
        assert_eq!(*store.marked.lock().unwrap(), vec![c.reminder_id]);
        assert!(store.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sent_deadline_email_removes_exact_period() {
        let store = Arc::new(FakeStore::default());
        let directory = Arc::new(FakeDirectory::default());
        let mailer = Arc::new(FakeMailer::default());

        let fired = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        let mut c = candidate(NotificationCategory::DeadlineMessage);
        c.fired_period = Some(fired);
        directory.insert(c.user_id, "ada@example.com", "Ada");

        let stats = dispatcher(&store, &directory, &mailer, 2)
            .dispatch(vec![c.clone()])
            .await;

        assert_eq!(stats.sent, 1);
        assert_eq!(*store.removed.lock().unwrap(), vec![(c.reminder_id, fired)]);
        assert!(store.marked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_send_leaves_candidate_pending() {
        let store = Arc::new(FakeStore::default());
        let directory = Arc::new(FakeDirectory::default());
        let mailer = Arc::new(FakeMailer::default());

        let c = candidate(NotificationCategory::UserMessage);
        directory.insert(c.user_id, "ada@example.com", "Ada");
        mailer.fail_address("ada@example.com");

        let stats = dispatcher(&store, &directory, &mailer, 2)
            .dispatch(vec![c])
            .await;

        assert_eq!(stats.sent, 0);
        assert_eq!(stats.failed, 1);
        assert_eq!(mailer.sent_count(), 0);
        assert!(store.marked.lock().unwrap().is_empty());
        assert!(store.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_recipient_skips_only_that_candidate() {
        let store = Arc::new(FakeStore::default());
        let directory = Arc::new(FakeDirectory::default());
        let mailer = Arc::new(FakeMailer::default());

        let orphaned = candidate(NotificationCategory::UserMessage);
        let delivered = candidate(NotificationCategory::UserMessage);
        directory.insert(delivered.user_id, "bob@example.com", "Bob");

        let stats = dispatcher(&store, &directory, &mailer, 2)
            .dispatch(vec![orphaned, delivered.clone()])
            .await;

        assert_eq!(
            stats,
            CycleStats {
                sent: 1,
                failed: 0,
                skipped: 1
            }
        );
        assert_eq!(*store.marked.lock().unwrap(), vec![delivered.reminder_id]);
    }

    #[tokio::test]
    async fn test_recipient_lookup_error_skips_only_that_candidate() {
        let store = Arc::new(FakeStore::default());
        let directory = Arc::new(FakeDirectory::default());
        let mailer = Arc::new(FakeMailer::default());

        let failing = candidate(NotificationCategory::UserMessage);
        let delivered = candidate(NotificationCategory::UserMessage);
        directory.insert(delivered.user_id, "bob@example.com", "Bob");
        directory.fail_for(failing.user_id);

        let stats = dispatcher(&store, &directory, &mailer, 2)
            .dispatch(vec![failing, delivered])
            .await;

        assert_eq!(stats.sent, 1);
        assert_eq!(stats.skipped, 1);
    }

    #[tokio::test]
    async fn test_pool_never_exceeds_configured_concurrency() {
        let store = Arc::new(FakeStore::default());
        let directory = Arc::new(FakeDirectory::default());
        let mailer = Arc::new(FakeMailer::with_delay(Duration::from_millis(20)));

        let candidates: Vec<_> = (0..10)
            .map(|i| {
                let c = candidate(NotificationCategory::UserMessage);
                directory.insert(c.user_id, format!("user{i}@example.com"), "User");
                c
            })
            .collect();

        let stats = dispatcher(&store, &directory, &mailer, 3)
            .dispatch(candidates)
            .await;

        assert_eq!(stats.sent, 10);
        assert!(mailer.peak_in_flight() <= 3);
    }

    #[tokio::test]
    async fn test_write_back_on_deleted_reminder_is_benign() {
        let store = Arc::new(FakeStore::default());
        let directory = Arc::new(FakeDirectory::default());
        let mailer = Arc::new(FakeMailer::default());

        let c = candidate(NotificationCategory::UserMessage);
        directory.insert(c.user_id, "ada@example.com", "Ada");
        store.missing.lock().unwrap().push(c.reminder_id);

        let stats = dispatcher(&store, &directory, &mailer, 2)
            .dispatch(vec![c])
            .await;

        // The email still went out; only the marking had nothing to do.
        assert_eq!(stats.sent, 1);
        assert!(store.marked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deadline_candidate_without_period_sends_but_removes_nothing() {
        let store = Arc::new(FakeStore::default());
        let directory = Arc::new(FakeDirectory::default());
        let mailer = Arc::new(FakeMailer::default());

        let c = candidate(NotificationCategory::DeadlineMessage);
        assert!(c.fired_period.is_none());
        directory.insert(c.user_id, "ada@example.com", "Ada");

        let stats = dispatcher(&store, &directory, &mailer, 2)
            .dispatch(vec![c])
            .await;

        assert_eq!(stats.sent, 1);
        assert!(store.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cycle_is_a_no_op() {
        let store = Arc::new(FakeStore::default());
        let directory = Arc::new(FakeDirectory::default());
        let mailer = Arc::new(FakeMailer::default());

        let stats = dispatcher(&store, &directory, &mailer, 2)
            .dispatch(Vec::new())
            .await;

        assert_eq!(stats, CycleStats::default());
        assert_eq!(mailer.sent_count(), 0);
    }
}
