//! Notification worker main loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;

use duetick_core::config::WorkerConfig;

use crate::dispatcher::EmailDispatcher;
use crate::gateway::ReminderGateway;

/// Polls the reminder store on a fixed interval and dispatches due
/// notification emails.
pub struct NotifierRunner {
    /// Candidate source.
    gateway: Arc<dyn ReminderGateway>,
    /// Send pool.
    dispatcher: EmailDispatcher,
    /// Worker configuration.
    config: WorkerConfig,
}

impl NotifierRunner {
    /// Creates a new runner.
    pub fn new(
        gateway: Arc<dyn ReminderGateway>,
        dispatcher: EmailDispatcher,
        config: WorkerConfig,
    ) -> Self {
        Self {
            gateway,
            dispatcher,
            config,
        }
    }

    /// Runs until the cancel signal flips to `true`.
    ///
    /// A cycle always runs to completion; cancellation is observed
    /// between cycles, so in-flight sends are joined rather than dropped.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            concurrency = self.config.concurrency,
            poll_interval_seconds = self.config.poll_interval_seconds,
            "Notification worker started"
        );

        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds);

        loop {
            self.run_cycle().await;

            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Notification worker received shutdown signal");
                        break;
                    }
                }
                _ = time::sleep(poll_interval) => {}
            }
        }

        tracing::info!("Notification worker shut down");
    }

    /// One poll cycle: fetch both candidate categories, dispatch, record.
    ///
    /// A fetch failure aborts only this cycle; the next tick starts from
    /// a clean read of the store.
    pub(crate) async fn run_cycle(&self) {
        let now = Utc::now();

        let user_candidates = match self.gateway.user_notification_candidates(now).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch look-ahead candidates, aborting cycle");
                return;
            }
        };

        let (deadline_candidates, boundary) =
            match self.gateway.deadline_notification_candidates(now).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to fetch deadline candidates, aborting cycle");
                    return;
                }
            };

        if user_candidates.is_empty() && deadline_candidates.is_empty() {
            tracing::debug!("No notifications due");
            return;
        }

        tracing::debug!(
            look_ahead = user_candidates.len(),
            deadline = deadline_candidates.len(),
            boundary = %boundary,
            "Dispatching notification emails"
        );

        let mut candidates = user_candidates;
        candidates.extend(deadline_candidates);

        let stats = self.dispatcher.dispatch(candidates).await;

        tracing::info!(
            sent = stats.sent,
            failed = stats.failed,
            skipped = stats.skipped,
            "Notification cycle complete"
        );
    }
}
