//! In-memory fakes shared by the dispatcher and runner tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use duetick_core::types::{ReminderId, UserId};
use duetick_core::{AppError, AppResult};
use duetick_entity::notification::{NotificationCandidate, NotificationCategory};
use duetick_entity::user::Recipient;
use duetick_mailer::{EmailMessage, MailError, Mailer};

use crate::gateway::{ReminderGateway, UserDirectory};

/// A fresh candidate with random ids and a fixed deadline.
pub(crate) fn candidate(category: NotificationCategory) -> NotificationCandidate {
    NotificationCandidate {
        reminder_id: ReminderId::new(),
        user_id: UserId::new(),
        title: "Quarterly report".to_string(),
        description: "Send the figures to finance".to_string(),
        deadline: Utc.with_ymd_and_hms(2025, 6, 30, 17, 0, 0).unwrap(),
        category,
        fired_period: None,
    }
}

/// Reminder store fake recording every write-back.
#[derive(Default)]
pub(crate) struct FakeStore {
    pub user_candidates: Mutex<Vec<NotificationCandidate>>,
    pub deadline_candidates: Mutex<Vec<NotificationCandidate>>,
    /// When set, both fetches fail.
    pub fail_fetch: bool,
    /// Reminder ids whose write-back reports not-found.
    pub missing: Mutex<Vec<ReminderId>>,
    pub marked: Mutex<Vec<ReminderId>>,
    pub removed: Mutex<Vec<(ReminderId, DateTime<Utc>)>>,
}

#[async_trait]
impl ReminderGateway for FakeStore {
    async fn user_notification_candidates(
        &self,
        _now: DateTime<Utc>,
    ) -> AppResult<Vec<NotificationCandidate>> {
        if self.fail_fetch {
            return Err(AppError::database("injected fetch failure"));
        }
        Ok(self.user_candidates.lock().unwrap().clone())
    }

    async fn deadline_notification_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<(Vec<NotificationCandidate>, DateTime<Utc>)> {
        if self.fail_fetch {
            return Err(AppError::database("injected fetch failure"));
        }
        Ok((self.deadline_candidates.lock().unwrap().clone(), now))
    }

    async fn mark_user_notified(&self, reminder_id: ReminderId) -> AppResult<()> {
        if self.missing.lock().unwrap().contains(&reminder_id) {
            return Err(AppError::not_found("reminder gone"));
        }
        self.marked.lock().unwrap().push(reminder_id);
        Ok(())
    }

    async fn remove_deadline_period_entry(
        &self,
        reminder_id: ReminderId,
        fired_period: DateTime<Utc>,
    ) -> AppResult<()> {
        if self.missing.lock().unwrap().contains(&reminder_id) {
            return Err(AppError::not_found("reminder gone"));
        }
        self.removed.lock().unwrap().push((reminder_id, fired_period));
        Ok(())
    }
}

/// User directory fake.
#[derive(Default)]
pub(crate) struct FakeDirectory {
    recipients: Mutex<HashMap<UserId, Recipient>>,
    failing: Mutex<Vec<UserId>>,
}

impl FakeDirectory {
    pub fn insert(
        &self,
        user_id: UserId,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) {
        self.recipients.lock().unwrap().insert(
            user_id,
            Recipient {
                email: email.into(),
                display_name: display_name.into(),
            },
        );
    }

    pub fn fail_for(&self, user_id: UserId) {
        self.failing.lock().unwrap().push(user_id);
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn find_recipient(&self, user_id: UserId) -> AppResult<Option<Recipient>> {
        if self.failing.lock().unwrap().contains(&user_id) {
            return Err(AppError::database("injected directory failure"));
        }
        Ok(self.recipients.lock().unwrap().get(&user_id).cloned())
    }
}

/// Mailer fake tracking sends and peak in-flight concurrency.
#[derive(Default)]
pub(crate) struct FakeMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    fail_to: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    delay: Option<Duration>,
}

impl FakeMailer {
    /// A mailer whose sends take `delay`, for concurrency observations.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Makes every send to `address` fail.
    pub fn fail_address(&self, address: &str) {
        self.fail_to.lock().unwrap().push(address.to_string());
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), MailError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        {
            let fail_to = self.fail_to.lock().unwrap();
            if let Some(address) = email.to.iter().find(|t| fail_to.contains(*t)) {
                return Err(MailError::Address {
                    address: address.clone(),
                    reason: "rejected by fake transport".to_string(),
                });
            }
        }

        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
