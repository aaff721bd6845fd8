use std::collections::HashMap;
use std::sync::Arc;

use herald_store::{LogStore, StoreError};
use herald_types::{Category, Channel, LogRecord, Subscriber};
use tracing::{debug, info, info_span, warn};

use crate::directory::UserDirectory;
use crate::notifier::{ChannelNotifier, EmailNotifier, NotifyError, PushNotifier, SmsNotifier};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{channel} delivery to user {user_id} failed: {source}")]
    Channel {
        channel: Channel,
        user_id: i64,
        #[source]
        source: NotifyError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fans notifications out to subscribers and keeps the audit log.
///
/// Cheap to clone; all collaborators are shared.
#[derive(Clone)]
pub struct DispatchEngine {
    directory: Arc<dyn UserDirectory>,
    store: Arc<dyn LogStore>,
    notifiers: HashMap<Channel, Arc<dyn ChannelNotifier>>,
}

impl DispatchEngine {
    /// An engine with no notifiers; every channel is skipped until one is registered.
    pub fn new(directory: Arc<dyn UserDirectory>, store: Arc<dyn LogStore>) -> Self {
        Self {
            directory,
            store,
            notifiers: HashMap::new(),
        }
    }

    /// Registers `notifier` for the channel it reports, replacing any previous one.
    pub fn with_notifier(mut self, notifier: Arc<dyn ChannelNotifier>) -> Self {
        self.notifiers.insert(notifier.channel(), notifier);
        self
    }

    /// Registers the logging stubs for SMS, Email and Push.
    pub fn with_default_notifiers(self) -> Self {
        self.with_notifier(Arc::new(SmsNotifier))
            .with_notifier(Arc::new(EmailNotifier))
            .with_notifier(Arc::new(PushNotifier))
    }

    /// Delivers `message` to every subscriber of `category` on each of their
    /// channels, in directory and preference order, and returns one record
    /// per delivery.
    ///
    /// An unknown category reaches nobody and is not an error. The first
    /// failed delivery aborts the call; records appended before it remain in
    /// the store.
    pub fn send(&self, category: &str, message: &str) -> Result<Vec<LogRecord>, DispatchError> {
        let span = info_span!("dispatch", category);
        let _enter = span.enter();

        let Ok(category) = category.parse::<Category>() else {
            debug!("Unknown category, nothing to dispatch");
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for subscriber in self.directory.resolve(category) {
            for notifier in self.notifiers_for(&subscriber) {
                let channel = notifier.channel();
                if let Err(source) = notifier.send_notification(&subscriber, message) {
                    warn!(user_id = subscriber.id, %channel, "Delivery failed: {}", source);
                    return Err(DispatchError::Channel {
                        channel,
                        user_id: subscriber.id,
                        source,
                    });
                }

                let record = LogRecord::new(subscriber.id, message, category, channel);
                self.store.append(&record)?;
                records.push(record);
            }
        }

        info!(records = records.len(), "Notification dispatched");
        Ok(records)
    }

    pub fn list_logs(&self) -> Result<Vec<LogRecord>, StoreError> {
        self.store.read_all()
    }

    pub fn clear_logs(&self) -> Result<(), StoreError> {
        self.store.clear()
    }

    fn notifiers_for(&self, subscriber: &Subscriber) -> Vec<Arc<dyn ChannelNotifier>> {
        subscriber
            .channels
            .iter()
            .filter_map(|label| {
                let notifier = label
                    .parse::<Channel>()
                    .ok()
                    .and_then(|channel| self.notifiers.get(&channel));
                if notifier.is_none() {
                    debug!(user_id = subscriber.id, "Skipping unsupported channel '{}'", label);
                }
                notifier.cloned()
            })
            .collect()
    }
}
