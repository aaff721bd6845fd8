use herald_types::{Channel, Subscriber};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("delivery rejected: {0}")]
    Rejected(String),
}

/// A delivery medium. The channel it reports is what gets written as the
/// record's notification type.
#[cfg_attr(test, mockall::automock)]
pub trait ChannelNotifier: Send + Sync {
    fn channel(&self) -> Channel;

    fn send_notification(&self, subscriber: &Subscriber, message: &str) -> Result<(), NotifyError>;
}

/// SMS stub: logs instead of contacting a carrier.
pub struct SmsNotifier;

impl ChannelNotifier for SmsNotifier {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    fn send_notification(&self, subscriber: &Subscriber, message: &str) -> Result<(), NotifyError> {
        info!(
            channel = "SMS",
            to = %subscriber.phone_number,
            "Sending SMS notification to {}: {}",
            subscriber.name,
            message,
        );
        Ok(())
    }
}

/// Email stub: logs instead of talking to an SMTP relay.
pub struct EmailNotifier;

impl ChannelNotifier for EmailNotifier {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    fn send_notification(&self, subscriber: &Subscriber, message: &str) -> Result<(), NotifyError> {
        info!(
            channel = "Email",
            to = %subscriber.email,
            "Sending email notification to {}: {}",
            subscriber.name,
            message,
        );
        Ok(())
    }
}

/// Push stub. Push targets the user's devices, so no contact field is needed.
pub struct PushNotifier;

impl ChannelNotifier for PushNotifier {
    fn channel(&self) -> Channel {
        Channel::Push
    }

    fn send_notification(&self, subscriber: &Subscriber, message: &str) -> Result<(), NotifyError> {
        info!(
            channel = "Push",
            user_id = subscriber.id,
            "Sending push notification to {}: {}",
            subscriber.name,
            message,
        );
        Ok(())
    }
}
