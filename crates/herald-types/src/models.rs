use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A label that is not part of a closed set (category or channel).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// Notification topics users can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Sports,
    Finance,
    Movies,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Sports, Category::Finance, Category::Movies];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sports => "Sports",
            Self::Finance => "Finance",
            Self::Movies => "Movies",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Delivery medium. The label doubles as the `Notification Type` of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "SMS")]
    Sms,
    Email,
    Push,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Sms, Channel::Email, Channel::Push];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sms => "SMS",
            Self::Email => "Email",
            Self::Push => "Push",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Channel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "channel",
                value: s.to_string(),
            })
    }
}

/// A user eligible to receive notifications.
///
/// `channels` keeps raw labels in preference order. Labels that don't name a
/// known [`Channel`] are kept as-is and skipped at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub subscribed: Vec<Category>,
    pub channels: Vec<String>,
}

/// Audit entry for one (user, channel) delivery.
///
/// Field names on the wire match what existing audit clients read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "UserID")]
    pub user_id: i64,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Category")]
    pub category: Category,
    #[serde(rename = "NotificationType")]
    pub notification_type: Channel,
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// Mints a record with a fresh id, stamped now.
    ///
    /// The timestamp is truncated to whole seconds, the precision the log
    /// file keeps, so a record reads back exactly as it was returned.
    pub fn new(user_id: i64, message: &str, category: Category, channel: Channel) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            message: message.to_string(),
            category,
            notification_type: channel,
            timestamp: Utc::now().trunc_subsecs(0),
        }
    }
}
