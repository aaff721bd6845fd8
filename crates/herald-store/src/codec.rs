//! Line encoding for the audit log.
//!
//! One record per line, written as `Key: Value` segments joined by `|`:
//!
//! ```text
//! Timestamp: 2024-05-01T10:00:00Z|Category: Sports|Notification Type: SMS|Message: hi|ID: 5f0c…|UserID: 1
//! ```
//!
//! Nothing is escaped. A message containing `|` produces a line that will not
//! read back; existing log files depend on this exact layout, so it stays.

use chrono::{DateTime, SecondsFormat, Utc};
use herald_types::{Category, Channel, LogRecord};

const FIELD_DELIMITER: char = '|';
const KEY_VALUE_DELIMITER: &str = ": ";

const KEY_TIMESTAMP: &str = "Timestamp";
const KEY_CATEGORY: &str = "Category";
const KEY_NOTIFICATION_TYPE: &str = "Notification Type";
const KEY_MESSAGE: &str = "Message";
const KEY_ID: &str = "ID";
const KEY_USER_ID: &str = "UserID";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("segment '{0}' is not a 'Key: Value' pair")]
    MalformedSegment(String),

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("invalid user id '{0}'")]
    InvalidUserId(String),

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("unknown notification type '{0}'")]
    UnknownChannel(String),
}

/// Encodes a record as a single line, without the trailing newline.
pub fn encode_line(record: &LogRecord) -> String {
    format!(
        "{KEY_TIMESTAMP}: {}|{KEY_CATEGORY}: {}|{KEY_NOTIFICATION_TYPE}: {}|{KEY_MESSAGE}: {}|{KEY_ID}: {}|{KEY_USER_ID}: {}",
        record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        record.category,
        record.notification_type,
        record.message,
        record.id,
        record.user_id,
    )
}

/// Decodes one line produced by [`encode_line`].
///
/// Unrecognised keys are ignored. Any segment without a `": "` separator
/// rejects the whole line. `Timestamp`, `Category`, `Notification Type`,
/// `ID` and a numeric `UserID` are required; `Message` may be absent.
/// A rejected line is only ever skipped by the reader, never fatal to it.
pub fn decode_line(line: &str) -> Result<LogRecord, ParseError> {
    let mut timestamp = None;
    let mut category = None;
    let mut notification_type = None;
    let mut message = None;
    let mut id = None;
    let mut user_id = None;

    for segment in line.split(FIELD_DELIMITER) {
        let (key, raw_value) = segment
            .split_once(KEY_VALUE_DELIMITER)
            .ok_or_else(|| ParseError::MalformedSegment(segment.to_string()))?;
        let value = raw_value.trim();

        match key.trim() {
            KEY_TIMESTAMP => {
                let parsed = DateTime::parse_from_rfc3339(value)
                    .map_err(|_| ParseError::InvalidTimestamp(value.to_string()))?;
                timestamp = Some(parsed.with_timezone(&Utc));
            }
            KEY_CATEGORY => {
                let parsed = value
                    .parse::<Category>()
                    .map_err(|_| ParseError::UnknownCategory(value.to_string()))?;
                category = Some(parsed);
            }
            KEY_NOTIFICATION_TYPE => notification_type = Some(parse_channel(value)?),
            // Kept verbatim so messages with surrounding whitespace survive.
            KEY_MESSAGE => message = Some(raw_value.to_string()),
            KEY_ID => id = Some(value.to_string()),
            KEY_USER_ID => {
                let parsed = value
                    .parse::<i64>()
                    .map_err(|_| ParseError::InvalidUserId(value.to_string()))?;
                user_id = Some(parsed);
            }
            _ => {}
        }
    }

    Ok(LogRecord {
        id: id.ok_or(ParseError::MissingField(KEY_ID))?,
        user_id: user_id.ok_or(ParseError::MissingField(KEY_USER_ID))?,
        message: message.unwrap_or_default(),
        category: category.ok_or(ParseError::MissingField(KEY_CATEGORY))?,
        notification_type: notification_type
            .ok_or(ParseError::MissingField(KEY_NOTIFICATION_TYPE))?,
        timestamp: timestamp.ok_or(ParseError::MissingField(KEY_TIMESTAMP))?,
    })
}

/// Older log files label email and push deliveries differently.
fn parse_channel(value: &str) -> Result<Channel, ParseError> {
    match value {
        "E-Mail" => Ok(Channel::Email),
        "Push Notification" => Ok(Channel::Push),
        other => other
            .parse()
            .map_err(|_| ParseError::UnknownChannel(other.to_string())),
    }
}
