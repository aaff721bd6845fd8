//! Herald dispatch: turns a notification request into per-channel deliveries
//! and their audit records.
//!
//! - `directory`: who is subscribed to a category, and on which channels
//! - `notifier`: one delivery capability per channel (SMS, Email, Push)
//! - `engine`: the fan-out loop that ties both to a `LogStore`

pub mod directory;
pub mod engine;
pub mod notifier;

pub use directory::{DirectoryError, StaticDirectory, UserDirectory};
pub use engine::{DispatchEngine, DispatchError};
pub use notifier::{ChannelNotifier, EmailNotifier, NotifyError, PushNotifier, SmsNotifier};
