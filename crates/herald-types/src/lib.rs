pub mod api;
pub mod models;

pub use models::{Category, Channel, LogRecord, Subscriber, UnknownLabel};
