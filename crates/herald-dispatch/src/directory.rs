use std::collections::HashMap;
use std::path::{Path, PathBuf};

use herald_types::{Category, Subscriber};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read subscriber directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid subscriber directory {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolves the subscribers of a category, in delivery order.
pub trait UserDirectory: Send + Sync {
    fn resolve(&self, category: Category) -> Vec<Subscriber>;
}

/// In-memory directory keyed by category.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    by_category: HashMap<Category, Vec<Subscriber>>,
}

impl StaticDirectory {
    /// Indexes each subscriber under every category it subscribes to.
    /// Order within a category follows the order of `subscribers`.
    pub fn from_subscribers(subscribers: Vec<Subscriber>) -> Self {
        let mut by_category: HashMap<Category, Vec<Subscriber>> = HashMap::new();
        for subscriber in subscribers {
            for category in &subscriber.subscribed {
                by_category
                    .entry(*category)
                    .or_default()
                    .push(subscriber.clone());
            }
        }
        Self { by_category }
    }

    /// Loads a JSON array of subscribers.
    pub fn load_json(path: &Path) -> Result<Self, DirectoryError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DirectoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let subscribers: Vec<Subscriber> =
            serde_json::from_str(&raw).map_err(|source| DirectoryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Loaded {} subscribers from {}", subscribers.len(), path.display());
        Ok(Self::from_subscribers(subscribers))
    }

    /// The table shipped with the server.
    pub fn builtin() -> Self {
        Self::from_subscribers(vec![
            subscriber(
                1,
                "Mary Alexander",
                "mary.alexander@outlook.com",
                "78958745",
                Category::Sports,
                &["SMS", "Email", "Push"],
            ),
            subscriber(
                2,
                "Antony Smith",
                "antony.smith@gmail.com",
                "4134132441",
                Category::Finance,
                &["Email", "Push"],
            ),
            subscriber(
                3,
                "Any Johnson",
                "any.johnson@gmail.com",
                "+123456789",
                Category::Movies,
                &["SMS", "Email"],
            ),
            subscriber(
                4,
                "Fred Williams",
                "fred.williams@hotmail.com",
                "78459214465",
                Category::Movies,
                &["Email"],
            ),
        ])
    }
}

impl UserDirectory for StaticDirectory {
    fn resolve(&self, category: Category) -> Vec<Subscriber> {
        self.by_category.get(&category).cloned().unwrap_or_default()
    }
}

fn subscriber(
    id: i64,
    name: &str,
    email: &str,
    phone_number: &str,
    category: Category,
    channels: &[&str],
) -> Subscriber {
    Subscriber {
        id,
        name: name.to_string(),
        email: email.to_string(),
        phone_number: phone_number.to_string(),
        subscribed: vec![category],
        channels: channels.iter().map(|c| c.to_string()).collect(),
    }
}
