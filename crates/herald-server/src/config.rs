use std::path::PathBuf;

use anyhow::Context;

/// Server settings, read from `HERALD_*` environment variables.
///
/// `host` may be an IP literal or a hostname; it is resolved at bind time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_path: PathBuf,
    /// JSON subscriber list. The built-in table is used when unset.
    pub directory_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("HERALD_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("HERALD_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("HERALD_PORT must be a port number, got '{}'", raw))?,
            None => 8080,
        };
        let log_path = lookup("HERALD_LOG_PATH")
            .unwrap_or_else(|| "logs.txt".into())
            .into();
        let directory_path = lookup("HERALD_DIRECTORY_PATH")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            log_path,
            directory_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_path, PathBuf::from("logs.txt"));
        assert_eq!(config.directory_path, None);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("HERALD_HOST", "127.0.0.1"),
            ("HERALD_PORT", "9000"),
            ("HERALD_LOG_PATH", "/var/log/herald/audit.txt"),
            ("HERALD_DIRECTORY_PATH", "subscribers.json"),
        ])
        .unwrap();
        assert_eq!((config.host.as_str(), config.port), ("127.0.0.1", 9000));
        assert_eq!(config.log_path, PathBuf::from("/var/log/herald/audit.txt"));
        assert_eq!(config.directory_path, Some(PathBuf::from("subscribers.json")));
    }

    #[test]
    fn hostname_is_kept_for_resolution() {
        let config = config(&[("HERALD_HOST", "localhost")]).unwrap();
        assert_eq!(config.host, "localhost");
    }

    #[test]
    fn bad_port_is_rejected() {
        assert!(config(&[("HERALD_PORT", "eighty")]).is_err());
    }
}
