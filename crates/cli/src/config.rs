//! CLI configuration loaded from environment variables.

use std::time::Duration;

use polymuse_queue::poller::DEFAULT_POLL_INTERVAL;

/// Runtime configuration for the queue watcher.
///
/// All fields except the API URL have defaults suitable for local
/// development against a dev platform instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the platform API (e.g. `https://api.polymuse.dev`).
    pub api_url: String,
    /// Bearer token sent with every request, if set.
    pub api_token: Option<String>,
    /// Workspace whose generation queue is watched.
    pub workspace_id: String,
    /// Reconciliation poll interval while generations are pending.
    pub poll_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `POLYMUSE_API_URL`      | `http://localhost:3000`  |
    /// | `POLYMUSE_API_TOKEN`    | unset                    |
    /// | `POLYMUSE_WORKSPACE`    | `default`                |
    /// | `POLL_INTERVAL_SECS`    | `2`                      |
    pub fn from_env() -> Self {
        let api_url = std::env::var("POLYMUSE_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into());

        let api_token = std::env::var("POLYMUSE_API_TOKEN").ok();

        let workspace_id =
            std::env::var("POLYMUSE_WORKSPACE").unwrap_or_else(|_| "default".into());

        let poll_interval = match std::env::var("POLL_INTERVAL_SECS") {
            Ok(secs) => Duration::from_secs(
                secs.parse()
                    .expect("POLL_INTERVAL_SECS must be a valid u64"),
            ),
            Err(_) => DEFAULT_POLL_INTERVAL,
        };

        Self {
            api_url,
            api_token,
            workspace_id,
            poll_interval,
        }
    }
}
