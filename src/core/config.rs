//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::core::errors::Result;

/// Default Intento API host
pub const DEFAULT_HOST: &str = "api.inten.to";

/// Default delay between async operation polls
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Environment prefix read by [`ConnectorConfig::load`]
pub const ENV_PREFIX: &str = "INTENTO";

/// API key and optional host override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Key sent in the `apikey` header
    pub api_key: String,
    /// Host override, `api.inten.to` when unset
    pub host: Option<String>,
}

impl Credentials {
    /// Credentials for the default host
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: None,
        }
    }

    /// Send requests to another host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Host requests go to, falling back to [`DEFAULT_HOST`]
    pub fn host(&self) -> &str {
        self.host
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_HOST)
    }
}

impl From<&str> for Credentials {
    fn from(api_key: &str) -> Self {
        Self::new(api_key)
    }
}

impl From<String> for Credentials {
    fn from(api_key: String) -> Self {
        Self::new(api_key)
    }
}

/// Behaviour switches read by the client on every call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Log request and response details
    pub debug: bool,
    /// More logging, mostly for the CLI
    pub verbose: bool,
    /// Log an equivalent curl command for each request
    pub curl: bool,
    /// Resolve with the would-be request instead of sending it
    pub dry_run: bool,
    /// Tag prepended to the User-Agent header
    pub user_agent: Option<String>,
    /// Pause before each operation poll
    pub poll_interval_ms: u64,
    /// Upper bound on operation polls, unbounded when `None`
    pub max_poll_attempts: Option<u32>,
    /// Per-request timeout, none by default
    pub timeout_ms: Option<u64>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            debug: false,
            verbose: false,
            curl: false,
            dry_run: false,
            user_agent: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_poll_attempts: None,
            timeout_ms: None,
        }
    }
}

impl ClientOptions {
    /// Options with dry run enabled
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Default::default()
        }
    }

    /// Debug or verbose logging requested
    pub fn logs_requests(&self) -> bool {
        self.debug || self.verbose
    }
}

/// Flat configuration as read from a file and `INTENTO_*` variables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Intento API key
    pub api_key: String,
    /// API host
    #[serde(alias = "api_host")]
    pub host: String,
    /// User-Agent tag
    pub user_agent: Option<String>,
    /// Log requests and responses
    pub debug: bool,
    /// Verbose logging
    pub verbose: bool,
    /// Log curl commands
    pub curl: bool,
    /// Do not send requests
    pub dry_run: bool,
    /// Pause between operation polls
    pub poll_interval_ms: u64,
    /// Poll limit
    pub max_poll_attempts: Option<u32>,
    /// Per-request timeout
    pub timeout_ms: Option<u64>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: DEFAULT_HOST.to_string(),
            user_agent: None,
            debug: false,
            verbose: false,
            curl: false,
            dry_run: false,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_poll_attempts: None,
            timeout_ms: None,
        }
    }
}

impl ConnectorConfig {
    /// Load from an optional config file overlaid with `INTENTO_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_sources(path, ENV_PREFIX)
    }

    fn from_sources(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!("Reading connector config from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let config: Self = builder
            .add_source(config::Environment::with_prefix(env_prefix))
            .build()?
            .try_deserialize()?;

        if config.api_key.is_empty() {
            warn!("No API key found in config file or {}_API_KEY", env_prefix);
        }

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Split into the values the client is built from
    pub fn into_parts(self) -> (Credentials, ClientOptions) {
        let credentials = Credentials {
            api_key: self.api_key,
            host: Some(self.host).filter(|h| !h.is_empty()),
        };
        let options = ClientOptions {
            debug: self.debug,
            verbose: self.verbose,
            curl: self.curl,
            dry_run: self.dry_run,
            user_agent: self.user_agent,
            poll_interval_ms: self.poll_interval_ms,
            max_poll_attempts: self.max_poll_attempts,
            timeout_ms: self.timeout_ms,
        };
        (credentials, options)
    }
}
