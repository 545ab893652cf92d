use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Quiet window after the first file of a coalesced batch (seconds).
    #[serde(default = "default_quiet_window_secs")]
    pub quiet_window_secs: u64,
}

fn default_quiet_window_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Max accepted upload size in bytes.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    /// Capacity of the flush-result channel (slow consumers apply backpressure
    /// to flushing sessions, never to arrivals).
    #[serde(default = "default_flush_channel_capacity")]
    pub flush_channel_capacity: usize,
}

fn default_max_file_bytes() -> u64 {
    50 * 1024 * 1024
}

fn default_flush_channel_capacity() -> usize {
    16
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.session.quiet_window_secs > 0,
            "session.quiet_window_secs must be > 0, got {}",
            self.session.quiet_window_secs
        );
        anyhow::ensure!(
            self.limits.max_file_bytes > 0,
            "limits.max_file_bytes must be > 0, got {}",
            self.limits.max_file_bytes
        );
        anyhow::ensure!(
            self.limits.flush_channel_capacity > 0,
            "limits.flush_channel_capacity must be > 0, got {}",
            self.limits.flush_channel_capacity
        );
        Ok(())
    }
}
