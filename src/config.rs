use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub collector: CollectorConfig,
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    /// Seconds between collection cycles.
    pub interval_secs: u64,
    /// Wait between the "previous" and "last" CPU captures.
    pub cpu_sample_delay_ms: u64,
    #[serde(default = "default_procfs_path")]
    pub procfs_path: String,
    #[serde(default = "default_sysfs_path")]
    pub sysfs_path: String,
    /// How often to log cycle/export counters at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

fn default_procfs_path() -> String {
    "/proc".into()
}

fn default_sysfs_path() -> String {
    "/sys".into()
}

fn default_stats_log_interval_secs() -> u64 {
    3600
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_timeout_secs() -> u64 {
    10
}

/// Upper bound for `collector.interval_secs` (one week).
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 3600;

/// Environment variable overriding `delivery.endpoint`.
pub const ENDPOINT_ENV: &str = "HOST";

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        let mut config: AppConfig = toml::from_str(&s)?;
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV)
            && !endpoint.trim().is_empty()
        {
            config.delivery.endpoint = endpoint.trim().to_string();
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.collector.interval_secs > 0,
            "collector.interval_secs must be > 0, got {}",
            self.collector.interval_secs
        );
        anyhow::ensure!(
            self.collector.interval_secs <= MAX_INTERVAL_SECS,
            "collector.interval_secs must be at most {}, got {}",
            MAX_INTERVAL_SECS,
            self.collector.interval_secs
        );
        anyhow::ensure!(
            self.collector.cpu_sample_delay_ms > 0,
            "collector.cpu_sample_delay_ms must be > 0, got {}",
            self.collector.cpu_sample_delay_ms
        );
        anyhow::ensure!(
            self.collector.cpu_sample_delay_ms < self.collector.interval_secs.saturating_mul(1000),
            "collector.cpu_sample_delay_ms must be shorter than collector.interval_secs, got {} ms",
            self.collector.cpu_sample_delay_ms
        );
        anyhow::ensure!(
            !self.collector.procfs_path.is_empty(),
            "collector.procfs_path must be non-empty"
        );
        anyhow::ensure!(
            !self.collector.sysfs_path.is_empty(),
            "collector.sysfs_path must be non-empty"
        );
        anyhow::ensure!(
            self.collector.stats_log_interval_secs > 0,
            "collector.stats_log_interval_secs must be > 0, got {}",
            self.collector.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.delivery.endpoint.starts_with("http://")
                || self.delivery.endpoint.starts_with("https://"),
            "delivery.endpoint must be an http(s) URL, got {:?}",
            self.delivery.endpoint
        );
        anyhow::ensure!(
            self.delivery.timeout_secs > 0,
            "delivery.timeout_secs must be > 0, got {}",
            self.delivery.timeout_secs
        );
        Ok(())
    }
}
