use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Seconds between background reminder passes.
    #[serde(default = "default_reminder_tick_secs")]
    pub reminder_tick_secs: u64,

    /// Disable to run reminders only through the manual trigger
    /// endpoint (useful in tests and staging).
    #[serde(default = "default_reminder_loop_enabled")]
    pub reminder_loop_enabled: bool,

    /// Load the demo organization and alerts on startup.
    #[serde(default)]
    pub seed_on_start: bool,

    /// Allowed CORS origins; empty allows all origins (dev mode).
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

fn default_http_port() -> u16 {
    8080
}

fn default_reminder_tick_secs() -> u64 {
    60
}

fn default_reminder_loop_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            reminder_tick_secs: default_reminder_tick_secs(),
            reminder_loop_enabled: default_reminder_loop_enabled(),
            seed_on_start: false,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
