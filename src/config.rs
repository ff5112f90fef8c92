#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub auth_url: String,
    pub tasks_url: String,
    pub breaker_failure_threshold: u32,
    pub breaker_recovery_timeout_ms: u64,
    pub upstream_timeout_ms: u64,
}

impl NotifierConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("NOTIFIER_AUTH_URL")
            && !value.trim().is_empty()
        {
            config.auth_url = value;
        }
        if let Ok(value) = std::env::var("NOTIFIER_TASKS_URL")
            && !value.trim().is_empty()
        {
            config.tasks_url = value;
        }
        if let Ok(value) = std::env::var("NOTIFIER_BREAKER_FAILURE_THRESHOLD")
            && let Ok(parsed) = value.parse::<u32>()
        {
            config.breaker_failure_threshold = parsed.max(1);
        }
        if let Ok(value) = std::env::var("NOTIFIER_BREAKER_RECOVERY_TIMEOUT_MS")
            && let Ok(parsed) = value.parse::<u64>()
        {
            config.breaker_recovery_timeout_ms = parsed;
        }
        if let Ok(value) = std::env::var("NOTIFIER_UPSTREAM_TIMEOUT_MS")
            && let Ok(parsed) = value.parse::<u64>()
        {
            config.upstream_timeout_ms = parsed.max(1);
        }

        config
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            auth_url: "http://127.0.0.1:5000".to_string(),
            tasks_url: "http://127.0.0.1:5001".to_string(),
            breaker_failure_threshold: 3,
            breaker_recovery_timeout_ms: 20_000,
            upstream_timeout_ms: 5_000,
        }
    }
}
