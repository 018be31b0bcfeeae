use std::env;

use crate::error::{EmitterError, Result};

pub const DEFAULT_LOG_TRUNCATE_LEN: usize = 64;
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Characters of `init_img` / `init_mask` kept in activity-log copies.
    pub log_truncate_len: usize,
    pub mirror_activity: bool,
    pub timestamp_format: String,
    pub server_addr: Option<String>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        EmitterConfig {
            log_truncate_len: DEFAULT_LOG_TRUNCATE_LEN,
            mirror_activity: true,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            server_addr: None,
        }
    }
}

impl EmitterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let mut config = EmitterConfig::default();

        if let Ok(raw) = env::var("GENBRIDGE_LOG_TRUNCATE_LEN") {
            config.log_truncate_len = raw.parse().map_err(|_| {
                EmitterError::ConfigError(format!(
                    "GENBRIDGE_LOG_TRUNCATE_LEN must be a positive integer, got {:?}",
                    raw
                ))
            })?;
        }
        config.mirror_activity = env::var("GENBRIDGE_MIRROR_ACTIVITY")
            .ok()
            .map_or(true, |val| val != "false" && val != "0");
        if let Ok(format) = env::var("GENBRIDGE_TIMESTAMP_FORMAT") {
            config.timestamp_format = format;
        }
        config.server_addr = env::var("GENBRIDGE_SERVER_ADDR").ok();

        config.validate()?;
        Ok(config)
    }

    pub fn with_log_truncate_len(mut self, len: usize) -> Self {
        self.log_truncate_len = len;
        self
    }

    pub fn with_activity_mirroring(mut self, enabled: bool) -> Self {
        self.mirror_activity = enabled;
        self
    }

    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn with_server_addr(mut self, addr: impl Into<String>) -> Self {
        self.server_addr = Some(addr.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_truncate_len == 0 {
            return Err(EmitterError::ConfigError(
                "log truncation length must be greater than zero".into(),
            ));
        }
        if self.timestamp_format.trim().is_empty() {
            return Err(EmitterError::ConfigError(
                "timestamp format must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_sixty_four_characters() {
        let config = EmitterConfig::new();
        assert_eq!(config.log_truncate_len, 64);
        assert!(config.mirror_activity);
        assert!(config.server_addr.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builders_override_fields() {
        let config = EmitterConfig::new()
            .with_log_truncate_len(16)
            .with_activity_mirroring(false)
            .with_server_addr("127.0.0.1:9090");
        assert_eq!(config.log_truncate_len, 16);
        assert!(!config.mirror_activity);
        assert_eq!(config.server_addr.as_deref(), Some("127.0.0.1:9090"));
    }

    #[test]
    fn zero_truncation_is_rejected() {
        let config = EmitterConfig::new().with_log_truncate_len(0);
        assert!(matches!(
            config.validate(),
            Err(EmitterError::ConfigError(_))
        ));
    }
}
