//! Configuration for the statistic endpoints.

use std::time::Duration;

/// Seconds a job may run before the engine terminates it.
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 600;

/// Endpoint configuration, injected into the application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Timeout handed to the engine on every enqueue.
    pub job_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            job_timeout: Duration::from_secs(DEFAULT_JOB_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Read configuration from the environment.
    ///
    /// `STATS_API_JOB_TIMEOUT` overrides the job timeout in seconds;
    /// unset or unparsable values fall back to the default.
    pub fn from_env() -> Self {
        let secs = std::env::var("STATS_API_JOB_TIMEOUT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_JOB_TIMEOUT_SECS);
        Self {
            job_timeout: Duration::from_secs(secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = ApiConfig::default();
        assert_eq!(config.job_timeout, Duration::from_secs(600));
    }

    // Single test so parallel runs never race on the variable.
    #[test]
    fn test_env_override_and_fallback() {
        std::env::set_var("STATS_API_JOB_TIMEOUT", "30");
        assert_eq!(ApiConfig::from_env().job_timeout, Duration::from_secs(30));

        std::env::set_var("STATS_API_JOB_TIMEOUT", "soon");
        assert_eq!(ApiConfig::from_env(), ApiConfig::default());

        std::env::remove_var("STATS_API_JOB_TIMEOUT");
        assert_eq!(ApiConfig::from_env(), ApiConfig::default());
    }
}
