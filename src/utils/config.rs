/// How much history the store keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Maximum number of suite entries kept (newest win)
    pub max_suites: usize,

    /// Maximum number of case entries kept (newest win)
    pub max_cases: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_suites: 1000,
            max_cases: 10_000,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// History retention caps
    pub retention: RetentionPolicy,

    /// Log filter used when `RUST_LOG` is not set
    pub default_log_filter: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retention: RetentionPolicy::default(),
            default_log_filter: "info",
        }
    }
}
