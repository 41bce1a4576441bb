//! Engine configuration.

/// Configuration for [`Engine`](crate::Engine) behavior.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Row cap for to-many relations declared without a match column.
    pub to_many_default_limit: i64,
    /// Whether every executed statement is logged at DEBUG level.
    pub log_statements: bool,
    /// Warn once a single relation has been lazily resolved this many times.
    /// `None` disables the check.
    pub lazy_load_warn_threshold: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            to_many_default_limit: 10,
            log_statements: true,
            lazy_load_warn_threshold: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_many_default_limit(mut self, limit: i64) -> Self {
        self.to_many_default_limit = limit;
        self
    }

    pub fn log_statements(mut self, enabled: bool) -> Self {
        self.log_statements = enabled;
        self
    }

    pub fn lazy_load_warn_threshold(mut self, threshold: Option<usize>) -> Self {
        self.lazy_load_warn_threshold = threshold;
        self
    }
}
