//! Error types for rule-source and project loading.

/// Structural failures that stop a run before evaluation begins.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error in the rule source.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// JSON parse error in a project file.
    #[error("project parse error: {0}")]
    Project(#[from] serde_json::Error),

    /// Rule-source validation error (empty rule id, inverted limits).
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result alias for loading operations.
pub type Result<T> = std::result::Result<T, RuleError>;
