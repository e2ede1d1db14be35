/// Rejections for user-supplied configuration values. Configuration is never
/// mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Mode must be `online_only` or `all` (got `{0}`).")]
    InvalidMode(String),

    #[error("Could not read `{0}` as a duration. Use forms like `300`, `5m`, or `2m30s`.")]
    InvalidDuration(String),

    #[error("Cooldown cannot be negative (got `{0}`).")]
    NegativeCooldown(String),
}
