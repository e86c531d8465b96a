//! Snapshot rendering options.

/// Options passed to [`crate::snapshot::ApiSnapshot::render`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// Render enum values and variable initializers. Off by default because
    /// initializer text churns far more often than the declarations around it.
    pub store_initializers: bool,
}

impl SnapshotConfig {
    pub fn with_initializers() -> Self {
        Self {
            store_initializers: true,
        }
    }
}
