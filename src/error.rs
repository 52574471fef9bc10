//! Error types for table construction and growth.

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;

/// Failures surfaced by [`RobinHoodTable`](crate::RobinHoodTable).
///
/// Missing keys are not errors: `search` and `remove` return `None`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TableError {
    /// Construction parameters were rejected before any allocation.
    #[error("invalid table configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// The slot array could not be allocated.
    #[error("failed to allocate a slot array of {slots} slots")]
    Allocation { slots: usize },

    /// Doubling the capacity would overflow `usize`.
    #[error("table capacity overflow")]
    CapacityOverflow,
}
