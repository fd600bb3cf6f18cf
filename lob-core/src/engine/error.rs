use crate::engine::types::{Price, Quantity};

/// Reasons an incoming order is rejected at admission. The engine's public
/// surface stays infallible (`admit` returns `()`), so this taxonomy is only
/// ever surfaced through a `tracing::warn!` log line — there is no exception
/// surface for the core data plane. It exists as a typed value rather than a
/// bare log string because every other error path in this repository that
/// *is* fallible (engine construction, demo workload setup) goes through
/// `thiserror`, and the same habit is kept here for consistency.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum AdmissionRejection {
    /// `qty <= 0`.
    #[error("order quantity must be positive, got {0}")]
    NonPositiveQuantity(Quantity),
    /// `price <= 0` or not finite (NaN/infinite prices are excluded the
    /// same way non-positive prices are: by the positivity check).
    #[error("order price must be a finite positive value, got {0}")]
    InvalidPrice(Price),
}
