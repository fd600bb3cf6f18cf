//! Core of a concurrent limit-order matching engine: per-symbol,
//! price-sorted lock-free order lists and a bounded-retry crossing loop over
//! them. See `engine::matching::MatchingEngine` for the entry point.

pub mod engine;

pub mod prelude {
    pub use crate::engine::prelude::*;
}
