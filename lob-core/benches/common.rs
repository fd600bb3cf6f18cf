use lob_core::prelude::*;

/// Deterministic limit order, price and quantity derived from `i` so callers
/// can generate large synthetic books without tracking state.
pub fn synthetic_order(i: u64, side: Side, base_price: f64, qty: Quantity) -> Order {
    let jitter = (i % 500) as f64;
    Order::new(side, "BENCH", qty, base_price + jitter)
}
