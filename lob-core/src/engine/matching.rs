//! Admission of new orders and the head-of-book crossing loop.
//!
//! Neither `admit` nor `match_symbol`/`match_slot` can fail at the call
//! signature: invalid input is rejected silently (logged), and contention is
//! absorbed by `OrderList`'s own bounded retries. The contract here is
//! purely to mutate the book; no trade record is emitted — callers recover
//! fills by diffing book state across admissions, same as the test suite
//! does.

use crate::engine::book::OrderBook;
use crate::engine::config::Config;
use crate::engine::error::AdmissionRejection;
use crate::engine::types::{Order, Price, Quantity, Side};
use crossbeam::epoch;
use tracing::warn;

/// The matching engine: an order book plus the policy knobs governing its
/// bounded-retry insert and crossing loops.
pub struct MatchingEngine {
    book: OrderBook,
    config: Config,
}

impl MatchingEngine {
    /// Builds an engine with the spec's default policy knobs
    /// (`Config::default()`).
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Builds an engine with caller-supplied policy knobs.
    pub fn with_config(config: Config) -> Self {
        MatchingEngine {
            book: OrderBook::new(config),
            config,
        }
    }

    /// Read-only access to the underlying book, for test inspection of
    /// per-side list handles.
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Validates and admits a new order, then runs one bounded matching pass
    /// on its symbol's slot. Rejects `qty <= 0` or `price <= 0` silently,
    /// logging a warning; there is no error return.
    pub fn admit(&self, side: Side, symbol: &str, qty: Quantity, price: Price) {
        if qty <= 0 {
            let reason = AdmissionRejection::NonPositiveQuantity(qty);
            warn!(symbol, %reason, "admit: rejecting order");
            return;
        }
        if !(price > 0.0) || !price.is_finite() {
            let reason = AdmissionRejection::InvalidPrice(price);
            warn!(symbol, %reason, "admit: rejecting order");
            return;
        }

        let order = Order::new(side, symbol, qty, price);
        let index = self.book.slot_index(symbol);
        let slot = self.book.slot(index);
        match side {
            Side::Buy => slot.buy.insert(order),
            Side::Sell => slot.sell.insert(order),
        }

        self.match_slot(index);
    }

    /// Runs the matching loop once for `symbol`'s slot.
    pub fn match_symbol(&self, symbol: &str) {
        self.match_slot(self.book.slot_index(symbol));
    }

    /// Bounded crossing loop for one slot: up to `Config::match_iterations`
    /// iterations, each attempting to decrement both head orders by their
    /// common fillable quantity. The two decrements are not transactionally
    /// atomic — a concurrent observer may see one side reduced before the
    /// other — but each individual CAS is consistent, and a failed CAS on
    /// either side simply yields and retries the iteration rather than
    /// corrupting state.
    pub fn match_slot(&self, index: usize) {
        let slot = self.book.slot(index);
        let guard = &epoch::pin();

        for _ in 0..self.config.match_iterations {
            let b_shared = slot.buy.peek(guard);
            let s_shared = slot.sell.peek(guard);

            let (b_shared, s_shared) = match (b_shared, s_shared) {
                (Some(b), Some(s)) => (b, s),
                _ => break,
            };
            let b: &Order = unsafe { b_shared.deref() };
            let s: &Order = unsafe { s_shared.deref() };

            if b.price < s.price {
                break;
            }

            let bq = b.qty();
            let sq = s.qty();

            if bq == 0 {
                slot.buy.remove_head_if(b_shared, guard);
                continue;
            }
            if sq == 0 {
                slot.sell.remove_head_if(s_shared, guard);
                continue;
            }

            let m = bq.min(sq);

            let buy_ok = b.try_decrement(bq, bq - m);
            let sell_ok = s.try_decrement(sq, sq - m);

            if !buy_ok || !sell_ok {
                std::thread::yield_now();
                continue;
            }

            if bq - m == 0 {
                slot.buy.remove_head_if(b_shared, guard);
            }
            if sq - m == 0 {
                slot.sell.remove_head_if(s_shared, guard);
            }
        }
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
