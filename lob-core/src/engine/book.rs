//! The order book: a fixed-size table of (buy list, sell list) pairs indexed
//! by symbol slot. Lookups are O(1) plain array indexing — lock-free because
//! there is nothing to lock; the slot array itself never changes shape after
//! construction, only the lists it points at.

use crate::engine::config::Config;
use crate::engine::list::OrderList;
use crate::engine::symbol_hash::hash_symbol;
use std::sync::Arc;

/// One symbol slot: the resting buy orders and the resting sell orders.
pub struct BookSlot {
    pub buy: Arc<OrderList>,
    pub sell: Arc<OrderList>,
}

/// Fixed-capacity table of `BookSlot`s. Distinct symbols that hash to the
/// same slot share a `BookSlot` and will cross-match spuriously — this is a
/// known, accepted limitation (see the symbol-slotting design note), not a
/// bug in the table itself.
pub struct OrderBook {
    slots: Box<[BookSlot]>,
    config: Config,
}

impl OrderBook {
    /// Builds a fresh table of `config.capacity` empty slot pairs.
    pub fn new(config: Config) -> Self {
        let slots = (0..config.capacity)
            .map(|_| BookSlot {
                buy: Arc::new(OrderList::new(true, config)),
                sell: Arc::new(OrderList::new(false, config)),
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();
        OrderBook { slots, config }
    }

    /// Number of slots in the table.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Resolves a symbol to its slot index via the external hash function.
    pub fn slot_index(&self, symbol: &str) -> usize {
        hash_symbol(symbol, self.config.capacity)
    }

    /// Returns the slot at a precomputed index, for hot paths that already
    /// know it. Panics if `index >= capacity()`.
    pub fn slot(&self, index: usize) -> &BookSlot {
        &self.slots[index]
    }

    /// Resolves `symbol` to its slot and returns it.
    pub fn slot_for_symbol(&self, symbol: &str) -> &BookSlot {
        self.slot(self.slot_index(symbol))
    }
}
