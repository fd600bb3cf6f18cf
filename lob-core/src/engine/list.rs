//! The per-side, per-symbol price-sorted singly-linked order list. This is
//! the hard part of the engine: concurrent insertion under a bounded
//! optimistic CAS loop, and head removal with an uncapped retry loop.
//!
//! Reclamation is epoch-based via `crossbeam::epoch`: every traversal pins a
//! guard, and nodes unlinked by `remove_head` are handed to
//! `guard.defer_destroy` instead of freed immediately, so a thread still
//! mid-traversal through a node concurrently removed by another thread never
//! observes a dangling pointer.

use crate::engine::config::Config;
use crate::engine::types::{Order, Price};
use crossbeam::epoch::{self, Atomic, Owned, Shared};
use crossbeam::utils::Backoff;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread;
use tracing::{debug, warn};

/// A price-sorted singly-linked list of resting orders for one side of one
/// symbol's book.
///
/// Buy-side lists are kept non-increasing from `head` (highest price first);
/// sell-side lists are kept non-decreasing (lowest price first). Equal
/// prices are allowed; their relative order is not time-of-arrival under
/// concurrency — see the price-priority design note — it is simply whichever
/// position the inserting thread's traversal happened to land on.
pub struct OrderList {
    head: Atomic<Order>,
    is_buy_side: bool,
    config: Config,
}

impl OrderList {
    /// Creates an empty list configured for one side.
    pub fn new(is_buy_side: bool, config: Config) -> Self {
        OrderList {
            head: Atomic::null(),
            is_buy_side,
            config,
        }
    }

    /// Whether this is the buy side (affects price ordering direction).
    pub fn is_buy_side(&self) -> bool {
        self.is_buy_side
    }

    /// True iff the list currently has no head.
    pub fn is_empty(&self) -> bool {
        let guard = &epoch::pin();
        self.head.load(Ordering::Acquire, guard).is_null()
    }

    /// Returns a snapshot of the current head, or `None` if the list is
    /// empty. Does not mutate the list. Returned as `Shared` rather than
    /// `&Order` so callers (the matcher) can pass the exact snapshot back
    /// into `remove_head_if` to detect a racing removal.
    pub fn peek<'g>(&self, guard: &'g epoch::Guard) -> Option<Shared<'g, Order>> {
        let h = self.head.load(Ordering::Acquire, guard);
        if h.is_null() { None } else { Some(h) }
    }

    /// Test scaffolding only: atomically clears the head without reclaiming
    /// whatever was reachable from it. Not part of the production API
    /// surface the engine itself calls.
    pub fn clear(&self) {
        self.head.store(Shared::null(), Ordering::Release);
    }

    /// True iff `new_price` strictly beats `other_price` in this side's
    /// sense (buy: greater; sell: lesser). This is the single comparison
    /// both `should_be_head` and the traversal stopping condition reduce to.
    #[inline]
    fn beats(&self, new_price: Price, other_price: Price) -> bool {
        if self.is_buy_side {
            new_price > other_price
        } else {
            new_price < other_price
        }
    }

    /// Inserts `order`, which must not yet be reachable from any list.
    ///
    /// Runs the bounded primary CAS loop (`Config::primary_retries`
    /// attempts, `Config::scan_limit` traversal cap), then — only on
    /// contention severe enough to exhaust that — a fallback phase
    /// (`Config::fallback_retries` attempts with a progressively longer
    /// scan cap, a scheduler yield, and an exponential backoff spin between
    /// attempts). If the fallback also exhausts, the insert is hanged off to
    /// a background inserter and this call returns without waiting for it.
    ///
    /// Requires an `Arc<OrderList>` receiver solely so the background
    /// handoff path (used only under sustained, unlikely contention) has
    /// something 'static to keep the list alive from a detached thread.
    pub fn insert(self: &Arc<OrderList>, order: Order) {
        let guard = &epoch::pin();
        let price = order.price;
        let mut new = Owned::new(order);

        for _attempt in 0..self.config.primary_retries {
            match self.try_insert_once(new, price, self.config.scan_limit, guard) {
                Ok(()) => return,
                Err(returned) => new = returned,
            }
        }

        debug!(
            price,
            is_buy_side = self.is_buy_side,
            "primary insert retries exhausted, entering fallback phase"
        );

        let backoff = Backoff::new();
        for attempt in 0..self.config.fallback_retries {
            let scan_cap = 10 + 5 * attempt;
            match self.try_insert_once(new, price, scan_cap, guard) {
                Ok(()) => return,
                Err(returned) => new = returned,
            }
            thread::yield_now();
            let spins = 1u32 << attempt.min(10);
            for _ in 0..spins {
                backoff.spin();
            }
        }

        warn!(
            price,
            is_buy_side = self.is_buy_side,
            "fallback insert retries exhausted, handing off to background inserter; \
             price ordering (I1) is not guaranteed for this order"
        );
        self.spawn_background_insert(new);
    }

    /// One attempt of the primary/fallback insert algorithm: snapshot head,
    /// decide whether the new order becomes the head, otherwise scan
    /// (bounded by `scan_limit` predecessors) for the first successor the
    /// new order strictly beats, then CAS it in before that successor.
    /// Returns the `Owned` back on CAS failure so the caller can retry
    /// without reallocating.
    fn try_insert_once<'g>(
        &self,
        mut new: Owned<Order>,
        price: Price,
        scan_limit: u32,
        guard: &'g epoch::Guard,
    ) -> Result<(), Owned<Order>> {
        let h = self.head.load(Ordering::Acquire, guard);

        if h.is_null() {
            new.store_next(Shared::null());
            return self
                .head
                .compare_exchange(h, new, Ordering::AcqRel, Ordering::Acquire, guard)
                .map(|_| ())
                .map_err(|e| e.new);
        }

        let h_ref = unsafe { h.deref() };
        if self.beats(price, h_ref.price) {
            new.store_next(h);
            return self
                .head
                .compare_exchange(h, new, Ordering::AcqRel, Ordering::Acquire, guard)
                .map(|_| ())
                .map_err(|e| e.new);
        }

        let mut prev = h_ref;
        let mut cur = h_ref.load_next(guard);
        let mut steps = 0u32;
        while !cur.is_null() && steps < scan_limit {
            let cur_ref = unsafe { cur.deref() };
            if self.beats(price, cur_ref.price) {
                break;
            }
            prev = cur_ref;
            cur = cur_ref.load_next(guard);
            steps += 1;
        }

        new.store_next(cur);
        prev.next_atomic()
            .compare_exchange(cur, new, Ordering::AcqRel, Ordering::Acquire, guard)
            .map(|_| ())
            .map_err(|e| e.new)
    }

    /// Best-effort background inserter: loops attempting a head-only CAS
    /// until it succeeds, with no bound on attempts and no further
    /// contribution to positional accuracy. This deliberately sacrifices
    /// monotonicity (I1) for guaranteed progress once ordinary contention
    /// handling has failed — see the background-fallback-inserter design
    /// note for why this is retained rather than replaced with a marked-
    /// pointer lock-free list, and why a robust redesign would prefer the
    /// latter.
    fn spawn_background_insert(self: &Arc<OrderList>, mut new: Owned<Order>) {
        let list = Arc::clone(self);
        thread::spawn(move || {
            let guard = &epoch::pin();
            loop {
                let h = list.head.load(Ordering::Acquire, guard);
                new.store_next(h);
                match list
                    .head
                    .compare_exchange(h, new, Ordering::AcqRel, Ordering::Acquire, guard)
                {
                    Ok(_) => return,
                    Err(e) => {
                        new = e.new;
                        std::hint::spin_loop();
                    }
                }
            }
        });
    }

    /// Removes and returns the current head, or `None` if empty. Retries
    /// without bound until the CAS succeeds or the list is observed empty —
    /// removal, unlike insertion, is always driven to completion.
    pub fn remove_head<'g>(&self, guard: &'g epoch::Guard) -> Option<Shared<'g, Order>> {
        loop {
            let h = self.head.load(Ordering::Acquire, guard);
            if h.is_null() {
                return None;
            }
            let h_ref = unsafe { h.deref() };
            let next = h_ref.load_next(guard);
            if self
                .head
                .compare_exchange(h, next, Ordering::AcqRel, Ordering::Acquire, guard)
                .is_ok()
            {
                h_ref.store_next(Shared::null());
                unsafe {
                    guard.defer_destroy(h);
                }
                return Some(h);
            }
        }
    }

    /// Removes the current head only if it is still exactly `expected`
    /// (identity compared by pointer). Used by the matcher so a drained
    /// head it already observed isn't blindly unlinked if another thread
    /// raced it to the same removal.
    pub fn remove_head_if<'g>(
        &self,
        expected: Shared<'g, Order>,
        guard: &'g epoch::Guard,
    ) -> bool {
        if expected.is_null() {
            return false;
        }
        let expected_ref = unsafe { expected.deref() };
        let next = expected_ref.load_next(guard);
        if self
            .head
            .compare_exchange(expected, next, Ordering::AcqRel, Ordering::Acquire, guard)
            .is_ok()
        {
            expected_ref.store_next(Shared::null());
            unsafe {
                guard.defer_destroy(expected);
            }
            true
        } else {
            false
        }
    }
}
