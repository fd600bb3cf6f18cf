use crossbeam::epoch;
use crossbeam::utils::CachePadded;
use mimalloc::MiMalloc;
use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};

/// Global allocator
/// Requires the `mimalloc` feature to be enabled in the `Cargo.toml` file.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Price is the type used for prices in the order.
/// IEEE-754 double precision; compared by strict inequality only.
pub type Price = f64;

/// Quantity is the type used for residual and requested quantities.
/// Signed so that `try_decrement` failure paths can be reasoned about without
/// wrapping; admission validation guarantees it never goes negative.
pub type Quantity = i32;

/// Side indicates the direction of the order.
#[derive(PartialEq, Eq, Default, Copy, Clone, Debug)]
pub enum Side {
    /// Buy means the user wants to acquire the asset; matches against resting sells.
    #[default]
    Buy,
    /// Sell means the user wants to dispose of the asset; matches against resting buys.
    Sell,
}

/// Observed lifecycle state of an order, derived from its residual quantity
/// and list reachability rather than tracked as a separate atomic field.
///
/// States and transitions per the matching engine's state machine:
/// LIVE (qty>0, reachable) -> LIVE (partial fill) -> DRAINED (qty==0, not yet
/// unlinked) -> REMOVED (unlinked via head-CAS). REMOVED is terminal.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum OrderState {
    /// Residual quantity is positive; order participates in matching.
    Live,
    /// Residual quantity has reached zero but the order has not yet been
    /// unlinked from its list's head.
    Drained,
}

/// Order is the unit of the book: an immutable identity (side, symbol, price)
/// plus a mutable tail (residual quantity, successor link, ABA-mitigation
/// version counter) published once and thereafter touched only through CAS.
///
/// The hot, frequently-contended fields are grouped behind `CachePadded` and
/// additionally bracketed with unused padding words on both sides, so that a
/// thread spinning on `qty`/`next` never shares a cache line with this
/// order's own identity fields or with a neighboring heap allocation.
#[derive(Debug)]
pub struct Order {
    /// Assigned once at construction from a monotonic counter; immutable.
    pub id: u64,
    /// Immutable: BUY or SELL.
    pub side: Side,
    /// Immutable ticker identifier.
    pub symbol: Box<str>,
    /// Immutable positive price.
    pub price: Price,

    #[allow(dead_code)]
    _pad_before: [u64; 7],
    hot: CachePadded<OrderHot>,
    #[allow(dead_code)]
    _pad_after: [u64; 7],
}

#[derive(Debug)]
struct OrderHot {
    qty: AtomicI32,
    next: epoch::Atomic<Order>,
    version: AtomicU64,
}

static NEXT_ORDER_ID: AtomicU64 = AtomicU64::new(1);

impl Order {
    /// Constructs a pre-publication order. `qty0` and `price` must both be
    /// strictly positive; admission-time validation is the caller's job
    /// (see `MatchingEngine::admit`), not this constructor's.
    pub fn new(side: Side, symbol: impl Into<Box<str>>, qty0: Quantity, price: Price) -> Self {
        Order {
            id: NEXT_ORDER_ID.fetch_add(1, Ordering::Relaxed),
            side,
            symbol: symbol.into(),
            price,
            _pad_before: [0; 7],
            hot: CachePadded::new(OrderHot {
                qty: AtomicI32::new(qty0),
                next: epoch::Atomic::null(),
                version: AtomicU64::new(0),
            }),
            _pad_after: [0; 7],
        }
    }

    /// Current residual quantity.
    #[inline]
    pub fn qty(&self) -> Quantity {
        self.hot.qty.load(Ordering::Acquire)
    }

    /// ABA-mitigation version counter; reserved, not yet consulted by any
    /// comparison in this engine, but bumped on every successful decrement
    /// so a future hazard-pointer migration has a monotonic witness to rely
    /// on.
    #[inline]
    pub fn version(&self) -> u64 {
        self.hot.version.load(Ordering::Acquire)
    }

    /// CAS on residual quantity: succeeds iff the current value equals
    /// `expected`. Callers must pass `new_qty <= expected`.
    #[inline]
    pub fn try_decrement(&self, expected: Quantity, new_qty: Quantity) -> bool {
        debug_assert!(new_qty <= expected);
        let ok = self
            .hot
            .qty
            .compare_exchange(expected, new_qty, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok();
        if ok {
            self.hot.version.fetch_add(1, Ordering::AcqRel);
        }
        ok
    }

    /// Plain atomic load of the successor link under the given epoch guard.
    #[inline]
    pub fn load_next<'g>(&self, guard: &'g epoch::Guard) -> epoch::Shared<'g, Order> {
        self.hot.next.load(Ordering::Acquire, guard)
    }

    /// Plain atomic store of the successor link. Only safe to call while
    /// `self` is still private to the inserting thread (pre-publication).
    #[inline]
    pub fn store_next(&self, new: epoch::Shared<'_, Order>) {
        self.hot.next.store(new, Ordering::Release);
    }

    /// Atomic compare-and-swap on the successor link.
    #[inline]
    pub fn cas_next<'g>(
        &self,
        guard: &'g epoch::Guard,
        expected: epoch::Shared<'g, Order>,
        new: epoch::Shared<'g, Order>,
    ) -> bool {
        self.hot
            .next
            .compare_exchange(
                expected,
                new,
                Ordering::AcqRel,
                Ordering::Acquire,
                guard,
            )
            .is_ok()
    }

    /// Crate-internal access to the raw successor atomic, used by
    /// `OrderList` so it can retry a failed predecessor CAS with the same
    /// `Owned` allocation instead of reallocating per attempt. External
    /// callers use `load_next`/`store_next`/`cas_next` instead.
    pub(crate) fn next_atomic(&self) -> &epoch::Atomic<Order> {
        &self.hot.next
    }

    /// Observed lifecycle state; REMOVED is a property of list reachability,
    /// not of the order in isolation, so it is not representable here.
    #[inline]
    pub fn observed_state(&self) -> OrderState {
        if self.qty() == 0 {
            OrderState::Drained
        } else {
            OrderState::Live
        }
    }
}
