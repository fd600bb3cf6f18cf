use crossbeam::epoch;
use lob_core::prelude::*;

/// Walks a list from `head` to tail, returning `(price, qty)` pairs in list
/// order. Test-only: production code never needs a full traversal, only
/// `peek`.
pub fn snapshot(list: &OrderList) -> Vec<(Price, Quantity)> {
    let guard = &epoch::pin();
    let mut out = Vec::new();
    let mut cur = list.peek(guard);
    while let Some(shared) = cur {
        let order = unsafe { shared.deref() };
        out.push((order.price, order.qty()));
        let next = order.load_next(guard);
        cur = if next.is_null() { None } else { Some(next) };
    }
    out
}

/// True iff `prices` is monotone in the direction `is_buy_side` implies
/// (non-increasing for buy, non-decreasing for sell).
pub fn is_price_sorted(prices: &[Price], is_buy_side: bool) -> bool {
    prices.windows(2).all(|w| {
        if is_buy_side {
            w[0] >= w[1]
        } else {
            w[0] <= w[1]
        }
    })
}
