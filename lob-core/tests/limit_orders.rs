mod common;

use crate::common::snapshot;
use lob_core::prelude::*;

#[test]
fn basic_cross_drains_both_sides() {
    let engine = MatchingEngine::new();
    engine.admit(Side::Buy, "X", 100, 250.0);
    engine.admit(Side::Sell, "X", 100, 245.0);

    let slot = engine.book().slot_for_symbol("X");
    assert!(snapshot(&slot.buy).is_empty());
    assert!(snapshot(&slot.sell).is_empty());
}

#[test]
fn partial_fill_leaves_residual_at_head() {
    let engine = MatchingEngine::new();
    engine.admit(Side::Buy, "Y", 100, 1000.0);
    engine.admit(Side::Sell, "Y", 60, 990.0);

    let slot = engine.book().slot_for_symbol("Y");
    assert_eq!(snapshot(&slot.buy), vec![(1000.0, 40)]);
    assert!(snapshot(&slot.sell).is_empty());

    engine.admit(Side::Sell, "Y", 50, 995.0);
    assert!(snapshot(&slot.buy).is_empty());
    assert_eq!(snapshot(&slot.sell), vec![(995.0, 10)]);
}

#[test]
fn non_crossing_prices_leave_both_heads_untouched() {
    let engine = MatchingEngine::new();
    engine.admit(Side::Buy, "Z", 100, 800.0);
    engine.admit(Side::Sell, "Z", 100, 805.0);

    let slot = engine.book().slot_for_symbol("Z");
    assert_eq!(snapshot(&slot.buy), vec![(800.0, 100)]);
    assert_eq!(snapshot(&slot.sell), vec![(805.0, 100)]);
}

#[test]
fn buy_side_list_is_price_sorted_highest_first() {
    let engine = MatchingEngine::new();
    engine.admit(Side::Buy, "A", 100, 150.0);
    engine.admit(Side::Buy, "A", 100, 152.0);
    engine.admit(Side::Buy, "A", 100, 151.0);

    let slot = engine.book().slot_for_symbol("A");
    let prices: Vec<Price> = snapshot(&slot.buy).into_iter().map(|(p, _)| p).collect();
    assert_eq!(prices, vec![152.0, 151.0, 150.0]);
}

#[test]
fn multi_level_sweep_matches_greedily_by_price() {
    let engine = MatchingEngine::new();
    engine.admit(Side::Buy, "B", 100, 300.0);
    engine.admit(Side::Buy, "B", 200, 305.0);
    engine.admit(Side::Buy, "B", 150, 302.0);
    engine.admit(Side::Sell, "B", 120, 301.0);
    engine.admit(Side::Sell, "B", 180, 304.0);
    engine.admit(Side::Sell, "B", 100, 306.0);

    // 305@200 clears 301@120 in full, then absorbs 80 of 304@180, leaving
    // 100 resting at 304; nothing left can cross 302 against 304.
    let slot = engine.book().slot_for_symbol("B");
    assert_eq!(snapshot(&slot.buy), vec![(302.0, 150), (300.0, 100)]);
    assert_eq!(snapshot(&slot.sell), vec![(304.0, 100), (306.0, 100)]);
}

#[test]
fn distinct_symbol_slots_do_not_interact() {
    let engine = MatchingEngine::new();
    let p_index = engine.book().slot_index("P");
    let q_index = engine.book().slot_index("Q");
    assert_ne!(
        p_index, q_index,
        "fixture assumes \"P\" and \"Q\" hash to distinct slots"
    );

    engine.admit(Side::Buy, "P", 100, 150.0);
    engine.admit(Side::Sell, "Q", 100, 145.0);

    assert_eq!(
        snapshot(&engine.book().slot(p_index).buy),
        vec![(150.0, 100)]
    );
    assert_eq!(
        snapshot(&engine.book().slot(q_index).sell),
        vec![(145.0, 100)]
    );
}

#[test]
fn rejects_non_positive_quantity_and_price() {
    let engine = MatchingEngine::new();
    engine.admit(Side::Buy, "R", 0, 100.0);
    engine.admit(Side::Buy, "R", -5, 100.0);
    engine.admit(Side::Buy, "R", 10, 0.0);
    engine.admit(Side::Buy, "R", 10, -1.0);
    engine.admit(Side::Buy, "R", 10, f64::NAN);

    let slot = engine.book().slot_for_symbol("R");
    assert!(snapshot(&slot.buy).is_empty());
}
