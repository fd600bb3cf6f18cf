//! Randomized multi-producer workload generator. This is the "application
//! entry point" the core engine treats as an external collaborator: it
//! exercises `MatchingEngine::admit` from several threads concurrently and
//! prints a final book summary, but contributes no matching logic of its
//! own.

use lob_core::prelude::*;
use rand::Rng;
use std::sync::Arc;
use std::thread;

const SYMBOLS: usize = 100;
const THREADS: usize = 8;
const ORDERS_PER_THREAD: usize = 2_000;

fn symbol_name(i: usize) -> String {
    format!("STOCK{i}")
}

fn main() {
    tracing_subscriber_init();

    let engine = Arc::new(MatchingEngine::new());
    let mut handles = Vec::with_capacity(THREADS);

    for worker in 0..THREADS {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            let mut rng = rand::rng();
            for i in 0..ORDERS_PER_THREAD {
                let symbol = symbol_name(rng.random_range(0..SYMBOLS));
                let side = if (worker + i) % 2 == 0 {
                    Side::Buy
                } else {
                    Side::Sell
                };
                let base_price = 100.0;
                let jitter = rng.random_range(-5.0..5.0);
                let qty = rng.random_range(1..100);
                engine.admit(side, &symbol, qty, base_price + jitter);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("workload thread panicked");
    }

    for i in 0..SYMBOLS {
        let symbol = symbol_name(i);
        engine.match_symbol(&symbol);
    }

    println!(
        "workload_gen: {} threads x {} orders across {} symbols complete",
        THREADS, ORDERS_PER_THREAD, SYMBOLS
    );
}

fn tracing_subscriber_init() {
    let _ = tracing_subscriber::fmt::try_init();
}
