/// Policy knobs for the matching engine's bounded-retry design.
///
/// These are the "hidden policy" constants called out in the design notes:
/// none of them are physics, all of them trade latency/ordering-accuracy for
/// liveness. `Config::default()` reproduces the engine's original fixed
/// constants; callers who need different bounds construct their own.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Bounds admission latency: number of optimistic CAS attempts in
    /// `OrderList::insert`'s primary phase before escalating to fallback.
    pub primary_retries: u32,
    /// Bounds insertion positional accuracy: maximum predecessors visited
    /// while scanning for an insertion point, in the primary phase.
    pub scan_limit: u32,
    /// Bounds the window before background handoff: number of attempts in
    /// the fallback phase, each with a progressively longer scan cap.
    pub fallback_retries: u32,
    /// Bounds the crossing sweep performed per `admit`/`match` call.
    pub match_iterations: u32,
    /// Fixed slot count for the order book's symbol-indexed array.
    pub capacity: usize,
}

/// Number of optimistic CAS attempts in the primary insert phase.
pub const PRIMARY_RETRIES: u32 = 10;
/// Maximum predecessors visited while scanning for an insertion point.
pub const SCAN_LIMIT: u32 = 100;
/// Number of attempts in the fallback insert phase.
pub const FALLBACK_RETRIES: u32 = 50;
/// Maximum crossing iterations performed per `match_slot` invocation.
pub const MATCH_ITERATIONS: u32 = 100;
/// Fixed number of symbol slots in the order book.
pub const CAPACITY: usize = 1024;

impl Default for Config {
    fn default() -> Self {
        Config {
            primary_retries: PRIMARY_RETRIES,
            scan_limit: SCAN_LIMIT,
            fallback_retries: FALLBACK_RETRIES,
            match_iterations: MATCH_ITERATIONS,
            capacity: CAPACITY,
        }
    }
}
