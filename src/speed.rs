pub const INITIAL_INTERVAL_MS: u64 = 200;
pub const FLOOR_INTERVAL_MS: u64 = 25;

// (exclusive lower bound, decrement), checked top-down
const TIERS: [(u64, u64); 4] = [(150, 5), (100, 3), (50, 2), (FLOOR_INTERVAL_MS, 1)];

/// Next tick interval after a piece of food is eaten.
pub fn on_food_eaten(current_ms: u64) -> u64 {
    TIERS.iter()
        .find(|(above, _)| current_ms > *above)
        .map_or(current_ms, |(_, step)| current_ms - step)
}
