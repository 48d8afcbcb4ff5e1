//! Per-player bookkeeping.

/// Player number, starting at 1.
pub type PlayerId = u32;

/// Aggregate counters for a single player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Player {
    /// Number of disjoint areas currently held.
    pub areas: u32,
    /// Number of fields currently held.
    pub busy_fields: u64,
    /// Whether the golden move has been spent.
    pub golden_used: bool,
}

impl Player {
    /// Create a player with no fields and the golden move still available.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            areas: 0,
            busy_fields: 0,
            golden_used: false,
        }
    }

    /// Whether another area would fit under `max_areas`.
    #[must_use]
    pub const fn can_open_area(&self, max_areas: u32) -> bool {
        self.areas < max_areas
    }
}
