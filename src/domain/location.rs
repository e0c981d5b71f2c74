use std::collections::HashMap;

/// A physical address the fleet can deliver to or return from. Once loaded,
/// a location's distance table is the closed (all-pairs shortest path) table
/// produced by [`crate::graph::close_distances`], keyed by peer location id.
#[derive(Debug, Clone)]
pub struct Location {
    pub id: u32,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub lat: f64,
    pub lon: f64,
    pub distances: HashMap<u32, f64>,
}

impl Location {
    pub fn new(id: u32, address: String, city: String, state: String, zip: String, lat: f64, lon: f64) -> Self {
        Location {
            id,
            address,
            city,
            state,
            zip,
            lat,
            lon,
            distances: HashMap::new(),
        }
    }

    /// Shortest-path distance to another location. Panics if the closed
    /// distance table was never populated for `other` — callers only hold a
    /// `Location` after the loader has closed the matrix, so this indicates
    /// an invariant violation, not a recoverable error.
    pub fn distance_to(&self, other: u32) -> f64 {
        if self.id == other {
            return 0.0;
        }
        *self
            .distances
            .get(&other)
            .unwrap_or_else(|| panic!("no closed distance from location {} to {}", self.id, other))
    }
}
