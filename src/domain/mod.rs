pub mod depot_stop;
pub mod location;
pub mod package;
pub mod plan;
pub mod route;
pub mod truck;

use std::collections::HashMap;

use location::Location;

/// The closed location graph shared (read-only) across the whole pipeline.
#[derive(Debug, Clone, Default)]
pub struct Locations {
    by_id: HashMap<u32, Location>,
}

impl Locations {
    pub fn new(by_id: HashMap<u32, Location>) -> Self {
        Locations { by_id }
    }

    pub fn get(&self, id: u32) -> Option<&Location> {
        self.by_id.get(&id)
    }

    pub fn distance(&self, from: u32, to: u32) -> f64 {
        if from == to {
            return 0.0;
        }
        self.by_id
            .get(&from)
            .unwrap_or_else(|| panic!("unknown location id {from}"))
            .distance_to(to)
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.by_id.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
