//! Synthetic instance generation for tests, in the same deterministic-RNG
//! spirit as the teacher's `fixtures::data_generator`, adapted from "random
//! postal codes + demands" to this spec's locations/packages/deadlines
//! model.

use std::collections::HashMap;

use chrono::NaiveTime;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::location::Location;
use crate::domain::package::Package;
use crate::domain::Locations;
use crate::graph::close_distances;

pub struct SyntheticInstance {
    pub locations: Locations,
    pub packages: Vec<Package>,
    pub depot_location_id: u32,
}

/// Builds a `num_packages`-package instance over `num_packages + 1`
/// locations (the depot plus one per package) scattered on a 100x100 grid.
/// Euclidean edges are trivially metric, but the result is still run
/// through [`close_distances`] so fixtures exercise the same code path real
/// input does.
pub fn synthetic_instance(num_packages: usize, seed: u64, start_of_day: NaiveTime) -> SyntheticInstance {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let depot_location_id = 0u32;
    let n = num_packages + 1;

    let coords: Vec<(f64, f64)> = (0..n).map(|_| (rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0))).collect();

    let mut raw = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                let (xi, yi) = coords[i];
                let (xj, yj) = coords[j];
                raw[i][j] = ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt();
            }
        }
    }
    close_distances(&mut raw).expect("a fully-connected grid graph always closes");

    let mut by_id = HashMap::with_capacity(n);
    for (i, &(lat, lon)) in coords.iter().enumerate() {
        let mut location = Location::new(
            i as u32,
            format!("{i} Test St"),
            "Testville".to_string(),
            "TS".to_string(),
            "00000".to_string(),
            lat,
            lon,
        );
        for j in 0..n {
            if i != j {
                location.distances.insert(j as u32, raw[i][j]);
            }
        }
        by_id.insert(i as u32, location);
    }
    let locations = Locations::new(by_id);

    let packages = (1..=num_packages)
        .map(|i| {
            let deadline_hour = rng.gen_range(9..=20);
            let deadline = NaiveTime::from_hms_opt(deadline_hour, 0, 0).unwrap();
            let mass = rng.gen_range(1..=50);
            Package::new(i as u32, i as u32, deadline, mass, String::new(), start_of_day)
        })
        .collect();

    SyntheticInstance {
        locations,
        packages,
        depot_location_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_package_count() {
        let instance = synthetic_instance(12, 1, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(instance.packages.len(), 12);
        assert_eq!(instance.locations.len(), 13);
    }

    #[test]
    fn is_deterministic_under_a_fixed_seed() {
        let a = synthetic_instance(8, 42, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        let b = synthetic_instance(8, 42, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        let ids_a: Vec<u32> = a.packages.iter().map(|p| p.location_id).collect();
        let ids_b: Vec<u32> = b.packages.iter().map(|p| p.location_id).collect();
        assert_eq!(ids_a, ids_b);
    }
}
