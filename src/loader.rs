//! CSV ingestion boundary (§4.J/§6): the only place this crate touches
//! disk. Parses `locations.csv`, `distances.csv`, and `packages.csv` into
//! the in-memory domain model, symmetrizing and closing the raw distance
//! table before a single [`Location`] is built.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveTime;
use csv::ReaderBuilder;
use serde::Deserialize;

use crate::config::constant::{DISTANCES_FILE, LOCATIONS_FILE, PACKAGES_FILE};
use crate::domain::location::Location;
use crate::domain::package::Package;
use crate::domain::Locations;
use crate::error::{SolverError, SolverResult};
use crate::graph::close_distances;

#[derive(Debug, Deserialize)]
struct LocationRow {
    #[serde(rename = "LocationID")]
    location_id: u32,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "ZIP")]
    zip: String,
    #[serde(rename = "Lat")]
    lat: f64,
    #[serde(rename = "Lon")]
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct PackageRow {
    #[serde(rename = "PackageID")]
    package_id: u32,
    #[serde(rename = "LocationID")]
    location_id: u32,
    #[serde(rename = "DeliveryDeadline")]
    delivery_deadline: String,
    #[serde(rename = "Mass")]
    mass: u32,
    #[serde(rename = "SpecialNotes")]
    special_notes: String,
}

/// Loads `locations.csv`/`distances.csv`/`packages.csv` from `data_dir` and
/// returns the closed-distance `Locations` table plus every `Package`, with
/// `earliest_load` seeded from `start_of_day` (overridden per-package by a
/// parsed note, see [`crate::domain::package::parse_notes`]).
pub fn load_instance(
    data_dir: &Path,
    depot_location_id: u32,
    start_of_day: NaiveTime,
) -> SolverResult<(Locations, Vec<Package>)> {
    let location_rows = read_location_rows(&data_dir.join(LOCATIONS_FILE))?;
    let (ids, mut matrix) = read_distance_matrix(&data_dir.join(DISTANCES_FILE))?;
    symmetrize(&mut matrix);
    close_distances(&mut matrix)?;

    let id_index: HashMap<u32, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let mut by_id = HashMap::with_capacity(location_rows.len());
    for row in location_rows {
        let idx = *id_index.get(&row.location_id).ok_or_else(|| {
            SolverError::ConfigurationError(format!(
                "locations.csv references location {} missing from distances.csv",
                row.location_id
            ))
        })?;

        let mut location = Location::new(
            row.location_id,
            row.address,
            row.city,
            row.state,
            row.zip,
            row.lat,
            row.lon,
        );
        for (&other_id, &other_idx) in &id_index {
            if other_idx != idx {
                location.distances.insert(other_id, matrix[idx][other_idx]);
            }
        }
        by_id.insert(row.location_id, location);
    }

    if !by_id.contains_key(&depot_location_id) {
        return Err(SolverError::ConfigurationError(format!(
            "depot location id {depot_location_id} is not present in locations.csv"
        )));
    }

    let locations = Locations::new(by_id);

    let package_rows = read_package_rows(&data_dir.join(PACKAGES_FILE))?;
    let mut packages = Vec::with_capacity(package_rows.len());
    for row in package_rows {
        if locations.get(row.location_id).is_none() {
            return Err(SolverError::ConfigurationError(format!(
                "packages.csv package {} references unknown location {}",
                row.package_id, row.location_id
            )));
        }
        let deadline = parse_deadline(&row.delivery_deadline)?;
        packages.push(Package::new(
            row.package_id,
            row.location_id,
            deadline,
            row.mass,
            row.special_notes,
            start_of_day,
        ));
    }

    Ok((locations, packages))
}

fn read_location_rows(path: &Path) -> SolverResult<Vec<LocationRow>> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .map_err(|err| SolverError::ConfigurationError(format!("reading {}: {err}", path.display())))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: LocationRow =
            record.map_err(|err| SolverError::ConfigurationError(format!("{}: {err}", path.display())))?;
        rows.push(row);
    }
    Ok(rows)
}

fn read_package_rows(path: &Path) -> SolverResult<Vec<PackageRow>> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .map_err(|err| SolverError::ConfigurationError(format!("reading {}: {err}", path.display())))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: PackageRow =
            record.map_err(|err| SolverError::ConfigurationError(format!("{}: {err}", path.display())))?;
        rows.push(row);
    }
    Ok(rows)
}

/// `distances.csv`: a header row of location ids (first cell ignored), then
/// one row per location with its id in the first column and a distance to
/// every header id after it. Returns the header ids in column order plus
/// the raw (not yet symmetrized or closed) square matrix in that order.
fn read_distance_matrix(path: &Path) -> SolverResult<(Vec<u32>, Vec<Vec<f64>>)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|err| SolverError::ConfigurationError(format!("reading {}: {err}", path.display())))?;

    let mut records = reader.records();
    let header = records
        .next()
        .ok_or_else(|| SolverError::ConfigurationError(format!("{}: missing header row", path.display())))?
        .map_err(|err| SolverError::ConfigurationError(format!("{}: {err}", path.display())))?;

    let ids: Vec<u32> = header
        .iter()
        .skip(1)
        .map(|cell| {
            cell.trim()
                .parse::<u32>()
                .map_err(|err| SolverError::ConfigurationError(format!("{}: bad header id '{cell}': {err}", path.display())))
        })
        .collect::<SolverResult<Vec<u32>>>()?;

    let n = ids.len();
    let id_position: HashMap<u32, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let mut matrix = vec![vec![0.0f64; n]; n];

    for record in records {
        let record = record.map_err(|err| SolverError::ConfigurationError(format!("{}: {err}", path.display())))?;
        let mut cells = record.iter();
        let row_id: u32 = cells
            .next()
            .ok_or_else(|| SolverError::ConfigurationError(format!("{}: empty row", path.display())))?
            .trim()
            .parse()
            .map_err(|err| SolverError::ConfigurationError(format!("{}: bad row id: {err}", path.display())))?;
        let &row_idx = id_position.get(&row_id).ok_or_else(|| {
            SolverError::ConfigurationError(format!("{}: row id {row_id} not in header", path.display()))
        })?;

        for (col_idx, cell) in cells.enumerate() {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                continue;
            }
            let value: f64 = trimmed
                .parse()
                .map_err(|err| SolverError::ConfigurationError(format!("{}: bad distance '{trimmed}': {err}", path.display())))?;
            matrix[row_idx][col_idx] = value;
        }
    }

    Ok((ids, matrix))
}

/// Fills `raw[i][j] == 0.0` (for `i != j`) from `raw[j][i]` when the latter
/// is nonzero — the lower-triangular-with-zeros-elsewhere layout the spec's
/// `distances.csv` may arrive in.
fn symmetrize(raw: &mut [Vec<f64>]) {
    let n = raw.len();
    for i in 0..n {
        for j in 0..n {
            if i != j && raw[i][j] == 0.0 && raw[j][i] != 0.0 {
                raw[i][j] = raw[j][i];
            }
        }
    }
}

/// `"EOD"` (case-insensitive) becomes 23:59:59 same day; otherwise parses
/// `hh:mm AM/PM`.
fn parse_deadline(raw: &str) -> SolverResult<NaiveTime> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("EOD") {
        return Ok(NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }
    NaiveTime::parse_from_str(trimmed, "%I:%M %p")
        .map_err(|err| SolverError::ConfigurationError(format!("invalid DeliveryDeadline '{trimmed}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_eod_deadline() {
        assert_eq!(parse_deadline("EOD").unwrap(), NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn parses_12_hour_deadline() {
        assert_eq!(parse_deadline("10:30 AM").unwrap(), NaiveTime::from_hms_opt(10, 30, 0).unwrap());
    }

    #[test]
    fn symmetrize_fills_zero_from_other_triangle() {
        let mut matrix = vec![vec![0.0, 0.0, 0.0], vec![10.0, 0.0, 0.0], vec![25.0, 10.0, 0.0]];
        symmetrize(&mut matrix);
        assert_eq!(matrix[0][1], 10.0);
        assert_eq!(matrix[0][2], 25.0);
        assert_eq!(matrix[1][2], 10.0);
    }
}
