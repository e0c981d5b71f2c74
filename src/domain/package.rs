use std::rc::Rc;

use chrono::NaiveTime;

use crate::config::constant::{
    DELAYED_FLIGHT_EARLIEST_LOAD_HOUR, DELAYED_FLIGHT_EARLIEST_LOAD_MIN,
    WRONG_ADDRESS_EARLIEST_LOAD_HOUR, WRONG_ADDRESS_EARLIEST_LOAD_MIN,
};

/// A group of package ids that must be delivered together, in one contiguous
/// inter-depot segment of one truck. Shared by every member package via
/// `Rc` — identity, not content, is what matters when checking membership.
#[derive(Debug)]
pub struct LinkedGroup {
    pub members: Vec<u32>,
}

/// The result of parsing a package's free-form `SpecialNotes` field once at
/// construction time, so the evaluator and seeder never re-match strings in
/// their inner loops.
#[derive(Debug, Clone, PartialEq)]
pub enum PackageNote {
    None,
    DelayedFlight,
    WrongAddress,
    RequiredTruck(usize),
    LinkedWith(Vec<u32>),
}

/// Parses the four note forms the input data is known to contain. Any text
/// that doesn't match one of them is treated as `PackageNote::None` — free
/// text with no constraint implication.
pub fn parse_notes(raw: &str) -> PackageNote {
    let lower = raw.to_ascii_lowercase();

    if lower.contains("delayed on flight") {
        return PackageNote::DelayedFlight;
    }
    if lower.contains("wrong address") {
        return PackageNote::WrongAddress;
    }
    if let Some(rest) = lower.strip_prefix("can only be on truck ") {
        if let Ok(truck) = rest.trim().parse::<usize>() {
            return PackageNote::RequiredTruck(truck);
        }
    }
    if let Some(rest) = lower.strip_prefix("must be delivered with ") {
        let ids: Vec<u32> = rest
            .split(',')
            .filter_map(|part| part.trim().parse::<u32>().ok())
            .collect();
        if !ids.is_empty() {
            return PackageNote::LinkedWith(ids);
        }
    }

    PackageNote::None
}

/// The earliest-load override a note implies, if any (§9: notes are parsed
/// once, not re-matched by the seeder).
pub fn note_earliest_load_override(note: &PackageNote) -> Option<NaiveTime> {
    match note {
        PackageNote::DelayedFlight => NaiveTime::from_hms_opt(
            DELAYED_FLIGHT_EARLIEST_LOAD_HOUR,
            DELAYED_FLIGHT_EARLIEST_LOAD_MIN,
            0,
        ),
        PackageNote::WrongAddress => NaiveTime::from_hms_opt(
            WRONG_ADDRESS_EARLIEST_LOAD_HOUR,
            WRONG_ADDRESS_EARLIEST_LOAD_MIN,
            0,
        ),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Package {
    pub id: u32,
    pub location_id: u32,
    pub earliest_load: NaiveTime,
    pub delivery_deadline: NaiveTime,
    pub mass: u32,
    pub notes: String,
    pub note: PackageNote,
    pub required_truck: Option<usize>,
    pub linked_group: Option<Rc<LinkedGroup>>,
    pub assigned_truck: Option<usize>,
    pub load_time: Option<NaiveTime>,
    pub delivery_time: Option<NaiveTime>,
}

impl Package {
    pub fn new(
        id: u32,
        location_id: u32,
        delivery_deadline: NaiveTime,
        mass: u32,
        notes: String,
        start_of_day: NaiveTime,
    ) -> Self {
        let note = parse_notes(&notes);
        let earliest_load = note_earliest_load_override(&note).unwrap_or(start_of_day);
        let required_truck = match &note {
            PackageNote::RequiredTruck(n) => Some(*n),
            _ => None,
        };

        Package {
            id,
            location_id,
            earliest_load,
            delivery_deadline,
            mass,
            notes,
            note,
            required_truck,
            linked_group: None,
            assigned_truck: None,
            load_time: None,
            delivery_time: None,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.linked_group.is_some()
    }

    /// True when `self` and `other` belong to the same shared linked group.
    pub fn shares_group_with(&self, other: &Package) -> bool {
        match (&self.linked_group, &other.linked_group) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_delayed_flight_note() {
        assert_eq!(
            parse_notes("Delayed on flight---will not arrive to depot until 9:05 am"),
            PackageNote::DelayedFlight
        );
    }

    #[test]
    fn parses_wrong_address_note() {
        assert_eq!(parse_notes("Wrong address listed"), PackageNote::WrongAddress);
    }

    #[test]
    fn parses_required_truck_note() {
        assert_eq!(
            parse_notes("Can only be on truck 2"),
            PackageNote::RequiredTruck(2)
        );
    }

    #[test]
    fn parses_linked_with_note() {
        assert_eq!(
            parse_notes("Must be delivered with 13, 15"),
            PackageNote::LinkedWith(vec![13, 15])
        );
    }

    #[test]
    fn unparsed_note_is_none() {
        assert_eq!(parse_notes("Fragile"), PackageNote::None);
    }

    #[test]
    fn delayed_flight_overrides_earliest_load() {
        let start = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let deadline = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        let pkg = Package::new(
            9,
            1,
            deadline,
            1,
            "Delayed on flight---will not arrive to depot until 9:05 am".to_string(),
            start,
        );
        assert_eq!(pkg.earliest_load, NaiveTime::from_hms_opt(9, 5, 0).unwrap());
    }
}
