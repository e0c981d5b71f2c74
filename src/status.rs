//! Read-path status lookup over a finished plan (§4.M/§7). The interactive
//! terminal loop that would normally sit on top of this is out of scope —
//! this module only produces the structured rows and a plain-text table a
//! presentation layer (the owning CLI, here) can render.

use chrono::NaiveTime;
use colored::Colorize;

use crate::domain::plan::Plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStatus {
    NotReady,
    AtHub,
    EnRoute,
    Delivered,
}

impl std::fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PackageStatus::NotReady => "NOT READY",
            PackageStatus::AtHub => "AT HUB",
            PackageStatus::EnRoute => "EN ROUTE",
            PackageStatus::Delivered => "DELIVERED",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StatusRow {
    pub package_id: u32,
    /// `None` when `package_id` does not appear in the plan at all.
    pub status: Option<PackageStatus>,
}

/// For every requested package id, finds it in `plan` (if present) and
/// classifies it against `time` per §7: `NOT READY` before `earliest_load`,
/// `AT HUB` from there until `load_time`, `EN ROUTE` from there until
/// `delivery_time`, `DELIVERED` after.
pub fn lookup_status(plan: &Plan, time: NaiveTime, package_ids: &[u32]) -> Vec<StatusRow> {
    package_ids
        .iter()
        .map(|&id| {
            let found = plan
                .trucks
                .iter()
                .find_map(|truck| truck.route.packages.iter().find(|pkg| pkg.id == id));
            StatusRow {
                package_id: id,
                status: found.map(|pkg| classify(pkg.earliest_load, pkg.load_time, pkg.delivery_time, time)),
            }
        })
        .collect()
}

fn classify(
    earliest_load: NaiveTime,
    load_time: Option<NaiveTime>,
    delivery_time: Option<NaiveTime>,
    time: NaiveTime,
) -> PackageStatus {
    if time < earliest_load {
        return PackageStatus::NotReady;
    }
    match (load_time, delivery_time) {
        (Some(load_time), Some(delivery_time)) => {
            if time < load_time {
                PackageStatus::AtHub
            } else if time < delivery_time {
                PackageStatus::EnRoute
            } else {
                PackageStatus::Delivered
            }
        }
        // The plan hasn't been evaluated yet, so there's nothing beyond the
        // earliest_load/not-ready boundary to distinguish.
        _ => PackageStatus::AtHub,
    }
}

/// A `colored`-highlighted table, mirroring the teacher's `print_solution`
/// pretty-printing without being the interactive REPL itself.
pub fn format_table(rows: &[StatusRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let line = match row.status {
            Some(PackageStatus::Delivered) => format!("{:>6}  {}", row.package_id, row.status.unwrap().to_string().green()),
            Some(PackageStatus::NotReady) => format!("{:>6}  {}", row.package_id, row.status.unwrap().to_string().red()),
            Some(status) => format!("{:>6}  {}", row.package_id, status.to_string().yellow()),
            None => format!("{:>6}  {}", row.package_id, "UNKNOWN PACKAGE".red()),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::package::Package;
    use crate::domain::plan::Plan;
    use crate::domain::truck::Truck;
    use std::rc::Rc;

    fn plan_with_one_package() -> Plan {
        let mut truck = Truck::new(1, 16, 18.0, NaiveTime::from_hms_opt(8, 0, 0).unwrap(), 0);
        {
            let route = Rc::get_mut(&mut truck.route).unwrap();
            let mut pkg = Package::new(
                1,
                1,
                NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
                1,
                String::new(),
                NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            );
            pkg.load_time = Some(NaiveTime::from_hms_opt(8, 10, 0).unwrap());
            pkg.delivery_time = Some(NaiveTime::from_hms_opt(8, 40, 0).unwrap());
            route.packages.push(pkg);
        }
        Plan::new(vec![truck])
    }

    #[test]
    fn before_earliest_load_is_not_ready() {
        let plan = plan_with_one_package();
        let rows = lookup_status(&plan, NaiveTime::from_hms_opt(7, 0, 0).unwrap(), &[1]);
        assert_eq!(rows[0].status, Some(PackageStatus::NotReady));
    }

    #[test]
    fn after_delivery_time_is_delivered() {
        let plan = plan_with_one_package();
        let rows = lookup_status(&plan, NaiveTime::from_hms_opt(23, 59, 0).unwrap(), &[1]);
        assert_eq!(rows[0].status, Some(PackageStatus::Delivered));
    }

    #[test]
    fn unknown_package_id_is_none() {
        let plan = plan_with_one_package();
        let rows = lookup_status(&plan, NaiveTime::from_hms_opt(9, 0, 0).unwrap(), &[999]);
        assert_eq!(rows[0].status, None);
    }
}
