pub mod builder;
mod config;
pub mod manual;
pub mod quick_start;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use std::collections::{BTreeSet, HashSet};

pub use crate::config::*;

/// Runs a draw over the roster for every department and every configuration.
///
/// Arguments:
/// * `roster` the persons to draw from. It is not modified.
/// * `configs` the number of persons to draw per position, in every department
/// * `departments` the departments to draw for, in order
/// * `rng` the source of randomness
///
/// All the results are stamped with the current time.
pub fn draw<R: Rng + ?Sized>(
    roster: &[Person],
    configs: &[DrawConfig],
    departments: &[String],
    rng: &mut R,
) -> DrawReport {
    draw_at(roster, configs, departments, rng, Utc::now())
}

/// Same as [draw], with an explicit timestamp for the results.
pub fn draw_at<R: Rng + ?Sized>(
    roster: &[Person],
    configs: &[DrawConfig],
    departments: &[String],
    rng: &mut R,
    draw_time: DateTime<Utc>,
) -> DrawReport {
    info!(
        "draw: {} persons, {} configs, {} departments",
        roster.len(),
        configs.len(),
        departments.len()
    );
    let mut report = DrawReport::default();
    for department in departments.iter() {
        for config in configs.iter() {
            draw_bucket(roster, department, config, rng, draw_time, &mut report);
        }
    }
    info!(
        "draw: selected {} persons, {} shortages",
        report.results.len(),
        report.shortages.len()
    );
    report
}

fn draw_bucket<R: Rng + ?Sized>(
    roster: &[Person],
    department: &str,
    config: &DrawConfig,
    rng: &mut R,
    draw_time: DateTime<Utc>,
    report: &mut DrawReport,
) {
    let desired = config.desired();
    if desired == 0 {
        // Inert configuration, including negative counts.
        return;
    }

    let mut eligible: Vec<&Person> = roster
        .iter()
        .filter(|p| {
            p.department == department && p.position == config.position && p.status == Status::Normal
        })
        .collect();
    let k = desired.min(eligible.len());
    debug!(
        "draw_bucket: {} / {}: {} eligible, drawing {}",
        department,
        config.position,
        eligible.len(),
        k
    );

    if k > 0 {
        // Full Fisher-Yates shuffle: every permutation is equally likely.
        eligible.shuffle(rng);
        for (idx, p) in eligible.iter().take(k).enumerate() {
            report.results.push(DrawResult {
                department: department.to_string(),
                position: config.position.clone(),
                name: p.name.clone(),
                draw_number: (idx + 1) as u32,
                draw_time,
            });
        }
    }

    if k < desired {
        warn!(
            "Not enough available persons for {} in {}: requested {}, drew {}",
            config.position, department, desired, k
        );
        report.shortages.push(Shortage {
            department: department.to_string(),
            position: config.position.clone(),
            desired,
            drawn: k,
        });
    }
}

/// Organizes the results of a draw into a department x role grid.
///
/// Every pair of the fixed lists gets a cell. Results for a department or a
/// role outside of the lists are dropped.
pub fn aggregate(
    results: &[DrawResult],
    departments: &[String],
    roles: &[String],
    configs: &[DrawConfig],
) -> Grid {
    let mut rows: Vec<(String, Vec<(String, GridCell)>)> = departments
        .iter()
        .map(|d| {
            let cells = roles
                .iter()
                .map(|r| {
                    (
                        r.clone(),
                        GridCell {
                            names: Vec::new(),
                            desired: required_count(configs, r),
                            shortage: false,
                        },
                    )
                })
                .collect();
            (d.clone(), cells)
        })
        .collect();

    for r in results.iter() {
        let cell = rows
            .iter_mut()
            .find(|(d, _)| *d == r.department)
            .and_then(|(_, cells)| cells.iter_mut().find(|(role, _)| *role == r.position));
        match cell {
            Some((_, c)) => c.names.push(r.name.clone()),
            None => {
                debug!(
                    "aggregate: dropping result outside of the layout: {} / {} / {}",
                    r.department, r.position, r.name
                );
            }
        }
    }

    for (_, cells) in rows.iter_mut() {
        for (_, c) in cells.iter_mut() {
            c.shortage = c.names.len() < c.desired;
        }
    }

    Grid {
        roles: roles.to_vec(),
        rows,
    }
}

/// The count requested for a role. The first matching configuration wins.
pub fn required_count(configs: &[DrawConfig], role: &str) -> usize {
    configs
        .iter()
        .find(|c| c.position == role)
        .map(|c| c.desired())
        .unwrap_or(0)
}

// ******** Roster helpers *********

/// Changes the status of the first person with this name, and the remark if one is given.
pub fn update_status(
    roster: &mut [Person],
    name: &str,
    status: Status,
    remark: Option<&str>,
) -> Result<(), RosterErrors> {
    let person = roster
        .iter_mut()
        .find(|p| p.name == name)
        .ok_or_else(|| RosterErrors::UnknownPerson(name.to_string()))?;
    debug!(
        "update_status: {}: {} -> {}",
        name, person.status, status
    );
    person.status = status;
    if let Some(r) = remark {
        person.remark = r.to_string();
    }
    Ok(())
}

/// Criteria to select persons of a roster. Empty criteria select everyone.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct PersonnelFilter {
    pub department: Option<String>,
    pub position: Option<String>,
    pub status: Option<Status>,
    /// Case-insensitive, matched against the name, the department and the position.
    pub search: Option<String>,
}

impl PersonnelFilter {
    pub fn matches(&self, p: &Person) -> bool {
        let search = self
            .search
            .as_ref()
            .map(|s| s.to_lowercase())
            .filter(|s| !s.is_empty());
        self.department.as_ref().map_or(true, |d| *d == p.department)
            && self.position.as_ref().map_or(true, |x| *x == p.position)
            && self.status.map_or(true, |s| s == p.status)
            && search.map_or(true, |s| {
                p.name.to_lowercase().contains(&s)
                    || p.department.to_lowercase().contains(&s)
                    || p.position.to_lowercase().contains(&s)
            })
    }
}

pub fn filter_personnel<'a>(roster: &'a [Person], filter: &PersonnelFilter) -> Vec<&'a Person> {
    roster.iter().filter(|p| filter.matches(p)).collect()
}

/// Departments in order of first appearance.
pub fn distinct_departments<'a, I>(persons: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Person>,
{
    distinct(persons.into_iter().map(|p| p.department.as_str()))
}

/// Positions in order of first appearance.
pub fn distinct_positions<'a, I>(persons: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Person>,
{
    distinct(persons.into_iter().map(|p| p.position.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(|v| v.to_string())
        .collect()
}

/// Counts of persons per status, for each department (in order of first appearance).
pub fn status_distribution<'a, I>(persons: I) -> Vec<(String, StatusCounts)>
where
    I: IntoIterator<Item = &'a Person>,
{
    let mut res: Vec<(String, StatusCounts)> = Vec::new();
    for p in persons {
        match res.iter_mut().find(|(d, _)| *d == p.department) {
            Some((_, counts)) => counts.add(p.status),
            None => {
                let mut counts = StatusCounts::default();
                counts.add(p.status);
                res.push((p.department.clone(), counts));
            }
        }
    }
    res
}

/// Number of available persons for a position, per department.
///
/// Departments without any available person for this position are omitted.
pub fn availability(roster: &[Person], position: &str) -> Vec<(String, u32)> {
    let mut res: Vec<(String, u32)> = Vec::new();
    for p in roster
        .iter()
        .filter(|p| p.position == position && p.status == Status::Normal)
    {
        match res.iter_mut().find(|(d, _)| *d == p.department) {
            Some((_, count)) => *count += 1,
            None => res.push((p.department.clone(), 1)),
        }
    }
    res
}

/// One configuration per position of the roster, requesting one person each.
pub fn default_configs(roster: &[Person]) -> Vec<DrawConfig> {
    distinct_positions(roster)
        .iter()
        .map(|pos| DrawConfig::new(pos, 1))
        .collect()
}

/// The departments and roles of the roster that are not part of the fixed lists.
///
/// Persons in these will never be drawn nor exported.
pub fn unlisted_entries(roster: &[Person], departments: &[String], roles: &[String]) -> Unlisted {
    let known_d: HashSet<&str> = departments.iter().map(|s| s.as_str()).collect();
    let known_r: HashSet<&str> = roles.iter().map(|s| s.as_str()).collect();
    let unknown_d: BTreeSet<String> = roster
        .iter()
        .filter(|p| !known_d.contains(p.department.as_str()))
        .map(|p| p.department.clone())
        .collect();
    let unknown_r: BTreeSet<String> = roster
        .iter()
        .filter(|p| !known_r.contains(p.position.as_str()))
        .map(|p| p.position.clone())
        .collect();
    Unlisted {
        departments: unknown_d.into_iter().collect(),
        roles: unknown_r.into_iter().collect(),
    }
}
