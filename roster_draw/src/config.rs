// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The availability of a person.
///
/// Only `Normal` persons are eligible for a draw.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Normal,
    Vacation,
    Sick,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Normal, Status::Vacation, Status::Sick];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Normal => "normal",
            Status::Vacation => "vacation",
            Status::Sick => "sick",
        }
    }

    /// Lenient parsing used at import time: anything that is not understood
    /// is considered to be `Normal`.
    pub fn parse_lenient(s: &str) -> Status {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for Status {
    type Err = RosterErrors;

    /// Accepts the english keys and the labels found in the roster spreadsheets.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "正常" => Ok(Status::Normal),
            "vacation" | "休假" => Ok(Status::Vacation),
            "sick" | "伤病" => Ok(Status::Sick),
            x => Err(RosterErrors::UnknownStatus(x.to_string())),
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A member of the roster.
///
/// The name is the identity of the person within a roster.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub department: String,
    pub position: String,
    pub name: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub remark: String,
}

/// How many persons of a position should be drawn in every department.
///
/// The count is signed on purpose: configurations typed by hand may contain
/// negative numbers. Any count <= 0 makes the configuration inert.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DrawConfig {
    pub position: String,
    pub count: i64,
}

impl DrawConfig {
    pub fn new(position: &str, count: i64) -> DrawConfig {
        DrawConfig {
            position: position.to_string(),
            count,
        }
    }

    /// The number of persons requested, with malformed counts mapped to 0.
    pub fn desired(&self) -> usize {
        self.count.max(0) as usize
    }
}

// ******** Output data structures *********

/// One selected person.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DrawResult {
    pub department: String,
    pub position: String,
    pub name: String,
    /// 1-based rank within the (department, position) draw.
    #[serde(rename = "drawNumber")]
    pub draw_number: u32,
    #[serde(rename = "drawTime")]
    pub draw_time: DateTime<Utc>,
}

/// A bucket for which fewer persons were available than requested.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Shortage {
    pub department: String,
    pub position: String,
    pub desired: usize,
    pub drawn: usize,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct DrawReport {
    pub results: Vec<DrawResult>,
    pub shortages: Vec<Shortage>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GridCell {
    pub names: Vec<String>,
    pub desired: usize,
    pub shortage: bool,
}

/// The department x role presentation of a draw.
///
/// Departments and roles follow the order of the fixed lists given to
/// [crate::aggregate]. Every pair has a cell.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Grid {
    pub roles: Vec<String>,
    pub rows: Vec<(String, Vec<(String, GridCell)>)>,
}

impl Grid {
    pub fn cell(&self, department: &str, role: &str) -> Option<&GridCell> {
        self.rows
            .iter()
            .find(|(d, _)| d == department)
            .and_then(|(_, cells)| cells.iter().find(|(r, _)| r == role))
            .map(|(_, c)| c)
    }

    pub fn shortage_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|(_, cells)| cells.iter())
            .filter(|(_, c)| c.shortage)
            .count()
    }
}

/// Number of persons per status in one department.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default, Serialize)]
pub struct StatusCounts {
    pub normal: u32,
    pub vacation: u32,
    pub sick: u32,
}

impl StatusCounts {
    pub fn add(&mut self, status: Status) {
        match status {
            Status::Normal => self.normal += 1,
            Status::Vacation => self.vacation += 1,
            Status::Sick => self.sick += 1,
        }
    }

    pub fn get(&self, status: Status) -> u32 {
        match status {
            Status::Normal => self.normal,
            Status::Vacation => self.vacation,
            Status::Sick => self.sick,
        }
    }

    pub fn total(&self) -> u32 {
        self.normal + self.vacation + self.sick
    }
}

/// Departments and roles found in a roster that the fixed lists do not know about.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Unlisted {
    pub departments: Vec<String>,
    pub roles: Vec<String>,
}

impl Unlisted {
    pub fn is_empty(&self) -> bool {
        self.departments.is_empty() && self.roles.is_empty()
    }
}

/// Errors when manipulating a roster. The draw itself never fails.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RosterErrors {
    UnknownPerson(String),
    UnknownStatus(String),
}

impl Error for RosterErrors {}

impl Display for RosterErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterErrors::UnknownPerson(name) => write!(f, "no person named {:?} in the roster", name),
            RosterErrors::UnknownStatus(s) => write!(f, "unknown status {:?}", s),
        }
    }
}

// ********* Configuration **********

pub const DEFAULT_DEPARTMENTS: [&str; 6] = [
    "AnZhen",
    "NewMaterialPark",
    "EHu",
    "GangXia",
    "YangJian",
    "DongBeiTang",
];

pub const DEFAULT_ROLES: [&str; 5] = [
    "Commander",
    "Fighter",
    "Communicator",
    "Driver",
    "SafetyOfficer",
];

/// The fixed layout used for draws and reports.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Layout {
    pub departments: Vec<String>,
    pub roles: Vec<String>,
}

impl Default for Layout {
    fn default() -> Layout {
        Layout {
            departments: DEFAULT_DEPARTMENTS.iter().map(|s| s.to_string()).collect(),
            roles: DEFAULT_ROLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
