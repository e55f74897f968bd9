pub use crate::config::*;

use log::debug;

/// A builder for assembling a roster out of raw spreadsheet rows.
///
/// Rows missing a department, a position or a name are dropped. The status
/// defaults to `normal` when it is empty or not understood.
///
/// ```
/// use roster_draw::builder::RosterBuilder;
/// use roster_draw::Status;
///
/// let mut builder = RosterBuilder::new();
/// builder.add_row(Some("AnZhen"), Some("Fighter"), Some(" Li Wei "), Some("sick"), None);
/// builder.add_row(Some("AnZhen"), Some(""), Some("Nobody"), None, None);
///
/// assert_eq!(builder.discarded(), 1);
/// let roster = builder.build();
/// assert_eq!(roster.len(), 1);
/// assert_eq!(roster[0].name, "Li Wei");
/// assert_eq!(roster[0].status, Status::Sick);
/// ```
#[derive(Debug, Default)]
pub struct RosterBuilder {
    pub(crate) _persons: Vec<Person>,
    pub(crate) _discarded: usize,
}

impl RosterBuilder {
    pub fn new() -> RosterBuilder {
        RosterBuilder::default()
    }

    /// Adds a raw row. Returns true if the row was kept.
    pub fn add_row(
        &mut self,
        department: Option<&str>,
        position: Option<&str>,
        name: Option<&str>,
        status: Option<&str>,
        remark: Option<&str>,
    ) -> bool {
        let clean = |s: Option<&str>| s.map(|x| x.trim().to_string()).unwrap_or_default();
        let person = Person {
            department: clean(department),
            position: clean(position),
            name: clean(name),
            status: Status::parse_lenient(status.unwrap_or("")),
            remark: clean(remark),
        };
        self.add_person(person)
    }

    pub fn add_person(&mut self, person: Person) -> bool {
        if person.department.is_empty() || person.position.is_empty() || person.name.is_empty() {
            debug!("add_person: discarding incomplete row {:?}", person);
            self._discarded += 1;
            return false;
        }
        self._persons.push(person);
        true
    }

    /// The number of rows rejected so far.
    pub fn discarded(&self) -> usize {
        self._discarded
    }

    pub fn build(self) -> Vec<Person> {
        self._persons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_defaults_to_normal() {
        let mut b = RosterBuilder::new();
        assert!(b.add_row(Some("EHu"), Some("Driver"), Some("A"), Some("away"), None));
        assert!(b.add_row(Some("EHu"), Some("Driver"), Some("B"), Some("休假"), Some(" note ")));
        let roster = b.build();
        assert_eq!(roster[0].status, Status::Normal);
        assert_eq!(roster[1].status, Status::Vacation);
        assert_eq!(roster[1].remark, "note");
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut b = RosterBuilder::new();
        assert!(!b.add_row(None, Some("Driver"), Some("A"), None, None));
        assert!(!b.add_row(Some("EHu"), Some("   "), Some("A"), None, None));
        assert!(!b.add_row(Some("EHu"), Some("Driver"), None, None, None));
        assert_eq!(b.discarded(), 3);
        assert!(b.build().is_empty());
    }
}
