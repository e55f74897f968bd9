use crate::roster::*;

use roster_draw::builder::RosterBuilder;

use std::collections::HashMap;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// The column names of the template, in order.
pub const TEMPLATE_HEADER: [&str; 5] = ["部门", "岗位", "姓名", "状态", "备注"];

/// Location of the fields in a row.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ColumnIndexes {
    pub department: usize,
    pub position: usize,
    pub name: usize,
    pub status: Option<usize>,
    pub remark: Option<usize>,
}

/// Finds the columns of the roster from the header row.
///
/// Both the names of the template and their english equivalents are accepted.
pub fn get_col_indexes(header: &[String], path: &str) -> RdResult<ColumnIndexes> {
    // A repeated column name refers to its first occurrence.
    let mut col_names: HashMap<String, usize> = HashMap::new();
    for (idx, s) in header.iter().enumerate() {
        col_names.entry(s.trim().to_lowercase()).or_insert(idx);
    }
    debug!("get_col_indexes: col_names: {:?}", col_names);

    let find = |aliases: &[&str]| aliases.iter().find_map(|a| col_names.get(*a).cloned());

    let department = find(&["部门", "department"][..]);
    let position = find(&["岗位", "position"][..]);
    let name = find(&["姓名", "name"][..]);

    let missing: Vec<String> = [(department, "部门"), (position, "岗位"), (name, "姓名")]
        .iter()
        .filter(|(idx, _)| idx.is_none())
        .map(|(_, cname)| cname.to_string())
        .collect();
    match (department, position, name) {
        (Some(department), Some(position), Some(name)) => Ok(ColumnIndexes {
            department,
            position,
            name,
            status: find(&["状态", "status"][..]),
            remark: find(&["备注", "remark"][..]),
        }),
        _ => MissingColumnsSnafu {
            path,
            columns: missing,
        }
        .fail(),
    }
}

/// Turns the data rows (header excluded) into a roster. Incomplete rows are dropped.
pub fn assemble_roster<I>(rows: I, cols: &ColumnIndexes, path: &str) -> RdResult<Vec<Person>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut builder = RosterBuilder::new();
    let mut num_rows = 0;
    for row in rows {
        // Blank lines at the end of spreadsheets are common.
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        num_rows += 1;
        let get = |idx: usize| row.get(idx).map(|s| s.as_str());
        builder.add_row(
            get(cols.department),
            get(cols.position),
            get(cols.name),
            cols.status.and_then(get),
            cols.remark.and_then(get),
        );
    }
    ensure!(num_rows > 0, EmptyRosterSnafu { path });
    if builder.discarded() > 0 {
        warn!(
            "{}: skipped {} rows without department, position or name",
            simplify_file_name(path),
            builder.discarded()
        );
    }
    let roster = builder.build();
    info!("{}: read {} persons", simplify_file_name(path), roster.len());
    Ok(roster)
}
