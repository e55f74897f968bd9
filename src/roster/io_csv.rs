// Primitives for reading and writing CSV files.

use crate::roster::{
    io_common::{assemble_roster, get_col_indexes, TEMPLATE_HEADER},
    *,
};

pub fn read_csv_roster(path: &str) -> RdResult<Vec<Person>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_roster: {:?} {:?}", lineno, line);
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }

    let mut iter = rows.into_iter();
    let header = iter.next().context(EmptyRosterSnafu { path })?;
    // Spreadsheet programs like to start UTF-8 files with a byte order mark.
    let header: Vec<String> = header
        .iter()
        .map(|s| s.trim_start_matches('\u{feff}').to_string())
        .collect();
    debug!("read_csv_roster: header: {:?}", header);
    let cols = get_col_indexes(&header, path)?;
    assemble_roster(iter, &cols, path)
}

/// Writes an import template with one example row.
pub fn write_template(path: &str) -> RdResult<()> {
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path })?;
    wtr.write_record(TEMPLATE_HEADER)
        .context(CsvWriteSnafu { path })?;
    wtr.write_record(["AnZhen", "Fighter", "Zhang San", "正常", ""])
        .context(CsvWriteSnafu { path })?;
    wtr.flush()
        .map_err(csv::Error::from)
        .context(CsvWriteSnafu { path })?;
    info!("Template written to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn csv_roster() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "\u{feff}部门,岗位,姓名,状态,备注").unwrap();
        writeln!(f, "AnZhen,Fighter,Li,正常,").unwrap();
        writeln!(f, "AnZhen,Driver,Wang,vacation,leave").unwrap();
        writeln!(f, "AnZhen,,Nobody,,").unwrap();
        writeln!(f, "EHu,Fighter,Zhao").unwrap();
        let path = f.path().display().to_string();

        let roster = read_csv_roster(&path).unwrap();
        let names: Vec<&str> = roster.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Li", "Wang", "Zhao"]);
        assert_eq!(roster[1].status, Status::Vacation);
        assert_eq!(roster[1].remark, "leave");
    }

    #[test]
    fn header_only() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "department,position,name").unwrap();
        let path = f.path().display().to_string();
        assert!(matches!(
            read_csv_roster(&path),
            Err(DrawError::EmptyRoster { .. })
        ));
    }

    #[test]
    fn template_can_be_imported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.csv").display().to_string();
        write_template(&path).unwrap();
        let roster = read_csv_roster(&path).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].department, "AnZhen");
        assert_eq!(roster[0].status, Status::Normal);
    }
}
