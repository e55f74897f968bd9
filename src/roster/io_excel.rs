use calamine::{open_workbook_auto, DataType, Reader};

use crate::roster::{
    io_common::{assemble_roster, get_col_indexes},
    *,
};

pub fn read_excel_roster(path: &str, worksheet_name: Option<&str>) -> RdResult<Vec<Person>> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyRosterSnafu { path })?
        .iter()
        .map(read_cell)
        .collect();
    debug!("read_excel_roster: header: {:?}", header);
    let cols = get_col_indexes(&header, path)?;

    let rows = iter.enumerate().map(|(idx, row)| {
        debug!("read_excel_roster: idx: {:?} row: {:?}", idx, row);
        row.iter().map(read_cell).collect::<Vec<String>>()
    });
    assemble_roster(rows, &cols, path)
}

/// Renders a cell as text. Numbers are common for names made of employee ids.
fn read_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        _ => {
            debug!("read_cell: ignoring cell {:?}", cell);
            String::new()
        }
    }
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> RdResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name_o
    );
    let mut workbook = open_workbook_auto(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name,
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        // Otherwise the roster is the first worksheet.
        let first = workbook.sheet_names().first().cloned();
        debug!("get_range: path: {:?} first worksheet: {:?}", path, first);
        let wrange = workbook
            .worksheet_range_at(0)
            .context(EmptyWorkbookSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    }
}
