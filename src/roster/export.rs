// Presentation of the roster and of the results: terminal tables, CSV and JSON.

use crate::roster::*;

use serde_json::json;
use serde_json::Map as JSMap;

/// Separator between names in a cell.
pub const NAME_SEPARATOR: &str = "、";
/// Content of a cell without anyone.
pub const EMPTY_CELL: &str = "-";

pub fn cell_text(cell: &GridCell) -> String {
    if cell.names.is_empty() {
        EMPTY_CELL.to_string()
    } else {
        cell.names.join(NAME_SEPARATOR)
    }
}

/// The table for export: a header row, then one row per department.
pub fn grid_table(grid: &Grid) -> Vec<Vec<String>> {
    let mut header = vec!["Unit".to_string()];
    header.extend(grid.roles.iter().cloned());
    let mut table = vec![header];
    for (department, cells) in grid.rows.iter() {
        let mut row = vec![department.clone()];
        row.extend(cells.iter().map(|(_, c)| cell_text(c)));
        table.push(row);
    }
    table
}

pub fn write_grid_csv(grid: &Grid, path: &str) -> RdResult<()> {
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path })?;
    for row in grid_table(grid) {
        wtr.write_record(&row).context(CsvWriteSnafu { path })?;
    }
    wtr.flush()
        .map_err(csv::Error::from)
        .context(CsvWriteSnafu { path })?;
    info!("write_grid_csv: {} departments written to {:?}", grid.rows.len(), path);
    Ok(())
}

/// Prints the grid. Cells with fewer persons than requested are marked with `!`.
pub fn print_grid(grid: &Grid) {
    for (department, cells) in grid.rows.iter() {
        println!("{}", department);
        for (role, c) in cells.iter() {
            let mark = if c.shortage {
                format!(" ! requested {}, only {} available", c.desired, c.names.len())
            } else {
                String::new()
            };
            println!("    {:<16} {}{}", role, cell_text(c), mark);
        }
    }
    let shortages = grid.shortage_count();
    if shortages > 0 {
        println!("{} cells with missing persons", shortages);
    }
}

pub fn print_personnel(persons: &[&Person]) {
    for p in persons.iter() {
        println!(
            "{:<20} {:<16} {:<16} {:<10} {}",
            p.department,
            p.position,
            p.name,
            p.status.as_str(),
            p.remark
        );
    }
    println!("{} persons", persons.len());
}

pub fn print_status_distribution(dist: &[(String, StatusCounts)]) {
    let names: Vec<&str> = Status::ALL.iter().map(|s| s.as_str()).collect();
    println!("{:<20} {:>8} {:>8} {:>8}", "department", names[0], names[1], names[2]);
    for (department, counts) in dist.iter() {
        let values: Vec<u32> = Status::ALL.iter().map(|s| counts.get(*s)).collect();
        println!(
            "{:<20} {:>8} {:>8} {:>8}",
            department, values[0], values[1], values[2]
        );
    }
}

fn grid_to_json(grid: &Grid) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for (department, cells) in grid.rows.iter() {
        let mut js_cells: Vec<JSValue> = Vec::new();
        for (role, c) in cells.iter() {
            js_cells.push(json!({
                "role": role,
                "names": c.names,
                "desired": c.desired,
                "shortage": c.shortage,
            }));
        }
        l.push(json!({"department": department, "cells": js_cells}));
    }
    l
}

/// The summary of a draw. It does not contain the time of the draw, so that
/// two draws with the same seed have the same summary.
pub fn build_summary_js(
    layout: &Layout,
    configs: &[DrawConfig],
    grid: &Grid,
    shortages: &[Shortage],
) -> JSValue {
    let mut draws: JSMap<String, JSValue> = JSMap::new();
    for c in configs.iter() {
        // The first entry for a position is the one that counts.
        draws.entry(c.position.clone()).or_insert(json!(c.count));
    }
    json!({
        "config": {
            "departments": layout.departments,
            "roles": layout.roles,
            "draws": draws,
        },
        "results": grid_to_json(grid),
        "shortages": shortages,
    })
}
