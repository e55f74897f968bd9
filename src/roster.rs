pub mod config_reader;
pub mod export;
mod io_common;
mod io_csv;
mod io_excel;
pub mod store;

use log::{debug, info, warn};

use roster_draw::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::{Args, Command, DrawArgs, FilterArgs, ImportArgs};
use crate::roster::config_reader::*;
use crate::roster::store::State;

pub const DEFAULT_STATE_FILE: &str = "rosterdraw_state.json";

#[derive(Debug, Snafu)]
pub enum DrawError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("Cannot find the worksheet {name} in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("The file {path} does not have any worksheet"))]
    EmptyWorkbook { path: String },
    #[snafu(display("The file {path} does not contain any data"))]
    EmptyRoster { path: String },
    #[snafu(display("The file {path} is missing the columns: {}", columns.join(", ")))]
    MissingColumns { path: String, columns: Vec<String> },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing to JSON"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Unknown input type {input_type}: expected excel or csv"))]
    UnsupportedInputType { input_type: String },
    #[snafu(display("Cannot understand the draw {arg}: expected POSITION=COUNT"))]
    InvalidDrawArgument { arg: String },
    #[snafu(display("No roster file provided: use --input or the input of the configuration"))]
    MissingInput {},
    #[snafu(display("Cannot find the directory of {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("{source}"))]
    Roster { source: RosterErrors },
    #[snafu(display("Difference detected between the draw summary and the reference summary {path}"))]
    ReferenceMismatch { path: String },
}

pub type RdResult<T> = Result<T, DrawError>;

/// Everything a command needs: the layout, the default draws and where the state lives.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: RosterDrawConfig,
    /// The directory against which the relative paths of the configuration are resolved.
    pub root: PathBuf,
    pub layout: Layout,
    pub state_path: String,
}

impl Session {
    pub fn from_args(args: &Args) -> RdResult<Session> {
        let (config, root) = match &args.config {
            Some(p) => read_config(p)?,
            None => (RosterDrawConfig::default(), PathBuf::from(".")),
        };
        let state_path = match (&args.state, &config.state_file) {
            (Some(s), _) => s.clone(),
            (None, Some(s)) => root.join(s).display().to_string(),
            (None, None) => DEFAULT_STATE_FILE.to_string(),
        };
        let layout = config.layout();
        debug!("session: layout {:?} state {:?}", layout, state_path);
        Ok(Session {
            config,
            root,
            layout,
            state_path,
        })
    }
}

pub fn run(args: &Args) -> RdResult<()> {
    let session = Session::from_args(args)?;
    match &args.command {
        Command::Import(ia) => run_import(&session, ia),
        Command::Template { out } => io_csv::write_template(out),
        Command::List(fa) => run_list(&session, fa),
        Command::Stats(fa) => run_stats(&session, fa),
        Command::Availability => run_availability(&session),
        Command::Edit {
            name,
            status,
            remark,
        } => run_edit(&session, name, status, remark.as_deref()),
        Command::Draw(da) => run_draw(&session, da),
        Command::Show => run_show(&session),
        Command::Export { out } => run_export(&session, out),
    }
}

/// Reads a roster file. The type is given or guessed from the extension.
pub fn read_roster(
    path: &str,
    input_type: Option<&str>,
    worksheet_name: Option<&str>,
) -> RdResult<Vec<Person>> {
    let guessed = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    let itype = match (input_type, guessed.as_deref()) {
        (Some(t), _) => t.to_string(),
        (None, Some("xlsx")) | (None, Some("xls")) | (None, Some("xlsm")) => "excel".to_string(),
        (None, _) => "csv".to_string(),
    };
    info!(
        "Attempting to read roster file {:?} as {}",
        io_common::simplify_file_name(path),
        itype
    );
    match itype.as_str() {
        "excel" => io_excel::read_excel_roster(path, worksheet_name),
        "csv" => io_csv::read_csv_roster(path),
        x => UnsupportedInputTypeSnafu { input_type: x }.fail(),
    }
}

fn run_import(session: &Session, ia: &ImportArgs) -> RdResult<()> {
    let source = session.config.input.clone();
    let (path, worksheet, provider) = match (&ia.input, &source) {
        (Some(p), _) => (p.clone(), ia.excel_worksheet_name.clone(), ia.input_type.clone()),
        (None, Some(src)) => (
            session.root.join(&src.file_path).display().to_string(),
            ia.excel_worksheet_name
                .clone()
                .or_else(|| src.excel_worksheet_name.clone()),
            ia.input_type.clone().or_else(|| src.provider.clone()),
        ),
        (None, None) => return MissingInputSnafu {}.fail(),
    };

    let personnel = read_roster(&path, provider.as_deref(), worksheet.as_deref())?;
    warn_unlisted(&personnel, &session.layout);

    // The roster is replaced, the previous results are kept until the next draw.
    let mut state = store::load_state(&session.state_path)?;
    state.personnel = personnel;
    store::save_state(&state, &session.state_path)?;
    println!("Imported {} persons", state.personnel.len());
    Ok(())
}

fn warn_unlisted(personnel: &[Person], layout: &Layout) {
    let unlisted = unlisted_entries(personnel, &layout.departments, &layout.roles);
    if !unlisted.departments.is_empty() {
        warn!(
            "These departments are not configured and will not be drawn: {}",
            unlisted.departments.join(", ")
        );
    }
    if !unlisted.roles.is_empty() {
        warn!(
            "These positions are not configured roles and will not be reported: {}",
            unlisted.roles.join(", ")
        );
    }
}

fn make_filter(fa: &FilterArgs) -> RdResult<PersonnelFilter> {
    let status = match &fa.status {
        Some(s) => Some(s.parse::<Status>().context(RosterSnafu {})?),
        None => None,
    };
    Ok(PersonnelFilter {
        department: fa.department.clone(),
        position: fa.position.clone(),
        status,
        search: fa.search.clone(),
    })
}

fn run_list(session: &Session, fa: &FilterArgs) -> RdResult<()> {
    let state = store::load_state(&session.state_path)?;
    let filter = make_filter(fa)?;
    let selected = filter_personnel(&state.personnel, &filter);
    export::print_personnel(&selected);
    Ok(())
}

fn run_stats(session: &Session, fa: &FilterArgs) -> RdResult<()> {
    let state = store::load_state(&session.state_path)?;
    let filter = make_filter(fa)?;
    let selected = filter_personnel(&state.personnel, &filter);
    let dist = status_distribution(selected.iter().cloned());
    export::print_status_distribution(&dist);
    Ok(())
}

fn run_availability(session: &Session) -> RdResult<()> {
    let state = store::load_state(&session.state_path)?;
    let configs = session
        .config
        .draw_configs()
        .unwrap_or_else(|| default_configs(&state.personnel));
    for c in configs.iter() {
        let counts: Vec<String> = availability(&state.personnel, &c.position)
            .iter()
            .map(|(d, n)| format!("{}: {}", d, n))
            .collect();
        println!("{} (requested {}): {}", c.position, c.count, counts.join(", "));
    }
    Ok(())
}

fn run_edit(session: &Session, name: &str, status: &str, remark: Option<&str>) -> RdResult<()> {
    let status: Status = status.parse().context(RosterSnafu {})?;
    let mut state = store::load_state(&session.state_path)?;
    update_status(&mut state.personnel, name, status, remark).context(RosterSnafu {})?;
    store::save_state(&state, &session.state_path)?;
    info!("{} is now {}", name, status);
    Ok(())
}

/// Reads the `POSITION=COUNT` arguments of the command line.
pub fn parse_draw_arguments(args: &[String]) -> RdResult<Vec<DrawConfig>> {
    let mut res: Vec<DrawConfig> = Vec::new();
    for arg in args.iter() {
        let (pos, count) = arg
            .rsplit_once('=')
            .context(InvalidDrawArgumentSnafu { arg: arg.clone() })?;
        let count = count
            .trim()
            .parse::<i64>()
            .ok()
            .context(InvalidDrawArgumentSnafu { arg: arg.clone() })?;
        let pos = pos.trim();
        ensure!(!pos.is_empty(), InvalidDrawArgumentSnafu { arg: arg.clone() });
        res.push(DrawConfig::new(pos, count));
    }
    Ok(res)
}

/// The draws of the command line, else of the configuration, else one person per position.
fn resolve_draws(session: &Session, da: &DrawArgs, personnel: &[Person]) -> RdResult<Vec<DrawConfig>> {
    if !da.draws.is_empty() {
        return parse_draw_arguments(&da.draws);
    }
    if let Some(configs) = session.config.draw_configs() {
        return Ok(configs);
    }
    info!("No draw configured, drawing one person for every position of the roster");
    Ok(default_configs(personnel))
}

fn run_draw(session: &Session, da: &DrawArgs) -> RdResult<()> {
    let mut state = store::load_state(&session.state_path)?;
    let configs = resolve_draws(session, da, &state.personnel)?;
    info!("draws: {:?}", configs);
    warn_unlisted(&state.personnel, &session.layout);

    let report = match da.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            draw(&state.personnel, &configs, &session.layout.departments, &mut rng)
        }
        None => {
            let mut rng = rand::thread_rng();
            draw(&state.personnel, &configs, &session.layout.departments, &mut rng)
        }
    };

    // A new draw always replaces the previous one.
    state.drawing_results = report.results.clone();
    state.draw_configs = configs.clone();
    store::save_state(&state, &session.state_path)?;

    let grid = aggregate(
        &report.results,
        &session.layout.departments,
        &session.layout.roles,
        &configs,
    );
    export::print_grid(&grid);

    let summary = export::build_summary_js(&session.layout, &configs, &grid, &report.shortages);
    let pretty_js = serde_json::to_string_pretty(&summary).context(SerializingJsonSnafu {})?;
    match da.out.as_deref() {
        Some("stdout") => println!("summary:{}", pretty_js),
        Some(p) => fs::write(p, &pretty_js).context(WritingFileSnafu { path: p })?,
        None => {}
    }

    if let Some(reference_p) = &da.reference {
        check_reference(reference_p, &pretty_js)?;
    }
    Ok(())
}

fn check_reference(reference_p: &str, pretty_js: &str) -> RdResult<()> {
    let contents = fs::read_to_string(reference_p).context(OpeningJsonSnafu { path: reference_p })?;
    let reference: JSValue =
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path: reference_p })?;
    let pretty_ref = serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
    if pretty_ref != pretty_js {
        warn!("Found differences with the reference summary");
        print_diff(pretty_ref.as_str(), pretty_js, "\n");
        return ReferenceMismatchSnafu { path: reference_p }.fail();
    }
    info!("The draw matches the reference {:?}", reference_p);
    Ok(())
}

fn stored_grid(session: &Session, state: &State) -> Grid {
    aggregate(
        &state.drawing_results,
        &session.layout.departments,
        &session.layout.roles,
        &state.draw_configs,
    )
}

fn run_show(session: &Session) -> RdResult<()> {
    let state = store::load_state(&session.state_path)?;
    if let Some(t) = state.drawing_results.first().map(|r| r.draw_time) {
        println!("Draw of {}", t.format("%Y-%m-%d %H:%M:%S"));
    }
    export::print_grid(&stored_grid(session, &state));
    Ok(())
}

fn run_export(session: &Session, out: &str) -> RdResult<()> {
    let state = store::load_state(&session.state_path)?;
    let grid = stored_grid(session, &state);
    export::write_grid_csv(&grid, out)?;
    println!("Results written to {}", out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    const HEADER: &str = "部门,岗位,姓名,状态,备注\n";

    fn run_cmd(state: &str, cmd: &[&str]) -> RdResult<()> {
        let mut argv = vec!["rosterdraw", "--state", state];
        argv.extend_from_slice(cmd);
        run(&Args::parse_from(argv))
    }

    fn write_roster(dir: &TempDir, file_name: &str, rows: &str) -> String {
        let path = dir.path().join(file_name).display().to_string();
        fs::write(&path, format!("{}{}", HEADER, rows)).unwrap();
        path
    }

    fn setup(rows: &str) -> (TempDir, String) {
        let _ = env_logger::try_init();
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json").display().to_string();
        let roster = write_roster(&dir, "roster.csv", rows);
        run_cmd(&state, &["import", "--input", &roster]).unwrap();
        (dir, state)
    }

    #[test]
    fn import_replaces_the_roster() {
        let (dir, state) = setup("AnZhen,Fighter,A,,\nAnZhen,Fighter,B,,\n");
        run_cmd(&state, &["draw", "--draw", "Fighter=1", "--seed", "1"]).unwrap();

        let second = write_roster(&dir, "second.csv", "EHu,Driver,C,休假,leave\n");
        run_cmd(&state, &["import", "--input", &second]).unwrap();

        let st = store::load_state(&state).unwrap();
        let names: Vec<&str> = st.personnel.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["C"]);
        assert_eq!(st.personnel[0].status, Status::Vacation);
        // The results of the last draw are kept until the next draw.
        assert_eq!(st.drawing_results.len(), 1);
    }

    #[test]
    fn second_draw_replaces_the_first() {
        let (_dir, state) = setup("AnZhen,Fighter,A,,\nAnZhen,Fighter,B,,\nEHu,Driver,C,,\n");
        run_cmd(&state, &["draw", "--draw", "Fighter=2", "--seed", "3"]).unwrap();
        let st = store::load_state(&state).unwrap();
        assert_eq!(st.drawing_results.len(), 2);
        assert_eq!(st.draw_configs, vec![DrawConfig::new("Fighter", 2)]);

        run_cmd(&state, &["draw", "--draw", "Driver=1", "--seed", "4"]).unwrap();
        let st = store::load_state(&state).unwrap();
        assert_eq!(st.draw_configs, vec![DrawConfig::new("Driver", 1)]);
        assert_eq!(st.drawing_results.len(), 1);
        let r = &st.drawing_results[0];
        assert_eq!((r.department.as_str(), r.position.as_str(), r.name.as_str()), ("EHu", "Driver", "C"));
        assert_eq!(r.draw_number, 1);
    }

    #[test]
    fn export_uses_the_stored_draws() {
        let (dir, state) = setup("AnZhen,Fighter,A,,\nAnZhen,Fighter,B,伤病,\n");
        run_cmd(&state, &["draw", "--draw", "Fighter=2", "--seed", "1"]).unwrap();

        // A new session only has the state file.
        let args = Args::parse_from(vec!["rosterdraw", "--state", state.as_str(), "show"]);
        let session = Session::from_args(&args).unwrap();
        let grid = stored_grid(&session, &store::load_state(&state).unwrap());
        let cell = grid.cell("AnZhen", "Fighter").unwrap();
        assert_eq!(cell.names, vec!["A"]);
        assert_eq!(cell.desired, 2);
        assert!(cell.shortage);
        // Fighter is short in every department.
        assert_eq!(grid.shortage_count(), Layout::default().departments.len());

        let out = dir.path().join("results.csv").display().to_string();
        run_cmd(&state, &["export", "--out", &out]).unwrap();
        let contents = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "Unit,Commander,Fighter,Communicator,Driver,SafetyOfficer");
        assert_eq!(lines[1], "AnZhen,-,A,-,-,-");
        assert_eq!(lines.len(), 1 + Layout::default().departments.len());
    }

    #[test]
    fn reference_summary() {
        let (dir, state) = setup("AnZhen,Fighter,A,,\nAnZhen,Fighter,B,,\nAnZhen,Fighter,C,,\n");
        let summary = dir.path().join("summary.json").display().to_string();
        run_cmd(&state, &["draw", "--draw", "Fighter=2", "--seed", "9", "--out", &summary]).unwrap();

        // Same seed, same summary.
        run_cmd(&state, &["draw", "--draw", "Fighter=2", "--seed", "9", "--reference", &summary])
            .unwrap();

        let other = dir.path().join("other.json").display().to_string();
        fs::write(&other, r#"{"config": {}, "results": [], "shortages": []}"#).unwrap();
        let res = run_cmd(&state, &["draw", "--draw", "Fighter=2", "--seed", "9", "--reference", &other]);
        assert!(matches!(res, Err(DrawError::ReferenceMismatch { .. })));
    }

    #[test]
    fn edit_keeps_the_remark_unless_given() {
        let (_dir, state) = setup("AnZhen,Fighter,Li,伤病,knee surgery\n");
        run_cmd(&state, &["edit", "--name", "Li", "--status", "vacation"]).unwrap();
        let st = store::load_state(&state).unwrap();
        assert_eq!(st.personnel[0].status, Status::Vacation);
        assert_eq!(st.personnel[0].remark, "knee surgery");

        run_cmd(&state, &["edit", "--name", "Li", "--status", "normal", "--remark", ""]).unwrap();
        let st = store::load_state(&state).unwrap();
        assert_eq!(st.personnel[0].status, Status::Normal);
        assert_eq!(st.personnel[0].remark, "");

        let res = run_cmd(&state, &["edit", "--name", "Nobody", "--status", "sick"]);
        assert!(matches!(res, Err(DrawError::Roster { .. })));
    }

    #[test]
    fn draw_arguments() {
        let args = vec!["Fighter=2".to_string(), " Driver = -1".to_string()];
        assert_eq!(
            parse_draw_arguments(&args).unwrap(),
            vec![DrawConfig::new("Fighter", 2), DrawConfig::new("Driver", -1)]
        );
        for bad in ["Fighter", "Fighter=two", "=3"] {
            let res = parse_draw_arguments(&[bad.to_string()]);
            assert!(matches!(res, Err(DrawError::InvalidDrawArgument { .. })), "{}", bad);
        }
    }

    #[test]
    fn unsupported_input_type() {
        let res = read_roster("roster.ods", Some("ods"), None);
        assert!(matches!(res, Err(DrawError::UnsupportedInputType { .. })));
    }
}
