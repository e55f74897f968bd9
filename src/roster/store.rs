// Persistence of the roster and of the last draw between two runs.

use crate::roster::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct State {
    #[serde(default)]
    pub personnel: Vec<Person>,
    #[serde(rename = "drawingResults", default)]
    pub drawing_results: Vec<DrawResult>,
    /// The draws that produced the results, to flag the shortages when showing them again.
    #[serde(rename = "drawConfigs", default)]
    pub draw_configs: Vec<DrawConfig>,
}

/// Reads the whole state. A missing file is an empty state.
pub fn load_state(path: &str) -> RdResult<State> {
    if !Path::new(path).exists() {
        info!("No state file {:?}, starting with an empty roster", path);
        return Ok(State::default());
    }
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let state: State = serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    debug!(
        "load_state: {} persons, {} results",
        state.personnel.len(),
        state.drawing_results.len()
    );
    Ok(state)
}

/// Writes the whole state, replacing the previous content.
pub fn save_state(state: &State, path: &str) -> RdResult<()> {
    let js = serde_json::to_string_pretty(state).context(SerializingJsonSnafu {})?;
    fs::write(path, js).context(WritingFileSnafu { path })?;
    debug!(
        "save_state: {} persons, {} results written to {:?}",
        state.personnel.len(),
        state.drawing_results.len(),
        path
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_state() -> State {
        let personnel = vec![
            Person {
                department: "AnZhen".to_string(),
                position: "Fighter".to_string(),
                name: "Li".to_string(),
                status: Status::Normal,
                remark: String::new(),
            },
            Person {
                department: "AnZhen".to_string(),
                position: "Fighter".to_string(),
                name: "Wang".to_string(),
                status: Status::Sick,
                remark: "knee".to_string(),
            },
        ];
        let configs = vec![DrawConfig::new("Fighter", 2)];
        let mut rng = StdRng::seed_from_u64(1);
        let report = draw(&personnel, &configs, &["AnZhen".to_string()], &mut rng);
        State {
            personnel,
            drawing_results: report.results,
            draw_configs: configs,
        }
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.json").display().to_string();
        assert_eq!(load_state(&path).unwrap(), State::default());
    }

    #[test]
    fn state_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json").display().to_string();
        let state = sample_state();
        assert_eq!(state.drawing_results.len(), 1);
        save_state(&state, &path).unwrap();
        assert_eq!(load_state(&path).unwrap(), state);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"drawingResults\""));
        assert!(contents.contains("\"sick\""));
    }

    #[test]
    fn corrupted_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json").display().to_string();
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_state(&path),
            Err(DrawError::ParsingJson { .. })
        ));
    }
}
