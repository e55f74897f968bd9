use crate::roster::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputSource {
    /// excel or csv. Guessed from the file extension if missing.
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DrawEntry {
    pub position: String,
    pub count: JSValue,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct RosterDrawConfig {
    pub departments: Option<Vec<String>>,
    pub roles: Option<Vec<String>>,
    pub draws: Option<Vec<DrawEntry>>,
    pub input: Option<InputSource>,
    #[serde(rename = "stateFile")]
    pub state_file: Option<String>,
}

impl RosterDrawConfig {
    /// The configured departments and roles, with the built-in lists as fallback.
    pub fn layout(&self) -> Layout {
        let default = Layout::default();
        Layout {
            departments: self.departments.clone().unwrap_or(default.departments),
            roles: self.roles.clone().unwrap_or(default.roles),
        }
    }

    pub fn draw_configs(&self) -> Option<Vec<DrawConfig>> {
        self.draws.as_ref().map(|entries| {
            entries
                .iter()
                .map(|e| DrawConfig::new(e.position.trim(), read_js_count(&e.position, &e.count)))
                .collect()
        })
    }
}

/// Reads the configuration, and returns it with the directory it lives in.
pub fn read_config(path: &str) -> RdResult<(RosterDrawConfig, PathBuf)> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: RosterDrawConfig =
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    info!("config: {:?}", config);
    let root = Path::new(path)
        .parent()
        .context(MissingParentDirSnafu { path })?
        .to_path_buf();
    Ok((config, root))
}

// Counts are typed by hand: numbers are truncated, strings are read up to
// the first character that is not a digit ("2.5" and "3 persons" are accepted).
// Anything else disables the entry.
fn read_js_count(position: &str, x: &JSValue) -> i64 {
    let res = match x {
        JSValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        JSValue::String(s) => leading_integer(s),
        _ => None,
    };
    match res {
        Some(c) => c,
        None => {
            warn!(
                "Cannot understand the count {} for position {:?}, ignoring it",
                x, position
            );
            0
        }
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config() {
        let config: RosterDrawConfig = serde_json::from_str(
            r#"{
                "roles": ["Fighter", "Driver"],
                "draws": [
                    {"position": "Fighter", "count": 2},
                    {"position": "Driver", "count": "1"},
                    {"position": "Cook", "count": 1.5},
                    {"position": "Medic", "count": -3},
                    {"position": "Pilot", "count": 2.0},
                    {"position": "Guard", "count": "2.5"},
                    {"position": "Scout", "count": " 3 persons"},
                    {"position": "Clerk", "count": "many"},
                    {"position": "Cook", "count": null}
                ]
            }"#,
        )
        .unwrap();
        let layout = config.layout();
        assert_eq!(layout.departments, Layout::default().departments);
        assert_eq!(layout.roles, vec!["Fighter", "Driver"]);
        assert_eq!(
            config.draw_configs().unwrap(),
            vec![
                DrawConfig::new("Fighter", 2),
                DrawConfig::new("Driver", 1),
                DrawConfig::new("Cook", 1),
                DrawConfig::new("Medic", -3),
                DrawConfig::new("Pilot", 2),
                DrawConfig::new("Guard", 2),
                DrawConfig::new("Scout", 3),
                DrawConfig::new("Clerk", 0),
                DrawConfig::new("Cook", 0),
            ]
        );
        assert!(config.input.is_none());
    }

    #[test]
    fn empty_config() {
        let config: RosterDrawConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.layout(), Layout::default());
        assert!(config.draw_configs().is_none());
    }
}
