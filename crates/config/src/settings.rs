// Library settings
// Loaded from ~/.config/sheetframe/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use sheetframe_core::SHEETS_CELL_LIMIT;

pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// How the service interprets written cell text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueInputOption {
    /// Parsed as if typed into the UI: formulas, numbers, dates (default)
    #[default]
    UserEntered,
    /// Stored verbatim as text
    Raw,
}

impl ValueInputOption {
    /// Wire name used by the Sheets values API
    pub fn as_api_str(&self) -> &'static str {
        match self {
            ValueInputOption::UserEntered => "USER_ENTERED",
            ValueInputOption::Raw => "RAW",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Service endpoints
    #[serde(rename = "sheets.apiBase")]
    pub sheets_api_base: String,

    #[serde(rename = "drive.apiBase")]
    pub drive_api_base: String,

    // Sheet limits
    #[serde(rename = "sheets.maxCellCount")]
    pub max_cell_count: u64,

    // Writing
    #[serde(rename = "write.cellUpdatesLimit")]
    pub cell_updates_limit: Option<usize>,  // None = one request per write

    #[serde(rename = "write.valueInputOption")]
    pub value_input_option: ValueInputOption,

    #[serde(rename = "write.stringEscaping")]
    pub string_escaping: String,

    // Reading
    #[serde(rename = "read.evaluateFormulas")]
    pub evaluate_formulas: bool,

    #[serde(rename = "read.dropEmptyRows")]
    pub drop_empty_rows: bool,

    #[serde(rename = "read.dropEmptyColumns")]
    pub drop_empty_columns: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Endpoints
            sheets_api_base: DEFAULT_SHEETS_API_BASE.to_string(),
            drive_api_base: DEFAULT_DRIVE_API_BASE.to_string(),
            // Limits
            max_cell_count: SHEETS_CELL_LIMIT,
            // Writing
            cell_updates_limit: None,
            value_input_option: ValueInputOption::UserEntered,
            string_escaping: "default".to_string(),
            // Reading
            evaluate_formulas: false,
            drop_empty_rows: true,
            drop_empty_columns: true,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sheetframe");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {}", path.display(), e))?;

        // Strip comments (lines starting with //)
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned)
            .map_err(|e| format!("Error parsing {}: {}", path.display(), e))
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    /// Save current settings to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = r#"{
    // Service endpoints
    "sheets.apiBase": "https://sheets.googleapis.com/v4",
    "drive.apiBase": "https://www.googleapis.com/drive/v3",

    // Cell limit per spreadsheet, checked before resizing
    "sheets.maxCellCount": 10000000,

    // Writing
    // cellUpdatesLimit: null sends every update in one request
    // valueInputOption: "user_entered" or "raw"
    // stringEscaping: "default", "off" or "full"
    "write.cellUpdatesLimit": null,
    "write.valueInputOption": "user_entered",
    "write.stringEscaping": "default",

    // Reading
    "read.evaluateFormulas": false,
    "read.dropEmptyRows": true,
    "read.dropEmptyColumns": true
}
"#;

        if let Err(e) = fs::write(path, default_config) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }

    /// Get the config file path for display/opening
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_cell_count, 10_000_000);
        assert_eq!(settings.cell_updates_limit, None);
        assert_eq!(settings.value_input_option, ValueInputOption::UserEntered);
        assert_eq!(settings.string_escaping, "default");
        assert!(!settings.evaluate_formulas);
        assert!(settings.drop_empty_rows);
        assert!(settings.drop_empty_columns);
    }

    #[test]
    fn test_load_strips_comments_and_fills_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{
    // only override a few keys
    "write.cellUpdatesLimit": 40000,
    "write.valueInputOption": "raw",
    "read.dropEmptyRows": false
}"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.cell_updates_limit, Some(40_000));
        assert_eq!(settings.value_input_option, ValueInputOption::Raw);
        assert!(!settings.drop_empty_rows);
        assert!(settings.drop_empty_columns);
        assert_eq!(settings.sheets_api_base, DEFAULT_SHEETS_API_BASE);
    }

    #[test]
    fn test_load_rejects_unknown_input_option() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "write.valueInputOption": "typed" }"#).unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(err.contains("Error parsing"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = Settings {
            max_cell_count: 5_000_000,
            string_escaping: "full".into(),
            evaluate_formulas: true,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_default_template_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        Settings::default().create_default_file(&path);

        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_value_input_option_wire_names() {
        assert_eq!(ValueInputOption::UserEntered.as_api_str(), "USER_ENTERED");
        assert_eq!(ValueInputOption::Raw.as_api_str(), "RAW");
    }
}
