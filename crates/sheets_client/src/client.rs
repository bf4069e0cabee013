//! Google Sheets / Drive HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required).
//! Covers what sheetframe needs from the service: spreadsheet metadata,
//! worksheet lookup and creation, value reads, resizes and value writes.

use std::time::Duration;

use serde_json::{json, Value};
use sheetframe_config::{Settings, ValueInputOption};
use sheetframe_core::{format_float, Dimensions, Grid, SheetError, ValueRenderMode};

use crate::auth::{load_auth, Credentials};
use crate::worksheet::RemoteWorksheet;

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Sheets API client (blocking).
#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::blocking::Client,
    sheets_base: String,
    drive_base: String,
    token: String,
    value_input: ValueInputOption,
}

/// Properties of one worksheet (tab).
#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetInfo {
    pub sheet_id: i64,
    pub title: String,
    /// Position of the tab, 0-based
    pub index: usize,
    pub dimensions: Dimensions,
}

/// A spreadsheet and its worksheets.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadsheetInfo {
    pub id: String,
    pub title: String,
    pub worksheets: Vec<WorksheetInfo>,
}

impl SpreadsheetInfo {
    pub fn worksheet(&self, title: &str) -> Option<&WorksheetInfo> {
        self.worksheets.iter().find(|ws| ws.title == title)
    }
}

impl SheetsClient {
    /// Create a new client using saved auth credentials.
    pub fn from_saved_auth(settings: &Settings) -> Result<Self, SheetError> {
        let creds = load_auth().ok_or(SheetError::NotAuthenticated)?;
        Self::new(creds, settings)
    }

    /// Create a new client with explicit credentials.
    pub fn new(creds: Credentials, settings: &Settings) -> Result<Self, SheetError> {
        Ok(Self::with_base_url(creds.token, &settings.sheets_api_base, &settings.drive_api_base)?
            .with_value_input_option(settings.value_input_option))
    }

    /// Create a client against explicit API roots (used for tests).
    pub fn with_base_url(token: String, sheets_base: &str, drive_base: &str) -> Result<Self, SheetError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("sheetframe/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SheetError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            sheets_base: sheets_base.trim_end_matches('/').to_string(),
            drive_base: drive_base.trim_end_matches('/').to_string(),
            token,
            value_input: ValueInputOption::default(),
        })
    }

    pub fn with_value_input_option(mut self, option: ValueInputOption) -> Self {
        self.value_input = option;
        self
    }

    /// Fetch spreadsheet title and worksheet properties.
    pub fn spreadsheet(&self, spreadsheet_id: &str) -> Result<SpreadsheetInfo, SheetError> {
        let url = format!("{}/spreadsheets/{}", self.sheets_base, spreadsheet_id);
        let resp = self.get(&url, &[("fields", "spreadsheetId,properties.title,sheets.properties")])?;
        let json: Value = resp.json().map_err(|e| SheetError::Parse(e.to_string()))?;
        parse_spreadsheet(&json)
    }

    pub fn worksheets(&self, spreadsheet_id: &str) -> Result<Vec<WorksheetInfo>, SheetError> {
        Ok(self.spreadsheet(spreadsheet_id)?.worksheets)
    }

    /// Open the worksheet titled `title`.
    pub fn worksheet(&self, spreadsheet_id: &str, title: &str) -> Result<RemoteWorksheet, SheetError> {
        let spreadsheet = self.spreadsheet(spreadsheet_id)?;
        let info = spreadsheet
            .worksheet(title)
            .cloned()
            .ok_or_else(|| SheetError::NotFound(format!("worksheet '{}' in {}", title, spreadsheet_id)))?;
        Ok(RemoteWorksheet::new(self.clone(), spreadsheet_id, info))
    }

    /// Add a worksheet with the given grid size.
    pub fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: usize,
        cols: usize,
    ) -> Result<RemoteWorksheet, SheetError> {
        let reply = self.batch_update(
            spreadsheet_id,
            json!([{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": cols },
                    }
                }
            }]),
        )?;
        let info = parse_worksheet(&reply["replies"][0]["addSheet"]["properties"])?;
        log::debug!("Added worksheet '{}' ({}x{}) to {}", info.title, rows, cols, spreadsheet_id);
        Ok(RemoteWorksheet::new(self.clone(), spreadsheet_id, info))
    }

    /// Open the worksheet titled `title`, or add it as a 1x1 sheet when
    /// missing and `create` is set.
    pub fn get_worksheet(&self, spreadsheet_id: &str, title: &str, create: bool) -> Result<RemoteWorksheet, SheetError> {
        match self.worksheet(spreadsheet_id, title) {
            Err(SheetError::NotFound(_)) if create => self.add_worksheet(spreadsheet_id, title, 1, 1),
            other => other,
        }
    }

    /// Find a spreadsheet by its Drive file name, creating it when missing and
    /// `create` is set. The first match wins when several files share a name.
    pub fn open_by_title(&self, title: &str, create: bool) -> Result<SpreadsheetInfo, SheetError> {
        let url = format!("{}/files", self.drive_base);
        let q = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            title.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME_TYPE
        );
        let resp = self.get(
            &url,
            &[
                ("q", q.as_str()),
                ("fields", "files(id,name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ],
        )?;
        let json: Value = resp.json().map_err(|e| SheetError::Parse(e.to_string()))?;

        if let Some(id) = json["files"].as_array().and_then(|files| files.first()).and_then(|f| f["id"].as_str()) {
            return self.spreadsheet(id);
        }
        if !create {
            return Err(SheetError::NotFound(format!("spreadsheet '{}'", title)));
        }
        self.create_spreadsheet(title)
    }

    /// Create an empty spreadsheet titled `title`.
    pub fn create_spreadsheet(&self, title: &str) -> Result<SpreadsheetInfo, SheetError> {
        let url = format!("{}/spreadsheets", self.sheets_base);
        let resp = self.post_json(&url, &json!({ "properties": { "title": title } }))?;
        let json: Value = resp.json().map_err(|e| SheetError::Parse(e.to_string()))?;
        let info = parse_spreadsheet(&json)?;
        log::info!("Created spreadsheet '{}' ({})", info.title, info.id);
        Ok(info)
    }

    // ── Calls used by RemoteWorksheet ──────────────────────────────────

    /// Read one A1 range as text.
    pub(crate) fn values_get(&self, spreadsheet_id: &str, range: &str, mode: ValueRenderMode) -> Result<Grid, SheetError> {
        let url = format!("{}/spreadsheets/{}/values:batchGet", self.sheets_base, spreadsheet_id);
        let resp = self.get(
            &url,
            &[
                ("ranges", range),
                ("majorDimension", "ROWS"),
                ("valueRenderOption", mode.as_api_str()),
                ("dateTimeRenderOption", "FORMATTED_STRING"),
            ],
        )?;
        let json: Value = resp.json().map_err(|e| SheetError::Parse(e.to_string()))?;

        let rows = match json["valueRanges"][0]["values"].as_array() {
            Some(rows) => rows,
            // Entirely empty ranges come back without a values key.
            None => return Ok(Vec::new()),
        };
        Ok(rows
            .iter()
            .map(|row| row.as_array().map(|cells| cells.iter().map(cell_text).collect()).unwrap_or_default())
            .collect())
    }

    /// Apply structural requests (`spreadsheets.batchUpdate`).
    pub(crate) fn batch_update(&self, spreadsheet_id: &str, requests: Value) -> Result<Value, SheetError> {
        let url = format!("{}/spreadsheets/{}:batchUpdate", self.sheets_base, spreadsheet_id);
        let resp = self.post_json(&url, &json!({ "requests": requests }))?;
        resp.json().map_err(|e| SheetError::Parse(e.to_string()))
    }

    /// Write value ranges (`spreadsheets.values.batchUpdate`).
    pub(crate) fn values_batch_update(&self, spreadsheet_id: &str, data: Value) -> Result<(), SheetError> {
        let url = format!("{}/spreadsheets/{}/values:batchUpdate", self.sheets_base, spreadsheet_id);
        self.post_json(
            &url,
            &json!({
                "valueInputOption": self.value_input.as_api_str(),
                "data": data,
            }),
        )?;
        Ok(())
    }

    // ── Internal helpers ───────────────────────────────────────────────

    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<reqwest::blocking::Response, SheetError> {
        let response = self.http.get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .map_err(|e| SheetError::Network(e.to_string()))?;

        check_status(response)
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<reqwest::blocking::Response, SheetError> {
        let response = self.http.post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(|e| SheetError::Network(e.to_string()))?;

        check_status(response)
    }
}

fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, SheetError> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = error_message(&body);
    match status {
        400 | 422 => Err(SheetError::Validation(message)),
        404 => Err(SheetError::NotFound(message)),
        _ => Err(SheetError::Http(status, message)),
    }
}

/// Pull `error.message` out of a Google API error body, else the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}

/// Text form of one cell from a values response.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) => format_float(f),
            (None, None) => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn parse_spreadsheet(json: &Value) -> Result<SpreadsheetInfo, SheetError> {
    let id = json["spreadsheetId"]
        .as_str()
        .ok_or_else(|| SheetError::Parse("Missing spreadsheetId in response".into()))?;
    let worksheets = json["sheets"]
        .as_array()
        .map(|sheets| {
            sheets
                .iter()
                .map(|s| parse_worksheet(&s["properties"]))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();

    Ok(SpreadsheetInfo {
        id: id.to_string(),
        title: json["properties"]["title"].as_str().unwrap_or_default().to_string(),
        worksheets,
    })
}

fn parse_worksheet(props: &Value) -> Result<WorksheetInfo, SheetError> {
    let title = props["title"]
        .as_str()
        .ok_or_else(|| SheetError::Parse("Missing sheet title in response".into()))?;
    let grid = &props["gridProperties"];

    Ok(WorksheetInfo {
        sheet_id: props["sheetId"].as_i64().unwrap_or(0),
        title: title.to_string(),
        index: props["index"].as_u64().unwrap_or(0) as usize,
        dimensions: Dimensions::new(
            grid["rowCount"].as_u64().unwrap_or(0) as usize,
            grid["columnCount"].as_u64().unwrap_or(0) as usize,
        ),
    })
}
