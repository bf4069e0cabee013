//! `Worksheet` over the Sheets REST API.

use serde_json::{json, Value};
use sheetframe_core::{Dimensions, Grid, GridRange, GridUpdate, SheetError, ValueRenderMode, Worksheet};

use crate::client::{SheetsClient, WorksheetInfo};

/// One worksheet of a remote spreadsheet.
///
/// Dimensions are cached from the last metadata fetch and kept current across
/// resizes sent through this handle. Call [`RemoteWorksheet::refresh`] if the
/// sheet may have been resized elsewhere.
#[derive(Clone)]
pub struct RemoteWorksheet {
    client: SheetsClient,
    spreadsheet_id: String,
    info: WorksheetInfo,
}

impl RemoteWorksheet {
    pub(crate) fn new(client: SheetsClient, spreadsheet_id: &str, info: WorksheetInfo) -> Self {
        Self { client, spreadsheet_id: spreadsheet_id.to_string(), info }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn info(&self) -> &WorksheetInfo {
        &self.info
    }

    /// Reload this worksheet's properties.
    pub fn refresh(&mut self) -> Result<(), SheetError> {
        let spreadsheet = self.client.spreadsheet(&self.spreadsheet_id)?;
        self.info = spreadsheet
            .worksheets
            .into_iter()
            .find(|ws| ws.sheet_id == self.info.sheet_id)
            .ok_or_else(|| SheetError::NotFound(format!("worksheet '{}'", self.info.title)))?;
        Ok(())
    }
}

impl Worksheet for RemoteWorksheet {
    fn title(&self) -> &str {
        &self.info.title
    }

    fn dimensions(&self) -> Result<Dimensions, SheetError> {
        Ok(self.info.dimensions)
    }

    fn resize(&mut self, rows: Option<usize>, cols: Option<usize>) -> Result<(), SheetError> {
        let mut grid = serde_json::Map::new();
        let mut fields = Vec::new();
        if let Some(rows) = rows {
            grid.insert("rowCount".into(), json!(rows));
            fields.push("gridProperties/rowCount");
        }
        if let Some(cols) = cols {
            grid.insert("columnCount".into(), json!(cols));
            fields.push("gridProperties/columnCount");
        }
        if fields.is_empty() {
            return Ok(());
        }

        self.client.batch_update(
            &self.spreadsheet_id,
            json!([{
                "updateSheetProperties": {
                    "properties": { "sheetId": self.info.sheet_id, "gridProperties": grid },
                    "fields": fields.join(","),
                }
            }]),
        )?;

        if let Some(rows) = rows {
            self.info.dimensions.rows = rows;
        }
        if let Some(cols) = cols {
            self.info.dimensions.cols = cols;
        }
        Ok(())
    }

    fn fetch_grid(&self, range: &GridRange, mode: ValueRenderMode) -> Result<Grid, SheetError> {
        self.client
            .values_get(&self.spreadsheet_id, &range.to_sheet_a1(&self.info.title), mode)
    }

    fn update_cells(&mut self, updates: &[GridUpdate]) -> Result<(), SheetError> {
        let Some(range) = GridRange::bounding(updates) else {
            return Ok(());
        };

        // One rectangular value range; cells not being written stay null, which
        // the service leaves untouched.
        let mut values = vec![vec![Value::Null; range.cols()]; range.rows()];
        for u in updates {
            values[u.row - range.first_row][u.col - range.first_col] = Value::String(u.value.clone());
        }

        self.client.values_batch_update(
            &self.spreadsheet_id,
            json!([{
                "range": range.to_sheet_a1(&self.info.title),
                "majorDimension": "ROWS",
                "values": values,
            }]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use sheetframe_config::ValueInputOption;

    fn worksheet(server: &MockServer, rows: usize, cols: usize) -> RemoteWorksheet {
        let client = SheetsClient::with_base_url("tok".into(), &server.base_url(), &server.base_url()).unwrap();
        let info = WorksheetInfo { sheet_id: 42, title: "Data".into(), index: 0, dimensions: Dimensions::new(rows, cols) };
        RemoteWorksheet::new(client, "abc", info)
    }

    #[test]
    fn test_fetch_grid_converts_cells_to_text() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/spreadsheets/abc/values:batchGet")
                .query_param("ranges", "'Data'!A1:C3")
                .query_param("valueRenderOption", "UNFORMATTED_VALUE")
                .query_param("dateTimeRenderOption", "FORMATTED_STRING");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "spreadsheetId": "abc",
                    "valueRanges": [{
                        "range": "Data!A1:C3",
                        "majorDimension": "ROWS",
                        "values": [["name", "n", "ok"], ["a", 1, true], [], ["b", 2.5]]
                    }]
                }));
        });

        let ws = worksheet(&server, 3, 3);
        let grid = ws.fetch_grid(&GridRange::new(1, 1, 3, 3), ValueRenderMode::Unformatted).unwrap();
        m.assert();
        assert_eq!(grid[0], vec!["name", "n", "ok"]);
        assert_eq!(grid[1], vec!["a", "1", "TRUE"]);
        assert!(grid[2].is_empty());
        assert_eq!(grid[3], vec!["b", "2.5"]);
    }

    #[test]
    fn test_fetch_empty_range() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/spreadsheets/abc/values:batchGet")
                .query_param("valueRenderOption", "FORMULA");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "spreadsheetId": "abc", "valueRanges": [{ "range": "Data!A1:B2" }] }));
        });

        let ws = worksheet(&server, 2, 2);
        let grid = ws.fetch_grid(&GridRange::new(1, 1, 2, 2), ValueRenderMode::Formula).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_resize_sends_only_given_dimensions() {
        let server = MockServer::start();
        let cols_only = server.mock(|when, then| {
            when.method(POST)
                .path("/spreadsheets/abc:batchUpdate")
                .json_body(json!({
                    "requests": [{
                        "updateSheetProperties": {
                            "properties": { "sheetId": 42, "gridProperties": { "columnCount": 2 } },
                            "fields": "gridProperties/columnCount"
                        }
                    }]
                }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "spreadsheetId": "abc", "replies": [{}] }));
        });

        let mut ws = worksheet(&server, 100, 26);
        ws.resize(None, Some(2)).unwrap();
        ws.resize(None, None).unwrap();
        cols_only.assert_calls(1);
        assert_eq!(ws.dimensions().unwrap(), Dimensions::new(100, 2));
    }

    #[test]
    fn test_resize_rejection_keeps_cached_dimensions() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/spreadsheets/abc:batchUpdate");
            then.status(400).json_body(json!({
                "error": {
                    "code": 400,
                    "message": "Invalid requests[0].updateSheetProperties: This action would increase the number of cells in the workbook above the limit of 10000000 cells."
                }
            }));
        });

        let mut ws = worksheet(&server, 100, 26);
        let err = ws.resize(Some(1_000_000), Some(26)).unwrap_err();
        assert!(matches!(err, SheetError::Validation(ref msg) if msg.contains("above the limit")));
        assert_eq!(ws.dimensions().unwrap(), Dimensions::new(100, 26));
    }

    #[test]
    fn test_update_cells_sends_bounding_range() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/spreadsheets/abc/values:batchUpdate")
                .json_body(json!({
                    "valueInputOption": "RAW",
                    "data": [{
                        "range": "'Data'!B2:C3",
                        "majorDimension": "ROWS",
                        "values": [[null, "x"], ["1", "=B2"]]
                    }]
                }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "spreadsheetId": "abc", "totalUpdatedCells": 3 }));
        });

        let mut ws = worksheet(&server, 10, 10);
        ws.client = ws.client.clone().with_value_input_option(ValueInputOption::Raw);
        ws.update_cells(&[GridUpdate::new(2, 3, "x"), GridUpdate::new(3, 2, "1"), GridUpdate::new(3, 3, "=B2")])
            .unwrap();
        ws.update_cells(&[]).unwrap();
        m.assert_calls(1);
    }

    #[test]
    fn test_refresh_reloads_dimensions() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/spreadsheets/abc");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "spreadsheetId": "abc",
                    "properties": { "title": "Budget" },
                    "sheets": [{ "properties": {
                        "sheetId": 42, "title": "Renamed", "index": 0,
                        "gridProperties": { "rowCount": 7, "columnCount": 4 }
                    }}]
                }));
        });

        let mut ws = worksheet(&server, 1, 1);
        ws.refresh().unwrap();
        assert_eq!(ws.title(), "Renamed");
        assert_eq!(ws.dimensions().unwrap(), Dimensions::new(7, 4));
    }
}
