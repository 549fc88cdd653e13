use serde::{Deserialize, Serialize};

use super::{BaseColumnOptions, ColumnDef, RowData};
use crate::error::Result;

/// Default row height in pixels.
pub const DEFAULT_ROW_HEIGHT: f32 = 28.0;

/// Default header height in pixels.
pub const DEFAULT_HEADER_HEIGHT: f32 = 30.0;

/// Default number of extra rows mounted above and below the viewport.
pub const DEFAULT_PRELOAD_ROW_COUNT: u32 = 20;

/// Axes along which the fill handle may extend a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fillable {
    X,
    #[default]
    Y,
    Xy,
}

impl Fillable {
    pub fn allows_x(self) -> bool {
        matches!(self, Self::X | Self::Xy)
    }

    pub fn allows_y(self) -> bool {
        matches!(self, Self::Y | Self::Xy)
    }
}

/// Grid configuration surface.
///
/// Menu providers are callbacks and therefore live on the grid itself
/// (`Grid::set_context_menu_provider`), not in this serializable struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// CSS width of the grid container (default `100%`).
    pub width: String,
    /// CSS height of the grid container (default `100%`).
    pub height: String,
    pub columns: Vec<ColumnDef>,
    pub default_column_option: BaseColumnOptions,
    pub rows: Vec<RowData>,
    pub header_height: f32,
    pub row_height: f32,
    pub preload_row_count: u32,
    /// `None` disables the fill handle.
    pub fillable: Option<Fillable>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            width: "100%".to_string(),
            height: "100%".to_string(),
            columns: Vec::new(),
            default_column_option: BaseColumnOptions::default(),
            rows: Vec::new(),
            header_height: DEFAULT_HEADER_HEIGHT,
            row_height: DEFAULT_ROW_HEIGHT,
            preload_row_count: DEFAULT_PRELOAD_ROW_COUNT,
            fillable: None,
        }
    }
}

impl GridOptions {
    /// Parse options from a JSON document.
    ///
    /// # Errors
    /// Returns [`crate::error::GridError::Options`] if the JSON is malformed
    /// or does not match the expected shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut options: Self = serde_json::from_str(json)?;
        options.sanitize();
        Ok(options)
    }

    /// Replace non-positive sizes with defaults.
    pub(crate) fn sanitize(&mut self) {
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            tracing::warn!(row_height = self.row_height, "invalid row height, using default");
            self.row_height = DEFAULT_ROW_HEIGHT;
        }
        if !(self.header_height.is_finite() && self.header_height >= 0.0) {
            self.header_height = DEFAULT_HEADER_HEIGHT;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn from_json_applies_defaults() {
        let options = GridOptions::from_json(r#"{"columns": [{"field": "name"}]}"#).unwrap();
        assert_eq!(options.row_height, DEFAULT_ROW_HEIGHT);
        assert_eq!(options.header_height, DEFAULT_HEADER_HEIGHT);
        assert_eq!(options.preload_row_count, DEFAULT_PRELOAD_ROW_COUNT);
        assert_eq!(options.fillable, None);
        assert_eq!(options.columns.len(), 1);
        assert_eq!(options.width, "100%");
    }

    #[test]
    fn from_json_reads_fillable_and_rows() {
        let options = GridOptions::from_json(
            r#"{"fillable": "xy", "rowHeight": 30, "rows": [{"id": "a", "v": 1}]}"#,
        )
        .unwrap();
        assert_eq!(options.fillable, Some(Fillable::Xy));
        assert_eq!(options.row_height, 30.0);
        assert_eq!(options.rows.len(), 1);
    }

    #[test]
    fn from_json_rejects_bad_shape() {
        assert!(GridOptions::from_json(r#"{"columns": 3}"#).is_err());
    }

    #[test]
    fn zero_row_height_falls_back() {
        let options = GridOptions::from_json(r#"{"rowHeight": 0}"#).unwrap();
        assert_eq!(options.row_height, DEFAULT_ROW_HEIGHT);
    }
}
