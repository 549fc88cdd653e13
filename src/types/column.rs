use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default column width in pixels.
pub const DEFAULT_COLUMN_WIDTH: f32 = 200.0;

/// Default minimum column width in pixels.
pub const DEFAULT_MIN_COLUMN_WIDTH: f32 = 50.0;

/// Edge a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pinned {
    Left,
    Right,
}

/// Column settings that can be shared through `defaultColumnOption`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseColumnOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<Pinned>,
    /// Name of a registered transformer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformer: Option<String>,
    /// Name of a registered cell renderer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_render: Option<String>,
    /// Name of a registered cell editor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_editor: Option<String>,
    /// Free-form parameters handed to renderers and editors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_params: Option<Value>,
}

/// Raw column configuration as supplied by the embedding application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_name: Option<String>,
    #[serde(default)]
    pub readonly: bool,
    #[serde(flatten)]
    pub base: BaseColumnOptions,
}

/// Fully resolved column options: every optional setting has been filled
/// from the column definition, then the grid-wide defaults, then the
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnOptions {
    pub field: String,
    pub header_name: String,
    pub width: f32,
    pub min_width: f32,
    pub flex: Option<f32>,
    pub resizable: bool,
    pub pinned: Option<Pinned>,
    pub readonly: bool,
    pub transformer: Option<String>,
    pub cell_render: Option<String>,
    pub cell_editor: Option<String>,
    pub cell_params: Value,
}

impl ColumnOptions {
    /// Resolve a column definition against grid-wide defaults.
    pub fn resolve(def: ColumnDef, defaults: &BaseColumnOptions) -> Self {
        let base = def.base;
        let min_width = base
            .min_width
            .or(defaults.min_width)
            .unwrap_or(DEFAULT_MIN_COLUMN_WIDTH);
        let width = base
            .width
            .or(defaults.width)
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
            .max(min_width);
        Self {
            header_name: def.header_name.unwrap_or_else(|| def.field.clone()),
            field: def.field,
            width,
            min_width,
            flex: base.flex.or(defaults.flex).filter(|f| *f > 0.0),
            resizable: base.resizable.or(defaults.resizable).unwrap_or(false),
            pinned: base.pinned.or(defaults.pinned),
            readonly: def.readonly,
            transformer: base.transformer.or_else(|| defaults.transformer.clone()),
            cell_render: base.cell_render.or_else(|| defaults.cell_render.clone()),
            cell_editor: base.cell_editor.or_else(|| defaults.cell_editor.clone()),
            cell_params: base
                .cell_params
                .or_else(|| defaults.cell_params.clone())
                .unwrap_or(Value::Null),
        }
    }

    /// Shorthand for a plain unpinned column with default settings.
    pub fn new(field: impl Into<String>) -> Self {
        Self::resolve(
            ColumnDef {
                field: field.into(),
                ..ColumnDef::default()
            },
            &BaseColumnOptions::default(),
        )
    }

    /// Whether fill and paste may write into this column. The row id and
    /// the row-number column are never written.
    pub fn accepts_writes(&self) -> bool {
        !self.readonly && self.field != "id" && self.field != crate::store::ROW_NUMBER_FIELD
    }

    /// Whether an editor may open on this column.
    pub fn is_editable(&self) -> bool {
        self.accepts_writes() && self.cell_editor.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_fills_builtin_defaults() {
        let col = ColumnOptions::new("name");
        assert_eq!(col.header_name, "name");
        assert_eq!(col.width, DEFAULT_COLUMN_WIDTH);
        assert_eq!(col.min_width, DEFAULT_MIN_COLUMN_WIDTH);
        assert!(!col.resizable);
        assert_eq!(col.pinned, None);
    }

    #[test]
    fn resolve_prefers_column_over_grid_defaults() {
        let def: ColumnDef = serde_json::from_value(json!({
            "field": "rating",
            "headerName": "Rating",
            "width": 80,
            "pinned": "left",
            "cellEditor": "rating"
        }))
        .unwrap();
        let defaults = BaseColumnOptions {
            width: Some(120.0),
            resizable: Some(true),
            ..BaseColumnOptions::default()
        };
        let col = ColumnOptions::resolve(def, &defaults);
        assert_eq!(col.width, 80.0);
        assert!(col.resizable);
        assert_eq!(col.pinned, Some(Pinned::Left));
        assert!(col.is_editable());
    }

    #[test]
    fn width_never_below_min_width() {
        let def = ColumnDef {
            field: "tiny".into(),
            base: BaseColumnOptions {
                width: Some(10.0),
                min_width: Some(40.0),
                ..BaseColumnOptions::default()
            },
            ..ColumnDef::default()
        };
        assert_eq!(ColumnOptions::resolve(def, &BaseColumnOptions::default()).width, 40.0);
    }

    #[test]
    fn readonly_and_synthetic_columns_refuse_writes() {
        let mut col = ColumnOptions::new("name");
        assert!(col.accepts_writes());
        assert!(!col.is_editable());
        col.cell_editor = Some("text".into());
        assert!(col.is_editable());
        col.readonly = true;
        assert!(!col.accepts_writes());
        assert!(!col.is_editable());

        for field in ["id", "#"] {
            let mut col = ColumnOptions::new(field);
            col.cell_editor = Some("text".into());
            assert!(!col.accepts_writes(), "{field}");
            assert!(!col.is_editable(), "{field}");
        }
    }
}
