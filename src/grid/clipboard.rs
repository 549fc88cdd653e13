//! Copy and paste as tab-separated text.
//!
//! Copy writes the active range's transformed values, one line per row.
//! Paste parses the same format and writes values starting at the active
//! cell, running each through the column's transformer.

use serde_json::Value;

use super::events::HookEvent;
use super::Grid;
use crate::error::Result;
use crate::plugin::{coerce_text, display_text};
use crate::selection::{CellRange, SelectionRange};
use crate::types::Coordinate;

/// Text clipboard used by copy and paste.
pub trait Clipboard {
    /// # Errors
    /// Returns [`crate::GridError::Clipboard`] if the clipboard rejects the write.
    fn write_text(&mut self, text: &str) -> Result<()>;

    /// # Errors
    /// Returns [`crate::GridError::Clipboard`] if the clipboard cannot be read.
    fn read_text(&mut self) -> Result<String>;
}

/// Process-local clipboard; the default for every grid.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: String,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.text = text.to_string();
        Ok(())
    }

    fn read_text(&mut self) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Quote a field if it contains a tab, newline, carriage return or quote,
/// doubling any quotes inside.
pub(crate) fn escape_cell_value(value: &str) -> String {
    let needs_quoting = value.contains(['\t', '\n', '\r', '"']);
    if needs_quoting {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Parse tab-separated text into rows of fields. Quoted fields may contain
/// tabs and newlines. A single trailing line break is ignored.
pub(crate) fn parse_tsv(text: &str) -> Vec<Vec<String>> {
    let text = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);
    if text.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
            continue;
        }
        match ch {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            '\t' => {
                fields.push(std::mem::take(&mut current));
                at_field_start = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut current));
                rows.push(std::mem::take(&mut fields));
                at_field_start = true;
            }
            _ => {
                current.push(ch);
                at_field_start = false;
            }
        }
    }
    fields.push(current);
    rows.push(fields);
    rows
}

impl Grid {
    /// Tab-separated text of the active range's transformed values.
    pub fn selection_text(&self) -> Option<String> {
        let range = self.inner.selection.state().active_range()?.range();
        let mut out = String::new();
        for y in range.start().y..=range.end().y {
            if y > range.start().y {
                out.push('\n');
            }
            for x in range.start().x..=range.end().x {
                if x > range.start().x {
                    out.push('\t');
                }
                let value = self
                    .get_cell_position(Coordinate::new(x, y))
                    .and_then(|pos| self.get_cell_value(&pos.row, &pos.column));
                if let Some(value) = value {
                    out.push_str(&escape_cell_value(&display_text(&value)));
                }
            }
        }
        Some(out)
    }

    /// Copy the active range to the clipboard. Returns the copied text, or
    /// `None` when nothing is selected or a hook cancelled the copy.
    ///
    /// # Errors
    /// Propagates clipboard write failures.
    pub fn copy_selection(&self) -> Result<Option<String>> {
        let Some(text) = self.selection_text() else {
            return Ok(None);
        };
        let written = self.inner.hooks.run(&HookEvent::Copy(&text), || {
            self.inner.clipboard.borrow_mut().write_text(&text)
        });
        match written {
            Some(result) => {
                result?;
                tracing::debug!(bytes = text.len(), "copied selection");
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    /// Paste tab-separated `text` at the active cell. Cells past the grid
    /// edge and readonly columns are skipped. The pasted block becomes the
    /// selection. Returns the block, or `None` if nothing was pasted.
    pub fn paste_text(&self, text: &str) -> Option<CellRange> {
        if text.is_empty() {
            return None;
        }
        let origin = self.inner.selection.active_cell()?;
        let extent = self.extent()?;
        self.inner
            .hooks
            .run(&HookEvent::Paste(text), || self.apply_paste(origin, extent, text))
            .flatten()
    }

    /// Read the grid clipboard and paste it at the active cell.
    ///
    /// # Errors
    /// Propagates clipboard read failures.
    pub fn paste_from_clipboard(&self) -> Result<Option<CellRange>> {
        let text = self.inner.clipboard.borrow_mut().read_text()?;
        Ok(self.paste_text(&text))
    }

    fn apply_paste(&self, origin: Coordinate, extent: Coordinate, text: &str) -> Option<CellRange> {
        let rows = parse_tsv(text);
        let height = u32::try_from(rows.len()).ok()?;
        let width = rows
            .iter()
            .map(Vec::len)
            .max()
            .and_then(|w| u32::try_from(w).ok())?;
        if height == 0 || width == 0 {
            return None;
        }

        let mut written = 0usize;
        for (dy, fields) in (0u32..).zip(&rows) {
            for (dx, field) in (0u32..).zip(fields) {
                let target = Coordinate::new(origin.x + dx, origin.y + dy);
                if target.x > extent.x || target.y > extent.y {
                    continue;
                }
                if self.write_text_at(target, field) {
                    written += 1;
                }
            }
        }
        tracing::debug!(written, rows = height, columns = width, "pasted");

        let end = Coordinate::new(origin.x + width - 1, origin.y + height - 1).clamp_to(extent);
        let block = CellRange::new(origin, end);
        self.change_selection(vec![SelectionRange::new(origin, end)], Some(origin));
        Some(block)
    }

    /// Store pasted text in one cell. Returns `false` for readonly targets.
    fn write_text_at(&self, target: Coordinate, text: &str) -> bool {
        let Some(position) = self.get_cell_position(target) else {
            return false;
        };
        let Some(column) = self.get_column_options(&position.column) else {
            return false;
        };
        if !column.accepts_writes() {
            return false;
        }
        let value = match self.transformer_for(&column) {
            Some(transformer) => transformer.write(&Value::String(text.to_string())),
            None => {
                let existing = self.get_raw_cell_value(&position.row, &position.column);
                coerce_text(text, existing.as_ref())
            }
        };
        self.set_cell_value(&position.row, &position.column, value)
            .is_ok()
    }
}
