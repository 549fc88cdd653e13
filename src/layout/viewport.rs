//! Viewport state: scroll position, size and pixel hit-testing.

use std::ops::RangeInclusive;

use super::{visible_rows, ColumnLayout, ColumnWindow};
use crate::types::Coordinate;

/// The visible area of the grid body (below the header).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll of the center zone in pixels
    pub scroll_x: f32,
    /// Vertical scroll in pixels
    pub scroll_y: f32,
    /// Body width in pixels
    pub width: f32,
    /// Body height in pixels
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// Content dimensions the viewport scrolls over.
#[derive(Debug, Clone, Copy)]
pub struct Extent<'a> {
    pub row_count: usize,
    pub row_height: f32,
    pub columns: &'a ColumnLayout,
}

impl Extent<'_> {
    fn total_height(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let rows = self.row_count as f32;
        rows * self.row_height
    }

    /// Last valid coordinate, if the grid has any cells.
    pub fn last_coordinate(&self) -> Option<Coordinate> {
        let rows = u32::try_from(self.row_count.checked_sub(1)?).ok()?;
        let cols = u32::try_from(self.columns.len().checked_sub(1)?).ok()?;
        Some(Coordinate::new(cols, rows))
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }

    /// Rows to mount, including `preload` rows on each side.
    pub fn visible_rows(&self, extent: &Extent<'_>, preload: u32) -> Option<RangeInclusive<u32>> {
        visible_rows(
            extent.row_count,
            extent.row_height,
            self.height,
            self.scroll_y,
            preload,
        )
    }

    pub fn visible_columns(&self, columns: &ColumnLayout) -> ColumnWindow {
        columns.visible(self.scroll_x, self.width)
    }

    /// Clamp scroll so the viewport never shows past the end of the content.
    pub fn clamp_scroll(&mut self, extent: &Extent<'_>) {
        let max_x = extent.columns.max_scroll_x(self.width);
        let max_y = (extent.total_height() - self.height).max(0.0);
        self.scroll_x = self.scroll_x.clamp(0.0, max_x);
        self.scroll_y = self.scroll_y.clamp(0.0, max_y);
    }

    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32, extent: &Extent<'_>) {
        self.scroll_x += delta_x;
        self.scroll_y += delta_y;
        self.clamp_scroll(extent);
    }

    pub fn set_scroll(&mut self, x: f32, y: f32, extent: &Extent<'_>) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll(extent);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Logical coordinate under a body-relative pixel position, clamped to
    /// the grid extent.
    pub fn hit_test(&self, px: f32, py: f32, extent: &Extent<'_>) -> Option<Coordinate> {
        let last = extent.last_coordinate()?;
        if extent.row_height <= 0.0 {
            return None;
        }
        let x = extent
            .columns
            .column_at(px, self.scroll_x, self.width)?
            .min(last.x);
        let y_pos = ((py + self.scroll_y) / extent.row_height).floor().max(0.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let y = (y_pos as u32).min(last.y);
        Some(Coordinate::new(x, y))
    }

    /// Screen rectangle `(x, y, width, height)` of a coordinate's cell.
    pub fn cell_rect(&self, coord: Coordinate, extent: &Extent<'_>) -> Option<(f32, f32, f32, f32)> {
        let x = extent.columns.screen_x(coord.x, self.scroll_x, self.width)?;
        let width = extent.columns.width(coord.x)?;
        #[allow(clippy::cast_precision_loss)]
        let y = coord.y as f32 * extent.row_height - self.scroll_y;
        Some((x, y, width, extent.row_height))
    }
}
