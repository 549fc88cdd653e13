//! Column zone layout: pinned-left, scrolling center, pinned-right.

use std::cmp::Ordering;
use std::ops::Range;
use std::rc::Rc;

use serde::Serialize;

use crate::types::{ColumnOptions, Pinned};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Zone {
    Left,
    Center,
    Right,
}

impl From<Option<Pinned>> for Zone {
    fn from(pinned: Option<Pinned>) -> Self {
        match pinned {
            Some(Pinned::Left) => Self::Left,
            Some(Pinned::Right) => Self::Right,
            None => Self::Center,
        }
    }
}

/// Placement of one column. `offset` is relative to the start of its zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnSlot {
    pub zone: Zone,
    pub offset: f32,
    pub width: f32,
}

/// Display-index ranges of the columns to mount, per zone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnWindow {
    pub left: Range<u32>,
    pub center: Range<u32>,
    pub right: Range<u32>,
}

impl ColumnWindow {
    pub fn contains(&self, index: u32) -> bool {
        self.left.contains(&index) || self.center.contains(&index) || self.right.contains(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.left
            .clone()
            .chain(self.center.clone())
            .chain(self.right.clone())
    }
}

/// Pre-computed column positions for a list of columns in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnLayout {
    slots: Vec<ColumnSlot>,
    left_count: usize,
    right_count: usize,
    left_width: f32,
    center_width: f32,
    right_width: f32,
    /// Left edge of every center column, for binary search.
    center_positions: Vec<f32>,
}

impl ColumnLayout {
    /// Lay out `columns` (already in display order) inside a container of
    /// `container_width` pixels.
    ///
    /// Unpinned flex columns share whatever the fixed columns leave over, in
    /// proportion to their flex factor, but never shrink below `min_width`.
    /// With no room left they fall back to their declared width.
    pub fn compute(columns: &[Rc<ColumnOptions>], container_width: f32) -> Self {
        let mut fixed = 0.0_f32;
        let mut total_flex = 0.0_f32;
        for col in columns {
            match (Zone::from(col.pinned), col.flex) {
                (Zone::Center, Some(flex)) => total_flex += flex,
                _ => fixed += col.width,
            }
        }
        let remaining = container_width - fixed;

        let mut layout = Self::default();
        let mut cursor = [0.0_f32; 3];
        for col in columns {
            let zone = Zone::from(col.pinned);
            let width = match (zone, col.flex) {
                (Zone::Center, Some(flex)) if remaining > 0.0 && total_flex > 0.0 => {
                    (remaining * flex / total_flex).max(col.min_width)
                }
                _ => col.width.max(col.min_width),
            };
            let slot_cursor = match zone {
                Zone::Left => {
                    layout.left_count += 1;
                    &mut cursor[0]
                }
                Zone::Center => {
                    layout.center_positions.push(cursor[1]);
                    &mut cursor[1]
                }
                Zone::Right => {
                    layout.right_count += 1;
                    &mut cursor[2]
                }
            };
            layout.slots.push(ColumnSlot {
                zone,
                offset: *slot_cursor,
                width,
            });
            *slot_cursor += width;
        }
        let [left, center, right] = cursor;
        layout.left_width = left;
        layout.center_width = center;
        layout.right_width = right;
        layout
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: u32) -> Option<&ColumnSlot> {
        self.slots.get(index as usize)
    }

    pub fn width(&self, index: u32) -> Option<f32> {
        self.slot(index).map(|s| s.width)
    }

    pub fn left_width(&self) -> f32 {
        self.left_width
    }

    pub fn center_width(&self) -> f32 {
        self.center_width
    }

    pub fn right_width(&self) -> f32 {
        self.right_width
    }

    pub fn total_width(&self) -> f32 {
        self.left_width + self.center_width + self.right_width
    }

    fn index(i: usize) -> u32 {
        u32::try_from(i).unwrap_or(u32::MAX)
    }

    pub fn left_range(&self) -> Range<u32> {
        0..Self::index(self.left_count)
    }

    pub fn center_range(&self) -> Range<u32> {
        Self::index(self.left_count)..Self::index(self.slots.len() - self.right_count)
    }

    pub fn right_range(&self) -> Range<u32> {
        Self::index(self.slots.len() - self.right_count)..Self::index(self.slots.len())
    }

    /// Width available to the scrolling center zone.
    pub fn center_viewport_width(&self, viewport_width: f32) -> f32 {
        (viewport_width - self.left_width - self.right_width).max(0.0)
    }

    pub fn max_scroll_x(&self, viewport_width: f32) -> f32 {
        (self.center_width - self.center_viewport_width(viewport_width)).max(0.0)
    }

    /// Screen x where the right zone begins. It hugs the viewport edge, or
    /// the end of the center zone when content is narrower than the viewport.
    fn right_start(&self, viewport_width: f32) -> f32 {
        self.total_width().min(viewport_width) - self.right_width
    }

    /// Center column under center-zone content position `x`.
    fn center_at(&self, x: f32) -> Option<u32> {
        if self.center_positions.is_empty() {
            return None;
        }
        let i = match self
            .center_positions
            .binary_search_by(|pos| pos.partial_cmp(&x).unwrap_or(Ordering::Equal))
        {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        Some(Self::index(self.left_count + i))
    }

    /// Columns to mount for a horizontal scroll position. Pinned zones are
    /// always fully included; the center zone is windowed.
    pub fn visible(&self, scroll_x: f32, viewport_width: f32) -> ColumnWindow {
        let center_width = self.center_viewport_width(viewport_width);
        let center = match (
            self.center_at(scroll_x.max(0.0)),
            self.center_at(scroll_x.max(0.0) + center_width),
        ) {
            (Some(first), Some(last)) => first..last + 1,
            _ => self.center_range(),
        };
        ColumnWindow {
            left: self.left_range(),
            center,
            right: self.right_range(),
        }
    }

    /// Column under screen position `x` (relative to the body's left edge).
    /// Positions past either end clamp to the first or last column.
    pub fn column_at(&self, x: f32, scroll_x: f32, viewport_width: f32) -> Option<u32> {
        if self.slots.is_empty() {
            return None;
        }
        let last = Self::index(self.slots.len() - 1);
        if x < 0.0 {
            return Some(0);
        }
        if x < self.left_width {
            return self
                .left_range()
                .find(|&i| self.slot(i).is_some_and(|s| x < s.offset + s.width))
                .or(Some(0));
        }
        let right_start = self.right_start(viewport_width);
        if self.right_count > 0 && x >= right_start {
            let rx = x - right_start;
            return self
                .right_range()
                .find(|&i| self.slot(i).is_some_and(|s| rx < s.offset + s.width))
                .or(Some(last));
        }
        let cx = x - self.left_width + scroll_x;
        if cx >= self.center_width {
            // Past the last center column with no right zone under the pointer.
            let center = self.center_range();
            return Some(if center.is_empty() {
                last
            } else {
                center.end - 1
            });
        }
        self.center_at(cx).or(Some(last))
    }

    /// Screen x of a column's left edge.
    pub fn screen_x(&self, index: u32, scroll_x: f32, viewport_width: f32) -> Option<f32> {
        let slot = self.slot(index)?;
        Some(match slot.zone {
            Zone::Left => slot.offset,
            Zone::Center => self.left_width + slot.offset - scroll_x,
            Zone::Right => self.right_start(viewport_width) + slot.offset,
        })
    }
}
