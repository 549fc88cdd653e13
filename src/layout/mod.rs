//! Virtualization: which rows and columns to mount for a scroll position.
//!
//! This module handles:
//! - The visible row window in O(1) from a fixed row height
//! - Column zone layout (pinned left, center, pinned right) with flex widths
//! - Binary search for the center column under a pixel position
//! - Viewport scroll state and hit-testing

mod columns;
mod viewport;

use std::ops::RangeInclusive;

pub use columns::{ColumnLayout, ColumnSlot, ColumnWindow, Zone};
pub use viewport::{Extent, Viewport};

/// Inclusive range of rows to mount.
///
/// The window is `[floor(offset / h) - preload, ceil((offset + vh) / h) +
/// preload]`, clamped to the existing rows. Returns `None` when there are no
/// rows or the row height is not positive.
pub fn visible_rows(
    row_count: usize,
    row_height: f32,
    viewport_height: f32,
    scroll_offset: f32,
    preload: u32,
) -> Option<RangeInclusive<u32>> {
    if row_count == 0 || row_height <= 0.0 || !row_height.is_finite() {
        return None;
    }
    let last = u32::try_from(row_count - 1).unwrap_or(u32::MAX);
    let offset = scroll_offset.max(0.0);
    let bottom = offset + viewport_height.max(0.0);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (first, end) = (
        (offset / row_height).floor() as u32,
        (bottom / row_height).ceil() as u32,
    );
    let start = first.saturating_sub(preload).min(last);
    let end = end.saturating_add(preload).min(last);
    Some(start..=end)
}
