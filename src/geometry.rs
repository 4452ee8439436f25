//! Live hit testing against rendered item rectangles.
//!
//! The overlap test always goes through an item's current
//! [`GlobalTransform`], so in-flight hover scaling and the tray root's slide
//! translation are reflected automatically. Nothing here caches geometry:
//! rectangles can change every frame.
use bevy::prelude::*;

/// Returns whether `point` (world space) lies inside the rendered rectangle
/// of an element whose base size is `size`.
///
/// The rectangle is half-open on its right and top edges so that adjacent
/// rectangles never both claim a shared boundary.
pub fn point_within_rect(point: Vec2, global: &GlobalTransform, size: Vec2) -> bool {
    let half = size * 0.5;
    let local = global
        .to_matrix()
        .inverse()
        .transform_point3(point.extend(0.0))
        .truncate();
    local.x >= -half.x && local.x < half.x && local.y >= -half.y && local.y < half.y
}

/// Resolves the item overlapped by `point` out of a full row of candidates.
///
/// Candidates must arrive in display order; when scaled rectangles overlap,
/// the lowest display index wins, which keeps resolution deterministic.
pub fn resolve_item<'a, I>(point: Vec2, size: Vec2, row: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, &'a GlobalTransform)>,
{
    row.into_iter()
        .find(|(_, global)| point_within_rect(point, global, size))
        .map(|(index, _)| index)
}
