use eframe::egui::Pos2;

/// Screen distance within which a note's label is shown and its edges are
/// forced fully opaque.
pub(in crate::app) const HOVER_RADIUS: f32 = 50.0;

/// Screen distance for click-to-open hit-testing.
pub(in crate::app) const HIT_RADIUS: f32 = 8.0;

/// Per-node hover flags for the current pointer position. Several markers can
/// be hovered at once; each shows its own label.
pub(in crate::app) fn hovered_mask(
    screen_positions: &[Pos2],
    pointer: Option<Pos2>,
    radius: f32,
) -> Vec<bool> {
    let Some(pointer) = pointer else {
        return vec![false; screen_positions.len()];
    };

    let radius_sq = radius * radius;
    screen_positions
        .iter()
        .map(|position| (*position - pointer).length_sq() <= radius_sq)
        .collect()
}

/// First node in index order whose marker contains the click. First match
/// wins under overlap; the caller stops after one open request.
pub(in crate::app) fn first_hit(
    screen_positions: &[Pos2],
    pointer: Pos2,
    radius: f32,
) -> Option<usize> {
    let radius_sq = radius * radius;
    screen_positions
        .iter()
        .position(|position| (*position - pointer).length_sq() <= radius_sq)
}
