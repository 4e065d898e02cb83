use eframe::egui::Color32;

/// Saturating S-curve used to shape edge transparency falloff.
fn logistic(x: f32, scale: f32, shift: f32) -> f32 {
    1.0 / (1.0 + (-(x - shift) * scale).exp())
}

/// Opacity for a reference edge of the given on-screen length. Longer edges
/// fade out; `edge_falloff` steers how aggressively. Either endpoint being
/// hovered overrides the falloff entirely so a note's connections stay
/// readable under the pointer.
pub(super) fn edge_alpha(distance: f32, edge_falloff: f32, endpoint_hovered: bool) -> u8 {
    if endpoint_hovered {
        return u8::MAX;
    }

    let opacity = 255.0 - logistic(edge_falloff, 2.0, -0.5) * (distance + 1.0);
    opacity.clamp(0.0, 255.0) as u8
}

fn normalize_log(value: u64, min: u64, max: u64) -> f32 {
    let min = min.max(1) as f64;
    let max = (max as f64).max(min);
    let value = value.max(1) as f64;

    let denominator = max.ln() - min.ln();
    if denominator.abs() < f64::EPSILON {
        return 0.5;
    }

    ((value.ln() - min.ln()) / denominator).clamp(0.0, 1.0) as f32
}

/// Marker radius from note byte size: log-damped so a huge note reads larger
/// without dwarfing everything else. Purely visual; physics never sees it.
pub(super) fn node_radius(size_bytes: u64, min: u64, max: u64) -> f32 {
    3.0 + (normalize_log(size_bytes, min, max) * 9.0)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}
