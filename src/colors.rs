use egui::Color32;

const SPECIES_SATURATION: f32 = 0.62;
const SPECIES_VALUE: f32 = 0.86;

/// Stable marker color for a species name.
///
/// The hue comes from a blake3 digest of the trimmed, lower-cased name, so
/// spelling variants that differ only in case share a color.
pub fn species_color(name: &str) -> Color32 {
    let normalized = name.trim().to_lowercase();
    let digest = blake3::hash(normalized.as_bytes());
    let bytes = digest.as_bytes();
    let raw = u16::from_le_bytes([bytes[0], bytes[1]]);
    let hue = f32::from(raw) / f32::from(u16::MAX) * 360.0;
    let (r, g, b) = hsv_to_rgb(hue, SPECIES_SATURATION, SPECIES_VALUE);
    Color32::from_rgb(r, g, b)
}

/// Same color with alpha scaled by `opacity` in `[0, 1]`.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let c = v * s;
    let hh = (h / 60.0) % 6.0;
    let x = c * (1.0 - ((hh % 2.0) - 1.0).abs());
    let (r1, g1, b1) = match hh as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    let to_byte = |channel: f32| ((channel + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r1), to_byte(g1), to_byte(b1))
}
