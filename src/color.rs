use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Chart colours
// ---------------------------------------------------------------------------

/// Bars of the "top roles" chart.
pub const ROLE_BAR: Color32 = Color32::from_rgb(0x00, 0xB8, 0xD9);
/// Histogram buckets.
pub const HISTOGRAM_BAR: Color32 = Color32::from_rgb(0x00, 0xC8, 0x53);

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Colour ramp for a value inside `[min, max]`: earthy brown for the low end,
/// green for the high end. Used for the per-country bars.
pub fn ramp(value: f64, min: f64, max: f64) -> Color32 {
    let t = if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0) as f32
    } else {
        1.0
    };
    let hsl = Hsl::new(30.0 + 90.0 * t, 0.55, 0.35 + 0.2 * t);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
