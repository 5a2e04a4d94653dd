use ratatui::prelude::*;

use super::braille::BrailleCanvas;
use super::radial;
use super::wheel::{draw_text_at_dot, Geometry};
use crate::config::Marker;

const MARKER_COLOR: (u8, u8, u8) = (255, 255, 100);
const NAME_COLOR: Color = Color::Rgb(255, 255, 100);

/// Built-in reference table: crystal resonance frequencies, in Hz.
pub fn builtin_markers() -> Vec<Marker> {
    [
        ("Clear Quartz", 32768.0),
        ("Amethyst", 319.68),
        ("Rose Quartz", 350.0),
        ("Black Tourmaline", 125.0),
        ("Selenite", 688.35),
        ("Citrine", 400.0),
        ("Moldavite", 150_000.0),
        ("Lapis Lazuli", 417.0),
        ("Green Aventurine", 250.0),
        ("Malachite", 325.0),
    ]
    .into_iter()
    .map(|(name, frequency)| Marker {
        name: name.to_string(),
        frequency,
    })
    .collect()
}

/// Markers at or below the ceiling, with their wheel angles.
pub fn visible_markers(markers: &[Marker], max_frequency: f32) -> Vec<(&Marker, f32)> {
    markers
        .iter()
        .filter(|m| m.frequency <= max_frequency)
        .map(|m| (m, radial::frequency_angle(m.frequency, max_frequency)))
        .collect()
}

/// Rim dots for each visible marker.
pub fn draw_marker_dots(
    canvas: &mut BrailleCanvas,
    geo: &Geometry,
    markers: &[Marker],
    max_frequency: f32,
) {
    for (_, angle) in visible_markers(markers, max_frequency) {
        let (x, y) = geo.point(angle, geo.radius);
        canvas.disc(x, y, 2.0, MARKER_COLOR);
    }
}

/// Marker names just inside the rim. Drawn after the canvas flush so the
/// text sits on top of the braille layer.
pub fn draw_marker_names(
    frame: &mut Frame,
    area: Rect,
    geo: &Geometry,
    markers: &[Marker],
    max_frequency: f32,
) {
    for (marker, angle) in visible_markers(markers, max_frequency) {
        let anchor = geo.point(angle, geo.radius - 10.0);
        draw_text_at_dot(frame, area, anchor, &marker.name, NAME_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn builtin_table_fits_under_the_ceiling() {
        let markers = builtin_markers();
        assert_eq!(markers.len(), 10);
        let visible = visible_markers(&markers, radial::MAX_FREQUENCY_HZ);
        assert_eq!(visible.len(), 10);
        assert!(visible.iter().any(|(m, _)| m.name == "Moldavite"));
    }

    #[test]
    fn markers_above_the_ceiling_are_skipped() {
        let markers = vec![
            Marker {
                name: "Moldavite".into(),
                frequency: 150_000.0,
            },
            Marker {
                name: "Ultrasonic".into(),
                frequency: 400_000.0,
            },
        ];
        let visible = visible_markers(&markers, radial::MAX_FREQUENCY_HZ);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].0.name, "Moldavite");
    }

    #[test]
    fn marker_angles_follow_the_log_scale() {
        let markers = builtin_markers();
        let visible = visible_markers(&markers, radial::MAX_FREQUENCY_HZ);
        for (marker, angle) in visible {
            assert_eq!(
                angle,
                radial::frequency_angle(marker.frequency, radial::MAX_FREQUENCY_HZ)
            );
            assert!(angle >= -FRAC_PI_2);
        }
    }
}
