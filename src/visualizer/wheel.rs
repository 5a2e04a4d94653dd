use ratatui::prelude::*;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI, TAU};

use super::braille::BrailleCanvas;
use super::radial;
use crate::color::{dim, ColorScheme};

const GRID_COLOR: (u8, u8, u8) = (80, 80, 80);
const LABEL_COLOR: Color = Color::Gray;

/// Bin points are drawn once the amplitude fraction clears this threshold.
const POINT_THRESHOLD: f32 = 0.2;

/// Fixed frequency-axis labels and the angles they sit at, just outside
/// the rim. Hand-placed to approximate each decade's position on the
/// log scale.
pub const AXIS_LABELS: [(&str, f32); 5] = [
    ("0 Hz", 1.5 * PI),
    ("100 Hz", 1.75 * PI),
    ("1 kHz", 0.0),
    ("10 kHz", 0.25 * PI),
    ("100 kHz", 0.5 * PI),
];

/// Wheel placement in braille-dot coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
}

impl Geometry {
    /// Fit the wheel to a dot grid, inset by `margin` dots for labels.
    pub fn fit(grid_w: usize, grid_h: usize, margin: f32) -> Self {
        let (cx, cy, radius) = radial::fit_circle(grid_w, grid_h, margin);
        Self { cx, cy, radius }
    }

    #[inline]
    pub fn point(&self, angle: f32, radius: f32) -> (f32, f32) {
        radial::polar_to_grid(self.cx, self.cy, angle, radius)
    }
}

/// Concentric reference circles and radial spokes.
pub fn draw_grid(canvas: &mut BrailleCanvas, geo: &Geometry) {
    canvas.circle(geo.cx, geo.cy, geo.radius, GRID_COLOR);

    // Amplitude level circles
    for i in 1..=4 {
        canvas.circle(geo.cx, geo.cy, geo.radius * i as f32 / 5.0, GRID_COLOR);
    }

    // Spokes every pi/6
    for i in 0..12 {
        let angle = i as f32 * FRAC_PI_6;
        canvas.line((geo.cx, geo.cy), geo.point(angle, geo.radius), GRID_COLOR);
    }
}

/// One radial mark per bin at or below the ceiling: a line from the rim
/// inward to the inset point, shaded dim at the inset end and saturated at
/// the rim, the whole mark scaled by the bin's amplitude. A point is added
/// once the amplitude clears the threshold.
pub fn draw_bins(
    canvas: &mut BrailleCanvas,
    geo: &Geometry,
    snapshot: &[u8],
    sample_rate: f32,
    fft_size: usize,
    max_frequency: f32,
    scheme: ColorScheme,
) {
    let visible = radial::visible_bins(snapshot.len(), sample_rate, fft_size, max_frequency);
    for (i, &magnitude) in snapshot.iter().take(visible).enumerate() {
        // A silent bin is a zero-length mark; nothing to draw.
        if magnitude == 0 {
            continue;
        }

        let frequency = radial::bin_frequency(i, sample_rate, fft_size);
        let angle = radial::frequency_angle(frequency, max_frequency);
        let position = (angle + FRAC_PI_2) / TAU;
        let amp = radial::amplitude(magnitude);

        let rim_r = geo.radius;
        let inner_r = geo.radius * radial::magnitude_inset(magnitude);

        // Walk the mark one dot at a time so the radial shading is smooth.
        let span = rim_r - inner_r;
        let steps = (span.ceil() as usize).max(1);
        for step in 0..=steps {
            let r = inner_r + span * step as f32 / steps as f32;
            let intensity = r / geo.radius;
            let (x, y) = geo.point(angle, r);
            canvas.dot(x, y, dim(scheme.get_color(position, intensity), amp));
        }

        if amp > POINT_THRESHOLD {
            let (x, y) = geo.point(angle, inner_r);
            canvas.disc(x, y, 1.5, dim((255, 255, 255), amp));
        }
    }
}

/// Fixed frequency-axis labels just outside the rim, centered on their
/// anchor. A character terminal cannot rotate text, so labels sit upright.
pub fn draw_labels(frame: &mut Frame, area: Rect, geo: &Geometry) {
    for (text, angle) in AXIS_LABELS {
        let (gx, gy) = geo.point(angle, geo.radius + 5.0);
        draw_text_at_dot(frame, area, (gx, gy), text, LABEL_COLOR);
    }
}

/// Write `text` centered on a dot-grid anchor, clipped to the area.
pub fn draw_text_at_dot(
    frame: &mut Frame,
    area: Rect,
    anchor: (f32, f32),
    text: &str,
    color: Color,
) {
    let cell_x = (anchor.0 / 2.0).round() as i32;
    let cell_y = (anchor.1 / 4.0).round() as i32;
    let start = cell_x - text.chars().count() as i32 / 2;

    for (i, ch) in text.chars().enumerate() {
        let x = start + i as i32;
        if x < 0 || x >= area.width as i32 || cell_y < 0 || cell_y >= area.height as i32 {
            continue;
        }
        if let Some(cell) = frame
            .buffer_mut()
            .cell_mut((area.x + x as u16, area.y + cell_y as u16))
        {
            cell.set_char(ch);
            cell.set_fg(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_labels_cover_the_log_decades() {
        assert_eq!(AXIS_LABELS.len(), 5);
        assert_eq!(AXIS_LABELS[0].0, "0 Hz");
        assert_eq!(AXIS_LABELS[0].1, 1.5 * PI);
        assert_eq!(AXIS_LABELS[2], ("1 kHz", 0.0));
    }

    #[test]
    fn geometry_point_lands_on_the_rim() {
        let geo = Geometry::fit(200, 200, 10.0);
        let (x, y) = geo.point(-FRAC_PI_2, geo.radius);
        assert!((x - geo.cx).abs() < 1e-3);
        assert!((geo.cy - y - geo.radius).abs() < 1e-3);
    }
}
