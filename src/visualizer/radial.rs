use std::f32::consts::{FRAC_PI_2, TAU};

/// Display ceiling: bins and markers above this frequency are not drawn.
pub const MAX_FREQUENCY_HZ: f32 = 330_000.0;

/// Frequency represented by an FFT bin: `index * sample_rate / fft_size`.
#[inline]
pub fn bin_frequency(index: usize, sample_rate: f32, fft_size: usize) -> f32 {
    index as f32 * sample_rate / fft_size as f32
}

/// Map a frequency to its angle on the wheel using a log scale.
/// 0 Hz sits at the top (-pi/2) and the scale wraps clockwise, reaching
/// the top again at `max_frequency`.
#[inline]
pub fn frequency_angle(frequency: f32, max_frequency: f32) -> f32 {
    let norm = (frequency + 1.0).ln() / (max_frequency + 1.0).ln();
    norm * TAU - FRAC_PI_2
}

/// Amplitude fraction for a byte magnitude. 255 maps just below 1.0,
/// matching the 256 denominator of the byte-quantized analyser range.
#[inline]
pub fn amplitude(magnitude: u8) -> f32 {
    magnitude as f32 / 256.0
}

/// Radial inset factor for a byte magnitude: 1.0 on the rim at silence,
/// approaching 0.5 at full scale. Multiply by the wheel radius to get the
/// distance of the bin point from the center.
#[inline]
pub fn magnitude_inset(magnitude: u8) -> f32 {
    1.0 - amplitude(magnitude) * 0.5
}

/// Number of leading bins whose frequency is at or below the ceiling.
/// Everything past them is skipped by the renderer.
pub fn visible_bins(
    bin_count: usize,
    sample_rate: f32,
    fft_size: usize,
    max_frequency: f32,
) -> usize {
    (0..bin_count)
        .take_while(|&i| bin_frequency(i, sample_rate, fft_size) <= max_frequency)
        .count()
}

/// Convert polar coordinates to cartesian grid coordinates.
/// `cx`, `cy`: center point; `angle`: radians; `radius`: distance from center.
#[inline]
pub fn polar_to_grid(cx: f32, cy: f32, angle: f32, radius: f32) -> (f32, f32) {
    (cx + angle.cos() * radius, cy + angle.sin() * radius)
}

/// Compute the circle that fits a grid of the given dimensions, inset by
/// `margin` grid units on all sides. Returns (center_x, center_y, radius).
pub fn fit_circle(grid_w: usize, grid_h: usize, margin: f32) -> (f32, f32, f32) {
    let cx = grid_w as f32 / 2.0;
    let cy = grid_h as f32 / 2.0;
    let radius = (cx.min(cy) - margin).max(1.0);
    (cx, cy, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_relative_eq, relative_eq};

    const SAMPLE_RATE: f32 = 44100.0;
    const FFT_SIZE: usize = 16384;

    #[test]
    fn bin_frequency_is_exact() {
        assert_eq!(bin_frequency(0, SAMPLE_RATE, FFT_SIZE), 0.0);
        assert_eq!(bin_frequency(1, SAMPLE_RATE, FFT_SIZE), SAMPLE_RATE / FFT_SIZE as f32);
        assert_eq!(
            bin_frequency(371, SAMPLE_RATE, FFT_SIZE),
            371.0 * SAMPLE_RATE / FFT_SIZE as f32
        );
    }

    #[test]
    fn zero_hz_sits_at_top() {
        assert_eq!(frequency_angle(0.0, MAX_FREQUENCY_HZ), -FRAC_PI_2);
    }

    #[test]
    fn ceiling_wraps_back_to_top() {
        // A full turn from -pi/2 lands at 3pi/2.
        assert_relative_eq!(
            frequency_angle(MAX_FREQUENCY_HZ, MAX_FREQUENCY_HZ),
            3.0 * FRAC_PI_2,
            epsilon = 1e-4
        );
    }

    #[test]
    fn angle_is_strictly_increasing() {
        let freqs = [0.0, 1.0, 125.0, 319.68, 1000.0, 32768.0, 150_000.0, MAX_FREQUENCY_HZ];
        for pair in freqs.windows(2) {
            assert!(
                frequency_angle(pair[1], MAX_FREQUENCY_HZ)
                    > frequency_angle(pair[0], MAX_FREQUENCY_HZ),
                "angle not increasing between {} Hz and {} Hz",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn inset_is_monotonic_and_bounded() {
        assert_eq!(magnitude_inset(0), 1.0);
        let mut prev = magnitude_inset(0);
        for magnitude in 1..=255u8 {
            let inset = magnitude_inset(magnitude);
            assert!(inset < prev, "inset not decreasing at magnitude {}", magnitude);
            assert!((0.5..=1.0).contains(&inset));
            prev = inset;
        }
        assert_relative_eq!(magnitude_inset(255), 1.0 - 255.0 / 512.0);
    }

    #[test]
    fn audio_rate_bins_all_sit_under_the_ceiling() {
        // At 44.1 kHz every positive bin is far below 330 kHz.
        assert_eq!(
            visible_bins(FFT_SIZE / 2, SAMPLE_RATE, FFT_SIZE, MAX_FREQUENCY_HZ),
            FFT_SIZE / 2
        );
    }

    #[test]
    fn bins_above_the_ceiling_are_cut() {
        // 1 MHz rate, 1024-point window: bin i sits at i * 976.5625 Hz,
        // so bins 0..=337 are visible and 338 onward are not.
        let visible = visible_bins(512, 1_000_000.0, 1024, MAX_FREQUENCY_HZ);
        assert_eq!(visible, 338);
        assert!(bin_frequency(337, 1_000_000.0, 1024) <= MAX_FREQUENCY_HZ);
        assert!(bin_frequency(338, 1_000_000.0, 1024) > MAX_FREQUENCY_HZ);
    }

    #[test]
    fn polar_top_is_straight_up() {
        let (x, y) = polar_to_grid(50.0, 50.0, -FRAC_PI_2, 40.0);
        assert!(relative_eq!(x, 50.0, epsilon = 1e-4));
        assert!(relative_eq!(y, 10.0, epsilon = 1e-4));
    }

    #[test]
    fn fit_circle_respects_margin() {
        let (cx, cy, r) = fit_circle(200, 100, 4.0);
        assert_eq!((cx, cy), (100.0, 50.0));
        assert_eq!(r, 46.0);
    }
}
