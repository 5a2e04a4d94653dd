use rustfft::{num_complex::Complex, FftPlanner};

/// Tuning for the analysis node. The dB window and smoothing defaults match
/// the byte-quantized analyser contract the visualizer was built against.
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// FFT window size, must be a power of two. Larger sizes give finer
    /// frequency resolution at the cost of responsiveness.
    pub fft_size: usize,
    /// Temporal smoothing factor (0.0-1.0, higher = smoother).
    pub smoothing: f32,
    /// Magnitudes at or below this level quantize to byte 0.
    pub min_db: f32,
    /// Magnitudes at or above this level quantize to byte 255.
    pub max_db: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 16384,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
        }
    }
}

/// Produces byte-quantized frequency-magnitude snapshots from blocks of
/// mono samples: Hann window, forward FFT, temporal smoothing of linear
/// magnitudes, then linear mapping of the dB window onto 0-255.
pub struct FftAnalyser {
    config: AnalyserConfig,
    sample_rate: f32,
    planner: FftPlanner<f32>,
    buffer: Vec<Complex<f32>>,
    window: Vec<f32>,
    smoothed: Vec<f32>,
}

impl FftAnalyser {
    pub fn new(sample_rate: f32, config: AnalyserConfig) -> Self {
        let fft_size = config.fft_size;

        // Hann window to reduce spectral leakage
        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (fft_size - 1) as f32).cos())
            })
            .collect();

        Self {
            sample_rate,
            planner: FftPlanner::new(),
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            window,
            smoothed: vec![0.0; fft_size / 2],
            config,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.config.fft_size
    }

    /// One magnitude per positive frequency, `fft_size / 2` of them.
    pub fn frequency_bin_count(&self) -> usize {
        self.config.fft_size / 2
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Process one block of mono samples into a byte snapshot. Blocks
    /// shorter than the FFT size are zero-padded.
    pub fn process(&mut self, samples: &[f32]) -> Vec<u8> {
        let fft_size = self.config.fft_size;

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = samples.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        let fft = self.planner.plan_fft_forward(fft_size);
        fft.process(&mut self.buffer);

        let s = self.config.smoothing;
        let min_db = self.config.min_db;
        let scale = 255.0 / (self.config.max_db - min_db);

        self.smoothed
            .iter_mut()
            .zip(self.buffer.iter())
            .map(|(prev, bin)| {
                let magnitude = bin.norm() / fft_size as f32;
                *prev = *prev * s + magnitude * (1.0 - s);
                let db = 20.0 * prev.log10();
                (scale * (db - min_db)).clamp(0.0, 255.0) as u8
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyser(fft_size: usize, smoothing: f32) -> FftAnalyser {
        FftAnalyser::new(
            44100.0,
            AnalyserConfig {
                fft_size,
                smoothing,
                ..AnalyserConfig::default()
            },
        )
    }

    #[test]
    fn snapshot_covers_positive_bins() {
        let mut a = analyser(1024, 0.0);
        assert_eq!(a.frequency_bin_count(), 512);
        assert_eq!(a.process(&[0.0; 1024]).len(), 512);
    }

    #[test]
    fn silence_quantizes_to_zero() {
        let mut a = analyser(1024, 0.0);
        let snapshot = a.process(&[0.0; 1024]);
        assert!(snapshot.iter().all(|&b| b == 0));
    }

    #[test]
    fn sine_peaks_at_its_bin() {
        let fft_size = 1024;
        let mut a = analyser(fft_size, 0.0);

        // A quiet tone centered on bin 10; quiet enough that neighboring
        // bins stay below the 255 ceiling and the peak is unambiguous.
        let freq = 10.0 * 44100.0 / fft_size as f32;
        let samples: Vec<f32> = (0..fft_size)
            .map(|i| 0.01 * (std::f32::consts::TAU * freq * i as f32 / 44100.0).sin())
            .collect();

        let snapshot = a.process(&samples);
        let peak = snapshot
            .iter()
            .enumerate()
            .max_by_key(|(_, &b)| b)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 10);
        assert!(snapshot[10] > 0);
        assert!(snapshot[10] > snapshot[100]);
    }

    #[test]
    fn smoothing_delays_decay() {
        let fft_size = 1024;
        let mut a = analyser(fft_size, 0.8);

        let freq = 10.0 * 44100.0 / fft_size as f32;
        let samples: Vec<f32> = (0..fft_size)
            .map(|i| (std::f32::consts::TAU * freq * i as f32 / 44100.0).sin())
            .collect();

        a.process(&samples);
        // Tone gone, but the smoothed magnitude should not have collapsed.
        let after = a.process(&[0.0; 1024]);
        assert!(after[10] > 0);
    }

    #[test]
    fn short_blocks_are_zero_padded() {
        let mut a = analyser(1024, 0.0);
        let snapshot = a.process(&[0.5; 16]);
        assert_eq!(snapshot.len(), 512);
    }
}
