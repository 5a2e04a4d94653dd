mod analyser;
mod capture;

pub use analyser::{AnalyserConfig, FftAnalyser};
pub use capture::{list_sources, AudioCapture};

use std::sync::Arc;
use tokio::sync::watch;

use crate::config::AudioConfig;

/// The latest per-bin byte magnitudes published by the capture thread.
pub type Snapshot = Arc<Vec<u8>>;

/// An analysis node: the source of frequency-magnitude snapshots the
/// visualizer draws from. The render path depends on nothing else, so tests
/// drive it with a scripted implementation.
pub trait Analyser {
    /// The transform window size (power of two).
    fn fft_size(&self) -> usize;

    /// Number of frequency bins, `fft_size / 2`.
    fn frequency_bin_count(&self) -> usize {
        self.fft_size() / 2
    }

    fn sample_rate(&self) -> f32;

    /// Fill `buf` with the latest per-bin magnitude snapshot (0-255).
    /// When `buf` and the bin count disagree, the overlapping prefix is
    /// copied and any excess in `buf` is zeroed.
    fn byte_frequency_data(&mut self, buf: &mut [u8]);
}

/// Analysis node backed by the live capture pipeline. Reading never blocks;
/// it hands out whatever snapshot the capture thread published last.
pub struct LiveAnalyser {
    fft_size: usize,
    sample_rate: f32,
    rx: watch::Receiver<Snapshot>,
}

impl Analyser for LiveAnalyser {
    fn fft_size(&self) -> usize {
        self.fft_size
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn byte_frequency_data(&mut self, buf: &mut [u8]) {
        let snapshot = self.rx.borrow();
        let n = buf.len().min(snapshot.len());
        buf[..n].copy_from_slice(&snapshot[..n]);
        buf[n..].fill(0);
    }
}

/// Wire the capture thread to an analysis node the visualizer can poll.
pub fn create_pipeline(audio: &AudioConfig) -> anyhow::Result<(AudioCapture, LiveAnalyser)> {
    let fft = FftAnalyser::new(
        audio.sample_rate as f32,
        AnalyserConfig {
            fft_size: audio.fft_size,
            smoothing: audio.smoothing,
            ..AnalyserConfig::default()
        },
    );
    let fft_size = fft.fft_size();
    let sample_rate = fft.sample_rate();

    let (tx, rx) = watch::channel(Arc::new(vec![0u8; fft.frequency_bin_count()]));
    let capture = AudioCapture::new(audio, fft, tx)?;
    Ok((
        capture,
        LiveAnalyser {
            fft_size,
            sample_rate,
            rx,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        bins: Vec<u8>,
    }

    impl Analyser for Fixed {
        fn fft_size(&self) -> usize {
            self.bins.len() * 2
        }

        fn sample_rate(&self) -> f32 {
            44100.0
        }

        fn byte_frequency_data(&mut self, buf: &mut [u8]) {
            let n = buf.len().min(self.bins.len());
            buf[..n].copy_from_slice(&self.bins[..n]);
            buf[n..].fill(0);
        }
    }

    #[test]
    fn bin_count_is_half_the_window() {
        let a = Fixed { bins: vec![0; 8192] };
        assert_eq!(a.fft_size(), 16384);
        assert_eq!(a.frequency_bin_count(), 8192);
    }

    #[test]
    fn fill_tolerates_mismatched_buffers() {
        let mut a = Fixed { bins: vec![7; 4] };
        let mut long = [1u8; 6];
        a.byte_frequency_data(&mut long);
        assert_eq!(long, [7, 7, 7, 7, 0, 0]);

        let mut short = [1u8; 2];
        a.byte_frequency_data(&mut short);
        assert_eq!(short, [7, 7]);
    }
}
