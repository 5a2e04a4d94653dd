use anyhow::{anyhow, Result};
use libpulse_binding as pulse;
use libpulse_simple_binding as psimple;
use pulse::sample::{Format, Spec};
use pulse::stream::Direction;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::analyser::FftAnalyser;
use super::Snapshot;
use crate::config::AudioConfig;

/// Owns the PulseAudio capture thread that feeds the analysis node.
pub struct AudioCapture {
    // Keep the thread handle to ensure it stays alive
    _capture_thread: thread::JoinHandle<()>,
    stop_flag: Arc<AtomicBool>,
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }
}

/// List available PulseAudio/PipeWire sources.
///
/// Returns a list of `(name, state)` tuples parsed from `pactl list short sources`.
pub fn list_sources() -> Result<Vec<(String, String)>> {
    let output = std::process::Command::new("pactl")
        .args(["list", "short", "sources"])
        .output()
        .map_err(|e| anyhow!("Failed to run pactl: {}", e))?;

    if !output.status.success() {
        return Err(anyhow!("pactl list short sources failed"));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let mut sources = Vec::new();
    for line in text.lines() {
        // Format: <id>\t<name>\t<module>\t<sample_spec>\t<state>
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() >= 5 {
            sources.push((cols[1].to_string(), cols[4].to_string()));
        }
    }
    Ok(sources)
}

impl AudioCapture {
    /// Connect to PulseAudio and spawn the capture thread, feeding the
    /// analysis node. Snapshots are published through `sender` as they are
    /// produced.
    pub fn new(
        audio: &AudioConfig,
        analyser: FftAnalyser,
        sender: watch::Sender<Snapshot>,
    ) -> Result<Self> {
        let source = match (&audio.source, &audio.device) {
            // A full source name, used verbatim
            (Some(source), _) => {
                info!("Using explicit source: {}", source);
                Some(source.clone())
            }
            // A sink name, capture its monitor
            (None, Some(sink)) => {
                let monitor = format!("{}.monitor", sink);
                info!("Using explicit sink monitor: {}", monitor);
                Some(monitor)
            }
            (None, None) => Self::find_monitor_source(),
        };

        let spec = Spec {
            format: Format::F32le,
            channels: 2,
            rate: audio.sample_rate,
        };

        if !spec.is_valid() {
            return Err(anyhow!("Invalid PulseAudio sample spec"));
        }

        info!(
            "Using audio device: {}",
            source.as_deref().unwrap_or("default")
        );

        let pulse = psimple::Simple::new(
            None,                 // Use default server
            "polarviz",           // Application name
            Direction::Record,    // Recording stream
            source.as_deref(),    // Device name (None = default)
            "spectrum-analyser",  // Stream description
            &spec,                // Sample format
            None,                 // Default channel map
            None,                 // Default buffering attributes
        )
        .map_err(|e| anyhow!("Failed to connect to PulseAudio: {:?}", e))?;

        info!("Connected to PulseAudio, fft size: {}", analyser.fft_size());

        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop_flag_clone = stop_flag.clone();
        let block = audio.block_size;

        let capture_thread = thread::spawn(move || {
            Self::capture_loop(pulse, analyser, block, sender, stop_flag_clone);
        });

        Ok(Self {
            _capture_thread: capture_thread,
            stop_flag,
        })
    }

    fn capture_loop(
        pulse: psimple::Simple,
        mut analyser: FftAnalyser,
        block_size: usize,
        sender: watch::Sender<Snapshot>,
        stop_flag: Arc<AtomicBool>,
    ) {
        // Stereo f32 read buffer; downmixed to mono before analysis
        let mut buffer = vec![0.0f32; block_size * 2];

        loop {
            if stop_flag.load(Ordering::Relaxed) {
                debug!("Stop flag set, ending capture loop");
                break;
            }

            let byte_slice = unsafe {
                std::slice::from_raw_parts_mut(
                    buffer.as_mut_ptr() as *mut u8,
                    buffer.len() * std::mem::size_of::<f32>(),
                )
            };

            if let Err(e) = pulse.read(byte_slice) {
                warn!("PulseAudio read error: {:?}", e);
                continue;
            }

            let mono: Vec<f32> = buffer
                .chunks(2)
                .map(|chunk| (chunk[0] + chunk[1]) / 2.0)
                .collect();

            let snapshot = analyser.process(&mono);

            if sender.send(Arc::new(snapshot)).is_err() {
                debug!("Snapshot receiver dropped, stopping capture");
                break;
            }
        }
    }

    /// Find a monitor source for capturing system audio output.
    ///
    /// Queries PulseAudio/PipeWire for the default sink and uses its monitor
    /// source, so we always capture from whatever output the user is listening to.
    fn find_monitor_source() -> Option<String> {
        if let Ok(output) = std::process::Command::new("pactl")
            .args(["get-default-sink"])
            .output()
        {
            if output.status.success() {
                let sink_name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !sink_name.is_empty() {
                    let monitor = format!("{}.monitor", sink_name);
                    info!("Using default sink monitor: {}", monitor);
                    return Some(monitor);
                }
            }
        }

        warn!("Could not determine default sink, using PulseAudio default source");
        None
    }
}
