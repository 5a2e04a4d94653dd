pub mod braille;
pub mod markers;
pub mod radial;
pub mod wheel;

use ratatui::prelude::*;

use crate::audio::Analyser;
use crate::color::ColorScheme;
use crate::config::{Marker, WheelConfig};

/// The circular spectrum visualizer. Owns the analysis node handle, the
/// once-allocated snapshot buffer, and the display options.
///
/// The display loop calls `tick` once per frame and stops driving it when
/// `tick` returns false. A stop request is honored at the top of the next
/// tick, so an in-flight frame always completes.
pub struct SpectrumWheel {
    analyser: Box<dyn Analyser + Send>,
    snapshot: Vec<u8>,
    config: WheelConfig,
    markers: Vec<Marker>,
    scheme: ColorScheme,
    running: bool,
    stop_requested: bool,
}

impl SpectrumWheel {
    /// Construct the visualizer around an analysis node. The snapshot
    /// buffer is sized to the node's bin count here and reused for every
    /// frame after. An empty marker list selects the built-in table.
    pub fn new(
        analyser: Box<dyn Analyser + Send>,
        config: WheelConfig,
        markers: Vec<Marker>,
    ) -> Self {
        let bins = analyser.frequency_bin_count();
        let markers = if markers.is_empty() {
            markers::builtin_markers()
        } else {
            markers
        };
        Self {
            analyser,
            snapshot: vec![0; bins],
            scheme: config.color_scheme,
            config,
            markers,
            running: true,
            stop_requested: false,
        }
    }

    /// Refresh the snapshot for the next frame. Returns false once a stop
    /// request has taken effect; the frame already in flight when `stop`
    /// was called still rendered.
    pub fn tick(&mut self) -> bool {
        if self.stop_requested {
            self.running = false;
            return false;
        }
        self.analyser.byte_frequency_data(&mut self.snapshot);
        true
    }

    /// Request a stop; takes effect at the top of the next tick.
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    pub fn next_scheme(&mut self) {
        self.scheme = self.scheme.next();
    }

    pub fn toggle_grid(&mut self) {
        self.config.show_grid = !self.config.show_grid;
    }

    pub fn toggle_labels(&mut self) {
        self.config.show_labels = !self.config.show_labels;
    }

    pub fn toggle_markers(&mut self) {
        self.config.show_markers = !self.config.show_markers;
    }

    /// Draw the wheel into the frame. The geometry is re-fit to the area
    /// every call, so terminal resizes are picked up on the next frame.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mut canvas = braille::BrailleCanvas::new(area.width as usize, area.height as usize);
        let (grid_w, grid_h) = canvas.grid_size();
        let margin = if self.config.show_labels { 10.0 } else { 4.0 };
        let geo = wheel::Geometry::fit(grid_w, grid_h, margin);

        if self.config.show_grid {
            wheel::draw_grid(&mut canvas, &geo);
        }

        wheel::draw_bins(
            &mut canvas,
            &geo,
            &self.snapshot,
            self.analyser.sample_rate(),
            self.analyser.fft_size(),
            self.config.max_frequency,
            self.scheme,
        );

        if self.config.show_markers {
            markers::draw_marker_dots(&mut canvas, &geo, &self.markers, self.config.max_frequency);
        }

        canvas.flush(frame, area);

        if self.config.show_labels {
            wheel::draw_labels(frame, area, &geo);
        }
        if self.config.show_markers {
            markers::draw_marker_names(frame, area, &geo, &self.markers, self.config.max_frequency);
        }
    }
}
