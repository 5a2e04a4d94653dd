use ratatui::prelude::*;

/// Braille dot bit for a position within a 2x4 cell:
/// (0,0)=0x01 (1,0)=0x08
/// (0,1)=0x02 (1,1)=0x10
/// (0,2)=0x04 (1,2)=0x20
/// (0,3)=0x40 (1,3)=0x80
const DOT_BITS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40],
    [0x08, 0x10, 0x20, 0x80],
];

/// A drawing surface with sub-character resolution. Each terminal cell holds
/// a 2x4 grid of braille dots and a single foreground color; the last color
/// written to a cell wins.
pub struct BrailleCanvas {
    char_w: usize,
    char_h: usize,
    cells: Vec<u8>,
    colors: Vec<Option<(u8, u8, u8)>>,
}

impl BrailleCanvas {
    pub fn new(char_w: usize, char_h: usize) -> Self {
        Self {
            char_w,
            char_h,
            cells: vec![0; char_w * char_h],
            colors: vec![None; char_w * char_h],
        }
    }

    /// Dot-grid dimensions: twice the character width, four times the height.
    pub fn grid_size(&self) -> (usize, usize) {
        (self.char_w * 2, self.char_h * 4)
    }

    /// Set a single dot, rounding from fractional grid coordinates.
    /// Out-of-bounds coordinates are ignored.
    pub fn dot(&mut self, x: f32, y: f32, color: (u8, u8, u8)) {
        self.plot(x.round() as isize, y.round() as isize, color);
    }

    fn plot(&mut self, gx: isize, gy: isize, color: (u8, u8, u8)) {
        let (grid_w, grid_h) = self.grid_size();
        if gx < 0 || gy < 0 || gx >= grid_w as isize || gy >= grid_h as isize {
            return;
        }
        let (gx, gy) = (gx as usize, gy as usize);
        let cell = (gy / 4) * self.char_w + gx / 2;
        self.cells[cell] |= DOT_BITS[gx % 2][gy % 4];
        self.colors[cell] = Some(color);
    }

    /// Draw a line between two fractional grid points (Bresenham).
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: (u8, u8, u8)) {
        let mut x0 = from.0.round() as isize;
        let mut y0 = from.1.round() as isize;
        let x1 = to.0.round() as isize;
        let y1 = to.1.round() as isize;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx: isize = if x0 < x1 { 1 } else { -1 };
        let sy: isize = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Draw a circle outline by walking its circumference one dot at a time.
    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, color: (u8, u8, u8)) {
        if radius <= 0.0 {
            return;
        }
        let steps = (radius * std::f32::consts::TAU).ceil().max(8.0) as usize;
        for i in 0..steps {
            let angle = i as f32 / steps as f32 * std::f32::consts::TAU;
            self.dot(cx + angle.cos() * radius, cy + angle.sin() * radius, color);
        }
    }

    /// Fill a small disc, used for bin points and reference markers.
    pub fn disc(&mut self, cx: f32, cy: f32, radius: f32, color: (u8, u8, u8)) {
        let r = radius.max(0.5);
        let span = r.ceil() as isize;
        let (icx, icy) = (cx.round() as isize, cy.round() as isize);
        for dy in -span..=span {
            for dx in -span..=span {
                if ((dx * dx + dy * dy) as f32) <= r * r {
                    self.plot(icx + dx, icy + dy, color);
                }
            }
        }
    }

    /// Encode the dot grid into braille characters and write them to the
    /// frame buffer. Empty cells are left untouched.
    pub fn flush(&self, frame: &mut Frame, area: Rect) {
        for cy in 0..self.char_h.min(area.height as usize) {
            for cx in 0..self.char_w.min(area.width as usize) {
                let idx = cy * self.char_w + cx;
                let bits = self.cells[idx];
                if bits == 0 {
                    continue;
                }
                let Some((r, g, b)) = self.colors[idx] else {
                    continue;
                };
                let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
                if let Some(cell) = frame
                    .buffer_mut()
                    .cell_mut((area.x + cx as u16, area.y + cy as u16))
                {
                    cell.set_char(ch);
                    cell.set_fg(Color::Rgb(r, g, b));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_2x4_per_cell() {
        let canvas = BrailleCanvas::new(10, 5);
        assert_eq!(canvas.grid_size(), (20, 20));
    }

    #[test]
    fn out_of_bounds_dots_are_ignored() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.dot(-3.0, 0.0, (255, 255, 255));
        canvas.dot(100.0, 100.0, (255, 255, 255));
        assert!(canvas.cells.iter().all(|&c| c == 0));
    }

    #[test]
    fn line_sets_endpoint_cells() {
        let mut canvas = BrailleCanvas::new(4, 4);
        canvas.line((0.0, 0.0), (7.0, 15.0), (0, 255, 255));
        // Start dot lands in cell (0,0), end dot in cell (3,3).
        assert_ne!(canvas.cells[0], 0);
        assert_ne!(canvas.cells[3 * 4 + 3], 0);
    }
}
