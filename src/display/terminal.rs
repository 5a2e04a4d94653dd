use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::time::Duration;

use crate::audio;
use crate::config::Config;
use crate::visualizer::SpectrumWheel;

pub async fn run(config: Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Config,
) -> Result<()> {
    // Wire the analysis node into the capture pipeline. The capture handle
    // must outlive the loop or the stream closes.
    let (_capture, analyser) = audio::create_pipeline(&config.audio)?;

    let mut wheel = SpectrumWheel::new(
        Box::new(analyser),
        config.wheel.clone(),
        config.markers.clone(),
    );

    let target_frame = Duration::from_secs_f64(1.0 / config.wheel.fps as f64);

    while wheel.is_running() {
        // A stop requested last frame takes effect here, before drawing.
        if !wheel.tick() {
            break;
        }

        terminal.draw(|frame| {
            let area = frame.area();

            // Clear with transparent/reset background for terminal transparency support
            let block = ratatui::widgets::Block::default().style(Style::default().bg(Color::Reset));
            frame.render_widget(block, area);

            wheel.render(frame, area);
            render_status(frame, area, &wheel);
        })?;

        // Frame pacing doubles as the input poll timeout
        if event::poll(target_frame)? {
            if let Event::Key(key) = event::read()? {
                match key {
                    KeyEvent {
                        code: KeyCode::Char('q'),
                        ..
                    }
                    | KeyEvent {
                        code: KeyCode::Char('c'),
                        modifiers: KeyModifiers::CONTROL,
                        ..
                    } => {
                        wheel.stop();
                    }
                    KeyEvent {
                        code: KeyCode::Char('c'),
                        modifiers: KeyModifiers::NONE,
                        ..
                    } => {
                        wheel.next_scheme();
                    }
                    KeyEvent {
                        code: KeyCode::Char('g'),
                        ..
                    } => {
                        wheel.toggle_grid();
                    }
                    KeyEvent {
                        code: KeyCode::Char('l'),
                        ..
                    } => {
                        wheel.toggle_labels();
                    }
                    KeyEvent {
                        code: KeyCode::Char('m'),
                        ..
                    } => {
                        wheel.toggle_markers();
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

fn render_status(frame: &mut Frame, area: Rect, wheel: &SpectrumWheel) {
    let status = format!(
        " [c]olor: {} | [g]rid [l]abels [m]arkers | [q]uit ",
        wheel.scheme().name()
    );

    for (i, ch) in status.chars().enumerate() {
        if i < area.width as usize {
            if let Some(cell) = frame.buffer_mut().cell_mut((area.x + i as u16, area.y)) {
                cell.set_char(ch);
                cell.set_fg(Color::DarkGray);
            }
        }
    }
}
