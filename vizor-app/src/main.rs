//! VIZOR - Terminal Spectrum Visualizer
//!
//! Live microphone input, analyzed in real time and drawn as a colored
//! bar-graph spectrum in the terminal.

mod config;

use std::fs;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vizor_audio::{capture, AnalysisPipeline, SharedSpectrum};
use vizor_input::{Command, Direction, InputHandler};
use vizor_tui::{App, HelpWidget, SpectrumWidget, StatusBarWidget};

use crate::config::Config;

/// Frame rate for UI updates
const FPS: u64 = 30;

// Adjustment steps for the directional commands.
const SMOOTHING_STEP: f64 = 0.05;
const CEILING_STEP: f64 = 250.0;
const PEAK_DECAY_STEP: f64 = 0.5;
const COLOR_RATE_STEP: f64 = 0.5;
const LINEAR_SCALE_STEP: f64 = 10.0;
const LOG_SCALE_STEP: f64 = 1.25;

fn main() -> anyhow::Result<()> {
    init_logging();
    info!("vizor starting");

    let config = Config::load();
    let state = Arc::new(SharedSpectrum::new(config.params));

    // Shutdown flag shared with the capture thread
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_capture = shutdown.clone();

    // Spawn the capture thread. Failures (no input device, stream errors)
    // come back over the channel and are fatal.
    let (err_tx, err_rx) = crossbeam_channel::bounded::<capture::CaptureError>(1);
    let pipeline = AnalysisPipeline::new(state.clone());
    let capture_handle = thread::spawn(move || {
        if let Err(err) = capture::run(pipeline, shutdown_capture) {
            let _ = err_tx.send(err);
        }
    });

    // Initialize terminal
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &state, &err_rx);

    // Cleanup
    shutdown.store(true, Ordering::SeqCst);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Wait for the capture thread to drain
    let _ = capture_handle.join();

    // Persist the final parameters. Best effort, don't fail on save error.
    let _ = Config {
        params: state.params(),
    }
    .save();

    info!("vizor stopped");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &Arc<SharedSpectrum>,
    errors: &Receiver<capture::CaptureError>,
) -> anyhow::Result<()> {
    let mut app = App::new();
    let input = InputHandler::new();

    let frame_duration = Duration::from_millis(1000 / FPS);
    let mut last_frame = Instant::now();

    app.set_message("VIZOR | Press ? for keys");

    loop {
        if app.should_quit {
            break;
        }

        // A capture failure is fatal: without an audio source there is
        // nothing to visualize.
        if let Ok(err) = errors.try_recv() {
            return Err(anyhow::Error::new(err).context("audio capture failed"));
        }

        // Gain control observes once per render frame.
        state.apply_auto_gain(&mut app.auto_gain);

        state.snapshot(&mut app.snapshot);
        app.advance_frame();

        terminal.draw(|frame| render_ui(frame, &app))?;

        // Handle input within the frame budget
        let timeout = frame_duration.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = input.handle_key(key) {
                    dispatch(command, state, &mut app);
                }
            }
        }

        // Maintain frame rate
        let elapsed = last_frame.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
        last_frame = Instant::now();
    }

    Ok(())
}

fn dispatch(command: Command, state: &Arc<SharedSpectrum>, app: &mut App) {
    match command {
        Command::AdjustSmoothing(dir) => {
            let p = state.update(|p| {
                let next = p.smoothing + SMOOTHING_STEP * dir.sign();
                p.set_smoothing(next);
            });
            app.set_message(format!("SMOOTH {:.2}", p.smoothing));
        }
        Command::CycleSmoothingMode => {
            let p = state.update(|p| p.mode = p.mode.cycle());
            app.set_message(format!("MODE {}", p.mode.display_name()));
        }
        Command::AdjustPeakDecay(dir) => {
            let p = state.update(|p| {
                let next = p.peak_decay + PEAK_DECAY_STEP * dir.sign();
                p.set_peak_decay(next);
            });
            app.set_message(format!("DECAY {:.1}", p.peak_decay));
        }
        Command::TogglePeaks => {
            let p = state.update(|p| p.peaks = !p.peaks);
            app.set_message(format!("PEAKS {}", on_off(p.peaks)));
        }
        Command::AdjustBars(dir) => {
            let p = state.update(|p| {
                let next = match dir {
                    Direction::Up => p.bars.saturating_add(1),
                    Direction::Down => p.bars.saturating_sub(1),
                };
                p.set_bars(next);
            });
            app.set_message(format!("BARS {}", p.bars));
        }
        Command::AdjustFreqCeiling(dir) => {
            let p = state.update(|p| {
                let next = p.freq_ceiling + CEILING_STEP * dir.sign();
                p.set_freq_ceiling(next);
            });
            app.set_message(format!("CEIL {:.0}Hz", p.freq_ceiling));
        }
        Command::AdjustLinearScale(dir) => {
            let p = state.update(|p| {
                let next = p.calibration.linear + LINEAR_SCALE_STEP * dir.sign();
                p.set_linear_scale(next);
            });
            app.set_message(format!("LIN {:.0}", p.calibration.linear));
        }
        Command::AdjustLogScale(dir) => {
            let p = state.update(|p| {
                let next = match dir {
                    Direction::Up => p.calibration.logarithmic * LOG_SCALE_STEP,
                    Direction::Down => p.calibration.logarithmic / LOG_SCALE_STEP,
                };
                p.set_log_scale(next);
            });
            app.set_message(format!("LOG {:.2e}", p.calibration.logarithmic));
        }
        Command::ToggleAutoGain => {
            let p = state.update(|p| p.auto_gain = !p.auto_gain);
            app.set_message(format!("AGC {}", on_off(p.auto_gain)));
        }
        Command::AdjustColorRate(dir) => {
            let p = state.update(|p| {
                let next = p.color_rate + COLOR_RATE_STEP * dir.sign();
                p.set_color_rate(next);
            });
            app.set_message(format!("COLOR {:.1}", p.color_rate));
        }
        Command::ToggleCurve => {
            let p = state.update(|p| p.curve = !p.curve);
            app.set_message(format!("CURVE {}", on_off(p.curve)));
        }
        Command::ToggleHelp => app.toggle_help(),
        Command::Quit => app.quit(),
    }
}

fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::vertical([
        Constraint::Min(4),    // Spectrum
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    let spectrum = SpectrumWidget::new(&app.snapshot, &app.gradient, app.color_phase);
    frame.render_widget(spectrum, chunks[0]);

    let status = StatusBarWidget::new(&app.snapshot.params).message(app.message.as_deref());
    frame.render_widget(status, chunks[1]);

    if app.show_help {
        let help_area = centered_rect(42, 15, area);
        frame.render_widget(HelpWidget, help_area);
    }
}

/// Create a centered rectangle
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

/// Log to a file under the user data directory; the terminal itself
/// belongs to the UI. Best effort - logging never blocks startup.
fn init_logging() {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vizor");
    if fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let Ok(file) = fs::File::create(log_dir.join("vizor.log")) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
