use crate::error::AppError;
use crate::graphics::{cell_center, Canvas, Cell, CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::math::Point2;
use crate::params::{MechanismParameters, Parameter};
use crate::scene::Scene;
use crate::state::SimulationState;
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    style::Color,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

/// Rows reserved at the bottom for the help line and parameter panel
pub const PANEL_ROWS: usize = 1 + Parameter::ALL.len();
const SLIDER_WIDTH: usize = 12;
const HELP: &str =
    " q quit  p pause  d debug  r reset  +/- zoom  up/down select  left/right adjust  drag pan";

/// What the frame loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Terminal size in cells, from termsize with a crossterm fallback
pub fn terminal_size() -> (u16, u16) {
    termsize::get()
        .map(|size| (size.cols, size.rows))
        .or_else(|| terminal::size().ok())
        .filter(|&(cols, rows)| cols > 0 && rows > 0)
        .unwrap_or((80, 24))
}

/// Places the pivot horizontally centered, one crank radius below the top rows
pub fn initial_center(cols: u16, params: &MechanismParameters, zoom: f64) -> Point2 {
    let params = params.clamped();
    let zoom = zoom.clamp(crate::viewport::MIN_ZOOM, crate::viewport::MAX_ZOOM);
    Point2::new(
        cols as f64 * CELL_WIDTH_PX / 2.0,
        2.0 * CELL_HEIGHT_PX + params.crank_radius * zoom,
    )
}

/// Raw mode, alternate screen and mouse capture for the lifetime of the value
struct TerminalSession {
    out: Stdout,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(TerminalSession { out })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Slider-crank view with the parameter panel
pub struct MechanismWidget {
    canvas: Canvas,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
    frames: u64,
}

impl MechanismWidget {
    pub fn new(cols: u16, rows: u16) -> Self {
        MechanismWidget {
            canvas: Canvas::new(cols as usize, rows as usize),
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
            frames: 0,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Frames painted so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Handle events for the mechanism widget
    pub fn event(&mut self, event: &Event, data: &mut SimulationState) -> Control {
        match event {
            Event::Key(key_event) => self.key(key_event, data),
            Event::Mouse(mouse_event) => {
                self.mouse(mouse_event, data);
                Control::Continue
            }
            Event::Resize(cols, rows) => {
                tracing::debug!(cols, rows, "terminal resized");
                self.canvas.resize(*cols as usize, *rows as usize);
                Control::Continue
            }
            _ => Control::Continue,
        }
    }

    fn key(&mut self, key_event: &KeyEvent, data: &mut SimulationState) -> Control {
        if key_event.kind != KeyEventKind::Press {
            return Control::Continue;
        }
        match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                return Control::Quit;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Control::Quit,
            KeyCode::Char('d') | KeyCode::Char('D') => data.debug = !data.debug,
            KeyCode::Char('p') | KeyCode::Char('P') => data.toggle_pause(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if !data.paused {
                    data.reset();
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                if !data.paused {
                    data.viewport.apply_zoom_delta(1.0);
                }
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                if !data.paused {
                    data.viewport.apply_zoom_delta(-1.0);
                }
            }
            KeyCode::Up => data.selected = data.selected.previous(),
            KeyCode::Down => data.selected = data.selected.next(),
            KeyCode::Left => data.adjust_selected(-1),
            KeyCode::Right => data.adjust_selected(1),
            _ => {}
        }
        Control::Continue
    }

    fn mouse(&mut self, mouse_event: &MouseEvent, data: &mut SimulationState) {
        if data.paused {
            return;
        }
        let pointer = cell_center(mouse_event.column, mouse_event.row);
        match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => data.viewport.begin_drag(pointer),
            MouseEventKind::Drag(MouseButton::Left) => data.viewport.continue_drag(pointer),
            MouseEventKind::Up(MouseButton::Left) => data.viewport.end_drag(),
            MouseEventKind::ScrollUp => data.viewport.apply_zoom_delta(1.0),
            MouseEventKind::ScrollDown => data.viewport.apply_zoom_delta(-1.0),
            _ => {}
        }
    }

    /// Paint the mechanism, readouts and panel into the canvas
    pub fn paint(&mut self, data: &SimulationState) {
        // Update FPS calculation
        self.frames += 1;
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        self.canvas.clear();
        let snapshot = data.snapshot();
        let scene = Scene::compose(&snapshot);
        scene.draw(&mut self.canvas);

        for (row, readout) in scene.readouts.iter().enumerate() {
            self.canvas.draw_text(1, row + 1, &readout.text(), Color::White);
        }

        self.paint_panel(data);

        if data.debug {
            self.paint_debug(data);
        }

        if data.paused {
            self.paint_paused();
        }
    }

    fn paint_panel(&mut self, data: &SimulationState) {
        let height = self.canvas.height();
        if height < PANEL_ROWS {
            return;
        }
        let top = height - PANEL_ROWS;
        let rule: String = HELP
            .chars()
            .chain(std::iter::repeat(' '))
            .take(self.canvas.width())
            .collect();
        self.canvas.draw_text(0, top, &rule, Color::DarkGrey);

        for (i, parameter) in Parameter::ALL.into_iter().enumerate() {
            let selected = parameter == data.selected;
            let line = format!(
                "{} {:<22}{} {:.2} {}",
                if selected { '>' } else { ' ' },
                parameter.label(),
                slider_bar(parameter, &data.params),
                parameter.get(&data.params),
                parameter.unit(),
            );
            let color = if selected { Color::Yellow } else { Color::Grey };
            self.canvas.draw_text(0, top + 1 + i, &line, color);
        }
    }

    fn paint_debug(&mut self, data: &SimulationState) {
        let center = data.viewport.center();
        let lines = [
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("Theta: {:.2} rad", data.theta()),
            format!("Center: ({:.0}, {:.0})", center.x, center.y),
            format!("Zoom: {:.2}", data.viewport.zoom()),
            format!("FPS: {:.2}", self.fps),
            format!(
                "Drag: {}",
                if data.viewport.is_dragging() { "active" } else { "idle" }
            ),
            format!("Sim time: {:.2} s", data.clock.elapsed()),
        ];
        let width = self.canvas.width();
        for (row, line) in lines.iter().enumerate() {
            let len = line.chars().count();
            let x = width.saturating_sub(len + 1);
            self.canvas.draw_text(x, row + 1, line, Color::Cyan);
        }
    }

    fn paint_paused(&mut self) {
        // Dim everything underneath
        for y in 0..self.canvas.height() {
            for x in 0..self.canvas.width() {
                if let Some(cell) = self.canvas.get(x, y) {
                    self.canvas
                        .set(x as isize, y as isize, Cell::new(cell.ch, Color::DarkGrey));
                }
            }
        }
        let text = "Paused";
        let x = (self.canvas.width().saturating_sub(text.len())) / 2;
        let y = self.canvas.height().saturating_sub(PANEL_ROWS) / 2;
        self.canvas.draw_text(x, y, text, Color::White);
    }
}

/// `[#####-------]` position of a parameter within its range
fn slider_bar(parameter: Parameter, params: &MechanismParameters) -> String {
    let (min, max) = parameter.range();
    let fraction = ((parameter.get(params) - min) / (max - min)).clamp(0.0, 1.0);
    let filled = if fraction.is_finite() {
        (fraction * SLIDER_WIDTH as f64).round() as usize
    } else {
        0
    };
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(SLIDER_WIDTH - filled)
    )
}

/// Runs the frame loop until the user quits. Returns the number of frames drawn.
pub fn run(data: &mut SimulationState, fps: u32) -> Result<u64, AppError> {
    let (cols, rows) = terminal_size();
    let mut session = TerminalSession::enter()?;
    let mut widget = MechanismWidget::new(cols, rows);
    let frame = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    let mut last = Instant::now();

    loop {
        let deadline = last + frame;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            if widget.event(&event::read()?, data) == Control::Quit {
                return Ok(widget.frames());
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;

        data.tick(dt);
        widget.paint(data);
        widget.canvas.render(&mut session.out)?;
        session.out.flush()?;
    }
}
