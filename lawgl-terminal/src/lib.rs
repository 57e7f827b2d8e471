//! Terminal frontend: ASCII rasterizer with keyboard sliders
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, ClearType},
};
use lawgl_core::{FrameDriver, FrameScheduler, MatrixPanel, ParamKey, ParamValue, Scene};
use log::{debug, info, warn};
use std::io::{self, stdout, Write};
use std::time::Duration;

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Columns reserved on the right for controls and matrices
const PANEL_WIDTH: u16 = 34;

/// Rows taken by the status line
const HEADER_ROWS: u16 = 1;

/// Frame scheduler driven by the main loop: a requested frame runs on the
/// next loop tick unless it is cancelled first
#[derive(Debug, Default)]
pub struct TickScheduler {
    issued: u64,
    pending: Option<u64>,
}

impl TickScheduler {
    /// Take the frame due on this tick, if any
    pub fn take_due(&mut self) -> Option<u64> {
        self.pending.take()
    }
}

impl FrameScheduler for TickScheduler {
    type Handle = u64;

    fn request_frame(&mut self) -> u64 {
        self.issued += 1;
        self.pending = Some(self.issued);
        self.issued
    }

    fn cancel_frame(&mut self, handle: u64) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Print the scene's control values and matrices without touching the
/// terminal mode
pub fn dump<W: Write>(scene: &dyn Scene, out: &mut W) -> io::Result<()> {
    writeln!(out, "scene: {}", scene.name())?;
    for control in scene.controls() {
        if let Some(value) = scene.value(control.key) {
            writeln!(out, "{:<18} {}", control.label, value)?;
        }
    }
    let panels = scene.frame().panels;
    if !panels.is_empty() {
        writeln!(out, "{MATRIX_LAYOUT}")?;
    }
    for panel in panels {
        writeln!(out)?;
        write!(out, "{panel}")?;
    }
    Ok(())
}

const MATRIX_LAYOUT: &str = "matrices act on column vectors, translation in the last column";

/// Viewport size for a terminal of `cols x rows`: square in screen space,
/// assuming cells twice as tall as wide
fn viewport(cols: u16, rows: u16) -> (usize, usize) {
    let height = rows.saturating_sub(HEADER_ROWS).max(1);
    let width = cols.saturating_sub(PANEL_WIDTH).min(height.saturating_mul(2)).max(1);
    (width as usize, height as usize)
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    scene: Box<dyn Scene>,
    driver: FrameDriver<TickScheduler>,
    renderer: AsciiRenderer,
    panels: Vec<MatrixPanel>,
    selected: usize,
    running: bool,
    frame_interval: Duration,
}

impl TerminalApp {
    pub fn new(scene: Box<dyn Scene>, fps: u32) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let (width, height) = viewport(cols, rows);
        let renderer =
            AsciiRenderer::new(width, height, scene.mesh().clone(), scene.depth_test());

        Ok(Self {
            scene,
            driver: FrameDriver::new(TickScheduler::default()),
            renderer,
            panels: Vec::new(),
            selected: 0,
            running: true,
            frame_interval: Duration::from_millis(1000 / u64::from(fps.max(1))),
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        let stats = self.driver.stats();
        info!(
            "{} redraws for {} change notifications ({} coalesced)",
            stats.redraws, stats.requests, stats.cancelled
        );
        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.driver.start();

        while self.running {
            // Drain every queued event before the frame tick so that a burst
            // of key repeats produces one redraw
            if event::poll(self.frame_interval)? {
                self.handle_event(event::read()?);
                while event::poll(Duration::ZERO)? {
                    self.handle_event(event::read()?);
                }
            }

            if self.driver.scheduler_mut().take_due().is_some() {
                if let Some(frame) = self.driver.on_frame(self.scene.as_ref(), &mut self.renderer) {
                    self.panels = frame.panels;
                }
                self.draw()?;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(cols, rows) => {
                let (width, height) = viewport(cols, rows);
                debug!("resize to {cols}x{rows}, viewport {width}x{height}");
                self.renderer.resize(width, height);
                self.driver.notify_change();
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        let count = self.scene.controls().len();

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab if count > 0 => {
                self.selected = (self.selected + count - 1) % count;
                self.driver.notify_change();
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab if count > 0 => {
                self.selected = (self.selected + 1) % count;
                self.driver.notify_change();
            }
            KeyCode::Left | KeyCode::Char('h') => self.nudge(-1),
            KeyCode::Right | KeyCode::Char('l') => self.nudge(1),
            KeyCode::PageDown => self.nudge(-10),
            KeyCode::PageUp => self.nudge(10),
            KeyCode::Char(' ') => self.nudge(1),
            KeyCode::Char('0') => self.reset_selected(),
            _ => {}
        }
    }

    fn nudge(&mut self, steps: i32) {
        let Some(control) = self.scene.controls().get(self.selected).copied() else {
            return;
        };
        let Some(current) = self.scene.value(control.key) else {
            return;
        };
        self.update(control.key, control.nudge(current, steps));
    }

    fn reset_selected(&mut self) {
        if let Some(control) = self.scene.controls().get(self.selected).copied() {
            self.update(control.key, control.default);
        }
    }

    fn update(&mut self, key: ParamKey, value: ParamValue) {
        match self.scene.set(key, value) {
            Ok(()) => self.driver.notify_change(),
            Err(err) => warn!("ignoring input: {err}"),
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, terminal::Clear(ClearType::All))?;

        self.renderer.draw(&mut stdout, 0, HEADER_ROWS)?;
        self.draw_panel(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "LAWGL {} | Up/Down=Select Left/Right=Adjust PgUp/PgDn=x10 0=Reset Q=Quit",
                self.scene.name()
            )),
            ResetColor
        )?;

        stdout.flush()
    }

    fn draw_panel<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let left = self.renderer.width() as u16 + 2;
        let mut row = HEADER_ROWS;

        for (i, control) in self.scene.controls().iter().enumerate() {
            let value = self
                .scene
                .value(control.key)
                .map(|v| v.to_string())
                .unwrap_or_default();
            let marker = if i == self.selected { '>' } else { ' ' };
            queue!(out, cursor::MoveTo(left, row))?;
            if i == self.selected {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            queue!(
                out,
                Print(format!("{marker} {:<18}{:>8}", control.label, value)),
                SetAttribute(Attribute::Reset)
            )?;
            row += 1;
        }

        for panel in &self.panels {
            row += 1;
            queue!(
                out,
                cursor::MoveTo(left, row),
                SetForegroundColor(Color::Cyan),
                Print(panel.title),
                ResetColor
            )?;
            row += 1;
            for line in panel.lines() {
                queue!(out, cursor::MoveTo(left, row), Print(line))?;
                row += 1;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawgl_core::{FlatScene, SceneKind};

    #[test]
    fn test_tick_scheduler_cancel() {
        let mut scheduler = TickScheduler::default();
        let first = scheduler.request_frame();
        scheduler.cancel_frame(first);
        assert_eq!(scheduler.take_due(), None);

        let second = scheduler.request_frame();
        assert_ne!(first, second);
        assert_eq!(scheduler.take_due(), Some(second));
        assert_eq!(scheduler.take_due(), None);
    }

    #[test]
    fn test_driver_over_ticks() {
        let mut driver = FrameDriver::new(TickScheduler::default());
        let mut scene = FlatScene::new();
        let mut renderer = AsciiRenderer::new(20, 10, scene.mesh().clone(), false);

        driver.start();
        for step in 1..=4 {
            scene
                .set(ParamKey::Rotate, ParamValue::Scalar(step as f32 * 0.01))
                .unwrap();
            driver.notify_change();
        }

        let mut redraws = 0;
        for _ in 0..3 {
            if driver.scheduler_mut().take_due().is_some() {
                driver.on_frame(&scene, &mut renderer);
                redraws += 1;
            }
        }
        assert_eq!(redraws, 1);
        assert_eq!(driver.stats().cancelled, 4);
    }

    #[test]
    fn test_viewport_is_square() {
        assert_eq!(viewport(200, 41), (80, 40));
        assert_eq!(viewport(60, 41), (26, 40));
        assert_eq!(viewport(10, 1), (1, 1));
        assert_eq!(viewport(u16::MAX, u16::MAX), (65501, 65534));
    }

    #[test]
    fn test_dump_lists_controls_and_matrices() {
        let scene = SceneKind::Flat.build();
        let mut out = Vec::new();
        dump(scene.as_ref(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("scene: flat\n"));
        assert!(text.contains("Translate X"));
        assert!(text.contains("Translation\n"));
        assert!(text.contains("Result\n"));
        assert!(text.contains(MATRIX_LAYOUT));
    }

    #[test]
    fn test_dump_basic_has_no_layout_note() {
        let scene = SceneKind::Basic.build();
        let mut out = Vec::new();
        dump(scene.as_ref(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains(MATRIX_LAYOUT));
    }
}
