//! Terminal host for the spinning shape viewer
//!
//! Translates crossterm key, mouse and resize events into [`Input`], drives
//! [`Viewer::tick`] at a fixed target rate and rasterizes each frame's draw
//! list as ASCII.

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use spin3d_core::{Input, ShapeKind, Spin3dError, Viewer, ViewerConfig};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use thiserror::Error;

pub mod console;
pub mod renderer;

pub use console::{parse_command, ConsoleError};
pub use renderer::AsciiRenderer;

/// Rotation step for the nudge keys, in radians
const NUDGE_STEP: f32 = 0.1;
/// Wheel delta reported per scroll notch
const SCROLL_DELTA: f32 = 100.0;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Viewer(#[from] Spin3dError),
}

/// What a key press does outside the prompt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    Quit,
    OpenPrompt,
    Send(Input),
}

/// Map a key to its action. Unbound keys yield `None`.
pub fn key_action(code: KeyCode) -> Option<KeyAction> {
    let input = match code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(KeyAction::Quit),
        KeyCode::Char(':') => return Some(KeyAction::OpenPrompt),
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            Input::SelectShape(ShapeKind::ALL[index])
        }
        KeyCode::Char('m') => Input::ToggleMode,
        KeyCode::Char('g') => Input::ToggleGlow,
        KeyCode::Char('+') | KeyCode::Char('=') => Input::AdjustSpeed(10.0),
        KeyCode::Char('-') => Input::AdjustSpeed(-10.0),
        KeyCode::Char(']') => Input::AdjustSize(0.1),
        KeyCode::Char('[') => Input::AdjustSize(-0.1),
        KeyCode::Char('h') => Input::AdjustHue(30.0),
        KeyCode::Char('0') => Input::ResetView,
        KeyCode::Char('w') | KeyCode::Up => nudge(NUDGE_STEP, 0.0, 0.0),
        KeyCode::Char('s') | KeyCode::Down => nudge(-NUDGE_STEP, 0.0, 0.0),
        KeyCode::Char('a') | KeyCode::Left => nudge(0.0, -NUDGE_STEP, 0.0),
        KeyCode::Char('d') | KeyCode::Right => nudge(0.0, NUDGE_STEP, 0.0),
        KeyCode::Char('e') => nudge(0.0, 0.0, NUDGE_STEP),
        KeyCode::Char('r') => nudge(0.0, 0.0, -NUDGE_STEP),
        _ => return None,
    };
    Some(KeyAction::Send(input))
}

fn nudge(dx: f32, dy: f32, dz: f32) -> Input {
    Input::Nudge { dx, dy, dz }
}

/// Map a mouse event to pointer input in viewport units (two per row)
pub fn mouse_input(mouse: &MouseEvent) -> Option<Input> {
    let x = mouse.column as f32 + 0.5;
    let y = (mouse.row as f32 + 0.5) * 2.0;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Input::PointerDown { x, y }),
        MouseEventKind::Drag(MouseButton::Left) => Some(Input::PointerMove { x, y }),
        MouseEventKind::Up(MouseButton::Left) => Some(Input::PointerUp),
        MouseEventKind::ScrollUp => Some(Input::Wheel {
            delta: -SCROLL_DELTA,
        }),
        MouseEventKind::ScrollDown => Some(Input::Wheel {
            delta: SCROLL_DELTA,
        }),
        _ => None,
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    viewer: Viewer,
    renderer: AsciiRenderer,
    running: bool,
    started: Instant,
    target_frame_time: Duration,
    fps: u32,
    mode_label: String,
    prompt: Option<String>,
    message: Option<String>,
}

impl TerminalApp {
    pub fn new(config: ViewerConfig) -> Result<Self, AppError> {
        let (width, height) = terminal::size()?;
        let viewer = Viewer::new(config)?;

        Ok(Self {
            mode_label: viewer.mode_label(),
            viewer,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            started: Instant::now(),
            target_frame_time: Duration::from_millis(1000 / 30),
            fps: 0,
            prompt: None,
            message: None,
        })
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        tracing::info!(
            cols = self.renderer.width(),
            rows = self.renderer.height(),
            "terminal viewer started"
        );
        let result = self.main_loop();
        tracing::info!("terminal viewer stopped");

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }
            if !self.running {
                break;
            }

            let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
            let frame = self.viewer.tick(now_ms, self.renderer.viewport());
            if let Some(fps) = frame.fps {
                self.fps = fps;
            }
            self.mode_label = frame.mode_label;
            self.renderer.render(&frame.draw_list);
            self.present()?;

            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                if let Some(input) = mouse_input(&mouse) {
                    self.send(input);
                }
            }
            Event::Resize(width, height) => {
                tracing::debug!(width, height, "terminal resized");
                self.renderer.resize(width as usize, height as usize);
            }
            Event::FocusLost => self.send(Input::PointerLeave),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        // Raw mode swallows SIGINT
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        if let Some(line) = self.prompt.as_mut() {
            match key.code {
                KeyCode::Char(c) => line.push(c),
                KeyCode::Backspace => {
                    line.pop();
                }
                KeyCode::Esc => self.prompt = None,
                KeyCode::Enter => {
                    let line = self.prompt.take().unwrap_or_default();
                    self.submit(&line);
                }
                _ => {}
            }
            return;
        }

        match key_action(key.code) {
            Some(KeyAction::Quit) => self.running = false,
            Some(KeyAction::OpenPrompt) => {
                self.message = None;
                self.prompt = Some(String::new());
            }
            Some(KeyAction::Send(input)) => self.send(input),
            None => {}
        }
    }

    fn submit(&mut self, line: &str) {
        match parse_command(line) {
            Ok(input) => self.send(input),
            Err(ConsoleError::Empty) => {}
            Err(err) => {
                tracing::warn!("{err}");
                self.message = Some(err.to_string());
            }
        }
    }

    fn send(&mut self, input: Input) {
        if let Err(err) = self.viewer.push_input(input) {
            self.message = Some(err.to_string());
        }
    }

    fn status_line(&self) -> String {
        let state = self.viewer.state();
        format!(
            "Spin3D | FPS: {} | {} | speed {:.0} size {:.1} hue {:.0}{} | 1-5 shape M mode G glow +/- speed [/] size H hue : cmd Q quit",
            self.fps,
            self.mode_label,
            state.speed,
            state.size,
            state.hue,
            if state.glow { " glow" } else { "" },
        )
    }

    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // UI overlay
        let width = self.renderer.width();
        let status: String = self.status_line().chars().take(width).collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        let bottom = self.renderer.height().saturating_sub(1) as u16;
        let footer = match (&self.prompt, &self.message) {
            (Some(line), _) => Some((Color::White, format!(":{line}"))),
            (None, Some(message)) => Some((Color::Red, message.clone())),
            (None, None) => None,
        };
        if let Some((color, text)) = footer {
            let text: String = text.chars().take(width).collect();
            queue!(
                stdout,
                cursor::MoveTo(0, bottom),
                terminal::Clear(ClearType::CurrentLine),
                SetForegroundColor(color),
                Print(text),
                ResetColor
            )?;
        }

        stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_number_keys_select_shapes_in_order() {
        for (i, kind) in ShapeKind::ALL.iter().enumerate() {
            let key = char::from_digit(i as u32 + 1, 10).unwrap();
            assert_eq!(
                key_action(KeyCode::Char(key)),
                Some(KeyAction::Send(Input::SelectShape(*kind)))
            );
        }
        assert_eq!(key_action(KeyCode::Char('6')), None);
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(key_action(KeyCode::Esc), Some(KeyAction::Quit));
        assert_eq!(key_action(KeyCode::Char(':')), Some(KeyAction::OpenPrompt));
        assert_eq!(
            key_action(KeyCode::Char('m')),
            Some(KeyAction::Send(Input::ToggleMode))
        );
        assert_eq!(
            key_action(KeyCode::Left),
            Some(KeyAction::Send(Input::Nudge {
                dx: 0.0,
                dy: -NUDGE_STEP,
                dz: 0.0
            }))
        );
    }

    #[test]
    fn test_mouse_maps_to_viewport_units() {
        assert_eq!(
            mouse_input(&mouse(MouseEventKind::Down(MouseButton::Left), 10, 4)),
            Some(Input::PointerDown { x: 10.5, y: 9.0 })
        );
        assert_eq!(
            mouse_input(&mouse(MouseEventKind::Drag(MouseButton::Left), 0, 0)),
            Some(Input::PointerMove { x: 0.5, y: 1.0 })
        );
        assert_eq!(
            mouse_input(&mouse(MouseEventKind::ScrollUp, 0, 0)),
            Some(Input::Wheel {
                delta: -SCROLL_DELTA
            })
        );
        assert_eq!(
            mouse_input(&mouse(MouseEventKind::Moved, 3, 3)),
            None
        );
    }
}
