//! The frame loop.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use glyphfall_effects::{Effect, EffectStatus};
use glyphfall_engine::Terminal;
use ratatui::{DefaultTerminal, Frame};
use tracing::{debug, info};

/// Upper bound on frames computed when skipping to the end.
const SKIP_FRAME_LIMIT: usize = 100_000;

/// Drives one effect and draws every frame it produces.
pub struct App {
    /// Is the application running?
    running: bool,
    effect: Box<dyn Effect>,
    terminal: Terminal,
    frame_time: Duration,
    frames: usize,
}

impl App {
    pub fn new(effect: Box<dyn Effect>, terminal: Terminal, fps: u32) -> Self {
        Self {
            running: false,
            effect,
            terminal,
            frame_time: Duration::from_secs(1) / fps.max(1),
            frames: 0,
        }
    }

    /// Run the main loop until the effect completes or the user quits.
    pub fn run(mut self, mut tui: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let started = Instant::now();
        while self.running {
            let frame_start = Instant::now();
            let status = self.effect.step(&mut self.terminal)?;
            self.frames += 1;
            tui.draw(|frame| self.render(frame))?;
            if status == EffectStatus::Complete {
                break;
            }
            self.handle_crossterm_events(self.frame_time.saturating_sub(frame_start.elapsed()))?;
        }
        info!(frames = self.frames, elapsed = ?started.elapsed(), "finished");
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        frame.render_widget(&self.terminal, frame.area());
    }

    /// Wait up to `timeout` for input, handling at most one event.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key)?,
                Event::Mouse(_) => {}
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        Ok(())
    }

    fn on_key_event(&mut self, key: KeyEvent) -> color_eyre::Result<()> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('s')) => self.skip()?,
            _ => {}
        }
        Ok(())
    }

    /// Run the effect to completion without drawing the frames in between.
    fn skip(&mut self) -> color_eyre::Result<()> {
        let mut skipped = 0;
        while skipped < SKIP_FRAME_LIMIT
            && self.effect.step(&mut self.terminal)? == EffectStatus::Running
        {
            skipped += 1;
        }
        debug!(skipped, "skipped to final frame");
        Ok(())
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
