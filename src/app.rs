use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use segregation_core::{PopulationCounts, RunSummary, SimConfig, Simulation};
use segregation_io::{write_frames, FrameRecorder};
use segregation_tui::{GridWidget, Tui};

pub struct App {
    pub running: bool,
    pub paused: bool,
    pub sim: Simulation,
    pub frame_interval: Duration,
}

/// Outcome of a headless run, printed for scripts.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessReport {
    pub fingerprint: String,
    pub summary: RunSummary,
    pub counts: PopulationCounts,
    pub unhappy: usize,
    pub frames_written: Option<usize>,
}

impl App {
    pub fn new(config: SimConfig) -> Result<Self> {
        let sim = Simulation::new(config).context("creating simulation")?;
        Ok(Self {
            running: true,
            paused: false,
            sim,
            frame_interval: Duration::from_millis(200),
        })
    }

    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        // tokio intervals reject a zero period
        self.frame_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Advances one step unless paused, converged, or out of budget.
    pub fn tick(&mut self) {
        if self.paused || self.is_finished() {
            return;
        }
        self.sim.step();
    }

    pub fn is_finished(&self) -> bool {
        self.sim.is_converged() || self.sim.steps() >= self.sim.config().run.max_steps
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('s') if self.paused && !self.is_finished() => {
                self.sim.step();
            }
            KeyCode::Char('r') => {
                self.sim.reset()?;
                tracing::info!("Simulation restarted");
            }
            _ => {}
        }
        Ok(())
    }

    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut interval = tokio::time::interval(self.frame_interval);

        while self.running {
            let snapshot = self.sim.snapshot();
            let paused = self.paused;
            tui.terminal.draw(|f| {
                f.render_widget(GridWidget::new(&snapshot).paused(paused), f.area());
            })?;

            interval.tick().await;

            while event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code)?;
                    }
                }
            }

            self.tick();
        }
        Ok(())
    }

    /// Runs to convergence or the step budget, optionally exporting frames.
    pub fn run_headless(&mut self, export: Option<&Path>, stride: u64) -> Result<HeadlessReport> {
        let max_steps = self.sim.config().run.max_steps;

        let (summary, frames_written) = match export {
            Some(path) => {
                let mut recorder =
                    FrameRecorder::new(self.sim.config().clone()).with_stride(stride);
                recorder.record(self.sim.snapshot());
                let summary = self
                    .sim
                    .run_with(max_steps, |sim| recorder.record(sim.snapshot()));
                recorder.record_final(self.sim.snapshot());
                let count = recorder.len();
                write_frames(&recorder.finish(), path)
                    .with_context(|| format!("exporting frames to {}", path.display()))?;
                (summary, Some(count))
            }
            None => (self.sim.run(max_steps), None),
        };

        Ok(HeadlessReport {
            fingerprint: self.sim.config().fingerprint(),
            summary,
            counts: self.sim.grid().counts(),
            unhappy: self.sim.last_report().map_or(0, |r| r.unhappy),
            frames_written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(threshold: f64) -> App {
        let mut config = SimConfig::new(10, 0.2, threshold).with_seed(21);
        config.run.max_steps = 5;
        App::new(config).unwrap()
    }

    #[test]
    fn test_pause_blocks_ticks() {
        let mut app = app(0.6);
        app.handle_key(KeyCode::Char(' ')).unwrap();
        app.tick();
        assert_eq!(app.sim.steps(), 0);
        app.handle_key(KeyCode::Char('s')).unwrap();
        assert_eq!(app.sim.steps(), 1);
    }

    #[test]
    fn test_tick_respects_budget() {
        let mut app = app(0.9);
        for _ in 0..20 {
            app.tick();
        }
        assert!(app.sim.steps() <= 5);
        assert!(app.is_finished());
    }

    #[test]
    fn test_quit_and_restart() {
        let mut app = app(0.6);
        app.tick();
        app.handle_key(KeyCode::Char('r')).unwrap();
        assert_eq!(app.sim.steps(), 0);
        app.handle_key(KeyCode::Char('q')).unwrap();
        assert!(!app.running);
    }

    #[test]
    fn test_headless_zero_threshold() {
        let mut app = app(0.0);
        let report = app.run_headless(None, 1).unwrap();
        assert_eq!(report.summary.steps, 1);
        assert!(report.summary.converged);
        assert_eq!(report.unhappy, 0);
        assert_eq!(report.frames_written, None);
    }
}
