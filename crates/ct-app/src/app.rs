use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;

use ct_color::palette::Palette;
use ct_core::config::GridConfig;
use ct_core::record::CourseRecord;
use ct_export::host::PngHost;
use ct_export::painter::ImageExporter;
use ct_layout::layout::{GridLayout, GridPresenter, compute_layout};
use ct_render::canvas::GridCanvas;
use ct_render::ui::{self, ViewState};

/// Période de poll des événements terminal et du worker d'export.
const TICK: Duration = Duration::from_millis(100);

/// Résultat renvoyé par le worker d'export.
type ExportResult = Result<PathBuf, String>;

/// Main application struct holding all state.
pub struct App {
    /// Schedule entries, loaded once per run.
    records: Vec<CourseRecord>,
    /// Palette de la passe couleur.
    palette: Palette,
    /// Configuration résolue.
    config: GridConfig,
    /// Semaine sélectionnée.
    week: u16,
    /// Seed courant ; `r` l'incrémente.
    seed: u64,
    /// Layout result recomputed on every trigger.
    layout: GridLayout,
    /// Interactive presenter strategy.
    canvas: GridCanvas,
    /// Export pending on the worker. At most one at a time.
    pending_export: Option<flume::Receiver<ExportResult>>,
    /// Transient status line.
    message: Option<String>,
    /// Fermeture demandée.
    quitting: bool,
}

impl App {
    #[must_use]
    pub fn new(
        records: Vec<CourseRecord>,
        palette: Palette,
        config: GridConfig,
        week: u16,
        seed: u64,
    ) -> Self {
        let layout = compute_layout(&records, &palette, &config, week, seed);
        Self {
            records,
            palette,
            config,
            week,
            seed,
            layout,
            canvas: GridCanvas::new(Rect::ZERO),
            pending_export: None,
            message: None,
            quitting: false,
        }
    }

    /// Recompute the layout from scratch; nothing survives a trigger.
    fn recompute(&mut self) {
        self.layout = compute_layout(
            &self.records,
            &self.palette,
            &self.config,
            self.week,
            self.seed,
        );
    }

    /// Main event loop.
    ///
    /// # Errors
    /// Returns an error if terminal operations fail.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        loop {
            if self.quitting {
                break;
            }
            self.poll_export();

            terminal.draw(|frame| {
                let area = frame.area();
                let grid_area = Rect {
                    x: area.x,
                    y: area.y + 1,
                    width: area.width,
                    height: area.height.saturating_sub(2),
                };
                self.canvas.resize(grid_area);
                // Infallible for the interactive strategy.
                let _ = self.canvas.present(&self.layout);

                let state = ViewState {
                    week: self.week,
                    total_weeks: self.config.total_weeks,
                    seed: self.seed,
                    exporting: self.pending_export.is_some(),
                    message: self.message.clone(),
                };
                ui::draw(frame, &self.canvas, &state, self.layout.is_empty());
            })?;

            if event::poll(TICK)? {
                let ev = event::read()?;
                self.handle_event(&ev);
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        let Event::Key(key) = event else { return };
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quitting = true,
            KeyCode::Left | KeyCode::Char('h') => self.change_week(-1),
            KeyCode::Right | KeyCode::Char('l') => self.change_week(1),
            KeyCode::Char('r') => {
                self.seed = self.seed.wrapping_add(1);
                self.message = None;
                self.recompute();
            }
            KeyCode::Char('e') => self.start_export(),
            _ => {}
        }
    }

    fn change_week(&mut self, delta: i32) {
        let total = i32::from(self.config.total_weeks);
        let week = (i32::from(self.week) + delta).clamp(1, total);
        if week as u16 != self.week {
            self.week = week as u16;
            self.message = None;
            self.recompute();
        }
    }

    /// Lance l'export sur un worker. Refuse un second export concurrent
    /// vers la même cible.
    fn start_export(&mut self) {
        if self.pending_export.is_some() {
            return;
        }
        let Some(font_path) = self.config.export.font_path.clone() else {
            self.message = Some("no export font configured".into());
            return;
        };

        let e = &self.config.export;
        let host = match PngHost::from_font_path(e.width, e.height, &font_path) {
            Ok(host) => host,
            Err(err) => {
                log::error!("export setup failed: {err}");
                self.message = Some("export failed".into());
                return;
            }
        };

        let output = PathBuf::from(format!("timetable-week{}.png", self.week));
        let config = self.config.clone();
        let layout = self.layout.clone();
        let (tx, rx) = flume::bounded(1);

        std::thread::spawn(move || {
            let mut exporter = ImageExporter::new(host, config, output);
            let result = exporter.present(&layout).map_err(|err| err.to_string());
            // Si l'initiateur est parti, le résultat est simplement jeté.
            let _ = tx.send(result);
        });

        self.message = None;
        self.pending_export = Some(rx);
    }

    /// Relève le résultat d'export sans bloquer la boucle.
    fn poll_export(&mut self) {
        let Some(rx) = &self.pending_export else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(path)) => {
                self.message = Some(format!("exported to {}", path.display()));
                self.pending_export = None;
            }
            Ok(Err(err)) => {
                log::error!("export failed: {err}");
                self.message = Some("export failed".into());
                self.pending_export = None;
            }
            Err(flume::TryRecvError::Empty) => {}
            Err(flume::TryRecvError::Disconnected) => {
                self.message = Some("export failed".into());
                self.pending_export = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<CourseRecord> {
        serde_json::from_str(
            r#"[{"name":"Analysis","teacher":"Wang","location":"A-301",
                 "weekday":1,"periods":[1,2],"weeks":[1,2]}]"#,
        )
        .unwrap()
    }

    fn app() -> App {
        App::new(records(), Palette::builtin(), GridConfig::default(), 1, 0)
    }

    #[test]
    fn week_navigation_clamps_to_semester() {
        let mut app = app();
        app.change_week(-1);
        assert_eq!(app.week, 1);
        for _ in 0..40 {
            app.change_week(1);
        }
        assert_eq!(app.week, app.config.total_weeks);
    }

    #[test]
    fn week_change_recomputes_layout() {
        let mut app = app();
        assert_eq!(app.layout.blocks.len(), 1);
        app.change_week(1);
        assert_eq!(app.layout.week, 2);
        app.change_week(1);
        // Week 3 is outside the record's week set.
        assert!(app.layout.is_empty());
    }

    #[test]
    fn reseed_changes_layout_seed() {
        let mut app = app();
        let before = app.layout.seed;
        app.handle_event(&Event::Key(crossterm::event::KeyEvent::new(
            KeyCode::Char('r'),
            crossterm::event::KeyModifiers::NONE,
        )));
        assert_eq!(app.layout.seed, before + 1);
    }

    #[test]
    fn export_without_font_sets_message() {
        let mut app = app();
        app.start_export();
        assert!(app.pending_export.is_none());
        assert_eq!(app.message.as_deref(), Some("no export font configured"));
    }

    #[test]
    fn export_result_resets_pending_state() {
        let mut app = app();
        let (tx, rx) = flume::bounded(1);
        app.pending_export = Some(rx);
        tx.send(Err("flatten timed out".into())).unwrap();
        app.poll_export();
        assert!(app.pending_export.is_none());
        // Generic indication, not the raw error.
        assert_eq!(app.message.as_deref(), Some("export failed"));
    }
}
