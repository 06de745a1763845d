use std::path::PathBuf;
use std::time::Duration;

use ct_core::color::Rgb;
use ct_core::config::GridConfig;
use ct_core::slots::{SLOT_COUNT, TIME_SLOTS, WEEKDAY_COUNT, WEEKDAY_LABELS, is_break};
use ct_layout::layout::{GridLayout, GridPresenter, PositionedBlock};

use crate::error::ExportError;
use crate::host::{DrawCmd, DrawHost};
use crate::text;

/// Attente maximale du signal de complétion du flatten.
pub const FLATTEN_TIMEOUT: Duration = Duration::from_secs(5);

/// Délai de stabilisation après complétion, avant de considérer l'image
/// comme relisible.
pub const SETTLE_DELAY: Duration = Duration::from_millis(120);

/// Couleur des lignes de grille.
const GRID_LINE: Rgb = Rgb::new(229, 229, 229);

/// Fond des bandes de pause.
const BREAK_BAND: Rgb = Rgb::new(247, 247, 247);

/// Couleur des libellés de chrome (en-tête, gouttière, pied de page).
const CHROME_TEXT: Rgb = Rgb::new(136, 136, 136);

/// Stratégie raster du `GridPresenter` : rejoue le layout sur un hôte de
/// dessin hors écran puis aplatit en PNG.
pub struct ImageExporter<H: DrawHost> {
    host: H,
    config: GridConfig,
    output: PathBuf,
    timeout: Duration,
}

impl<H: DrawHost> ImageExporter<H> {
    #[must_use]
    pub fn new(host: H, config: GridConfig, output: PathBuf) -> Self {
        Self {
            host,
            config,
            output,
            timeout: FLATTEN_TIMEOUT,
        }
    }

    /// Override the flatten timeout (tests, slow hosts).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn paint(&mut self, layout: &GridLayout) {
        let e = self.config.export.clone();
        let col_w = (e.width - e.gutter_width) / WEEKDAY_COUNT as u32;
        let row_h = (e.height - e.header_height - e.footer_height) / SLOT_COUNT as u32;
        let grid_right = e.gutter_width + col_w * WEEKDAY_COUNT as u32;
        let grid_bottom = e.header_height + row_h * SLOT_COUNT as u32;

        // Fond blanc.
        self.host.submit(DrawCmd::FillRect {
            x: 0,
            y: 0,
            width: e.width,
            height: e.height,
            color: Rgb::WHITE,
        });

        self.paint_header(col_w, e.header_height, e.font_max);
        self.paint_grid_lines(col_w, row_h, e.header_height, grid_right, grid_bottom);
        self.paint_gutter(row_h, e.header_height, e.gutter_width, e.font_min);
        self.paint_breaks(row_h, e.header_height, grid_right, e.font_min);

        let card_font = text::font_size(
            col_w.saturating_sub(2 * e.cell_padding),
            e.target_chars,
            e.font_min,
            e.font_max,
        );
        for positioned in &layout.blocks {
            self.paint_block(positioned, col_w, row_h, &e, card_font);
        }

        // Pied de page.
        let caption = format!("week {}/{}", layout.week, self.config.total_weeks);
        let caption_px = e.font_min;
        let caption_w = self.host.text_width(&caption, caption_px);
        self.host.submit(DrawCmd::Text {
            x: (e.width as f32 - caption_w) / 2.0,
            y: grid_bottom as f32 + e.footer_height as f32 * 0.6,
            px: caption_px,
            color: CHROME_TEXT,
            text: caption,
        });
    }

    fn paint_header(&mut self, col_w: u32, header_h: u32, px: f32) {
        let baseline = header_h as f32 * 0.65;
        for (day, label) in WEEKDAY_LABELS.iter().enumerate() {
            let x = self.config.export.gutter_width + day as u32 * col_w;
            let label_w = self.host.text_width(label, px);
            self.host.submit(DrawCmd::Text {
                x: x as f32 + (col_w as f32 - label_w) / 2.0,
                y: baseline,
                px,
                color: CHROME_TEXT,
                text: (*label).to_string(),
            });
        }
    }

    fn paint_grid_lines(
        &mut self,
        col_w: u32,
        row_h: u32,
        header_h: u32,
        grid_right: u32,
        grid_bottom: u32,
    ) {
        let gutter = self.config.export.gutter_width;
        for day in 0..=WEEKDAY_COUNT as u32 {
            self.host.submit(DrawCmd::FillRect {
                x: gutter + day * col_w,
                y: header_h,
                width: 1,
                height: grid_bottom - header_h,
                color: GRID_LINE,
            });
        }
        for row in 0..=SLOT_COUNT as u32 {
            self.host.submit(DrawCmd::FillRect {
                x: gutter,
                y: header_h + row * row_h,
                width: grid_right - gutter,
                height: 1,
                color: GRID_LINE,
            });
        }
    }

    fn paint_gutter(&mut self, row_h: u32, header_h: u32, gutter_w: u32, px: f32) {
        for (row, slot) in TIME_SLOTS.iter().enumerate() {
            if is_break(row) {
                continue;
            }
            let top = header_h as f32 + row as f32 * row_h as f32;
            let label_w = self.host.text_width(slot.label, px);
            self.host.submit(DrawCmd::Text {
                x: (gutter_w as f32 - label_w) / 2.0,
                y: top + row_h as f32 * 0.42,
                px,
                color: CHROME_TEXT,
                text: slot.label.to_string(),
            });
            let start = slot.range.split('-').next().unwrap_or("");
            let start_w = self.host.text_width(start, px * 0.85);
            self.host.submit(DrawCmd::Text {
                x: (gutter_w as f32 - start_w) / 2.0,
                y: top + row_h as f32 * 0.8,
                px: px * 0.85,
                color: CHROME_TEXT,
                text: start.to_string(),
            });
        }
    }

    /// Lignes de pause : bande fusionnée sur toute la largeur de la grille.
    fn paint_breaks(&mut self, row_h: u32, header_h: u32, grid_right: u32, px: f32) {
        for (row, slot) in TIME_SLOTS.iter().enumerate() {
            if !is_break(row) {
                continue;
            }
            let y = header_h + row as u32 * row_h;
            self.host.submit(DrawCmd::FillRect {
                x: 0,
                y: y + 1,
                width: grid_right,
                height: row_h - 1,
                color: BREAK_BAND,
            });
            let label = format!("{} {}", slot.label, slot.range);
            let label_w = self.host.text_width(&label, px);
            self.host.submit(DrawCmd::Text {
                x: (grid_right as f32 - label_w) / 2.0,
                y: y as f32 + row_h as f32 * 0.6,
                px,
                color: CHROME_TEXT,
                text: label,
            });
        }
    }

    fn paint_block(
        &mut self,
        positioned: &PositionedBlock,
        col_w: u32,
        row_h: u32,
        e: &ct_core::config::ExportConfig,
        px: f32,
    ) {
        let block = &positioned.block;
        let color = &positioned.color;

        let x = e.gutter_width + block.weekday_index() as u32 * col_w + 2;
        let y = e.header_height + block.start.min(SLOT_COUNT - 1) as u32 * row_h + 2;
        let width = col_w.saturating_sub(4);
        let height = (block.rows() as u32 * row_h).saturating_sub(4);

        self.host.submit(DrawCmd::RoundedRect {
            x,
            y,
            width,
            height,
            radius: e.corner_radius,
            color: color.background,
        });

        // Texte : nom, salle, enseignant ; césure mesurée caractère par
        // caractère, lignes excédentaires tronquées (dégradation admise).
        let inner_w = (width.saturating_sub(2 * e.cell_padding)) as f32;
        let mut lines = text::wrap_measured(&block.name, inner_w, |ch| {
            self.host.text_width(&ch.to_string(), px)
        });
        for extra in [&block.location, &block.teacher] {
            if !extra.is_empty() {
                lines.extend(text::wrap_measured(extra, inner_w, |ch| {
                    self.host.text_width(&ch.to_string(), px)
                }));
            }
        }

        let line_h = px * 1.25;
        let budget = (height.saturating_sub(2 * e.cell_padding)) as f32;
        let max_lines = (budget / line_h).floor() as usize;
        lines.truncate(max_lines.max(1));

        for (i, line) in lines.iter().enumerate() {
            self.host.submit(DrawCmd::Text {
                x: (x + e.cell_padding) as f32,
                y: (y + e.cell_padding) as f32 + px + i as f32 * line_h,
                px,
                color: color.text,
                text: line.clone(),
            });
        }
    }
}

impl<H: DrawHost> GridPresenter for ImageExporter<H> {
    type Output = PathBuf;

    /// Rejoue le layout sur l'hôte puis attend le signal de complétion du
    /// flatten, plus un délai de stabilisation, avant de rendre le chemin.
    ///
    /// # Errors
    /// `ExportError::FlattenTimeout` si l'hôte ne signale jamais la
    /// complétion, `ExportError::Host` s'il rejette l'opération.
    fn present(&mut self, layout: &GridLayout) -> anyhow::Result<PathBuf> {
        self.paint(layout);

        let done = self.host.flatten(&self.output);
        match done.recv_timeout(self.timeout) {
            Ok(Ok(())) => {
                // L'hôte signale la complétion de façon asynchrone ; courte
                // stabilisation avant relecture de l'image aplatie.
                std::thread::sleep(SETTLE_DELAY);
                log::info!("export written to {}", self.output.display());
                Ok(self.output.clone())
            }
            Ok(Err(message)) => Err(ExportError::Host(message).into()),
            Err(_) => Err(ExportError::FlattenTimeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
            .into()),
        }
    }
}
