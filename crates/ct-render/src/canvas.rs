use ct_core::color::Rgb;
use ct_core::slots::{SLOT_COUNT, TIME_SLOTS, WEEKDAY_COUNT, WEEKDAY_LABELS, is_break};
use ct_layout::layout::{GridLayout, GridPresenter, PositionedBlock};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

/// Largeur de la colonne des horaires, en cellules terminal.
const GUTTER_COLS: u16 = 7;

/// Hauteur d'une ligne de créneau, en cellules terminal.
const ROW_CELLS: u16 = 2;

/// Ligne d'en-tête (jours de la semaine).
const HEADER_CELLS: u16 = 1;

fn term_color(c: Rgb) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Écrit directement une `GridLayout` dans un `ratatui::Buffer`.
///
/// Pas de widget Table ratatui — écriture directe pour un contrôle exact
/// des fonds de bloc et des lignes de pause fusionnées.
pub fn render_layout(buf: &mut Buffer, area: Rect, layout: &GridLayout) {
    if area.width <= GUTTER_COLS || area.height <= HEADER_CELLS {
        return;
    }
    let col_width = (area.width - GUTTER_COLS) / WEEKDAY_COUNT as u16;
    if col_width == 0 {
        return;
    }

    draw_header(buf, area, col_width);
    draw_gutter(buf, area);
    draw_breaks(buf, area, col_width);

    for positioned in &layout.blocks {
        draw_block(buf, area, col_width, positioned);
    }
}

fn draw_header(buf: &mut Buffer, area: Rect, col_width: u16) {
    let style = Style::default().add_modifier(Modifier::BOLD);
    for (day, label) in WEEKDAY_LABELS.iter().enumerate() {
        let x = area.x + GUTTER_COLS + day as u16 * col_width;
        let pad = (col_width.saturating_sub(label.len() as u16)) / 2;
        buf.set_stringn(
            x + pad,
            area.y,
            *label,
            usize::from(col_width),
            style,
        );
    }
}

fn draw_gutter(buf: &mut Buffer, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    for (row, slot) in TIME_SLOTS.iter().enumerate() {
        let y = area.y + HEADER_CELLS + row as u16 * ROW_CELLS;
        if y + 1 >= area.bottom() {
            break;
        }
        // Break rows keep their label in the merged band, not the gutter.
        if is_break(row) {
            continue;
        }
        buf.set_stringn(area.x, y, slot.label, usize::from(GUTTER_COLS), dim);
        let start = slot.range.split('-').next().unwrap_or("");
        buf.set_stringn(area.x, y + 1, start, usize::from(GUTTER_COLS), dim);
    }
}

/// Lignes de pause : une seule cellule fusionnée sur toute la largeur.
fn draw_breaks(buf: &mut Buffer, area: Rect, col_width: u16) {
    let style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);
    let grid_width = GUTTER_COLS + col_width * WEEKDAY_COUNT as u16;

    for (row, slot) in TIME_SLOTS.iter().enumerate() {
        if !is_break(row) {
            continue;
        }
        let y = area.y + HEADER_CELLS + row as u16 * ROW_CELLS;
        if y >= area.bottom() {
            break;
        }
        let label = format!("· {} {} ·", slot.label, slot.range);
        let pad = (grid_width.saturating_sub(label.chars().count() as u16)) / 2;
        buf.set_stringn(area.x + pad, y, &label, usize::from(grid_width), style);
    }
}

fn draw_block(buf: &mut Buffer, area: Rect, col_width: u16, positioned: &PositionedBlock) {
    let block = &positioned.block;
    let color = &positioned.color;

    let x = area.x + GUTTER_COLS + block.weekday_index() as u16 * col_width;
    let y = area.y + HEADER_CELLS + block.start.min(SLOT_COUNT - 1) as u16 * ROW_CELLS;
    let height = block.rows() as u16 * ROW_CELLS;

    let bg = term_color(color.background);
    let fg = term_color(color.text);
    let style = Style::default().fg(fg).bg(bg);

    // Fond du bloc.
    for cy in y..(y + height).min(area.bottom()) {
        for cx in x..(x + col_width).min(area.right()) {
            if let Some(cell) = buf.cell_mut((cx, cy)) {
                cell.set_char(' ');
                cell.set_style(style);
            }
        }
    }

    // Texte : nom, salle, enseignant ; césure caractère par caractère,
    // lignes excédentaires simplement tronquées.
    let inner_width = usize::from(col_width.saturating_sub(1)).max(1);
    let mut lines = wrap_chars(&block.name, inner_width);
    if !block.location.is_empty() {
        lines.push(block.location.clone());
    }
    if !block.teacher.is_empty() {
        lines.push(block.teacher.clone());
    }
    lines.truncate(usize::from(height));

    for (i, line) in lines.iter().enumerate() {
        let cy = y + i as u16;
        if cy >= area.bottom() {
            break;
        }
        buf.set_stringn(x, cy, line, inner_width, style);
    }
}

/// Césure gloutonne caractère par caractère : le texte n'a pas de points
/// de coupure naturels.
fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for ch in text.chars() {
        if count == width {
            lines.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Stratégie interactive du `GridPresenter` : rend dans un buffer interne
/// que l'UI fusionne ensuite dans la frame.
pub struct GridCanvas {
    area: Rect,
    buffer: Buffer,
}

impl GridCanvas {
    #[must_use]
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            buffer: Buffer::empty(area),
        }
    }

    /// Resize the canvas; called when the terminal area changes.
    pub fn resize(&mut self, area: Rect) {
        if area != self.area {
            log::debug!("grid canvas resized to {}x{}", area.width, area.height);
            self.area = area;
            self.buffer = Buffer::empty(area);
        }
    }

    /// Rendered cells of the last `present` call.
    #[must_use]
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }
}

impl GridPresenter for GridCanvas {
    type Output = ();

    fn present(&mut self, layout: &GridLayout) -> anyhow::Result<()> {
        self.buffer.reset();
        render_layout(&mut self.buffer, self.area, layout);
        Ok(())
    }
}
