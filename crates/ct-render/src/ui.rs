use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::canvas::GridCanvas;

/// État d'affichage mirroré pour le rendu (le vrai état vit dans l'app).
///
/// # Example
/// ```
/// use ct_render::ui::ViewState;
/// let state = ViewState { week: 1, total_weeks: 18, seed: 0,
///                         exporting: false, message: None };
/// assert!(!state.vacation());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    /// Selected week.
    pub week: u16,
    /// Semester length in weeks.
    pub total_weeks: u16,
    /// Current color seed.
    pub seed: u64,
    /// An export is running on the worker.
    pub exporting: bool,
    /// Transient status line (export result, failure indication).
    pub message: Option<String>,
}

impl ViewState {
    /// True when the selected week falls outside the semester.
    #[must_use]
    pub fn vacation(&self) -> bool {
        self.week == 0 || self.week > self.total_weeks
    }
}

/// Draw the full UI: header + grid canvas + footer.
pub fn draw(frame: &mut Frame, canvas: &GridCanvas, state: &ViewState, grid_empty: bool) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(10),
        Constraint::Length(1),
    ])
    .split(area);

    draw_title(frame, chunks[0], state);

    // === Grille ===
    frame.buffer_mut().merge(canvas.buffer());
    if state.vacation() {
        draw_centered(frame, chunks[1], "Vacation — no classes this week");
    } else if grid_empty {
        draw_centered(frame, chunks[1], "No visible courses for this week");
    }

    draw_footer(frame, chunks[2], state);
}

fn draw_title(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![
        Span::styled("courseTable", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  week {}/{}", state.week, state.total_weeks)),
        Span::styled(
            format!("  seed {}", state.seed),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if state.exporting {
        spans.push(Span::styled(
            "  [exporting…]",
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match &state.message {
        Some(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            "←/→ week · r reseed · e export · q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_centered(frame: &mut Frame, area: Rect, text: &str) {
    let y = area.y + area.height / 2;
    let width = text.chars().count() as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    let target = Rect::new(x, y, width.min(area.width), 1);
    frame.render_widget(
        Paragraph::new(Span::styled(
            text,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
        target,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacation_outside_semester() {
        let mut state = ViewState {
            week: 19,
            total_weeks: 18,
            ..ViewState::default()
        };
        assert!(state.vacation());
        state.week = 18;
        assert!(!state.vacation());
        state.week = 0;
        assert!(state.vacation());
    }
}
