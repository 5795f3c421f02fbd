pub mod status;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    preview::{PreviewApp, STATUS_ROWS, canvas::GlyphCanvas},
    ui::theme::{BACKGROUND, ColorCapability, light_color},
};

pub fn render(frame: &mut Frame, app: &PreviewApp, capability: ColorCapability) {
    let area = frame.area();

    if area.width < 30 || area.height < 8 {
        let warning = Paragraph::new("Terminal too small. Resize to at least 30x8.")
            .block(Block::default().borders(Borders::ALL).title("lightshafts"));
        frame.render_widget(warning, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(STATUS_ROWS)])
        .split(area);

    render_canvas(frame, chunks[0], &app.canvas, capability);
    status::render(frame, chunks[1], app);
}

fn render_canvas(frame: &mut Frame, area: Rect, canvas: &GlyphCanvas, capability: ColorCapability) {
    let (cols, rows) = canvas.size();
    let lines = (0..rows.min(area.height))
        .map(|row| {
            let spans = (0..cols.min(area.width))
                .map(|col| {
                    let color = light_color(canvas.light(col, row), capability);
                    Span::styled(canvas.glyph(col, row).to_string(), Style::default().fg(color))
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect::<Vec<_>>();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(BACKGROUND));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::cli::Cli;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn draws_rays_and_status() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let cli = Cli::parse_from(["lightshafts", "--time", "11:00", "--location", "Beach"]);
        let mut app = PreviewApp::new(&cli, dir.path().to_path_buf(), (80, 24)).expect("app");
        for _ in 0..30 {
            app.frame(Duration::from_millis(100)).expect("frame");
        }

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("terminal");
        terminal
            .draw(|frame| render(frame, &app, ColorCapability::TrueColor))
            .expect("draw");

        let text = buffer_text(&terminal);
        let (canvas_text, status_text) = text.split_at(80 * 22);
        assert!(status_text.contains("Beach"));
        assert!(status_text.contains("Sun"));
        assert!(canvas_text.chars().any(|ch| ch != ' '));
    }

    #[test]
    fn tiny_terminals_get_a_warning() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let cli = Cli::parse_from(["lightshafts"]);
        let app = PreviewApp::new(&cli, dir.path().to_path_buf(), (20, 6)).expect("app");

        let mut terminal = Terminal::new(TestBackend::new(20, 6)).expect("terminal");
        terminal
            .draw(|frame| render(frame, &app, ColorCapability::Basic16))
            .expect("draw");
        assert!(buffer_text(&terminal).contains("Terminal"));
    }
}
