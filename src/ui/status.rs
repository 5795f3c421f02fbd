use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    host::{HudKind, WorldView},
    preview::PreviewApp,
    ui::theme::{MUTED_TEXT, NEGATIVE, POSITIVE, STATUS_TEXT},
};

const KEY_HELP: &str =
    "arrows pan  [ ] time speed  n +1h  c cloud  o in/out  r warp  t title  q quit";

pub fn render(frame: &mut Frame, area: Rect, app: &PreviewApp) {
    let lines = vec![summary_line(app), hud_line(app)];
    frame.render_widget(Paragraph::new(lines), area);
}

fn summary_line(app: &PreviewApp) -> Line<'static> {
    let location = app.world.location_info();
    let clock = app.world.clock();
    let config = app.controller.config();
    let cloud = app
        .controller
        .renderer()
        .map_or(1.0, |renderer| renderer.cloud_factor());

    let state = if !app.in_save {
        "title screen".to_string()
    } else if app.last_drawn == 0 {
        "off".to_string()
    } else {
        format!("{} rays", app.last_drawn)
    };

    let text = format!(
        " {}  x{}  {} ({})  {}  {}  {}  cloud {:.0}%",
        clock.current_time(),
        app.world.time_speed(),
        location.name,
        if location.is_outdoors {
            "outdoors"
        } else {
            "indoors"
        },
        app.world.weather_id(),
        config.style.label(),
        state,
        cloud * 100.0,
    );
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(STATUS_TEXT)
            .add_modifier(Modifier::BOLD),
    ))
}

fn hud_line(app: &PreviewApp) -> Line<'static> {
    let spans = app
        .hud
        .messages()
        .map(|message| {
            let color = match message.kind {
                HudKind::Positive => POSITIVE,
                HudKind::Negative => NEGATIVE,
            };
            Span::styled(format!(" {} ", message.text), Style::default().fg(color))
        })
        .collect::<Vec<_>>();

    if spans.is_empty() {
        Line::from(Span::styled(
            format!(" {KEY_HELP}"),
            Style::default().fg(MUTED_TEXT),
        ))
    } else {
        Line::from(spans)
    }
}
