use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::strings::{
    build_status_line, follow_label, help_lines, watch_label, ERROR_PREFIX, HIDDEN_NOTICE,
    INPUT_HINT, TITLE_CONSOLE, TITLE_HELP, TITLE_INPUT, TITLE_INPUT_DISABLED,
};
use crate::theme::THEME;

pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    if !app.visible {
        app.transcript_area = None;
        draw_hidden(f, area);
        if app.show_help {
            draw_help(f, area);
        }
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    draw_transcript(f, chunks[0], app);
    draw_status(f, chunks[1], app);
    draw_input(f, chunks[2], app);

    if app.show_help {
        draw_help(f, area);
    }
}

fn draw_transcript(f: &mut Frame, area: Rect, app: &mut App) {
    app.transcript_area = Some(area);
    let title = Span::styled(
        TITLE_CONSOLE,
        Style::default()
            .fg(THEME.title_fg)
            .add_modifier(Modifier::BOLD),
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.transcript_border));

    let inner_h = area.height.saturating_sub(2) as usize;
    app.transcript.set_viewport(inner_h);

    let lines: Vec<Line> = app
        .transcript
        .visible()
        .iter()
        .map(|l| {
            if l.starts_with(ERROR_PREFIX) {
                Line::from(Span::styled(
                    l.clone(),
                    Style::default().fg(THEME.error_fg),
                ))
            } else {
                Line::from(l.clone())
            }
        })
        .collect();
    // No wrapping: long lines clip at the right edge.
    let para = Paragraph::new(lines).block(block);
    f.render_widget(para, area);

    let inner = Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    let total = app.transcript.len();
    if total > inner.height as usize {
        let mut sb_state = ScrollbarState::new(total).position(app.transcript.offset());
        let sb = Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(sb, inner, &mut sb_state);
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let status = build_status_line(
        &follow_label(app.transcript.behind()),
        app.component_running,
        app.input.history_len(),
        app.dispatcher.observer_count(),
        app.dispatcher.queue_depth(),
        &watch_label(app.config.watch_event_id),
        area.width,
    );
    let para = Paragraph::new(Line::from(Span::styled(
        status,
        Style::default().fg(THEME.hint_fg),
    )));
    f.render_widget(para, area);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
    let enabled = app.input_enabled;
    let (title, border_style) = if enabled {
        (TITLE_INPUT, Style::default().fg(THEME.border_focus))
    } else {
        (
            TITLE_INPUT_DISABLED,
            Style::default().fg(THEME.border_inactive),
        )
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner_w = area.width.saturating_sub(2);
    let graphemes: Vec<&str> = app.input.buffer().graphemes(true).collect();
    let upto = app.input.cursor().min(graphemes.len());
    let col = UnicodeWidthStr::width(graphemes[..upto].concat().as_str()) as u16;
    // Keep the caret on screen by scrolling the line horizontally.
    let scroll_x = col.saturating_sub(inner_w.saturating_sub(1));

    let para = if app.input.buffer().is_empty() && enabled {
        let hint = Line::from(Span::styled(
            INPUT_HINT,
            Style::default().fg(THEME.hint_fg),
        ));
        Paragraph::new(hint).block(block)
    } else {
        Paragraph::new(app.input.buffer().to_string())
            .block(block)
            .scroll((0, scroll_x))
    };
    f.render_widget(para, area);

    if enabled {
        f.set_cursor_position(Position::new(area.x + 1 + col - scroll_x, area.y + 1));
    }
}

fn draw_hidden(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(TITLE_CONSOLE)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.border_inactive));
    f.render_widget(block, area);

    let notice_area = centered_rect(60, 20, area);
    let para = Paragraph::new(Line::from(Span::styled(
        HIDDEN_NOTICE,
        Style::default().fg(THEME.hint_fg),
    )))
    .alignment(Alignment::Center);
    f.render_widget(para, notice_area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 70, area);
    let block = Block::default()
        .title(Span::styled(
            TITLE_HELP,
            Style::default()
                .fg(THEME.title_fg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);

    let lines = help_lines()
        .iter()
        .map(|s| Line::from(*s))
        .collect::<Vec<Line>>();
    let para = Paragraph::new(lines).block(block);
    f.render_widget(Clear, popup_area);
    f.render_widget(para, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
