use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use maildraft_core::{CompletionBackend, NoticeKind, Tone};
use crate::app::{App, Field, InputMode};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn render<B: CompletionBackend + Clone + 'static>(app: &mut App<B>, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, form, notice, draft, footer
    let [header_area, names_area, purpose_area, points_area, controls_area, notice_area, draft_area, footer_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

    render_header(app, frame, header_area);

    let [from_area, to_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(names_area);
    render_text_field(app, frame, from_area, Field::Sender, " From ");
    render_text_field(app, frame, to_area, Field::Recipient, " To ");
    render_text_field(app, frame, purpose_area, Field::Purpose, " Purpose Of Email ");
    render_key_points(app, frame, points_area);

    let [tone_area, button_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(20)]).areas(controls_area);
    render_tone_selector(app, frame, tone_area);
    render_generate_button(app, frame, button_area);

    render_notice(app, frame, notice_area);
    render_draft(app, frame, draft_area);
    render_footer(app, frame, footer_area);
}

fn border_color<B: CompletionBackend + Clone + 'static>(app: &App<B>, field: Field) -> Color {
    if app.focus != field {
        Color::DarkGray
    } else if app.input_mode == InputMode::Editing {
        Color::Yellow
    } else {
        Color::Cyan
    }
}

fn render_header<B: CompletionBackend + Clone + 'static>(app: &App<B>, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" AI Email Draft Generator ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!(" {} ", app.generator.model()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Black));
    frame.render_widget(header, area);
}

fn render_text_field<B: CompletionBackend + Clone + 'static>(
    app: &App<B>,
    frame: &mut Frame,
    area: Rect,
    field: Field,
    title: &str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(app, field)))
        .title(title);

    let text = app.field_text(field).unwrap_or_default();

    // Horizontal scrolling keeps the cursor visible
    let inner_width = area.width.saturating_sub(2) as usize;
    let editing = app.focus == field && app.input_mode == InputMode::Editing;
    let cursor_pos = if editing { app.cursor } else { 0 };
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = text.chars().skip(scroll_offset).take(inner_width).collect();
    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::White))
        .block(block);
    frame.render_widget(input, area);

    if editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

/// Row and column of a char cursor inside multi-line text
fn cursor_row_col(text: &str, cursor: usize) -> (usize, usize) {
    let before: String = text.chars().take(cursor).collect();
    let row = before.matches('\n').count();
    let col = before.rsplit('\n').next().map(|line| line.chars().count()).unwrap_or(0);
    (row, col)
}

fn render_key_points<B: CompletionBackend + Clone + 'static>(app: &App<B>, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(app, Field::KeyPoints)))
        .title(" State 2-3 Key Points (Key Point 1, Key Point 2, ...) ");

    let text = &app.session.form.key_points;
    let editing = app.focus == Field::KeyPoints && app.input_mode == InputMode::Editing;
    let inner_height = area.height.saturating_sub(2) as usize;

    let (row, col) = if editing { cursor_row_col(text, app.cursor) } else { (0, 0) };
    let scroll = row.saturating_sub(inner_height.saturating_sub(1));

    let points = Paragraph::new(text.as_str())
        .style(Style::default().fg(Color::White))
        .block(block)
        .scroll((scroll as u16, 0));
    frame.render_widget(points, area);

    if editing {
        let max_x = area.width.saturating_sub(2);
        let cursor_x = (col as u16).min(max_x.saturating_sub(1));
        let cursor_y = (row - scroll) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + cursor_y + 1));
    }
}

fn render_tone_selector<B: CompletionBackend + Clone + 'static>(app: &App<B>, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Field::Tone;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(app, Field::Tone)))
        .title(" Choose A Tone (←/→) ");

    let mut spans = Vec::new();
    for tone in Tone::all() {
        let style = if tone == app.session.form.tone {
            let base = Style::default().add_modifier(Modifier::BOLD);
            if focused {
                base.bg(Color::Blue).fg(Color::White)
            } else {
                base.fg(Color::Green)
            }
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", tone.as_str()), style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_generate_button<B: CompletionBackend + Clone + 'static>(app: &App<B>, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Field::Generate;
    let (label, style) = if app.is_generating() {
        ("Generating...", Style::default().fg(Color::DarkGray))
    } else if focused {
        ("Generate Email", Style::default().bg(Color::Cyan).fg(Color::Black).bold())
    } else {
        ("Generate Email", Style::default().fg(Color::Cyan))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(app, Field::Generate)));
    let button = Paragraph::new(Line::from(Span::styled(format!(" {} ", label), style)).centered())
        .block(block);
    frame.render_widget(button, area);
}

fn render_notice<B: CompletionBackend + Clone + 'static>(app: &App<B>, frame: &mut Frame, area: Rect) {
    let Some(notice) = app.session.notice() else {
        return;
    };

    let (prefix, color) = match notice.kind {
        NoticeKind::Info => ("", Color::Green),
        NoticeKind::Warning => ("Warning: ", Color::Yellow),
        NoticeKind::Error => ("Error: ", Color::Red),
    };
    let line = Line::from(Span::styled(format!(" {}{}", prefix, notice.text), Style::default().fg(color)));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_draft<B: CompletionBackend + Clone + 'static>(app: &mut App<B>, frame: &mut Frame, area: Rect) {
    if app.is_generating() {
        // Busy indicator replaces the draft while a request is in flight
        let spinner = SPINNER[app.animation_frame as usize % SPINNER.len()];
        let dots = ".".repeat((app.animation_frame as usize % 3) + 1);
        let busy = Paragraph::new(Line::from(Span::styled(
            format!(" {} Generating email draft{}", spinner, dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
        frame.render_widget(busy, area);
        app.draft_area = None;
        return;
    }

    // Only shown once a generation attempt has populated it
    if !app.session.form.has_draft() {
        app.draft_area = None;
        return;
    }

    app.draft_area = Some(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Generated Email Draft ")
        .title_bottom(Line::from(" s: Download Email Draft (email_draft.txt) ").right_aligned());

    let draft = Paragraph::new(Text::from(app.session.draft()))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.draft_scroll, 0));
    frame.render_widget(draft, area);
}

fn render_footer<B: CompletionBackend + Clone + 'static>(app: &App<B>, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " EDIT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    let hints: &[(&str, &str)] = match app.input_mode {
        InputMode::Editing if app.focus == Field::KeyPoints => &[
            (" Esc ", " done "),
            (" Tab ", " next "),
            (" Enter ", " newline "),
            (" ^G ", " generate "),
        ],
        InputMode::Editing => &[
            (" Esc ", " done "),
            (" Tab ", " next "),
            (" ^G ", " generate "),
        ],
        InputMode::Normal => &[
            (" Tab ", " focus "),
            (" Enter ", " edit/select "),
            (" g ", " generate "),
            (" s ", " save "),
            (" j/k ", " scroll "),
            (" q ", " quit "),
        ],
    };
    for (key, label) in hints {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(*label, label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_cursor_row_col() {
        assert_eq!(cursor_row_col("", 0), (0, 0));
        assert_eq!(cursor_row_col("ab,\ncd", 6), (1, 2));
        assert_eq!(cursor_row_col("ab,\ncd", 3), (0, 3));
        assert_eq!(cursor_row_col("é\nü", 2), (1, 0));
    }

    #[test]
    fn test_draft_panel_hidden_until_populated() {
        let mut app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();

        terminal.draw(|f| render(&mut app, f)).unwrap();
        assert!(!screen_text(&terminal).contains("Generated Email Draft"));
        assert!(app.draft_area.is_none());

        app.session.record_outcome(Ok("Subject: Budget Sync".into()));
        terminal.draw(|f| render(&mut app, f)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Generated Email Draft"));
        assert!(text.contains("Subject: Budget Sync"));
        assert!(app.draft_area.is_some());
    }

    #[test]
    fn test_warning_notice_is_rendered() {
        let mut app = test_app();
        app.start_generation();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(&mut app, f)).unwrap();
        assert!(screen_text(&terminal).contains("Warning: Please provide a purpose"));
    }
}
