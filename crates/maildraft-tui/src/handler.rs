use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use maildraft_core::CompletionBackend;
use crate::app::{App, Field, InputMode};
use crate::tui::AppEvent;

pub fn handle_event<B: CompletionBackend + Clone + 'static>(app: &mut App<B>, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key<B: CompletionBackend + Clone + 'static>(app: &mut App<B>, key: KeyEvent) {
    // Global keys that work in any mode
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => {
                app.should_quit = true;
                return;
            }
            KeyCode::Char('g') => {
                app.start_generation();
                return;
            }
            KeyCode::Char('s') => {
                app.save_draft();
                return;
            }
            _ => {}
        }
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode<B: CompletionBackend + Clone + 'static>(app: &mut App<B>, key: KeyEvent) {
    match key.code {
        // Quit
        KeyCode::Char('q') => app.should_quit = true,

        // Focus
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),

        // Activate the focused control
        KeyCode::Enter | KeyCode::Char('i') => match app.focus {
            Field::Tone => app.tone_next(),
            Field::Generate => app.start_generation(),
            _ => app.start_editing(),
        },
        KeyCode::Char(' ') if app.focus == Field::Generate => app.start_generation(),

        // Tone selector
        KeyCode::Left | KeyCode::Char('h') if app.focus == Field::Tone => app.tone_prev(),
        KeyCode::Right | KeyCode::Char('l') if app.focus == Field::Tone => app.tone_next(),

        // Actions
        KeyCode::Char('g') => app.start_generation(),
        KeyCode::Char('s') => app.save_draft(),

        // Draft scrolling
        KeyCode::Char('j') => app.scroll_draft_down(1),
        KeyCode::Char('k') => app.scroll_draft_up(1),
        KeyCode::PageDown => app.scroll_draft_down(10),
        KeyCode::PageUp => app.scroll_draft_up(10),

        _ => {}
    }
}

fn handle_editing_mode<B: CompletionBackend + Clone + 'static>(app: &mut App<B>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Enter => {
            if app.focus == Field::KeyPoints {
                app.insert_char('\n');
            } else {
                app.focus_next();
            }
        }
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        // Unbound Ctrl or Alt chords are not text. Both together is AltGr on Windows.
        KeyCode::Char(_)
            if key.modifiers.contains(KeyModifiers::CONTROL)
                != key.modifiers.contains(KeyModifiers::ALT) => {}
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse<B: CompletionBackend + Clone + 'static>(app: &mut App<B>, mouse: MouseEvent) {
    let in_draft = app
        .draft_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_draft {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_draft_down(3),
        MouseEventKind::ScrollUp => app.scroll_draft_up(3),
        _ => {}
    }
}
