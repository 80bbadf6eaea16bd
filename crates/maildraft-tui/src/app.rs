use std::path::PathBuf;

use maildraft_core::{
    CompletionBackend, DraftError, DraftGenerator, NoticeKind, OpenAIClient, Session, FAILURE_DRAFT,
};
use ratatui::layout::Rect;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Focusable controls, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Sender,
    Recipient,
    Purpose,
    KeyPoints,
    Tone,
    Generate,
}

impl Field {
    pub fn next(&self) -> Self {
        match self {
            Field::Sender => Field::Recipient,
            Field::Recipient => Field::Purpose,
            Field::Purpose => Field::KeyPoints,
            Field::KeyPoints => Field::Tone,
            Field::Tone => Field::Generate,
            Field::Generate => Field::Sender,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Field::Sender => Field::Generate,
            Field::Recipient => Field::Sender,
            Field::Purpose => Field::Recipient,
            Field::KeyPoints => Field::Purpose,
            Field::Tone => Field::KeyPoints,
            Field::Generate => Field::Tone,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Field::Sender | Field::Recipient | Field::Purpose | Field::KeyPoints)
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App<B = OpenAIClient> {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: Field,
    pub cursor: usize, // char position in the focused text field

    // Form, draft and notice
    pub session: Session,

    // Generation
    pub generator: DraftGenerator<B>,
    pub generation_task: Option<JoinHandle<Result<String, DraftError>>>,
    pub animation_frame: u8,

    // Draft panel
    pub draft_scroll: u16,
    pub draft_area: Option<Rect>, // for mouse hit-testing, updated during render

    pub download_dir: PathBuf,
}

impl<B> App<B>
where
    B: CompletionBackend + Clone + 'static,
{
    pub fn new(generator: DraftGenerator<B>, download_dir: PathBuf) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: Field::Sender,
            cursor: 0,
            session: Session::new(),
            generator,
            generation_task: None,
            animation_frame: 0,
            draft_scroll: 0,
            draft_area: None,
            download_dir,
        }
    }

    pub fn field_text(&self, field: Field) -> Option<&str> {
        let form = &self.session.form;
        match field {
            Field::Sender => Some(form.sender.as_str()),
            Field::Recipient => Some(form.recipient.as_str()),
            Field::Purpose => Some(form.purpose.as_str()),
            Field::KeyPoints => Some(form.key_points.as_str()),
            Field::Tone | Field::Generate => None,
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        let form = &mut self.session.form;
        match self.focus {
            Field::Sender => Some(&mut form.sender),
            Field::Recipient => Some(&mut form.recipient),
            Field::Purpose => Some(&mut form.purpose),
            Field::KeyPoints => Some(&mut form.key_points),
            Field::Tone | Field::Generate => None,
        }
    }

    fn focused_len(&self) -> usize {
        self.field_text(self.focus).map(|t| t.chars().count()).unwrap_or(0)
    }

    // Focus

    pub fn focus_next(&mut self) {
        self.set_focus(self.focus.next());
    }

    pub fn focus_prev(&mut self) {
        self.set_focus(self.focus.prev());
    }

    fn set_focus(&mut self, field: Field) {
        self.focus = field;
        // Cursor at end of existing text
        self.cursor = self.focused_len();
        if !field.is_text() {
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn start_editing(&mut self) {
        if self.focus.is_text() {
            self.session.clear_notice();
            self.input_mode = InputMode::Editing;
            self.cursor = self.focused_len();
        }
    }

    // Text editing on the focused field

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor;
        if let Some(text) = self.focused_text_mut() {
            let byte_pos = char_to_byte_index(text, cursor);
            text.insert(byte_pos, c);
            self.cursor += 1;
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let cursor = self.cursor - 1;
        if let Some(text) = self.focused_text_mut() {
            let byte_pos = char_to_byte_index(text, cursor);
            text.remove(byte_pos);
            self.cursor = cursor;
        }
    }

    pub fn delete(&mut self) {
        let cursor = self.cursor;
        if let Some(text) = self.focused_text_mut() {
            if cursor < text.chars().count() {
                let byte_pos = char_to_byte_index(text, cursor);
                text.remove(byte_pos);
            }
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.focused_len());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.focused_len();
    }

    // Tone selector

    pub fn tone_next(&mut self) {
        self.session.form.tone = self.session.form.tone.next();
    }

    pub fn tone_prev(&mut self) {
        self.session.form.tone = self.session.form.tone.prev();
    }

    // Generation

    pub fn is_generating(&self) -> bool {
        self.generation_task.is_some()
    }

    /// Kick off a background generation if the form passes the guard.
    ///
    /// Ignored while a previous request is still in flight.
    pub fn start_generation(&mut self) {
        if self.is_generating() {
            debug!("generation already in flight, ignoring request");
            return;
        }

        let Ok(details) = self.session.prepare() else {
            return;
        };

        self.input_mode = InputMode::Normal;
        self.animation_frame = 0;

        let generator = self.generator.clone();
        self.generation_task = Some(tokio::spawn(async move {
            generator.generate(&details).await
        }));
    }

    /// Record the result once the background task has finished.
    pub async fn poll_generation(&mut self) {
        let finished = self
            .generation_task
            .as_ref()
            .is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        let Some(task) = self.generation_task.take() else {
            return;
        };
        match task.await {
            Ok(result) => self.session.record_outcome(result),
            Err(e) => {
                error!(error = %e, "generation task aborted");
                self.session.form.draft = FAILURE_DRAFT.to_string();
                self.session.set_notice(NoticeKind::Error, format!("Generation task aborted: {e}"));
            }
        }
        self.draft_scroll = 0;
    }

    /// Save the current draft as `email_draft.txt` in the download directory.
    pub fn save_draft(&mut self) {
        let Some(download) = self.session.download() else {
            self.session.set_notice(NoticeKind::Warning, "Nothing to save yet. Generate a draft first.");
            return;
        };

        match download.save_in(&self.download_dir) {
            Ok(path) => {
                info!(path = %path.display(), "draft saved");
                self.session.set_notice(NoticeKind::Info, format!("Saved draft to {}", path.display()));
            }
            Err(e) => {
                error!(error = %e, "failed to save draft");
                self.session.set_notice(NoticeKind::Error, format!("Could not save draft: {e:#}"));
            }
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_generating() {
            self.animation_frame = (self.animation_frame + 1) % 4;
        }
    }

    // Draft panel scrolling

    pub fn scroll_draft_down(&mut self, lines: u16) {
        let max = self.session.draft().lines().count().saturating_sub(1) as u16;
        self.draft_scroll = self.draft_scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_draft_up(&mut self, lines: u16) {
        self.draft_scroll = self.draft_scroll.saturating_sub(lines);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use maildraft_core::draft::testing::RecordingBackend;
    use maildraft_core::Tone;

    pub type TestApp = App<RecordingBackend>;

    pub fn test_app_with(backend: RecordingBackend) -> TestApp {
        let dir = std::env::temp_dir().join("maildraft-tests");
        App::new(DraftGenerator::new(backend), dir)
    }

    pub fn test_app() -> TestApp {
        test_app_with(RecordingBackend::replying("Subject: Budget Sync\n\nHi Alex,"))
    }

    pub fn fill_meeting(app: &mut TestApp) {
        let form = &mut app.session.form;
        form.sender = "Jordan".into();
        form.recipient = "Alex".into();
        form.purpose = "Schedule a meeting".into();
        form.key_points = "discuss budget, confirm date".into();
    }

    /// Let the background task run to completion, then record it
    pub async fn finish_generation(app: &mut TestApp) {
        while app.generation_task.as_ref().is_some_and(|task| !task.is_finished()) {
            tokio::task::yield_now().await;
        }
        app.poll_generation().await;
    }

    #[test]
    fn test_char_to_byte_index_handles_multibyte() {
        assert_eq!(char_to_byte_index("héllo", 2), 3);
        assert_eq!(char_to_byte_index("abc", 10), 3);
    }

    #[test]
    fn test_editing_is_utf8_safe() {
        let mut app = test_app();
        app.focus = Field::Recipient;
        for c in "Zoë".chars() {
            app.insert_char(c);
        }
        app.cursor_left();
        app.insert_char('e');
        assert_eq!(app.session.form.recipient, "Zoeë");

        app.backspace();
        app.delete();
        assert_eq!(app.session.form.recipient, "Zo");
        assert_eq!(app.cursor, 2);

        app.cursor_home();
        app.backspace();
        assert_eq!(app.session.form.recipient, "Zo");
    }

    #[test]
    fn test_focus_cycle_leaves_editing_on_non_text_fields() {
        let mut app = test_app();
        app.session.form.purpose = "Hi".into();
        app.focus = Field::Recipient;
        app.start_editing();
        app.focus_next();
        assert_eq!(app.focus, Field::Purpose);
        assert_eq!(app.cursor, 2);
        assert_eq!(app.input_mode, InputMode::Editing);

        app.focus_next();
        app.focus_next();
        assert_eq!(app.focus, Field::Tone);
        assert_eq!(app.input_mode, InputMode::Normal);

        app.focus_next();
        app.focus_next();
        assert_eq!(app.focus, Field::Sender);
        app.focus_prev();
        assert_eq!(app.focus, Field::Generate);
    }

    #[test]
    fn test_tone_selector_wraps() {
        let mut app = test_app();
        app.tone_prev();
        assert_eq!(app.session.form.tone, Tone::Friendly);
        app.tone_next();
        app.tone_next();
        assert_eq!(app.session.form.tone, Tone::Professional);
    }

    #[test]
    fn test_guard_rejection_spawns_nothing() {
        let mut app = test_app();
        app.session.form.key_points = "discuss budget".into();
        app.start_generation();
        assert!(!app.is_generating());
        assert_eq!(app.session.notice().unwrap().kind, NoticeKind::Warning);
    }

    #[tokio::test]
    async fn test_activation_sends_one_request_while_in_flight() {
        let backend = RecordingBackend::replying("Subject: Budget Sync");
        let mut app = test_app_with(backend.clone());
        fill_meeting(&mut app);

        app.start_generation();
        assert!(app.is_generating());
        app.start_generation();
        app.start_generation();

        finish_generation(&mut app).await;
        assert!(!app.is_generating());
        assert_eq!(backend.call_count(), 1);

        let request = backend.last_request().unwrap();
        assert_eq!(request.max_tokens, 250);
        assert_eq!(request.temperature, 0.4);
        assert!(request.messages[1].content.contains("Schedule a meeting"));
    }

    #[tokio::test]
    async fn test_finished_generation_is_recorded() {
        let mut app = test_app();
        fill_meeting(&mut app);
        app.draft_scroll = 7;

        app.start_generation();
        finish_generation(&mut app).await;
        assert_eq!(app.session.draft(), "Subject: Budget Sync\n\nHi Alex,");
        assert_eq!(app.draft_scroll, 0);
        assert!(app.session.notice().is_none());

        // A second activation after completion goes out again
        app.start_generation();
        assert!(app.is_generating());
        finish_generation(&mut app).await;
    }

    #[tokio::test]
    async fn test_failed_generation_stores_failure_draft() {
        let backend = RecordingBackend::failing(DraftError::Api {
            status: 503,
            message: "over capacity".into(),
        });
        let mut app = test_app_with(backend.clone());
        fill_meeting(&mut app);

        app.start_generation();
        finish_generation(&mut app).await;
        assert_eq!(backend.call_count(), 1);
        assert_eq!(app.session.draft(), FAILURE_DRAFT);
        assert_eq!(app.session.notice().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_editing_clears_previous_notice() {
        let mut app = test_app();
        app.start_generation();
        assert!(app.session.notice().is_some());

        app.focus = Field::Purpose;
        app.start_editing();
        assert!(app.session.notice().is_none());
    }

    #[test]
    fn test_save_without_draft_warns() {
        let mut app = test_app();
        app.save_draft();
        assert_eq!(app.session.notice().unwrap().kind, NoticeKind::Warning);
    }

    #[test]
    fn test_save_writes_email_draft_txt() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut app = test_app();
        app.download_dir = tmp.path().to_path_buf();
        app.session.record_outcome(Ok("Subject: Hi".into()));

        app.save_draft();
        let saved = std::fs::read_to_string(tmp.path().join("email_draft.txt")).unwrap();
        assert_eq!(saved, "Subject: Hi");
        assert_eq!(app.session.notice().unwrap().kind, NoticeKind::Info);
    }

    #[test]
    fn test_draft_scroll_is_clamped() {
        let mut app = test_app();
        app.session.record_outcome(Ok("a\nb\nc".into()));
        app.scroll_draft_down(10);
        assert_eq!(app.draft_scroll, 2);
        app.scroll_draft_up(5);
        assert_eq!(app.draft_scroll, 0);
    }
}
