//! One user's drafting session.
//!
//! The session owns the form fields and the last notice shown to the user.
//! It is created when a frontend starts, mutated only by that frontend's
//! input handlers, and dropped with it.

use tracing::warn;

use crate::ai::CompletionBackend;
use crate::download::DraftDownload;
use crate::draft::{DraftGenerator, FAILURE_DRAFT};
use crate::error::{DraftError, FormError};
use crate::form::{EmailDetails, FormState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub form: FormState,
    notice: Option<Notice>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the input guard and snapshot the fields to send.
    ///
    /// On rejection a warning notice is recorded; nothing is sent.
    pub fn prepare(&mut self) -> Result<EmailDetails, FormError> {
        let details = self.form.details();
        if let Err(e) = details.validate() {
            warn!(reason = ?e, "generation request rejected");
            self.set_notice(NoticeKind::Warning, e.to_string());
            return Err(e);
        }
        self.clear_notice();
        Ok(details)
    }

    /// Store the outcome of a generation call as the current draft.
    ///
    /// Failures become [`FAILURE_DRAFT`], which is then displayed and saved
    /// like any other draft.
    pub fn record_outcome(&mut self, result: Result<String, DraftError>) {
        match result {
            Ok(text) => {
                self.form.draft = text;
                self.clear_notice();
            }
            Err(e) => {
                self.form.draft = FAILURE_DRAFT.to_string();
                self.set_notice(
                    NoticeKind::Error,
                    format!("An unexpected error occurred with the completion API: {e}"),
                );
            }
        }
    }

    /// Guard, generate and record in one step.
    ///
    /// Returns the stored draft, or the guard error when nothing was sent.
    pub async fn generate<B: CompletionBackend>(
        &mut self,
        generator: &DraftGenerator<B>,
    ) -> Result<&str, FormError> {
        let details = self.prepare()?;
        let result = generator.generate(&details).await;
        self.record_outcome(result);
        Ok(&self.form.draft)
    }

    pub fn draft(&self) -> &str {
        &self.form.draft
    }

    pub fn download(&self) -> Option<DraftDownload> {
        self.form.has_draft().then(|| DraftDownload::new(self.form.draft.clone()))
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice { kind, text: text.into() });
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::testing::RecordingBackend;
    use crate::error::MISSING_INPUT_WARNING;
    use crate::tone::Tone;

    const BUDGET_SYNC: &str = "Subject: Budget Sync\n\nHi Alex,\n...\n\nBest,\nJordan";

    fn filled_session(tone: Tone) -> Session {
        let mut session = Session::new();
        session.form.sender = "Jordan".into();
        session.form.recipient = "Alex".into();
        session.form.purpose = "Schedule a meeting".into();
        session.form.key_points = "discuss budget, confirm date".into();
        session.form.tone = tone;
        session
    }

    #[tokio::test]
    async fn test_empty_purpose_sends_nothing() {
        let backend = RecordingBackend::replying(BUDGET_SYNC);
        let generator = DraftGenerator::new(backend.clone());

        for key_points in ["", "discuss budget, confirm date"] {
            let mut session = Session::new();
            session.form.key_points = key_points.into();

            let err = session.generate(&generator).await.unwrap_err();
            assert_eq!(err, FormError::MissingPurpose);
            let notice = session.notice().unwrap();
            assert_eq!(notice.kind, NoticeKind::Warning);
            assert_eq!(notice.text, MISSING_INPUT_WARNING);
            assert!(!session.form.has_draft());
        }
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_meeting_request_issues_exactly_one_call() {
        for tone in Tone::all() {
            let backend = RecordingBackend::replying(BUDGET_SYNC);
            let generator = DraftGenerator::new(backend.clone());
            let mut session = filled_session(tone);

            session.generate(&generator).await.unwrap();

            assert_eq!(backend.call_count(), 1);
            let request = backend.last_request().unwrap();
            let user = &request.messages[1].content;
            assert!(user.contains("Schedule a meeting"));
            assert!(user.contains("discuss budget"));
            assert!(user.contains("confirm date"));
            assert_eq!(request.temperature, tone.temperature());
        }
    }

    #[tokio::test]
    async fn test_success_is_stored_and_downloadable() {
        let generator = DraftGenerator::new(RecordingBackend::replying(BUDGET_SYNC));
        let mut session = filled_session(Tone::Professional);

        let stored = session.generate(&generator).await.unwrap();
        assert_eq!(stored, BUDGET_SYNC);
        assert_eq!(session.draft(), BUDGET_SYNC);
        assert!(session.notice().is_none());

        let download = session.download().unwrap();
        assert_eq!(download.file_name, "email_draft.txt");
        assert_eq!(download.content_type, "text/plain");
        assert_eq!(download.contents, BUDGET_SYNC);
    }

    #[tokio::test]
    async fn test_failure_stores_fixed_string_and_session_recovers() {
        let failing = DraftGenerator::new(RecordingBackend::failing(DraftError::Unauthorized {
            status: 401,
            message: "Invalid API Key".into(),
        }));
        let mut session = filled_session(Tone::Formal);

        let stored = session.generate(&failing).await.unwrap();
        assert_eq!(stored, FAILURE_DRAFT);
        let notice = session.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.contains("Invalid API Key"));
        assert_eq!(session.download().unwrap().contents, FAILURE_DRAFT);

        let working = DraftGenerator::new(RecordingBackend::replying(BUDGET_SYNC));
        session.generate(&working).await.unwrap();
        assert_eq!(session.draft(), BUDGET_SYNC);
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_no_download_before_first_generation() {
        let session = Session::new();
        assert!(session.download().is_none());
    }

    #[test]
    fn test_guard_rejection_keeps_previous_draft() {
        let mut session = filled_session(Tone::Formal);
        session.record_outcome(Ok("earlier draft".into()));
        session.form.purpose.clear();

        assert!(session.prepare().is_err());
        assert_eq!(session.draft(), "earlier draft");
    }
}
