pub mod ai;
pub mod config;
pub mod download;
pub mod draft;
pub mod error;
pub mod form;
pub mod prompt;
pub mod session;
pub mod state;
pub mod tone;

// Re-export main types for convenience
pub use ai::{CompletionBackend, CompletionRequest, OpenAIClient};
pub use config::Config;
pub use download::DraftDownload;
pub use draft::{DraftGenerator, FAILURE_DRAFT};
pub use error::{DraftError, FormError};
pub use form::{EmailDetails, FormState};
pub use session::{Notice, NoticeKind, Session};
pub use state::{ChatMessage, ChatRole};
pub use tone::Tone;
