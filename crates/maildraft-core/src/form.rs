//! Form state for a single drafting session.

use crate::error::FormError;
use crate::tone::Tone;

/// Split the free-text key points on commas.
///
/// Entries are trimmed and empty fragments dropped; source order and
/// duplicates are kept.
pub fn parse_key_points(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|point| !point.is_empty())
        .map(str::to_string)
        .collect()
}

/// The editable fields plus the last generated draft
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub sender: String,
    pub recipient: String,
    pub purpose: String,
    pub key_points: String,
    pub tone: Tone,
    pub draft: String,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_point_list(&self) -> Vec<String> {
        parse_key_points(&self.key_points)
    }

    /// Snapshot of the five inputs, key points already split
    pub fn details(&self) -> EmailDetails {
        EmailDetails {
            sender: self.sender.clone(),
            recipient: self.recipient.clone(),
            purpose: self.purpose.clone(),
            key_points: self.key_point_list(),
            tone: self.tone.as_str().to_string(),
        }
    }

    pub fn has_draft(&self) -> bool {
        !self.draft.is_empty()
    }
}

/// Everything the draft generator needs for one request.
///
/// `tone` stays a raw label so callers outside the selector (the command
/// line) can pass arbitrary strings.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailDetails {
    pub sender: String,
    pub recipient: String,
    pub purpose: String,
    pub key_points: Vec<String>,
    pub tone: String,
}

impl EmailDetails {
    pub fn validate(&self) -> Result<(), FormError> {
        if self.purpose.is_empty() {
            return Err(FormError::MissingPurpose);
        }
        if self.key_points.is_empty() {
            return Err(FormError::MissingKeyPoints);
        }
        Ok(())
    }
}
