use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const DRAFT_FILE_NAME: &str = "email_draft.txt";
pub const DRAFT_CONTENT_TYPE: &str = "text/plain";

/// The draft as offered for saving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftDownload {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub contents: String,
}

impl DraftDownload {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            file_name: DRAFT_FILE_NAME,
            content_type: DRAFT_CONTENT_TYPE,
            contents: contents.into(),
        }
    }

    /// Write the draft into `dir`, overwriting any previous save.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("could not create {}", dir.display()))?;

        let path = dir.join(self.file_name);
        fs::write(&path, &self.contents)
            .with_context(|| format!("could not write {}", path.display()))?;
        Ok(path)
    }
}
