/*
 * Responsibility
 * - editor の下書き ({title, content}) を local storage の "blog-draft" に JSON で保存/復元
 * - サーバには送らない。期限なし
 */
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage::LocalStorage;

pub const DRAFT_KEY: &str = "blog-draft";

// fields missing from a saved draft restore as empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub title: String,
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("saved draft is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// `Ok(None)` when no draft has been stored yet.
pub fn load(storage: &dyn LocalStorage) -> Result<Option<Draft>, DraftError> {
    match storage.get_item(DRAFT_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn save(storage: &dyn LocalStorage, draft: &Draft) -> Result<(), DraftError> {
    let raw = serde_json::to_string(draft)?;
    storage.set_item(DRAFT_KEY, &raw)?;
    Ok(())
}

pub fn clear(storage: &dyn LocalStorage) -> Result<(), DraftError> {
    storage.remove_item(DRAFT_KEY)?;
    Ok(())
}
