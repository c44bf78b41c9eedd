/*
 * Responsibility
 * - 新規 post 作成フォームの状態 (title / content / mode / submission / feedback)
 * - mount 時に下書きを復元し、変更のたびに即保存 (debounce なし)
 * - 書式ショートカット (選択範囲の前後に prefix/suffix を挿入) と markdown プレビュー
 */
use std::ops::Range;
use std::sync::Arc;

use crate::api::PostApi;
use crate::draft::{self, Draft};
use crate::error::ClientError;
use crate::markdown;
use crate::model::{CreatePost, Post};
use crate::storage::LocalStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Editing,
    Previewing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

impl Feedback {
    fn success(message: String) -> Self {
        Self {
            kind: FeedbackKind::Success,
            message,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Error,
            message: message.into(),
        }
    }
}

/// Toolbar shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Bold,
    Italic,
    Heading,
}

impl Format {
    pub fn markers(self) -> (&'static str, &'static str) {
        match self {
            Format::Bold => ("**", "**"),
            Format::Italic => ("_", "_"),
            Format::Heading => ("#", ""),
        }
    }
}

pub struct Editor {
    storage: Arc<dyn LocalStorage>,
    title: String,
    content: String,
    mode: Mode,
    submission: Submission,
    feedback: Option<Feedback>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("title", &self.title)
            .field("content", &self.content)
            .field("mode", &self.mode)
            .field("submission", &self.submission)
            .field("feedback", &self.feedback)
            .finish()
    }
}

impl Editor {
    /// Mount the editor, restoring a saved draft if one parses.
    pub fn mount(storage: Arc<dyn LocalStorage>) -> Self {
        let restored = match draft::load(storage.as_ref()) {
            Ok(draft) => draft.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to parse saved draft");
                Draft::default()
            }
        };

        Self {
            storage,
            title: restored.title,
            content: restored.content,
            mode: Mode::Editing,
            submission: Submission::Idle,
            feedback: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn submission(&self) -> Submission {
        self.submission
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.persist();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.persist();
    }

    // storage always mirrors the in-memory fields
    fn persist(&self) {
        let draft = Draft {
            title: self.title.clone(),
            content: self.content.clone(),
        };
        if let Err(err) = draft::save(self.storage.as_ref(), &draft) {
            tracing::warn!(error = %err, "failed to save draft");
        }
    }

    pub fn toggle_preview(&mut self) -> Mode {
        self.mode = match self.mode {
            Mode::Editing => Mode::Previewing,
            Mode::Previewing => Mode::Editing,
        };
        self.mode
    }

    pub fn preview_html(&self) -> String {
        markdown::render_preview(&self.content)
    }

    /// Wrap the selected characters of `content` in `prefix`/`suffix`.
    ///
    /// `selection` is in characters. Returns the cursor position right after
    /// the inserted suffix.
    pub fn apply_format(&mut self, prefix: &str, suffix: &str, selection: Range<usize>) -> usize {
        let (content, cursor) = splice_format(&self.content, prefix, suffix, selection);
        self.set_content(content);
        cursor
    }

    pub fn apply(&mut self, format: Format, selection: Range<usize>) -> usize {
        let (prefix, suffix) = format.markers();
        self.apply_format(prefix, suffix, selection)
    }

    /// Validate and publish. Returns the created post on success.
    ///
    /// On failure the fields are kept so the author can correct them.
    pub async fn submit(&mut self, api: &dyn PostApi) -> Option<Post> {
        self.feedback = None;

        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            self.feedback = Some(Feedback::error("Both title and content are required."));
            return None;
        }

        self.submission = Submission::Submitting;
        let request = CreatePost {
            title: self.title.clone(),
            content: self.content.clone(),
        };
        let result = api.create(&request).await;
        self.submission = Submission::Idle;

        match result {
            Ok(post) => {
                self.feedback = Some(Feedback::success(format!(
                    "Post \"{}\" created successfully.",
                    post.title
                )));
                self.title.clear();
                self.content.clear();
                self.persist();
                Some(post)
            }
            Err(err) => {
                tracing::error!(error = %err, "blog creation failed");
                let message = match err {
                    ClientError::Status { message: None, .. } => {
                        "Failed to create blog post".to_string()
                    }
                    other => other.to_string(),
                };
                self.feedback = Some(Feedback::error(message));
                None
            }
        }
    }
}

fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// `before(start) + prefix + selected + suffix + after(end)` and the cursor
/// `start + len(prefix) + len(selected) + len(suffix)`, all in characters.
pub fn splice_format(
    content: &str,
    prefix: &str,
    suffix: &str,
    selection: Range<usize>,
) -> (String, usize) {
    let len = content.chars().count();
    let (mut start, mut end) = (selection.start.min(len), selection.end.min(len));
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }

    let (a, b) = (byte_offset(content, start), byte_offset(content, end));
    let selected = &content[a..b];

    let mut out = String::with_capacity(content.len() + prefix.len() + suffix.len());
    out.push_str(&content[..a]);
    out.push_str(prefix);
    out.push_str(selected);
    out.push_str(suffix);
    out.push_str(&content[b..]);

    let cursor = start + prefix.chars().count() + (end - start) + suffix.chars().count();
    (out, cursor)
}
