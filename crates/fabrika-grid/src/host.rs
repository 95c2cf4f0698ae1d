//! The modal/dialog host a grid reports to.
//!
//! The grid never prints or prompts by itself. Blocking notifications and
//! delete confirmations go through [`GridHost`], which a terminal front-end
//! implements with stdout/stdin and tests implement with [`RecordingHost`].

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;

/// Category of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// An edit or create collided with an existing natural key.
    Conflict,
    /// A cell edit could not be saved.
    SaveFailed,
    /// A delete could not be performed.
    DeleteFailed,
    /// A create was rejected by the backend.
    CreateFailed,
    /// Input failed client-side validation; nothing was sent.
    Validation,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conflict => "conflict",
            Self::SaveFailed => "save failed",
            Self::DeleteFailed => "delete failed",
            Self::CreateFailed => "create failed",
            Self::Validation => "invalid input",
        }
    }
}

/// A blocking notification for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

/// Presentation collaborator of a grid.
pub trait GridHost: Send + Sync {
    /// Show a blocking notification.
    fn notify(&self, notice: &Notice);

    /// Ask the operator to confirm a destructive action.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Host that records notifications and answers confirmations from a script.
///
/// Answers are taken from the queue first, then from the default.
#[derive(Debug, Default)]
pub struct RecordingHost {
    notices: Mutex<Vec<Notice>>,
    prompts: Mutex<Vec<String>>,
    answers: Mutex<VecDeque<bool>>,
    default_answer: bool,
}

impl RecordingHost {
    /// Confirms every prompt.
    pub fn confirming() -> Self {
        Self {
            default_answer: true,
            ..Self::default()
        }
    }

    /// Declines every prompt.
    pub fn declining() -> Self {
        Self::default()
    }

    /// Queue answers for the next prompts.
    pub fn answer_next(&self, answers: impl IntoIterator<Item = bool>) {
        self.answers.lock().extend(answers);
    }

    /// Notifications shown so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Confirmation prompts shown so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

impl GridHost for RecordingHost {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().push(notice.clone());
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().push(prompt.to_string());
        self.answers.lock().pop_front().unwrap_or(self.default_answer)
    }
}
