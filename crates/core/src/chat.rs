//! Chat session defaults and the turn transcript accumulator.

use crate::error::CoreError;

/// Title given to a session created without one.
pub const DEFAULT_SESSION_TITLE: &str = "New chat";

/// Maximum length of a session title (`chat_sessions.title VARCHAR(200)`).
pub const MAX_SESSION_TITLE_LEN: usize = 200;

/// Resolve the title for a new session, falling back to
/// [`DEFAULT_SESSION_TITLE`] when none is given.
pub fn resolve_session_title(title: Option<&str>) -> Result<String, CoreError> {
    let Some(title) = title else {
        return Ok(DEFAULT_SESSION_TITLE.to_string());
    };

    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Session title must not be blank".into(),
        ));
    }
    if trimmed.chars().count() > MAX_SESSION_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Session title must be at most {MAX_SESSION_TITLE_LEN} characters long"
        )));
    }
    Ok(trimmed.to_string())
}

/// Accumulates the generated fragments of a single turn in emission order.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    text: String,
    fragments: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one emitted fragment.
    pub fn push(&mut self, fragment: &str) {
        self.text.push_str(fragment);
        self.fragments += 1;
    }

    /// Number of fragments appended so far.
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments == 0
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
