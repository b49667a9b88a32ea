//! Composer drafts: live character counting and the local,
//! non-authoritative pre-submit checks mirrored from the backend.

use shared::{domain::DraftKind, error::ValidationError};

/// Fill level of a composer's character counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterLevel {
    Normal,
    Warn,
    Danger,
}

/// In-memory text a user is composing, post or comment. Created when
/// a composer opens, mutated per keystroke, discarded on submit
/// success or cancel.
#[derive(Debug, Clone)]
pub struct Draft {
    kind: DraftKind,
    content: String,
}

impl Draft {
    pub fn new(kind: DraftKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn kind(&self) -> DraftKind {
        self.kind
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }

    /// Character count, not byte count; limits are expressed in
    /// characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn counter_level(&self) -> CounterLevel {
        let len = self.char_len();
        if len > self.kind.danger_threshold() {
            CounterLevel::Danger
        } else if len > self.kind.warn_threshold() {
            CounterLevel::Warn
        } else {
            CounterLevel::Normal
        }
    }

    /// Trimmed content ready for submission, or the validation failure
    /// to surface locally. Length is checked after trimming.
    pub fn validated_content(&self) -> Result<&str, ValidationError> {
        let trimmed = self.content.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty(self.kind));
        }
        if trimmed.chars().count() > self.kind.max_len() {
            return Err(ValidationError::too_long(self.kind));
        }
        Ok(trimmed)
    }
}

#[cfg(test)]
#[path = "tests/draft_tests.rs"]
mod tests;
