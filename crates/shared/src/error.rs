use thiserror::Error;

use crate::domain::DraftKind;

/// Local pre-submit validation failures. Message text is user-facing
/// and mirrors what the backend would reject anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please write something before posting!")]
    EmptyPost,
    #[error("Post is too long! Maximum 1000 characters.")]
    PostTooLong,
    #[error("Please write a comment before posting!")]
    EmptyComment,
    #[error("Comment is too long! Maximum 500 characters.")]
    CommentTooLong,
}

impl ValidationError {
    pub fn empty(kind: DraftKind) -> Self {
        match kind {
            DraftKind::Post => ValidationError::EmptyPost,
            DraftKind::Comment => ValidationError::EmptyComment,
        }
    }

    pub fn too_long(kind: DraftKind) -> Self {
        match kind {
            DraftKind::Post => ValidationError::PostTooLong,
            DraftKind::Comment => ValidationError::CommentTooLong,
        }
    }
}
