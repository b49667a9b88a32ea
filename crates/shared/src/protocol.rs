use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{CommentId, PostId, VoteKind, VoteTarget};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub post_id: PostId,
    pub content: String,
}

/// Vote payload: exactly one of `post_id` / `comment_id` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<CommentId>,
    pub vote_type: VoteKind,
}

impl VoteRequest {
    pub fn for_target(target: VoteTarget, vote_type: VoteKind) -> Self {
        match target {
            VoteTarget::Post(post_id) => Self {
                post_id: Some(post_id),
                comment_id: None,
                vote_type,
            },
            VoteTarget::Comment(comment_id) => Self {
                post_id: None,
                comment_id: Some(comment_id),
                vote_type,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionRequest {
    pub post_id: PostId,
    pub emoji: String,
}

/// Outcome of a post or comment submission. The backend always pairs
/// the flag with a user-facing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
}

/// Outcome of a vote. Counters are present only when the vote was
/// accepted; rejections carry a message instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downvotes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

impl VoteOutcome {
    /// Complete counter triple, or `None` if the server omitted any of
    /// the three values.
    pub fn tally(&self) -> Option<VoteTally> {
        Some(VoteTally {
            upvotes: self.upvotes?,
            downvotes: self.downvotes?,
            score: self.score?,
        })
    }
}

/// Outcome of an emoji reaction. The server echoes the full per-emoji
/// tally map; this layer confirms the action without rendering it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactions: Option<HashMap<String, i64>>,
}
