use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(PostId);
id_newtype!(CommentId);

/// Category the backend falls back to when a composer supplies none.
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteTarget {
    Post(PostId),
    Comment(CommentId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Success,
    Error,
    Info,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Success => "success",
            AlertKind::Error => "error",
            AlertKind::Info => "info",
        }
    }
}

/// Which composer a draft belongs to. Carries the composer limits so
/// validation and the live counter share one source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftKind {
    Post,
    Comment,
}

impl DraftKind {
    pub fn max_len(&self) -> usize {
        match self {
            DraftKind::Post => 1000,
            DraftKind::Comment => 500,
        }
    }

    pub fn warn_threshold(&self) -> usize {
        match self {
            DraftKind::Post => 700,
            DraftKind::Comment => 350,
        }
    }

    pub fn danger_threshold(&self) -> usize {
        match self {
            DraftKind::Post => 900,
            DraftKind::Comment => 450,
        }
    }
}
