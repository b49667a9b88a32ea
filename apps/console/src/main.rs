use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    ActionStatus, BoardController, BoardSurface, CounterLevel, HttpBoardApi, TransientAlert,
};
use shared::domain::{CommentId, DraftKind, PostId, VoteKind, VoteTarget, DEFAULT_CATEGORY};
use shared::protocol::VoteTally;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a new confession.
    Post {
        content: String,
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },
    /// Comment on a post.
    Comment { post_id: i64, content: String },
    /// Vote on a post or a comment (exactly one target).
    Vote {
        #[arg(long)]
        post_id: Option<i64>,
        #[arg(long)]
        comment_id: Option<i64>,
        direction: Direction,
    },
    /// React to a post with an emoji.
    React { post_id: i64, emoji: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Direction {
    Up,
    Down,
}

impl From<Direction> for VoteKind {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => VoteKind::Up,
            Direction::Down => VoteKind::Down,
        }
    }
}

/// Terminal rendering surface: board state changes are printed rather
/// than applied to a page.
struct TerminalSurface;

impl BoardSurface for TerminalSurface {
    fn set_submit_busy(&self, composer: DraftKind, label: &str) {
        tracing::debug!(?composer, label, "submit control busy");
    }

    fn restore_submit(&self, composer: DraftKind) {
        tracing::debug!(?composer, "submit control restored");
    }

    fn close_post_composer(&self) {
        tracing::debug!("post composer closed");
    }

    fn reset_comment_composer(&self) {
        tracing::debug!("comment composer cleared");
    }

    fn set_vote_tally(&self, target: VoteTarget, tally: VoteTally) {
        println!(
            "{target:?}: {} up / {} down, score {}",
            tally.upvotes, tally.downvotes, tally.score
        );
    }

    fn set_char_counter(&self, composer: DraftKind, length: usize, _level: CounterLevel) {
        tracing::debug!(?composer, length, "counter updated");
    }

    fn mount_alert(&self, alert: &TransientAlert) {
        println!("[{}] {}", alert.kind.as_str(), alert.text);
    }

    fn begin_alert_dismiss(&self, _alert_id: u64) {}

    fn remove_alert(&self, _alert_id: u64) {}

    fn schedule_reload(&self, delay: Duration) {
        tracing::debug!(?delay, "content reload scheduled");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();

    let api = Arc::new(HttpBoardApi::new(cli.server_url));
    let controller = BoardController::new(api, Arc::new(TerminalSurface));

    let status = match cli.command {
        Command::Post { content, category } => controller.submit_post(&content, &category).await,
        Command::Comment { post_id, content } => {
            controller.submit_comment(&content, PostId(post_id)).await
        }
        Command::Vote {
            post_id,
            comment_id,
            direction,
        } => {
            let target = match (post_id, comment_id) {
                (Some(post_id), None) => VoteTarget::Post(PostId(post_id)),
                (None, Some(comment_id)) => VoteTarget::Comment(CommentId(comment_id)),
                _ => {
                    return Err(anyhow!(
                        "pass exactly one of --post-id and --comment-id"
                    ))
                }
            };
            controller.cast_vote(target, direction.into()).await
        }
        Command::React { post_id, emoji } => {
            controller.add_reaction(PostId(post_id), &emoji).await
        }
    };

    match status {
        ActionStatus::Completed => Ok(()),
        ActionStatus::Rejected => bail!("the server rejected the action"),
        ActionStatus::InvalidDraft => bail!("the draft failed local validation"),
        ActionStatus::Failed => bail!("could not reach the server"),
        ActionStatus::AlreadyInFlight => bail!("an identical action is already in flight"),
    }
}
