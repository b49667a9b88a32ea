use std::{collections::HashSet, sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use shared::{
    domain::{AlertKind, DraftKind, PostId, VoteKind, VoteTarget},
    protocol::{
        CreateCommentRequest, CreatePostRequest, ReactionOutcome, ReactionRequest,
        SubmissionOutcome, VoteOutcome, VoteRequest, VoteTally,
    },
};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, warn};

pub mod draft;
pub mod timefmt;

pub use draft::{CounterLevel, Draft};

/// Delay between a successful submission and the content reload, so
/// the success alert is visible before the view refreshes.
const RELOAD_DELAY: Duration = Duration::from_millis(1000);

const POST_BUSY_LABEL: &str = "Posting...";
const COMMENT_BUSY_LABEL: &str = "Adding...";

const POST_TRANSPORT_FAILURE: &str = "Error posting confession. Please try again.";
const COMMENT_TRANSPORT_FAILURE: &str = "Error adding comment. Please try again.";
const VOTE_TRANSPORT_FAILURE: &str = "Error voting. Please try again.";
const REACTION_TRANSPORT_FAILURE: &str = "Error adding reaction. Please try again.";

/// REST backend the board actions are submitted to.
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn create_post(&self, request: &CreatePostRequest) -> Result<SubmissionOutcome>;
    async fn create_comment(&self, request: &CreateCommentRequest) -> Result<SubmissionOutcome>;
    async fn cast_vote(&self, request: &VoteRequest) -> Result<VoteOutcome>;
    async fn add_reaction(&self, request: &ReactionRequest) -> Result<ReactionOutcome>;
}

/// Rendering surface the controller reconciles after each action.
/// Mirrors the externally-owned page markup: composer controls,
/// per-target vote counters, character counters, and the alert mount.
pub trait BoardSurface: Send + Sync {
    fn set_submit_busy(&self, composer: DraftKind, label: &str);
    fn restore_submit(&self, composer: DraftKind);
    fn close_post_composer(&self);
    fn reset_comment_composer(&self);
    fn set_vote_tally(&self, target: VoteTarget, tally: VoteTally);
    fn set_char_counter(&self, composer: DraftKind, length: usize, level: CounterLevel);
    fn mount_alert(&self, alert: &TransientAlert);
    fn begin_alert_dismiss(&self, alert_id: u64);
    fn remove_alert(&self, alert_id: u64);
    fn schedule_reload(&self, delay: Duration);
}

/// A user-visible notice. At most one is mounted at a time; each new
/// alert evicts the previous one.
#[derive(Debug, Clone)]
pub struct TransientAlert {
    pub id: u64,
    pub text: String,
    pub kind: AlertKind,
    pub created_at: DateTime<Utc>,
}

/// Auto-dismissal schedule: visible for `visible`, then a fade window
/// of `fade` before the alert is detached.
#[derive(Debug, Clone, Copy)]
pub struct AlertTimings {
    pub visible: Duration,
    pub fade: Duration,
}

impl Default for AlertTimings {
    fn default() -> Self {
        Self {
            visible: Duration::from_secs(4),
            fade: Duration::from_millis(300),
        }
    }
}

/// How an action resolved. Every variant leaves the surface
/// re-interactable; failures have already been surfaced as alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// The server accepted the action.
    Completed,
    /// The server answered `success: false`.
    Rejected,
    /// Local validation stopped the draft; no network call was made.
    InvalidDraft,
    /// Transport or decode failure; no retry is attempted.
    Failed,
    /// A submission for the same composer is already in flight.
    AlreadyInFlight,
}

struct ActiveAlert {
    id: u64,
    dismiss_task: JoinHandle<()>,
}

struct ControllerState {
    inflight: HashSet<DraftKind>,
    active_alert: Option<ActiveAlert>,
    next_alert_id: u64,
}

/// Owns every user-triggered board action: validate locally, submit,
/// and reconcile the surface with the result. The displayed vote
/// counters are always exactly what the server returned, never a
/// local increment.
pub struct BoardController {
    api: Arc<dyn BoardApi>,
    surface: Arc<dyn BoardSurface>,
    timings: AlertTimings,
    inner: Mutex<ControllerState>,
}

impl BoardController {
    pub fn new(api: Arc<dyn BoardApi>, surface: Arc<dyn BoardSurface>) -> Arc<Self> {
        Self::new_with_timings(api, surface, AlertTimings::default())
    }

    pub fn new_with_timings(
        api: Arc<dyn BoardApi>,
        surface: Arc<dyn BoardSurface>,
        timings: AlertTimings,
    ) -> Arc<Self> {
        Arc::new(Self {
            api,
            surface,
            timings,
            inner: Mutex::new(ControllerState {
                inflight: HashSet::new(),
                active_alert: None,
                next_alert_id: 0,
            }),
        })
    }

    /// Submit a new post draft. Invalid drafts surface a local alert
    /// without touching the network; the submit control is restored on
    /// every exit path.
    pub async fn submit_post(
        self: &Arc<Self>,
        content: &str,
        category: &str,
    ) -> ActionStatus {
        let draft = Draft::new(DraftKind::Post, content);
        let content = match draft.validated_content() {
            Ok(text) => text.to_string(),
            Err(err) => {
                self.notify(err.to_string(), AlertKind::Error).await;
                return ActionStatus::InvalidDraft;
            }
        };

        if !self.begin_submission(DraftKind::Post, POST_BUSY_LABEL).await {
            return ActionStatus::AlreadyInFlight;
        }

        let request = CreatePostRequest {
            content,
            category: category.to_string(),
        };
        debug!(category = request.category.as_str(), "submitting post");
        let result = self.api.create_post(&request).await;
        self.finish_submission(DraftKind::Post).await;

        match result {
            Ok(outcome) if outcome.success => {
                self.notify(outcome.message, AlertKind::Success).await;
                self.surface.close_post_composer();
                self.surface.schedule_reload(RELOAD_DELAY);
                ActionStatus::Completed
            }
            Ok(outcome) => {
                // Composer stays open so the user can correct input.
                self.notify(outcome.message, AlertKind::Error).await;
                ActionStatus::Rejected
            }
            Err(err) => {
                warn!(error = %err, "post submission failed in transport");
                self.notify(POST_TRANSPORT_FAILURE, AlertKind::Error).await;
                ActionStatus::Failed
            }
        }
    }

    /// Submit a comment draft. Same contract as [`submit_post`] with
    /// the comment limits; on success the comment composer is cleared
    /// in place rather than closed.
    ///
    /// [`submit_post`]: BoardController::submit_post
    pub async fn submit_comment(
        self: &Arc<Self>,
        content: &str,
        post_id: PostId,
    ) -> ActionStatus {
        let draft = Draft::new(DraftKind::Comment, content);
        let content = match draft.validated_content() {
            Ok(text) => text.to_string(),
            Err(err) => {
                self.notify(err.to_string(), AlertKind::Error).await;
                return ActionStatus::InvalidDraft;
            }
        };

        if !self
            .begin_submission(DraftKind::Comment, COMMENT_BUSY_LABEL)
            .await
        {
            return ActionStatus::AlreadyInFlight;
        }

        let request = CreateCommentRequest { post_id, content };
        debug!(post_id = post_id.0, "submitting comment");
        let result = self.api.create_comment(&request).await;
        self.finish_submission(DraftKind::Comment).await;

        match result {
            Ok(outcome) if outcome.success => {
                self.notify(outcome.message, AlertKind::Success).await;
                self.surface.reset_comment_composer();
                self.surface.schedule_reload(RELOAD_DELAY);
                ActionStatus::Completed
            }
            Ok(outcome) => {
                self.notify(outcome.message, AlertKind::Error).await;
                ActionStatus::Rejected
            }
            Err(err) => {
                warn!(error = %err, "comment submission failed in transport");
                self.notify(COMMENT_TRANSPORT_FAILURE, AlertKind::Error).await;
                ActionStatus::Failed
            }
        }
    }

    /// Cast a vote. The server is authoritative on vote legality and
    /// on the resulting counters; on success the three displayed
    /// values are overwritten with the returned tally, on failure they
    /// are left untouched.
    pub async fn cast_vote(self: &Arc<Self>, target: VoteTarget, kind: VoteKind) -> ActionStatus {
        let request = VoteRequest::for_target(target, kind);
        match self.api.cast_vote(&request).await {
            Ok(outcome) if outcome.success => match outcome.tally() {
                Some(tally) => {
                    self.surface.set_vote_tally(target, tally);
                    self.notify(vote_confirmation(target, kind), AlertKind::Success)
                        .await;
                    ActionStatus::Completed
                }
                None => {
                    warn!("vote accepted but the response tally was incomplete");
                    self.notify(VOTE_TRANSPORT_FAILURE, AlertKind::Error).await;
                    ActionStatus::Failed
                }
            },
            Ok(outcome) => {
                let message = outcome
                    .message
                    .unwrap_or_else(|| VOTE_TRANSPORT_FAILURE.to_string());
                self.notify(message, AlertKind::Error).await;
                ActionStatus::Rejected
            }
            Err(err) => {
                warn!(error = %err, "vote failed in transport");
                self.notify(VOTE_TRANSPORT_FAILURE, AlertKind::Error).await;
                ActionStatus::Failed
            }
        }
    }

    /// Attach an emoji reaction to a post. Success is confirmed with
    /// an alert only; per-emoji tallies are not rendered by this
    /// layer.
    pub async fn add_reaction(self: &Arc<Self>, post_id: PostId, emoji: &str) -> ActionStatus {
        let request = ReactionRequest {
            post_id,
            emoji: emoji.to_string(),
        };
        match self.api.add_reaction(&request).await {
            Ok(outcome) if outcome.success => {
                self.notify(format!("Added {emoji} reaction!"), AlertKind::Success)
                    .await;
                ActionStatus::Completed
            }
            Ok(outcome) => {
                let message = outcome
                    .message
                    .unwrap_or_else(|| REACTION_TRANSPORT_FAILURE.to_string());
                self.notify(message, AlertKind::Error).await;
                ActionStatus::Rejected
            }
            Err(err) => {
                warn!(error = %err, post_id = post_id.0, "reaction failed in transport");
                self.notify(REACTION_TRANSPORT_FAILURE, AlertKind::Error).await;
                ActionStatus::Failed
            }
        }
    }

    /// Mount a new alert, evicting whichever one is currently visible,
    /// and schedule its two-stage dismissal. Returns the alert id.
    pub async fn notify(self: &Arc<Self>, text: impl Into<String>, kind: AlertKind) -> u64 {
        let mut guard = self.inner.lock().await;
        if let Some(active) = guard.active_alert.take() {
            active.dismiss_task.abort();
            self.surface.remove_alert(active.id);
        }

        guard.next_alert_id += 1;
        let alert = TransientAlert {
            id: guard.next_alert_id,
            text: text.into(),
            kind,
            created_at: Utc::now(),
        };
        self.surface.mount_alert(&alert);

        let dismiss_task = self.spawn_alert_dismissal(alert.id);
        guard.active_alert = Some(ActiveAlert {
            id: alert.id,
            dismiss_task,
        });
        alert.id
    }

    /// Manual dismissal: detach the visible alert immediately and
    /// cancel its timer.
    pub async fn dismiss_alert(&self) {
        let mut guard = self.inner.lock().await;
        if let Some(active) = guard.active_alert.take() {
            active.dismiss_task.abort();
            self.surface.remove_alert(active.id);
        }
    }

    /// Keystroke hook: push the draft's character count and counter
    /// level to the surface.
    pub fn draft_changed(&self, kind: DraftKind, content: &str) {
        let draft = Draft::new(kind, content);
        self.surface
            .set_char_counter(kind, draft.char_len(), draft.counter_level());
    }

    async fn begin_submission(&self, composer: DraftKind, busy_label: &str) -> bool {
        let mut guard = self.inner.lock().await;
        if !guard.inflight.insert(composer) {
            return false;
        }
        self.surface.set_submit_busy(composer, busy_label);
        true
    }

    async fn finish_submission(&self, composer: DraftKind) {
        let mut guard = self.inner.lock().await;
        guard.inflight.remove(&composer);
        self.surface.restore_submit(composer);
    }

    fn spawn_alert_dismissal(self: &Arc<Self>, alert_id: u64) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        let timings = self.timings;
        tokio::spawn(async move {
            tokio::time::sleep(timings.visible).await;
            controller.surface.begin_alert_dismiss(alert_id);
            tokio::time::sleep(timings.fade).await;
            controller.surface.remove_alert(alert_id);

            let mut guard = controller.inner.lock().await;
            if guard.active_alert.as_ref().map(|active| active.id) == Some(alert_id) {
                guard.active_alert = None;
            }
        })
    }
}

fn vote_confirmation(target: VoteTarget, kind: VoteKind) -> String {
    match (target, kind) {
        (VoteTarget::Post(_), VoteKind::Up) => "Upvoted!".to_string(),
        (VoteTarget::Post(_), VoteKind::Down) => "Downvoted!".to_string(),
        (VoteTarget::Comment(_), VoteKind::Up) => "Comment upvoted!".to_string(),
        (VoteTarget::Comment(_), VoteKind::Down) => "Comment downvoted!".to_string(),
    }
}

/// `reqwest`-backed [`BoardApi`] against the board's REST endpoints.
/// A non-2xx status or an undecodable body is a transport failure.
pub struct HttpBoardApi {
    http: Client,
    server_url: String,
}

impl HttpBoardApi {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
        }
    }
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn create_post(&self, request: &CreatePostRequest) -> Result<SubmissionOutcome> {
        let outcome = self
            .http
            .post(format!("{}/api/posts", self.server_url))
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(outcome)
    }

    async fn create_comment(&self, request: &CreateCommentRequest) -> Result<SubmissionOutcome> {
        let outcome = self
            .http
            .post(format!("{}/api/comments", self.server_url))
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(outcome)
    }

    async fn cast_vote(&self, request: &VoteRequest) -> Result<VoteOutcome> {
        let outcome = self
            .http
            .post(format!("{}/api/vote", self.server_url))
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(outcome)
    }

    async fn add_reaction(&self, request: &ReactionRequest) -> Result<ReactionOutcome> {
        let outcome = self
            .http
            .post(format!("{}/api/emoji", self.server_url))
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
