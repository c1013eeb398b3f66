use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::GameError;
use crate::metrics::{
    record_answer, CELEBRATIONS_TOTAL, SESSIONS_ACTIVE, SESSIONS_TOTAL,
    STATS_PERSIST_FAILURES_TOTAL,
};
use crate::models::answer::{AttemptKey, SubmitAnswerResponse};
use crate::models::catalog::GameCatalog;
use crate::models::content::{Operation, PromptBody, SENTENCE_SLOT, TRAY_SLOT};
use crate::models::draft::AnswerDraft;
use crate::models::{
    CreateSessionRequest, CreateSessionResponse, GameSession, MoveRequest, SessionPhase,
    SessionView, TextRequest,
};
use crate::services::answer_service;
use crate::services::content_service::ContentService;
use crate::services::stats_service::StatsStore;
use crate::services::AppState;
use crate::utils::retry::{retry_async_with_config, RetryConfig};

/// All live sessions. Each session is owned by exactly one learner/page;
/// the registry only arbitrates between a request and the delayed round
/// advance racing for the same entry.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, GameSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Invoked exactly once per `Correct` transition, never on `Incorrect`.
pub type CelebrationHook = Arc<dyn Fn(&AttemptKey) + Send + Sync>;

pub fn default_celebration_hook() -> CelebrationHook {
    Arc::new(|key: &AttemptKey| {
        tracing::info!(student = %key.student_id, game = %key.game, "celebration");
    })
}

/// Session controller: drives the round lifecycle
/// `Loading → AwaitingInput → (Correct | back to AwaitingInput)`.
///
/// Validation is synchronous; the attempt-counter write is a best-effort
/// asynchronous side channel that never blocks or fails the round.
pub struct SessionService {
    registry: Arc<SessionRegistry>,
    catalog: Arc<GameCatalog>,
    stats: Arc<dyn StatsStore>,
    celebration: CelebrationHook,
    next_round_delay: Duration,
    stats_save_async: bool,
}

impl SessionService {
    pub fn new(
        registry: Arc<SessionRegistry>,
        catalog: Arc<GameCatalog>,
        stats: Arc<dyn StatsStore>,
        celebration: CelebrationHook,
        next_round_delay: Duration,
        stats_save_async: bool,
    ) -> Self {
        Self {
            registry,
            catalog,
            stats,
            celebration,
            next_round_delay,
            stats_save_async,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.registry.clone(),
            state.catalog.clone(),
            state.stats.clone(),
            state.celebration.clone(),
            Duration::from_millis(state.config.next_round_delay_ms),
            state.config.stats_save_async,
        )
    }

    fn content(&self) -> ContentService {
        ContentService::new(self.catalog.clone())
    }

    pub async fn create_session(
        &self,
        req: &CreateSessionRequest,
        period: u8,
    ) -> Result<CreateSessionResponse, GameError> {
        if !req.game.subjects().contains(&req.subject) {
            return Err(GameError::InvalidConfiguration(format!(
                "game {} cannot be played under subject {}",
                req.game, req.subject
            )));
        }

        let mut session = GameSession {
            id: Uuid::new_v4().to_string(),
            student_id: req.student_id.clone(),
            subject: req.subject,
            game: req.game,
            period,
            operation: req.operation.unwrap_or(Operation::Addition),
            phase: SessionPhase::Loading,
            prompt: None,
            draft: AnswerDraft::empty(),
            feedback: None,
            round: 0,
            started_at: Utc::now(),
        };
        begin_round(&mut session, &self.content())?;

        SESSIONS_TOTAL.with_label_values(&["created"]).inc();
        SESSIONS_ACTIVE.inc();
        tracing::info!(
            session = %session.id,
            student = %session.student_id,
            game = %session.game,
            period = session.period,
            "session created"
        );

        let view = session.view();
        let session_id = session.id.clone();
        self.registry
            .sessions
            .write()
            .await
            .insert(session_id.clone(), session);

        Ok(CreateSessionResponse {
            session_id,
            session: view,
        })
    }

    pub async fn get_session(&self, session_id: &str) -> Result<SessionView, GameError> {
        let sessions = self.registry.sessions.read().await;
        sessions
            .get(session_id)
            .map(GameSession::view)
            .ok_or_else(|| GameError::UnknownSession(session_id.to_string()))
    }

    pub async fn apply_move(
        &self,
        session_id: &str,
        req: &MoveRequest,
    ) -> Result<SessionView, GameError> {
        let mut sessions = self.registry.sessions.write().await;
        let session = accepting_input(&mut sessions, session_id)?;
        session
            .draft
            .apply_move(&req.source, &req.dest, &req.item, req.position);
        Ok(session.view())
    }

    pub async fn set_free_text(
        &self,
        session_id: &str,
        req: &TextRequest,
    ) -> Result<SessionView, GameError> {
        let mut sessions = self.registry.sessions.write().await;
        let session = accepting_input(&mut sessions, session_id)?;
        session.draft.set_free_text(&req.slot, &req.text);
        Ok(session.view())
    }

    /// Validate the current draft. Malformed input aborts before any side
    /// effect; otherwise exactly one attempt counter is incremented and the
    /// state machine moves on.
    pub async fn submit(&self, session_id: &str) -> Result<SubmitAnswerResponse, GameError> {
        let mut sessions = self.registry.sessions.write().await;
        let session = accepting_input(&mut sessions, session_id)?;
        let prompt = session
            .prompt
            .as_ref()
            .ok_or(GameError::NotAcceptingInput)?;

        let verdict = answer_service::evaluate(prompt, &session.draft)?;

        let key = session.attempt_key();
        self.record_attempt(key.clone(), verdict.correct).await;
        record_answer(verdict.correct);

        if verdict.correct {
            (self.celebration)(&key);
            CELEBRATIONS_TOTAL.inc();
            session.phase = SessionPhase::Correct;
            session.feedback = Some(session.game.success_feedback().to_string());
            let delay_ms = self.next_round_delay.as_millis() as u64;
            self.schedule_advance(session.id.clone(), session.round);

            return Ok(SubmitAnswerResponse {
                correct: true,
                feedback: session.game.success_feedback().to_string(),
                celebrate: true,
                retained_pairs: None,
                next_round_in_ms: Some(delay_ms),
            });
        }

        session.feedback = Some(session.game.failure_feedback().to_string());

        // Pairing games keep the connections that were individually right;
        // the wrong cards go back to the tray.
        let retained = if let Some(breakdown) = &verdict.pairing {
            for pair in &breakdown.mismatched {
                session
                    .draft
                    .apply_move(&pair.left, TRAY_SLOT, &pair.card, None);
            }
            Some(breakdown.matched.clone())
        } else {
            None
        };

        // The correction games restart from the uncorrected sentence.
        if let Some(PromptBody::Sentence { sentence, .. }) =
            session.prompt.as_ref().map(|p| &p.body)
        {
            let sentence = sentence.clone();
            session.draft.set_free_text(SENTENCE_SLOT, &sentence);
        }

        Ok(SubmitAnswerResponse {
            correct: false,
            feedback: session.game.failure_feedback().to_string(),
            celebrate: false,
            retained_pairs: retained,
            next_round_in_ms: None,
        })
    }

    pub async fn abandon(&self, session_id: &str) -> Result<(), GameError> {
        let removed = self.registry.sessions.write().await.remove(session_id);
        match removed {
            Some(session) => {
                SESSIONS_TOTAL.with_label_values(&["abandoned"]).inc();
                SESSIONS_ACTIVE.dec();
                tracing::info!(session = %session.id, "session abandoned");
                Ok(())
            }
            None => Err(GameError::UnknownSession(session_id.to_string())),
        }
    }

    /// Fire-and-forget by default: the learner sees feedback immediately and
    /// an undercounted statistic is the accepted worst case.
    async fn record_attempt(&self, key: AttemptKey, was_correct: bool) {
        let stats = self.stats.clone();
        if self.stats_save_async {
            tokio::spawn(async move {
                persist_attempt(stats, key, was_correct).await;
            });
        } else {
            persist_attempt(stats, key, was_correct).await;
        }
    }

    fn schedule_advance(&self, session_id: String, round: u64) {
        let registry = self.registry.clone();
        let catalog = self.catalog.clone();
        let delay = self.next_round_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut sessions = registry.sessions.write().await;
            let Some(session) = sessions.get_mut(&session_id) else {
                // Abandoned while celebrating; nothing to advance.
                return;
            };
            if session.phase != SessionPhase::Correct || session.round != round {
                return;
            }
            let content = ContentService::new(catalog);
            if let Err(e) = begin_round(session, &content) {
                tracing::error!(session = %session_id, "failed to start next round: {e:#}");
            }
        });
    }
}

fn accepting_input<'a>(
    sessions: &'a mut HashMap<String, GameSession>,
    session_id: &str,
) -> Result<&'a mut GameSession, GameError> {
    let session = sessions
        .get_mut(session_id)
        .ok_or_else(|| GameError::UnknownSession(session_id.to_string()))?;
    if session.phase != SessionPhase::AwaitingInput {
        return Err(GameError::NotAcceptingInput);
    }
    Ok(session)
}

/// Start the next round. The draft and prompt are cleared *before* the new
/// prompt is drawn, so stale item references can never leak across rounds,
/// even when the draw fails.
fn begin_round(session: &mut GameSession, content: &ContentService) -> Result<(), GameError> {
    let previous_theme = session.prompt.as_ref().and_then(|p| p.theme.clone());

    session.phase = SessionPhase::Loading;
    session.feedback = None;
    session.draft = AnswerDraft::empty();
    session.prompt = None;

    let prompt = content.next_prompt(
        session.subject,
        session.game,
        session.period,
        session.operation,
        previous_theme.as_deref(),
    )?;
    session.draft = AnswerDraft::for_prompt(&prompt);
    session.prompt = Some(prompt);
    session.round += 1;
    session.phase = SessionPhase::AwaitingInput;
    Ok(())
}

async fn persist_attempt(stats: Arc<dyn StatsStore>, key: AttemptKey, was_correct: bool) {
    let result = retry_async_with_config(RetryConfig::persistence(), || async {
        stats.increment_attempt(&key, was_correct).await
    })
    .await;

    if let Err(e) = result {
        STATS_PERSIST_FAILURES_TOTAL.inc();
        tracing::warn!(
            record = %key.record_id(),
            "dropping attempt increment after retries: {e:#}"
        );
    }
}
