//! Query dispatcher: turns a submitted question into one service call and
//! records the outcome in the session store.
//!
//! At most one request is in flight per session. Submits that arrive while
//! a request is pending, or that contain only whitespace, are dropped
//! without touching the transcript or the network.

use std::sync::Arc;

use crate::client::AskService;
use crate::error::ChatError;
use crate::store::SessionStore;
use crate::suggestions;
use crate::types::{AskRequest, Message};

/// Assistant text shown whenever the service call fails for any reason.
pub const FALLBACK_ANSWER: &str =
    "I apologize, but I encountered an error while processing your question. Please try again.";

/// What happened to a submit call.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The service answered and the answer was appended.
    Answered,
    /// The service call failed and the fallback message was appended.
    FellBack,
    /// Nothing was done. The error says why.
    Ignored(ChatError),
}

impl SubmitOutcome {
    /// Whether the submit reached the service.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, SubmitOutcome::Ignored(_))
    }
}

/// Holds the session's in-flight flag and clears it when dropped, on every
/// exit path including panics and cancellation.
struct InFlightGuard {
    store: Arc<SessionStore>,
}

impl InFlightGuard {
    fn acquire(store: &Arc<SessionStore>) -> Option<Self> {
        store.try_acquire_pending().then(|| Self {
            store: Arc::clone(store),
        })
    }

    /// Acquire only while the transcript is still empty.
    fn acquire_for_first(store: &Arc<SessionStore>) -> Result<Self, ChatError> {
        store.try_acquire_pending_for_first()?;
        Ok(Self {
            store: Arc::clone(store),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.store.set_pending(false);
    }
}

/// Sends questions to the Q&A service on behalf of one session.
pub struct QueryDispatcher {
    store: Arc<SessionStore>,
    service: Arc<dyn AskService>,
    top_k: u32,
}

impl QueryDispatcher {
    pub fn new(store: Arc<SessionStore>, service: Arc<dyn AskService>, top_k: u32) -> Self {
        Self {
            store,
            service,
            top_k,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }

    /// Submit a question.
    ///
    /// Never fails: remote errors become the fallback transcript entry and
    /// rejected input is reported as [`SubmitOutcome::Ignored`].
    pub async fn submit(&self, question: &str) -> SubmitOutcome {
        let session_id = self.store.session_id();

        if question.trim().is_empty() {
            tracing::debug!(%session_id, "Ignoring empty question");
            return SubmitOutcome::Ignored(ChatError::EmptyInput);
        }

        let Some(guard) = InFlightGuard::acquire(&self.store) else {
            tracing::debug!(%session_id, "Ignoring question while a request is in flight");
            return SubmitOutcome::Ignored(ChatError::RequestInFlight);
        };

        self.dispatch(guard, question).await
    }

    /// Submit the suggested question at `index`, exactly as if it had been
    /// typed. Only offered while the transcript is empty; emptiness is
    /// checked together with taking the in-flight flag.
    pub async fn submit_suggestion(&self, index: usize) -> SubmitOutcome {
        let Some(question) = suggestions::SUGGESTED_QUESTIONS.get(index) else {
            return SubmitOutcome::Ignored(ChatError::SuggestionUnavailable);
        };

        let guard = match InFlightGuard::acquire_for_first(&self.store) {
            Ok(guard) => guard,
            Err(e) => {
                tracing::debug!(
                    session_id = %self.store.session_id(),
                    reason = %e,
                    "Ignoring suggestion"
                );
                return SubmitOutcome::Ignored(e);
            }
        };

        self.dispatch(guard, question).await
    }

    /// Record the question, call the service once and record the reply.
    /// `_guard` is held until the reply is appended.
    async fn dispatch(&self, _guard: InFlightGuard, question: &str) -> SubmitOutcome {
        let session_id = self.store.session_id();

        if let Err(e) = self.store.append_message(Message::user(question)) {
            tracing::error!(%session_id, error = %e, "Failed to record question");
            return SubmitOutcome::Ignored(e);
        }
        self.store.clear_draft();

        let request = AskRequest {
            question: question.to_string(),
            top_k: self.top_k,
        };

        let (reply, outcome) = match self.service.ask(&request).await {
            Ok(response) => {
                tracing::info!(
                    %session_id,
                    sources = response.sources.len(),
                    processing_time = response.processing_time,
                    "Answer received"
                );
                (
                    Message::assistant(response.answer, response.sources, response.timestamp),
                    SubmitOutcome::Answered,
                )
            }
            Err(e) => {
                tracing::warn!(
                    %session_id,
                    error = %e,
                    remote = e.is_remote(),
                    "Question failed; showing fallback"
                );
                (
                    Message::assistant(FALLBACK_ANSWER, Vec::new(), None),
                    SubmitOutcome::FellBack,
                )
            }
        };

        match self.store.append_message(reply) {
            Ok(_) => outcome,
            Err(e) => {
                tracing::error!(%session_id, error = %e, "Failed to record answer");
                SubmitOutcome::Ignored(e)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
