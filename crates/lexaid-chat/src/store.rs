//! Session store: the single owner of conversation state.
//!
//! Holds the append-only transcript, the in-flight flag and the draft
//! input. Every mutation is announced on a broadcast channel so a
//! presentation layer can redraw from a fresh [`SessionSnapshot`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::ChatError;
use crate::types::{Message, Role};

/// Capacity of the event channel. Slow subscribers see `Lagged` and should
/// re-read a snapshot.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Notification published after a store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A message was appended at `index`.
    MessageAppended { index: usize, role: Role },
    /// The in-flight flag changed to the given value.
    PendingChanged(bool),
    /// The draft input was replaced or cleared.
    DraftChanged,
}

#[derive(Debug, Default)]
struct SessionState {
    transcript: Vec<Message>,
    pending: bool,
    draft_input: String,
}

/// Immutable copy of the session state at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    transcript: Vec<Message>,
    pending: bool,
    draft_input: String,
}

impl SessionSnapshot {
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn draft_input(&self) -> &str {
        &self.draft_input
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.transcript.last()
    }
}

/// Owner of one conversation's state.
pub struct SessionStore {
    session_id: Uuid,
    state: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create an empty session.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let session_id = Uuid::new_v4();
        tracing::debug!(%session_id, "Session created");
        Self {
            session_id,
            state: Mutex::new(SessionState::default()),
            events,
        }
    }

    /// Identifier used to correlate log lines of this conversation.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Subscribe to mutation events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Append a fully formed message to the end of the transcript.
    ///
    /// Returns the index of the new entry. User messages must carry
    /// non-blank content and no sources.
    pub fn append_message(&self, msg: Message) -> Result<usize, ChatError> {
        if msg.role == Role::User {
            if msg.content.trim().is_empty() {
                return Err(ChatError::InvariantViolation(
                    "user message with empty content".to_string(),
                ));
            }
            if !msg.sources.is_empty() {
                return Err(ChatError::InvariantViolation(
                    "user message cannot carry sources".to_string(),
                ));
            }
        }

        let role = msg.role;
        let index = {
            let mut state = self.lock();
            state.transcript.push(msg);
            state.transcript.len() - 1
        };
        tracing::debug!(session_id = %self.session_id, index, %role, "Message appended");
        self.publish(SessionEvent::MessageAppended { index, role });
        Ok(index)
    }

    /// Set the in-flight flag. Setting the current value is a no-op.
    pub fn set_pending(&self, flag: bool) {
        let changed = {
            let mut state = self.lock();
            let changed = state.pending != flag;
            state.pending = flag;
            changed
        };
        if changed {
            self.publish(SessionEvent::PendingChanged(flag));
        }
    }

    /// Atomically set the in-flight flag if it is clear.
    ///
    /// Returns `false` when a request is already in flight.
    pub fn try_acquire_pending(&self) -> bool {
        self.acquire_pending_if(|_| Ok(())).is_ok()
    }

    /// Atomically set the in-flight flag if it is clear and the transcript
    /// is still empty.
    ///
    /// Fails with `RequestInFlight` or `SuggestionUnavailable`; in both
    /// cases nothing changes and no event is published.
    pub fn try_acquire_pending_for_first(&self) -> Result<(), ChatError> {
        self.acquire_pending_if(|state| {
            if state.transcript.is_empty() {
                Ok(())
            } else {
                Err(ChatError::SuggestionUnavailable)
            }
        })
    }

    pub fn is_pending(&self) -> bool {
        self.lock().pending
    }

    /// Replace the not-yet-submitted input text.
    pub fn set_draft(&self, text: impl Into<String>) {
        self.lock().draft_input = text.into();
        self.publish(SessionEvent::DraftChanged);
    }

    pub fn clear_draft(&self) {
        let was_set = {
            let mut state = self.lock();
            let was_set = !state.draft_input.is_empty();
            state.draft_input.clear();
            was_set
        };
        if was_set {
            self.publish(SessionEvent::DraftChanged);
        }
    }

    /// Copy the current state for rendering.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            transcript: state.transcript.clone(),
            pending: state.pending,
            draft_input: state.draft_input.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().transcript.is_empty()
    }

    // -- Private helpers --

    /// Every mutation leaves the state consistent, so a poisoned lock is
    /// still safe to use.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire_pending_if(
        &self,
        check: impl FnOnce(&SessionState) -> Result<(), ChatError>,
    ) -> Result<(), ChatError> {
        {
            let mut state = self.lock();
            if state.pending {
                return Err(ChatError::RequestInFlight);
            }
            check(&state)?;
            state.pending = true;
        }
        self.publish(SessionEvent::PendingChanged(true));
        Ok(())
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

// =============================================================================
// Tests
// =============================================================================
