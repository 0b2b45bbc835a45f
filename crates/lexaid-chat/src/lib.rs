//! Conversation session manager for Lexaid.
//!
//! Owns the question/answer transcript, gates outbound requests so at most
//! one is in flight, and talks to the remote legal Q&A service.

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod store;
pub mod suggestions;
pub mod types;

pub use client::{AskService, HttpAskClient};
pub use dispatcher::{QueryDispatcher, SubmitOutcome, FALLBACK_ANSWER};
pub use error::ChatError;
pub use store::{SessionEvent, SessionSnapshot, SessionStore};
pub use suggestions::{suggestions_for, SUGGESTED_QUESTIONS};
pub use types::{
    AskRequest, AskResponse, DocumentInfo, DocumentList, HealthResponse, Message, Role, Source,
};
