//! Example questions offered before the first exchange.

use crate::store::SessionSnapshot;

/// Questions a new user can pick instead of typing.
pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "What are the basic rights of workers in India?",
    "How can I file a consumer complaint?",
    "What is the minimum wage law?",
    "What are my digital privacy rights?",
];

/// Suggestions to show for the given state: the full list while the
/// transcript is empty, nothing afterwards.
pub fn suggestions_for(snapshot: &SessionSnapshot) -> &'static [&'static str] {
    if snapshot.is_empty() {
        &SUGGESTED_QUESTIONS
    } else {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SessionStore;
    use crate::types::Message;

    #[test]
    fn test_suggestions_offered_while_empty() {
        let store = SessionStore::new();
        let offered = suggestions_for(&store.snapshot());
        assert_eq!(offered.len(), 4);
        assert_eq!(offered[0], "What are the basic rights of workers in India?");
    }

    #[test]
    fn test_suggestions_hidden_after_first_message() {
        let store = SessionStore::new();
        store.append_message(Message::user("Q")).unwrap();
        assert!(suggestions_for(&store.snapshot()).is_empty());
    }

    #[test]
    fn test_suggestions_are_valid_questions() {
        for q in SUGGESTED_QUESTIONS {
            assert!(!q.trim().is_empty());
            assert!(q.ends_with('?'));
        }
    }
}
