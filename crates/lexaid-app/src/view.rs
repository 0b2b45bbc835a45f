//! Terminal view of one session.
//!
//! The renderer task redraws from store snapshots whenever the store
//! publishes an event. On shutdown it waits for submitted questions to
//! settle, flushes what is left of the transcript and exits.

use std::sync::Arc;

use lexaid_chat::{Message, SessionEvent, SessionSnapshot, SessionStore};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, oneshot};
use tokio::task::{JoinHandle, JoinSet};

use crate::render;

/// Tracks what has already been printed for a session.
#[derive(Debug, Default)]
pub struct TranscriptView {
    rendered: usize,
    indicator_shown: bool,
}

impl TranscriptView {
    /// Blocks of text to print for `snapshot`, in order.
    ///
    /// New transcript entries come first. The pending indicator follows the
    /// question it belongs to and is shown once per request.
    pub fn update(&mut self, snapshot: &SessionSnapshot) -> Vec<String> {
        let mut out: Vec<String> = snapshot
            .transcript()
            .get(self.rendered..)
            .unwrap_or_default()
            .iter()
            .map(render::format_message)
            .collect();
        self.rendered = snapshot.len();

        if !snapshot.is_pending() {
            self.indicator_shown = false;
        } else if !self.indicator_shown && snapshot.last().is_some_and(Message::is_user) {
            out.push(render::PENDING_INDICATOR.to_string());
            self.indicator_shown = true;
        }
        out
    }
}

/// Redraw on every store event until `shutdown` fires or the store goes away.
pub async fn render_loop(
    store: Arc<SessionStore>,
    mut events: broadcast::Receiver<SessionEvent>,
    mut shutdown: oneshot::Receiver<()>,
    mut emit: impl FnMut(String),
) {
    let mut view = TranscriptView::default();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Renderer lagged behind session events");
                }
                Err(RecvError::Closed) => break,
            },
            _ = &mut shutdown => break,
        }
        view.update(&store.snapshot()).into_iter().for_each(&mut emit);
    }
    view.update(&store.snapshot()).into_iter().for_each(&mut emit);
}

/// Handle to the renderer task.
pub struct Renderer {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Renderer {
    /// Spawn the renderer. Subscribes before returning so no event is missed.
    pub fn spawn(store: Arc<SessionStore>, emit: impl FnMut(String) + Send + 'static) -> Self {
        let events = store.subscribe();
        let (shutdown, stop) = oneshot::channel();
        let task = tokio::spawn(render_loop(store, events, stop, emit));
        Self { shutdown, task }
    }

    /// Wait for every task in `submits` to finish, then stop the renderer
    /// after its final flush. Aborted submits are skipped silently.
    pub async fn finish(self, mut submits: JoinSet<()>) {
        while let Some(result) = submits.join_next().await {
            match result {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => tracing::warn!(error = %e, "Submit task did not complete"),
            }
        }
        // The renderer may already have exited if the store closed.
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Renderer task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    fn collecting() -> (Arc<Mutex<Vec<String>>>, impl FnMut(String) + Send + 'static) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        (lines, move |line| sink.lock().unwrap().push(line))
    }

    // ---- TranscriptView ----

    #[test]
    fn test_indicator_follows_the_question() {
        let store = SessionStore::new();
        let mut view = TranscriptView::default();

        // Flag taken before the question lands: nothing to show yet.
        assert!(store.try_acquire_pending());
        assert!(view.update(&store.snapshot()).is_empty());

        store.append_message(Message::user("Q")).unwrap();
        assert_eq!(
            view.update(&store.snapshot()),
            vec!["You:\nQ".to_string(), render::PENDING_INDICATOR.to_string()]
        );
        assert!(view.update(&store.snapshot()).is_empty());

        store
            .append_message(Message::assistant("A", vec![], None))
            .unwrap();
        store.set_pending(false);
        assert_eq!(
            view.update(&store.snapshot()),
            vec!["Legal Assistant:\nA".to_string()]
        );
    }

    #[test]
    fn test_indicator_shown_again_for_next_request() {
        let store = SessionStore::new();
        let mut view = TranscriptView::default();
        for question in ["First?", "Second?"] {
            assert!(store.try_acquire_pending());
            store.append_message(Message::user(question)).unwrap();
            let out = view.update(&store.snapshot());
            assert_eq!(out.last().map(String::as_str), Some(render::PENDING_INDICATOR));
            store
                .append_message(Message::assistant("A", vec![], None))
                .unwrap();
            store.set_pending(false);
            view.update(&store.snapshot());
        }
    }

    // ---- Renderer shutdown ----

    #[tokio::test]
    async fn test_finish_waits_for_slow_answer() {
        let store = Arc::new(SessionStore::new());
        let (lines, emit) = collecting();
        let renderer = Renderer::spawn(Arc::clone(&store), emit);

        let mut submits = JoinSet::new();
        {
            let store = Arc::clone(&store);
            submits.spawn(async move {
                assert!(store.try_acquire_pending());
                store.append_message(Message::user("Q")).unwrap();
                tokio::time::sleep(Duration::from_millis(200)).await;
                store
                    .append_message(Message::assistant("Late answer", vec![], None))
                    .unwrap();
                store.set_pending(false);
            });
        }
        // A second, instantly ignored submit must not cut the wait short.
        submits.spawn(async {});

        renderer.finish(submits).await;

        let lines = lines.lock().unwrap();
        assert_eq!(lines.first().map(String::as_str), Some("You:\nQ"));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Legal Assistant:\nLate answer")
        );
        assert!(!store.is_pending());
    }

    #[tokio::test]
    async fn test_finish_without_submit_flushes_transcript() {
        let store = Arc::new(SessionStore::new());
        let (lines, emit) = collecting();
        let renderer = Renderer::spawn(Arc::clone(&store), emit);
        store.append_message(Message::user("Q")).unwrap();

        renderer.finish(JoinSet::new()).await;

        assert_eq!(*lines.lock().unwrap(), vec!["You:\nQ".to_string()]);
    }
}
