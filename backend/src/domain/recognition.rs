//! Speech-recognition session handling.
//!
//! The actual speech engine lives in the embedding shell; this module
//! owns the session lifecycle around it. A [`RecognitionController`]
//! enforces that at most one session is live at a time. Starting a
//! session yields two halves: the [`RecognitionSession`] the UI drains
//! events from, and the [`TranscriptFeed`] handed to the engine, which
//! pushes transcripts and errors through a bounded channel.
//!
//! Stopping is idempotent. Once a session is stopped its receiver is
//! gone, so the feed can no longer deliver anything and late engine
//! callbacks are shed harmlessly.

use log::{info, warn};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

/// Capacity of the event channel between engine and UI. Interim
/// transcripts beyond this are dropped rather than blocking the engine
/// callback thread.
pub const EVENT_BUFFER: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("a recognition session is already active")]
    SessionActive,

    #[error("recognition session is closed")]
    SessionClosed,
}

/// Events flowing from the speech engine to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// A piece of recognized speech. Interim results arrive with
    /// `is_final` false and are superseded by later events.
    Transcript { text: String, is_final: bool },
    /// The engine reported a failure; the session usually ends after
    /// this.
    EngineError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Listening,
    Stopped,
}

/// Producer half handed to the speech engine.
pub struct TranscriptFeed {
    session_id: Uuid,
    sender: SyncSender<RecognitionEvent>,
}

impl TranscriptFeed {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Push a transcript event. A full buffer drops the event (interim
    /// results are lossy); a stopped session reports `SessionClosed`.
    pub fn push_transcript(&self, text: &str, is_final: bool) -> Result<(), RecognitionError> {
        self.push(RecognitionEvent::Transcript {
            text: text.to_string(),
            is_final,
        })
    }

    /// Push an engine failure to the consumer.
    pub fn push_error(&self, message: &str) -> Result<(), RecognitionError> {
        self.push(RecognitionEvent::EngineError(message.to_string()))
    }

    fn push(&self, event: RecognitionEvent) -> Result<(), RecognitionError> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!(
                    "Recognition event buffer full for session {}, dropping event",
                    self.session_id
                );
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => Err(RecognitionError::SessionClosed),
        }
    }
}

/// Consumer half held by the UI.
pub struct RecognitionSession {
    id: Uuid,
    state: SessionState,
    receiver: Option<Receiver<RecognitionEvent>>,
    active: Arc<Mutex<Option<Uuid>>>,
}

impl RecognitionSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Collect every event delivered since the last drain. Returns
    /// nothing once the session is stopped.
    pub fn drain_events(&mut self) -> Vec<RecognitionEvent> {
        match &self.receiver {
            Some(receiver) => receiver.try_iter().collect(),
            None => Vec::new(),
        }
    }

    /// End the session. Safe to call more than once; later calls do
    /// nothing.
    pub fn stop(&mut self) {
        if self.state == SessionState::Stopped {
            return;
        }
        self.state = SessionState::Stopped;
        // Dropping the receiver disconnects the feed, so the engine
        // cannot deliver anything else.
        self.receiver = None;

        let mut active = self.active.lock().unwrap();
        if *active == Some(self.id) {
            *active = None;
        }
        info!("Stopped recognition session {}", self.id);
    }
}

impl Drop for RecognitionSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Guards the one-live-session rule and creates sessions.
#[derive(Clone)]
pub struct RecognitionController {
    active: Arc<Mutex<Option<Uuid>>>,
}

impl RecognitionController {
    pub fn new() -> Self {
        Self {
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Start a new session, or refuse if one is already live.
    pub fn start_session(
        &self,
    ) -> Result<(RecognitionSession, TranscriptFeed), RecognitionError> {
        let mut active = self.active.lock().unwrap();
        if active.is_some() {
            warn!("Refusing to start a recognition session while one is active");
            return Err(RecognitionError::SessionActive);
        }

        let id = Uuid::new_v4();
        *active = Some(id);
        let (sender, receiver) = sync_channel(EVENT_BUFFER);
        info!("Started recognition session {}", id);

        Ok((
            RecognitionSession {
                id,
                state: SessionState::Listening,
                receiver: Some(receiver),
                active: self.active.clone(),
            },
            TranscriptFeed {
                session_id: id,
                sender,
            },
        ))
    }

    pub fn is_active(&self) -> bool {
        self.active.lock().unwrap().is_some()
    }

    /// Idle when no session is live, Listening otherwise.
    pub fn state(&self) -> SessionState {
        if self.is_active() {
            SessionState::Listening
        } else {
            SessionState::Idle
        }
    }
}

impl Default for RecognitionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_started_session_is_listening() {
        let controller = RecognitionController::new();

        let (session, feed) = controller.start_session().unwrap();

        assert_eq!(session.state(), SessionState::Listening);
        assert_eq!(controller.state(), SessionState::Listening);
        assert!(controller.is_active());
        assert_eq!(session.id(), feed.session_id());
    }

    #[test]
    fn test_controller_without_session_is_idle() {
        let controller = RecognitionController::new();

        assert_eq!(controller.state(), SessionState::Idle);
        assert!(!controller.is_active());
    }

    #[test]
    fn test_second_session_is_refused_while_first_is_live() {
        let controller = RecognitionController::new();
        let (_session, _feed) = controller.start_session().unwrap();

        let result = controller.start_session();

        assert!(matches!(result, Err(RecognitionError::SessionActive)));
    }

    #[test]
    fn test_events_arrive_in_order() {
        let controller = RecognitionController::new();
        let (mut session, feed) = controller.start_session().unwrap();

        feed.push_transcript("feeling", false).unwrap();
        feed.push_transcript("feeling great", true).unwrap();
        feed.push_error("microphone lost").unwrap();

        let events = session.drain_events();
        assert_eq!(
            events,
            vec![
                RecognitionEvent::Transcript {
                    text: "feeling".to_string(),
                    is_final: false,
                },
                RecognitionEvent::Transcript {
                    text: "feeling great".to_string(),
                    is_final: true,
                },
                RecognitionEvent::EngineError("microphone lost".to_string()),
            ]
        );
    }

    #[test]
    fn test_drain_is_empty_after_stop() {
        let controller = RecognitionController::new();
        let (mut session, feed) = controller.start_session().unwrap();
        feed.push_transcript("hello", false).unwrap();

        session.stop();

        assert!(session.drain_events().is_empty());
        assert_eq!(session.state(), SessionState::Stopped);
    }

    #[test]
    fn test_feed_reports_closed_after_stop() {
        let controller = RecognitionController::new();
        let (mut session, feed) = controller.start_session().unwrap();

        session.stop();

        let result = feed.push_transcript("too late", true);
        assert_eq!(result, Err(RecognitionError::SessionClosed));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let controller = RecognitionController::new();
        let (mut session, _feed) = controller.start_session().unwrap();

        session.stop();
        session.stop();

        assert_eq!(session.state(), SessionState::Stopped);
        assert!(!controller.is_active());
    }

    #[test]
    fn test_stop_allows_a_new_session() {
        let controller = RecognitionController::new();
        let (mut session, _feed) = controller.start_session().unwrap();

        session.stop();

        assert!(controller.start_session().is_ok());
    }

    #[test]
    fn test_dropping_a_session_releases_the_controller() {
        let controller = RecognitionController::new();
        {
            let (_session, _feed) = controller.start_session().unwrap();
            assert!(controller.is_active());
        }

        assert!(!controller.is_active());
        assert!(controller.start_session().is_ok());
    }

    #[test]
    fn test_full_buffer_sheds_events_without_blocking() {
        let controller = RecognitionController::new();
        let (mut session, feed) = controller.start_session().unwrap();

        for i in 0..EVENT_BUFFER + 5 {
            feed.push_transcript(&format!("chunk {}", i), false).unwrap();
        }

        let events = session.drain_events();
        assert_eq!(events.len(), EVENT_BUFFER);
    }
}
