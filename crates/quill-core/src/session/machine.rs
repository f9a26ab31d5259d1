//! Session state machine.
//!
//! ```text
//! Idle --Submit--> Creating --Created--> Generating --StreamEnded--> Completed
//!                     |                     |  ^
//!                     |                     |  | Fragment
//!                     |                     +--+
//!                     |                     |
//!                     +--CreateFailed--+    +--StreamFailed--+
//!                                      v                     v
//!                                    Failed                Failed
//! ```
//!
//! `apply` validates the event against the current state before touching the
//! session, so a rejected event leaves it exactly as it was.

use super::event::SessionEvent;
use super::model::{Session, SessionState};
use crate::error::{QuillError, Result};
use crate::validation::validate_input_text;

impl Session {
    /// Applies one event and returns the resulting state.
    ///
    /// # Errors
    ///
    /// - `QuillError::InvalidTransition` if the event is not accepted in the
    ///   current state (including every event on a terminal session)
    /// - `QuillError::Validation` if `Submit` is applied to unusable input
    pub fn apply(&mut self, event: SessionEvent) -> Result<SessionState> {
        match (self.state, event) {
            (SessionState::Idle, SessionEvent::Submit) => {
                validate_input_text(&self.input_text)?;
                self.state = SessionState::Creating;
            }
            (SessionState::Creating, SessionEvent::Created { id, created_at }) => {
                if let Some(existing) = self.id {
                    return Err(QuillError::InvalidTransition {
                        state: self.state.to_string(),
                        event: format!("created (id already assigned: {existing})"),
                    });
                }
                self.id = Some(id);
                self.created_at = created_at;
                self.buffer.clear();
                self.state = SessionState::Generating;
            }
            (SessionState::Creating, SessionEvent::CreateFailed { reason }) => {
                self.error_detail = Some(reason);
                self.state = SessionState::Failed;
            }
            (SessionState::Generating, SessionEvent::Fragment(fragment)) => {
                self.buffer.append(&fragment);
            }
            (SessionState::Generating, SessionEvent::StreamEnded) => {
                self.state = SessionState::Completed;
            }
            (SessionState::Generating, SessionEvent::StreamFailed { reason }) => {
                self.error_detail = Some(reason);
                self.state = SessionState::Failed;
            }
            (state, event) => {
                return Err(QuillError::InvalidTransition {
                    state: state.to_string(),
                    event: event.name().to_string(),
                });
            }
        }

        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryId;
    use crate::session::TransformKind;

    fn id(value: i64) -> EntryId {
        EntryId::new(value).unwrap()
    }

    fn generating(input: &str) -> Session {
        let mut session = Session::new(input, TransformKind::Expand);
        session.apply(SessionEvent::Submit).unwrap();
        session
            .apply(SessionEvent::Created {
                id: id(1),
                created_at: None,
            })
            .unwrap();
        session
    }

    #[test]
    fn test_happy_path_accumulates_in_order() {
        let mut session = generating("abc");
        assert_eq!(session.state(), SessionState::Generating);

        for fragment in ["He", "llo"] {
            session
                .apply(SessionEvent::Fragment(fragment.to_string()))
                .unwrap();
        }
        let state = session.apply(SessionEvent::StreamEnded).unwrap();

        assert_eq!(state, SessionState::Completed);
        assert_eq!(session.accumulated_text(), "Hello");
        assert_eq!(session.id(), Some(id(1)));
    }

    #[test]
    fn test_submit_rejects_empty_input() {
        let mut session = Session::new("   ", TransformKind::Outline);
        let err = session.apply(SessionEvent::Submit).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_create_failure_is_terminal() {
        let mut session = Session::new("abc", TransformKind::Expand);
        session.apply(SessionEvent::Submit).unwrap();
        session
            .apply(SessionEvent::CreateFailed {
                reason: "network down".to_string(),
            })
            .unwrap();

        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.error_detail(), Some("network down"));
        assert!(session.id().is_none());
    }

    #[test]
    fn test_stream_failure_keeps_partial_text() {
        let mut session = generating("abc");
        session.apply(SessionEvent::Fragment("Par".into())).unwrap();
        session
            .apply(SessionEvent::StreamFailed {
                reason: "reset by peer".into(),
            })
            .unwrap();

        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.accumulated_text(), "Par");
        assert_eq!(session.error_detail(), Some("reset by peer"));
    }

    #[test]
    fn test_terminal_sessions_reject_every_event() {
        let mut session = generating("abc");
        session.apply(SessionEvent::Fragment("done".into())).unwrap();
        session.apply(SessionEvent::StreamEnded).unwrap();
        let snapshot = session.clone();

        let events = [
            SessionEvent::Submit,
            SessionEvent::Created {
                id: id(2),
                created_at: None,
            },
            SessionEvent::Fragment("late".into()),
            SessionEvent::StreamEnded,
            SessionEvent::StreamFailed {
                reason: "late".into(),
            },
        ];
        for event in events {
            let err = session.apply(event).unwrap_err();
            assert!(err.is_invalid_transition());
        }
        assert_eq!(session, snapshot);
    }

    #[test]
    fn test_fragment_before_created_is_rejected() {
        let mut session = Session::new("abc", TransformKind::Expand);
        session.apply(SessionEvent::Submit).unwrap();
        let err = session
            .apply(SessionEvent::Fragment("early".into()))
            .unwrap_err();
        assert!(err.is_invalid_transition());
        assert_eq!(session.accumulated_text(), "");
    }

    #[test]
    fn test_accumulated_length_never_decreases_while_generating() {
        let mut session = generating("abc");
        let mut previous = 0;
        for fragment in ["a", "", "bcd", "é", "\n"] {
            session
                .apply(SessionEvent::Fragment(fragment.to_string()))
                .unwrap();
            assert!(session.accumulated_text().len() >= previous);
            previous = session.accumulated_text().len();
        }
        assert_eq!(session.accumulated_text(), "abcdé\n");
    }
}
