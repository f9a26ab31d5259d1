//! Session controller.
//!
//! Applies the session state machine and performs the side effects each
//! transition calls for: one `create` on submit, one channel per generating
//! session, exactly one `update` when the stream ends, a history refresh after
//! every terminal transition.

use super::history::HistorySynchronizer;
use crate::active_slot::{ActiveSlot, SharedSlot};
use crate::display::DisplaySink;
use futures::StreamExt;
use quill_core::clock::{Clock, SystemClock};
use quill_core::config::QuillConfig;
use quill_core::entry::{EntryId, EntryStore, EntryUpdate};
use quill_core::error::{QuillError, Result};
use quill_core::generation::{GenerationChannel, PromptBuilder};
use quill_core::session::{Session, SessionEvent, SessionState, TransformKind};
use quill_core::stream::{ThrottleConfig, UpdateThrottler};
use quill_core::validation::DEFAULT_PAGE_LIMIT;
use std::sync::Arc;

const DEFAULT_PREVIEW_CHARS: usize = 60;

/// Drives sessions from submission to terminal outcome.
///
/// Cloning is cheap; clones share the active slot and the history list, so a
/// submission can be spawned while another handle selects or deletes.
#[derive(Clone)]
pub struct SessionController {
    store: Arc<dyn EntryStore>,
    channel: Arc<dyn GenerationChannel>,
    prompts: Arc<dyn PromptBuilder>,
    sink: Arc<dyn DisplaySink>,
    clock: Arc<dyn Clock>,
    slot: SharedSlot,
    history: Arc<HistorySynchronizer>,
    throttle: ThrottleConfig,
}

impl SessionController {
    pub fn new(
        store: Arc<dyn EntryStore>,
        channel: Arc<dyn GenerationChannel>,
        prompts: Arc<dyn PromptBuilder>,
        sink: Arc<dyn DisplaySink>,
    ) -> Self {
        let slot = ActiveSlot::shared();
        let history = Arc::new(HistorySynchronizer::new(
            store.clone(),
            slot.clone(),
            sink.clone(),
            DEFAULT_PAGE_LIMIT,
            DEFAULT_PREVIEW_CHARS,
        ));

        Self {
            store,
            channel,
            prompts,
            sink,
            clock: Arc::new(SystemClock),
            slot,
            history,
            throttle: ThrottleConfig::default(),
        }
    }

    /// Applies the display and history sections of `config`.
    pub fn with_config(mut self, config: &QuillConfig) -> Self {
        self.throttle = config.display.throttle();
        self.history = Arc::new(HistorySynchronizer::new(
            self.store.clone(),
            self.slot.clone(),
            self.sink.clone(),
            config.history.page_size,
            config.history.preview_chars,
        ));
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_throttle(mut self, throttle: ThrottleConfig) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn history(&self) -> Arc<HistorySynchronizer> {
        self.history.clone()
    }

    /// Snapshot of the active session, if any.
    pub async fn active(&self) -> Option<Session> {
        self.slot.lock().await.session().cloned()
    }

    /// Runs one session to its terminal state.
    ///
    /// The returned session is `Completed` or `Failed`; create and generation
    /// failures are recorded on it rather than returned.
    ///
    /// # Errors
    ///
    /// - `QuillError::Validation` if the input is unusable; nothing is sent to
    ///   the store and the active slot is left alone
    pub async fn submit(
        &self,
        input_text: impl Into<String>,
        kind: TransformKind,
    ) -> Result<Session> {
        let mut session = Session::new(input_text, kind);
        session.apply(SessionEvent::Submit)?;

        let epoch = {
            let mut slot = self.slot.lock().await;
            let epoch = slot.begin(session.clone());
            self.sink.clear();
            self.sink.state_changed(session.state());
            epoch
        };
        tracing::info!(session_epoch = epoch, kind = %kind, "[SessionController] Submitting");

        let record = match self.store.create(session.input_text(), kind).await {
            Ok(record) => record,
            Err(err) => {
                let err = QuillError::create(err.reason());
                tracing::warn!(session_epoch = epoch, error = %err, "[SessionController] Create failed");
                session.apply(SessionEvent::CreateFailed {
                    reason: err.reason(),
                })?;
                self.publish(epoch, &session).await;
                self.history.refresh_or_notify().await;
                return Ok(session);
            }
        };

        session.apply(SessionEvent::Created {
            id: record.id,
            created_at: Some(record.created_at),
        })?;
        session.sync_timestamps(&record);
        self.publish(epoch, &session).await;
        tracing::debug!(session_epoch = epoch, entry_id = %record.id, "[SessionController] Entry created");

        let outcome = self.stream_output(epoch, &mut session).await?;
        session.apply(outcome)?;
        self.publish(epoch, &session).await;

        self.persist_outcome(&mut session).await;
        self.slot.lock().await.refresh(epoch, &session);
        self.history.refresh_or_notify().await;

        tracing::info!(
            session_epoch = epoch,
            entry_id = ?session.id(),
            state = %session.state(),
            "[SessionController] Session finished"
        );
        Ok(session)
    }

    /// Opens the channel and feeds every fragment through the buffer and the
    /// throttler. Returns the terminal event without applying it.
    async fn stream_output(&self, epoch: u64, session: &mut Session) -> Result<SessionEvent> {
        let mut throttler = UpdateThrottler::new(self.throttle);

        let opened = match self.prompts.build(session.input_text(), session.kind()) {
            Ok(prompt) => self.channel.generate(&prompt).await,
            Err(err) => Err(err),
        };

        let outcome = match opened {
            Err(err) => {
                tracing::warn!(session_epoch = epoch, error = %err, "[SessionController] Channel failed to open");
                SessionEvent::StreamFailed {
                    reason: err.reason(),
                }
            }
            Ok(mut fragments) => {
                let mut fragment_count = 0usize;
                loop {
                    match fragments.next().await {
                        Some(Ok(fragment)) => {
                            session.apply(SessionEvent::Fragment(fragment))?;
                            fragment_count += 1;
                            if throttler.observe(session.accumulated_chars(), self.clock.now()) {
                                self.render(epoch, session, false).await;
                            }
                        }
                        Some(Err(err)) => {
                            tracing::warn!(
                                session_epoch = epoch,
                                fragment_count,
                                error = %err,
                                "[SessionController] Stream failed"
                            );
                            break SessionEvent::StreamFailed {
                                reason: err.reason(),
                            };
                        }
                        None => {
                            tracing::debug!(
                                session_epoch = epoch,
                                fragment_count,
                                "[SessionController] Stream ended"
                            );
                            break SessionEvent::StreamEnded;
                        }
                    }
                }
            }
        };

        if throttler.finish(session.accumulated_chars(), self.clock.now()) {
            self.render(epoch, session, true).await;
        }
        Ok(outcome)
    }

    /// Issues the single post-stream update. A failure is logged and shown as
    /// a notice; the session stays terminal either way.
    async fn persist_outcome(&self, session: &mut Session) {
        let Some(id) = session.id() else {
            return;
        };

        let update = match session.state() {
            SessionState::Completed => EntryUpdate::completed(session.accumulated_text()),
            _ => EntryUpdate::failed(
                session.accumulated_text(),
                session.error_detail().unwrap_or_default(),
            ),
        };

        match self.store.update(id, update).await {
            Ok(record) => session.sync_timestamps(&record),
            Err(err) => {
                let err = QuillError::persistence_sync(format!("update: {}", err.reason()));
                tracing::warn!(entry_id = %id, error = %err, "[SessionController] Update failed");
                self.sink
                    .notice(&format!("Could not save entry {id}: {}", err.reason()));
            }
        }
    }

    /// Re-enters a persisted entry as a `Completed` session without
    /// generating anything.
    ///
    /// # Errors
    ///
    /// - `QuillError::NotFound` if the store has no such entry
    pub async fn select(&self, id: EntryId) -> Result<Session> {
        let record = self.store.get(id).await?;
        let session = Session::from_record(&record);

        let mut slot = self.slot.lock().await;
        let epoch = slot.begin(session.clone());
        self.sink.state_changed(session.state());
        self.sink.render(session.accumulated_text(), true);
        tracing::info!(session_epoch = epoch, entry_id = %id, "[SessionController] Selected entry");

        Ok(session)
    }

    /// Drops the active session and blanks the display.
    pub async fn new_input(&self) {
        let mut slot = self.slot.lock().await;
        let epoch = slot.clear();
        self.sink.clear();
        self.sink.state_changed(SessionState::Idle);
        tracing::debug!(session_epoch = epoch, "[SessionController] New input");
    }

    pub async fn delete_entry(&self, id: EntryId) -> Result<()> {
        self.history.remove(id).await.map(|_| ())
    }

    async fn render(&self, epoch: u64, session: &Session, is_final: bool) {
        let mut slot = self.slot.lock().await;
        if slot.refresh(epoch, session) {
            self.sink.render(session.accumulated_text(), is_final);
        }
    }

    async fn publish(&self, epoch: u64, session: &Session) {
        let mut slot = self.slot.lock().await;
        if slot.refresh(epoch, session) {
            self.sink.state_changed(session.state());
        }
    }
}
