//! The "current session" slot shared by the controller and history.
//!
//! Every replacement bumps the epoch. A generation run remembers the epoch it
//! started under and may only write to the display while that epoch is still
//! current, so a superseded run keeps persisting but goes silent.

use quill_core::entry::EntryId;
use quill_core::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type SharedSlot = Arc<Mutex<ActiveSlot>>;

#[derive(Debug, Default)]
pub struct ActiveSlot {
    epoch: u64,
    session: Option<Session>,
}

impl ActiveSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSlot {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Installs `session` as the active one and returns its epoch.
    pub fn begin(&mut self, session: Session) -> u64 {
        self.epoch += 1;
        self.session = Some(session);
        self.epoch
    }

    /// Empties the slot. Any run still in flight becomes stale.
    pub fn clear(&mut self) -> u64 {
        self.epoch += 1;
        self.session = None;
        self.epoch
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// Replaces the snapshot if `epoch` is still current. Returns whether it
    /// was.
    pub fn refresh(&mut self, epoch: u64, session: &Session) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        self.session = Some(session.clone());
        true
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn active_id(&self) -> Option<EntryId> {
        self.session.as_ref().and_then(Session::id)
    }
}
