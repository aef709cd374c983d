//! Debounced autosave for projects whose `autoSave` setting is on.
//!
//! Every edit bumps a revision number. A save carries the revision it was
//! built from, and only that revision is marked stored when it completes, so
//! edits made while a save is in flight stay dirty.

use chrono::{DateTime, Duration, Utc};

/// Quiet period after the last edit before an autosave fires
pub const AUTOSAVE_DELAY_MS: i64 = 2_000;

#[derive(Debug, Clone)]
pub struct AutosaveTimer {
    delay: Duration,
    revision: u64,
    saved_revision: u64,
    last_touch: Option<DateTime<Utc>>,
    /// Revision handed to an autosave that has not completed yet
    in_flight: Option<u64>,
}

impl Default for AutosaveTimer {
    fn default() -> Self {
        Self::new(Duration::milliseconds(AUTOSAVE_DELAY_MS))
    }
}

impl AutosaveTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            revision: 0,
            saved_revision: 0,
            last_touch: None,
            in_flight: None,
        }
    }

    /// Each edit restarts the quiet period
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.revision += 1;
        self.last_touch = Some(now);
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Dirty, quiet for the full delay, and not already being saved
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_dirty()
            && self.in_flight != Some(self.revision)
            && self
                .last_touch
                .is_some_and(|since| now - since >= self.delay)
    }

    /// Snapshot the current revision for an autosave request
    pub fn begin_save(&mut self) -> u64 {
        self.in_flight = Some(self.revision);
        self.revision
    }

    /// A save built from `revision` was stored. Later edits stay dirty.
    pub fn saved(&mut self, revision: u64) {
        self.saved_revision = self.saved_revision.max(revision.min(self.revision));
        if self.in_flight.is_some_and(|pending| pending <= revision) {
            self.in_flight = None;
        }
    }

    /// Everything current counts as stored
    pub fn clear(&mut self) {
        self.saved_revision = self.revision;
        self.in_flight = None;
    }
}
