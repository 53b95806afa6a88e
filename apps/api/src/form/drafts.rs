//! Open editing sessions, keyed by draft id. Each slot owns one `FormCollector` and the
//! preview mounted from it, which is the export target for that draft.
//!
//! The registry lock is synchronous and never held across an `.await`: callers take what
//! they need inside `with` and do async work outside it.
//!
//! Drafts untouched for longer than the idle timeout are evicted, lazily on access and by
//! the background sweeper. A draft in the middle of a submit is never evicted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::form::collector::{FormCollector, FormState};
use crate::render::{RenderedView, Viewport};

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Draft {0} not found")]
    NotFound(Uuid),
}

/// Default for `DraftRegistry::new`.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug)]
pub struct DraftSlot {
    pub form: FormCollector,
    preview: Option<(Viewport, RenderedView)>,
    touched: Instant,
}

impl Default for DraftSlot {
    fn default() -> Self {
        Self {
            form: FormCollector::new(),
            preview: None,
            touched: Instant::now(),
        }
    }
}

impl DraftSlot {
    fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        self.form.state() != FormState::Submitting
            && now.saturating_duration_since(self.touched) > timeout
    }

    /// Renders the current record at `viewport` and mounts it as the export target.
    pub fn mount_preview(&mut self, viewport: Viewport) -> &RenderedView {
        let view = RenderedView::mount(self.form.record().clone(), viewport);
        &self.preview.insert((viewport, view)).1
    }

    /// Re-renders an already mounted preview after the record changed.
    pub fn refresh_preview(&mut self) {
        if let Some(viewport) = self.preview.as_ref().map(|(viewport, _)| *viewport) {
            self.mount_preview(viewport);
        }
    }

    pub fn preview(&self) -> Option<&RenderedView> {
        self.preview.as_ref().map(|(_, view)| view)
    }
}

#[derive(Clone)]
pub struct DraftRegistry {
    slots: Arc<Mutex<HashMap<Uuid, DraftSlot>>>,
    idle_timeout: Duration,
}

impl Default for DraftRegistry {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl DraftRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, DraftSlot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a fresh draft and returns its id. Idle drafts are evicted first.
    pub fn open(&self) -> Uuid {
        self.evict_idle();
        let id = Uuid::new_v4();
        self.lock().insert(id, DraftSlot::default());
        id
    }

    /// Runs `f` against the draft under the registry lock and marks it as touched.
    /// An idle draft is evicted and reported as missing.
    pub fn with<R>(&self, id: Uuid, f: impl FnOnce(&mut DraftSlot) -> R) -> Result<R, DraftError> {
        let now = Instant::now();
        let mut slots = self.lock();
        let idle = slots
            .get(&id)
            .ok_or(DraftError::NotFound(id))?
            .is_idle(now, self.idle_timeout);
        if idle {
            slots.remove(&id);
            debug!(draft_id = %id, "Evicted idle draft on access");
            return Err(DraftError::NotFound(id));
        }

        let slot = slots.get_mut(&id).ok_or(DraftError::NotFound(id))?;
        slot.touched = now;
        Ok(f(slot))
    }

    pub fn discard(&self, id: Uuid) -> Result<(), DraftError> {
        self.lock()
            .remove(&id)
            .map(|_| ())
            .ok_or(DraftError::NotFound(id))
    }

    /// Drops every draft idle for longer than the timeout. Returns how many were dropped.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut slots = self.lock();
        let before = slots.len();
        slots.retain(|_, slot| !slot.is_idle(now, self.idle_timeout));
        before - slots.len()
    }

    /// Runs `evict_idle` every `every` until the runtime shuts down.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let drafts = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = drafts.evict_idle();
                if evicted > 0 {
                    debug!(evicted, remaining = drafts.len(), "Swept idle drafts");
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
