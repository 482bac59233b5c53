//! The card queue: an ordered list of candidates and a cursor into it.

use std::{fmt, rc::Rc, sync::Arc};

use shared::{
    domain::{JobId, SwipeAction},
    protocol::JobPosting,
};
use tracing::{debug, info};

use crate::{
    gesture::{ExemptRegion, GestureConfig, GestureInterpreter},
    notify::DecisionNotifier,
};

pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Anything that can sit in the queue. Only the identifier matters to the
/// queue; the label is used for acknowledgements.
pub trait Candidate {
    fn candidate_id(&self) -> JobId;
    fn label(&self) -> &str;
}

impl Candidate for JobPosting {
    fn candidate_id(&self) -> JobId {
        self.id
    }

    fn label(&self) -> &str {
        &self.company
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounters {
    pub viewed: u64,
    pub applied: u64,
    pub saved: u64,
    pub skipped: u64,
}

impl SessionCounters {
    fn record(&mut self, action: SwipeAction) {
        self.viewed += 1;
        match action {
            SwipeAction::Apply => self.applied += 1,
            SwipeAction::Save => self.saved += 1,
            SwipeAction::Skip => self.skipped += 1,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum DeckView<'a, T> {
    /// `front` is interactive; `behind` are the stacked cards after it, nearest first.
    Cards { front: &'a T, behind: &'a [T] },
    Exhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<T> {
    pub item: T,
    pub action: SwipeAction,
}

#[derive(Debug)]
struct ActiveCard {
    job_id: JobId,
    gesture: GestureInterpreter,
}

pub struct CardQueue<T> {
    items: Vec<T>,
    cursor: usize,
    window_size: usize,
    counters: SessionCounters,
    gesture_config: GestureConfig,
    exempt: Option<ExemptRegion>,
    active: Option<ActiveCard>,
    notifier: Arc<dyn DecisionNotifier>,
    revision: u64,
}

impl<T> fmt::Debug for CardQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardQueue")
            .field("len", &self.items.len())
            .field("cursor", &self.cursor)
            .field("window_size", &self.window_size)
            .field("counters", &self.counters)
            .field("active", &self.active)
            .field("revision", &self.revision)
            .finish()
    }
}

impl<T: Candidate + Clone> CardQueue<T> {
    pub fn new(notifier: Arc<dyn DecisionNotifier>) -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            window_size: DEFAULT_WINDOW_SIZE,
            counters: SessionCounters::default(),
            gesture_config: GestureConfig::default(),
            exempt: None,
            active: None,
            notifier,
            revision: 0,
        }
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size.max(1);
        self
    }

    pub fn with_gesture_config(mut self, config: GestureConfig) -> Self {
        self.gesture_config = config;
        self.attach_front();
        self
    }

    /// Region of the front card that never starts a drag (its action buttons).
    pub fn with_exempt_region(mut self, exempt: ExemptRegion) -> Self {
        self.exempt = Some(exempt);
        self.attach_front();
        self
    }

    /// Replaces the candidates and rewinds the cursor. Counters are kept.
    pub fn load(&mut self, items: Vec<T>) {
        info!(count = items.len(), "loading card queue");
        self.items = items;
        self.cursor = 0;
        self.attach_front();
        self.revision += 1;
    }

    /// Full reinitialization: no candidates, zeroed counters.
    pub fn reset(&mut self) {
        self.items.clear();
        self.cursor = 0;
        self.counters = SessionCounters::default();
        self.attach_front();
        self.revision += 1;
    }

    pub fn visible_window(&self) -> &[T] {
        let start = self.cursor.min(self.items.len());
        let end = (start + self.window_size).min(self.items.len());
        &self.items[start..end]
    }

    pub fn view(&self) -> DeckView<'_, T> {
        match self.visible_window().split_first() {
            Some((front, behind)) => DeckView::Cards { front, behind },
            None => DeckView::Exhausted,
        }
    }

    pub fn front(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    /// The interpreter wired to the front card, if there is one.
    pub fn front_gesture_mut(&mut self) -> Option<&mut GestureInterpreter> {
        self.active.as_mut().map(|active| &mut active.gesture)
    }

    pub fn front_gesture(&self) -> Option<&GestureInterpreter> {
        self.active.as_ref().map(|active| &active.gesture)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.items.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.items.len().saturating_sub(self.cursor)
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    /// Bumped on every change the host must re-render.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies `action` to the front card and advances past it.
    ///
    /// Does nothing once the queue is exhausted. The backend is told out of
    /// band; whether that delivery succeeds has no bearing on the queue.
    pub fn resolve(&mut self, action: SwipeAction) -> Option<Resolution<T>> {
        let item = self.items.get(self.cursor)?.clone();
        let job_id = item.candidate_id();

        self.counters.record(action);
        self.cursor += 1;
        self.attach_front();
        self.revision += 1;
        debug!(%job_id, %action, cursor = self.cursor, "card resolved");

        self.notifier.notify_decision(job_id, action);
        Some(Resolution { item, action })
    }

    /// Detaches the front card's interpreter, discarding any drag in flight.
    /// The cursor and counters stay where they are.
    pub fn dispose(&mut self) {
        if let Some(mut active) = self.active.take() {
            debug!(job_id = %active.job_id, "disposing card gesture");
            active.gesture.dispose();
        }
    }

    fn attach_front(&mut self) {
        self.dispose();
        let Some(front) = self.items.get(self.cursor) else {
            return;
        };
        let mut gesture = GestureInterpreter::new(self.gesture_config);
        if let Some(exempt) = &self.exempt {
            gesture = gesture.with_exempt_region(Rc::clone(exempt));
        }
        self.active = Some(ActiveCard {
            job_id: front.candidate_id(),
            gesture,
        });
    }
}

#[cfg(test)]
#[path = "tests/deck_tests.rs"]
mod tests;
