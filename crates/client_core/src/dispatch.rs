//! Turns gesture outcomes and explicit triggers into queue decisions.

use shared::domain::SwipeAction;
use tracing::debug;

use crate::{
    deck::{Candidate, CardQueue, Resolution},
    gesture::{DragFeedback, GestureOutcome, GestureSignal, PointerEvent, SwipeDirection},
};

pub fn action_for(direction: SwipeDirection) -> SwipeAction {
    match direction {
        SwipeDirection::Right => SwipeAction::Apply,
        SwipeDirection::Left => SwipeAction::Skip,
        SwipeDirection::Up => SwipeAction::Save,
    }
}

/// Short-lived feedback raised after a decision. Purely presentational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgement {
    Applied { company: String },
    Saved,
    Skipped,
}

impl Acknowledgement {
    fn for_action(action: SwipeAction, company: &str) -> Self {
        match action {
            SwipeAction::Apply => Self::Applied {
                company: company.to_string(),
            },
            SwipeAction::Save => Self::Saved,
            SwipeAction::Skip => Self::Skipped,
        }
    }

    /// Text to show the user; skips are silent.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Applied { company } => Some(format!("Applied to {company}! 🎉")),
            Self::Saved => Some("Saved for later ⭐".to_string()),
            Self::Skipped => None,
        }
    }
}

pub trait Acknowledger {
    fn acknowledge(&mut self, acknowledgement: Acknowledgement);
}

impl<F> Acknowledger for F
where
    F: FnMut(Acknowledgement),
{
    fn acknowledge(&mut self, acknowledgement: Acknowledgement) {
        self(acknowledgement)
    }
}

/// What the host should render after feeding the dispatcher an input.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckUpdate<T> {
    Idle,
    Dragging(DragFeedback),
    /// Released without a decision; reset the card transform.
    SnappedBack,
    Resolved(Resolution<T>),
}

#[derive(Debug)]
pub struct ActionDispatcher<T, A> {
    deck: CardQueue<T>,
    acknowledger: A,
}

impl<T, A> ActionDispatcher<T, A>
where
    T: Candidate + Clone,
    A: Acknowledger,
{
    pub fn new(deck: CardQueue<T>, acknowledger: A) -> Self {
        Self { deck, acknowledger }
    }

    pub fn deck(&self) -> &CardQueue<T> {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut CardQueue<T> {
        &mut self.deck
    }

    pub fn acknowledger(&self) -> &A {
        &self.acknowledger
    }

    pub fn acknowledger_mut(&mut self) -> &mut A {
        &mut self.acknowledger
    }

    /// Routes a pointer event to the front card's interpreter.
    pub fn on_pointer(&mut self, event: PointerEvent) -> DeckUpdate<T> {
        let signal = self
            .deck
            .front_gesture_mut()
            .and_then(|gesture| gesture.handle(event));
        match signal {
            None => DeckUpdate::Idle,
            Some(GestureSignal::Feedback(feedback)) => DeckUpdate::Dragging(feedback),
            Some(GestureSignal::Outcome(outcome)) => self.on_outcome(outcome),
        }
    }

    pub fn on_outcome(&mut self, outcome: GestureOutcome) -> DeckUpdate<T> {
        match outcome {
            GestureOutcome::Released => DeckUpdate::SnappedBack,
            GestureOutcome::Swiped(direction) => self.decide(action_for(direction)),
        }
    }

    /// Resolves the front card as if it had been swiped in `direction`.
    /// Used by buttons and keyboard shortcuts.
    pub fn trigger(&mut self, direction: SwipeDirection) -> DeckUpdate<T> {
        let outcome = self
            .deck
            .front_gesture_mut()
            .and_then(|gesture| gesture.trigger(direction));
        match outcome {
            Some(outcome) => self.on_outcome(outcome),
            None => DeckUpdate::Idle,
        }
    }

    pub fn decide(&mut self, action: SwipeAction) -> DeckUpdate<T> {
        let Some(resolution) = self.deck.resolve(action) else {
            debug!(%action, "decision ignored: queue exhausted");
            return DeckUpdate::Idle;
        };
        self.acknowledger.acknowledge(Acknowledgement::for_action(
            resolution.action,
            resolution.item.label(),
        ));
        DeckUpdate::Resolved(resolution)
    }
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
