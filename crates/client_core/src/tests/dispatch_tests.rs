use super::*;
use std::sync::{Arc, Mutex};

use shared::{
    domain::{JobId, SwipeAction},
    protocol::JobPosting,
};

use crate::{
    gesture::Point,
    notify::DecisionNotifier,
    test_support::posting,
};

#[derive(Default)]
struct CountingNotifier {
    calls: Mutex<Vec<(JobId, SwipeAction)>>,
}

impl DecisionNotifier for CountingNotifier {
    fn notify_decision(&self, job_id: JobId, action: SwipeAction) {
        self.calls.lock().expect("calls lock").push((job_id, action));
    }
}

type Toasts = Vec<Acknowledgement>;

fn dispatcher(
    companies: &[&str],
) -> (
    ActionDispatcher<JobPosting, impl FnMut(Acknowledgement)>,
    Arc<CountingNotifier>,
    Arc<Mutex<Toasts>>,
) {
    let notifier = Arc::new(CountingNotifier::default());
    let mut deck: CardQueue<JobPosting> = CardQueue::new(notifier.clone());
    deck.load(
        companies
            .iter()
            .enumerate()
            .map(|(index, company)| posting(index as i64 + 1, company))
            .collect(),
    );
    let toasts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&toasts);
    let acknowledger = move |ack: Acknowledgement| sink.lock().expect("toasts lock").push(ack);
    (ActionDispatcher::new(deck, acknowledger), notifier, toasts)
}

fn swipe<A: Acknowledger>(
    dispatcher: &mut ActionDispatcher<JobPosting, A>,
    to: Point,
) -> DeckUpdate<JobPosting> {
    dispatcher.on_pointer(PointerEvent::Down(Point::new(0.0, 0.0)));
    dispatcher.on_pointer(PointerEvent::Move(to));
    dispatcher.on_pointer(PointerEvent::Up)
}

#[test]
fn directions_map_to_actions() {
    assert_eq!(action_for(SwipeDirection::Right), SwipeAction::Apply);
    assert_eq!(action_for(SwipeDirection::Left), SwipeAction::Skip);
    assert_eq!(action_for(SwipeDirection::Up), SwipeAction::Save);
}

#[test]
fn acknowledgement_messages_match_decisions() {
    assert_eq!(
        Acknowledgement::Applied {
            company: "Acme".to_string()
        }
        .message()
        .as_deref(),
        Some("Applied to Acme! 🎉")
    );
    assert_eq!(
        Acknowledgement::Saved.message().as_deref(),
        Some("Saved for later ⭐")
    );
    assert_eq!(Acknowledgement::Skipped.message(), None);
}

#[test]
fn right_drag_applies_and_acknowledges_company() {
    let (mut dispatcher, notifier, toasts) = dispatcher(&["Acme", "Globex"]);

    let update = swipe(&mut dispatcher, Point::new(150.0, 10.0));
    match update {
        DeckUpdate::Resolved(resolution) => {
            assert_eq!(resolution.action, SwipeAction::Apply);
            assert_eq!(resolution.item.company, "Acme");
        }
        other => panic!("expected resolution, got {other:?}"),
    }

    assert_eq!(dispatcher.deck().cursor(), 1);
    assert_eq!(
        *toasts.lock().expect("toasts lock"),
        vec![Acknowledgement::Applied {
            company: "Acme".to_string()
        }]
    );
    assert_eq!(
        *notifier.calls.lock().expect("calls lock"),
        vec![(JobId(1), SwipeAction::Apply)]
    );
}

#[test]
fn short_drag_snaps_back_without_deciding() {
    let (mut dispatcher, notifier, toasts) = dispatcher(&["Acme"]);

    assert_eq!(
        dispatcher.on_pointer(PointerEvent::Down(Point::new(0.0, 0.0))),
        DeckUpdate::Idle
    );
    match dispatcher.on_pointer(PointerEvent::Move(Point::new(60.0, -60.0))) {
        DeckUpdate::Dragging(feedback) => {
            assert_eq!(feedback.offset, Point::new(60.0, -60.0));
            assert!(feedback.hint.is_some());
        }
        other => panic!("expected drag feedback, got {other:?}"),
    }
    assert_eq!(
        dispatcher.on_pointer(PointerEvent::Up),
        DeckUpdate::SnappedBack
    );

    assert_eq!(dispatcher.deck().cursor(), 0);
    assert!(toasts.lock().expect("toasts lock").is_empty());
    assert!(notifier.calls.lock().expect("calls lock").is_empty());
}

#[test]
fn up_drag_saves_and_skip_is_silent() {
    let (mut dispatcher, _, toasts) = dispatcher(&["Acme", "Globex", "Initech"]);

    swipe(&mut dispatcher, Point::new(20.0, -150.0));
    swipe(&mut dispatcher, Point::new(-180.0, 0.0));

    let counters = dispatcher.deck().counters();
    assert_eq!((counters.saved, counters.skipped), (1, 1));
    let messages: Vec<_> = toasts
        .lock()
        .expect("toasts lock")
        .iter()
        .filter_map(Acknowledgement::message)
        .collect();
    assert_eq!(messages, vec!["Saved for later ⭐".to_string()]);
}

#[test]
fn keyboard_triggers_follow_the_same_path() {
    let (mut dispatcher, notifier, _) = dispatcher(&["Acme", "Globex", "Initech"]);

    dispatcher.trigger(SwipeDirection::Right);
    dispatcher.trigger(SwipeDirection::Up);
    dispatcher.trigger(SwipeDirection::Left);

    assert_eq!(
        *notifier.calls.lock().expect("calls lock"),
        vec![
            (JobId(1), SwipeAction::Apply),
            (JobId(2), SwipeAction::Save),
            (JobId(3), SwipeAction::Skip),
        ]
    );
    assert!(dispatcher.deck().is_exhausted());
}

#[test]
fn triggers_on_an_exhausted_deck_are_ignored() {
    let (mut dispatcher, notifier, toasts) = dispatcher(&["Acme"]);
    dispatcher.trigger(SwipeDirection::Left);

    assert_eq!(dispatcher.trigger(SwipeDirection::Right), DeckUpdate::Idle);
    assert_eq!(dispatcher.decide(SwipeAction::Apply), DeckUpdate::Idle);
    assert_eq!(
        dispatcher.on_pointer(PointerEvent::Down(Point::new(0.0, 0.0))),
        DeckUpdate::Idle
    );
    assert_eq!(notifier.calls.lock().expect("calls lock").len(), 1);
    assert_eq!(toasts.lock().expect("toasts lock").len(), 1);
}

#[test]
fn trigger_discards_a_drag_in_progress() {
    let (mut dispatcher, _, _) = dispatcher(&["Acme", "Globex"]);
    dispatcher.on_pointer(PointerEvent::Down(Point::new(0.0, 0.0)));
    dispatcher.on_pointer(PointerEvent::Move(Point::new(40.0, 0.0)));

    dispatcher.trigger(SwipeDirection::Left);
    assert_eq!(dispatcher.deck().cursor(), 1);
    assert_eq!(dispatcher.on_pointer(PointerEvent::Up), DeckUpdate::Idle);
    assert_eq!(dispatcher.deck().cursor(), 1);
}
