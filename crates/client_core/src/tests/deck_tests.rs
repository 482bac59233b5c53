use super::*;
use std::{cell::Cell, sync::Mutex};

use crate::{
    gesture::{GestureOutcome, Point, SwipeDirection},
    notify::SpawnedDecisionNotifier,
    test_support::{posting, Failure, ScriptedBoard},
};

#[derive(Default)]
struct RecordingNotifier {
    decisions: Mutex<Vec<(JobId, SwipeAction)>>,
}

impl RecordingNotifier {
    fn decisions(&self) -> Vec<(JobId, SwipeAction)> {
        self.decisions.lock().expect("decisions lock").clone()
    }
}

impl DecisionNotifier for RecordingNotifier {
    fn notify_decision(&self, job_id: JobId, action: SwipeAction) {
        self.decisions
            .lock()
            .expect("decisions lock")
            .push((job_id, action));
    }
}

fn postings(count: i64) -> Vec<JobPosting> {
    (1..=count)
        .map(|id| posting(id, &format!("Company {id}")))
        .collect()
}

fn deck_with(count: i64) -> (CardQueue<JobPosting>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut deck: CardQueue<JobPosting> = CardQueue::new(notifier.clone());
    deck.load(postings(count));
    (deck, notifier)
}

fn ids(window: &[JobPosting]) -> Vec<i64> {
    window.iter().map(|job| job.id.0).collect()
}

#[test]
fn load_shows_first_three_and_wires_front_card() {
    let (deck, _) = deck_with(5);
    assert_eq!(ids(deck.visible_window()), vec![1, 2, 3]);
    assert_eq!(deck.cursor(), 0);
    assert!(deck.front_gesture().is_some());

    match deck.view() {
        DeckView::Cards { front, behind } => {
            assert_eq!(front.id, JobId(1));
            assert_eq!(ids(behind), vec![2, 3]);
        }
        DeckView::Exhausted => panic!("deck should not be exhausted"),
    }
}

#[test]
fn window_shrinks_near_the_end() {
    let (mut deck, _) = deck_with(4);
    deck.resolve(SwipeAction::Skip);
    deck.resolve(SwipeAction::Skip);
    assert_eq!(ids(deck.visible_window()), vec![3, 4]);
    deck.resolve(SwipeAction::Skip);
    assert_eq!(ids(deck.visible_window()), vec![4]);
    assert_eq!(deck.remaining(), 1);
}

#[test]
fn five_mixed_decisions_exhaust_the_queue() {
    let (mut deck, notifier) = deck_with(5);
    for action in [
        SwipeAction::Apply,
        SwipeAction::Skip,
        SwipeAction::Save,
        SwipeAction::Apply,
        SwipeAction::Skip,
    ] {
        assert!(deck.resolve(action).is_some());
    }

    assert_eq!(
        deck.counters(),
        SessionCounters {
            viewed: 5,
            applied: 2,
            saved: 1,
            skipped: 2,
        }
    );
    assert!(deck.visible_window().is_empty());
    assert!(deck.is_exhausted());
    assert_eq!(deck.view(), DeckView::Exhausted);
    assert!(deck.front_gesture().is_none());
    assert_eq!(notifier.decisions().len(), 5);
    assert_eq!(notifier.decisions()[2], (JobId(3), SwipeAction::Save));
}

#[test]
fn resolving_an_exhausted_queue_does_nothing() {
    let (mut deck, notifier) = deck_with(1);
    deck.resolve(SwipeAction::Apply);
    let revision = deck.revision();
    let counters = deck.counters();

    assert!(deck.resolve(SwipeAction::Save).is_none());
    assert_eq!(deck.cursor(), 1);
    assert_eq!(deck.counters(), counters);
    assert_eq!(deck.revision(), revision);
    assert_eq!(notifier.decisions().len(), 1);
}

#[test]
fn cursor_only_moves_forward_one_step_per_decision() {
    let (mut deck, _) = deck_with(3);
    let mut previous = deck.cursor();
    for _ in 0..6 {
        deck.resolve(SwipeAction::Skip);
        assert!(deck.cursor() >= previous);
        assert!(deck.cursor() - previous <= 1);
        assert!(deck.cursor() <= deck.len());
        previous = deck.cursor();
    }
    assert_eq!(deck.cursor(), 3);
}

#[test]
fn load_rewinds_cursor_but_keeps_counters() {
    let (mut deck, _) = deck_with(2);
    deck.resolve(SwipeAction::Apply);
    deck.load(postings(3));
    assert_eq!(deck.cursor(), 0);
    assert_eq!(deck.counters().applied, 1);

    deck.reset();
    assert_eq!(deck.counters(), SessionCounters::default());
    assert!(deck.is_empty());
}

#[test]
fn empty_load_is_immediately_exhausted() {
    let (deck, _) = deck_with(0);
    assert!(deck.is_exhausted());
    assert_eq!(deck.view(), DeckView::Exhausted);
}

#[test]
fn advancing_replaces_the_front_interpreter() {
    let (mut deck, _) = deck_with(2);
    let gesture = deck.front_gesture_mut().expect("front gesture");
    assert!(gesture.begin(Point::new(0.0, 0.0)));
    gesture.update(Point::new(30.0, 0.0));

    deck.resolve(SwipeAction::Skip);
    let gesture = deck.front_gesture().expect("next front gesture");
    assert!(!gesture.is_active());
    assert!(!gesture.is_disposed());
}

#[test]
fn disposing_mid_drag_emits_nothing_and_keeps_cursor() {
    let (mut deck, notifier) = deck_with(3);
    let gesture = deck.front_gesture_mut().expect("front gesture");
    assert!(gesture.begin(Point::new(0.0, 0.0)));
    gesture.update(Point::new(250.0, 0.0));

    deck.dispose();

    assert!(deck.front_gesture().is_none());
    assert_eq!(deck.cursor(), 0);
    assert_eq!(deck.counters(), SessionCounters::default());
    assert!(notifier.decisions().is_empty());
}

#[test]
fn window_size_and_exempt_region_are_configurable() {
    let pressed = Rc::new(Cell::new(false));
    let probe = Rc::clone(&pressed);
    let mut deck: CardQueue<JobPosting> = CardQueue::new(Arc::new(RecordingNotifier::default()))
        .with_window_size(2)
        .with_exempt_region(Rc::new(move |point: Point| {
            probe.set(true);
            point.y > 400.0
        }));
    deck.load(postings(5));

    assert_eq!(ids(deck.visible_window()), vec![1, 2]);
    let gesture = deck.front_gesture_mut().expect("front gesture");
    assert!(!gesture.begin(Point::new(10.0, 450.0)));
    assert!(pressed.get());
    assert!(gesture.begin(Point::new(10.0, 10.0)));
}

#[test]
fn gesture_outcome_maps_to_decision_through_front_card() {
    let (mut deck, _) = deck_with(2);
    let gesture = deck.front_gesture_mut().expect("front gesture");
    gesture.begin(Point::new(0.0, 0.0));
    gesture.update(Point::new(150.0, 10.0));
    assert_eq!(
        gesture.end(),
        Some(GestureOutcome::Swiped(SwipeDirection::Right))
    );
    assert_eq!(deck.cursor(), 0, "outcomes alone never move the cursor");
}

#[tokio::test]
async fn failing_delivery_never_blocks_advancement() {
    let board = Arc::new(ScriptedBoard {
        swipe_failure: Some(Failure::Unavailable),
        ..ScriptedBoard::default()
    });
    let notifier = Arc::new(SpawnedDecisionNotifier::new(
        board.clone(),
        tokio::runtime::Handle::current(),
    ));
    let mut deck: CardQueue<JobPosting> = CardQueue::new(notifier.clone());
    deck.load(postings(3));

    deck.resolve(SwipeAction::Apply);
    deck.resolve(SwipeAction::Save);
    assert_eq!(deck.cursor(), 2);
    assert_eq!(ids(deck.visible_window()), vec![3]);

    notifier.flush().await;
    assert_eq!(board.recorded_swipes().len(), 2);
    assert_eq!(deck.cursor(), 2);
}
