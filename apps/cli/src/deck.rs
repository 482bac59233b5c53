use std::collections::HashMap;

use anyhow::Result;
use client_core::{
    card::{
        fetch_explanation_within, CardPresentation, ExplanationState, ExplanationView,
        EXPLANATION_WAIT,
    },
    deck::DeckView,
    dispatch::{Acknowledgement, ActionDispatcher, DeckUpdate},
    feed::{load_feed, FeedSource},
    gesture::SwipeDirection,
    JobSwipeClient,
};
use shared::domain::JobId;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    runtime::Handle,
};
use tracing::{debug, warn};

use crate::{checked, render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckInput {
    Swipe(SwipeDirection),
    Help,
    Quit,
}

/// Maps one line of input to a deck command. Arrow keys arrive as their
/// ANSI escape sequences when the terminal is in line mode.
pub fn parse_input(line: &str) -> Option<DeckInput> {
    match line.trim().to_ascii_lowercase().as_str() {
        "a" | "apply" | "\x1b[c" => Some(DeckInput::Swipe(SwipeDirection::Right)),
        "s" | "save" | "\x1b[b" => Some(DeckInput::Swipe(SwipeDirection::Up)),
        "k" | "skip" | "\x1b[d" => Some(DeckInput::Swipe(SwipeDirection::Left)),
        "?" | "h" | "help" => Some(DeckInput::Help),
        "q" | "quit" | "exit" => Some(DeckInput::Quit),
        _ => None,
    }
}

const HELP: &str = "a/→ apply   s/↓ save   k/← skip   q quit";

pub async fn run(client: &JobSwipeClient) -> Result<()> {
    let board = client.board();
    let feed = checked(client, load_feed(board.as_ref()).await).await?;
    // Sample ids do not exist on the backend.
    let live = feed.source == FeedSource::Live;
    if !live {
        println!("(job board unreachable, showing sample jobs)");
    }

    let notifier = client.decision_notifier(Handle::current());
    let mut deck = client.new_deck(notifier.clone());
    deck.load(feed.jobs);
    let mut dispatcher = ActionDispatcher::new(deck, |ack: Acknowledgement| {
        if let Some(message) = ack.message() {
            println!("{message}");
        }
    });
    println!("{HELP}");

    let mut explanations: HashMap<JobId, ExplanationView> = HashMap::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let (mut card, behind) = match dispatcher.deck().view() {
            DeckView::Cards { front, behind } => {
                (CardPresentation::from_posting(front), behind.len())
            }
            DeckView::Exhausted => {
                println!();
                println!("No more jobs. Check back later for new matches!");
                break;
            }
        };
        if card.needs_explanation() {
            let view = match explanations.get(&card.job_id) {
                Some(view) => view.clone(),
                None if !live => ExplanationView::fallback(),
                None => {
                    let view =
                        fetch_explanation_within(board.as_ref(), card.job_id, EXPLANATION_WAIT)
                            .await;
                    explanations.insert(card.job_id, view.clone());
                    view
                }
            };
            card.explanation = ExplanationState::Ready(view);
        }
        render::print_card(&card, behind);

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_input(&line) {
            Some(DeckInput::Swipe(direction)) => {
                if let DeckUpdate::Resolved(resolution) = dispatcher.trigger(direction) {
                    debug!(job_id = %resolution.item.id, action = %resolution.action, "card resolved");
                }
            }
            Some(DeckInput::Help) => println!("{HELP}"),
            Some(DeckInput::Quit) => break,
            None => println!("Unknown input. {HELP}"),
        }
    }

    let counters = dispatcher.deck().counters();
    dispatcher.deck_mut().dispose();
    println!("{}", render::stats_line(&counters));

    notifier.flush().await;
    if let Err(err) = client.record_viewed(counters.viewed) {
        warn!("failed to record viewed total: {err:#}");
    }
    Ok(())
}
