use super::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use shared::domain::ChatSender;

use crate::test_support::{Failure, ScriptedBoard};

fn message(sender: ChatSender, text: &str) -> ChatMessage {
    ChatMessage {
        id: None,
        sender_type: sender,
        message: text.to_string(),
        created_at: Some("2024-05-01 10:00:00".to_string()),
    }
}

#[test]
fn refresh_only_takes_longer_snapshots() {
    let mut thread = ChatThread::new(JobId(3));
    assert!(thread.refresh(vec![message(ChatSender::User, "hi")]));
    assert!(!thread.refresh(vec![message(ChatSender::User, "edited")]));
    assert_eq!(thread.messages()[0].message, "hi");
    assert!(!thread.refresh(Vec::new()));
    assert!(thread.refresh(vec![
        message(ChatSender::User, "hi"),
        message(ChatSender::Employer, "hello"),
    ]));
    assert_eq!(thread.messages().len(), 2);
}

#[test]
fn drafts_are_trimmed_and_blanks_refused() {
    assert_eq!(prepare_message("  hello \n"), Some("hello".to_string()));
    assert_eq!(prepare_message(" \t "), None);
}

#[tokio::test]
async fn sending_clears_draft_and_reloads_thread() {
    let board = ScriptedBoard::default();
    let mut thread = ChatThread::new(JobId(5));
    let mut draft = "  When can we talk?  ".to_string();

    assert!(send_message(&board, &mut thread, &mut draft)
        .await
        .expect("send"));
    assert!(draft.is_empty());
    assert_eq!(
        *board.sent.lock().expect("sent lock"),
        vec!["When can we talk?".to_string()]
    );
    assert_eq!(thread.messages().len(), 2);
    assert_eq!(thread.messages()[1].sender_type, ChatSender::Employer);
}

#[tokio::test]
async fn blank_draft_is_not_sent() {
    let board = ScriptedBoard::default();
    let mut thread = ChatThread::new(JobId(5));
    let mut draft = "   ".to_string();

    assert!(!send_message(&board, &mut thread, &mut draft)
        .await
        .expect("refused"));
    assert!(board.sent.lock().expect("sent lock").is_empty());
}

#[tokio::test]
async fn failed_send_restores_draft() {
    let board = ScriptedBoard::default();
    board.fail_chat(Some(Failure::Unavailable));
    let mut thread = ChatThread::new(JobId(5));
    let mut draft = "ping".to_string();

    let err = send_message(&board, &mut thread, &mut draft)
        .await
        .expect_err("send fails");
    assert!(!err.requires_reauth());
    assert_eq!(draft, "ping");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn poller_reports_messages_until_dropped() {
    let board = Arc::new(ScriptedBoard::default());
    board.push_chat(ChatSender::Employer, "Thanks for applying");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let poller = ChatPoller::spawn(
        &Handle::current(),
        board.clone(),
        JobId(8),
        Duration::from_millis(20),
        move |update| {
            if let ChatUpdate::Messages(messages) = update {
                sink.lock().expect("seen lock").push(messages.len());
            }
            ControlFlow::Continue(())
        },
    );
    assert_eq!(poller.job_id(), JobId(8));

    tokio::time::sleep(Duration::from_millis(150)).await;
    drop(poller);
    let polls = board.chat_fetches.load(Ordering::SeqCst);
    assert!(polls >= 2, "expected repeated polls, saw {polls}");
    assert!(seen.lock().expect("seen lock").iter().all(|count| *count == 1));

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(board.chat_fetches.load(Ordering::SeqCst) <= polls + 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn poller_skips_rejected_sessions_and_reports_outages() {
    let board = Arc::new(ScriptedBoard::default());
    board.fail_chat(Some(Failure::Unauthorized));
    let failures = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&failures);

    let poller = ChatPoller::spawn(
        &Handle::current(),
        board.clone(),
        JobId(8),
        Duration::from_millis(20),
        move |update| {
            if matches!(update, ChatUpdate::Failed(_)) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            ControlFlow::Continue(())
        },
    );

    tokio::time::sleep(Duration::from_millis(90)).await;
    assert!(board.chat_fetches.load(Ordering::SeqCst) >= 1);
    assert_eq!(failures.load(Ordering::SeqCst), 0);

    board.fail_chat(Some(Failure::Unavailable));
    tokio::time::sleep(Duration::from_millis(90)).await;
    assert!(failures.load(Ordering::SeqCst) >= 1);
    assert!(poller.is_running());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn poller_stops_when_callback_breaks() {
    let board = Arc::new(ScriptedBoard::default());
    let poller = ChatPoller::spawn(
        &Handle::current(),
        board.clone(),
        JobId(1),
        Duration::from_millis(10),
        |_| ControlFlow::Break(()),
    );

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!poller.is_running());
    assert_eq!(board.chat_fetches.load(Ordering::SeqCst), 1);
}
