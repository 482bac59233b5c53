use std::{
    ops::ControlFlow,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use client_core::{
    chat::{load_thread, send_message, ChatPoller, ChatThread, ChatUpdate},
    JobSwipeClient,
};
use shared::domain::JobId;
use tokio::runtime::Handle;

use crate::{checked, render};

pub async fn run(
    client: &JobSwipeClient,
    job_id: JobId,
    send: Option<String>,
    watch: bool,
) -> Result<()> {
    let board = client.board();
    let mut thread = ChatThread::new(job_id);
    checked(client, load_thread(board.as_ref(), &mut thread).await).await?;
    if thread.messages().is_empty() {
        println!("No messages yet. Say hello to the employer!");
    }
    for message in thread.messages() {
        println!("{}", render::message_line(message));
    }

    if let Some(text) = send {
        let shown = thread.messages().len();
        let mut draft = text;
        let sent = checked(
            client,
            send_message(board.as_ref(), &mut thread, &mut draft).await,
        )
        .await?;
        if !sent {
            println!("Nothing to send.");
        }
        for message in &thread.messages()[shown.min(thread.messages().len())..] {
            println!("{}", render::message_line(message));
        }
    }

    if !watch {
        return Ok(());
    }

    println!("Watching for new messages, press Ctrl+C to stop.");
    let thread = Arc::new(Mutex::new(thread));
    let shared_thread = Arc::clone(&thread);
    let poller = ChatPoller::spawn(
        &Handle::current(),
        board,
        job_id,
        client.settings().chat_poll_interval(),
        move |update| {
            match update {
                ChatUpdate::Messages(messages) => {
                    let Ok(mut thread) = shared_thread.lock() else {
                        return ControlFlow::Break(());
                    };
                    let shown = thread.messages().len();
                    if thread.refresh(messages) {
                        for message in &thread.messages()[shown..] {
                            println!("{}", render::message_line(message));
                        }
                    }
                }
                ChatUpdate::Failed(err) => eprintln!("chat refresh failed: {err}"),
            }
            ControlFlow::Continue(())
        },
    );
    tokio::signal::ctrl_c().await?;
    drop(poller);
    Ok(())
}
