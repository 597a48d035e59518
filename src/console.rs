//! Console front end — reads lines from stdin, sends them to the chat
//! session, prints the reply to stdout.
//!
//! Slash commands query the command catalog and control the session; any
//! other non-empty line becomes a question for the assistant. Failure
//! notices from the session's side channel are drained and printed after
//! each send — the console equivalent of a toast.
//!
//! Runs until `/quit` or stdin closes.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

use crate::catalog::{Catalog, CommandCategory};
use crate::chat::{ChatSession, SendFailure, SendOutcome};
use crate::error::AppError;

pub async fn run(
    session: ChatSession,
    catalog: Catalog,
    mut failures: mpsc::UnboundedReceiver<SendFailure>,
) -> Result<(), AppError> {
    info!("console started");
    println!("──────────────────────────────────────────");
    println!(" GitGuru console   (/help for commands)");
    println!("──────────────────────────────────────────");
    if let Some(greeting) = session.messages().await.first() {
        println!("{}", greeting.content);
    }

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        print!("> ");
        use std::io::Write as _;
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            info!("stdin closed");
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/help" => print_help(),
            "/clear" => {
                session.clear().await;
                println!("(conversation cleared)");
            }
            "/commands" => {
                for category in catalog.categories() {
                    print_category(category);
                }
            }
            _ if input.starts_with("/search") => {
                let term = input.trim_start_matches("/search").trim();
                let hits = catalog.search(term);
                if hits.is_empty() {
                    println!("no commands match \"{term}\"");
                }
                for category in &hits {
                    print_category(category);
                }
            }
            question => {
                let outcome = session.send(question).await;
                if matches!(outcome, SendOutcome::Replied | SendOutcome::Failed) {
                    if let Some(reply) = session.messages().await.last() {
                        println!("{}", reply.content);
                    }
                }
                while let Ok(failure) = failures.try_recv() {
                    println!("⚠ {}", failure.detail);
                }
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("/commands         list the full command reference");
    println!("/search <term>    filter the reference by free text");
    println!("/clear            reset the conversation");
    println!("/quit             exit");
    println!("anything else is sent to the assistant");
}

fn print_category(category: &CommandCategory) {
    println!("\n{} — {}", category.title, category.description);
    for command in &category.commands {
        println!("  {:<12}  {}", command.title, command.description);
        println!("  {:<12}  syntax: {}", "", command.syntax);
    }
}
