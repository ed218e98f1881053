//! Conversation with Bloom.

use std::io::{self, BufRead, Write};

use blossom_core::ConversationEngine;
use chrono::NaiveDate;

use super::{CmdResult, Store};

pub fn run(message: Option<String>, today: NaiveDate) -> CmdResult {
    let mut store = Store::open()?;
    let mut engine = ConversationEngine::from_config(&store.config);

    if let Some(message) = message {
        let reply = store.session.chat(&mut engine, today, &message)?;
        store.save()?;
        println!("{}", reply.text);
        return Ok(());
    }

    // Fail before prompting if there is nobody to talk to.
    store.session.profile()?;
    println!("Chatting with Bloom. Type 'quit' or press Ctrl-D to leave.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "quit" | "exit") {
            break;
        }

        let reply = store.session.chat(&mut engine, today, input)?;
        store.save()?;
        println!("Bloom: {}", reply.text);
    }
    Ok(())
}
