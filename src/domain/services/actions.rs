#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::PendingAnswer;

/// Chat help. Commands that need a speech device are left out when the device
/// isn't available.
pub fn help_text(speech_supported: bool, capture_supported: bool) -> String {
    let mut commands = vec!["- /clear (/cl) - Clears the conversation and starts over."];
    if speech_supported {
        commands.push("- /speak (/s) [MESSAGE_NUMBER?] - Reads an answer aloud, or stops it if it's already being read. MESSAGE_NUMBER counts answers from the top starting at 1, and defaults to the latest answer.");
        commands.push("- /pause - Pauses the answer being read aloud.");
        commands.push("- /resume - Resumes a paused answer.");
    }
    if capture_supported {
        commands.push("- /listen (/l) - Starts or stops voice input. What you say replaces the prompt.");
    }
    commands.push("- /quit /exit (/q) - Exit TracWise.");
    commands.push("- /help (/h) - Provides this help menu.");

    let mut hotkeys = vec![
        "- Up arrow - Scroll up",
        "- Down arrow - Scroll down",
        "- CTRL+U - Page up",
        "- CTRL+D - Page down",
    ];
    if capture_supported {
        hotkeys.push("- CTRL+L - Starts or stops voice input.");
    }
    hotkeys.push("- CTRL+C - Exit.");

    return format!(
        "COMMANDS:\n{}\n\nHOTKEYS:\n{}",
        commands.join("\n"),
        hotkeys.join("\n")
    );
}

async fn settle(pending: PendingAnswer, tx: mpsc::UnboundedSender<Event>) {
    let outcome = pending.resolve().await;
    if let Err(err) = tx.send(Event::AnswerSettled(outcome)) {
        tracing::debug!(error = ?err, "ui is gone, dropping answer");
    }
}

pub struct ActionsService {}

impl ActionsService {
    /// Works through actions from the UI until the UI hangs up. Questions are
    /// sent on their own task so the UI keeps drawing while they're in flight.
    pub async fn start(
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            match action {
                Action::AnswerRequest(pending) => {
                    tokio::spawn(settle(pending, tx.clone()));
                }
            }
        }

        return Ok(());
    }
}
