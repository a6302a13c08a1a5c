#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::prelude::Rect;

use super::actions::help_text;
use super::BubbleList;
use super::Collaborators;
use super::ConversationSession;
use super::Scroll;
use crate::domain::models::Action;
use crate::domain::models::AnswerOutcome;
use crate::domain::models::Identity;
use crate::domain::models::Loading;
use crate::domain::models::Message;
use crate::domain::models::Sender;
use crate::domain::models::SlashCommand;

pub struct AppState {
    pub bubble_list: BubbleList,
    pub conversation: ConversationSession,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub loading: Loading,
    pub notice: Option<Message>,
    pub scroll: Scroll,
}

impl AppState {
    pub async fn new(
        collaborators: Collaborators,
        identity: &dyn Identity,
        model: &str,
    ) -> AppState {
        let health = collaborators.provider.health_check().await;
        let conversation = ConversationSession::initialize(collaborators, identity, model).await;

        let mut app_state = AppState {
            bubble_list: BubbleList::default(),
            conversation,
            last_known_height: 0,
            last_known_width: 0,
            loading: Loading::default(),
            notice: None,
            scroll: Scroll::default(),
        };

        if let Err(err) = health {
            tracing::warn!(error = ?err, "answer service health check failed");
            app_state.set_notice(&format!("Hey, it looks like TracWise can't be reached right now. Your questions won't get answers until it's back.\n\nError: {err}"));
        }

        return app_state;
    }

    /// Shows a message from TracWise that isn't part of the conversation. It
    /// disappears with the next question.
    pub fn set_notice(&mut self, text: &str) {
        self.notice = Some(Message::new("notice", Sender::Assistant, text));
        self.sync_dependants();
        self.scroll.last();
    }

    fn report(&mut self, res: Result<()>) {
        if let Err(err) = res {
            self.set_notice(&err.to_string());
        }
    }

    /// Runs slash commands. Returns whether the chat should end, and whether
    /// the input was handled as a command. Commands never end up in the
    /// conversation.
    pub async fn handle_slash_commands(&mut self, input: &str) -> Result<(bool, bool)> {
        let command = match SlashCommand::parse(input) {
            Some(command) => command,
            None => return Ok((false, false)),
        };

        if command.is_quit() {
            return Ok((true, false));
        }

        if command.is_clear() {
            self.notice = None;
            let res = self.conversation.clear().await;
            self.report(res);
            self.sync_dependants();
            self.scroll.last();
        } else if command.is_help() {
            let text = help_text(
                self.conversation.speech_supported(),
                self.conversation.capture_supported(),
            );
            self.set_notice(&text);
        } else if command.is_speak() {
            self.speak(&command);
        } else if command.is_pause() {
            let res = self.conversation.pause_speech();
            self.report(res);
        } else if command.is_resume() {
            let res = self.conversation.resume_speech();
            self.report(res);
        } else if command.is_listen() {
            self.toggle_listening();
        }

        return Ok((false, true));
    }

    fn speak(&mut self, command: &SlashCommand) {
        let answers = self
            .conversation
            .messages()
            .iter()
            .filter(|message| return !message.is_user())
            .cloned()
            .collect::<Vec<Message>>();

        let message = match command.position() {
            Some(Err(err)) => {
                self.set_notice(&err);
                return;
            }
            Some(Ok(position)) => answers.get(position - 1),
            None => answers.last(),
        };

        let message = match message {
            Some(message) => message,
            None => {
                self.set_notice("There's no answer with that number to read aloud.");
                return;
            }
        };

        let res = self.conversation.toggle_speech(&message.id, &message.text);
        self.report(res);
        self.sync_dependants();
    }

    pub fn toggle_listening(&mut self) {
        let res = self.conversation.toggle_listening();
        self.report(res);
    }

    /// Accepts a question from the prompt, handing back the request for the
    /// worker to send.
    pub async fn submit(&mut self, text: &str) -> Option<Action> {
        if self.conversation.is_pending() {
            self.set_notice("Hold on, TracWise is still answering your last question.");
            return None;
        }

        let pending = self.conversation.begin_submit(text).await?;
        self.notice = None;
        self.sync_dependants();
        self.scroll.last();

        return Some(Action::AnswerRequest(pending));
    }

    pub async fn handle_answer(&mut self, outcome: AnswerOutcome) {
        if self.conversation.complete(outcome).await {
            self.sync_dependants();
        }
    }

    pub fn is_waiting(&self) -> bool {
        return self.conversation.is_pending();
    }

    /// Animates the loading text and catches up with the speech devices.
    /// Returns a new prompt draft when voice input produced one.
    pub fn tick(&mut self) -> Option<String> {
        self.loading.tick();

        let speaking_id = self.conversation.speaking_id().map(|id| return id.to_string());
        let draft = self.conversation.sync_devices();
        if speaking_id.as_deref() != self.conversation.speaking_id() {
            self.sync_dependants();
        }

        return draft;
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    fn sync_dependants(&mut self) {
        self.bubble_list.set_messages(
            self.conversation.messages(),
            self.notice.as_ref(),
            self.conversation.speaking_id(),
            self.last_known_width.into(),
        );

        self.scroll
            .set_state(self.bubble_list.len() as u16, self.last_known_height);
    }
}
