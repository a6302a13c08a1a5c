#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::domain::models::AnswerOutcome;
use crate::domain::models::AnswerProviderBox;
use crate::domain::models::AnswerRequest;
use crate::domain::models::CaptureBox;
use crate::domain::models::Identity;
use crate::domain::models::Message;
use crate::domain::models::MessageIds;
use crate::domain::models::PendingAnswer;
use crate::domain::models::Sender;
use crate::domain::models::SpeakerBox;
use crate::domain::models::TranscriptStoreBox;

/// Storage slot holding the serialized transcript.
pub const HISTORY_SLOT: &str = "chat-history";

/// Shown in place of an answer whenever the answer service can't be reached
/// or replies with something unusable.
pub const FALLBACK_ERROR: &str = "Sorry, there was an error connecting to the backend.";

pub fn greeting_text(display_name: Option<&str>) -> String {
    let hello = match display_name {
        Some(name) if !name.trim().is_empty() => format!("Hello {}!", name.trim()),
        _ => "Hello!".to_string(),
    };

    return format!("{hello} I'm TracWise, your AI assistant for tractor operations. Ask me anything about maintenance, troubleshooting, or operation procedures.");
}

/// Accepts only a non empty JSON array of messages. Anything else means the
/// slot is unusable and the conversation starts over.
pub fn parse_transcript(payload: &str) -> Option<Vec<Message>> {
    let value = match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = ?err, "persisted transcript is not valid json");
            return None;
        }
    };

    match value.as_array() {
        Some(entries) if !entries.is_empty() => (),
        _ => {
            tracing::warn!("persisted transcript is not a non-empty list");
            return None;
        }
    }

    match serde_json::from_value::<Vec<Message>>(value) {
        Ok(messages) => return Some(messages),
        Err(err) => {
            tracing::warn!(error = ?err, "persisted transcript has malformed messages");
            return None;
        }
    }
}

/// Everything a conversation talks to outside of itself.
pub struct Collaborators {
    pub store: TranscriptStoreBox,
    pub provider: AnswerProviderBox,
    pub speaker: SpeakerBox,
    pub capture: CaptureBox,
}

/// One conversation with the assistant. Owns the transcript, keeps the storage
/// slot in sync with it, and allows a single question in flight at a time.
pub struct ConversationSession {
    messages: Vec<Message>,
    pending: Option<u64>,
    last_ticket: u64,
    ids: MessageIds,
    display_name: Option<String>,
    model: String,
    speaking_id: Option<String>,
    draft: String,
    last_capture: String,
    store: TranscriptStoreBox,
    provider: AnswerProviderBox,
    speaker: SpeakerBox,
    capture: CaptureBox,
    lifetime: CancellationToken,
}

impl ConversationSession {
    /// Restores the persisted transcript, or starts from a greeting when there
    /// is nothing usable to restore. Never writes to storage.
    pub async fn initialize(
        collaborators: Collaborators,
        identity: &dyn Identity,
        model: &str,
    ) -> ConversationSession {
        let mut display_name = None;
        if identity.is_signed_in() {
            display_name = identity.display_name();
        }

        let restored = match collaborators.store.get(HISTORY_SLOT).await {
            Ok(Some(payload)) => parse_transcript(&payload),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = ?err, "unable to read persisted transcript");
                None
            }
        };

        let mut session = ConversationSession {
            messages: vec![],
            pending: None,
            last_ticket: 0,
            ids: MessageIds::default(),
            display_name,
            model: model.to_string(),
            speaking_id: None,
            draft: "".to_string(),
            last_capture: "".to_string(),
            store: collaborators.store,
            provider: collaborators.provider,
            speaker: collaborators.speaker,
            capture: collaborators.capture,
            lifetime: CancellationToken::new(),
        };

        if let Some(messages) = restored {
            tracing::debug!(messages = messages.len(), "restored transcript");
            session.ids.observe(&messages);
            session.messages = messages;
        } else {
            session.messages = vec![session.greeting()];
        }

        return session;
    }

    fn greeting(&mut self) -> Message {
        return Message::new(
            &self.ids.next(),
            Sender::Assistant,
            &greeting_text(self.display_name.as_deref()),
        );
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn is_pending(&self) -> bool {
        return self.pending.is_some();
    }

    pub fn is_closed(&self) -> bool {
        return self.lifetime.is_cancelled();
    }

    pub fn speaking_id(&self) -> Option<&str> {
        return self.speaking_id.as_deref();
    }

    pub fn draft(&self) -> &str {
        return &self.draft;
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    pub fn speech_supported(&self) -> bool {
        return self.speaker.is_supported();
    }

    pub fn capture_supported(&self) -> bool {
        return self.capture.is_supported();
    }

    pub fn is_listening(&mut self) -> bool {
        return self.capture.is_listening();
    }

    /// Accepts a question: appends it to the transcript, marks the
    /// conversation as waiting, and hands back the request still to be sent.
    /// Blank input, a question already in flight, or a closed conversation
    /// are turned away without touching any state.
    pub async fn begin_submit(&mut self, text: &str) -> Option<PendingAnswer> {
        if self.is_closed() || text.trim().is_empty() {
            return None;
        }
        if let Some(ticket) = self.pending {
            tracing::warn!(ticket, "question rejected, another one is in flight");
            return None;
        }

        let request = AnswerRequest::new(text, &self.model, &self.messages);
        let message = Message::new(&self.ids.next(), Sender::User, text);
        self.messages.push(message);
        self.draft.clear();

        self.last_ticket += 1;
        let ticket = self.last_ticket;
        self.pending = Some(ticket);
        self.persist_or_warn().await;

        return Some(PendingAnswer::new(
            ticket,
            request,
            self.provider.clone(),
            self.lifetime.child_token(),
        ));
    }

    /// Settles the question in flight. Outcomes for anything other than the
    /// current question, or arriving after the conversation closed, are
    /// dropped. Returns whether the outcome was applied.
    pub async fn complete(&mut self, outcome: AnswerOutcome) -> bool {
        if self.is_closed() || self.pending != Some(outcome.ticket()) {
            tracing::debug!(ticket = outcome.ticket(), "ignoring stale answer");
            return false;
        }
        self.pending = None;

        let text = match outcome {
            AnswerOutcome::Answered { text, .. } => text,
            AnswerOutcome::Failed { .. } => FALLBACK_ERROR.to_string(),
            AnswerOutcome::Cancelled { .. } => return false,
        };

        let message = Message::new(&self.ids.next(), Sender::Assistant, &text);
        self.messages.push(message);
        self.persist_or_warn().await;

        return true;
    }

    /// Asks a question and waits for it to settle. Failures end up in the
    /// transcript as an assistant message, never as an error. Returns false
    /// when the question was turned away.
    pub async fn submit(&mut self, text: &str) -> bool {
        let pending = match self.begin_submit(text).await {
            Some(pending) => pending,
            None => return false,
        };

        let outcome = pending.resolve().await;
        self.complete(outcome).await;

        return true;
    }

    /// Writes the transcript to storage. A transcript holding nothing but the
    /// greeting is never written.
    pub async fn persist(&self) -> Result<()> {
        if self.messages.len() <= 1 {
            return Ok(());
        }

        let payload = serde_json::to_string(&self.messages)?;
        self.store.set(HISTORY_SLOT, &payload).await?;

        return Ok(());
    }

    async fn persist_or_warn(&self) {
        if let Err(err) = self.persist().await {
            tracing::warn!(error = ?err, "unable to persist transcript");
        }
    }

    /// Starts over from a fresh greeting and removes the persisted copy. A
    /// question still in flight is abandoned.
    pub async fn clear(&mut self) -> Result<()> {
        self.pending = None;
        self.messages = vec![self.greeting()];
        self.store.delete(HISTORY_SLOT).await?;

        return Ok(());
    }

    /// Reads a message aloud, or stops it when that message is the one being
    /// read. Starting a message interrupts whatever else was being read.
    pub fn toggle_speech(&mut self, message_id: &str, text: &str) -> Result<()> {
        if self.speaking_id.as_deref() == Some(message_id) && self.speaker.is_speaking() {
            self.speaker.stop()?;
            self.speaking_id = None;
            return Ok(());
        }

        self.speaking_id = Some(message_id.to_string());
        if let Err(err) = self.speaker.speak(text) {
            self.speaking_id = None;
            return Err(err);
        }

        return Ok(());
    }

    pub fn pause_speech(&mut self) -> Result<()> {
        return self.speaker.pause();
    }

    pub fn resume_speech(&mut self) -> Result<()> {
        return self.speaker.resume();
    }

    pub fn toggle_listening(&mut self) -> Result<()> {
        if self.capture.is_listening() {
            return self.capture.stop();
        }

        self.capture.reset();
        self.last_capture.clear();
        return self.capture.start();
    }

    /// Catches up with the speech devices. Drops the speaking marker once
    /// speech has ended, and returns the new draft when capture produced a new
    /// result. Capture results replace the draft, they never append to it.
    pub fn sync_devices(&mut self) -> Option<String> {
        if self.speaking_id.is_some() && !self.speaker.is_speaking() {
            self.speaking_id = None;
        }

        let transcript = self.capture.transcript();
        if transcript.is_empty() || transcript == self.last_capture {
            return None;
        }

        self.last_capture = transcript.to_string();
        self.draft = transcript.to_string();

        return Some(transcript);
    }

    /// Tears the conversation down. Anything still in flight is cancelled and
    /// its answer will be ignored should it arrive anyway.
    pub fn close(&mut self) {
        self.lifetime.cancel();
        self.pending = None;

        if self.speaking_id.take().is_some() {
            if let Err(err) = self.speaker.stop() {
                tracing::warn!(error = ?err, "unable to stop speech");
            }
        }
        if self.capture.is_listening() {
            if let Err(err) = self.capture.stop() {
                tracing::warn!(error = ?err, "unable to stop capture");
            }
        }
    }
}

impl Drop for ConversationSession {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
