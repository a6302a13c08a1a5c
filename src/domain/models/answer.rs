#[cfg(test)]
#[path = "answer_test.rs"]
mod tests;

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio_util::sync::CancellationToken;

use super::HistoryEntry;
use super::Message;

/// Body posted to the answer service for every question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    pub model: String,
    pub conversation_history: Vec<HistoryEntry>,
}

impl AnswerRequest {
    /// Builds a request from the transcript as it was before the question was
    /// asked. The greeting at the head of the transcript is never sent.
    pub fn new(question: &str, model: &str, prior: &[Message]) -> AnswerRequest {
        let conversation_history = prior
            .iter()
            .skip(1)
            .map(|message| {
                return message.as_history();
            })
            .collect::<Vec<HistoryEntry>>();

        return AnswerRequest {
            question: question.to_string(),
            model: model.to_string(),
            conversation_history,
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

#[async_trait]
pub trait AnswerProvider {
    /// Used at startup to check the answer service can be reached before the
    /// operator starts asking questions.
    async fn health_check(&self) -> Result<()>;

    /// Sends a single question alongside the conversation so far, returning
    /// the answer text. Any transport failure, non success status, or body
    /// without an `answer` is an error.
    async fn ask(&self, request: &AnswerRequest) -> Result<String>;
}

pub type AnswerProviderBox = Arc<dyn AnswerProvider + Send + Sync>;

/// How a single question ended up. Every variant carries the ticket of the
/// request it settles so the conversation can drop outcomes it no longer
/// waits for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    Answered { ticket: u64, text: String },
    Failed { ticket: u64, error: String },
    Cancelled { ticket: u64 },
}

impl AnswerOutcome {
    pub fn ticket(&self) -> u64 {
        match self {
            AnswerOutcome::Answered { ticket, .. } => return *ticket,
            AnswerOutcome::Failed { ticket, .. } => return *ticket,
            AnswerOutcome::Cancelled { ticket } => return *ticket,
        }
    }
}

/// A question that has been accepted by the conversation and still needs to
/// be sent. Resolving it can happen away from the conversation, on a worker.
pub struct PendingAnswer {
    pub ticket: u64,
    pub request: AnswerRequest,
    provider: AnswerProviderBox,
    lifetime: CancellationToken,
}

impl fmt::Debug for PendingAnswer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return f
            .debug_struct("PendingAnswer")
            .field("ticket", &self.ticket)
            .field("request", &self.request)
            .finish();
    }
}

impl PendingAnswer {
    pub fn new(
        ticket: u64,
        request: AnswerRequest,
        provider: AnswerProviderBox,
        lifetime: CancellationToken,
    ) -> PendingAnswer {
        return PendingAnswer {
            ticket,
            request,
            provider,
            lifetime,
        };
    }

    pub async fn resolve(self) -> AnswerOutcome {
        let ticket = self.ticket;
        tracing::debug!(
            ticket,
            history = self.request.conversation_history.len(),
            "asking question"
        );

        let res = tokio::select! {
            biased;
            _ = self.lifetime.cancelled() => None,
            res = self.provider.ask(&self.request) => Some(res),
        };

        match res {
            None => {
                tracing::debug!(ticket, "conversation closed before the answer arrived");
                return AnswerOutcome::Cancelled { ticket };
            }
            Some(Ok(text)) => {
                return AnswerOutcome::Answered { ticket, text };
            }
            Some(Err(err)) => {
                tracing::error!(ticket, error = ?err, "answer request failed");
                return AnswerOutcome::Failed {
                    ticket,
                    error: err.to_string(),
                };
            }
        }
    }
}
