use std::sync::Arc;
use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use super::AppState;
use crate::domain::models::Action;
use crate::domain::models::AnswerOutcome;
use crate::domain::models::AnswerProvider;
use crate::domain::models::AnswerRequest;
use crate::domain::models::Identity;
use crate::domain::models::Sender;
use crate::domain::models::Speaker;
use crate::domain::models::SpeakerBox;
use crate::domain::services::Collaborators;
use crate::infrastructure::speech::unsupported::UnsupportedCapture;
use crate::infrastructure::speech::unsupported::UnsupportedSpeaker;
use crate::infrastructure::storage::file::FileStore;

struct CannedProvider {
    healthy: bool,
}

#[async_trait]
impl AnswerProvider for CannedProvider {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if !self.healthy {
            bail!("TracWise is not reachable");
        }
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn ask(&self, _request: &AnswerRequest) -> Result<String> {
        return Ok("Check the dipstick.".to_string());
    }
}

struct Operator {}

impl Identity for Operator {
    fn is_signed_in(&self) -> bool {
        return true;
    }

    fn display_name(&self) -> Option<String> {
        return Some("Dana".to_string());
    }
}

#[derive(Clone, Default)]
struct RecordingSpeaker {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl Speaker for RecordingSpeaker {
    fn is_supported(&self) -> bool {
        return true;
    }

    fn is_speaking(&mut self) -> bool {
        return !self.spoken.lock().unwrap().is_empty();
    }

    fn speak(&mut self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        return Ok(());
    }

    fn stop(&mut self) -> Result<()> {
        self.spoken.lock().unwrap().clear();
        return Ok(());
    }

    fn pause(&mut self) -> Result<()> {
        return Ok(());
    }

    fn resume(&mut self) -> Result<()> {
        return Ok(());
    }
}

async fn create_app_state(
    dir: &tempfile::TempDir,
    healthy: bool,
    speaker: SpeakerBox,
) -> AppState {
    let collaborators = Collaborators {
        store: Arc::new(FileStore::new(dir.path().to_path_buf())),
        provider: Arc::new(CannedProvider { healthy }),
        speaker,
        capture: Box::<UnsupportedCapture>::default(),
    };

    let mut app_state = AppState::new(collaborators, &Operator {}, "General").await;
    app_state.last_known_width = 100;
    app_state.last_known_height = 300;
    return app_state;
}

async fn unsupported_app_state(dir: &tempfile::TempDir) -> AppState {
    return create_app_state(dir, true, Box::<UnsupportedSpeaker>::default()).await;
}

mod new {
    use super::*;

    #[tokio::test]
    async fn it_greets_the_operator() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let app_state = unsupported_app_state(&dir).await;

        let messages = app_state.conversation.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.starts_with("Hello Dana!"));
        assert!(app_state.notice.is_none());

        return Ok(());
    }

    #[tokio::test]
    async fn it_warns_when_tracwise_is_unreachable() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let app_state = create_app_state(&dir, false, Box::<UnsupportedSpeaker>::default()).await;

        let notice = app_state.notice.as_ref().map(|e| return e.text.to_string());
        assert!(notice.unwrap_or_default().contains("TracWise can't be reached"));
        assert_eq!(app_state.conversation.messages().len(), 1);

        return Ok(());
    }
}

mod handle_slash_commands {
    use super::*;

    #[tokio::test]
    async fn it_breaks_on_quit() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut app_state = unsupported_app_state(&dir).await;
        let (should_break, handled) = app_state.handle_slash_commands("/q").await?;

        assert!(should_break);
        assert!(!handled);

        return Ok(());
    }

    #[tokio::test]
    async fn it_ignores_plain_text() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut app_state = unsupported_app_state(&dir).await;
        let (should_break, handled) = app_state
            .handle_slash_commands("What does /help do?")
            .await?;

        assert!(!should_break);
        assert!(!handled);

        return Ok(());
    }

    #[tokio::test]
    async fn it_shows_help_without_unsupported_commands() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut app_state = unsupported_app_state(&dir).await;
        let (should_break, handled) = app_state.handle_slash_commands("/help").await?;

        assert!(!should_break);
        assert!(handled);

        let notice = app_state.notice.as_ref().map(|e| return e.text.to_string());
        let text = notice.unwrap_or_default();
        assert!(text.contains("/clear"));
        assert!(!text.contains("/speak"));
        assert!(!text.contains("/listen"));
        assert_eq!(app_state.conversation.messages().len(), 1);

        return Ok(());
    }

    #[tokio::test]
    async fn it_clears_the_conversation() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut app_state = unsupported_app_state(&dir).await;
        app_state.conversation.submit("How often do I grease it?").await;
        assert_eq!(app_state.conversation.messages().len(), 3);
        assert!(dir.path().join("chat-history.json").exists());

        let (should_break, handled) = app_state.handle_slash_commands("/clear").await?;

        assert!(!should_break);
        assert!(handled);
        assert_eq!(app_state.conversation.messages().len(), 1);
        assert!(!dir.path().join("chat-history.json").exists());

        return Ok(());
    }

    #[tokio::test]
    async fn it_reports_unsupported_speech() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut app_state = unsupported_app_state(&dir).await;
        app_state.handle_slash_commands("/speak").await?;

        let notice = app_state.notice.as_ref().map(|e| return e.text.to_string());
        assert!(notice.unwrap_or_default().contains("Speech output isn't available"));

        return Ok(());
    }

    #[tokio::test]
    async fn it_reports_unsupported_pause_and_resume() -> Result<()> {
        let dir = tempfile::tempdir()?;

        for command in ["/pause", "/resume"] {
            let mut app_state = unsupported_app_state(&dir).await;
            let (should_break, handled) = app_state.handle_slash_commands(command).await?;

            assert!(!should_break);
            assert!(handled);
            let notice = app_state.notice.as_ref().map(|e| return e.text.to_string());
            assert!(notice.unwrap_or_default().contains("Speech output isn't available"));
        }

        return Ok(());
    }

    #[tokio::test]
    async fn it_speaks_the_chosen_answer() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let speaker = RecordingSpeaker::default();
        let mut app_state = create_app_state(&dir, true, Box::new(speaker.clone())).await;
        app_state.conversation.submit("Where's the dipstick?").await;

        app_state.handle_slash_commands("/speak 2").await?;

        assert_eq!(
            speaker.spoken.lock().unwrap().clone(),
            vec!["Check the dipstick.".to_string()]
        );
        assert_eq!(
            app_state.conversation.speaking_id(),
            Some(app_state.conversation.messages()[2].id.as_str())
        );

        return Ok(());
    }

    #[tokio::test]
    async fn it_rejects_unknown_answer_numbers() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let speaker = RecordingSpeaker::default();
        let mut app_state = create_app_state(&dir, true, Box::new(speaker.clone())).await;

        app_state.handle_slash_commands("/speak 4").await?;
        let notice = app_state.notice.as_ref().map(|e| return e.text.to_string());
        assert_eq!(
            notice.unwrap_or_default(),
            "There's no answer with that number to read aloud."
        );

        app_state.handle_slash_commands("/speak first").await?;
        let notice = app_state.notice.as_ref().map(|e| return e.text.to_string());
        assert_eq!(
            notice.unwrap_or_default(),
            "first is not a valid message number."
        );
        assert!(speaker.spoken.lock().unwrap().is_empty());

        return Ok(());
    }
}

mod submit {
    use super::*;

    #[tokio::test]
    async fn it_hands_back_an_answer_request() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut app_state = unsupported_app_state(&dir).await;
        app_state.set_notice("Something to dismiss");

        let action = app_state.submit("Why is the engine smoking?").await;

        match action {
            Some(Action::AnswerRequest(pending)) => {
                assert_eq!(pending.request.question, "Why is the engine smoking?");
                assert!(pending.request.conversation_history.is_empty());
            }
            _ => bail!("expected an answer request"),
        }
        assert!(app_state.is_waiting());
        assert!(app_state.notice.is_none());
        assert_eq!(app_state.conversation.messages().len(), 2);

        return Ok(());
    }

    #[tokio::test]
    async fn it_holds_off_while_waiting() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut app_state = unsupported_app_state(&dir).await;
        assert!(app_state.submit("First question").await.is_some());

        assert!(app_state.submit("Second question").await.is_none());
        assert!(app_state.notice.is_some());
        assert_eq!(app_state.conversation.messages().len(), 2);

        return Ok(());
    }

    #[tokio::test]
    async fn it_appends_settled_answers() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut app_state = unsupported_app_state(&dir).await;
        let ticket = match app_state.submit("Why is the engine smoking?").await {
            Some(Action::AnswerRequest(pending)) => pending.ticket,
            _ => bail!("expected an answer request"),
        };

        app_state
            .handle_answer(AnswerOutcome::Answered {
                ticket,
                text: "Check the air filter.".to_string(),
            })
            .await;

        let messages = app_state.conversation.messages();
        assert!(!app_state.is_waiting());
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].sender, Sender::Assistant);
        assert_eq!(messages[2].text, "Check the air filter.");

        return Ok(());
    }
}
