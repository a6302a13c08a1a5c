use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::Collaborators;
use crate::infrastructure::answers::AnswerProviderManager;
use crate::infrastructure::identity::local::LocalIdentity;
use crate::infrastructure::speech::SpeechManager;
use crate::infrastructure::storage::StoreManager;

fn paste(textarea: &mut tui_textarea::TextArea, text: &str) {
    for char in text.chars() {
        let key = match char {
            '\n' => Key::Enter,
            '\r' => continue,
            _ => Key::Char(char),
        };

        textarea.input(Input {
            key,
            ctrl: false,
            alt: false,
        });
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut listening = false;
    let mut textarea = TextArea::default();

    loop {
        terminal.draw(|frame| {
            let mut constraints = vec![Constraint::Min(1), Constraint::Max(4)];
            if app_state.is_waiting() {
                constraints.insert(1, Constraint::Length(3));
            }

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(constraints)
                .split(frame.size());

            if layout[0].width != app_state.last_known_width
                || layout[0].height != app_state.last_known_height
            {
                app_state.set_rect(layout[0]);
            }

            app_state
                .bubble_list
                .render(frame, layout[0], app_state.scroll.position);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                layout[0].inner(&Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut app_state.scroll.scrollbar_state,
            );

            if app_state.is_waiting() {
                app_state.loading.render(frame, layout[1]);
            }
            frame.render_widget(textarea.widget(), layout[layout.len() - 1]);
        })?;

        match events.next().await? {
            Event::AnswerSettled(outcome) => {
                app_state.handle_answer(outcome).await;
            }
            Event::KeyboardCharInput(input) => {
                textarea.input(input);
                app_state
                    .conversation
                    .set_draft(&textarea.lines().join("\n"));
            }
            Event::KeyboardPaste(text) => {
                paste(&mut textarea, &text);
                app_state
                    .conversation
                    .set_draft(&textarea.lines().join("\n"));
            }
            Event::Quit() => {
                break;
            }
            Event::ToggleListening() => {
                app_state.toggle_listening();
            }
            Event::KeyboardEnter() => {
                let input_str = textarea.lines().join("\n");
                if input_str.trim().is_empty() {
                    continue;
                }

                let (should_break, handled) = app_state.handle_slash_commands(&input_str).await?;
                if should_break {
                    break;
                }
                if handled {
                    app_state.conversation.set_draft("");
                    textarea = TextArea::with_text("", listening);
                    continue;
                }

                if let Some(action) = app_state.submit(&input_str).await {
                    textarea = TextArea::with_text("", listening);
                    tx.send(action)?;
                }
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UITick() => {
                if let Some(draft) = app_state.tick() {
                    textarea = TextArea::with_text(&draft, listening);
                }
            }
        }

        let now_listening = app_state.conversation.is_listening();
        if now_listening != listening {
            listening = now_listening;
            events.set_listening(listening);
            textarea = TextArea::with_text(app_state.conversation.draft(), listening);
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    if let Err(err) = disable_raw_mode() {
        tracing::error!(error = ?err, "failed to disable raw mode");
    }
    if let Err(err) = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste,
        cursor::Show
    ) {
        tracing::error!(error = ?err, "failed to restore terminal");
    }
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let collaborators = Collaborators {
        store: StoreManager::get(),
        provider: AnswerProviderManager::get(),
        speaker: SpeechManager::speaker(&Config::get(ConfigKey::SpeechCommand)),
        capture: SpeechManager::capture(&Config::get(ConfigKey::CaptureCommand)),
    };
    let mut app_state = AppState::new(
        collaborators,
        &LocalIdentity::default(),
        &Config::get(ConfigKey::AnswerModel),
    )
    .await;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let res = start_loop(&mut terminal, &mut app_state, tx, rx).await;
    app_state.conversation.close();

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return res;
}
