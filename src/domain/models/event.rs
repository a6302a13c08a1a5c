use tui_textarea::Input;

use super::AnswerOutcome;

#[derive(Debug)]
pub enum Event {
    AnswerSettled(AnswerOutcome),
    KeyboardCharInput(Input),
    KeyboardEnter(),
    KeyboardPaste(String),
    Quit(),
    ToggleListening(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
