#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

const IDLE_TICK: time::Duration = time::Duration::from_millis(500);
// Capture output replaces the prompt, so poll it often enough to feel live.
const LISTENING_TICK: time::Duration = time::Duration::from_millis(150);

pub fn tick_period(listening: bool) -> time::Duration {
    if listening {
        return LISTENING_TICK;
    }
    return IDLE_TICK;
}

fn new_ticker(period: time::Duration) -> time::Interval {
    let mut ticker = time::interval_at(time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
    return ticker;
}

fn key_event(input: Input) -> Event {
    match input {
        Input { key: Key::Down, .. } => {
            return Event::UIScrollDown();
        }
        Input { key: Key::Up, .. } => {
            return Event::UIScrollUp();
        }
        Input {
            key: Key::PageDown, ..
        }
        | Input {
            key: Key::Char('d'),
            ctrl: true,
            ..
        } => {
            return Event::UIScrollPageDown();
        }
        Input {
            key: Key::PageUp, ..
        }
        | Input {
            key: Key::Char('u'),
            ctrl: true,
            ..
        } => {
            return Event::UIScrollPageUp();
        }
        Input {
            key: Key::Char('c'),
            ctrl: true,
            ..
        } => {
            return Event::Quit();
        }
        Input {
            key: Key::Char('l'),
            ctrl: true,
            ..
        } => {
            return Event::ToggleListening();
        }
        Input {
            key: Key::Enter, ..
        } => {
            return Event::KeyboardEnter();
        }
        input => {
            return Event::KeyboardCharInput(input);
        }
    }
}

/// Maps a terminal event onto a UI event. Wheel scrolling arrives as a mouse
/// event, everything typed goes through the textarea's `Input`.
pub fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Paste(text) => {
            return Some(Event::KeyboardPaste(text));
        }
        CrosstermEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => return Some(Event::UIScrollUp()),
            MouseEventKind::ScrollDown => return Some(Event::UIScrollDown()),
            _ => return None,
        },
        CrosstermEvent::Key(key) => {
            return Some(key_event(key.into()));
        }
        _ => return None,
    }
}

/// Merges terminal input, answers settling on the worker, and a UI tick used
/// to animate loading and poll the speech devices. The tick speeds up while
/// voice input is on.
pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
    listening: bool,
    ticker: time::Interval,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
            listening: false,
            ticker: new_ticker(tick_period(false)),
        };
    }

    pub fn set_listening(&mut self, listening: bool) {
        if self.listening == listening {
            return;
        }

        tracing::debug!(listening, "switching tick period");
        self.listening = listening;
        self.ticker = new_ticker(tick_period(listening));
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => translate(input),
                    Some(Err(err)) => {
                        tracing::warn!(error = ?err, "failed to read terminal event");
                        None
                    }
                    None => None
                },
                _ = self.ticker.tick() => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
