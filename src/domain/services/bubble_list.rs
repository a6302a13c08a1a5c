#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

use std::collections::HashMap;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use super::BubbleAlignment;
use super::BubbleKind;
use crate::domain::models::Message;

struct BubbleCacheEntry {
    kind: BubbleKind,
    text_len: usize,
    lines: Vec<Line<'static>>,
}

/// Sender and local time shown at the top of each bubble.
pub fn bubble_title(message: &Message) -> String {
    let time = message
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M");

    if message.is_user() {
        return format!("You · {time}");
    }

    return format!("TracWise · {time}");
}

/// Renders the transcript as chat bubbles. Bubbles are cached by message id
/// and only redrawn when their text, their kind, or the window width changes.
#[derive(Default)]
pub struct BubbleList {
    cache: HashMap<String, BubbleCacheEntry>,
    line_width: usize,
    lines: Vec<Line<'static>>,
}

impl BubbleList {
    pub fn set_messages(
        &mut self,
        messages: &[Message],
        notice: Option<&Message>,
        speaking_id: Option<&str>,
        line_width: usize,
    ) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }

        self.cache.retain(|id, _| {
            return messages.iter().any(|message| return &message.id == id);
        });

        let mut lines = vec![];
        for message in messages {
            let mut kind = BubbleKind::Message;
            if speaking_id == Some(message.id.as_str()) {
                kind = BubbleKind::Speaking;
            }
            lines.extend(self.bubble_lines(message, kind));
        }

        if let Some(notice) = notice {
            let bubble = Bubble::new(
                notice,
                BubbleAlignment::Left,
                BubbleKind::Notice,
                "TracWise",
                line_width,
            );
            lines.extend(bubble.as_lines());
        }

        self.lines = lines;
    }

    fn bubble_lines(&mut self, message: &Message, kind: BubbleKind) -> Vec<Line<'static>> {
        if let Some(entry) = self.cache.get(&message.id) {
            if entry.kind == kind && entry.text_len == message.text.len() {
                return entry.lines.to_owned();
            }
        }

        let mut align = BubbleAlignment::Left;
        if message.is_user() {
            align = BubbleAlignment::Right;
        }

        let lines = Bubble::new(
            message,
            align,
            kind,
            &bubble_title(message),
            self.line_width,
        )
        .as_lines();

        self.cache.insert(
            message.id.to_string(),
            BubbleCacheEntry {
                kind,
                text_len: message.text.len(),
                lines: lines.to_owned(),
            },
        );

        return lines;
    }

    pub fn len(&self) -> usize {
        return self.lines.len();
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: u16) {
        frame.render_widget(
            Paragraph::new(self.lines.to_owned())
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}
