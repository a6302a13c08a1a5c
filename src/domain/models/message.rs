#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Sender;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// A message reduced to what the answer service wants to see as history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(id: &str, sender: Sender, text: &str) -> Message {
        return Message {
            id: id.to_string(),
            text: text.to_string(),
            sender,
            timestamp: Utc::now(),
        };
    }

    pub fn is_user(&self) -> bool {
        return self.sender == Sender::User;
    }

    pub fn as_history(&self) -> HistoryEntry {
        return HistoryEntry {
            text: self.text.to_string(),
            sender: self.sender,
            timestamp: self.timestamp,
        };
    }

    /// Word wraps the message text to fit within `line_max_width` columns.
    /// Tabs are expanded so the terminal doesn't render them at odd widths.
    pub fn as_string_lines(&self, line_max_width: usize) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let text = self.text.replace('\t', "  ");

        for full_line in text.split('\n') {
            if full_line.trim().is_empty() {
                lines.push(" ".to_string());
                continue;
            }

            let mut char_count = 0;
            let mut current_lines: Vec<&str> = vec![];

            // Width of the current line, without trailing space.
            for word in full_line.split(' ') {
                let word_len = word.chars().count();
                if !current_lines.is_empty() && char_count + 1 + word_len > line_max_width {
                    lines.push(current_lines.join(" ").trim_end().to_string());
                    current_lines = vec![word];
                    char_count = word_len;
                    continue;
                }

                if !current_lines.is_empty() {
                    char_count += 1;
                }
                current_lines.push(word);
                char_count += word_len;
            }
            if !current_lines.is_empty() {
                lines.push(current_lines.join(" ").trim_end().to_string());
            }
        }

        return lines;
    }
}

/// Hands out time derived message ids. Ids are milliseconds since the epoch,
/// bumped forward when two messages land in the same millisecond so they stay
/// unique and ordered.
#[derive(Default)]
pub struct MessageIds {
    last: i64,
}

impl MessageIds {
    pub fn next(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);

        return self.last.to_string();
    }

    /// Makes sure ids handed out after a reload never collide with ids already
    /// in the transcript.
    pub fn observe(&mut self, messages: &[Message]) {
        for message in messages {
            if let Ok(id) = message.id.parse::<i64>() {
                self.last = self.last.max(id);
            }
        }
    }
}
