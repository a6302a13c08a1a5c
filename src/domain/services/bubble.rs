#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::Message;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

/// Changes how a bubble is drawn without changing its layout.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum BubbleKind {
    Message,
    /// The message currently being read aloud.
    Speaking,
    /// Shown to the operator but never part of the conversation.
    Notice,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    kind: BubbleKind,
    message: &'a Message,
    title: String,
    window_max_width: usize,
}

pub struct BubbleConfig {
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
}

fn fill(text: &str, count: usize) -> String {
    return [text].repeat(count).join("");
}

impl<'a> Bubble<'a> {
    pub fn new(
        message: &'a Message,
        alignment: BubbleAlignment,
        kind: BubbleKind,
        title: &str,
        window_max_width: usize,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            kind,
            message,
            title: title.to_string(),
            window_max_width,
        };
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            // left border + left padding + (text, not counted) + right padding + right border +
            // scrollbar.
            border_elements_length: 5,
            outer_padding_percentage: 0.04,
        };
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let max_line_length = self.get_max_line_length();

        let mut lines = vec![self.top_bar(max_line_length)];
        for text in self.message.as_string_lines(max_line_length) {
            let padding = max_line_length.saturating_sub(text.chars().count());
            lines.push(self.pad_line(vec![
                self.border_span("│ ".to_string()),
                Span::from(text),
                self.border_span(format!("{} │", fill(" ", padding))),
            ]));
        }
        lines.push(self.pad_line(vec![self.border_span(format!(
            "╰{}╯",
            fill("─", max_line_length + 2)
        ))]));

        return lines;
    }

    fn top_bar(&self, max_line_length: usize) -> Line<'static> {
        let title_len = self.title.chars().count();
        let inner_bar = fill("─", (max_line_length + 2).saturating_sub(title_len));

        return self.pad_line(vec![
            self.border_span("╭".to_string()),
            self.title_span(),
            self.border_span(format!("{inner_bar}╮")),
        ]);
    }

    /// Pushes right aligned bubbles against the scrollbar.
    fn pad_line(&self, spans: Vec<Span<'static>>) -> Line<'static> {
        if self.alignment == BubbleAlignment::Left {
            return Line::from(spans);
        }

        let bubble_width: usize = spans.iter().map(|e| return e.content.chars().count()).sum();
        let outer_padding = self.window_max_width.saturating_sub(bubble_width + 1);

        let mut line_spans = vec![Span::from(fill(" ", outer_padding))];
        line_spans.extend(spans);
        return Line::from(line_spans);
    }

    fn get_max_line_length(&self) -> usize {
        let style_config = Bubble::style_config();
        // Add a minimum 4% of padding on the side.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;
        let line_border_width = style_config.border_elements_length + min_bubble_padding_length;

        let mut max_line_length = self
            .message
            .text
            .replace('\t', "  ")
            .lines()
            .map(|line| return line.chars().count())
            .max()
            .unwrap_or(0);

        let available = self.window_max_width.saturating_sub(line_border_width);
        if max_line_length > available {
            max_line_length = available;
        }

        let title_len = self.title.chars().count();
        if max_line_length < title_len {
            max_line_length = title_len;
        }

        return max_line_length;
    }

    fn border_style(&self) -> Style {
        match self.kind {
            BubbleKind::Message => return Style::default(),
            BubbleKind::Speaking => return Style::default().fg(Color::Yellow),
            // Brown
            BubbleKind::Notice => return Style::default().fg(Color::Rgb(138, 85, 63)),
        }
    }

    fn border_span(&self, text: String) -> Span<'static> {
        return Span::styled(text, self.border_style());
    }

    fn title_span(&self) -> Span<'static> {
        if self.kind == BubbleKind::Message && !self.message.is_user() {
            return Span::styled(self.title.to_string(), Style::default().fg(Color::Green));
        }

        return Span::styled(self.title.to_string(), self.border_style());
    }
}
