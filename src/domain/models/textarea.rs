use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;

pub struct TextArea {}

impl<'a> TextArea {
    pub fn default() -> tui_textarea::TextArea<'a> {
        return TextArea::with_text("", false);
    }

    /// Builds the prompt box holding `text`. While capturing speech the box is
    /// drawn in red so it's obvious the microphone is live.
    pub fn with_text(text: &str, listening: bool) -> tui_textarea::TextArea<'a> {
        let lines = text
            .split('\n')
            .map(|line| return line.to_string())
            .collect::<Vec<String>>();
        let mut textarea = tui_textarea::TextArea::new(lines);
        textarea.move_cursor(tui_textarea::CursorMove::Bottom);
        textarea.move_cursor(tui_textarea::CursorMove::End);

        let mut title = "Ask about your tractor...";
        let mut border_style = Style::default();
        if listening {
            title = "Listening... press CTRL+L to stop";
            border_style = border_style.fg(Color::Red);
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(border_style)
            .title(title)
            .padding(Padding::new(1, 1, 0, 0));

        textarea.set_block(block);

        return textarea;
    }
}
