#[cfg(test)]
#[path = "transcript_view_test.rs"]
mod tests;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block as WidgetBlock;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::renderer;
use super::renderer::Block;
use super::renderer::Inline;
use crate::domain::models::Author;
use crate::domain::models::Turn;

const MIN_WIDTH: usize = 10;

fn inline_style(inline: &Inline) -> Style {
    match inline {
        Inline::Text(_) => return Style::default(),
        Inline::Bold(_) => return Style::default().add_modifier(Modifier::BOLD),
        Inline::Code(_) => return Style::default().fg(Color::Yellow),
    }
}

fn inline_text(inline: &Inline) -> &str {
    match inline {
        Inline::Text(text) => return text,
        Inline::Bold(text) => return text,
        Inline::Code(text) => return text,
    }
}

/// Word-wraps a run of styled inlines, carrying each word's style through
/// to the output spans. `rest_prefix` gives list items a hanging indent.
fn wrap_inlines(
    inlines: &[Inline],
    width: usize,
    first_prefix: &str,
    rest_prefix: &str,
) -> Vec<Line<'static>> {
    let width = width.max(MIN_WIDTH);
    let mut lines: Vec<Line<'static>> = vec![];
    let mut spans: Vec<Span<'static>> = vec![Span::raw(first_prefix.to_string())];
    let mut count = first_prefix.len();

    for inline in inlines {
        let style = inline_style(inline);
        for word in inline_text(inline).split(' ') {
            if word.is_empty() {
                continue;
            }

            let mut extra = word.len();
            if count > first_prefix.len().max(rest_prefix.len()) {
                extra += 1;
            }

            if count + extra > width && spans.len() > 1 {
                lines.push(Line::from(std::mem::take(&mut spans)));
                spans.push(Span::raw(rest_prefix.to_string()));
                count = rest_prefix.len();
                extra = word.len();
            }

            let mut content = String::new();
            if extra > word.len() {
                content.push(' ');
            }
            content.push_str(word);
            count += extra;
            spans.push(Span::styled(content, style));
        }
    }

    if spans.len() > 1 {
        lines.push(Line::from(spans));
    }

    return lines;
}

#[derive(Default)]
pub struct TranscriptView {
    lines: Vec<Line<'static>>,
}

impl TranscriptView {
    pub fn set_turns(&mut self, turns: &[Turn], line_width: usize) {
        let mut lines: Vec<Line<'static>> = vec![];

        for turn in turns {
            let header_style = match turn.author {
                Author::User => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                Author::Assistant => Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            };
            lines.push(Line::from(Span::styled(
                turn.author.to_string(),
                header_style,
            )));

            if let Some(attachment) = &turn.attachment {
                lines.push(Line::from(Span::styled(
                    format!("Attached: {}", attachment.name),
                    Style::default().fg(Color::DarkGray),
                )));
            }

            let blocks = renderer::tokenize(&turn.text());
            if blocks.is_empty() {
                lines.push(Line::from(Span::styled(
                    "...".to_string(),
                    Style::default().fg(Color::DarkGray),
                )));
            }

            for block in &blocks {
                match block {
                    Block::Paragraph(inlines) => {
                        lines.append(&mut wrap_inlines(inlines, line_width, "", ""));
                    }
                    Block::List(items) => {
                        for item in items {
                            lines.append(&mut wrap_inlines(item, line_width, "- ", "  "));
                        }
                    }
                }
            }

            lines.push(Line::from(""));
        }

        self.lines = lines;
    }

    pub fn lines(&self) -> &[Line<'static>] {
        return &self.lines;
    }

    pub fn len(&self) -> usize {
        return self.lines.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.lines.is_empty();
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: u16) {
        frame.render_widget(
            Paragraph::new(self.lines.to_owned())
                .block(WidgetBlock::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}
