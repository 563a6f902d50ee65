//! Message markup parsing and rendering for TUI display.
//!
//! Assistant messages use a small subset of markdown: `**bold**`, line
//! breaks, `•` bullets, and `|` separators that get breathing room.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

/// Colors for markup elements
const TEXT_COLOR: Color = Color::Rgb(240, 240, 245);
const BOLD_COLOR: Color = Color::Rgb(234, 208, 148);
const BULLET_COLOR: Color = Color::Rgb(164, 103, 38);

const BULLET_INDENT: usize = 2;

/// Parsed markup element
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupElement {
    Text(String),
    Bold(String),
    /// Marks the start of a bulleted line.
    Bullet,
    Newline,
}

/// Parse message text into elements
pub fn parse_markup(text: &str) -> Vec<MarkupElement> {
    let mut elements = Vec::new();

    for line in text.lines() {
        let line = line.replace('|', " | ");
        let trimmed = line.trim_start();

        if trimmed.is_empty() {
            elements.push(MarkupElement::Newline);
            continue;
        }

        let rest = match trimmed.strip_prefix('•') {
            Some(rest) => {
                elements.push(MarkupElement::Bullet);
                rest.trim_start()
            }
            None => line.as_str(),
        };

        parse_inline_elements(rest, &mut elements);
        elements.push(MarkupElement::Newline);
    }

    elements
}

fn parse_inline_elements(line: &str, elements: &mut Vec<MarkupElement>) {
    let mut rest = line;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("**") else {
            break;
        };
        if start > 0 {
            elements.push(MarkupElement::Text(rest[..start].to_string()));
        }
        if end > 0 {
            elements.push(MarkupElement::Bold(after[..end].to_string()));
        }
        rest = &after[end + 2..];
    }

    // An unclosed marker is kept as literal text
    if !rest.is_empty() {
        elements.push(MarkupElement::Text(rest.to_string()));
    }
}

/// Render elements into lines no wider than `width` columns.
pub fn render_markup(elements: &[MarkupElement], width: usize) -> Vec<Line<'static>> {
    let mut wrapper = Wrapper::new(width.max(1));

    for element in elements {
        match element {
            MarkupElement::Text(text) => {
                wrapper.push_words(text, Style::default().fg(TEXT_COLOR));
            }
            MarkupElement::Bold(text) => {
                wrapper.push_words(text, Style::default().fg(BOLD_COLOR).add_modifier(Modifier::BOLD));
            }
            MarkupElement::Bullet => {
                wrapper.push_span(Span::styled("• ", Style::default().fg(BULLET_COLOR)));
                wrapper.indent = BULLET_INDENT;
            }
            MarkupElement::Newline => wrapper.break_line(),
        }
    }

    wrapper.finish()
}

/// Convenience for the common parse-then-render path.
pub fn render_text(text: &str, width: usize) -> Vec<Line<'static>> {
    render_markup(&parse_markup(text), width)
}

struct Wrapper {
    width: usize,
    indent: usize,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    current_width: usize,
}

impl Wrapper {
    fn new(width: usize) -> Self {
        Self {
            width,
            indent: 0,
            lines: Vec::new(),
            current: Vec::new(),
            current_width: 0,
        }
    }

    fn push_span(&mut self, span: Span<'static>) {
        self.current_width += span.content.width();
        self.current.push(span);
    }

    fn push_words(&mut self, text: &str, style: Style) {
        for word in text.split_inclusive(' ') {
            let word_width = word.trim_end().width();
            let at_line_start = self.current_width <= self.indent;

            if !at_line_start && self.current_width + word_width > self.width {
                self.wrap();
                let word = word.trim_start();
                self.current_width += word.width();
                self.current.push(Span::styled(word.to_string(), style));
                continue;
            }

            self.current_width += word.width();
            self.current.push(Span::styled(word.to_string(), style));
        }
    }

    /// Soft break inside a logical line; keeps bullet indentation.
    fn wrap(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
        self.current_width = self.indent;
        if self.indent > 0 {
            self.current.push(Span::raw(" ".repeat(self.indent)));
        }
    }

    fn break_line(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
        self.current_width = 0;
        self.indent = 0;
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if !self.current.is_empty() {
            self.break_line();
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_parse_plain_text() {
        let elements = parse_markup("Hello world");
        assert_eq!(elements.len(), 2); // Text + Newline
        assert!(matches!(&elements[0], MarkupElement::Text(t) if t == "Hello world"));
    }

    #[test]
    fn test_parse_bold() {
        let elements = parse_markup("Total impact: **$842,000/year**. Act soon.");
        assert!(elements.iter().any(|e| matches!(e, MarkupElement::Bold(t) if t == "$842,000/year")));
        assert!(matches!(&elements[0], MarkupElement::Text(t) if t == "Total impact: "));
    }

    #[test]
    fn test_multiple_bolds() {
        let elements = parse_markup("**first** and **second**");
        let bold_count = elements.iter().filter(|e| matches!(e, MarkupElement::Bold(_))).count();
        assert_eq!(bold_count, 2, "Should have two bold elements");
    }

    #[test]
    fn test_unclosed_bold_is_literal() {
        let elements = parse_markup("a **dangling marker");
        assert!(elements.iter().all(|e| !matches!(e, MarkupElement::Bold(_))));
        assert!(matches!(&elements[0], MarkupElement::Text(t) if t == "a **dangling marker"));
    }

    #[test]
    fn test_parse_bullets_and_blank_lines() {
        let elements = parse_markup("I can help you with:\n• Finding employees\n\nJust ask!");
        assert_eq!(
            elements,
            vec![
                MarkupElement::Text("I can help you with:".to_string()),
                MarkupElement::Newline,
                MarkupElement::Bullet,
                MarkupElement::Text("Finding employees".to_string()),
                MarkupElement::Newline,
                MarkupElement::Newline,
                MarkupElement::Text("Just ask!".to_string()),
                MarkupElement::Newline,
            ]
        );
    }

    #[test]
    fn test_pipes_get_spaced() {
        let lines = render_text("Engineering|Sales", 80);
        assert_eq!(line_text(&lines[0]), "Engineering | Sales");
    }

    #[test]
    fn test_render_bold_is_styled() {
        let lines = render_text("saved **$2.3M** total", 80);
        let bold = lines[0].spans.iter().find(|s| s.content.contains("$2.3M")).unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_render_list_has_bullet() {
        let lines = render_text("• Item", 80);
        assert!(line_text(&lines[0]).starts_with("• "));
        assert!(line_text(&lines[0]).contains("Item"));
    }

    #[test]
    fn test_render_wraps_to_width() {
        let lines = render_text("one two three four five six", 10);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line_text(line).trim_end().width() <= 10, "too wide: {:?}", line_text(line));
        }
    }

    #[test]
    fn test_wrapped_bullet_keeps_indent() {
        let lines = render_text("• alpha beta gamma delta", 12);
        assert!(lines.len() > 1);
        assert!(line_text(&lines[1]).starts_with("  "));
    }

    #[test]
    fn test_blank_line_renders_empty() {
        let lines = render_text("a\n\nb", 80);
        assert_eq!(lines.len(), 3);
        assert_eq!(line_text(&lines[1]), "");
    }
}
