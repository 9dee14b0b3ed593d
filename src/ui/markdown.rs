//! Markdown to styled terminal lines for generated content.
//!
//! Generated text arrives as a `> ` block quote (see
//! [`crate::core::formatter::to_markdown`]), so block quotes get a left bar
//! and every other construct renders inside it.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::ui::theme::Theme;

const QUOTE_BAR: &str = "│ ";

#[derive(Clone, Copy, Debug)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

struct MarkdownRenderer<'a> {
    content: &'a str,
    theme: &'a Theme,
    lines: Vec<Line<'static>>,
    current_spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<ListKind>,
    quote_depth: usize,
    link_targets: Vec<String>,
}

impl<'a> MarkdownRenderer<'a> {
    fn new(content: &'a str, theme: &'a Theme) -> Self {
        Self {
            content,
            theme,
            lines: Vec::new(),
            current_spans: Vec::new(),
            style_stack: Vec::new(),
            list_stack: Vec::new(),
            quote_depth: 0,
            link_targets: Vec::new(),
        }
    }

    fn base_style(&self) -> Style {
        if self.quote_depth > 0 {
            self.theme.quote_style
        } else {
            self.theme.text_style
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack
            .last()
            .copied()
            .unwrap_or_else(|| self.base_style())
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.current_style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    fn render(mut self) -> Vec<Line<'static>> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        let parser = Parser::new_ext(self.content, options);

        for event in parser {
            match event {
                Event::Start(tag) => match tag {
                    Tag::Paragraph => {}
                    Tag::Heading { level, .. } => {
                        self.flush_current_spans();
                        let style = self.current_style().patch(self.heading_style(level));
                        self.style_stack.push(style);
                    }
                    Tag::BlockQuote(_) => {
                        self.flush_current_spans();
                        self.quote_depth += 1;
                    }
                    Tag::List(start) => {
                        self.flush_current_spans();
                        self.list_stack.push(match start {
                            Some(n) => ListKind::Ordered(n),
                            None => ListKind::Unordered,
                        });
                    }
                    Tag::Item => {
                        self.flush_current_spans();
                        let marker = match self.list_stack.last_mut() {
                            Some(ListKind::Ordered(next)) => {
                                let current = *next;
                                *next += 1;
                                format!("{current}. ")
                            }
                            _ => "• ".to_string(),
                        };
                        let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                        self.current_spans.push(Span::styled(
                            format!("{indent}{marker}"),
                            self.theme.heading_style,
                        ));
                    }
                    Tag::CodeBlock(_) => {
                        self.flush_current_spans();
                        self.style_stack.push(self.theme.caption_style);
                    }
                    Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
                    Tag::Strong => self.push_modifier(Modifier::BOLD),
                    Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
                    Tag::Link { dest_url, .. } => {
                        self.link_targets.push(dest_url.to_string());
                        self.style_stack.push(self.theme.link_style);
                    }
                    _ => {}
                },
                Event::End(tag_end) => match tag_end {
                    TagEnd::Paragraph => {
                        self.flush_current_spans();
                        if self.list_stack.is_empty() {
                            self.push_empty_line();
                        }
                    }
                    TagEnd::Heading(_) => {
                        self.flush_current_spans();
                        self.push_empty_line();
                        self.style_stack.pop();
                    }
                    TagEnd::BlockQuote(_) => {
                        self.flush_current_spans();
                        self.quote_depth = self.quote_depth.saturating_sub(1);
                    }
                    TagEnd::List(_) => {
                        self.flush_current_spans();
                        self.list_stack.pop();
                        if self.list_stack.is_empty() {
                            self.push_empty_line();
                        }
                    }
                    TagEnd::Item => self.flush_current_spans(),
                    TagEnd::CodeBlock => {
                        self.flush_current_spans();
                        self.style_stack.pop();
                        self.push_empty_line();
                    }
                    TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                        self.style_stack.pop();
                    }
                    TagEnd::Link => {
                        self.style_stack.pop();
                        if let Some(url) = self.link_targets.pop() {
                            self.current_spans.push(Span::styled(
                                format!(" ({url})"),
                                self.theme.caption_style,
                            ));
                        }
                    }
                    _ => {}
                },
                Event::Text(text) => {
                    let style = self.current_style();
                    // Code blocks keep their own line structure
                    let mut pieces = text.split('\n').peekable();
                    while let Some(piece) = pieces.next() {
                        if !piece.is_empty() {
                            self.current_spans
                                .push(Span::styled(piece.replace('\t', "    "), style));
                        }
                        if pieces.peek().is_some() {
                            self.flush_current_spans();
                        }
                    }
                }
                Event::Code(code) => {
                    let style = self.current_style().add_modifier(Modifier::REVERSED);
                    self.current_spans.push(Span::styled(code.to_string(), style));
                }
                Event::SoftBreak | Event::HardBreak => self.flush_current_spans(),
                Event::Rule => {
                    self.flush_current_spans();
                    self.current_spans
                        .push(Span::styled("─".repeat(24), self.theme.quote_bar_style));
                    self.flush_current_spans();
                }
                Event::TaskListMarker(checked) => {
                    let marker = if checked { "[x] " } else { "[ ] " };
                    self.current_spans
                        .push(Span::styled(marker, self.theme.heading_style));
                }
                Event::Html(html) | Event::InlineHtml(html) => {
                    let style = self.current_style();
                    self.current_spans
                        .push(Span::styled(html.trim_end().to_string(), style));
                }
                _ => {}
            }
        }

        self.flush_current_spans();
        while self.lines.last().is_some_and(is_blank) {
            self.lines.pop();
        }
        self.lines
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 | HeadingLevel::H2 => self
                .theme
                .heading_style
                .add_modifier(Modifier::UNDERLINED),
            _ => self.theme.heading_style,
        }
    }

    fn quote_prefix(&self) -> Option<Span<'static>> {
        (self.quote_depth > 0)
            .then(|| Span::styled(QUOTE_BAR.repeat(self.quote_depth), self.theme.quote_bar_style))
    }

    fn flush_current_spans(&mut self) {
        if self.current_spans.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.current_spans.len() + 1);
        spans.extend(self.quote_prefix());
        spans.append(&mut self.current_spans);
        self.lines.push(Line::from(spans));
    }

    /// Blank separator; inside a quote the bar continues.
    fn push_empty_line(&mut self) {
        if self.lines.last().is_none_or(is_blank) {
            return;
        }
        let spans: Vec<Span<'static>> = self.quote_prefix().into_iter().collect();
        self.lines.push(Line::from(spans));
    }
}

/// Empty apart from quote bars.
fn is_blank(line: &Line<'_>) -> bool {
    line.spans
        .iter()
        .all(|span| span.content.chars().all(|c| c == '│' || c.is_whitespace()))
}

/// Render markdown `content` into styled lines.
pub fn render_markdown(content: &str, theme: &Theme) -> Vec<Line<'static>> {
    MarkdownRenderer::new(content, theme).render()
}

/// One styled line per source line, no markdown interpretation.
pub fn render_plain(content: &str, style: Style) -> Vec<Line<'static>> {
    content
        .lines()
        .map(|line| Line::from(Span::styled(line.to_string(), style)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::to_markdown;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn block_quote_lines_get_a_bar() {
        let theme = Theme::dark_default();
        let lines = render_markdown(&to_markdown("first line\nsecond line"), &theme);
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["│ first line", "│ second line"]);
    }

    #[test]
    fn replaced_plus_becomes_a_bullet_inside_the_quote() {
        let theme = Theme::dark_default();
        let lines = render_markdown(&to_markdown("Ideas:\n\n+ one\n+ two"), &theme);
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["│ Ideas:", "│ ", "│ • one", "│ • two"]);
    }

    #[test]
    fn emphasis_is_styled_without_markers() {
        let theme = Theme::dark_default();
        let lines = render_markdown("a **bold** word", &theme);
        assert_eq!(lines.len(), 1);
        assert_eq!(text_of(&lines[0]), "a bold word");
        let bold = &lines[0].spans[1];
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn links_show_their_target() {
        let theme = Theme::light();
        let lines = render_markdown("see [docs](https://example.com)", &theme);
        assert_eq!(text_of(&lines[0]), "see docs (https://example.com)");
    }

    #[test]
    fn ordered_lists_count_from_start() {
        let theme = Theme::dark_default();
        let lines = render_markdown("3. c\n4. d", &theme);
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["3. c", "4. d"]);
    }

    #[test]
    fn plain_rendering_keeps_quote_markers() {
        let lines = render_plain("> a\n> b", Style::default());
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["> a", "> b"]);
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(render_markdown("", &Theme::dark_default()).is_empty());
    }
}
