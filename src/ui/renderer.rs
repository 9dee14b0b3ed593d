use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;
use unicode_width::UnicodeWidthChar;

use crate::core::app::App;
use crate::core::page::{Mode, OutputBlock, Page, VisionField};
use crate::ui::markdown::{render_markdown, render_plain};
use crate::ui::shell::{header_lines, sidebar_lines, title_text, VISION_INTRO};
use crate::ui::theme::Theme;

const SIDEBAR_WIDTH: u16 = 36;
const MAX_HEADER_HEIGHT: u16 = 8;
const VISION_PROMPT_HEIGHT: u16 = 5;

/// One input box on the current page.
struct Field<'a> {
    title: &'a str,
    textarea: &'a TextArea<'static>,
    focused: bool,
    height: u16,
}

fn page_fields(page: &Page) -> Vec<Field<'_>> {
    match page {
        Page::Generate(form) => vec![Field {
            title: "Enter your question or topic:",
            textarea: &form.topic,
            focused: true,
            height: 3,
        }],
        Page::Chat(form) => vec![Field {
            title: "Input:",
            textarea: &form.input,
            focused: true,
            height: 3,
        }],
        Page::VisionGenerate(form) => vec![
            Field {
                title: "Input Prompt:",
                textarea: &form.prompt,
                focused: form.focus == VisionField::Prompt,
                height: VISION_PROMPT_HEIGHT + 2,
            },
            Field {
                title: "Choose an image... (path to .jpg/.jpeg/.png, Ctrl+O to load)",
                textarea: &form.image_path,
                focused: form.focus == VisionField::ImagePath,
                height: 3,
            },
            Field {
                title: "Additional Input (Optional):",
                textarea: &form.extra,
                focused: form.focus == VisionField::Extra,
                height: 3,
            },
        ],
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let theme = &app.theme;
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        f.area(),
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = title_text(app, rows[0].width as usize);
    f.render_widget(
        Paragraph::new(Span::styled(title, theme.caption_style)),
        rows[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(rows[1]);

    f.render_widget(
        Paragraph::new(sidebar_lines(app.mode(), theme))
            .block(
                Block::default()
                    .borders(Borders::RIGHT)
                    .border_style(theme.sidebar_border_style),
            )
            .wrap(Wrap { trim: false }),
        columns[0],
    );

    let output_area = draw_main(f, app, columns[1]);
    app.output_viewport = (output_area.width, output_area.height);
    draw_status(f, app, rows[2]);
}

/// Draws the page and returns the area used for output.
fn draw_main(f: &mut Frame, app: &App, area: Rect) -> Rect {
    let theme = &app.theme;
    let inner = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    };

    let header = Paragraph::new(header_lines(theme)).wrap(Wrap { trim: true });
    let header_height = saturating_u16(header.line_count(inner.width)).min(MAX_HEADER_HEIGHT);

    let mut page_lines = vec![Line::from(Span::styled(
        app.mode().page_title(),
        theme.title_style,
    ))];
    if app.mode() == Mode::VisionGenerate {
        page_lines.push(Line::from(Span::styled(VISION_INTRO, theme.intro_style)));
    }
    let page_intro = Paragraph::new(page_lines).wrap(Wrap { trim: true });
    let intro_height = saturating_u16(page_intro.line_count(inner.width));

    let fields = page_fields(&app.page);
    let mut constraints = vec![
        Constraint::Length(header_height),
        Constraint::Length(1),
        Constraint::Length(intro_height),
    ];
    constraints.extend(fields.iter().map(|field| Constraint::Length(field.height)));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    f.render_widget(header, chunks[0]);
    f.render_widget(page_intro, chunks[2]);

    for (index, field) in fields.iter().enumerate() {
        draw_field(f, field, theme, chunks[3 + index]);
    }

    let action_row = chunks[3 + fields.len()];
    let action = Line::from(vec![
        Span::styled(format!("[ {} ]", app.mode().action_label()), theme.nav_style),
        Span::styled(
            if app.page.active_field_is_multiline() {
                "  Ctrl+G"
            } else {
                "  Enter / Ctrl+G"
            },
            theme.caption_style,
        ),
    ]);
    f.render_widget(Paragraph::new(action), action_row);

    let output_area = chunks[4 + fields.len()];
    draw_output(f, app, output_area);
    output_area
}

fn draw_field(f: &mut Frame, field: &Field<'_>, theme: &Theme, area: Rect) {
    let border_style = if field.focused {
        theme.input_focused_border_style
    } else {
        theme.input_border_style
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(field.title, theme.input_title_style));
    let inner = block.inner(area);

    let (lines, cursor) = field_view(field.textarea, inner.width, inner.height);
    f.render_widget(
        Paragraph::new(lines)
            .style(theme.input_text_style)
            .block(block),
        area,
    );

    if field.focused && inner.width > 0 && inner.height > 0 {
        f.set_cursor_position((inner.x + cursor.0, inner.y + cursor.1));
    }
}

/// Visible slice of a text field plus the cursor's offset within it.
///
/// Rows scroll to keep the cursor line visible; columns scroll so the cursor
/// never sits past the right edge.
fn field_view(textarea: &TextArea<'_>, width: u16, height: u16) -> (Vec<Line<'static>>, (u16, u16)) {
    let (row, col) = textarea.cursor();
    let width = width as usize;
    let height = (height as usize).max(1);

    let first_row = row.saturating_sub(height - 1);
    let cursor_line = textarea.lines().get(row).map(String::as_str).unwrap_or("");
    let cursor_cols: usize = cursor_line
        .chars()
        .take(col)
        .map(|c| c.width().unwrap_or(0))
        .sum();
    let skip_cols = cursor_cols.saturating_sub(width.saturating_sub(1));

    let lines = textarea
        .lines()
        .iter()
        .skip(first_row)
        .take(height)
        .map(|line| Line::from(skip_columns(line, skip_cols)))
        .collect();

    let cursor = (
        saturating_u16(cursor_cols - skip_cols),
        saturating_u16(row - first_row),
    );
    (lines, cursor)
}

fn skip_columns(text: &str, columns: usize) -> String {
    let mut skipped = 0;
    let mut out = String::new();
    for c in text.chars() {
        if skipped < columns {
            skipped += c.width().unwrap_or(0);
            continue;
        }
        out.push(c);
    }
    out
}

/// Everything below the form: image caption, results, notices, and errors.
pub fn build_output_lines(app: &App) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let mut lines = Vec::new();

    if let Page::VisionGenerate(form) = &app.page {
        if let Some(image) = form.attached_image() {
            lines.push(Line::from(Span::styled(
                format!("🖼  {}", image.caption()),
                theme.caption_style,
            )));
            lines.push(Line::default());
        }
    }

    for block in &app.output {
        match block {
            OutputBlock::Heading(text) => {
                lines.push(Line::from(Span::styled(text.clone(), theme.heading_style)));
            }
            OutputBlock::Quote(text) | OutputBlock::Streamed(text) => {
                if app.markdown_enabled {
                    lines.extend(render_markdown(text, theme));
                } else {
                    lines.extend(render_plain(text, theme.quote_style));
                }
                lines.push(Line::default());
            }
            OutputBlock::Line(text) => lines.extend(render_plain(text, theme.text_style)),
            OutputBlock::Notice(text) => {
                lines.push(Line::from(Span::styled(
                    format!("⚠ {text}"),
                    theme.notice_style,
                )));
            }
            OutputBlock::Error(text) => {
                lines.extend(render_plain(text, theme.error_style));
            }
        }
    }

    if app.busy {
        lines.push(Line::from(Span::styled(
            format!("{} Generating...", pulse_symbol(app)),
            theme.streaming_indicator_style,
        )));
    }

    lines
}

fn pulse_symbol(app: &App) -> &'static str {
    let elapsed = app.pulse_start.elapsed().as_millis() as f32 / 1000.0;
    let phase = (elapsed * 2.0) % 2.0;
    let intensity = if phase < 1.0 { phase } else { 2.0 - phase };
    if intensity < 0.33 {
        "○"
    } else if intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}

/// Line counts past `u16::MAX` pin to the maximum instead of wrapping.
fn saturating_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Largest scroll offset for the output area of `area`'s size.
pub fn max_output_scroll(app: &App, width: u16, height: u16) -> u16 {
    let total = Paragraph::new(build_output_lines(app))
        .wrap(Wrap { trim: false })
        .line_count(width);
    saturating_u16(total).saturating_sub(height)
}

fn draw_output(f: &mut Frame, app: &App, area: Rect) {
    let lines = build_output_lines(app);
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let total = saturating_u16(paragraph.line_count(area.width));
    let max_offset = total.saturating_sub(area.height);
    let offset = if app.auto_scroll {
        max_offset
    } else {
        app.scroll_offset.min(max_offset)
    };
    f.render_widget(paragraph.scroll((offset, 0)), area);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = match &app.status {
        Some(status) => Line::from(Span::styled(status.clone(), theme.notice_style)),
        None => Line::from(Span::styled(
            "F1-F3/Ctrl+←→ page • Tab field • Ctrl+O load image • Ctrl+L log • PgUp/PgDn scroll • Ctrl+C quit",
            theme.caption_style,
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}
