//! Static chrome around the active page: header, sidebar, and title bar.

use ratatui::text::{Line, Span};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::core::app::App;
use crate::core::constants::APP_TITLE;
use crate::core::page::Mode;
use crate::ui::theme::Theme;

pub const INTRO: &str = "Hello, I'm Hakim, a student at BSPU in CST, aspiring to be a Machine \
Learning Engineer. I've developed this project, LLM Deepmind Era, as part of my machine learning \
journey. Feel free to explore and enjoy the capabilities of this Large Language Model (LLM) \
powered by the Google API. Connect with me on GitHub and Kaggle to discover more about my \
projects and contributions.";

pub const LINKS: [(&str, &str, &str, &str); 2] = [
    ("GitHub", "DreamIsMl", "https://github.com/DreamIsMl", "🚀"),
    ("Kaggle", "hakim11", "https://www.kaggle.com/hakim11", "📊"),
];

pub const CAPABILITIES: [&str; 5] = [
    "Chat 🤖",
    "Generate Content ✨",
    "Generate Content with AI 🚀",
    "Translation 🌐",
    "and more...",
];

pub const VISION_INTRO: &str = "Upload an image and provide a prompt to generate creative \
content! Let the AI create a story or description based on your input.";

const SEPARATOR: &str = " • ";

/// Title, intro paragraph, and the two profile links.
pub fn header_lines(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(APP_TITLE, theme.title_style)),
        Line::from(Span::styled(INTRO, theme.intro_style)),
    ];
    for (site, handle, url, icon) in LINKS {
        lines.push(Line::from(vec![
            Span::styled(format!("{site}: "), theme.intro_style),
            Span::styled(handle, theme.link_style),
            Span::styled(format!(" <{url}> {icon}"), theme.caption_style),
        ]));
    }
    lines
}

/// Radio list of pages followed by the capability list.
pub fn sidebar_lines(selected: Mode, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "Select a page",
        theme.heading_style,
    ))];
    for (index, mode) in Mode::ALL.into_iter().enumerate() {
        let (marker, style) = if mode == selected {
            ("(•)", theme.nav_selected_style)
        } else {
            ("( )", theme.nav_style)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("F{} ", index + 1), theme.caption_style),
            Span::styled(format!("{marker} {}", mode.label()), style),
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "AI Capabilities",
        theme.heading_style,
    )));
    for capability in CAPABILITIES {
        lines.push(Line::from(Span::styled(
            format!("- {capability}"),
            theme.capability_style,
        )));
    }
    lines
}

/// Cut `text` to at most `max_width` columns, ending with `…` when shortened.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut width = 0;
    for grapheme in text.graphemes(true) {
        let grapheme_width = UnicodeWidthStr::width(grapheme);
        if width + grapheme_width + 1 > max_width {
            break;
        }
        out.push_str(grapheme);
        width += grapheme_width;
    }
    out.push('…');
    out
}

/// `Era v… • {page} ({model}) • Logging: {status}`, shortened to fit.
///
/// The page and model drop out before the logging status does.
pub fn title_text(app: &App, available_width: usize) -> String {
    let base = format!("Era v{}", env!("CARGO_PKG_VERSION"));
    let page = format!("{} ({})", app.mode().label(), app.active_model());
    let logging = format!("Logging: {}", app.logging.get_status_string());

    let full = [base.as_str(), page.as_str(), logging.as_str()].join(SEPARATOR);
    if UnicodeWidthStr::width(full.as_str()) <= available_width {
        return full;
    }

    let fixed = UnicodeWidthStr::width(base.as_str())
        + UnicodeWidthStr::width(logging.as_str())
        + 2 * UnicodeWidthStr::width(SEPARATOR);
    // Keep a few columns of the page name or drop it entirely
    if available_width > fixed + 4 {
        let page = truncate_to_width(&page, available_width - fixed);
        return [base.as_str(), page.as_str(), logging.as_str()].join(SEPARATOR);
    }

    truncate_to_width(
        &[base.as_str(), logging.as_str()].join(SEPARATOR),
        available_width,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::AppInitConfig;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn app() -> App {
        App::new(AppInitConfig {
            mode: Mode::Chat,
            text_model: "gemini-1.5-flash".to_string(),
            vision_model: "gemini-1.5-flash".to_string(),
            theme: Theme::dark_default(),
            markdown_enabled: true,
            log_file: None,
        })
        .expect("app")
    }

    #[test]
    fn header_carries_title_and_links() {
        let lines = header_lines(&Theme::dark_default());
        assert_eq!(text_of(&lines[0]), "Welcome to LLM Deepmind Era!");
        assert!(text_of(&lines[2]).starts_with("GitHub: DreamIsMl"));
        assert!(text_of(&lines[3]).contains("https://www.kaggle.com/hakim11"));
    }

    #[test]
    fn sidebar_marks_only_the_selected_page() {
        let lines = sidebar_lines(Mode::VisionGenerate, &Theme::dark_default());
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts[1], "F1 ( ) Content Creator");
        assert_eq!(texts[2], "F2 ( ) Chat Assistant");
        assert_eq!(texts[3], "F3 (•) Content Creation with Image");
        assert_eq!(texts.last().map(String::as_str), Some("- and more..."));
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("abcdef", 10), "abcdef");
        assert_eq!(truncate_to_width("abcdef", 4), "abc…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn title_fits_or_drops_page_first() {
        let app = app();
        let wide = title_text(&app, 200);
        assert!(wide.contains("Chat Assistant (gemini-1.5-flash)"));
        assert!(wide.ends_with("Logging: disabled"));

        let narrow = title_text(&app, 40);
        assert!(UnicodeWidthStr::width(narrow.as_str()) <= 40);
        assert!(narrow.starts_with("Era v"));
    }
}
