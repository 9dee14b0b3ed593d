use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Painted behind the whole frame
    pub background_color: Color,

    // Header
    pub title_style: Style,
    pub intro_style: Style,
    pub link_style: Style,

    // Sidebar
    pub sidebar_border_style: Style,
    pub nav_selected_style: Style,
    pub nav_style: Style,
    pub capability_style: Style,

    // Output area
    pub heading_style: Style,
    pub quote_style: Style,
    pub quote_bar_style: Style,
    pub text_style: Style,
    pub notice_style: Style,
    pub error_style: Style,
    pub caption_style: Style,
    pub streaming_indicator_style: Style,

    // Inputs
    pub input_border_style: Style,
    pub input_focused_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
    pub input_cursor_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,

            title_style: Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
            intro_style: Style::default().fg(Color::Gray),
            link_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),

            sidebar_border_style: Style::default().fg(Color::DarkGray),
            nav_selected_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            nav_style: Style::default().fg(Color::White),
            capability_style: Style::default().fg(Color::Gray),

            heading_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            quote_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::ITALIC),
            quote_bar_style: Style::default().fg(Color::DarkGray),
            text_style: Style::default().fg(Color::White),
            notice_style: Style::default().fg(Color::LightYellow),
            error_style: Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
            caption_style: Style::default().fg(Color::DarkGray),
            streaming_indicator_style: Style::default().fg(Color::Cyan),

            input_border_style: Style::default().fg(Color::DarkGray),
            input_focused_border_style: Style::default().fg(Color::Cyan),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,

            title_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            intro_style: Style::default().fg(Color::DarkGray),
            link_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            sidebar_border_style: Style::default().fg(Color::Gray),
            nav_selected_style: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            nav_style: Style::default().fg(Color::Black),
            capability_style: Style::default().fg(Color::DarkGray),

            heading_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            quote_style: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::ITALIC),
            quote_bar_style: Style::default().fg(Color::Gray),
            text_style: Style::default().fg(Color::Black),
            notice_style: Style::default().fg(Color::Rgb(160, 110, 0)),
            error_style: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            caption_style: Style::default().fg(Color::Gray),
            streaming_indicator_style: Style::default().fg(Color::Blue),

            input_border_style: Style::default().fg(Color::Gray),
            input_focused_border_style: Style::default().fg(Color::Blue),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            // Unknown names fall back to dark
            _ => Self::dark_default(),
        }
    }
}
