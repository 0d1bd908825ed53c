use ratatui::style::Color;

pub struct Theme {
    pub border_focus: Color,
    pub border_inactive: Color,
    pub transcript_border: Color,
    pub title_fg: Color,
    pub error_fg: Color,
    pub hint_fg: Color,
}

pub const THEME: Theme = Theme {
    border_focus: Color::Cyan,
    border_inactive: Color::DarkGray,
    transcript_border: Color::DarkGray,
    title_fg: Color::Yellow,
    error_fg: Color::Red,
    hint_fg: Color::DarkGray,
};
