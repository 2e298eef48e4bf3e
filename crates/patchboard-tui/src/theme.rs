use patchboard_core::{AnimationClass, HexColor, StatusBadge};
use ratatui::style::{Color, Modifier, Style};

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Rgb(142, 192, 124))
    .add_modifier(Modifier::BOLD);
pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(131, 165, 152))
    .fg(Color::Black)
    .add_modifier(Modifier::BOLD);
pub const MUTED_STYLE: Style = Style::new().fg(Color::Rgb(146, 131, 116));
pub const BORDER_STYLE: Style = Style::new().fg(Color::Rgb(80, 73, 69));
pub const PLACEHOLDER_STYLE: Style = Style::new()
    .fg(Color::Rgb(146, 131, 116))
    .add_modifier(Modifier::ITALIC);
pub const NOTICE_STYLE: Style = Style::new().fg(Color::Rgb(254, 128, 25));

pub fn badge_style(badge: StatusBadge) -> Style {
    let bg = match badge {
        StatusBadge::Open => Color::Rgb(104, 157, 106),
        StatusBadge::Closed => Color::Rgb(214, 93, 14),
        StatusBadge::Merged => Color::Rgb(177, 98, 134),
    };
    Style::new()
        .bg(bg)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

pub fn avatar_color(color: HexColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

pub fn node_style(active: bool, animation: Option<AnimationClass>) -> Style {
    if !active {
        return MUTED_STYLE;
    }
    let fg = match animation {
        Some(AnimationClass::Hacking) => Color::Rgb(251, 73, 52),
        Some(AnimationClass::Fixing) => Color::Rgb(250, 189, 47),
        Some(AnimationClass::Merging) => Color::Rgb(211, 134, 155),
        None => Color::Rgb(131, 165, 152),
    };
    Style::new().fg(fg).add_modifier(Modifier::BOLD)
}

pub mod icons {
    pub const AVATAR: &str = "●";
    pub const NODE_ACTIVE: &str = "◆";
    pub const NODE_IDLE: &str = "◇";
    pub const ITEM: &str = "-";
    pub const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
}

/// Edge glyph for the given animation and UI frame.
pub fn edge_glyph(animation: Option<AnimationClass>, frame: u64) -> &'static str {
    let frames: &[&str] = match animation {
        Some(AnimationClass::Hacking) => &["-->", ">->", "->>", "-->"],
        Some(AnimationClass::Fixing) => &["~~>", "~>~", ">~~", "~~>"],
        Some(AnimationClass::Merging) => &["==>", ">=>", "=>>", "==>"],
        None => return "---",
    };
    frames[(frame as usize) % frames.len()]
}
