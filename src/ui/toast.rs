use crate::model::Toast;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Render a toast notification (brief pop-up message)
pub fn render_toast(f: &mut Frame, area: Rect, toast: &Toast) {
    let max_width = (area.width as usize).min(80);
    let toast_width = (toast.message.width() + 6).min(max_width) as u16;
    // Long messages wrap onto a second line
    let toast_height = if toast.message.width() + 6 > max_width { 5 } else { 4 };

    let toast_area = Rect {
        x: area.x + (area.width.saturating_sub(toast_width)) / 2,
        y: area.y + 3,
        width: toast_width,
        height: toast_height.min(area.height),
    };

    // Clear the area first to prevent background bleed-through
    f.render_widget(Clear, toast_area);

    let (icon, color) = if toast.is_error() {
        ("✗ ", Color::Red)
    } else {
        ("✓ ", Color::Green)
    };

    let toast_line = Line::from(vec![
        Span::styled(icon, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(toast.message.as_str(), Style::default()),
    ]);

    let toast_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

    let toast_text = Paragraph::new(vec![toast_line])
        .block(toast_block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(toast_text, toast_area);
}
