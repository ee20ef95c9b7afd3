use crate::model::{ConnectionState, SessionModel};
use crate::Screen;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render connection status span based on connection state
fn render_connection_status(state: &ConnectionState) -> Span<'_> {
    match state {
        ConnectionState::Online => Span::styled("🟢", Style::default().fg(Color::Green)),
        ConnectionState::Offline { .. } => {
            Span::styled("🔴 Offline", Style::default().fg(Color::Red))
        }
    }
}

/// Tab titles with their number hotkeys, the active one highlighted
fn tab_spans(active: Screen) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (idx, screen) in Screen::ALL.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }
        let text = format!(" {} {} ", idx + 1, screen.title());
        if *screen == active {
            spans.push(Span::styled(
                text,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(text));
        }
    }
    spans
}

/// Render the top bar: tabs on the left, signed-in user on the title
pub fn render_system_bar(f: &mut Frame, area: Rect, session: &SessionModel, active: Screen) {
    let title = if session.is_signed_in() {
        let mut title = format!(" {} · {}", session.display_name(), session.role().label());
        if let Some(profile) = &session.profile {
            if let Some(rt) = &profile.rt {
                title.push_str(&format!(" · RT {}", rt));
            }
            if let Some(rw) = &profile.rw {
                title.push_str(&format!("/RW {}", rw));
            }
        }
        title.push(' ');
        title
    } else {
        " Warga TUI ".to_string()
    };

    let line = if session.is_signed_in() {
        let mut spans = vec![render_connection_status(&session.connection_state), Span::raw(" ")];
        spans.extend(tab_spans(active));
        Line::from(spans)
    } else {
        Line::from(vec![
            render_connection_status(&session.connection_state),
            Span::raw(" Belum masuk"),
        ])
    };

    let widget = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(Color::Gray));

    f.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabs_list_every_screen_in_order() {
        let text: String = tab_spans(Screen::Kas)
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.contains("1 Beranda"));
        assert!(text.contains("5 Kas RT"));
        assert!(text.find("Beranda") < text.find("Pasar"));
    }

    #[test]
    fn test_active_tab_is_highlighted() {
        let spans = tab_spans(Screen::Voting);
        let active = spans
            .iter()
            .find(|s| s.content.contains("Voting"))
            .unwrap();
        assert_eq!(active.style.bg, Some(Color::Cyan));
    }
}
