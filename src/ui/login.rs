use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::model::SessionModel;
use crate::ui::list::pane_block;

/// Background shown while signed out (the login form itself is a dialog)
pub fn render_signed_out(f: &mut Frame, area: Rect, session: &SessionModel) {
    let status = if session.signing_in {
        Span::styled("Sedang masuk...", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("Tekan Enter untuk masuk, Ctrl+D untuk akun demo.")
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Warga TUI",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("Sistem informasi RT/RW: kost, kas, ronda, voting, bansos dan pasar warga"),
        Line::from(""),
        Line::from(status),
    ];

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(pane_block("Masuk".to_string(), true));
    f.render_widget(widget, area);
}
