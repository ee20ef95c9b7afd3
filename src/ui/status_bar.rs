use crate::model::{ConnectionState, Model};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Build the status text
///
/// Shows what is loading, mutations still waiting for the server, the last
/// load time, and the network error while offline.
fn build_status_spans(model: &Model) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    let mut loading: Vec<&'static str> = model
        .performance
        .loading
        .keys()
        .map(|target| target.label())
        .collect();
    loading.sort_unstable();
    loading.dedup();

    if model.session.signing_in {
        spans.push(Span::styled("Masuk...", Style::default().fg(Color::Yellow)));
    } else if !loading.is_empty() {
        spans.push(Span::styled(
            format!("Memuat {}...", loading.join(", ")),
            Style::default().fg(Color::Yellow),
        ));
    } else {
        spans.push(Span::styled("Siap", Style::default().fg(Color::Green)));
    }

    if model.performance.pending_mutations > 0 {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("Menyimpan {}", model.performance.pending_mutations),
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(ms) = model.performance.last_load_time_ms {
        spans.push(Span::raw(format!(" │ {}ms", ms)));
    }

    if let ConnectionState::Offline { message, .. } = &model.session.connection_state {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(message.clone(), Style::default().fg(Color::Red)));
    }

    spans
}

/// Render the bottom status bar
pub fn render_status_bar(f: &mut Frame, area: Rect, model: &Model) {
    let widget = Paragraph::new(Line::from(build_status_spans(model)))
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(Style::default().fg(Color::Gray))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::errors::ErrorType;
    use crate::model::LoadTarget;

    fn text(model: &Model) -> String {
        build_status_spans(model)
            .iter()
            .map(|s| s.content.as_ref())
            .collect()
    }

    #[test]
    fn test_idle_status() {
        let model = Model::new(false);
        assert_eq!(text(&model), "Siap");
    }

    #[test]
    fn test_loading_and_pending_mutations() {
        let mut model = Model::new(false);
        model.performance.start_load(LoadTarget::Kas, 0);
        model.performance.pending_mutations = 2;
        model.performance.last_load_time_ms = Some(120);

        let status = text(&model);
        assert!(status.contains("Memuat kas RT..."));
        assert!(status.contains("Menyimpan 2"));
        assert!(status.contains("120ms"));
    }

    #[test]
    fn test_offline_shows_error() {
        let mut model = Model::new(false);
        model.session.connection_state = ConnectionState::Offline {
            error_type: ErrorType::Timeout,
            message: "request timed out".into(),
        };
        assert!(text(&model).contains("request timed out"));
    }
}
