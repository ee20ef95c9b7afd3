use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    Frame,
};

use crate::api::BansosRecipient;
use crate::logic::formatting::format_optional_date;
use crate::model::{LoadTarget, Model};
use crate::ui::list::{empty_text, pane_block, render_selectable_list};
use crate::Screen;

fn recipient_row(recipient: &BansosRecipient) -> Line<'static> {
    let status = if recipient.is_distributed() {
        Span::styled(
            format!(
                "✓ Disalurkan {}",
                format_optional_date(recipient.distributed_at.as_deref())
            ),
            Style::default().fg(Color::Green),
        )
    } else {
        Span::styled("○ Menunggu", Style::default().fg(Color::Yellow))
    };

    Line::from(vec![
        Span::raw(format!("{:<24}", recipient.name)),
        Span::styled(
            format!("{:<18}", recipient.nik.as_deref().unwrap_or("-")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!("{:<16}", recipient.program.as_deref().unwrap_or("-"))),
        status,
    ])
}

pub fn render_bansos(f: &mut Frame, area: Rect, model: &Model) {
    let loading = model.performance.is_loading(&LoadTarget::Bansos);
    let distributed = model
        .screens
        .bansos
        .iter()
        .filter(|r| r.is_distributed())
        .count();

    let rows = model.screens.bansos.iter().map(recipient_row).collect();
    render_selectable_list(
        f,
        area,
        pane_block(
            format!(
                "Penerima bansos ({}/{} disalurkan)",
                distributed,
                model.screens.bansos.len()
            ),
            true,
        ),
        rows,
        model.navigation.selection(Screen::Bansos),
        empty_text(loading, "Belum ada penerima"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_shows_distribution_state() {
        let pending: BansosRecipient = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Bu Sri", "program": "PKH"
        }))
        .unwrap();
        let text = |r: &BansosRecipient| -> String {
            recipient_row(r).spans.iter().map(|s| s.content.to_string()).collect()
        };
        assert!(text(&pending).ends_with("○ Menunggu"));

        let done: BansosRecipient = serde_json::from_value(serde_json::json!({
            "id": 2, "name": "Pak Hadi", "status": "distributed", "distributed_at": "2024-06-01"
        }))
        .unwrap();
        assert!(text(&done).ends_with("✓ Disalurkan 1 Jun 2024"));
    }
}
