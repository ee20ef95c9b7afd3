use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::api::{RondaFine, RondaSchedule};
use crate::logic::formatting::{format_optional_date, format_rupiah};
use crate::model::{LoadTarget, Model};
use crate::ui::list::{empty_text, pane_block, render_selectable_list};
use crate::Screen;

fn schedule_row(schedule: &RondaSchedule, user_id: Option<u64>) -> Line<'static> {
    let members = if schedule.members.is_empty() {
        "belum ada petugas".to_string()
    } else {
        schedule
            .members
            .iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mine = user_id.is_some_and(|id| schedule.members.iter().any(|m| m.id == id));

    let mut spans = vec![
        Span::raw(format!(
            "{} {}",
            format_optional_date(schedule.date.as_deref()),
            schedule.shift.as_deref().unwrap_or("")
        )),
        Span::styled(
            format!("  {}", schedule.location.as_deref().unwrap_or("-")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!("  {}", members)),
    ];
    if mine {
        spans.push(Span::styled("  (Anda)", Style::default().fg(Color::Green)));
    }
    Line::from(spans)
}

fn fine_row(fine: &RondaFine) -> Line<'static> {
    Line::from(vec![
        Span::styled(format_rupiah(fine.amount), Style::default().fg(Color::Red)),
        Span::raw(format!(
            "  {}  {}",
            format_optional_date(fine.date.as_deref()),
            fine.reason.as_deref().unwrap_or("")
        )),
    ])
}

pub fn render_ronda(f: &mut Frame, area: Rect, model: &Model) {
    let ronda = &model.screens.ronda;
    let loading = model.performance.is_loading(&LoadTarget::Ronda);
    let user_id = model.session.user_id();

    let fines_height = if ronda.unpaid_fines.is_empty() {
        0
    } else {
        (ronda.unpaid_fines.len() as u16 + 2).min(8)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length((ronda.mine.len() as u16 + 2).clamp(3, 8)),
            Constraint::Length(fines_height),
        ])
        .split(area);

    let today_rows = ronda.today.iter().map(|s| schedule_row(s, user_id)).collect();
    render_selectable_list(
        f,
        chunks[0],
        pane_block("Jadwal ronda hari ini".to_string(), true),
        today_rows,
        model.navigation.selection(Screen::Ronda),
        empty_text(loading, "Tidak ada jadwal hari ini"),
    );

    let mine: Vec<Line> = if ronda.mine.is_empty() {
        vec![Line::from(Span::styled(
            "Tidak ada jadwal",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        ronda.mine.iter().map(|s| schedule_row(s, None)).collect()
    };
    f.render_widget(
        Paragraph::new(mine).block(pane_block("Jadwal saya".to_string(), false)),
        chunks[1],
    );

    if !ronda.unpaid_fines.is_empty() {
        let total: f64 = ronda.unpaid_fines.iter().map(|fine| fine.amount).sum();
        let fines: Vec<Line> = ronda.unpaid_fines.iter().map(fine_row).collect();
        f.render_widget(
            Paragraph::new(fines).block(pane_block(
                format!("Denda belum dibayar ({})", format_rupiah(total)),
                false,
            )),
            chunks[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_row_marks_own_shift() {
        let schedule: RondaSchedule = serde_json::from_value(serde_json::json!({
            "id": 3,
            "date": "2024-08-17",
            "shift": "malam",
            "location": "Pos 1",
            "members": [{ "id": 42, "name": "Pak Budi" }, { "id": 7, "name": "Pak Joko" }]
        }))
        .unwrap();

        let text = |line: Line| -> String { line.spans.iter().map(|s| s.content.to_string()).collect() };
        let mine = text(schedule_row(&schedule, Some(42)));
        assert!(mine.contains("17 Agu 2024 malam"));
        assert!(mine.contains("Pak Budi, Pak Joko"));
        assert!(mine.ends_with("(Anda)"));

        assert!(!text(schedule_row(&schedule, Some(1))).contains("(Anda)"));
    }
}
