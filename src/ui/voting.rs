use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::api::Poll;
use crate::logic::formatting::format_optional_date;
use crate::model::{LoadTarget, Model};
use crate::ui::layout::split_horizontal;
use crate::ui::list::{empty_text, pane_block, render_selectable_list};
use crate::Screen;

const BAR_WIDTH: usize = 20;

/// Share of `votes` out of `total` as a bar of `width` cells
pub fn vote_bar(votes: u32, total: u32, width: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        ((votes as f64 / total as f64) * width as f64).round() as usize
    };
    format!("{}{}", "█".repeat(filled.min(width)), "░".repeat(width - filled.min(width)))
}

fn poll_row(poll: &Poll) -> Line<'static> {
    let mut spans = vec![Span::raw(poll.title.clone())];
    if poll.has_voted {
        spans.push(Span::styled("  ✓ sudah memilih", Style::default().fg(Color::Green)));
    }
    Line::from(spans)
}

fn poll_detail(poll: &Poll) -> Vec<Line<'static>> {
    let total = poll.total_votes();
    let mut lines = vec![Line::from(Span::styled(
        poll.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(description) = &poll.description {
        lines.push(Line::from(description.clone()));
    }
    lines.push(Line::from(Span::styled(
        format!(
            "Berakhir {} · {} suara",
            format_optional_date(poll.ends_at.as_deref()),
            total
        ),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    for option in &poll.options {
        let chosen = poll.user_vote_option_id == Some(option.id);
        let label_style = if chosen {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}", if chosen { "✓ " } else { "  " }, option.label),
            label_style,
        )));
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {} ", vote_bar(option.votes_count, total, BAR_WIDTH)),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(option.votes_count.to_string()),
        ]));
    }
    lines
}

pub fn render_voting(f: &mut Frame, area: Rect, model: &Model) {
    let (list_area, detail_area) = split_horizontal(area, 40);
    let loading = model.performance.is_loading(&LoadTarget::Polls);

    let rows = model.screens.polls.iter().map(poll_row).collect();
    render_selectable_list(
        f,
        list_area,
        pane_block("Voting".to_string(), true),
        rows,
        model.navigation.selection(Screen::Voting),
        empty_text(loading, "Belum ada voting"),
    );

    let detail = model.selected_poll().map(poll_detail).unwrap_or_default();
    f.render_widget(
        Paragraph::new(detail)
            .block(pane_block("Hasil".to_string(), false))
            .wrap(Wrap { trim: false }),
        detail_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_bar_proportions() {
        assert_eq!(vote_bar(0, 0, 4), "░░░░");
        assert_eq!(vote_bar(1, 2, 4), "██░░");
        assert_eq!(vote_bar(3, 3, 4), "████");
    }

    #[test]
    fn test_detail_marks_users_choice() {
        let poll: Poll = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Jadwal kerja bakti",
            "has_voted": true,
            "user_vote_option_id": 11,
            "options": [
                { "id": 10, "label": "Sabtu", "votes_count": 1 },
                { "id": 11, "label": "Minggu", "votes_count": 3 }
            ]
        }))
        .unwrap();

        let text: Vec<String> = poll_detail(&poll)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.to_string()).collect())
            .collect();
        assert!(text.iter().any(|l| l == "✓ Minggu"));
        assert!(text.iter().any(|l| l == "  Sabtu"));
        assert!(text.iter().any(|l| l.contains("4 suara")));
    }
}
