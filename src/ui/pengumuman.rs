use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::api::{Announcement, Comment};
use crate::logic::formatting::format_optional_date;
use crate::model::{LoadTarget, Model};
use crate::ui::layout::split_horizontal;
use crate::ui::list::{empty_text, pane_block, render_selectable_list};
use crate::Screen;

fn announcement_row(announcement: &Announcement, pending: bool) -> Line<'static> {
    let heart = if announcement.is_liked { "♥" } else { "♡" };
    let heart_style = if announcement.is_liked {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut spans = vec![
        Span::raw(announcement.title.clone()),
        Span::styled(format!("  {} {}", heart, announcement.likes_count), heart_style),
        Span::styled(
            format!("  💬 {}", announcement.comments_count),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if pending {
        spans.push(Span::styled(" …", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

fn comment_lines(comments: &[Comment]) -> Vec<Line<'static>> {
    comments
        .iter()
        .flat_map(|c| {
            let author = c
                .user
                .as_ref()
                .map(|u| u.name.clone())
                .unwrap_or_else(|| "Warga".to_string());
            [
                Line::from(vec![
                    Span::styled(author, Style::default().fg(Color::Cyan)),
                    Span::styled(
                        format!("  {}", format_optional_date(c.created_at.as_deref())),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(format!("  {}", c.content)),
            ]
        })
        .collect()
}

pub fn render_pengumuman(f: &mut Frame, area: Rect, model: &Model) {
    let (list_area, detail_area) = split_horizontal(area, 45);

    let loading = model.performance.is_loading(&LoadTarget::Announcements);
    let rows = model
        .screens
        .announcements
        .iter()
        .map(|a| announcement_row(a, model.performance.pending_reactions.contains_key(&a.id)))
        .collect();

    render_selectable_list(
        f,
        list_area,
        pane_block("Pengumuman".to_string(), true),
        rows,
        model.navigation.selection(Screen::Pengumuman),
        empty_text(loading, "Belum ada pengumuman"),
    );

    let Some(announcement) = model.selected_announcement() else {
        f.render_widget(pane_block("Detail".to_string(), false), detail_area);
        return;
    };

    let author = announcement
        .author
        .as_ref()
        .map(|a| a.name.as_str())
        .unwrap_or("Pengurus");
    let mut lines = vec![
        Line::from(Span::styled(
            announcement.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{} · {}",
                author,
                format_optional_date(announcement.created_at.as_deref())
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    lines.extend(announcement.content.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Komentar ({})", announcement.comments_count),
        Style::default().fg(Color::Yellow),
    )));

    match model.screens.comments.get(&announcement.id) {
        Some(comments) if !comments.is_empty() => lines.extend(comment_lines(comments)),
        Some(_) => lines.push(Line::from("  Belum ada komentar")),
        None => {
            let loading = model
                .performance
                .is_loading(&LoadTarget::Comments(announcement.id));
            lines.push(Line::from(format!("  {}", empty_text(loading, "-"))));
        }
    }

    let detail = Paragraph::new(lines)
        .block(pane_block("Detail".to_string(), false))
        .wrap(Wrap { trim: false });
    f.render_widget(detail, detail_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_marks_liked_and_pending() {
        let announcement: Announcement = serde_json::from_value(serde_json::json!({
            "id": 1, "title": "Kerja bakti", "likes_count": 4, "comments_count": 2, "is_liked": true
        }))
        .unwrap();

        let row = announcement_row(&announcement, true);
        let text: String = row.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("♥ 4"));
        assert!(text.contains("💬 2"));
        assert!(text.ends_with('…'));
    }
}
