use crate::api::WargaDashboard;
use crate::logic::formatting::{format_optional_date, format_rupiah};
use crate::model::{LoadTarget, Model};
use crate::ui::layout::split_top;
use crate::ui::list::{empty_text, pane_block, render_selectable_list};
use crate::Screen;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn summary_lines(dashboard: &WargaDashboard) -> Vec<Line<'static>> {
    let bills_style = if dashboard.unpaid_bills_count > 0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("Tagihan belum dibayar: ", Style::default().fg(Color::Yellow)),
        Span::styled(
            format!(
                "{} ({})",
                dashboard.unpaid_bills_count,
                format_rupiah(dashboard.unpaid_bills_total)
            ),
            bills_style,
        ),
    ])];

    if let Some(balance) = dashboard.kas_balance {
        lines.push(Line::from(vec![
            Span::styled("Saldo kas RT: ", Style::default().fg(Color::Yellow)),
            Span::raw(format_rupiah(balance)),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled("Voting aktif: ", Style::default().fg(Color::Yellow)),
        Span::raw(dashboard.active_polls_count.to_string()),
    ]));

    let ronda = match &dashboard.next_ronda {
        Some(schedule) => format!(
            "{} {}{}",
            format_optional_date(schedule.date.as_deref()),
            schedule.shift.as_deref().unwrap_or(""),
            schedule
                .location
                .as_deref()
                .map(|l| format!(" @ {}", l))
                .unwrap_or_default()
        ),
        None => "Tidak ada jadwal".to_string(),
    };
    lines.push(Line::from(vec![
        Span::styled("Ronda berikutnya: ", Style::default().fg(Color::Yellow)),
        Span::raw(ronda),
    ]));

    lines
}

pub fn render_beranda(f: &mut Frame, area: Rect, model: &Model) {
    let loading = model.performance.is_loading(&LoadTarget::Dashboard);

    let Some(dashboard) = &model.screens.dashboard else {
        let placeholder = Paragraph::new(empty_text(loading, "Belum ada data"))
            .style(Style::default().fg(Color::DarkGray))
            .block(pane_block("Beranda".to_string(), true));
        f.render_widget(placeholder, area);
        return;
    };

    let (summary_area, list_area) = split_top(area, 6);

    let summary = Paragraph::new(summary_lines(dashboard))
        .block(pane_block(format!("Halo, {}", model.session.display_name()), false));
    f.render_widget(summary, summary_area);

    let rows = dashboard
        .latest_announcements
        .iter()
        .map(|a| {
            Line::from(vec![
                Span::raw(a.title.clone()),
                Span::styled(
                    format!("  {}", format_optional_date(a.created_at.as_deref())),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    render_selectable_list(
        f,
        list_area,
        pane_block("Pengumuman terbaru".to_string(), true),
        rows,
        model.navigation.selection(Screen::Beranda),
        "Belum ada pengumuman",
    );
}
