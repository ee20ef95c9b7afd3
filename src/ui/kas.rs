use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::api::{KasSummary, KasTransaction};
use crate::logic::formatting::{format_optional_date, format_rupiah};
use crate::model::{LoadTarget, Model};
use crate::ui::layout::split_top;
use crate::ui::list::{empty_text, pane_block, render_selectable_list};
use crate::Screen;

fn summary_lines(summary: &KasSummary) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled("Saldo ", Style::default().fg(Color::Yellow)),
        Span::raw(format_rupiah(summary.balance)),
        Span::styled("   Masuk ", Style::default().fg(Color::Yellow)),
        Span::styled(format_rupiah(summary.total_income), Style::default().fg(Color::Green)),
        Span::styled("   Keluar ", Style::default().fg(Color::Yellow)),
        Span::styled(format_rupiah(summary.total_expense), Style::default().fg(Color::Red)),
    ])];

    if !summary.accounts.is_empty() {
        let accounts = summary
            .accounts
            .iter()
            .map(|a| format!("#{} {} {}", a.id, a.name, format_rupiah(a.balance)))
            .collect::<Vec<_>>()
            .join("  │  ");
        lines.push(Line::from(Span::styled(
            accounts,
            Style::default().fg(Color::Gray),
        )));
    }
    lines
}

fn transaction_row(tx: &KasTransaction) -> Line<'static> {
    let (sign, color) = if tx.is_expense() {
        ("-", Color::Red)
    } else {
        ("+", Color::Green)
    };
    Line::from(vec![
        Span::styled(
            format!("{:<12}", format_optional_date(tx.date.as_deref())),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{}{:>16}", sign, format_rupiah(tx.amount)),
            Style::default().fg(color),
        ),
        Span::raw(format!("  {}", tx.description.as_deref().unwrap_or(&tx.kind))),
    ])
}

pub fn render_kas(f: &mut Frame, area: Rect, model: &Model) {
    let loading = model.performance.is_loading(&LoadTarget::Kas);
    let (summary_area, list_area) = split_top(area, 4);

    let summary = match &model.screens.kas_summary {
        Some(summary) => summary_lines(summary),
        None => vec![Line::from(empty_text(loading, "-"))],
    };
    f.render_widget(
        Paragraph::new(summary).block(pane_block("Kas RT".to_string(), false)),
        summary_area,
    );

    let rows = model
        .screens
        .kas_transactions
        .iter()
        .map(transaction_row)
        .collect();
    render_selectable_list(
        f,
        list_area,
        pane_block("Transaksi".to_string(), true),
        rows,
        model.navigation.selection(Screen::Kas),
        empty_text(loading, "Belum ada transaksi"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_rows_are_negative() {
        let tx: KasTransaction = serde_json::from_value(serde_json::json!({
            "id": 1, "type": "expense", "amount": "50000", "description": "Lampu jalan"
        }))
        .unwrap();
        let text: String = transaction_row(&tx)
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert!(text.contains("-       Rp 50.000"));
        assert!(text.ends_with("Lampu jalan"));
    }
}
