use crate::model::{ConfirmAction, FormKind, InputForm, OptionPicker};
use crate::ui::layout::centered_rect;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render a y/n confirmation for a pending action
pub fn render_confirmation(f: &mut Frame, action: &ConfirmAction) {
    let prompt_text = format!("{}\n\n(y) Ya   (n) Batal", action.prompt());

    let border = match action {
        ConfirmAction::DeleteBansos { .. } | ConfirmAction::Logout => Color::Red,
        _ => Color::Yellow,
    };

    let prompt_area = centered_rect(f.area(), 56, 7);
    let prompt = Paragraph::new(prompt_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(action.title())
                .border_style(Style::default().fg(border)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, prompt_area);
    f.render_widget(prompt, prompt_area);
}

/// Text shown for a field value (secrets are masked)
fn display_value(value: &str, secret: bool) -> String {
    if secret {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    }
}

/// Render the open text form, one labeled line per field
pub fn render_input_form(f: &mut Frame, form: &InputForm) {
    let mut lines: Vec<Line> = Vec::new();

    for (idx, field) in form.fields.iter().enumerate() {
        let focused = idx == form.focused;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(field.label.clone(), label_style)));

        let mut value = display_value(&field.value, field.secret);
        if focused {
            value.push('▏');
        }
        lines.push(Line::from(vec![Span::raw("  "), Span::raw(value)]));
    }

    lines.push(Line::from(""));
    let mut hint = vec![
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(":Lanjut/Kirim  "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(":Pindah  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(":Batal"),
    ];
    if form.kind == FormKind::Login {
        hint.extend(vec![
            Span::raw("  "),
            Span::styled("^D", Style::default().fg(Color::Yellow)),
            Span::raw(":Demo  "),
            Span::styled("^R", Style::default().fg(Color::Yellow)),
            Span::raw(":Lupa password"),
        ]);
    }
    lines.push(Line::from(hint));

    let height = (form.fields.len() as u16) * 2 + 4;
    let form_area = centered_rect(f.area(), 64, height);

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(form.kind.title())
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, form_area);
    f.render_widget(widget, form_area);
}

/// Render a list of choices; digits pick directly
pub fn render_option_picker(f: &mut Frame, picker: &OptionPicker) {
    let items: Vec<ListItem> = picker
        .options
        .iter()
        .enumerate()
        .map(|(idx, option)| {
            let prefix = if idx < 9 {
                format!("{} ", idx + 1)
            } else {
                "  ".to_string()
            };
            ListItem::new(Line::from(vec![
                Span::styled(prefix, Style::default().fg(Color::Yellow)),
                Span::raw(option.label.clone()),
            ]))
        })
        .collect();

    let menu_height = (picker.options.len() as u16 + 2).clamp(3, 20);
    let menu_area = centered_rect(f.area(), 50, menu_height);

    let menu = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} (Enter pilih, Esc batal)", picker.title))
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().bg(Color::Black))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("► ");

    let mut state = ListState::default();
    state.select(picker.selected);

    f.render_widget(Clear, menu_area);
    f.render_stateful_widget(menu, menu_area, &mut state);
}

const HELP_ROWS: &[(&str, &str)] = &[
    ("1-8, Tab", "Pindah menu"),
    ("↑/↓, Home/End", "Pilih baris"),
    ("r", "Muat ulang"),
    ("O", "Logout"),
    ("q, Ctrl+C", "Keluar aplikasi"),
    ("", ""),
    ("Kost", "Enter lihat kamar, n tambah kost"),
    ("Kamar", "p bayar sewa, d deposit, x proses deposit"),
    ("Pengumuman", "f suka, c komentar"),
    ("Ronda", "a ikut ronda, n buat jadwal"),
    ("Kas RT", "t transfer antar akun"),
    ("Voting", "v pilih, n buat voting"),
    ("Bansos", "n tambah, e ubah, x hapus, s salurkan"),
    ("Pasar", "s ganti panel, / cari, v verifikasi, n tambah"),
];

/// Keybinding help; any key closes it
pub fn render_help(f: &mut Frame, vim_mode: bool) {
    let mut lines: Vec<Line> = HELP_ROWS
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{:<16}", keys), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();

    if vim_mode {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(format!("{:<16}", "hjkl, gg/G"), Style::default().fg(Color::Yellow)),
            Span::raw("Navigasi vim"),
        ]));
    }

    let area = centered_rect(f.area(), 70, lines.len() as u16 + 2);
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Bantuan (tekan tombol apa saja)")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black));

    f.render_widget(Clear, area);
    f.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_values_are_masked() {
        assert_eq!(display_value("rahasia", true), "•••••••");
        assert_eq!(display_value("budi@example.id", false), "budi@example.id");
    }
}
