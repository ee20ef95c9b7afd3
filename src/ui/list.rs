use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Bordered block, highlighted when it has focus
pub fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border))
}

/// Placeholder text for a list with no rows yet
pub fn empty_text(loading: bool, empty: &'static str) -> &'static str {
    if loading {
        "Memuat..."
    } else {
        empty
    }
}

/// Render rows with the selected one highlighted
///
/// An empty list shows `empty` centered in the pane instead.
pub fn render_selectable_list(
    f: &mut Frame,
    area: Rect,
    block: Block<'static>,
    rows: Vec<Line<'static>>,
    selection: Option<usize>,
    empty: &'static str,
) {
    if rows.is_empty() {
        let placeholder = Paragraph::new(empty)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = rows.into_iter().map(ListItem::new).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("► ");

    let mut state = ListState::default();
    state.select(selection);
    f.render_stateful_widget(list, area, &mut state);
}
