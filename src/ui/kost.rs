//! Kost tab: boarding house list and the room grid of the open house

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::api::BoardingHouse;
use crate::logic::formatting::{format_optional_date, format_rupiah};
use crate::logic::room_grid::{GridCursor, RoomGrid, RoomSlot};
use crate::logic::room_status::{tally, RoomStatus};
use crate::model::{LoadTarget, Model};
use crate::ui::list::{empty_text, pane_block, render_selectable_list};
use crate::Screen;

/// Cell color for each room status
pub fn status_color(status: RoomStatus) -> Color {
    match status {
        RoomStatus::Empty => Color::DarkGray,
        RoomStatus::Nonaktif => Color::Gray,
        RoomStatus::BelumAktif => Color::Blue,
        RoomStatus::BelumBayar => Color::Red,
        RoomStatus::Tunggakan => Color::Magenta,
        RoomStatus::JatuhTempo => Color::Yellow,
        RoomStatus::Lunas => Color::Green,
    }
}

pub fn render_kost(f: &mut Frame, area: Rect, model: &Model) {
    match model.navigation.open_house {
        Some(house_id) => render_house(f, area, model, house_id),
        None => render_house_list(f, area, model),
    }
}

fn house_row(house: &BoardingHouse) -> Line<'static> {
    let occupied = house
        .tenants
        .iter()
        .filter(|t| !t.status.is_inactive())
        .count();
    let mut spans = vec![
        Span::styled(house.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            "  {} lantai · {}/{} kamar terisi",
            house.total_floors, occupied, house.total_rooms
        )),
    ];
    if let Some(price) = house.monthly_price {
        spans.push(Span::styled(
            format!("  {}/bln", format_rupiah(price)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn render_house_list(f: &mut Frame, area: Rect, model: &Model) {
    let loading = model.performance.is_loading(&LoadTarget::BoardingHouses);
    let rows = model.screens.boarding_houses.iter().map(house_row).collect();

    render_selectable_list(
        f,
        area,
        pane_block(
            format!("Kost ({})", model.screens.boarding_houses.len()),
            true,
        ),
        rows,
        model.navigation.selection(Screen::Kost),
        empty_text(loading, "Belum ada kost"),
    );
}

/// One line per floor, top floor first, the cursor's room reversed
pub fn grid_lines(grid: &RoomGrid, cursor: GridCursor, today: NaiveDate) -> Vec<Line<'static>> {
    grid.floors
        .iter()
        .enumerate()
        .rev()
        .map(|(floor_idx, floor)| {
            let mut spans = vec![Span::styled(
                format!("Lt {:<2} ", floor.number),
                Style::default().fg(Color::DarkGray),
            )];
            for (room_idx, slot) in floor.rooms.iter().enumerate() {
                let status = slot.status(today);
                let mut style = Style::default().fg(status_color(status));
                if cursor.floor == floor_idx && cursor.room == room_idx {
                    style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                }
                spans.push(Span::styled(
                    format!("[{:>3} {}]", slot.number, status.badge()),
                    style,
                ));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect()
}

/// Legend with the number of rooms per status
pub fn tally_line(grid: &RoomGrid, today: NaiveDate) -> Line<'static> {
    let mut spans = Vec::new();
    for (status, count) in tally(grid.statuses(today)) {
        spans.push(Span::styled(
            format!("{} {} {}", status.badge(), status.label(), count),
            Style::default().fg(status_color(status)),
        ));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

fn room_detail_lines(slot: &RoomSlot, today: NaiveDate) -> Vec<Line<'static>> {
    let status = slot.status(today);
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("Kamar {}  ", slot.number),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(status.label(), Style::default().fg(status_color(status))),
    ])];

    let Some(tenant) = &slot.tenant else {
        lines.push(Line::from("Kamar kosong"));
        return lines;
    };

    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<10}", label), Style::default().fg(Color::Yellow)),
            Span::raw(value),
        ])
    };

    lines.push(field("Penghuni", tenant.name.clone()));
    if let Some(phone) = &tenant.phone {
        lines.push(field("Telepon", phone.clone()));
    }
    lines.push(field("Mulai", format_optional_date(tenant.start_date.as_deref())));
    lines.push(field("Jatuh tempo", format_optional_date(tenant.due_date.as_deref())));
    if let Some(rent) = tenant.rent_amount {
        lines.push(field("Sewa", format_rupiah(rent)));
    }
    if let Some(deposit) = tenant.deposit_amount {
        let status = tenant
            .deposit_status
            .as_deref()
            .map(|s| format!(" ({})", s))
            .unwrap_or_default();
        lines.push(field("Deposit", format!("{}{}", format_rupiah(deposit), status)));
    }
    lines
}

fn render_house(f: &mut Frame, area: Rect, model: &Model, house_id: u64) {
    let loading = model
        .performance
        .is_loading(&LoadTarget::BoardingHouse(house_id));

    let Some(house) = model
        .screens
        .house_detail
        .as_ref()
        .filter(|h| h.id == house_id)
    else {
        let placeholder = Paragraph::new(empty_text(loading, "Data kost tidak tersedia"))
            .style(Style::default().fg(Color::DarkGray))
            .block(pane_block("Kamar".to_string(), true));
        f.render_widget(placeholder, area);
        return;
    };

    let today = chrono::Local::now().date_naive();
    let grid = &model.screens.room_grid;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let grid_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(chunks[0]);

    let mut title = format!("{} · {} kamar", house.name, grid.room_count());
    if !grid.unplaced.is_empty() {
        title.push_str(&format!(" · {} penghuni tanpa kamar", grid.unplaced.len()));
    }

    let grid_widget = Paragraph::new(grid_lines(grid, model.navigation.grid_cursor, today))
        .block(pane_block(title, true))
        .wrap(Wrap { trim: false });
    f.render_widget(grid_widget, grid_chunks[0]);

    let tally_widget = Paragraph::new(tally_line(grid, today))
        .block(pane_block("Ringkasan".to_string(), false));
    f.render_widget(tally_widget, grid_chunks[1]);

    let detail = match model.selected_room() {
        Some(slot) => room_detail_lines(slot, today),
        None => vec![Line::from("Tidak ada kamar")],
    };
    let detail_widget = Paragraph::new(detail)
        .block(pane_block("Detail".to_string(), false))
        .wrap(Wrap { trim: false });
    f.render_widget(detail_widget, chunks[1]);
}
