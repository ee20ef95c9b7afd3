use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    Frame,
};

use crate::api::{Product, Store};
use crate::logic::formatting::format_rupiah;
use crate::model::{LoadTarget, Model, PasarPane};
use crate::ui::layout::split_horizontal;
use crate::ui::list::{empty_text, pane_block, render_selectable_list};
use crate::Screen;

fn product_row(product: &Product) -> Line<'static> {
    let mut spans = vec![
        Span::raw(format!("{:<28}", product.name)),
        Span::styled(
            format!("{:>14}", format_rupiah(product.price)),
            Style::default().fg(Color::Green),
        ),
    ];
    match product.stock {
        Some(0) => spans.push(Span::styled("  habis", Style::default().fg(Color::Red))),
        Some(stock) => spans.push(Span::raw(format!("  stok {}", stock))),
        None => {}
    }
    if let Some(store) = &product.store {
        spans.push(Span::styled(
            format!("  · {}", store.name),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn store_row(store: &Store) -> Line<'static> {
    let badge = if store.is_verified {
        Span::styled("✓ ", Style::default().fg(Color::Green))
    } else {
        Span::styled("? ", Style::default().fg(Color::Yellow))
    };
    Line::from(vec![
        badge,
        Span::raw(store.name.clone()),
        Span::styled(
            format!("  {}", store.address.as_deref().unwrap_or("")),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

pub fn render_pasar(f: &mut Frame, area: Rect, model: &Model) {
    let (products_area, stores_area) = split_horizontal(area, 60);
    let pane = model.navigation.pasar_pane;
    let loading = model
        .performance
        .loading
        .keys()
        .any(|t| matches!(t, LoadTarget::Market { .. }));

    let products_title = match &model.screens.product_search {
        Some(query) => format!("Produk · \"{}\" ({})", query, model.screens.products.len()),
        None => format!("Produk ({})", model.screens.products.len()),
    };
    render_selectable_list(
        f,
        products_area,
        pane_block(products_title, pane == PasarPane::Products),
        model.screens.products.iter().map(product_row).collect(),
        model.navigation.selection(Screen::Pasar),
        empty_text(loading, "Tidak ada produk"),
    );

    render_selectable_list(
        f,
        stores_area,
        pane_block(
            format!("Toko ({})", model.screens.stores.len()),
            pane == PasarPane::Stores,
        ),
        model.screens.stores.iter().map(store_row).collect(),
        model.navigation.store_selection,
        empty_text(loading, "Belum ada toko"),
    );
}
