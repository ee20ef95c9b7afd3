use crate::model::PasarPane;
use crate::Screen;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// What the legend depends on
#[derive(Debug, Clone, Copy)]
pub struct LegendContext {
    pub vim_mode: bool,
    pub signed_in: bool,
    pub screen: Screen,
    /// Kost tab shows a room grid instead of the house list
    pub house_open: bool,
    pub pasar_pane: PasarPane,
    pub has_product_search: bool,
}

fn key(spans: &mut Vec<Span<'static>>, key: &'static str, label: &'static str) {
    spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(format!(":{}  ", label)));
}

/// Build hotkey spans (extracted for testability)
fn build_hotkey_spans(ctx: &LegendContext) -> Vec<Span<'static>> {
    let mut spans = vec![];

    if !ctx.signed_in {
        key(&mut spans, "Enter", "Masuk");
        key(&mut spans, "^D", "Demo");
        key(&mut spans, "^R", "Lupa password");
        key(&mut spans, "?", "Bantuan");
        spans.push(Span::styled("q", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(":Keluar"));
        return spans;
    }

    // Navigation keys (different for vim mode)
    let grid = ctx.screen == Screen::Kost && ctx.house_open;
    match (grid, ctx.vim_mode) {
        (true, true) => key(&mut spans, "hjkl", "Pilih kamar"),
        (true, false) => key(&mut spans, "←↑↓→", "Pilih kamar"),
        (false, true) => {
            key(&mut spans, "j/k", "Nav");
            key(&mut spans, "gg/G", "Awal/Akhir");
        }
        (false, false) => key(&mut spans, "↑/↓", "Nav"),
    }
    key(&mut spans, "1-8/Tab", "Menu");

    match ctx.screen {
        Screen::Beranda => {}
        Screen::Kost if ctx.house_open => {
            key(&mut spans, "p", "Bayar sewa");
            key(&mut spans, "d", "Bayar deposit");
            key(&mut spans, "x", "Proses deposit");
            key(&mut spans, "Esc", "Daftar kost");
        }
        Screen::Kost => {
            key(&mut spans, "Enter", "Lihat kamar");
            key(&mut spans, "n", "Tambah kost");
        }
        Screen::Pengumuman => {
            key(&mut spans, "f", "Suka");
            key(&mut spans, "c", "Komentar");
        }
        Screen::Ronda => {
            key(&mut spans, "a", "Ikut ronda");
            key(&mut spans, "n", "Buat jadwal");
        }
        Screen::Kas => key(&mut spans, "t", "Transfer"),
        Screen::Voting => {
            key(&mut spans, "v", "Pilih");
            key(&mut spans, "n", "Buat voting");
        }
        Screen::Bansos => {
            key(&mut spans, "n", "Tambah");
            key(&mut spans, "e", "Ubah");
            key(&mut spans, "x", "Hapus");
            key(&mut spans, "s", "Salurkan");
        }
        Screen::Pasar => {
            match ctx.pasar_pane {
                PasarPane::Products => {
                    key(&mut spans, "s", "Toko");
                    key(&mut spans, "/", "Cari");
                    if ctx.has_product_search {
                        key(&mut spans, "Esc", "Hapus pencarian");
                    }
                    key(&mut spans, "n", "Tambah produk");
                }
                PasarPane::Stores => {
                    key(&mut spans, "s", "Produk");
                    key(&mut spans, "v", "Verifikasi");
                    key(&mut spans, "n", "Buka toko");
                }
            }
        }
    }

    key(&mut spans, "r", "Muat ulang");
    key(&mut spans, "O", "Logout");
    key(&mut spans, "?", "Bantuan");

    // Quit - always available
    spans.push(Span::styled("q", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(":Keluar"));

    spans
}

/// Build the legend paragraph (reusable for both rendering and height calculation)
pub fn build_legend_paragraph(ctx: &LegendContext) -> Paragraph<'static> {
    Paragraph::new(vec![Line::from(build_hotkey_spans(ctx))])
        .block(Block::default().borders(Borders::ALL).title("Tombol"))
        .style(Style::default().fg(Color::Gray))
        .wrap(ratatui::widgets::Wrap { trim: false })
}

pub fn render_legend(f: &mut Frame, area: Rect, ctx: &LegendContext) {
    f.render_widget(build_legend_paragraph(ctx), area);
}

/// Calculate required height for legend based on terminal width and content
pub fn calculate_legend_height(terminal_width: u16, ctx: &LegendContext) -> u16 {
    // line_count() miscounts with a bordered block attached, so count bare text
    let paragraph_for_counting = Paragraph::new(vec![Line::from(build_hotkey_spans(ctx))])
        .wrap(ratatui::widgets::Wrap { trim: false });

    let available_width = terminal_width.saturating_sub(2);
    let line_count = paragraph_for_counting.line_count(available_width);

    // Add top + bottom borders, ensure minimum of 3
    (line_count as u16).saturating_add(2).max(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(screen: Screen) -> LegendContext {
        LegendContext {
            vim_mode: false,
            signed_in: true,
            screen,
            house_open: false,
            pasar_pane: PasarPane::Products,
            has_product_search: false,
        }
    }

    /// Helper function to convert spans to plain text for assertions
    fn spans_to_text(spans: &[Span]) -> String {
        spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_signed_out_legend_offers_login() {
        let mut c = ctx(Screen::Beranda);
        c.signed_in = false;
        let text = spans_to_text(&build_hotkey_spans(&c));
        assert!(text.contains("Masuk"));
        assert!(text.contains("Demo"));
        assert!(!text.contains("Logout"));
    }

    #[test]
    fn test_kost_legend_follows_open_house() {
        let list = spans_to_text(&build_hotkey_spans(&ctx(Screen::Kost)));
        assert!(list.contains("Lihat kamar"));
        assert!(!list.contains("Bayar sewa"));

        let mut grid = ctx(Screen::Kost);
        grid.house_open = true;
        grid.vim_mode = true;
        let text = spans_to_text(&build_hotkey_spans(&grid));
        assert!(text.contains("Bayar sewa"));
        assert!(text.contains("hjkl"));
    }

    #[test]
    fn test_pasar_legend_per_pane() {
        let mut c = ctx(Screen::Pasar);
        c.has_product_search = true;
        let products = spans_to_text(&build_hotkey_spans(&c));
        assert!(products.contains("Hapus pencarian"));
        assert!(!products.contains("Verifikasi"));

        c.pasar_pane = PasarPane::Stores;
        let stores = spans_to_text(&build_hotkey_spans(&c));
        assert!(stores.contains("Verifikasi"));
    }

    #[test]
    fn test_legend_height_grows_when_narrow() {
        let c = ctx(Screen::Bansos);
        let wide = calculate_legend_height(300, &c);
        let narrow = calculate_legend_height(40, &c);
        assert_eq!(wide, 3);
        assert!(narrow > wide);
    }
}
