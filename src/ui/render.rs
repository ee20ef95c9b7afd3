use crate::App;
use crate::Screen;
use ratatui::Frame;

use super::{
    bansos, beranda, dialogs, kas, kost, layout, legend, login, pasar, pengumuman, ronda,
    status_bar, system_bar, toast, voting,
};

/// Main render function - orchestrates all UI rendering
///
/// This function is called on every frame and is responsible for:
/// 1. Calculating layout
/// 2. Rendering the tab bar, the active tab, legend and status bar
/// 3. Rendering any active dialogs/popups on top
pub fn render(f: &mut Frame, app: &App) {
    let model = &app.model;
    let size = f.area();

    let legend_ctx = legend::LegendContext {
        vim_mode: model.ui.vim_mode,
        signed_in: model.session.is_signed_in(),
        screen: model.navigation.screen,
        house_open: model.navigation.open_house.is_some(),
        pasar_pane: model.navigation.pasar_pane,
        has_product_search: model.screens.product_search.is_some(),
    };
    let legend_height = legend::calculate_legend_height(size.width, &legend_ctx);

    let layout_info = layout::calculate_layout(size, legend_height, 3);

    system_bar::render_system_bar(
        f,
        layout_info.system_area,
        &model.session,
        model.navigation.screen,
    );

    let content = layout_info.content_area;
    if !model.session.is_signed_in() {
        login::render_signed_out(f, content, &model.session);
    } else {
        match model.navigation.screen {
            Screen::Beranda => beranda::render_beranda(f, content, model),
            Screen::Kost => kost::render_kost(f, content, model),
            Screen::Pengumuman => pengumuman::render_pengumuman(f, content, model),
            Screen::Ronda => ronda::render_ronda(f, content, model),
            Screen::Kas => kas::render_kas(f, content, model),
            Screen::Voting => voting::render_voting(f, content, model),
            Screen::Bansos => bansos::render_bansos(f, content, model),
            Screen::Pasar => pasar::render_pasar(f, content, model),
        }
    }

    legend::render_legend(f, layout_info.legend_area, &legend_ctx);
    status_bar::render_status_bar(f, layout_info.status_area, model);

    // Dialogs, topmost last
    if model.ui.show_help {
        dialogs::render_help(f, model.ui.vim_mode);
    }
    if let Some(form) = &model.ui.input_form {
        dialogs::render_input_form(f, form);
    }
    if let Some(picker) = &model.ui.option_picker {
        dialogs::render_option_picker(f, picker);
    }
    if let Some(action) = &model.ui.confirm_action {
        dialogs::render_confirmation(f, action);
    }

    // Toast notification on top of everything
    if let Some(message) = &model.ui.toast {
        toast::render_toast(f, size, message);
    }
}
