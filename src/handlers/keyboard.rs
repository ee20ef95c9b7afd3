//! Keyboard Input Handler
//!
//! Handles all keyboard input and user interactions.
//! Modals (confirmation, form, picker, help) take every key while open;
//! otherwise keys are global, navigation, or actions of the active tab.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::screens::{GridStep, Step};
use crate::model::{ConfirmAction, FormKind, InputForm, PasarPane, VimCommandState};
use crate::services::Priority;
use crate::{App, Screen};

/// Handle keyboard input
///
/// Processes all keyboard events and dispatches to appropriate actions.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Update last user action timestamp for idle detection
    app.model.record_user_action();

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.model.ui.should_quit = true;
        return;
    }

    if app.model.ui.confirm_action.is_some() {
        handle_confirm_key(app, key);
        return;
    }
    if app.model.ui.input_form.is_some() {
        handle_form_key(app, key);
        return;
    }
    if app.model.ui.option_picker.is_some() {
        handle_picker_key(app, key);
        return;
    }
    if app.model.ui.show_help {
        // Any key closes help
        app.model.ui.show_help = false;
        return;
    }

    if !app.model.session.is_signed_in() {
        handle_signed_out_key(app, key);
        return;
    }

    if handle_global_key(app, key) || handle_navigation_key(app, key) {
        return;
    }
    app.model.ui.vim_command_state = VimCommandState::None;
    handle_screen_key(app, key);
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_pending(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.model.ui.confirm_action = None;
        }
        // Ignore other keys while prompt is showing
        _ => {}
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let is_login = matches!(
        app.model.ui.input_form.as_ref().map(|f| &f.kind),
        Some(FormKind::Login)
    );

    if ctrl && is_login {
        match key.code {
            KeyCode::Char('d') => app.start_demo_login(),
            KeyCode::Char('r') => app.open_form(InputForm::new(FormKind::ForgotPassword)),
            _ => {}
        }
        return;
    }

    let Some(form) = app.model.ui.input_form.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            app.model.ui.input_form = None;
        }
        KeyCode::Enter => {
            if form.is_last_field() {
                app.submit_form();
            } else {
                form.next_field();
            }
        }
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !ctrl => form.push_char(c),
        _ => {}
    }
}

fn handle_picker_key(app: &mut App, key: KeyEvent) {
    let vim_mode = app.model.ui.vim_mode;
    let Some(picker) = app.model.ui.option_picker.as_mut() else {
        return;
    };
    let len = picker.options.len();
    match key.code {
        KeyCode::Esc => app.model.ui.option_picker = None,
        KeyCode::Enter => app.choose_option(),
        KeyCode::Down => picker.selected = crate::logic::navigation::next_selection(picker.selected, len),
        KeyCode::Up => picker.selected = crate::logic::navigation::prev_selection(picker.selected, len),
        KeyCode::Char('j') if vim_mode => {
            picker.selected = crate::logic::navigation::next_selection(picker.selected, len)
        }
        KeyCode::Char('k') if vim_mode => {
            picker.selected = crate::logic::navigation::prev_selection(picker.selected, len)
        }
        KeyCode::Char(c) => {
            // Number keys pick directly
            if let Some(idx) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                if idx < len {
                    picker.selected = Some(idx);
                    app.choose_option();
                }
            }
        }
        _ => {}
    }
}

fn handle_signed_out_key(app: &mut App, key: KeyEvent) {
    if app.model.session.signing_in {
        if key.code == KeyCode::Char('q') {
            app.model.ui.should_quit = true;
        }
        return;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') => app.model.ui.should_quit = true,
        KeyCode::Char('d') if ctrl => app.start_demo_login(),
        KeyCode::Char('r') if ctrl => app.open_form(InputForm::new(FormKind::ForgotPassword)),
        KeyCode::Char('?') => app.model.ui.show_help = true,
        KeyCode::Enter | KeyCode::Char('l') => app.open_login_form(),
        _ => {}
    }
}

/// Keys that work on every tab; returns true when the key was used
fn handle_global_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => app.model.ui.should_quit = true,
        KeyCode::Char('?') => app.model.ui.show_help = true,
        KeyCode::Char('r') => {
            app.load_current_screen(Priority::Medium);
            app.model.show_toast("Memuat ulang...");
        }
        KeyCode::Char('O') => app.model.ui.confirm_action = Some(ConfirmAction::Logout),
        KeyCode::Tab => app.next_screen(),
        KeyCode::BackTab => app.prev_screen(),
        KeyCode::Char(c @ '1'..='8') => {
            if let Some(screen) = Screen::from_hotkey(c) {
                app.switch_screen(screen);
            }
        }
        _ => return false,
    }
    app.model.ui.vim_command_state = VimCommandState::None;
    true
}

/// Selection and room grid movement; returns true when the key was used
fn handle_navigation_key(app: &mut App, key: KeyEvent) -> bool {
    let vim_mode = app.model.ui.vim_mode;
    let in_grid = app.model.navigation.screen == Screen::Kost
        && app.model.navigation.open_house.is_some();

    // 'gg' jumps to the first row
    if vim_mode && key.code == KeyCode::Char('g') && !in_grid {
        if app.model.ui.vim_command_state == VimCommandState::WaitingForSecondG {
            app.model.ui.vim_command_state = VimCommandState::None;
            app.move_selection(Step::First);
        } else {
            app.model.ui.vim_command_state = VimCommandState::WaitingForSecondG;
        }
        return true;
    }
    app.model.ui.vim_command_state = VimCommandState::None;

    if in_grid {
        let step = match key.code {
            KeyCode::Left => GridStep::Left,
            KeyCode::Right => GridStep::Right,
            KeyCode::Up => GridStep::Up,
            KeyCode::Down => GridStep::Down,
            KeyCode::Char('h') if vim_mode => GridStep::Left,
            KeyCode::Char('l') if vim_mode => GridStep::Right,
            KeyCode::Char('k') if vim_mode => GridStep::Up,
            KeyCode::Char('j') if vim_mode => GridStep::Down,
            KeyCode::Esc | KeyCode::Backspace => {
                app.close_house();
                return true;
            }
            _ => return false,
        };
        app.move_grid_cursor(step);
        return true;
    }

    let step = match key.code {
        KeyCode::Down => Step::Next,
        KeyCode::Up => Step::Prev,
        KeyCode::Home => Step::First,
        KeyCode::End => Step::Last,
        KeyCode::Char('j') if vim_mode => Step::Next,
        KeyCode::Char('k') if vim_mode => Step::Prev,
        KeyCode::Char('G') if vim_mode => Step::Last,
        _ => return false,
    };
    app.move_selection(step);
    true
}

/// Actions of the active tab
fn handle_screen_key(app: &mut App, key: KeyEvent) {
    let screen = app.model.navigation.screen;
    match (screen, key.code) {
        (Screen::Kost, KeyCode::Enter) if app.model.navigation.open_house.is_none() => {
            app.open_selected_house()
        }
        (Screen::Kost, KeyCode::Char('n')) if app.model.navigation.open_house.is_none() => {
            app.begin_create_house()
        }
        (Screen::Kost, KeyCode::Char('p')) => app.begin_pay_rent(),
        (Screen::Kost, KeyCode::Char('d')) => app.begin_pay_deposit(),
        (Screen::Kost, KeyCode::Char('x')) => app.begin_process_deposit(),

        (Screen::Pengumuman, KeyCode::Char('f')) => app.toggle_like(),
        (Screen::Pengumuman, KeyCode::Char('c')) => app.begin_comment(),

        (Screen::Ronda, KeyCode::Char('a')) => app.begin_assign_ronda(),
        (Screen::Ronda, KeyCode::Char('n')) => app.begin_create_ronda(),

        (Screen::Kas, KeyCode::Char('t')) => app.begin_kas_transfer(),

        (Screen::Voting, KeyCode::Char('v') | KeyCode::Enter) => app.begin_vote(),
        (Screen::Voting, KeyCode::Char('n')) => app.begin_create_poll(),

        (Screen::Bansos, KeyCode::Char('n')) => app.begin_add_bansos(),
        (Screen::Bansos, KeyCode::Char('e')) => app.begin_edit_bansos(),
        (Screen::Bansos, KeyCode::Char('x')) => app.begin_delete_bansos(),
        (Screen::Bansos, KeyCode::Char('s')) => app.begin_distribute_bansos(),

        (Screen::Pasar, KeyCode::Char('s')) => app.toggle_pasar_pane(),
        (Screen::Pasar, KeyCode::Char('/')) => app.begin_product_search(),
        (Screen::Pasar, KeyCode::Char('v')) if app.model.navigation.pasar_pane == PasarPane::Stores => {
            app.begin_verify_store()
        }
        (Screen::Pasar, KeyCode::Char('n')) => match app.model.navigation.pasar_pane {
            PasarPane::Stores => app.open_form(InputForm::new(FormKind::CreateStore)),
            PasarPane::Products => {
                let store_id = app
                    .model
                    .selected_store()
                    .map(|s| s.id.to_string())
                    .unwrap_or_default();
                app.open_form(InputForm::new(FormKind::CreateProduct).with_values([store_id]));
            }
        },
        (Screen::Pasar, KeyCode::Esc) if app.model.screens.product_search.is_some() => {
            app.search_products("")
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;
    use crate::app::testing::Harness;
    use crate::services::ApiRequest;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_number_keys_switch_tabs() {
        let mut h = Harness::signed_in(Role::Warga);
        press(&mut h.app, KeyCode::Char('5'));
        assert_eq!(h.app.model.navigation.screen, Screen::Kas);
        press(&mut h.app, KeyCode::Tab);
        assert_eq!(h.app.model.navigation.screen, Screen::Voting);
        press(&mut h.app, KeyCode::BackTab);
        assert_eq!(h.app.model.navigation.screen, Screen::Kas);
    }

    #[test]
    fn test_typing_login_form() {
        let mut h = Harness::new();
        h.app.open_login_form();
        type_text(&mut h.app, "sari@example.id");
        press(&mut h.app, KeyCode::Enter); // next field
        type_text(&mut h.app, "qwerty");
        press(&mut h.app, KeyCode::Enter); // submit

        assert!(matches!(
            h.drain().as_slice(),
            [ApiRequest::Login { email, password }]
                if email == "sari@example.id" && password == "qwerty"
        ));
    }

    #[test]
    fn test_login_form_shortcuts() {
        let mut h = Harness::new();
        h.app.open_login_form();
        ctrl(&mut h.app, 'r');
        assert_eq!(
            h.app.model.ui.input_form.as_ref().map(|f| &f.kind),
            Some(&FormKind::ForgotPassword)
        );

        press(&mut h.app, KeyCode::Esc);
        assert!(h.app.model.ui.input_form.is_none());
        ctrl(&mut h.app, 'd');
        assert!(h.app.model.ui.option_picker.is_some());

        // Second role in the list
        press(&mut h.app, KeyCode::Char('2'));
        assert!(matches!(
            h.drain().as_slice(),
            [ApiRequest::LoginDemo { role }] if role == "admin_rt"
        ));
    }

    #[test]
    fn test_confirmation_swallows_other_keys() {
        let mut h = Harness::signed_in(Role::Warga);
        press(&mut h.app, KeyCode::Char('O'));
        assert_eq!(h.app.model.ui.confirm_action, Some(ConfirmAction::Logout));

        press(&mut h.app, KeyCode::Char('q'));
        assert!(!h.app.model.ui.should_quit);
        press(&mut h.app, KeyCode::Esc);
        assert!(h.app.model.ui.confirm_action.is_none());
    }

    #[test]
    fn test_vim_gg_and_g() {
        let mut h = Harness::signed_in(Role::AdminRt);
        h.app.model.ui.vim_mode = true;
        h.app.model.navigation.switch_to(Screen::Bansos);
        h.app.model.screens.bansos = serde_json::from_value(serde_json::json!([
            { "id": 1, "name": "A" }, { "id": 2, "name": "B" }, { "id": 3, "name": "C" }
        ]))
        .unwrap();

        press(&mut h.app, KeyCode::Char('G'));
        assert_eq!(h.app.model.navigation.current_selection(), Some(2));
        press(&mut h.app, KeyCode::Char('g'));
        assert_eq!(h.app.model.navigation.current_selection(), Some(2));
        press(&mut h.app, KeyCode::Char('g'));
        assert_eq!(h.app.model.navigation.current_selection(), Some(0));
        press(&mut h.app, KeyCode::Char('j'));
        assert_eq!(h.app.model.navigation.current_selection(), Some(1));
    }

    #[test]
    fn test_grid_keys_move_cursor_and_escape_closes() {
        let mut h = Harness::signed_in(Role::PemilikKost);
        let house = serde_json::from_value(serde_json::json!({
            "id": 4, "name": "Kost Mawar", "total_rooms": 6, "total_floors": 2
        }))
        .unwrap();
        h.app.model.navigation.switch_to(Screen::Kost);
        h.app.model.navigation.open_house(4);
        h.app.model.screens.set_house_detail(house);

        press(&mut h.app, KeyCode::Right);
        assert_eq!(h.app.model.navigation.grid_cursor.room, 1);
        press(&mut h.app, KeyCode::Up);
        assert_eq!(h.app.model.navigation.grid_cursor.floor, 1);

        press(&mut h.app, KeyCode::Esc);
        assert!(h.app.model.navigation.open_house.is_none());
    }

    #[test]
    fn test_signed_out_keys() {
        let mut h = Harness::new();
        press(&mut h.app, KeyCode::Char('5'));
        assert_eq!(h.app.model.navigation.screen, Screen::Beranda);
        press(&mut h.app, KeyCode::Enter);
        assert!(h.app.model.ui.input_form.is_some());
    }
}
