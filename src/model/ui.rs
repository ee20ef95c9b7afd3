//! UI Model
//!
//! This sub-model contains all state related to the user interface:
//! preferences, dialogs, popups, and visual state.

use std::time::Instant;

use super::types::{ConfirmAction, InputForm, OptionPicker, Toast, ToastLevel, VimCommandState};

/// UI preferences and popups
#[derive(Clone, Debug)]
pub struct UiModel {
    // ============================================
    // PREFERENCES
    // ============================================
    /// Whether vim keybindings are enabled
    pub vim_mode: bool,

    /// Vim command state (for 'gg' double-key)
    pub vim_command_state: VimCommandState,

    // ============================================
    // DIALOGS & POPUPS
    // ============================================
    /// Pending y/n confirmation
    pub confirm_action: Option<ConfirmAction>,

    /// Open text form
    pub input_form: Option<InputForm>,

    /// Open list of choices
    pub option_picker: Option<OptionPicker>,

    /// Keybinding help overlay
    pub show_help: bool,

    /// Toast message
    pub toast: Option<Toast>,

    /// Whether app should quit
    pub should_quit: bool,
}

impl UiModel {
    /// Create initial UI model with default preferences
    pub fn new(vim_mode: bool) -> Self {
        Self {
            vim_mode,
            vim_command_state: VimCommandState::None,
            confirm_action: None,
            input_form: None,
            option_picker: None,
            show_help: false,
            toast: None,
            should_quit: false,
        }
    }

    /// Check if any modal dialog is currently showing
    pub fn has_modal(&self) -> bool {
        self.confirm_action.is_some()
            || self.input_form.is_some()
            || self.option_picker.is_some()
            || self.show_help
    }

    /// Close all modal dialogs
    pub fn close_all_modals(&mut self) {
        self.confirm_action = None;
        self.input_form = None;
        self.option_picker = None;
        self.show_help = false;
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            level: ToastLevel::Info,
            shown_at: Instant::now(),
        });
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            level: ToastLevel::Error,
            shown_at: Instant::now(),
        });
    }

    /// Check if toast has been up long enough to dismiss
    pub fn should_dismiss_toast(&self) -> bool {
        match &self.toast {
            Some(toast) => crate::logic::ui::should_dismiss_toast(
                toast.shown_at.elapsed().as_millis(),
                toast.is_error(),
            ),
            None => false,
        }
    }

    /// Dismiss toast message
    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{FormKind, InputForm};

    #[test]
    fn test_ui_model_creation() {
        let model = UiModel::new(true);
        assert!(model.vim_mode);
        assert!(!model.should_quit);
        assert!(!model.has_modal());
    }

    #[test]
    fn test_has_modal() {
        let mut model = UiModel::new(false);
        model.confirm_action = Some(ConfirmAction::Logout);
        assert!(model.has_modal());

        model.close_all_modals();
        model.input_form = Some(InputForm::new(FormKind::Login));
        assert!(model.has_modal());
    }

    #[test]
    fn test_close_all_modals() {
        let mut model = UiModel::new(false);
        model.confirm_action = Some(ConfirmAction::Logout);
        model.input_form = Some(InputForm::new(FormKind::ProductSearch));
        model.show_help = true;

        model.close_all_modals();
        assert!(!model.has_modal());
    }

    #[test]
    fn test_toast_levels() {
        let mut model = UiModel::new(false);
        assert!(model.toast.is_none());

        model.show_toast("Tersimpan");
        assert!(!model.toast.as_ref().unwrap().is_error());
        assert!(!model.should_dismiss_toast());

        model.show_error("Gagal");
        assert!(model.toast.as_ref().unwrap().is_error());

        model.dismiss_toast();
        assert!(model.toast.is_none());
    }
}
