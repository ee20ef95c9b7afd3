//! Sign-in, sign-out and session persistence

use crate::api::{AuthSession, Role};
use crate::error::ApiError;
use crate::model::{FormKind, InputForm, LoadTarget, OptionPicker, PickerOption, PickerPurpose};
use crate::services::{ApiRequest, Priority};
use crate::App;

/// Roles offered by the demo login picker, as sent to the server
const DEMO_ROLES: [(&str, Role); 5] = [
    ("warga", Role::Warga),
    ("admin_rt", Role::AdminRt),
    ("admin_rw", Role::AdminRw),
    ("pemilik_kost", Role::PemilikKost),
    ("super_admin", Role::SuperAdmin),
];

impl App {
    /// Resume the session saved by a previous run, or ask for a login
    pub(crate) fn restore_session(&mut self) {
        let saved = match &self.session_store {
            Some(store) => match store.load(self.client.base_url()) {
                Ok(saved) => saved,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read saved session");
                    None
                }
            },
            None => None,
        };

        let Some(saved) = saved else {
            self.open_login_form();
            return;
        };

        tracing::info!("resuming saved session");
        self.client.set_token(Some(saved.token.clone()));
        self.model.session.sign_in(saved.token, saved.profile);
        // The token may have expired; a 401 here sends the user back to login
        self.request_load(LoadTarget::Profile, Priority::High);
        self.load_current_screen(Priority::Medium);
    }

    pub(crate) fn open_login_form(&mut self) {
        self.model.ui.input_form = Some(InputForm::new(FormKind::Login));
    }

    /// One-key login with the configured demo role, or a role picker
    pub(crate) fn start_demo_login(&mut self) {
        match self.demo_role.clone() {
            Some(role) => self.login_demo(role),
            None => {
                let options = DEMO_ROLES
                    .iter()
                    .enumerate()
                    .map(|(idx, (key, role))| PickerOption {
                        id: idx as u64,
                        key: key.to_string(),
                        label: role.label().to_string(),
                    })
                    .collect();
                self.model.ui.close_all_modals();
                self.model.ui.option_picker = Some(OptionPicker::new(
                    "Masuk demo sebagai",
                    PickerPurpose::DemoRole,
                    options,
                ));
            }
        }
    }

    pub(crate) fn login_demo(&mut self, role: String) {
        tracing::info!(role, "demo login");
        self.model.ui.close_all_modals();
        self.model.session.signing_in = true;
        self.send(ApiRequest::LoginDemo { role });
    }

    pub(crate) fn login(&mut self, email: String, password: String) {
        self.model.session.signing_in = true;
        self.send(ApiRequest::Login { email, password });
    }

    /// Adopt a fresh session from a login response
    pub(crate) fn finish_sign_in(&mut self, auth: AuthSession) {
        tracing::info!(user_id = auth.user.id, role = ?auth.user.role, "signed in");
        self.client.set_token(Some(auth.token.clone()));
        let greeting = format!("Selamat datang, {}", auth.user.name);
        self.model.sign_in(auth);
        self.persist_session();
        self.model.show_toast(greeting);
        self.load_current_screen(Priority::Medium);
    }

    /// Save token and profile for the next run
    pub(crate) fn persist_session(&self) {
        let (Some(store), Some(token)) = (&self.session_store, &self.model.session.token) else {
            return;
        };
        if let Err(e) = store.save(
            self.client.base_url(),
            token,
            self.model.session.profile.as_ref(),
        ) {
            tracing::warn!(error = %e, "failed to save session");
        }
    }

    /// Forget the token everywhere outside the model
    fn forget_session(&mut self) {
        self.client.set_token(None);
        if let Some(store) = &self.session_store {
            if let Err(e) = store.clear() {
                tracing::warn!(error = %e, "failed to clear saved session");
            }
        }
    }

    /// Sign out locally, whether or not the server acknowledged it
    pub(crate) fn finish_logout(&mut self) {
        self.forget_session();
        self.model.force_logout();
        self.model.show_toast("Anda telah keluar");
        self.open_login_form();
    }

    /// Surface a failed request; a 401 sends the user back to the login form
    pub(crate) fn report_error(&mut self, error: &ApiError) {
        if self.model.report_error(error) {
            self.forget_session();
            self.open_login_form();
        }
    }
}
