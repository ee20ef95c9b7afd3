//! API Response Handler
//!
//! Applies responses from the background API service to the model.
//! Screen loads are dropped when the view they were fetched for is gone;
//! mutation and reaction results are always applied.

use crate::logic;
use crate::logic::optimistic::Reaction;
use crate::model::{ConnectionState, FormKind, InputForm, LoadTarget};
use crate::services::{ApiResponse, LoadedData, Priority};
use crate::{App, Screen};

/// Handle API response from background service
pub fn handle_api_response(app: &mut App, response: ApiResponse) {
    match response {
        ApiResponse::Loaded {
            target,
            generation,
            elapsed_ms,
            result,
        } => {
            app.model.performance.finish_load(&target, generation);
            app.model.performance.last_load_time_ms = Some(elapsed_ms);

            let data = match result {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(load = target.label(), error = %e, "load failed");
                    // A 401 ends the session even when the view is gone
                    if app.model.accepts_load(generation) || logic::errors::requires_logout(&e) {
                        app.report_error(&e);
                    }
                    return;
                }
            };
            app.model.session.connection_state = ConnectionState::Online;

            // The profile is shared by every screen and never stale
            if let LoadedData::Profile(profile) = data {
                app.model.session.profile = Some(profile);
                app.persist_session();
                return;
            }

            if !app.model.accepts_load(generation) {
                tracing::debug!(
                    load = target.label(),
                    generation,
                    current = app.model.navigation.screen_generation,
                    "dropping stale load"
                );
                return;
            }

            apply_loaded(app, target, data);
        }

        ApiResponse::SignedIn(result) => {
            app.model.session.signing_in = false;
            match result {
                Ok(auth) => app.finish_sign_in(auth),
                Err(e) => {
                    // A 401 here means bad credentials, not an expired session
                    tracing::info!(error = %e, "login failed");
                    app.model
                        .ui
                        .show_error(logic::errors::user_message(&e));
                    if app.model.ui.input_form.is_none() {
                        app.open_login_form();
                    }
                }
            }
        }

        ApiResponse::ResetCodeSent { email, result } => match result {
            Ok(ack) => {
                app.model.show_toast(
                    ack.message
                        .unwrap_or_else(|| format!("Kode OTP dikirim ke {}", email)),
                );
                app.open_form(InputForm::new(FormKind::VerifyOtp { email }));
            }
            Err(e) => {
                app.model.ui.show_error(logic::errors::user_message(&e));
                app.open_form(InputForm::new(FormKind::ForgotPassword).with_values([email]));
            }
        },

        ApiResponse::OtpVerified { email, otp, result } => match result {
            Ok(verification) => app.open_form(InputForm::new(FormKind::ResetPassword {
                email,
                otp,
                reset_token: verification.reset_token,
            })),
            Err(e) => {
                app.model.ui.show_error(logic::errors::user_message(&e));
                app.open_form(InputForm::new(FormKind::VerifyOtp { email }));
            }
        },

        ApiResponse::PasswordReset(result) => match result {
            Ok(ack) => {
                app.model.show_toast(
                    ack.message
                        .unwrap_or_else(|| "Password berhasil diubah. Silakan masuk.".to_string()),
                );
                app.open_login_form();
            }
            Err(e) => app.model.ui.show_error(logic::errors::user_message(&e)),
        },

        ApiResponse::LoggedOut(result) => {
            if let Err(e) = result {
                // The token is dropped locally either way
                tracing::warn!(error = %e, "logout request failed");
            }
            app.finish_logout();
        }

        ApiResponse::Liked {
            announcement_id,
            result,
        } => match result {
            Ok(outcome) => {
                app.model
                    .confirm_reaction(announcement_id, Reaction::ToggleLike, Some(&outcome))
            }
            Err(e) => {
                tracing::debug!(announcement_id, error = %e, "rolling back like");
                app.model
                    .rollback_reaction(announcement_id, Reaction::ToggleLike);
                app.report_error(&e);
            }
        },

        ApiResponse::Commented {
            announcement_id,
            result,
        } => match result {
            Ok(ack) => {
                app.model
                    .confirm_reaction(announcement_id, Reaction::AddComment, None);
                app.model
                    .show_toast(ack.message.unwrap_or_else(|| "Komentar terkirim".to_string()));
                if app.model.navigation.screen == Screen::Pengumuman {
                    app.request_load(LoadTarget::Comments(announcement_id), Priority::Medium);
                }
            }
            Err(e) => {
                tracing::debug!(announcement_id, error = %e, "rolling back comment");
                app.model
                    .rollback_reaction(announcement_id, Reaction::AddComment);
                app.report_error(&e);
            }
        },

        ApiResponse::Mutated { mutation, result } => {
            let performance = &mut app.model.performance;
            performance.pending_mutations = performance.pending_mutations.saturating_sub(1);

            match result {
                Ok(ack) => {
                    tracing::info!(?mutation, "mutation accepted");
                    app.model.show_toast(
                        ack.message
                            .unwrap_or_else(|| mutation.success_message().to_string()),
                    );
                    for target in mutation.refreshes() {
                        app.request_load(target, Priority::Medium);
                    }
                }
                Err(e) => app.report_error(&e),
            }
        }
    }
}

/// Store fetched data and keep selections on existing rows
fn apply_loaded(app: &mut App, target: LoadTarget, data: LoadedData) {
    let screens = &mut app.model.screens;
    match data {
        LoadedData::Profile(_) => {}
        LoadedData::Dashboard(dashboard) => screens.dashboard = Some(dashboard),
        LoadedData::Announcements(announcements) => {
            screens.announcements = announcements;
            // Keep likes that are still waiting for the server
            let pending = app.model.performance.pending_reactions.clone();
            for (id, reactions) in pending {
                for reaction in reactions {
                    app.model.screens.apply_reaction(id, reaction);
                }
            }
        }
        LoadedData::Comments(comments) => {
            if let LoadTarget::Comments(id) = target {
                screens.comments.insert(id, comments);
            }
        }
        LoadedData::BoardingHouses(houses) => screens.boarding_houses = houses,
        LoadedData::BoardingHouse(house) => {
            if app.model.navigation.open_house == Some(house.id) {
                app.model.screens.set_house_detail(house);
                let grid = &app.model.screens.room_grid;
                app.model.navigation.grid_cursor = app.model.navigation.grid_cursor.clamp(grid);
            }
        }
        LoadedData::Ronda(overview) => screens.ronda = overview,
        LoadedData::Kas {
            summary,
            transactions,
        } => {
            screens.kas_summary = Some(summary);
            screens.kas_transactions = transactions;
        }
        LoadedData::Polls(polls) => screens.polls = polls,
        LoadedData::Bansos(recipients) => screens.bansos = recipients,
        LoadedData::Market { products, stores } => {
            screens.products = products;
            screens.stores = stores;
            let navigation = &mut app.model.navigation;
            navigation.store_selection =
                logic::navigation::clamp_selection(navigation.store_selection, app.model.screens.stores.len());
        }
    }

    for screen in Screen::ALL {
        let len = app.model.list_len(screen);
        let current = app.model.navigation.selection(screen);
        let clamped = if len == 0 {
            None
        } else {
            logic::navigation::clamp_selection(current, len)
        };
        if clamped != current {
            app.model.navigation.set_selection(screen, clamped);
        }
    }
}
