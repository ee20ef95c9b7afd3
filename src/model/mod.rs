//! Pure Application Model - Elm Architecture
//!
//! This module defines the pure, cloneable state for the application.
//! The Model is organized into focused sub-models for maintainability:
//!
//! - **SessionModel**: Signed-in user, token, API reachability
//! - **ScreensModel**: Data fetched for each tab
//! - **NavigationModel**: Active tab, selections, grid cursor, screen generation
//! - **UiModel**: User preferences, dialogs, popups
//! - **PerformanceModel**: Loading tracking and pending optimistic reactions
//!
//! Key principles:
//! - Clone + Debug: Can snapshot and compare state
//! - No services: All I/O lives in the runtime
//! - Pure accessors: Helper methods are side-effect free

pub mod navigation;
pub mod performance;
pub mod screens;
pub mod session;
pub mod types;
pub mod ui;

pub use navigation::NavigationModel;
pub use performance::PerformanceModel;
pub use screens::ScreensModel;
pub use session::{ConnectionState, SessionModel};
pub use types::*;
pub use ui::UiModel;

use crate::api::{
    Announcement, AuthSession, BansosRecipient, BoardingHouse, LikeOutcome, Poll, Product,
    RondaSchedule, Store,
};
use crate::error::ApiError;
use crate::logic::errors::{classify_error, requires_logout, user_message, ErrorType};
use crate::logic::optimistic::{reconcile_like, Reaction};
use crate::logic::room_grid::RoomSlot;
use crate::Screen;

/// Shown after the server rejected the session token
pub const SESSION_EXPIRED_MESSAGE: &str = "Sesi Anda telah berakhir. Silakan masuk kembali.";

/// Root application model composed of focused sub-models
#[derive(Clone, Debug)]
pub struct Model {
    /// Signed-in user and token
    pub session: SessionModel,

    /// Data fetched for each tab
    pub screens: ScreensModel,

    /// Navigation state (tab, selections, grid cursor)
    pub navigation: NavigationModel,

    /// UI preferences and popups
    pub ui: UiModel,

    /// Loading tracking and pending reactions
    pub performance: PerformanceModel,
}

impl Model {
    /// Create initial model with default settings
    pub fn new(vim_mode: bool) -> Self {
        Self {
            session: SessionModel::new(),
            screens: ScreensModel::new(),
            navigation: NavigationModel::new(),
            ui: UiModel::new(vim_mode),
            performance: PerformanceModel::new(),
        }
    }

    // ============================================
    // SESSION
    // ============================================

    pub fn sign_in(&mut self, auth: AuthSession) {
        self.session.sign_in(auth.token, Some(auth.user));
        self.ui.close_all_modals();
    }

    /// End the session locally and drop everything fetched for it
    pub fn force_logout(&mut self) {
        self.session.sign_out();
        self.screens.clear();
        self.performance.loading.clear();
        self.performance.pending_reactions.clear();
        self.ui.close_all_modals();
        self.navigation = NavigationModel {
            // Keep counting so responses issued before the logout stay stale
            screen_generation: self.navigation.screen_generation,
            ..NavigationModel::new()
        };
        self.navigation.bump_generation();
    }

    /// Surface a failed request to the user
    ///
    /// A 401 ends the session; anything else becomes an error toast carrying
    /// the server's message or the generic network error. Returns true when
    /// the session was ended.
    pub fn report_error(&mut self, error: &ApiError) -> bool {
        match classify_error(error) {
            ErrorType::ConnectionRefused | ErrorType::Timeout | ErrorType::NetworkError => {
                self.session.connection_state = ConnectionState::Offline {
                    error_type: classify_error(error),
                    message: error.to_string(),
                };
            }
            _ => self.session.connection_state = ConnectionState::Online,
        }

        if requires_logout(error) {
            tracing::info!("server rejected the session token, signing out");
            self.force_logout();
            self.ui.show_error(SESSION_EXPIRED_MESSAGE);
            return true;
        }

        self.ui.show_error(user_message(error));
        false
    }

    /// Whether a fetch issued under `generation` may still update the screen
    pub fn accepts_load(&self, generation: u64) -> bool {
        self.navigation.is_current(generation)
    }

    // ============================================
    // OPTIMISTIC REACTIONS
    // ============================================

    /// Apply a reaction locally before the server confirms it
    ///
    /// Returns false when the announcement is not loaded, in which case
    /// nothing should be sent.
    pub fn apply_optimistic(&mut self, announcement_id: u64, reaction: Reaction) -> bool {
        if !self.screens.apply_reaction(announcement_id, reaction) {
            return false;
        }
        self.performance.push_reaction(announcement_id, reaction);
        true
    }

    /// The server accepted a reaction; adopt its like counters when it sent any
    pub fn confirm_reaction(
        &mut self,
        announcement_id: u64,
        reaction: Reaction,
        outcome: Option<&LikeOutcome>,
    ) {
        self.performance.settle_reaction(announcement_id, reaction);
        if let (Some(outcome), Some(state)) =
            (outcome, self.screens.reaction_state(announcement_id))
        {
            self.screens
                .set_reaction_state(announcement_id, reconcile_like(state, outcome));
        }
    }

    /// The server refused a reaction; undo it locally
    pub fn rollback_reaction(&mut self, announcement_id: u64, reaction: Reaction) {
        self.performance.settle_reaction(announcement_id, reaction);
        self.screens
            .apply_reaction(announcement_id, reaction.inverse());
    }

    // ============================================
    // SELECTION ACCESSORS
    // ============================================

    /// Number of rows in the list shown on `screen`
    pub fn list_len(&self, screen: Screen) -> usize {
        match screen {
            Screen::Beranda => self
                .screens
                .dashboard
                .as_ref()
                .map(|d| d.latest_announcements.len())
                .unwrap_or(0),
            Screen::Kost => self.screens.boarding_houses.len(),
            Screen::Pengumuman => self.screens.announcements.len(),
            Screen::Ronda => self.screens.ronda.today.len(),
            Screen::Kas => self.screens.kas_transactions.len(),
            Screen::Voting => self.screens.polls.len(),
            Screen::Bansos => self.screens.bansos.len(),
            Screen::Pasar => match self.navigation.pasar_pane {
                PasarPane::Products => self.screens.products.len(),
                PasarPane::Stores => self.screens.stores.len(),
            },
        }
    }

    fn selected<'a, T>(&self, screen: Screen, items: &'a [T]) -> Option<&'a T> {
        self.navigation
            .selection(screen)
            .and_then(|idx| items.get(idx))
    }

    pub fn selected_announcement(&self) -> Option<&Announcement> {
        self.selected(Screen::Pengumuman, &self.screens.announcements)
    }

    pub fn selected_house(&self) -> Option<&BoardingHouse> {
        self.selected(Screen::Kost, &self.screens.boarding_houses)
    }

    /// Room under the grid cursor of the open house
    pub fn selected_room(&self) -> Option<&RoomSlot> {
        self.navigation.open_house?;
        self.screens.room_grid.room(self.navigation.grid_cursor)
    }

    pub fn selected_ronda_schedule(&self) -> Option<&RondaSchedule> {
        self.selected(Screen::Ronda, &self.screens.ronda.today)
    }

    pub fn selected_poll(&self) -> Option<&Poll> {
        self.selected(Screen::Voting, &self.screens.polls)
    }

    pub fn selected_bansos(&self) -> Option<&BansosRecipient> {
        self.selected(Screen::Bansos, &self.screens.bansos)
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.selected(Screen::Pasar, &self.screens.products)
    }

    pub fn selected_store(&self) -> Option<&Store> {
        self.navigation
            .store_selection
            .and_then(|idx| self.screens.stores.get(idx))
    }

    // ============================================
    // UI SHORTCUTS
    // ============================================

    /// Check if any modal dialog is showing
    pub fn has_modal(&self) -> bool {
        self.ui.has_modal()
    }

    /// Record user action (for idle detection)
    pub fn record_user_action(&mut self) {
        self.performance.record_user_action();
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.ui.show_toast(message);
    }

    /// Check if toast should be dismissed
    pub fn should_dismiss_toast(&self) -> bool {
        self.ui.should_dismiss_toast()
    }

    pub fn dismiss_toast(&mut self) {
        self.ui.dismiss_toast();
    }
}
