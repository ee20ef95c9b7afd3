//! Screen loading and navigation
//!
//! Every fetch is tagged with the generation of the view it was issued for;
//! `handlers::api` drops responses whose generation is no longer current.

use std::time::Instant;

use crate::logic;
use crate::model::{LoadTarget, PasarPane, VimCommandState};
use crate::services::{ApiRequest, Priority};
use crate::{App, Screen};

/// Direction of a list movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Next,
    Prev,
    First,
    Last,
}

impl App {
    /// Hand a request to the API service
    pub(crate) fn send(&self, request: ApiRequest) {
        if self.api_tx.send(request).is_err() {
            tracing::error!("API service stopped, request dropped");
        }
    }

    /// Queue a fetch for the current view
    pub(crate) fn request_load(&mut self, target: LoadTarget, priority: Priority) {
        tracing::debug!(load = target.label(), ?priority, "queueing load");
        let generation = self.model.navigation.screen_generation;
        self.model
            .performance
            .start_load(target.clone(), generation);
        self.send(ApiRequest::Load {
            target,
            generation,
            priority,
        });
    }

    /// Data the visible view is built from
    pub(crate) fn visible_targets(&self) -> Vec<LoadTarget> {
        let navigation = &self.model.navigation;
        match navigation.screen {
            Screen::Beranda => vec![LoadTarget::Dashboard],
            Screen::Kost => match navigation.open_house {
                Some(house_id) => vec![LoadTarget::BoardingHouse(house_id)],
                None => vec![LoadTarget::BoardingHouses],
            },
            Screen::Pengumuman => {
                let mut targets = vec![LoadTarget::Announcements];
                if let Some(announcement) = self.model.selected_announcement() {
                    targets.push(LoadTarget::Comments(announcement.id));
                }
                targets
            }
            Screen::Ronda => vec![LoadTarget::Ronda],
            Screen::Kas => vec![LoadTarget::Kas],
            Screen::Voting => vec![LoadTarget::Polls],
            Screen::Bansos => vec![LoadTarget::Bansos],
            Screen::Pasar => vec![LoadTarget::Market {
                search: self.model.screens.product_search.clone(),
            }],
        }
    }

    /// Fetch everything the visible view shows
    pub(crate) fn load_current_screen(&mut self, priority: Priority) {
        if !self.model.session.is_signed_in() {
            return;
        }
        for target in self.visible_targets() {
            self.request_load(target, priority);
        }
        self.model.performance.last_refresh = Instant::now();
    }

    /// Periodic refresh of the visible tab while the user is idle
    pub(crate) fn maybe_background_refresh(&mut self) {
        let Some(interval) = self.refresh_interval else {
            return;
        };
        let performance = &self.model.performance;
        if !self.model.session.is_signed_in()
            || self.model.has_modal()
            || !performance.is_idle()
            || performance.last_refresh.elapsed() < interval
        {
            return;
        }
        tracing::debug!(screen = self.model.navigation.screen.title(), "background refresh");
        self.load_current_screen(Priority::Low);
    }

    pub(crate) fn switch_screen(&mut self, screen: Screen) {
        if !self.model.navigation.switch_to(screen) {
            return;
        }
        self.model.ui.vim_command_state = VimCommandState::None;
        self.load_current_screen(Priority::Medium);
    }

    pub(crate) fn next_screen(&mut self) {
        self.switch_screen(logic::ui::next_screen(self.model.navigation.screen));
    }

    pub(crate) fn prev_screen(&mut self) {
        self.switch_screen(logic::ui::prev_screen(self.model.navigation.screen));
    }

    /// Show the room grid of the selected boarding house
    pub(crate) fn open_selected_house(&mut self) {
        let Some(house_id) = self.model.selected_house().map(|h| h.id) else {
            return;
        };
        self.model.screens.close_house_detail();
        self.model.navigation.open_house(house_id);
        self.request_load(LoadTarget::BoardingHouse(house_id), Priority::Medium);
    }

    /// Back from the room grid to the list of boarding houses
    pub(crate) fn close_house(&mut self) {
        if self.model.navigation.open_house.is_none() {
            return;
        }
        self.model.navigation.close_house();
        self.model.screens.close_house_detail();
        // Occupancy counts may have changed while the grid was open
        self.request_load(LoadTarget::BoardingHouses, Priority::Low);
    }

    /// Replace the product search and fetch the matching products
    pub(crate) fn search_products(&mut self, keyword: &str) {
        let search = Some(keyword.trim().to_string()).filter(|k| !k.is_empty());
        self.model.screens.product_search = search.clone();
        self.model.navigation.set_selection(Screen::Pasar, None);
        self.model.navigation.bump_generation();
        self.request_load(LoadTarget::Market { search }, Priority::Medium);
    }

    /// Move the selection of the visible list
    pub(crate) fn move_selection(&mut self, step: Step) {
        let screen = self.model.navigation.screen;
        let len = self.model.list_len(screen);
        let current = if screen == Screen::Pasar
            && self.model.navigation.pasar_pane == PasarPane::Stores
        {
            self.model.navigation.store_selection
        } else {
            self.model.navigation.selection(screen)
        };

        let selection = match step {
            Step::Next => logic::navigation::next_selection(current, len),
            Step::Prev => logic::navigation::prev_selection(current, len),
            Step::First => (len > 0).then_some(0),
            Step::Last => len.checked_sub(1),
        };

        if screen == Screen::Pasar && self.model.navigation.pasar_pane == PasarPane::Stores {
            self.model.navigation.store_selection = selection;
            return;
        }
        self.model.navigation.set_selection(screen, selection);

        // Comments follow the highlighted announcement
        if screen == Screen::Pengumuman && selection != current {
            if let Some(id) = self.model.selected_announcement().map(|a| a.id) {
                if !self.model.screens.comments.contains_key(&id) {
                    self.request_load(LoadTarget::Comments(id), Priority::Medium);
                }
            }
        }
    }

    pub(crate) fn move_grid_cursor(&mut self, step: GridStep) {
        let grid = &self.model.screens.room_grid;
        let cursor = self.model.navigation.grid_cursor;
        self.model.navigation.grid_cursor = match step {
            GridStep::Left => cursor.left(grid),
            GridStep::Right => cursor.right(grid),
            GridStep::Up => cursor.up(grid),
            GridStep::Down => cursor.down(grid),
        };
    }

    pub(crate) fn toggle_pasar_pane(&mut self) {
        let navigation = &mut self.model.navigation;
        navigation.pasar_pane = navigation.pasar_pane.toggle();
        if navigation.pasar_pane == PasarPane::Stores {
            navigation.store_selection = logic::navigation::clamp_selection(
                navigation.store_selection,
                self.model.screens.stores.len(),
            );
        }
    }
}

/// Direction of a room grid movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GridStep {
    Left,
    Right,
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Announcement, BoardingHouse, Role};
    use crate::app::testing::Harness;

    fn loads(requests: &[ApiRequest]) -> Vec<(LoadTarget, u64, Priority)> {
        requests
            .iter()
            .filter_map(|r| match r {
                ApiRequest::Load {
                    target,
                    generation,
                    priority,
                } => Some((target.clone(), *generation, *priority)),
                _ => None,
            })
            .collect()
    }

    fn house(id: u64) -> BoardingHouse {
        serde_json::from_value(serde_json::json!({ "id": id, "name": "Kost Melati" })).unwrap()
    }

    #[test]
    fn test_switch_screen_loads_with_new_generation() {
        let mut h = Harness::signed_in(Role::Warga);
        let before = h.app.model.navigation.screen_generation;

        h.app.switch_screen(Screen::Kas);
        let queued = loads(&h.drain());
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].0, LoadTarget::Kas);
        assert_eq!(queued[0].2, Priority::Medium);
        assert_ne!(queued[0].1, before);
        assert!(h.app.model.performance.is_loading(&LoadTarget::Kas));

        // Same tab again: nothing to do
        h.app.switch_screen(Screen::Kas);
        assert!(h.drain().is_empty());
    }

    #[test]
    fn test_signed_out_app_does_not_load() {
        let mut h = Harness::new();
        h.app.switch_screen(Screen::Voting);
        assert!(h.drain().is_empty());
    }

    #[test]
    fn test_open_and_close_house() {
        let mut h = Harness::signed_in(Role::PemilikKost);
        h.app.switch_screen(Screen::Kost);
        h.drain();

        h.app.model.screens.boarding_houses = vec![house(3), house(8)];
        h.app.model.navigation.set_selection(Screen::Kost, Some(1));
        h.app.open_selected_house();
        assert_eq!(h.app.model.navigation.open_house, Some(8));
        let queued = loads(&h.drain());
        assert_eq!(queued[0].0, LoadTarget::BoardingHouse(8));
        assert!(h.app.model.navigation.is_current(queued[0].1));

        h.app.close_house();
        assert!(h.app.model.navigation.open_house.is_none());
        let queued = loads(&h.drain());
        assert_eq!(queued[0].0, LoadTarget::BoardingHouses);
        assert_eq!(queued[0].2, Priority::Low);
    }

    #[test]
    fn test_selecting_announcement_fetches_its_comments_once() {
        let mut h = Harness::signed_in(Role::Warga);
        h.app.model.navigation.switch_to(Screen::Pengumuman);
        h.app.model.screens.announcements = vec![Announcement {
            id: 11,
            title: "Kerja bakti".into(),
            content: String::new(),
            author: None,
            created_at: None,
            likes_count: 0,
            comments_count: 0,
            is_liked: false,
        }];

        h.app.move_selection(Step::Next);
        let queued = loads(&h.drain());
        assert_eq!(queued[0].0, LoadTarget::Comments(11));

        h.app.model.screens.comments.insert(11, vec![]);
        h.app.move_selection(Step::First);
        assert!(h.drain().is_empty());
    }

    #[test]
    fn test_product_search_invalidates_previous_results() {
        let mut h = Harness::signed_in(Role::Warga);
        h.app.model.navigation.switch_to(Screen::Pasar);
        let generation = h.app.model.navigation.screen_generation;

        h.app.search_products("  beras ");
        assert_eq!(h.app.model.screens.product_search.as_deref(), Some("beras"));
        assert!(!h.app.model.navigation.is_current(generation));
        let queued = loads(&h.drain());
        assert_eq!(
            queued[0].0,
            LoadTarget::Market {
                search: Some("beras".into())
            }
        );

        h.app.search_products("");
        assert!(h.app.model.screens.product_search.is_none());
    }

    #[test]
    fn test_store_pane_has_its_own_selection() {
        let mut h = Harness::signed_in(Role::AdminRt);
        h.app.model.navigation.switch_to(Screen::Pasar);
        h.app.model.screens.stores = serde_json::from_value(serde_json::json!([
            { "id": 1, "name": "Warung Bu Tini" },
            { "id": 2, "name": "Toko Sejahtera" }
        ]))
        .unwrap();

        h.app.toggle_pasar_pane();
        assert_eq!(h.app.model.navigation.store_selection, Some(0));
        h.app.move_selection(Step::Last);
        assert_eq!(h.app.model.navigation.store_selection, Some(1));
        assert_eq!(h.app.model.navigation.selection(Screen::Pasar), None);
        assert_eq!(h.app.model.selected_store().map(|s| s.id), Some(2));
    }
}
