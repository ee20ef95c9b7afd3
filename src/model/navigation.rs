//! Navigation Model
//!
//! This sub-model contains all state related to navigation:
//! the active tab, per-tab selection, and the room grid cursor.
//!
//! Every change of what is on screen bumps `screen_generation`. Fetches carry
//! the generation they were issued under, so a response that arrives after
//! the user moved on can be recognized and dropped.

use std::collections::HashMap;

use super::types::PasarPane;
use crate::logic::room_grid::GridCursor;
use crate::Screen;

#[derive(Clone, Debug)]
pub struct NavigationModel {
    /// Active tab
    pub screen: Screen,

    /// Bumped whenever the visible view changes
    pub screen_generation: u64,

    /// Selected list row per tab
    pub selections: HashMap<Screen, Option<usize>>,

    /// Boarding house whose room grid is shown on the Kost tab
    pub open_house: Option<u64>,

    /// Cursor in the room grid of the open boarding house
    pub grid_cursor: GridCursor,

    /// Focused pane on the Pasar tab
    pub pasar_pane: PasarPane,

    /// Selected store row (the Pasar tab's own selection tracks products)
    pub store_selection: Option<usize>,
}

impl NavigationModel {
    pub fn new() -> Self {
        Self {
            screen: Screen::Beranda,
            screen_generation: 0,
            selections: HashMap::new(),
            open_house: None,
            grid_cursor: GridCursor::default(),
            pasar_pane: PasarPane::default(),
            store_selection: None,
        }
    }

    /// Switch tabs; returns false when the tab was already active
    pub fn switch_to(&mut self, screen: Screen) -> bool {
        if self.screen == screen {
            return false;
        }
        self.screen = screen;
        self.bump_generation();
        true
    }

    /// Show the room grid of a boarding house
    pub fn open_house(&mut self, house_id: u64) {
        self.open_house = Some(house_id);
        self.grid_cursor = GridCursor::default();
        self.bump_generation();
    }

    /// Back from the room grid to the list of boarding houses
    pub fn close_house(&mut self) {
        if self.open_house.take().is_some() {
            self.bump_generation();
        }
    }

    /// Invalidate in-flight fetches for the current view
    pub fn bump_generation(&mut self) -> u64 {
        self.screen_generation = self.screen_generation.wrapping_add(1);
        self.screen_generation
    }

    /// Whether a fetch issued under `generation` still belongs to the visible view
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.screen_generation
    }

    pub fn selection(&self, screen: Screen) -> Option<usize> {
        self.selections.get(&screen).copied().flatten()
    }

    pub fn set_selection(&mut self, screen: Screen, selection: Option<usize>) {
        self.selections.insert(screen, selection);
    }

    pub fn current_selection(&self) -> Option<usize> {
        self.selection(self.screen)
    }
}

impl Default for NavigationModel {
    fn default() -> Self {
        Self::new()
    }
}
