//! Screens Model
//!
//! Data each tab fetched from the API. Nothing here is derived state except
//! the room grid, which is rebuilt whenever the open boarding house changes.

use std::collections::HashMap;

use crate::api::{
    Announcement, BansosRecipient, BoardingHouse, Comment, KasSummary, KasTransaction, Poll,
    Product, RondaOverview, Store, WargaDashboard,
};
use crate::logic::optimistic::{Reaction, ReactionState};
use crate::logic::room_grid::RoomGrid;

#[derive(Clone, Debug, Default)]
pub struct ScreensModel {
    pub dashboard: Option<WargaDashboard>,

    pub announcements: Vec<Announcement>,
    /// Comments per announcement id
    pub comments: HashMap<u64, Vec<Comment>>,

    pub boarding_houses: Vec<BoardingHouse>,
    /// Boarding house whose room grid is open
    pub house_detail: Option<BoardingHouse>,
    pub room_grid: RoomGrid,

    pub ronda: RondaOverview,

    pub kas_summary: Option<KasSummary>,
    pub kas_transactions: Vec<KasTransaction>,

    pub polls: Vec<Poll>,

    pub bansos: Vec<BansosRecipient>,

    pub products: Vec<Product>,
    pub stores: Vec<Store>,
    /// Active product search, if any
    pub product_search: Option<String>,
}

impl ScreensModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the open house and rebuild its grid
    pub fn set_house_detail(&mut self, house: BoardingHouse) {
        self.room_grid = RoomGrid::for_house(&house);
        if !self.room_grid.unplaced.is_empty() {
            tracing::warn!(
                house_id = house.id,
                unplaced = self.room_grid.unplaced.len(),
                "tenants left off the room grid"
            );
        }
        self.house_detail = Some(house);
    }

    pub fn close_house_detail(&mut self) {
        self.house_detail = None;
        self.room_grid = RoomGrid::default();
    }

    pub fn announcement(&self, id: u64) -> Option<&Announcement> {
        self.announcements.iter().find(|a| a.id == id)
    }

    pub fn reaction_state(&self, announcement_id: u64) -> Option<ReactionState> {
        self.announcement(announcement_id).map(ReactionState::of)
    }

    /// Apply a reaction to an announcement's counters
    ///
    /// Returns false when the announcement is no longer in the list.
    pub fn apply_reaction(&mut self, announcement_id: u64, reaction: Reaction) -> bool {
        match self
            .announcements
            .iter_mut()
            .find(|a| a.id == announcement_id)
        {
            Some(announcement) => {
                reaction
                    .apply(ReactionState::of(announcement))
                    .write_to(announcement);
                true
            }
            None => false,
        }
    }

    pub fn set_reaction_state(&mut self, announcement_id: u64, state: ReactionState) {
        if let Some(announcement) = self
            .announcements
            .iter_mut()
            .find(|a| a.id == announcement_id)
        {
            state.write_to(announcement);
        }
    }

    /// Drop everything fetched for the previous user
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
