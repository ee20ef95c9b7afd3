//! Warga TUI Library
//!
//! Exposes the REST client, pure logic and model modules for testing

pub mod api;
pub mod error;
pub mod logic;
pub mod model;

/// Top-level screens, shown as tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Beranda,    // Resident dashboard
    Kost,       // Boarding houses and the room grid
    Pengumuman, // Announcements
    Ronda,      // Night patrol schedules and fines
    Kas,        // RT cash book
    Voting,     // Polls
    Bansos,     // Social assistance recipients
    Pasar,      // Marketplace products and stores
}

impl Screen {
    pub const ALL: [Screen; 8] = [
        Screen::Beranda,
        Screen::Kost,
        Screen::Pengumuman,
        Screen::Ronda,
        Screen::Kas,
        Screen::Voting,
        Screen::Bansos,
        Screen::Pasar,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Beranda => "Beranda",
            Screen::Kost => "Kost",
            Screen::Pengumuman => "Pengumuman",
            Screen::Ronda => "Ronda",
            Screen::Kas => "Kas RT",
            Screen::Voting => "Voting",
            Screen::Bansos => "Bansos",
            Screen::Pasar => "Pasar",
        }
    }

    /// Position in the tab bar (0-based)
    pub fn index(&self) -> usize {
        Screen::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or(0)
    }

    /// Screen bound to a number key ('1'..='8')
    pub fn from_hotkey(c: char) -> Option<Screen> {
        let digit = c.to_digit(10)? as usize;
        digit.checked_sub(1).and_then(|idx| Screen::ALL.get(idx).copied())
    }
}
