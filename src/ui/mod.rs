// UI module - handles all TUI rendering using Ratatui
//
// Architecture:
// - layout: Calculates screen layout (bars, panes, popups)
// - render: Main orchestration function that coordinates all rendering
// - system_bar: Renders top bar (tabs, signed-in user, connection)
// - beranda, kost, pengumuman, ronda, kas, voting, bansos, pasar: One module per tab
// - login: Background shown while signed out
// - list: Shared selectable list and pane block
// - legend: Renders hotkey legend
// - status_bar: Renders bottom status bar (loading, pending saves, errors)
// - dialogs: Renders confirmation, form, picker and help popups
// - toast: Renders toast notifications (brief pop-up messages)

pub mod bansos;
pub mod beranda;
pub mod dialogs;
pub mod kas;
pub mod kost;
pub mod layout;
pub mod legend;
pub mod list;
pub mod login;
pub mod pasar;
pub mod pengumuman;
pub mod render;
pub mod ronda;
pub mod status_bar;
pub mod system_bar;
pub mod toast;
pub mod voting;

// Re-export main render function for convenience
pub use render::render;
